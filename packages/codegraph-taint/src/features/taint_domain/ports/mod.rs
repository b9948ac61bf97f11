//! Taint domain ports: what callers hand to propagation and get back

pub mod call_site;
pub mod context;
pub mod diagnostics;

pub use call_site::CallSite;
pub use context::Context;
pub use diagnostics::PropagationDiagnostic;
