//! Configuration System
//!
//! Two tiers:
//! - Preset: one-liner (`PropagationConfig::preset(Preset::Fast)`)
//! - YAML: versioned file with optional preset plus field overrides
//!
//! ```yaml
//! version: 1
//! preset: balanced
//! maximum_source_sink_distance: 10
//! collect_diagnostics: true
//! ```

pub mod error;
pub mod preset;
pub mod propagation_config;
pub mod validation;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use preset::Preset;
pub use propagation_config::{PropagationConfig, SUPPORTED_VERSIONS};
pub use validation::Validatable;
