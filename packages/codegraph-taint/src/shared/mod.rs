//! Shared module - Common types and utilities
//!
//! Identities, access paths and feature lattices used by every feature.
//! Nothing here knows about frames or propagation.

pub mod models;
pub mod ports;

// Re-exports for convenience
pub use models::*;
pub use ports::lattice::{AbstractDomain, Lattice};
