//! Common test utilities for codegraph-taint
//!
//! Builders for frames and call sites shared by the integration tests.

#![allow(dead_code)]

mod builders;

// Re-export all utilities
pub use builders::*;
