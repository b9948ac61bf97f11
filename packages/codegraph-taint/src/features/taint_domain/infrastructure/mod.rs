//! Taint domain infrastructure

pub mod materialize; // via-type-of / via-value-of features
pub mod propagation; // call-edge transfer function
pub mod serialization; // JSON model
