//! Shared ports - interface traits implemented across features

pub mod lattice;

pub use lattice::{AbstractDomain, Lattice};
