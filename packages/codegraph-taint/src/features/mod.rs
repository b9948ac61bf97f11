//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains:
//! - domain/         - Lattice elements and their algebra
//! - ports/          - What callers hand in and get back
//! - infrastructure/ - Algorithms and (de)serialization over the domain

pub mod taint_domain;
