//! Shared domain models
//!
//! Interned identities and the small value types frames are built from.

pub(crate) mod interning;

pub mod access_path;
pub mod canonical_name;
pub mod features;
pub mod identities;
pub mod method;
pub mod position;

use std::collections::BTreeSet;

pub use access_path::{AccessPath, PathElement, Root};
pub use canonical_name::CanonicalName;
pub use features::{FeatureFactory, FeatureMayAlwaysSet, FeatureSet};
pub use identities::{DexType, Feature, Field, Kind};
pub use method::Method;
pub use position::Position;

// Ordered sets keep JSON output and `Display` deterministic.
pub type MethodSet = BTreeSet<Method>;
pub type FieldSet = BTreeSet<Field>;
pub type LocalPositionSet = BTreeSet<Position>;
pub type RootSet = BTreeSet<Root>;
pub type CanonicalNameSet = BTreeSet<CanonicalName>;
