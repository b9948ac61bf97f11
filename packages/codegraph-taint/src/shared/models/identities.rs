//! Name-like interned identities
//!
//! These carry no structure the taint domain inspects; the domain only
//! compares, hashes and prints them.

use super::interning::interned_name;

interned_name!(
    /// Taint category (a source or sink label such as `Sink1`)
    Kind,
    KIND_REGISTRY
);

interned_name!(
    /// Evidence attached to frames (e.g. `via-type:Ljava/lang/String;`)
    Feature,
    FEATURE_REGISTRY
);

interned_name!(
    /// Concrete register type observed at a call site (`Ljava/lang/String;`)
    DexType,
    DEX_TYPE_REGISTRY
);

interned_name!(
    /// Field reference, `LClass;.name:LType;`
    Field,
    FIELD_REGISTRY
);
