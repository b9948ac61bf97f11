/*
 * Codegraph Taint - Frame Domain & Call-Edge Propagation
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Interned identities, access paths, feature lattices
 * - features/    : taint_domain (grouped-set domain, frames, propagation)
 * - config/      : Propagation configuration (presets + YAML)
 * - errors       : Crate error type
 *
 * The domain types are plain values: one worker owns and mutates an instance
 * at a time. Only the interning registries are shared across threads.
 */

#![allow(clippy::too_many_arguments)] // Frame construction mirrors the wire model
#![allow(clippy::type_complexity)] // Mapper closures in Taint transforms
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional

/// Shared models (identities, access paths, features)
pub mod shared;

/// Feature modules
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use errors::{Result, TaintError};

pub use features::taint_domain::{
    AbstractDomain, CallPositionFrames, CallSite, Context, Frame, FrameBuilder, FrameSet,
    GroupElement, GroupHashedSetDomain, Lattice, PropagationDiagnostic, Taint,
};

pub use shared::models::{
    AccessPath, CanonicalName, CanonicalNameSet, DexType, Feature, FeatureFactory,
    FeatureMayAlwaysSet, FeatureSet, Field, FieldSet, Kind, LocalPositionSet, Method, MethodSet,
    PathElement, Position, Root, RootSet,
};

pub use config::{ConfigError, ConfigResult, Preset, PropagationConfig, Validatable};
