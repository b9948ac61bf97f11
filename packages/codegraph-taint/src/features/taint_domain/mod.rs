// Taint domain: frames, grouped frame sets and call-edge propagation
//
// Hexagonal Architecture:
// - domain: Frame, FrameSet, CallPositionFrames, Taint and the grouped-set algebra
// - infrastructure: propagation, via-port materialization, JSON model
// - ports: CallSite, Context, PropagationDiagnostic

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use crate::shared::ports::lattice::{AbstractDomain, Lattice};
pub use domain::{
    CallPositionFrames, Frame, FrameBuilder, FrameKey, FrameSet, GroupElement,
    GroupHashedSetDomain, Taint,
};
pub use ports::{CallSite, Context, PropagationDiagnostic};
