//! Taint domain types

pub mod call_position_frames;
pub mod frame;
pub mod frame_set;
pub mod group_hashed_set;
pub mod taint;

pub use call_position_frames::CallPositionFrames;
pub use frame::{Frame, FrameBuilder, FrameKey};
pub use frame_set::FrameSet;
pub use group_hashed_set::{GroupElement, GroupHashedSetDomain};
pub use taint::Taint;
