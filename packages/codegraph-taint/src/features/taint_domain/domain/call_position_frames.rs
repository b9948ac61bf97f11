//! CallPositionFrames: frames grouped by kind, all at one call position
//!
//! Used while analyzing the effects of a single call site. Mixing frames
//! from two call positions is a caller bug and panics.

use super::frame::Frame;
use super::frame_set::FrameSet;
use super::group_hashed_set::GroupHashedSetDomain;
use crate::features::taint_domain::infrastructure::propagation::propagate_frame_set;
use crate::features::taint_domain::ports::{CallSite, Context};
use crate::shared::models::{FeatureMayAlwaysSet, Kind, LocalPositionSet, Position};
use crate::shared::ports::lattice::{AbstractDomain, Lattice};

#[derive(Debug, Clone, Default)]
pub struct CallPositionFrames {
    /// Call position shared by every frame; meaningless while bottom
    position: Option<Position>,
    frames: GroupHashedSetDomain<FrameSet>,
}

impl CallPositionFrames {
    pub fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        let mut result = Self::default();
        for frame in frames {
            result.add(frame);
        }
        result
    }

    /// Not representable
    pub fn top() -> Self {
        unreachable!("CallPositionFrames has no top element")
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    /// Number of kinds
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn num_frames(&self) -> usize {
        self.frames.iter().map(FrameSet::len).sum()
    }

    pub fn frame_sets(&self) -> impl Iterator<Item = &FrameSet> {
        self.frames.iter()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter().flat_map(FrameSet::iter)
    }

    pub fn get(&self, kind: &Kind) -> Option<&FrameSet> {
        self.frames.get(kind)
    }

    pub fn add(&mut self, frame: Frame) {
        if self.is_bottom() {
            self.position = frame.call_position.clone();
        } else {
            assert_eq!(
                self.position, frame.call_position,
                "frame call position does not match the group's call position"
            );
        }
        let kind = frame.kind.clone();
        self.frames.add(FrameSet::from_frames(kind, [frame]));
    }

    fn assert_compatible(&self, other: &Self) {
        assert!(
            self.is_bottom() || other.is_bottom() || self.position == other.position,
            "combining frames at call position {:?} with frames at {:?}",
            self.position,
            other.position
        );
    }

    /// Adopt `other`'s position when `self` is bottom
    fn adopt_position(&mut self, other: &Self) {
        if self.is_bottom() {
            self.position = other.position.clone();
        }
    }

    pub fn difference_with(&mut self, other: &Self) {
        self.assert_compatible(other);
        self.frames.difference_with(&other.frames);
    }

    /// Apply `f` to every frame. `f` must not change the call position.
    pub fn map(&mut self, mut f: impl FnMut(&mut Frame)) {
        self.frames.map(|frames| frames.map(&mut f));
    }

    pub fn add_inferred_features(&mut self, features: &FeatureMayAlwaysSet) {
        if features.is_empty() {
            return;
        }
        self.map(|frame| frame.add_inferred_features(features));
    }

    /// Union of the local positions of every frame
    pub fn local_positions(&self) -> LocalPositionSet {
        self.iter()
            .flat_map(|frame| frame.local_positions().iter().cloned())
            .collect()
    }

    pub fn add_local_position(&mut self, position: &Position) {
        self.map(|frame| frame.add_local_position(position.clone()));
    }

    pub fn set_local_positions(&mut self, positions: &LocalPositionSet) {
        self.map(|frame| frame.set_local_positions(positions.clone()));
    }

    pub fn add_inferred_features_and_local_position(
        &mut self,
        features: &FeatureMayAlwaysSet,
        position: Option<&Position>,
    ) {
        if features.is_empty() && position.is_none() {
            return;
        }
        self.map(|frame| {
            if !features.is_empty() {
                frame.add_inferred_features(features);
            }
            if let Some(position) = position {
                frame.add_local_position(position.clone());
            }
        });
    }

    /// Frames the caller sees after crossing `call_site`
    pub fn propagate(&self, call_site: &CallSite<'_>, context: &mut Context) -> CallPositionFrames {
        let mut result = CallPositionFrames::default();
        for frames in self.frames.iter() {
            let propagated = propagate_frame_set(frames, call_site, context);
            if propagated.is_bottom() {
                continue;
            }
            result.position = Some(call_site.call_position.clone());
            result.frames.add(propagated);
        }
        result
    }
}

impl Lattice for CallPositionFrames {
    fn is_bottom(&self) -> bool {
        self.frames.is_bottom()
    }

    fn leq(&self, other: &Self) -> bool {
        self.assert_compatible(other);
        self.frames.leq(&other.frames)
    }

    fn equals(&self, other: &Self) -> bool {
        self.assert_compatible(other);
        self.frames.equals(&other.frames)
    }

    fn join_with(&mut self, other: &Self) {
        self.assert_compatible(other);
        self.adopt_position(other);
        self.frames.join_with(&other.frames);
    }

    fn widen_with(&mut self, other: &Self) {
        self.assert_compatible(other);
        self.adopt_position(other);
        self.frames.widen_with(&other.frames);
    }

    fn meet_with(&mut self, other: &Self) {
        self.assert_compatible(other);
        self.frames.meet_with(&other.frames);
    }

    fn narrow_with(&mut self, other: &Self) {
        self.assert_compatible(other);
        self.frames.narrow_with(&other.frames);
    }
}

impl AbstractDomain for CallPositionFrames {
    fn bottom() -> Self {
        Self::default()
    }
}
