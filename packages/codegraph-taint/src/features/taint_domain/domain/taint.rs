//! Taint: position-agnostic frames grouped by kind
//!
//! The summary-level domain. Method summaries store one `Taint` per port and
//! the fixpoint accumulates into it with `join_with`/`widen_with`.

use rustc_hash::FxHashMap;
use std::fmt;
use tracing::trace_span;

use super::frame::Frame;
use super::frame_set::FrameSet;
use super::group_hashed_set::GroupHashedSetDomain;
use crate::features::taint_domain::infrastructure::propagation::propagate_frame_set;
use crate::features::taint_domain::ports::{CallSite, Context};
use crate::shared::models::{
    AccessPath, FeatureMayAlwaysSet, Kind, LocalPositionSet, Method, PathElement, Position,
};
use crate::shared::ports::lattice::{AbstractDomain, Lattice};

#[derive(Debug, Clone, Default)]
pub struct Taint {
    set: GroupHashedSetDomain<FrameSet>,
}

impl Taint {
    pub fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        let mut taint = Self::default();
        for frame in frames {
            taint.add(frame);
        }
        taint
    }

    /// Not representable
    pub fn top() -> Self {
        unreachable!("Taint has no top element")
    }

    /// Number of kinds
    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn num_frames(&self) -> usize {
        self.set.iter().map(FrameSet::len).sum()
    }

    pub fn frame_sets(&self) -> impl Iterator<Item = &FrameSet> {
        self.set.iter()
    }

    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.set.iter().flat_map(FrameSet::iter)
    }

    pub fn get(&self, kind: &Kind) -> Option<&FrameSet> {
        self.set.get(kind)
    }

    pub fn add(&mut self, frame: Frame) {
        let kind = frame.kind.clone();
        self.set.add(FrameSet::from_frames(kind, [frame]));
    }

    pub fn add_frames(&mut self, frames: FrameSet) {
        self.set.add(frames);
    }

    pub fn clear(&mut self) {
        self.set.clear();
    }

    pub fn difference_with(&mut self, other: &Self) {
        self.set.difference_with(&other.set);
    }

    /// Apply `f` to every frame, re-merging frames whose key changed
    pub fn map(&mut self, mut f: impl FnMut(&mut Frame)) {
        self.set.map(|frames| frames.map(&mut f));
    }

    /// Keep only the kinds satisfying `predicate`
    pub fn filter(&mut self, predicate: impl FnMut(&FrameSet) -> bool) {
        self.set.filter(predicate);
    }

    pub fn add_inferred_features(&mut self, features: &FeatureMayAlwaysSet) {
        if features.is_empty() {
            return;
        }
        self.map(|frame| frame.add_inferred_features(features));
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

    /// Taint the caller sees after crossing `call_site`.
    ///
    /// `extra_features` are features of the call instruction itself; they
    /// are added to every propagated frame's inferred features.
    pub fn propagate(
        &self,
        caller: &Method,
        call_site: &CallSite<'_>,
        extra_features: &FeatureMayAlwaysSet,
        context: &mut Context,
    ) -> Taint {
        let _span = trace_span!(
            "propagate",
            caller = %caller,
            callee = %call_site.callee,
            callee_port = %call_site.callee_port
        )
        .entered();

        let mut result = Taint::default();
        for frames in self.set.iter() {
            let mut propagated = propagate_frame_set(frames, call_site, context);
            if propagated.is_bottom() {
                continue;
            }
            if !extra_features.is_empty() {
                propagated.map(|frame| frame.inferred_features.add(extra_features));
            }
            result.set.add(propagated);
        }
        result
    }

    /// Leaf frames only, re-stamped at `position` with distance 0.
    ///
    /// Used when declared sources/sinks start flowing at a statement.
    pub fn attach_position(&self, position: &Position) -> Taint {
        let mut result = Taint::default();
        for frame in self.frames().filter(|frame| frame.is_leaf()) {
            result.add(Frame {
                call_position: Some(position.clone()),
                distance: 0,
                inferred_features: frame.features(),
                locally_inferred_features: FeatureMayAlwaysSet::bottom(),
                user_features: Default::default(),
                ..frame.clone()
            });
        }
        result
    }

    /// Rewrite kinds.
    ///
    /// `map_kind` returns the replacement kinds of a kind (empty drops its
    /// frames). When the kind actually changes, `add_features` gives the
    /// locally inferred features to attach to the rewritten frames.
    pub fn transform_kind_with_features(
        &self,
        map_kind: impl Fn(&Kind) -> Vec<Kind>,
        add_features: impl Fn(&Kind) -> FeatureMayAlwaysSet,
    ) -> Taint {
        let mut result = Taint::default();
        for frames in self.set.iter() {
            let old_kind = frames.kind();
            let new_kinds = map_kind(old_kind);
            if new_kinds.is_empty() {
                continue;
            }
            if new_kinds.len() == 1 && &new_kinds[0] == old_kind {
                result.add_frames(frames.clone());
                continue;
            }

            let features = add_features(old_kind);
            for new_kind in &new_kinds {
                for frame in frames.iter() {
                    let mut transformed = frame.with_kind(new_kind.clone());
                    transformed.add_inferred_features(&features);
                    result.add(transformed);
                }
            }
        }
        result
    }

    /// Append `element` to the callee port of every frame whose kind passes
    /// `filter`
    pub fn append_callee_port(&mut self, element: &PathElement, filter: impl Fn(&Kind) -> bool) {
        self.set.map(|frames| {
            if filter(frames.kind()) {
                frames.map(|frame| frame.append_callee_port(element.clone()));
            }
        });
    }

    /// Recompute call and local positions of non-leaf frames
    pub fn update_non_leaf_positions(
        &mut self,
        new_call_position: impl Fn(&Method, &AccessPath, Option<&Position>) -> Position,
        new_local_positions: impl Fn(&LocalPositionSet) -> LocalPositionSet,
    ) {
        self.map(|frame| {
            let Some(callee) = &frame.callee else {
                return;
            };
            let position =
                new_call_position(callee, &frame.callee_port, frame.call_position.as_ref());
            frame.call_position = Some(position);
            frame.local_positions = new_local_positions(&frame.local_positions);
        });
    }

    /// Drop frames for which `is_valid(callee, callee_port, kind)` is false
    pub fn filter_invalid_frames(
        &mut self,
        is_valid: impl Fn(Option<&Method>, &AccessPath, &Kind) -> bool,
    ) {
        self.set.map(|frames| {
            frames.filter(|frame| is_valid(frame.callee(), frame.callee_port(), frame.kind()));
        });
    }

    pub fn contains_kind(&self, kind: &Kind) -> bool {
        self.set.contains_key(kind)
    }

    pub fn partition_by_kind(&self) -> FxHashMap<Kind, Taint> {
        self.set
            .iter()
            .map(|frames| {
                let mut taint = Taint::default();
                taint.add_frames(frames.clone());
                (frames.kind().clone(), taint)
            })
            .collect()
    }

    /// Join of the features of every frame
    pub fn features_joined(&self) -> FeatureMayAlwaysSet {
        let mut features = FeatureMayAlwaysSet::bottom();
        for frame in self.frames() {
            features.join_with(&frame.features());
        }
        features
    }
}

impl FromIterator<Frame> for Taint {
    fn from_iter<I: IntoIterator<Item = Frame>>(iter: I) -> Self {
        Taint::new(iter)
    }
}

impl Lattice for Taint {
    fn is_bottom(&self) -> bool {
        self.set.is_bottom()
    }

    fn leq(&self, other: &Self) -> bool {
        self.set.leq(&other.set)
    }

    fn equals(&self, other: &Self) -> bool {
        self.set.equals(&other.set)
    }

    fn join_with(&mut self, other: &Self) {
        self.set.join_with(&other.set);
    }

    fn widen_with(&mut self, other: &Self) {
        self.set.widen_with(&other.set);
    }

    fn meet_with(&mut self, other: &Self) {
        self.set.meet_with(&other.set);
    }

    fn narrow_with(&mut self, other: &Self) {
        self.set.narrow_with(&other.set);
    }
}

impl AbstractDomain for Taint {
    fn bottom() -> Self {
        Self::default()
    }
}

impl fmt::Display for Taint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut frames: Vec<String> = self.frames().map(Frame::to_string).collect();
        frames.sort();
        write!(f, "{{{}}}", frames.join(", "))
    }
}
