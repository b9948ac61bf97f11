//! FrameSet: every frame of one kind

use super::frame::{Frame, FrameKey};
use super::group_hashed_set::{GroupElement, GroupHashedSetDomain};
use crate::shared::models::Kind;
use crate::shared::ports::lattice::Lattice;

/// Frames sharing one kind, merged by `FrameKey`
#[derive(Debug, Clone)]
pub struct FrameSet {
    kind: Kind,
    frames: GroupHashedSetDomain<Frame>,
}

impl FrameSet {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            frames: GroupHashedSetDomain::new(),
        }
    }

    pub fn from_frames(kind: Kind, frames: impl IntoIterator<Item = Frame>) -> Self {
        let mut set = Self::new(kind);
        for frame in frames {
            set.add(frame);
        }
        set
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    pub fn get(&self, key: &FrameKey) -> Option<&Frame> {
        self.frames.get(key)
    }

    pub fn add(&mut self, frame: Frame) {
        assert_eq!(
            frame.kind, self.kind,
            "frame of kind `{}` added to frames of kind `{}`",
            frame.kind, self.kind
        );
        self.frames.add(frame);
    }

    /// Transform every frame in place; frames must keep their kind
    pub fn map(&mut self, f: impl FnMut(&mut Frame)) {
        self.frames.map(f);
    }

    pub fn filter(&mut self, predicate: impl FnMut(&Frame) -> bool) {
        self.frames.filter(predicate);
    }

    pub fn into_frames(self) -> impl Iterator<Item = Frame> {
        self.frames.into_iter()
    }
}

impl Lattice for FrameSet {
    fn is_bottom(&self) -> bool {
        self.frames.is_bottom()
    }

    fn leq(&self, other: &Self) -> bool {
        self.is_bottom() || (self.kind == other.kind && self.frames.leq(&other.frames))
    }

    fn equals(&self, other: &Self) -> bool {
        if self.is_bottom() || other.is_bottom() {
            return self.is_bottom() && other.is_bottom();
        }
        self.kind == other.kind && self.frames.equals(&other.frames)
    }

    fn join_with(&mut self, other: &Self) {
        if other.is_bottom() {
            return;
        }
        if self.is_bottom() {
            *self = other.clone();
            return;
        }
        debug_assert_eq!(self.kind, other.kind);
        self.frames.join_with(&other.frames);
    }

    fn widen_with(&mut self, other: &Self) {
        if self.is_bottom() {
            *self = other.clone();
            return;
        }
        if !other.is_bottom() {
            debug_assert_eq!(self.kind, other.kind);
            self.frames.widen_with(&other.frames);
        }
    }

    fn meet_with(&mut self, other: &Self) {
        if self.kind != other.kind {
            self.frames.clear();
            return;
        }
        self.frames.meet_with(&other.frames);
    }

    fn narrow_with(&mut self, other: &Self) {
        if self.kind != other.kind {
            self.frames.clear();
            return;
        }
        self.frames.narrow_with(&other.frames);
    }
}

impl GroupElement for FrameSet {
    type Key = Kind;

    fn group_key(&self) -> Kind {
        self.kind.clone()
    }

    fn difference_with(&mut self, other: &Self) {
        self.frames.difference_with(&other.frames);
    }
}
