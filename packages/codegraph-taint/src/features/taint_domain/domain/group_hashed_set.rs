//! Grouped hashed-set domain
//!
//! A set whose elements are partitioned by a group key. Elements sharing a
//! key are merged with the element's own lattice operations, so the set never
//! holds two elements with the same key and never holds a bottom element.
//!
//! ```text
//! {k1: a1, k2: a2} ⊔ {k2: b2, k3: b3} = {k1: a1, k2: a2 ⊔ b2, k3: b3}
//! {k1: a1, k2: a2} ⊓ {k2: b2, k3: b3} = {k2: a2 ⊓ b2}
//! ```

use rustc_hash::FxHashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::shared::ports::lattice::{AbstractDomain, Lattice};

/// Element of a `GroupHashedSetDomain`
pub trait GroupElement: Lattice {
    type Key: Eq + Hash + Clone + Debug;

    /// Elements with equal keys are merged
    fn group_key(&self) -> Self::Key;

    /// Remove from `self` what `other` already implies.
    ///
    /// Only called when `self` is not `leq` `other`. The default keeps `self`
    /// unchanged, which is always sound.
    fn difference_with(&mut self, _other: &Self) {}
}

#[derive(Debug, Clone)]
pub struct GroupHashedSetDomain<E: GroupElement> {
    groups: FxHashMap<E::Key, E>,
}

impl<E: GroupElement> Default for GroupHashedSetDomain<E> {
    fn default() -> Self {
        Self {
            groups: FxHashMap::default(),
        }
    }
}

impl<E: GroupElement> GroupHashedSetDomain<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.groups.values()
    }

    pub fn get(&self, key: &E::Key) -> Option<&E> {
        self.groups.get(key)
    }

    pub fn contains_key(&self, key: &E::Key) -> bool {
        self.groups.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// Insert an element, joining it into the existing one with the same key
    pub fn add(&mut self, element: E) {
        if element.is_bottom() {
            return;
        }
        let key = element.group_key();
        match self.groups.get_mut(&key) {
            Some(existing) => existing.join_with(&element),
            None => {
                self.groups.insert(key, element);
            }
        }
    }

    pub fn remove(&mut self, key: &E::Key) -> Option<E> {
        self.groups.remove(key)
    }

    /// Apply `f` to every element in place.
    ///
    /// Elements are re-inserted afterwards: a transform that changes an
    /// element's key merges it with any element that already has that key.
    pub fn map(&mut self, mut f: impl FnMut(&mut E)) {
        self.rebuild(|mut element| {
            f(&mut element);
            Some(element)
        });
    }

    /// Keep only elements satisfying `predicate`
    pub fn filter(&mut self, mut predicate: impl FnMut(&E) -> bool) {
        self.groups.retain(|_, element| predicate(element));
    }

    /// Replace each element by zero or one transformed element, re-merging
    /// by key.
    pub fn rebuild(&mut self, mut f: impl FnMut(E) -> Option<E>) {
        let groups = std::mem::take(&mut self.groups);
        for (_, element) in groups {
            if let Some(transformed) = f(element) {
                self.add(transformed);
            }
        }
    }

    /// Remove the elements implied by `other`
    pub fn difference_with(&mut self, other: &Self) {
        if other.is_empty() {
            return;
        }
        self.rebuild(|mut element| match other.groups.get(&element.group_key()) {
            None => Some(element),
            Some(counterpart) if element.leq(counterpart) => None,
            Some(counterpart) => {
                element.difference_with(counterpart);
                Some(element)
            }
        });
    }

    fn merge_shared(&mut self, other: &Self, combine: impl Fn(&mut E, &E)) {
        self.rebuild(|mut element| {
            let counterpart = other.groups.get(&element.group_key())?;
            combine(&mut element, counterpart);
            Some(element)
        });
    }
}

impl<E: GroupElement> FromIterator<E> for GroupHashedSetDomain<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut domain = Self::new();
        for element in iter {
            domain.add(element);
        }
        domain
    }
}

impl<E: GroupElement> IntoIterator for GroupHashedSetDomain<E> {
    type Item = E;
    type IntoIter = std::collections::hash_map::IntoValues<E::Key, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_values()
    }
}

impl<E: GroupElement> Lattice for GroupHashedSetDomain<E> {
    fn is_bottom(&self) -> bool {
        self.groups.is_empty()
    }

    fn leq(&self, other: &Self) -> bool {
        if self.groups.len() > other.groups.len() {
            return false;
        }
        self.groups.iter().all(|(key, element)| {
            other
                .groups
                .get(key)
                .is_some_and(|counterpart| element.leq(counterpart))
        })
    }

    fn equals(&self, other: &Self) -> bool {
        self.groups.len() == other.groups.len()
            && self.groups.iter().all(|(key, element)| {
                other
                    .groups
                    .get(key)
                    .is_some_and(|counterpart| element.equals(counterpart))
            })
    }

    fn join_with(&mut self, other: &Self) {
        for element in other.groups.values() {
            self.add(element.clone());
        }
    }

    fn widen_with(&mut self, other: &Self) {
        for (key, element) in &other.groups {
            match self.groups.get_mut(key) {
                Some(existing) => existing.widen_with(element),
                None => {
                    if !element.is_bottom() {
                        self.groups.insert(key.clone(), element.clone());
                    }
                }
            }
        }
    }

    fn meet_with(&mut self, other: &Self) {
        self.merge_shared(other, |element, counterpart| element.meet_with(counterpart));
    }

    fn narrow_with(&mut self, other: &Self) {
        self.merge_shared(other, |element, counterpart| {
            element.narrow_with(counterpart)
        });
    }
}

impl<E: GroupElement> AbstractDomain for GroupHashedSetDomain<E> {
    fn bottom() -> Self {
        Self::new()
    }
}
