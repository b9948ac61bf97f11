//! Lattice interface shared by every abstract domain in the crate.
//!
//! Elements are mutated in place (`join_with`, `meet_with`, ...) because the
//! fixpoint driver accumulates into a running state; the by-value helpers
//! (`join`, `meet`) are provided on top.

use std::fmt::Debug;

/// A lattice element.
///
/// Laws every implementor must satisfy:
/// - Reflexivity: `a.leq(a)`
/// - Join is an upper bound: `a.leq(a ⊔ b) ∧ b.leq(a ⊔ b)`
/// - Join is commutative, associative and idempotent
/// - Widening terminates on any ascending chain
///
/// Widening defaults to join and narrowing to meet; that is only sound for
/// domains of finite height.
pub trait Lattice: Clone + Debug {
    /// Check if this is Bottom
    fn is_bottom(&self) -> bool;

    /// Partial order: `self ⊑ other`
    fn leq(&self, other: &Self) -> bool;

    /// Equality in the lattice order
    fn equals(&self, other: &Self) -> bool {
        self.leq(other) && other.leq(self)
    }

    /// Least upper bound, in place
    fn join_with(&mut self, other: &Self);

    /// Widening, in place
    fn widen_with(&mut self, other: &Self) {
        self.join_with(other);
    }

    /// Greatest lower bound, in place
    fn meet_with(&mut self, other: &Self);

    /// Narrowing, in place
    fn narrow_with(&mut self, other: &Self) {
        self.meet_with(other);
    }

    fn join(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.join_with(other);
        result
    }

    fn meet(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.meet_with(other);
        result
    }
}

/// A lattice with a constructible bottom element.
///
/// None of the taint domains represent top; asking for it is a programming
/// error.
pub trait AbstractDomain: Lattice {
    /// Bottom element (⊥)
    fn bottom() -> Self;

    fn set_to_bottom(&mut self) {
        *self = Self::bottom();
    }
}
