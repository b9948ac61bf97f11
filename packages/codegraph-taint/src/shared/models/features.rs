//! Feature lattices
//!
//! - `FeatureSet`: plain powerset lattice (union / intersection)
//! - `FeatureMayAlwaysSet`: features that *may* hold on some path versus
//!   features that *always* hold on every path. Joining two paths keeps the
//!   union of may-features and the intersection of always-features.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::identities::{DexType, Feature};
use crate::shared::ports::lattice::{AbstractDomain, Lattice};

/// Set of features (powerset lattice)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(BTreeSet<Feature>);

static EMPTY_FEATURE_SET: FeatureSet = FeatureSet(BTreeSet::new());

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn add(&mut self, feature: Feature) {
        self.0.insert(feature);
    }

    pub fn contains(&self, feature: &Feature) -> bool {
        self.0.contains(feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.0.iter()
    }

    pub fn is_subset(&self, other: &FeatureSet) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn union_with(&mut self, other: &FeatureSet) {
        self.0.extend(other.0.iter().cloned());
    }

    pub fn intersection_with(&mut self, other: &FeatureSet) {
        self.0.retain(|feature| other.0.contains(feature));
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        FeatureSet(iter.into_iter().collect())
    }
}

impl Lattice for FeatureSet {
    fn is_bottom(&self) -> bool {
        self.0.is_empty()
    }

    fn leq(&self, other: &Self) -> bool {
        self.is_subset(other)
    }

    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    fn join_with(&mut self, other: &Self) {
        self.union_with(other);
    }

    fn meet_with(&mut self, other: &Self) {
        self.intersection_with(other);
    }
}

impl AbstractDomain for FeatureSet {
    fn bottom() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
struct MayAlways {
    may: FeatureSet,
    always: FeatureSet,
}

/// May/always feature set. Invariant: `always ⊆ may`.
///
/// Bottom (no path seen yet) is distinct from the empty set (a path with no
/// features): bottom is the identity of join, the empty set absorbs every
/// always-feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureMayAlwaysSet {
    sets: Option<MayAlways>,
}

impl FeatureMayAlwaysSet {
    /// Non-bottom set with no features
    pub fn empty() -> Self {
        Self {
            sets: Some(MayAlways {
                may: FeatureSet::new(),
                always: FeatureSet::new(),
            }),
        }
    }

    pub fn make_always(features: impl IntoIterator<Item = Feature>) -> Self {
        let always: FeatureSet = features.into_iter().collect();
        Self {
            sets: Some(MayAlways {
                may: always.clone(),
                always,
            }),
        }
    }

    pub fn make_may(features: impl IntoIterator<Item = Feature>) -> Self {
        Self {
            sets: Some(MayAlways {
                may: features.into_iter().collect(),
                always: FeatureSet::new(),
            }),
        }
    }

    /// Build from explicit sets; always-features are implied may-features.
    pub fn new(may: FeatureSet, always: FeatureSet) -> Self {
        let mut may = may;
        may.union_with(&always);
        Self {
            sets: Some(MayAlways { may, always }),
        }
    }

    /// True for bottom and for a set holding no feature at all
    pub fn is_empty(&self) -> bool {
        match &self.sets {
            None => true,
            Some(sets) => sets.may.is_empty(),
        }
    }

    pub fn may(&self) -> &FeatureSet {
        self.sets.as_ref().map_or(&EMPTY_FEATURE_SET, |sets| &sets.may)
    }

    pub fn always(&self) -> &FeatureSet {
        self.sets
            .as_ref()
            .map_or(&EMPTY_FEATURE_SET, |sets| &sets.always)
    }

    pub fn add_may(&mut self, feature: Feature) {
        self.sets
            .get_or_insert_with(|| MayAlways {
                may: FeatureSet::new(),
                always: FeatureSet::new(),
            })
            .may
            .add(feature);
    }

    pub fn add_always(&mut self, feature: Feature) {
        let sets = self.sets.get_or_insert_with(|| MayAlways {
            may: FeatureSet::new(),
            always: FeatureSet::new(),
        });
        sets.may.add(feature.clone());
        sets.always.add(feature);
    }

    pub fn add_always_set(&mut self, features: &FeatureSet) {
        for feature in features.iter() {
            self.add_always(feature.clone());
        }
    }

    /// Sequential composition: features of `other` hold in addition to ours.
    pub fn add(&mut self, other: &FeatureMayAlwaysSet) {
        let Some(theirs) = &other.sets else {
            return;
        };
        match &mut self.sets {
            None => self.sets = Some(theirs.clone()),
            Some(ours) => {
                ours.may.union_with(&theirs.may);
                ours.always.union_with(&theirs.always);
            }
        }
    }
}

impl Lattice for FeatureMayAlwaysSet {
    fn is_bottom(&self) -> bool {
        self.sets.is_none()
    }

    fn leq(&self, other: &Self) -> bool {
        match (&self.sets, &other.sets) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(ours), Some(theirs)) => {
                ours.may.is_subset(&theirs.may) && theirs.always.is_subset(&ours.always)
            }
        }
    }

    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    fn join_with(&mut self, other: &Self) {
        let Some(theirs) = &other.sets else {
            return;
        };
        match &mut self.sets {
            None => self.sets = Some(theirs.clone()),
            Some(ours) => {
                ours.may.union_with(&theirs.may);
                ours.always.intersection_with(&theirs.always);
            }
        }
    }

    fn meet_with(&mut self, other: &Self) {
        let Some(ours) = &mut self.sets else {
            return;
        };
        let Some(theirs) = &other.sets else {
            self.sets = None;
            return;
        };
        ours.may.intersection_with(&theirs.may);
        ours.always.union_with(&theirs.always);
        if !ours.always.is_subset(&ours.may) {
            self.sets = None;
        }
    }
}

impl AbstractDomain for FeatureMayAlwaysSet {
    fn bottom() -> Self {
        Self { sets: None }
    }
}

/// Derives the features materialized at call sites
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureFactory;

impl FeatureFactory {
    pub const VIA_TYPE_OF_PREFIX: &'static str = "via-type:";
    pub const VIA_VALUE_OF_PREFIX: &'static str = "via-value:";
    const UNKNOWN: &'static str = "unknown";

    pub fn new() -> Self {
        FeatureFactory
    }

    pub fn get(&self, name: &str) -> Feature {
        Feature::named(name)
    }

    /// Feature for the register type observed at the call site
    pub fn via_type_of_feature(&self, observed_type: Option<&DexType>) -> Feature {
        let type_name = observed_type.map_or(Self::UNKNOWN, DexType::as_str);
        Feature::named(&format!("{}{}", Self::VIA_TYPE_OF_PREFIX, type_name))
    }

    /// Feature for the constant argument observed at the call site
    pub fn via_value_of_feature(&self, observed_value: Option<&str>) -> Feature {
        let value = observed_value.unwrap_or(Self::UNKNOWN);
        Feature::named(&format!("{}{}", Self::VIA_VALUE_OF_PREFIX, value))
    }

    /// The type name carried by a via-type-of feature
    pub fn via_type_of_type_name<'a>(&self, feature: &'a Feature) -> Option<&'a str> {
        feature.as_str().strip_prefix(Self::VIA_TYPE_OF_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::ports::lattice::tests::check_lattice_axioms;

    fn feature(name: &str) -> Feature {
        Feature::named(name)
    }

    #[test]
    fn test_join_keeps_may_union_and_always_intersection() {
        let mut left = FeatureMayAlwaysSet::make_always([feature("a"), feature("b")]);
        let right = FeatureMayAlwaysSet::make_always([feature("b"), feature("c")]);
        left.join_with(&right);

        assert_eq!(left.may().len(), 3);
        assert_eq!(left.always().len(), 1);
        assert!(left.always().contains(&feature("b")));
    }

    #[test]
    fn test_bottom_is_join_identity() {
        let mut set = FeatureMayAlwaysSet::bottom();
        let other = FeatureMayAlwaysSet::make_always([feature("a")]);
        set.join_with(&other);
        assert_eq!(set, other);

        let mut kept = other.clone();
        kept.join_with(&FeatureMayAlwaysSet::bottom());
        assert_eq!(kept, other);
    }

    #[test]
    fn test_empty_is_not_bottom() {
        let empty = FeatureMayAlwaysSet::empty();
        assert!(!empty.is_bottom());
        assert!(empty.is_empty());
        assert!(FeatureMayAlwaysSet::bottom().leq(&empty));
        assert!(!empty.leq(&FeatureMayAlwaysSet::bottom()));
    }

    #[test]
    fn test_add_always_on_bottom() {
        let mut set = FeatureMayAlwaysSet::bottom();
        set.add_always(feature("x"));
        assert!(set.always().contains(&feature("x")));
        assert!(set.may().contains(&feature("x")));
    }

    #[test]
    fn test_add_is_sequential_composition() {
        let mut set = FeatureMayAlwaysSet::make_always([feature("a")]);
        set.add(&FeatureMayAlwaysSet::make_always([feature("b")]));
        assert_eq!(set.always().len(), 2);

        let mut from_bottom = FeatureMayAlwaysSet::bottom();
        from_bottom.add(&FeatureMayAlwaysSet::make_may([feature("m")]));
        assert!(from_bottom.may().contains(&feature("m")));
        assert!(from_bottom.always().is_empty());
    }

    #[test]
    fn test_meet_collapses_to_bottom_when_inconsistent() {
        let mut left = FeatureMayAlwaysSet::make_always([feature("a")]);
        let right = FeatureMayAlwaysSet::make_may([feature("b")]);
        left.meet_with(&right);
        assert!(left.is_bottom());
    }

    #[test]
    fn test_new_normalizes_always_into_may() {
        let set = FeatureMayAlwaysSet::new(
            FeatureSet::new(),
            [feature("only-always")].into_iter().collect(),
        );
        assert!(set.may().contains(&feature("only-always")));
    }

    #[test]
    fn test_lattice_axioms() {
        check_lattice_axioms(&[
            FeatureMayAlwaysSet::bottom(),
            FeatureMayAlwaysSet::empty(),
            FeatureMayAlwaysSet::make_always([feature("a")]),
            FeatureMayAlwaysSet::make_may([feature("a"), feature("b")]),
            FeatureMayAlwaysSet::new(
                [feature("a"), feature("c")].into_iter().collect(),
                [feature("c")].into_iter().collect(),
            ),
        ]);
        check_lattice_axioms(&[
            FeatureSet::new(),
            [feature("a")].into_iter().collect::<FeatureSet>(),
            [feature("a"), feature("b")].into_iter().collect::<FeatureSet>(),
        ]);
    }

    #[test]
    fn test_json_distinguishes_bottom_and_empty() {
        let bottom = serde_json::to_value(FeatureMayAlwaysSet::bottom()).unwrap();
        let empty = serde_json::to_value(FeatureMayAlwaysSet::empty()).unwrap();
        assert!(bottom.is_null());
        assert_eq!(empty, serde_json::json!({"may": [], "always": []}));

        let back: FeatureMayAlwaysSet = serde_json::from_value(empty).unwrap();
        assert_eq!(back, FeatureMayAlwaysSet::empty());
    }

    #[test]
    fn test_feature_factory_names() {
        let factory = FeatureFactory::new();
        let ty = DexType::named("Ljava/lang/String;");
        let via_type = factory.via_type_of_feature(Some(&ty));
        assert_eq!(via_type.as_str(), "via-type:Ljava/lang/String;");
        assert_eq!(
            factory.via_type_of_type_name(&via_type),
            Some("Ljava/lang/String;")
        );
        assert_eq!(factory.via_type_of_feature(None).as_str(), "via-type:unknown");
        assert_eq!(
            factory.via_value_of_feature(Some("GET")).as_str(),
            "via-value:GET"
        );
        assert_eq!(factory.via_value_of_feature(None).as_str(), "via-value:unknown");
    }
}
