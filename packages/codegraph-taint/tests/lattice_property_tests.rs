//! Property-based tests for the frame domain lattices
//!
//! Laws are checked on randomly generated taint over a small universe of
//! kinds, ports, origins and features so that groups collide often.

use codegraph_taint::{
    AbstractDomain, AccessPath, CallPositionFrames, CallSite, Context, Feature,
    FeatureMayAlwaysSet, Frame, Kind, Lattice, Method, Position, Taint,
};
use proptest::prelude::*;

const KINDS: &[&str] = &["PropSink", "PropSource", "PropOther"];
const PORTS: &[&str] = &["Argument(0)", "Argument(1).field", "Return"];
const ORIGINS: &[&str] = &[
    "LProp;.a:()V",
    "LProp;.b:()V",
    "LProp;.c:()V",
    "LProp;.d:()V",
];
const FEATURES: &[&str] = &["prop-f0", "prop-f1", "prop-f2", "prop-f3"];

// ============================================================================
// Strategies
// ============================================================================

fn features_strategy() -> impl Strategy<Value = FeatureMayAlwaysSet> {
    prop_oneof![
        1 => Just(FeatureMayAlwaysSet::bottom()),
        4 => (
            prop::collection::btree_set(0..FEATURES.len(), 0..3),
            prop::collection::btree_set(0..FEATURES.len(), 0..3),
        )
            .prop_map(|(may, always)| {
                FeatureMayAlwaysSet::new(
                    may.into_iter().map(|i| Feature::named(FEATURES[i])).collect(),
                    always.into_iter().map(|i| Feature::named(FEATURES[i])).collect(),
                )
            }),
    ]
}

fn frame_strategy(position: Position) -> impl Strategy<Value = Frame> {
    (
        0..KINDS.len(),
        0..PORTS.len(),
        0u32..6,
        prop::collection::btree_set(0..ORIGINS.len(), 0..3),
        features_strategy(),
    )
        .prop_map(move |(kind, port, distance, origins, features)| {
            Frame::builder(
                Kind::named(KINDS[kind]),
                PORTS[port].parse::<AccessPath>().unwrap(),
            )
            .callee(Method::named("LProp;.callee:(I)V"))
            .call_position(position.clone())
            .distance(distance)
            .origins(origins.into_iter().map(|i| Method::named(ORIGINS[i])))
            .inferred_features(features)
            .build()
        })
}

fn here() -> Position {
    Position::new(Some("Prop.java"), 1)
}

fn taint_strategy() -> impl Strategy<Value = Taint> {
    prop::collection::vec(frame_strategy(here()), 0..6).prop_map(Taint::new)
}

fn call_position_frames_strategy() -> impl Strategy<Value = CallPositionFrames> {
    prop::collection::vec(frame_strategy(here()), 0..6).prop_map(CallPositionFrames::new)
}

// ============================================================================
// Taint
// ============================================================================

proptest! {
    #[test]
    fn prop_taint_join_is_least_upper_bound(a in taint_strategy(), b in taint_strategy()) {
        let ab = a.join(&b);
        prop_assert!(a.leq(&ab));
        prop_assert!(b.leq(&ab));
        prop_assert!(ab.equals(&b.join(&a)));
    }

    #[test]
    fn prop_taint_join_idempotent_with_bottom_identity(a in taint_strategy()) {
        prop_assert!(a.join(&a).equals(&a));
        prop_assert!(a.join(&Taint::bottom()).equals(&a));
        prop_assert!(Taint::bottom().leq(&a));
    }

    #[test]
    fn prop_taint_join_associative(
        a in taint_strategy(),
        b in taint_strategy(),
        c in taint_strategy(),
    ) {
        let left = a.join(&b).join(&c);
        let right = a.join(&b.join(&c));
        prop_assert!(left.equals(&right));
    }

    #[test]
    fn prop_taint_meet_is_lower_bound(a in taint_strategy(), b in taint_strategy()) {
        let met = a.meet(&b);
        prop_assert!(met.leq(&a));
        prop_assert!(met.leq(&b));
    }

    #[test]
    fn prop_taint_widening_stabilizes(chain in prop::collection::vec(taint_strategy(), 1..8)) {
        let mut widened = Taint::bottom();
        for _round in 0..3 {
            for taint in &chain {
                let previous = widened.clone();
                widened.widen_with(taint);
                prop_assert!(previous.leq(&widened));
                prop_assert!(taint.leq(&widened));
            }
        }
        let fixpoint = widened.clone();
        for taint in &chain {
            widened.widen_with(taint);
        }
        prop_assert!(widened.equals(&fixpoint));
    }

    #[test]
    fn prop_taint_difference_removes_covered_frames(a in taint_strategy(), b in taint_strategy()) {
        let mut difference = a.clone();
        difference.difference_with(&b);
        prop_assert!(difference.leq(&a));
        for frame in difference.frames() {
            prop_assert!(!Taint::new([frame.clone()]).leq(&b));
        }
    }

    #[test]
    fn prop_propagation_is_monotone(a in taint_strategy(), b in taint_strategy()) {
        let bigger = a.join(&b);
        let port = "Argument(1)".parse::<AccessPath>().unwrap();
        let call_site = CallSite::new(
            Method::named("LProp;.outer:(I)V"),
            &port,
            Position::new(Some("Prop.java"), 9),
            4,
        );
        let caller = Method::named("LProp;.caller:()V");
        let mut context = Context::default();

        let small = a.propagate(&caller, &call_site, &FeatureMayAlwaysSet::empty(), &mut context);
        let large = bigger.propagate(&caller, &call_site, &FeatureMayAlwaysSet::empty(), &mut context);
        prop_assert!(small.leq(&large));
        prop_assert!(large.frames().all(|frame| frame.distance() <= 4));
    }
}

// ============================================================================
// CallPositionFrames
// ============================================================================

proptest! {
    #[test]
    fn prop_call_position_frames_join(
        a in call_position_frames_strategy(),
        b in call_position_frames_strategy(),
    ) {
        let ab = a.join(&b);
        prop_assert!(a.leq(&ab));
        prop_assert!(b.leq(&ab));
        prop_assert!(ab.equals(&b.join(&a)));
        if !ab.is_bottom() {
            prop_assert_eq!(ab.position(), Some(&here()));
        }
    }

    #[test]
    fn prop_call_position_frames_frame_count(a in call_position_frames_strategy()) {
        prop_assert_eq!(a.num_frames(), a.iter().count());
        prop_assert!(a.len() <= KINDS.len());
    }
}

// ============================================================================
// FeatureMayAlwaysSet
// ============================================================================

proptest! {
    #[test]
    fn prop_features_always_within_may(a in features_strategy(), b in features_strategy()) {
        for features in [a.join(&b), a.meet(&b), a.clone()] {
            prop_assert!(features.always().is_subset(features.may()));
        }
    }

    #[test]
    fn prop_features_join_meet_bounds(a in features_strategy(), b in features_strategy()) {
        let joined = a.join(&b);
        prop_assert!(a.leq(&joined) && b.leq(&joined));
        let met = a.meet(&b);
        prop_assert!(met.leq(&a) && met.leq(&b));
    }

    #[test]
    fn prop_features_add_keeps_always(a in features_strategy(), b in features_strategy()) {
        let mut added = a.clone();
        added.add(&b);
        prop_assert!(a.always().is_subset(added.always()));
        prop_assert!(b.always().is_subset(added.always()));
    }
}
