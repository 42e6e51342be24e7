//! Property-based tests using proptest
//!
//! Invariants that must hold for all inputs:
//! - Path plans: position/delta counts, telescoping sum, endpoints
//! - Arc plans never leave the start/end x span
//! - Producer options: `and` is the same as applying in sequence
//! - Buff lists never alias between producers built from one base
//! - Section generation is deterministic per seed + index

use std::time::Duration;

use bevy::math::Vec2;
use proptest::prelude::*;

use banner_core::abilities::buff::buff_icon;
use banner_core::abilities::path::{PathPlan, PathShape};
use banner_core::abilities::producer::{
    and, arc_to, frame_length, line_to, start_at, with_buff, with_label, with_size,
};
use banner_core::abilities::{Buff, Producer, ProducerOption};
use banner_core::collision::CollisionLabel;
use banner_core::run::{RunSeed, SectionGenerator};

fn point() -> impl Strategy<Value = Vec2> {
    (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Vec2::new(x, y))
}

fn option() -> impl Strategy<Value = ProducerOption> {
    prop_oneof![
        point().prop_map(start_at),
        point().prop_map(line_to),
        point().prop_map(arc_to),
        (0usize..300).prop_map(frame_length),
        (1.0f32..64.0, 1.0f32..64.0).prop_map(|(w, h)| with_size(w, h)),
        Just(with_label(CollisionLabel::EffectsEnemy)),
        (1u64..20).prop_map(|secs| with_buff(Buff::slowed(
            buff_icon([0, 0, 255, 255]),
            Duration::from_secs(secs)
        ))),
    ]
}

// ============================================================
// Path Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_straight_plan_telescopes(start in point(), end in point(), frames in 2usize..400) {
        prop_assume!(start.distance(end) > 1.0);
        let plan = PathPlan::new(start, end, PathShape::Straight, frames).unwrap();
        prop_assert_eq!(plan.positions.len(), frames);
        prop_assert_eq!(plan.deltas.len(), frames - 1);

        let first = plan.positions[0];
        let last = plan.positions[frames - 1];
        prop_assert!(first.distance(start) < 1e-3);
        prop_assert!(last.distance(end) < 1e-2);
        let sum = plan.total_displacement();
        prop_assert!(sum.distance(last - first) < 0.1, "sum {sum:?} vs {:?}", last - first);
    }

    #[test]
    fn prop_arc_stays_within_x_span(
        x0 in -500.0f32..500.0,
        x1 in -500.0f32..500.0,
        y in 1.0f32..400.0,
        frames in 2usize..200,
    ) {
        prop_assume!((x1 - x0).abs() > 1.0);
        let plan = PathPlan::new(Vec2::new(x0, y), Vec2::new(x1, y), PathShape::Arc, frames).unwrap();
        // Quadratic curves stay inside the hull of their control points
        let (lo, hi) = (x0.min(x1).min((x1 - x0) / 2.0), x0.max(x1).max((x1 - x0) / 2.0));
        for p in &plan.positions {
            prop_assert!(p.x >= lo - 1e-2 && p.x <= hi + 1e-2);
        }
    }

    #[test]
    fn prop_short_plans_have_no_deltas(start in point(), end in point(), frames in 0usize..2) {
        prop_assume!(start.distance(end) > 1.0);
        let plan = PathPlan::new(start, end, PathShape::Straight, frames).unwrap();
        prop_assert!(plan.deltas.is_empty());
        prop_assert_eq!(plan.positions.len(), frames);
    }
}

// ============================================================
// Producer Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_and_equals_sequence(opts in prop::collection::vec(option(), 0..12)) {
        let combined = Producer::default().with(and(opts.clone()));
        let sequential = Producer::default().with_all(opts);
        prop_assert_eq!(combined, sequential);
    }

    #[test]
    fn prop_split_application_is_associative(
        a in prop::collection::vec(option(), 0..6),
        b in prop::collection::vec(option(), 0..6),
    ) {
        let split = Producer::default().with_all(a.clone()).with_all(b.clone());
        let whole = Producer::default().with_all(a.into_iter().chain(b));
        prop_assert_eq!(split, whole);
    }

    #[test]
    fn prop_buff_lists_never_alias(base_buffs in 0usize..5, secs_a in 1u64..10, secs_b in 11u64..20) {
        let shield = |secs| Buff::invulnerable(buff_icon([250, 250, 0, 255]), Duration::from_secs(secs));
        let base = (0..base_buffs).fold(Producer::default(), |p, _| p.with(with_buff(shield(1))));
        let a = base.clone().with(with_buff(shield(secs_a)));
        let b = base.clone().with(with_buff(shield(secs_b)));

        prop_assert_eq!(base.buffs.len(), base_buffs);
        prop_assert_eq!(a.buffs.len(), base_buffs + 1);
        prop_assert_eq!(b.buffs.len(), base_buffs + 1);
        prop_assert_eq!(a.buffs[base_buffs].duration, Duration::from_secs(secs_a));
        prop_assert_eq!(b.buffs[base_buffs].duration, Duration::from_secs(secs_b));
    }
}

// ============================================================
// Section Generation Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_sections_are_deterministic(seed in any::<u64>(), index in 0u64..100) {
        let seed = RunSeed::new(seed);
        let a = SectionGenerator::new(&seed, index, 480.0).generate();
        let b = SectionGenerator::new(&seed, index, 480.0).generate();
        prop_assert_eq!(a, b);
    }
}
