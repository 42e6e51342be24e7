use bevy::math::Vec2;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use banner_core::abilities::mage::recipe;
use banner_core::abilities::path::{PathPlan, PathShape};
use banner_core::abilities::AbilityId;
use banner_core::run::{RunSeed, SectionGenerator};

fn bench_path_plans(c: &mut Criterion) {
    c.bench_function("plan_straight_100", |b| {
        b.iter(|| {
            PathPlan::new(
                black_box(Vec2::ZERO),
                black_box(Vec2::new(600.0, 0.0)),
                PathShape::Straight,
                black_box(100),
            )
        })
    });

    c.bench_function("plan_arc_100", |b| {
        b.iter(|| {
            PathPlan::new(
                black_box(Vec2::new(0.0, 100.0)),
                black_box(Vec2::new(600.0, 100.0)),
                PathShape::Arc,
                black_box(100),
            )
        })
    });
}

fn bench_recipes(c: &mut Criterion) {
    c.bench_function("recipe_all_abilities", |b| {
        b.iter(|| {
            for id in AbilityId::ALL {
                let _ = recipe(black_box(id), black_box(Vec2::new(40.0, 200.0)));
            }
        })
    });
}

fn bench_sections(c: &mut Criterion) {
    let seed = RunSeed::new(87);
    c.bench_function("generate_section", |b| {
        b.iter(|| SectionGenerator::new(&seed, black_box(3), 480.0).generate())
    });

    c.bench_function("section_hash", |b| {
        b.iter(|| seed.section_hash(black_box(3)))
    });
}

criterion_group!(benches, bench_path_plans, bench_recipes, bench_sections);
criterion_main!(benches);
