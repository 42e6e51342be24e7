//! Mage ability recipes.
//!
//! Each recipe turns the caster's position into the producers to spawn.
//! Recipes are pure; [`super::cast_abilities`] does the spawning.

use std::time::Duration;

use bevy::prelude::*;

use super::buff::{buff_icon, Buff};
use super::error::AbilityError;
use super::producer::{
    arc_to, frame_length, hold_for, line_to, start_at, then_drop, with_buff, with_label,
    with_particles, with_renderable, with_size, Producer,
};
use super::AbilityId;
use crate::collision::CollisionLabel;
use crate::particles::{ParticleShape, ParticleSpec, Range};
use crate::render::Renderable;

const BANNER_SHEET: &str = "16x32/banner.png";
const BANNER_FRAMES: [u32; 14] = [0, 0, 1, 0, 2, 0, 3, 0, 0, 1, 1, 1, 2, 1];

pub fn recipe(id: AbilityId, origin: Vec2) -> Result<Vec<Producer>, AbilityError> {
    match id {
        AbilityId::Fireball => Ok(vec![fireball(origin, 400.0, 60)]),
        AbilityId::FireStorm => Ok(vec![
            fireball(origin, 200.0, 40),
            fireball(origin, 300.0, 50),
            fireball(origin, 400.0, 60),
        ]),
        AbilityId::FrostBolt => Ok(vec![frost_bolt(origin)]),
        AbilityId::Blizzard => Ok(vec![blizzard(origin)]),
        AbilityId::Invulnerability => invulnerability(origin).map(|p| vec![p]),
        AbilityId::Rez => rez(origin).map(|p| vec![p]),
        AbilityId::Slow => Ok(vec![slow(origin)]),
        AbilityId::CooldownRework => Ok(vec![cooldown_rework(origin)]),
    }
}

fn banner() -> Result<Renderable, AbilityError> {
    Ok(Renderable::sheet_sequence(
        BANNER_SHEET,
        16,
        32,
        5.0,
        &BANNER_FRAMES,
    )?)
}

fn fire_trail() -> ParticleSpec {
    ParticleSpec::default()
        .with_colors(
            [255, 90, 0, 255],
            [0, 60, 0, 0],
            [80, 0, 0, 0],
            [0, 0, 0, 0],
        )
        .with_shape(ParticleShape::Circle)
        .with_size(Range::new(4, 8))
        .with_end_size(Range::constant(1))
        .with_speed(Range::new(0.5, 1.5))
        .with_lifespan(Range::constant(12.0))
}

fn frost_trail() -> ParticleSpec {
    ParticleSpec::default()
        .with_colors(
            [150, 200, 255, 255],
            [40, 40, 0, 0],
            [255, 255, 255, 0],
            [0, 0, 0, 0],
        )
        .with_shape(ParticleShape::Diamond)
        .with_size(Range::constant(6))
        .with_end_size(Range::constant(2))
        .with_lifespan(Range::constant(20.0))
}

fn fireball(origin: Vec2, range: f32, frames: usize) -> Producer {
    Producer::default().with_all([
        start_at(origin),
        arc_to(origin + Vec2::new(range, 0.0)),
        frame_length(frames),
        with_size(8.0, 8.0),
        with_renderable(Renderable::color_box(8, 8, [200, 10, 0, 255])),
        with_particles(fire_trail()),
        with_label(CollisionLabel::EffectsEnemy),
    ])
}

fn frost_bolt(origin: Vec2) -> Producer {
    Producer::default().with_all([
        start_at(origin),
        line_to(origin + Vec2::new(500.0, 0.0)),
        frame_length(50),
        with_size(8.0, 4.0),
        with_renderable(Renderable::color_box(8, 4, [47, 47, 200, 255])),
        with_particles(frost_trail()),
        with_label(CollisionLabel::EffectsEnemy),
        with_buff(Buff::slowed(
            buff_icon([47, 47, 200, 255]),
            Duration::from_secs(3),
        )),
    ])
}

fn blizzard(origin: Vec2) -> Producer {
    let landing = origin + Vec2::new(250.0, 0.0);
    let field = Producer::default().with_all([
        with_size(64.0, 16.0),
        with_renderable(Renderable::color_box(64, 16, [200, 230, 255, 160])),
        with_label(CollisionLabel::EffectsEnemy),
        with_buff(Buff::frozen(
            buff_icon([200, 230, 255, 255]),
            Duration::from_secs(2),
        )),
        hold_for(120),
    ]);
    Producer::default().with_all([
        start_at(landing - Vec2::new(0.0, 150.0)),
        line_to(landing),
        frame_length(30),
        with_particles(frost_trail().with_shape(ParticleShape::Circle)),
        then_drop(field),
    ])
}

/// Run a particle trail 600px ahead and plant a banner that makes the party
/// invulnerable for six seconds.
fn invulnerability(origin: Vec2) -> Result<Producer, AbilityError> {
    let banner = Producer::default().with_all([
        with_renderable(banner()?),
        with_size(16.0, 32.0),
        with_label(CollisionLabel::EffectsPlayer),
        with_buff(Buff::invulnerable(
            buff_icon([250, 250, 0, 255]),
            Duration::from_secs(6),
        )),
    ]);

    let trail = ParticleSpec::default()
        .with_colors(
            [255, 255, 0, 255],
            [0, 0, 0, 0],
            [125, 125, 125, 125],
            [0, 0, 0, 0],
        )
        .with_shape(ParticleShape::Diamond)
        .with_size(Range::constant(10))
        .with_end_size(Range::constant(5))
        .with_speed(Range::constant(1.0))
        .with_lifespan(Range::constant(15.0));

    Ok(Producer::default().with_all([
        start_at(origin),
        line_to(origin + Vec2::new(600.0, 0.0)),
        with_particles(trail),
        then_drop(banner),
    ]))
}

fn rez(origin: Vec2) -> Result<Producer, AbilityError> {
    Ok(Producer::default().with_all([
        start_at(origin),
        with_renderable(banner()?.scaled(1.5, 1.5)),
        with_size(24.0, 48.0),
        with_label(CollisionLabel::EffectsPlayer),
        with_buff(Buff::revived(
            buff_icon([190, 190, 190, 255]),
            Duration::from_secs(1),
        )),
        hold_for(60),
    ]))
}

fn slow(origin: Vec2) -> Producer {
    Producer::default().with_all([
        start_at(origin),
        line_to(origin + Vec2::new(450.0, 0.0)),
        frame_length(70),
        with_size(12.0, 12.0),
        with_particles(
            ParticleSpec::default()
                .with_colors([100, 240, 100, 255], [0, 0, 0, 0], [0, 80, 0, 0], [0, 0, 0, 0])
                .with_size(Range::constant(4)),
        ),
        with_label(CollisionLabel::EffectsEnemy),
        with_buff(Buff::slowed(
            buff_icon([100, 240, 100, 255]),
            Duration::from_secs(5),
        )),
    ])
}

fn cooldown_rework(origin: Vec2) -> Producer {
    Producer::default().with_all([
        start_at(origin),
        with_size(48.0, 48.0),
        with_particles(
            ParticleSpec::default()
                .with_colors([100, 240, 100, 255], [0, 0, 0, 0], [255, 255, 255, 0], [0, 0, 0, 0])
                .with_shape(ParticleShape::Circle),
        ),
        with_label(CollisionLabel::EffectsPlayer),
        with_buff(Buff::hastened(
            buff_icon([100, 240, 100, 255]),
            Duration::from_secs(8),
        )),
        hold_for(90),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::buff::BuffKind;
    use crate::abilities::path::PathShape;
    use crate::abilities::producer::FollowUp;

    #[test]
    fn test_every_recipe_builds() {
        for id in AbilityId::ALL {
            let producers = recipe(id, Vec2::new(100.0, 200.0)).unwrap();
            assert!(!producers.is_empty(), "{id:?} produced nothing");
            for p in producers {
                assert!(p.plan().is_ok(), "{id:?} has an unplannable path");
            }
        }
    }

    #[test]
    fn test_invulnerability_drops_banner() {
        let origin = Vec2::new(50.0, 120.0);
        let trail = recipe(AbilityId::Invulnerability, origin).unwrap().remove(0);
        assert_eq!(trail.end, Some(Vec2::new(650.0, 120.0)));
        assert_eq!(trail.shape, PathShape::Straight);
        assert_eq!(trail.frames, 100);
        assert!(trail.particles.is_some());

        let Some(FollowUp::Drop(banner)) = trail.follow_up else {
            panic!("expected a dropped banner");
        };
        assert_eq!(banner.label, CollisionLabel::EffectsPlayer);
        assert_eq!(banner.end, None, "banner stays where it lands");
        assert!(banner.should_persist());
        assert_eq!(banner.buffs.len(), 1);
        assert_eq!(banner.buffs[0].kind, BuffKind::Invulnerable);
        assert_eq!(banner.buffs[0].duration, Duration::from_secs(6));
        assert_eq!(banner.renderable.as_ref().unwrap().frame_count(), 7);
    }

    #[test]
    fn test_fire_storm_fans_out() {
        let producers = recipe(AbilityId::FireStorm, Vec2::ZERO + Vec2::new(0.0, 300.0)).unwrap();
        let ends: Vec<f32> = producers.iter().map(|p| p.end.unwrap().x).collect();
        assert_eq!(ends, vec![200.0, 300.0, 400.0]);
        assert!(producers.iter().all(|p| p.shape == PathShape::Arc));
    }

    #[test]
    fn test_lingering_field_resolves() {
        let origin = Vec2::new(0.0, -1.0);
        let field = recipe(AbilityId::CooldownRework, origin).unwrap().remove(0);
        assert!(field.hold);
        assert_eq!(field.frames, 90);
        let plan = field.plan().unwrap().unwrap();
        assert_eq!(plan.deltas.len(), 89);
        assert_eq!(plan.positions.last(), Some(&origin));
    }
}
