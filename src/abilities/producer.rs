//! Declarative product builder.
//!
//! A [`Producer`] is a plain value describing one product. Options are pure
//! `Producer -> Producer` transformations applied in call order, so a later
//! option overrides an earlier one on the same field and a partially
//! configured producer can be cloned and reused freely.

use std::fmt;
use std::sync::Arc;

use bevy::prelude::*;

use super::buff::Buff;
use super::error::AbilityError;
use super::path::{PathPlan, PathShape};
use super::product::{Product, ProductPath};
use crate::collision::{Collider, CollisionLabel};
use crate::constants::{DEFAULT_FRAMES, DEFAULT_PRODUCT_SIZE, PRODUCT_LAYER};
use crate::particles::{ParticleSource, ParticleSpec};
use crate::render::{DrawLayer, Renderable};

pub type FollowUpFn = Arc<dyn Fn(Vec2) + Send + Sync>;

/// What happens at the position where a product resolves.
#[derive(Clone)]
pub enum FollowUp {
    /// Produce another product starting at the final position
    Drop(Box<Producer>),
    /// Call back with the final position
    Call(FollowUpFn),
}

impl fmt::Debug for FollowUp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FollowUp::Drop(producer) => f.debug_tuple("Drop").field(producer).finish(),
            FollowUp::Call(_) => f.write_str("Call(..)"),
        }
    }
}

impl PartialEq for FollowUp {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FollowUp::Drop(a), FollowUp::Drop(b)) => a == b,
            (FollowUp::Call(a), FollowUp::Call(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Spawn descriptor for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct Producer {
    pub start: Vec2,
    /// `None` disables motion entirely
    pub end: Option<Vec2>,
    /// Stay at `start` for `frames` ticks, then resolve
    pub hold: bool,
    pub shape: PathShape,
    pub frames: usize,
    pub size: Vec2,
    pub renderable: Option<Renderable>,
    pub particles: Option<ParticleSpec>,
    pub label: CollisionLabel,
    pub follow_up: Option<FollowUp>,
    pub buffs: Vec<Buff>,
}

impl Default for Producer {
    fn default() -> Self {
        Self {
            start: Vec2::ZERO,
            end: None,
            hold: false,
            shape: PathShape::Straight,
            frames: DEFAULT_FRAMES,
            size: Vec2::splat(DEFAULT_PRODUCT_SIZE),
            renderable: None,
            particles: None,
            label: CollisionLabel::None,
            follow_up: None,
            buffs: Vec::new(),
        }
    }
}

/// One configuration step for a [`Producer`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProducerOption {
    StartAt(Vec2),
    LineTo(Vec2),
    ArcTo(Vec2),
    FrameLength(usize),
    HoldFor(usize),
    Size(Vec2),
    Renderable(Renderable),
    Particles(ParticleSpec),
    Label(CollisionLabel),
    Buff(Buff),
    Then(FollowUp),
    /// Apply several options in order
    And(Vec<ProducerOption>),
}

/// The zero point means "no end point"; anything else is a real target.
fn target(pt: Vec2) -> Option<Vec2> {
    (pt != Vec2::ZERO).then_some(pt)
}

impl ProducerOption {
    pub fn apply(self, mut p: Producer) -> Producer {
        match self {
            ProducerOption::StartAt(pt) => p.start = pt,
            ProducerOption::LineTo(pt) => {
                p.end = target(pt);
                p.hold = false;
                p.shape = PathShape::Straight;
            }
            ProducerOption::ArcTo(pt) => {
                p.end = target(pt);
                p.hold = false;
                p.shape = PathShape::Arc;
            }
            ProducerOption::FrameLength(frames) => p.frames = frames,
            ProducerOption::HoldFor(frames) => {
                p.end = None;
                p.hold = true;
                p.frames = frames;
            }
            ProducerOption::Size(size) => p.size = size,
            ProducerOption::Renderable(r) => p.renderable = Some(r),
            ProducerOption::Particles(spec) => p.particles = Some(spec),
            ProducerOption::Label(label) => p.label = label,
            ProducerOption::Buff(buff) => p.buffs.push(buff),
            ProducerOption::Then(follow_up) => p.follow_up = Some(follow_up),
            ProducerOption::And(opts) => {
                for opt in opts {
                    p = opt.apply(p);
                }
            }
        }
        p
    }
}

pub fn start_at(pt: Vec2) -> ProducerOption {
    ProducerOption::StartAt(pt)
}

pub fn line_to(pt: Vec2) -> ProducerOption {
    ProducerOption::LineTo(pt)
}

pub fn arc_to(pt: Vec2) -> ProducerOption {
    ProducerOption::ArcTo(pt)
}

pub fn frame_length(frames: usize) -> ProducerOption {
    ProducerOption::FrameLength(frames)
}

/// Stay wherever the product starts for `frames` ticks, then resolve.
pub fn hold_for(frames: usize) -> ProducerOption {
    ProducerOption::HoldFor(frames)
}

pub fn with_size(width: f32, height: f32) -> ProducerOption {
    ProducerOption::Size(Vec2::new(width, height))
}

pub fn with_renderable(r: Renderable) -> ProducerOption {
    ProducerOption::Renderable(r)
}

pub fn with_particles(spec: ParticleSpec) -> ProducerOption {
    ProducerOption::Particles(spec)
}

pub fn with_label(label: CollisionLabel) -> ProducerOption {
    ProducerOption::Label(label)
}

pub fn with_buff(buff: Buff) -> ProducerOption {
    ProducerOption::Buff(buff)
}

pub fn then(follow_up: FollowUp) -> ProducerOption {
    ProducerOption::Then(follow_up)
}

/// Resolve by producing `next` where this product ends.
pub fn then_drop(next: Producer) -> ProducerOption {
    ProducerOption::Then(FollowUp::Drop(Box::new(next)))
}

/// Resolve by calling `f` with the final position.
pub fn then_call(f: impl Fn(Vec2) + Send + Sync + 'static) -> ProducerOption {
    ProducerOption::Then(FollowUp::Call(Arc::new(f)))
}

pub fn and(opts: impl IntoIterator<Item = ProducerOption>) -> ProducerOption {
    ProducerOption::And(opts.into_iter().collect())
}

/// Apply `opts` to the default producer and spawn the result.
pub fn produce(
    commands: &mut Commands,
    opts: impl IntoIterator<Item = ProducerOption>,
) -> Result<Vec<Entity>, AbilityError> {
    Producer::default().produce(commands, opts)
}

impl Producer {
    pub fn with(self, opt: ProducerOption) -> Self {
        opt.apply(self)
    }

    pub fn with_all(self, opts: impl IntoIterator<Item = ProducerOption>) -> Self {
        opts.into_iter().fold(self, |p, opt| opt.apply(p))
    }

    /// A product without a follow-up is never expired by anything but its path.
    pub fn should_persist(&self) -> bool {
        self.follow_up.is_none()
    }

    /// Motion plan, or `None` for a stationary product.
    pub fn plan(&self) -> Result<Option<PathPlan>, AbilityError> {
        if self.hold {
            return Ok(Some(PathPlan::hold(self.start, self.frames)));
        }
        match self.end {
            Some(end) => Ok(Some(PathPlan::new(self.start, end, self.shape, self.frames)?)),
            None => Ok(None),
        }
    }

    /// Apply `opts`, then spawn exactly one product.
    ///
    /// Returns the spawned characters; always one today, a list so abilities
    /// that split into several products keep the same signature.
    pub fn produce(
        self,
        commands: &mut Commands,
        opts: impl IntoIterator<Item = ProducerOption>,
    ) -> Result<Vec<Entity>, AbilityError> {
        let entity = self.with_all(opts).spawn(commands)?;
        Ok(vec![entity])
    }

    /// Spawn this producer as configured.
    pub fn spawn(self, commands: &mut Commands) -> Result<Entity, AbilityError> {
        let plan = self.plan().inspect_err(|err| {
            error!(start = ?self.start, end = ?self.end, "product not spawned: {err}");
        })?;

        let should_persist = self.should_persist();
        let transform = Transform::from_translation(self.start.extend(0.0));
        let source = self.particles.map(|spec| {
            commands
                .spawn((ParticleSource::start(spec, PRODUCT_LAYER), transform))
                .id()
        });

        let product = Product::new(
            plan.is_some(),
            should_persist,
            self.follow_up,
            self.buffs,
            source,
        );
        let mut entity = commands.spawn((product, transform, Collider::new(self.label, self.size)));
        if let Some(renderable) = self.renderable {
            entity.insert((renderable, DrawLayer(PRODUCT_LAYER)));
        }
        if let Some(plan) = plan {
            let target = plan.positions.last().copied().unwrap_or(self.start);
            entity.insert(ProductPath::new(plan.deltas, target));
        }

        let id = entity.id();
        debug!(product = ?id, start = ?self.start, end = ?self.end, "product spawned");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::abilities::buff::{buff_icon, BuffKind};

    fn shield() -> Buff {
        Buff::invulnerable(buff_icon([250, 250, 0, 255]), Duration::from_secs(6))
    }

    #[test]
    fn test_defaults() {
        let p = Producer::default();
        assert_eq!(p.frames, 100);
        assert_eq!(p.size, Vec2::ONE);
        assert!(p.renderable.is_none());
        assert!(p.particles.is_none());
        assert!(p.buffs.is_empty());
        assert!(p.follow_up.is_none());
        assert!(p.should_persist());
    }

    #[test]
    fn test_later_option_wins() {
        let p = Producer::default().with_all([
            line_to(Vec2::new(10.0, 0.0)),
            arc_to(Vec2::new(20.0, 5.0)),
            frame_length(10),
            frame_length(30),
        ]);
        assert_eq!(p.end, Some(Vec2::new(20.0, 5.0)));
        assert_eq!(p.shape, PathShape::Arc);
        assert_eq!(p.frames, 30);
    }

    #[test]
    fn test_zero_end_is_unset() {
        let p = Producer::default().with_all([line_to(Vec2::new(5.0, 5.0)), line_to(Vec2::ZERO)]);
        assert_eq!(p.end, None);
        assert_eq!(p.plan(), Ok(None));
    }

    #[test]
    fn test_and_matches_sequence() {
        let opts = vec![
            start_at(Vec2::new(1.0, 2.0)),
            with_label(CollisionLabel::EffectsPlayer),
            with_buff(shield()),
        ];
        let combined = Producer::default().with(and(opts.clone()));
        let sequential = Producer::default().with_all(opts);
        assert_eq!(combined, sequential);
    }

    #[test]
    fn test_with_buff_does_not_alias_base() {
        let base = Producer::default().with(with_buff(shield()));
        let a = base.clone().with(with_buff(shield()));
        let b = base
            .clone()
            .with(with_buff(Buff::slowed(buff_icon([0, 0, 255, 255]), Duration::from_secs(1))));

        assert_eq!(base.buffs.len(), 1);
        assert_eq!(a.buffs.len(), 2);
        assert_eq!(b.buffs.len(), 2);
        assert_eq!(a.buffs[1].kind, BuffKind::Invulnerable);
        assert_eq!(b.buffs[1].kind, BuffKind::Slowed);
    }

    #[test]
    fn test_then_clears_persistence() {
        let p = Producer::default().with(then_call(|_| {}));
        assert!(!p.should_persist());
    }

    #[test]
    fn test_follow_up_equality() {
        let f = then_call(|_| {});
        let p1 = Producer::default().with(f.clone());
        let p2 = Producer::default().with(f);
        let p3 = Producer::default().with(then_call(|_| {}));
        assert_eq!(p1, p2, "same callback handle");
        assert_ne!(p1, p3, "different callbacks");
    }

    #[test]
    fn test_hold_follows_start_and_yields_to_line() {
        let held = Producer::default().with_all([hold_for(30), start_at(Vec2::new(0.0, -1.0))]);
        let plan = held.plan().unwrap().unwrap();
        assert_eq!(plan.positions.last(), Some(&Vec2::new(0.0, -1.0)));
        assert_eq!(plan.deltas.len(), 29);

        let moved = held.with(line_to(Vec2::new(40.0, 0.0)));
        assert!(!moved.hold);
        assert_eq!(moved.end, Some(Vec2::new(40.0, 0.0)));
    }

    #[test]
    fn test_degenerate_plan_is_error() {
        let p = Producer::default().with_all([
            start_at(Vec2::new(3.0, 3.0)),
            line_to(Vec2::new(3.0, 3.0)),
        ]);
        assert!(matches!(p.plan(), Err(AbilityError::Path(_))));
    }
}
