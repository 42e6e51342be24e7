//! Live products: spawned ability effects that travel along a precomputed
//! path and resolve exactly once.
//!
//! Lifecycle:
//!   Traveling --(last delta applied)--> Resolved
//!   Idle (no end point)  ---------------> Resolved only via [`DestroyProduct`]
//!   any state --[`DestroyProduct`]-----> Resolved
//!
//! Resolution runs the follow-up, stops the particle source, despawns the
//! product and broadcasts [`AbilityResolved`]. A product that already
//! resolved ignores any further resolution attempt. Discarding (scene exit)
//! is the same teardown without the follow-up.

use bevy::ecs::entity::Entities;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::buff::{ActiveBuffs, Buff};
use super::producer::{start_at, FollowUp};
use crate::collision::{overlaps, position_of, Collider, CollisionLabel};
use crate::particles::{ParticleSource, ParticleSourceStopped};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductState {
    /// Walking its path, one delta per frame tick
    Traveling,
    /// Stationary; waits for an explicit destroy
    Idle,
    /// Torn down; nothing else may happen to it
    Resolved,
}

#[derive(Component, Debug)]
pub struct Product {
    state: ProductState,
    /// Index of the next delta to apply
    position: usize,
    should_persist: bool,
    follow_up: Option<FollowUp>,
    buffs: Vec<Buff>,
    particle_source: Option<Entity>,
    /// Characters that already received this product's buffs
    granted: Vec<Entity>,
}

/// Per-tick displacements for a traveling product.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct ProductPath {
    deltas: Vec<Vec2>,
    /// Last sampled position; the product lands exactly here
    target: Vec2,
}

impl ProductPath {
    pub fn new(deltas: Vec<Vec2>, target: Vec2) -> Self {
        Self { deltas, target }
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }
}

/// Outcome of one tick of motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub delta: Option<Vec2>,
    pub complete: bool,
}

impl Product {
    pub fn new(
        moving: bool,
        should_persist: bool,
        follow_up: Option<FollowUp>,
        buffs: Vec<Buff>,
        particle_source: Option<Entity>,
    ) -> Self {
        Self {
            state: if moving {
                ProductState::Traveling
            } else {
                ProductState::Idle
            },
            position: 0,
            should_persist,
            follow_up,
            buffs,
            particle_source,
            granted: Vec::new(),
        }
    }

    pub fn state(&self) -> ProductState {
        self.state
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_resolved(&self) -> bool {
        self.state == ProductState::Resolved
    }

    pub fn should_persist(&self) -> bool {
        self.should_persist
    }

    pub fn buffs(&self) -> &[Buff] {
        &self.buffs
    }

    pub fn particle_source(&self) -> Option<Entity> {
        self.particle_source
    }

    /// Take the next delta along `path`. Only meaningful while traveling.
    pub fn advance(&mut self, path: &ProductPath) -> Step {
        let delta = path.deltas.get(self.position).copied();
        if delta.is_some() {
            self.position += 1;
        }
        Step {
            delta,
            complete: self.position >= path.deltas.len(),
        }
    }

    /// Mark the product resolved. Returns the follow-up to run, or `None`
    /// if the product was already resolved.
    fn begin_teardown(&mut self) -> Option<Option<FollowUp>> {
        if self.is_resolved() {
            return None;
        }
        self.state = ProductState::Resolved;
        Some(self.follow_up.take())
    }
}

/// Request: tear a product down now (collision hit, scene exit, ...)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestroyProduct(pub Entity);

/// Broadcast: a product resolved
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AbilityResolved {
    /// Characters resulting from the resolution; the product itself today
    pub characters: Vec<Entity>,
    pub position: Vec2,
    pub buffs: Vec<Buff>,
}

/// Broadcast: an ability (or a follow-up drop) spawned characters
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AbilityFired {
    pub caster: Option<Entity>,
    pub characters: Vec<Entity>,
}

/// Everything needed to move a product's emitter and tear a product down.
#[derive(SystemParam)]
pub struct ProductTeardown<'w, 's> {
    commands: Commands<'w, 's>,
    sources: Query<'w, 's, (&'static mut ParticleSource, &'static mut Transform), Without<Product>>,
    resolved: EventWriter<'w, AbilityResolved>,
    fired: EventWriter<'w, AbilityFired>,
    stopped: EventWriter<'w, ParticleSourceStopped>,
}

impl ProductTeardown<'_, '_> {
    fn shift_source(&mut self, source: Entity, delta: Vec2) {
        if let Ok((_, mut transform)) = self.sources.get_mut(source) {
            transform.translation += delta.extend(0.0);
        }
    }

    fn resolve(&mut self, entity: Entity, product: &mut Product, at: Vec2) {
        self.tear_down(entity, product, at, true);
    }

    fn tear_down(&mut self, entity: Entity, product: &mut Product, at: Vec2, follow_up: bool) {
        let Some(next) = product.begin_teardown() else {
            debug!(product = ?entity, "product already resolved");
            return;
        };
        let next = if follow_up { next } else { None };

        match next {
            Some(FollowUp::Call(f)) => f(at),
            Some(FollowUp::Drop(next)) => {
                match (*next).produce(&mut self.commands, [start_at(at)]) {
                    Ok(characters) => {
                        self.fired.send(AbilityFired {
                            caster: None,
                            characters,
                        });
                    }
                    Err(err) => error!(product = ?entity, "follow-up drop failed: {err}"),
                }
            }
            None => {}
        }

        if let Some(source) = product.particle_source {
            if let Ok((mut emitter, _)) = self.sources.get_mut(source) {
                if emitter.stop() {
                    self.stopped.send(ParticleSourceStopped {
                        product: entity,
                        source,
                    });
                }
            }
            if let Some(mut emitter) = self.commands.get_entity(source) {
                emitter.despawn();
            }
        }
        self.commands.entity(entity).despawn();

        debug!(product = ?entity, position = ?at, "product resolved");
        self.resolved.send(AbilityResolved {
            characters: vec![entity],
            position: at,
            buffs: product.buffs.clone(),
        });
    }
}

/// System: one frame tick for every traveling product
pub fn advance_products(
    mut products: Query<(Entity, &mut Product, &mut Transform, &ProductPath)>,
    mut teardown: ProductTeardown,
) {
    for (entity, mut product, mut transform, path) in &mut products {
        if product.state() != ProductState::Traveling {
            continue;
        }
        let step = product.advance(path);
        if let Some(delta) = step.delta {
            transform.translation += delta.extend(0.0);
            if let Some(source) = product.particle_source() {
                teardown.shift_source(source, delta);
            }
        }
        if step.complete {
            let z = transform.translation.z;
            transform.translation = path.target().extend(z);
            teardown.resolve(entity, &mut product, path.target());
        }
    }
}

/// System: handle explicit destroy requests
pub fn handle_destroy_requests(
    mut requests: EventReader<DestroyProduct>,
    mut products: Query<(&mut Product, &Transform)>,
    entities: &Entities,
    mut teardown: ProductTeardown,
) {
    for DestroyProduct(entity) in requests.read().copied() {
        match products.get_mut(entity) {
            Ok((mut product, transform)) => {
                let at = position_of(transform);
                teardown.resolve(entity, &mut product, at);
            }
            Err(_) if entities.contains(entity) => {
                error!(?entity, "non-product entity sent to product teardown");
            }
            Err(_) => debug!(?entity, "destroy request for a product that no longer exists"),
        }
    }
}

/// System: tear down every live product without running follow-ups.
///
/// Runs when a scene ends so nothing a product would have dropped outlives it.
pub fn discard_products(
    mut products: Query<(Entity, &mut Product, &Transform)>,
    mut teardown: ProductTeardown,
) {
    let mut count = 0;
    for (entity, mut product, transform) in &mut products {
        if product.is_resolved() {
            continue;
        }
        teardown.tear_down(entity, &mut product, position_of(transform), false);
        count += 1;
    }
    if count > 0 {
        debug!(count, "products discarded");
    }
}

/// System: give a product's buffs to the characters it touches, once each
pub fn grant_buffs_on_contact(
    mut products: Query<(&mut Product, &Transform, &Collider)>,
    mut characters: Query<(Entity, &Transform, &Collider, &mut ActiveBuffs), Without<Product>>,
) {
    for (mut product, transform, collider) in &mut products {
        if product.buffs.is_empty() || product.is_resolved() {
            continue;
        }
        let target = match collider.label {
            CollisionLabel::EffectsPlayer => CollisionLabel::Player,
            CollisionLabel::EffectsEnemy => CollisionLabel::Enemy,
            _ => continue,
        };
        let bounds = collider.bounds(position_of(transform));

        for (character, char_transform, char_collider, mut buffs) in &mut characters {
            if char_collider.label != target || product.granted.contains(&character) {
                continue;
            }
            if !overlaps(bounds, char_collider.bounds(position_of(char_transform))) {
                continue;
            }
            for buff in &product.buffs {
                buffs.apply(buff.clone());
            }
            product.granted.push(character);
            debug!(?character, count = product.buffs.len(), "buffs granted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(n: usize) -> ProductPath {
        ProductPath::new(vec![Vec2::new(1.0, 0.0); n], Vec2::new(n as f32, 0.0))
    }

    #[test]
    fn test_advance_consumes_every_delta() {
        let mut product = Product::new(true, true, None, vec![], None);
        let path = path(3);
        let steps: Vec<Step> = (0..3).map(|_| product.advance(&path)).collect();
        assert!(steps.iter().all(|s| s.delta == Some(Vec2::new(1.0, 0.0))));
        assert!(!steps[0].complete);
        assert!(!steps[1].complete);
        assert!(steps[2].complete);
        assert_eq!(product.position(), 3);
    }

    #[test]
    fn test_empty_path_completes_immediately() {
        let mut product = Product::new(true, true, None, vec![], None);
        let step = product.advance(&path(0));
        assert_eq!(
            step,
            Step {
                delta: None,
                complete: true
            }
        );
    }

    #[test]
    fn test_teardown_is_one_shot() {
        let follow_up = FollowUp::Call(std::sync::Arc::new(|_| {}));
        let mut product = Product::new(false, false, Some(follow_up), vec![], None);
        assert_eq!(product.state(), ProductState::Idle);
        assert!(matches!(product.begin_teardown(), Some(Some(FollowUp::Call(_)))));
        assert!(product.is_resolved());
        assert!(product.begin_teardown().is_none());
    }
}
