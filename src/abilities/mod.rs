//! Abilities: cooldown-gated recipes that spawn products.
//!
//! A cast goes `CastAbility` -> cooldown check -> recipe -> one or more
//! [`producer::Producer`]s spawned as [`product::Product`] entities. Products
//! walk their path each frame tick and resolve exactly once.
//!
//! Each character holds up to two specials (see [`AbilitySlots`]).

pub mod buff;
pub mod error;
pub mod mage;
pub mod path;
pub mod producer;
pub mod product;

use std::collections::HashMap;
use std::time::Duration;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub use buff::{ActiveBuffs, Buff, BuffExpired, BuffKind};
pub use error::AbilityError;
pub use producer::{produce, Producer, ProducerOption};
pub use product::{AbilityFired, AbilityResolved, DestroyProduct, Product, ProductState};

use crate::collision::position_of;
use crate::constants::ABILITY_ICON_SIZE;
use crate::particles::ParticleSourceStopped;
use crate::render::Renderable;

/// Share of every running cooldown that a Cooldown Rework cast removes
pub const REWORK_REDUCTION: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityId {
    Fireball,
    FireStorm,
    FrostBolt,
    Blizzard,
    Invulnerability,
    Rez,
    Slow,
    CooldownRework,
}

impl AbilityId {
    pub const ALL: [AbilityId; 8] = [
        AbilityId::Fireball,
        AbilityId::FireStorm,
        AbilityId::FrostBolt,
        AbilityId::Blizzard,
        AbilityId::Invulnerability,
        AbilityId::Rez,
        AbilityId::Slow,
        AbilityId::CooldownRework,
    ];
}

/// Static description of a castable ability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub id: AbilityId,
    pub name: String,
    pub icon: Renderable,
    pub cooldown: Duration,
}

impl Ability {
    pub fn new(id: AbilityId) -> Self {
        let (name, color, secs) = match id {
            AbilityId::Fireball => ("Fireball", [200, 10, 0, 255], 10),
            AbilityId::FireStorm => ("Fire Storm", [230, 120, 0, 255], 25),
            AbilityId::FrostBolt => ("Frost Bolt", [47, 47, 200, 255], 8),
            AbilityId::Blizzard => ("Blizzard", [200, 230, 255, 255], 30),
            AbilityId::Invulnerability => ("Invulnerability", [200, 200, 125, 255], 10),
            AbilityId::Rez => ("Rez", [190, 190, 190, 255], 45),
            AbilityId::Slow => ("Slow", [100, 240, 100, 255], 12),
            AbilityId::CooldownRework => ("Cooldown Rework", [60, 180, 60, 255], 40),
        };
        Self {
            id,
            name: name.to_string(),
            icon: Renderable::color_box(ABILITY_ICON_SIZE, ABILITY_ICON_SIZE, color),
            cooldown: Duration::from_secs(secs),
        }
    }

    /// Producers this ability spawns when cast from `origin`.
    pub fn recipe(&self, origin: Vec2) -> Result<Vec<Producer>, AbilityError> {
        mage::recipe(self.id, origin)
    }
}

/// Remaining cooldown per ability for one character.
#[derive(Component, Debug, Clone, Default)]
pub struct AbilityCooldowns {
    cooldowns: HashMap<AbilityId, Duration>,
}

impl AbilityCooldowns {
    pub fn is_ready(&self, id: AbilityId) -> bool {
        self.remaining(id).is_zero()
    }

    pub fn start(&mut self, ability: &Ability) {
        self.cooldowns.insert(ability.id, ability.cooldown);
    }

    pub fn tick(&mut self, dt: Duration) {
        for cd in self.cooldowns.values_mut() {
            *cd = cd.saturating_sub(dt);
        }
    }

    pub fn remaining(&self, id: AbilityId) -> Duration {
        self.cooldowns.get(&id).copied().unwrap_or_default()
    }

    /// Cut every running cooldown by `fraction` (0.25 = 25% shorter).
    pub fn reduce(&mut self, fraction: f32) {
        let keep = (1.0 - fraction).clamp(0.0, 1.0);
        for cd in self.cooldowns.values_mut() {
            *cd = cd.mul_f32(keep);
        }
    }

    /// Start `ability`'s cooldown after a successful cast. Cooldown Rework
    /// first cuts everything already running.
    pub fn commit(&mut self, ability: &Ability) {
        if ability.id == AbilityId::CooldownRework {
            self.reduce(REWORK_REDUCTION);
        }
        self.start(ability);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilitySlot {
    Special1,
    Special2,
}

/// The two specials a character can cast.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct AbilitySlots {
    pub special1: Ability,
    pub special2: Ability,
}

impl AbilitySlots {
    pub fn new(special1: AbilityId, special2: AbilityId) -> Self {
        Self {
            special1: Ability::new(special1),
            special2: Ability::new(special2),
        }
    }

    pub fn get(&self, slot: AbilitySlot) -> &Ability {
        match slot {
            AbilitySlot::Special1 => &self.special1,
            AbilitySlot::Special2 => &self.special2,
        }
    }
}

/// Request: `caster` uses the ability in `slot`
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastAbility {
    pub caster: Entity,
    pub slot: AbilitySlot,
}

/// Check the cooldown and build every producer for a cast.
///
/// Nothing is spawned and the cooldown is not started when any producer of
/// the recipe cannot plan its path.
pub fn prepare_cast(
    cooldowns: &AbilityCooldowns,
    ability: &Ability,
    origin: Vec2,
) -> Result<Vec<Producer>, AbilityError> {
    if !cooldowns.is_ready(ability.id) {
        return Err(AbilityError::OnCooldown {
            id: ability.id,
            remaining_secs: cooldowns.remaining(ability.id).as_secs_f32(),
        });
    }
    let producers = ability.recipe(origin)?;
    for producer in &producers {
        producer.plan()?;
    }
    Ok(producers)
}

/// System: turn cast requests into spawned products
pub fn cast_abilities(
    mut commands: Commands,
    mut requests: EventReader<CastAbility>,
    mut casters: Query<(&Transform, &AbilitySlots, &mut AbilityCooldowns)>,
    mut fired: EventWriter<AbilityFired>,
) {
    for cast in requests.read() {
        let Ok((transform, slots, mut cooldowns)) = casters.get_mut(cast.caster) else {
            warn!(caster = ?cast.caster, "cast from an entity without abilities");
            continue;
        };
        let ability = slots.get(cast.slot);
        let producers = match prepare_cast(&cooldowns, ability, position_of(transform)) {
            Ok(producers) => producers,
            Err(err @ AbilityError::OnCooldown { .. }) => {
                debug!(caster = ?cast.caster, "{err}");
                continue;
            }
            Err(err) => {
                error!(caster = ?cast.caster, ability = %ability.name, "cast failed: {err}");
                continue;
            }
        };

        let mut characters = Vec::new();
        for producer in producers {
            match producer.spawn(&mut commands) {
                Ok(entity) => characters.push(entity),
                Err(err) => error!(ability = %ability.name, "producer failed: {err}"),
            }
        }
        cooldowns.commit(ability);
        info!(caster = ?cast.caster, ability = %ability.name, products = characters.len(), "ability cast");
        fired.send(AbilityFired {
            caster: Some(cast.caster),
            characters,
        });
    }
}

/// System: count cooldowns down; hastened characters recover twice as fast
pub fn tick_cooldowns(time: Res<Time>, mut query: Query<(&mut AbilityCooldowns, Option<&ActiveBuffs>)>) {
    let dt = time.delta();
    for (mut cooldowns, buffs) in &mut query {
        let hastened = buffs.is_some_and(|b| b.has(BuffKind::Hastened));
        cooldowns.tick(if hastened { dt * 2 } else { dt });
    }
}

pub struct AbilitiesPlugin;

impl Plugin for AbilitiesPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CastAbility>()
            .add_event::<DestroyProduct>()
            .add_event::<AbilityFired>()
            .add_event::<AbilityResolved>()
            .add_event::<ParticleSourceStopped>()
            .add_event::<BuffExpired>()
            .add_systems(
                Update,
                (
                    cast_abilities,
                    product::handle_destroy_requests,
                    product::advance_products,
                    product::grant_buffs_on_contact,
                    buff::expire_buffs,
                    tick_cooldowns,
                )
                    .chain(),
            );
    }
}
