//! Timed status effects attached to characters.
//!
//! Buffs stack freely: applying the same buff twice keeps two entries, each
//! with its own timer. What stacking means for a given kind is up to the
//! systems that read [`ActiveBuffs`].

use std::time::Duration;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::BUFF_ICON_SIZE;
use crate::render::Renderable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuffKind {
    /// Ignores incoming damage
    Invulnerable,
    /// Moves at reduced speed
    Slowed,
    /// Cannot move
    Frozen,
    /// Ability cooldowns recover faster
    Hastened,
    /// Brought back from a knocked-out state
    Revived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub kind: BuffKind,
    pub icon: Renderable,
    pub duration: Duration,
}

impl Buff {
    pub fn new(kind: BuffKind, icon: Renderable, duration: Duration) -> Self {
        Self {
            kind,
            icon,
            duration,
        }
    }

    pub fn invulnerable(icon: Renderable, duration: Duration) -> Self {
        Self::new(BuffKind::Invulnerable, icon, duration)
    }

    pub fn slowed(icon: Renderable, duration: Duration) -> Self {
        Self::new(BuffKind::Slowed, icon, duration)
    }

    pub fn frozen(icon: Renderable, duration: Duration) -> Self {
        Self::new(BuffKind::Frozen, icon, duration)
    }

    pub fn hastened(icon: Renderable, duration: Duration) -> Self {
        Self::new(BuffKind::Hastened, icon, duration)
    }

    pub fn revived(icon: Renderable, duration: Duration) -> Self {
        Self::new(BuffKind::Revived, icon, duration)
    }
}

/// Square color icon at the standard buff icon size.
pub fn buff_icon(color: [u8; 4]) -> Renderable {
    Renderable::color_box(BUFF_ICON_SIZE, BUFF_ICON_SIZE, color)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveBuff {
    pub buff: Buff,
    pub remaining: Duration,
}

/// Buffs currently held by a character.
#[derive(Component, Debug, Clone, Default)]
pub struct ActiveBuffs {
    pub buffs: Vec<ActiveBuff>,
}

impl ActiveBuffs {
    pub fn apply(&mut self, buff: Buff) {
        let remaining = buff.duration;
        self.buffs.push(ActiveBuff { buff, remaining });
    }

    /// Advance every timer by `dt`; returns the kinds that ran out.
    pub fn tick(&mut self, dt: Duration) -> Vec<BuffKind> {
        let mut expired = Vec::new();
        self.buffs.retain_mut(|active| {
            active.remaining = active.remaining.saturating_sub(dt);
            if active.remaining.is_zero() {
                expired.push(active.buff.kind);
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn has(&self, kind: BuffKind) -> bool {
        self.buffs.iter().any(|b| b.buff.kind == kind)
    }

    pub fn count(&self, kind: BuffKind) -> usize {
        self.buffs.iter().filter(|b| b.buff.kind == kind).count()
    }

    pub fn is_invulnerable(&self) -> bool {
        self.has(BuffKind::Invulnerable)
    }
}

/// Event: a character shed a buff because its duration elapsed
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuffExpired {
    pub character: Entity,
    pub kind: BuffKind,
}

/// System: tick buff timers and drop expired buffs
pub fn expire_buffs(
    time: Res<Time>,
    mut query: Query<(Entity, &mut ActiveBuffs)>,
    mut expired_events: EventWriter<BuffExpired>,
) {
    let dt = time.delta();
    for (character, mut buffs) in &mut query {
        if buffs.buffs.is_empty() {
            continue;
        }
        for kind in buffs.tick(dt) {
            debug!(?character, ?kind, "buff expired");
            expired_events.send(BuffExpired { character, kind });
        }
    }
}
