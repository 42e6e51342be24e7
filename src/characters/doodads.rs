//! Static interactables placed in the world.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::collision::{Collider, CollisionLabel};
use crate::render::Renderable;

const CHEST_SPRITE: &str = "16x16/chest.png";

/// Loot chest placed on a run section.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chest {
    pub value: i64,
    pub active: bool,
}

impl Chest {
    /// Inactive until placed in the world.
    pub fn new(value: i64) -> Self {
        Self {
            value,
            active: false,
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Chest with its sprite and 16×16 `Chest` collider.
    pub fn bundle(self, pos: Vec2) -> impl Bundle {
        (
            self,
            Renderable::sprite(CHEST_SPRITE),
            Collider::new(CollisionLabel::Chest, Vec2::splat(16.0)),
            Transform::from_translation(pos.extend(0.0)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chest_activation() {
        let mut chest = Chest::new(40);
        assert!(!chest.active);
        chest.activate();
        assert!(chest.active);
        chest.deactivate();
        assert!(!chest.active);
        assert_eq!(chest.value, 40);
    }
}
