//! Playable characters.
//!
//! Every party member is a mage of one of four classes. A class decides the
//! clothes tint and the two specials; the sheet layout and movement numbers
//! are shared and live in [`Constructor`].

pub mod doodads;

use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::abilities::{AbilityCooldowns, AbilityId, AbilitySlots, ActiveBuffs};
use crate::collision::{Collider, CollisionLabel};
use crate::constants::{CHARACTER_CELL, WALK_FPS};
use crate::render::{RenderError, Renderable};

const MAGE_SHEET: &str = "16x32/mage.png";
const MAGE_GHOST_SHEET: &str = "16x32/mageghost.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MageClass {
    Blue,
    White,
    Red,
    Time,
}

impl MageClass {
    pub const ALL: [MageClass; 4] = [
        MageClass::Blue,
        MageClass::White,
        MageClass::Red,
        MageClass::Time,
    ];

    pub fn definition(self) -> ClassDefinition {
        match self {
            MageClass::Blue => ClassDefinition {
                name: "Blue",
                clothes: Some([47, 47, 200, 200]),
                special1: AbilityId::FrostBolt,
                special2: AbilityId::Blizzard,
            },
            MageClass::White => ClassDefinition {
                name: "White",
                clothes: Some([190, 190, 190, 190]),
                special1: AbilityId::Invulnerability,
                special2: AbilityId::Rez,
            },
            MageClass::Red => ClassDefinition {
                name: "Red",
                clothes: Some([180, 70, 70, 180]),
                special1: AbilityId::Fireball,
                special2: AbilityId::FireStorm,
            },
            // Time mages keep the sheet's own colors
            MageClass::Time => ClassDefinition {
                name: "Time",
                clothes: None,
                special1: AbilityId::Slow,
                special2: AbilityId::CooldownRework,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassDefinition {
    pub name: &'static str,
    /// Tint mixed into the clothes layer of the sheet
    pub clothes: Option<[u8; 4]>,
    pub special1: AbilityId,
    pub special2: AbilityId,
}

/// Marks a party member and remembers its class.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartyMember {
    pub class: MageClass,
}

/// Currently shown animation, by name in the constructor's map.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Facing {
    pub animation: String,
}

impl Facing {
    pub fn new(animation: impl Into<String>) -> Self {
        Self {
            animation: animation.into(),
        }
    }

    /// "RT" or "LT", taken from the animation name suffix.
    pub fn side(&self) -> &str {
        let len = self.animation.len();
        self.animation.get(len.saturating_sub(2)..).unwrap_or("RT")
    }

    pub fn faces_left(&self) -> bool {
        self.side() == "LT"
    }
}

/// Named animations a character switches between, pre-scaled.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Animations {
    set: HashMap<String, Renderable>,
}

impl Animations {
    pub fn get(&self, name: &str) -> Option<&Renderable> {
        self.set.get(name)
    }
}

/// System: swap the shown renderable when the facing animation changes
pub fn sync_facing(
    mut query: Query<(&Facing, &Animations, &mut Renderable), Changed<Facing>>,
) {
    for (facing, animations, mut renderable) in &mut query {
        match animations.get(&facing.animation) {
            Some(next) => {
                if *renderable != *next {
                    *renderable = next.clone();
                }
            }
            None => warn!(animation = %facing.animation, "unknown animation"),
        }
    }
}

pub struct CharactersPlugin;

impl Plugin for CharactersPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PostUpdate, sync_facing);
    }
}

/// Everything needed to spawn a character of one class.
#[derive(Debug, Clone, PartialEq)]
pub struct Constructor {
    pub class: MageClass,
    pub animations: HashMap<String, Renderable>,
    pub tint: Option<[u8; 4]>,
    pub dimensions: Vec2,
    pub speed: Vec2,
    pub run_speed: f32,
    pub special1: AbilityId,
    pub special2: AbilityId,
}

impl Constructor {
    pub fn new(class: MageClass) -> Result<Self, RenderError> {
        let def = class.definition();
        let (cw, ch) = CHARACTER_CELL;
        let seq = |sheet: &str, fps: f32, frames: &[u32]| {
            Renderable::sheet_sequence(sheet, cw, ch, fps, frames)
        };

        let stand_rt = seq(MAGE_SHEET, 0.0, &[0, 0])?;
        let walk_rt = seq(MAGE_SHEET, WALK_FPS, &[1, 0, 2, 0, 0, 0])?;
        let dead_rt = seq(MAGE_GHOST_SHEET, WALK_FPS, &[0, 0, 1, 0])?;

        let animations = HashMap::from([
            ("standLT".to_string(), stand_rt.flipped_x()),
            ("standRT".to_string(), stand_rt),
            ("standHold".to_string(), seq(MAGE_SHEET, 0.0, &[0, 1])?.flipped_x()),
            ("walkLT".to_string(), walk_rt.flipped_x()),
            ("walkRT".to_string(), walk_rt),
            (
                "walkHold".to_string(),
                seq(MAGE_SHEET, WALK_FPS, &[1, 1, 2, 1, 0, 1])?.flipped_x(),
            ),
            ("deadLT".to_string(), dead_rt.flipped_x()),
            ("deadRT".to_string(), dead_rt),
            (
                "consume".to_string(),
                seq(MAGE_SHEET, WALK_FPS, &[0, 0, 0, 1, 0, 1])?.flipped_x(),
            ),
        ]);

        Ok(Self {
            class,
            animations,
            tint: def.clothes,
            dimensions: Vec2::new(cw as f32, ch as f32),
            speed: Vec2::new(0.0, 5.0),
            run_speed: 4.0,
            special1: def.special1,
            special2: def.special2,
        })
    }

    /// One constructor per class, in [`MageClass::ALL`] order.
    pub fn all() -> Result<Vec<Self>, RenderError> {
        MageClass::ALL.into_iter().map(Self::new).collect()
    }

    pub fn animation(&self, name: &str) -> Option<&Renderable> {
        self.animations.get(name)
    }

    /// Animation set scaled by `scale`, plus the renderable facing `start`.
    pub fn animated(&self, start: &str, scale: f32) -> (Animations, Facing, Renderable) {
        let set: HashMap<String, Renderable> = self
            .animations
            .iter()
            .map(|(name, r)| (name.clone(), r.scaled(scale, scale)))
            .collect();
        let shown = set
            .get(start)
            .cloned()
            .unwrap_or_else(|| Renderable::color_box(16, 32, [255, 0, 255, 255]));
        (Animations { set }, Facing::new(start), shown)
    }

    /// Components for a party member standing at `pos`, scaled by `scale`.
    pub fn party_member(&self, pos: Vec2, scale: f32) -> impl Bundle {
        (
            PartyMember { class: self.class },
            self.animated("standRT", scale),
            Transform::from_translation(pos.extend(0.0)),
            Collider::new(CollisionLabel::Player, self.dimensions * scale),
            AbilitySlots::new(self.special1, self.special2),
            AbilityCooldowns::default(),
            ActiveBuffs::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_specials() {
        assert_eq!(MageClass::White.definition().special1, AbilityId::Invulnerability);
        assert_eq!(MageClass::White.definition().special2, AbilityId::Rez);
        assert_eq!(MageClass::Red.definition().special2, AbilityId::FireStorm);
        assert_eq!(MageClass::Time.definition().clothes, None);
    }

    #[test]
    fn test_constructor_animations() {
        let con = Constructor::new(MageClass::Blue).unwrap();
        for name in [
            "walkRT", "walkLT", "standRT", "standLT", "deadRT", "deadLT", "walkHold", "standHold",
            "consume",
        ] {
            assert!(con.animation(name).is_some(), "missing {name}");
        }
        let rt = con.animation("walkRT").unwrap();
        let lt = con.animation("walkLT").unwrap();
        assert_eq!(lt, &rt.flipped_x());
        assert_eq!(rt.frame_count(), 3);
        assert_eq!(con.dimensions, Vec2::new(16.0, 32.0));
        assert_eq!(con.run_speed, 4.0);
    }

    #[test]
    fn test_animated_scales_every_animation() {
        let con = Constructor::new(MageClass::Red).unwrap();
        let (animations, facing, shown) = con.animated("standLT", 2.0);
        assert_eq!(facing.animation, "standLT");
        assert!(shown.flip_x);
        assert_eq!(shown.scale, Vec2::splat(2.0));
        assert_eq!(animations.get("walkRT").unwrap().scale, Vec2::splat(2.0));
    }

    #[test]
    fn test_every_class_builds() {
        assert_eq!(Constructor::all().unwrap().len(), 4);
    }

    #[test]
    fn test_facing_side() {
        assert!(Facing::new("walkLT").faces_left());
        assert!(!Facing::new("standRT").faces_left());
        assert_eq!(Facing::new("x").side(), "x");
    }
}
