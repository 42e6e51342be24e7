//! Labelled axis-aligned collision bounds.
//!
//! Entities are positioned by the top-left corner stored in their
//! `Transform`; a [`Collider`] adds the size and the label collision routing
//! keys on.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Collision classification used to route hits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CollisionLabel {
    #[default]
    None,
    Player,
    Enemy,
    /// Effects that act on the player's party
    EffectsPlayer,
    /// Effects that act on enemies
    EffectsEnemy,
    Blocking,
    Npc,
    Door,
    Chest,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub label: CollisionLabel,
    pub size: Vec2,
}

impl Collider {
    pub fn new(label: CollisionLabel, size: Vec2) -> Self {
        Self { label, size }
    }

    /// World-space bounds when the owner sits at `pos`.
    pub fn bounds(&self, pos: Vec2) -> Rect {
        Rect::from_corners(pos, pos + self.size)
    }
}

/// Strict overlap; touching edges do not collide.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.min.x < b.max.x && b.min.x < a.max.x && a.min.y < b.max.y && b.min.y < a.max.y
}

/// First candidate whose label is in `labels` and whose bounds overlap `bounds`.
pub fn hit_label<I>(bounds: Rect, labels: &[CollisionLabel], candidates: I) -> Option<Entity>
where
    I: IntoIterator<Item = (Entity, Rect, CollisionLabel)>,
{
    candidates
        .into_iter()
        .find(|(_, other, label)| labels.contains(label) && overlaps(bounds, *other))
        .map(|(entity, _, _)| entity)
}

/// Top-left position of an entity, read from its transform.
pub fn position_of(transform: &Transform) -> Vec2 {
    transform.translation.truncate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_from_size() {
        let collider = Collider::new(CollisionLabel::Chest, Vec2::new(16.0, 16.0));
        let rect = collider.bounds(Vec2::new(10.0, 20.0));
        assert_eq!(rect.min, Vec2::new(10.0, 20.0));
        assert_eq!(rect.max, Vec2::new(26.0, 36.0));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 20.0, 10.0);
        let c = Rect::new(9.0, 9.0, 12.0, 12.0);
        assert!(!overlaps(a, b));
        assert!(overlaps(a, c));
        assert!(overlaps(b, c));
    }

    #[test]
    fn test_hit_label_filters_by_label() {
        let me = Rect::new(0.0, 0.0, 10.0, 10.0);
        let npc = Entity::from_raw(1);
        let door = Entity::from_raw(2);
        let candidates = vec![
            (npc, Rect::new(5.0, 5.0, 15.0, 15.0), CollisionLabel::Npc),
            (door, Rect::new(2.0, 2.0, 4.0, 4.0), CollisionLabel::Door),
        ];
        assert_eq!(
            hit_label(me, &[CollisionLabel::Door], candidates.clone()),
            Some(door)
        );
        assert_eq!(
            hit_label(me, &[CollisionLabel::Blocking, CollisionLabel::Npc], candidates.clone()),
            Some(npc)
        );
        assert_eq!(hit_label(me, &[CollisionLabel::Chest], candidates), None);
    }
}
