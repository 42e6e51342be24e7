use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use super::RunSeed;
use crate::constants::{BASE_CHEST_VALUE, GROUND_ROWS, SECTION_COLUMNS, TILE_SIZE, WALL_ROWS};

/// Distinct ground tile images
pub const GROUND_VARIANTS: u8 = 4;
/// Distinct wall tile images
pub const WALL_VARIANTS: u8 = 3;

const MAX_ENEMIES: usize = 8;

/// One tile drawn at `pos`, using image `variant` of its kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement {
    pub pos: Vec2,
    pub variant: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SectionEntity {
    Chest { pos: Vec2, value: i64 },
    EnemySpawn { pos: Vec2 },
}

impl SectionEntity {
    pub fn pos(&self) -> Vec2 {
        match *self {
            SectionEntity::Chest { pos, .. } | SectionEntity::EnemySpawn { pos } => pos,
        }
    }

    fn shift_x(&mut self, dx: f32) {
        match self {
            SectionEntity::Chest { pos, .. } | SectionEntity::EnemySpawn { pos } => pos.x += dx,
        }
    }
}

/// Tile grid and entity list for one section, before placement.
#[derive(Debug, Clone)]
pub struct SectionGenerator {
    index: u64,
    ground_offset: f32,
    ground: [[u8; GROUND_ROWS]; SECTION_COLUMNS],
    wall: [[u8; WALL_ROWS]; SECTION_COLUMNS],
    entities: Vec<SectionEntity>,
}

impl SectionGenerator {
    /// Roll section `index` of the run. The ground starts a third of the way
    /// down the screen; the wall fills the rows above it.
    pub fn new(seed: &RunSeed, index: u64, screen_height: f32) -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed.section_hash(index));
        let ground_offset = screen_height / 3.0;

        let mut ground = [[0u8; GROUND_ROWS]; SECTION_COLUMNS];
        for col in ground.iter_mut() {
            for tile in col.iter_mut() {
                *tile = rng.gen_range(0..GROUND_VARIANTS);
            }
        }
        let mut wall = [[0u8; WALL_ROWS]; SECTION_COLUMNS];
        for col in wall.iter_mut() {
            for tile in col.iter_mut() {
                *tile = rng.gen_range(0..WALL_VARIANTS);
            }
        }

        let ground_tile = |rng: &mut Xoshiro256PlusPlus| {
            let col = rng.gen_range(0..SECTION_COLUMNS);
            let row = rng.gen_range(0..GROUND_ROWS);
            Vec2::new(col as f32 * TILE_SIZE, ground_offset + row as f32 * TILE_SIZE)
        };

        let mut entities = Vec::new();
        for _ in 0..rng.gen_range(1..=2) {
            let value = BASE_CHEST_VALUE * (index as i64 + 1) + rng.gen_range(0..BASE_CHEST_VALUE);
            entities.push(SectionEntity::Chest {
                pos: ground_tile(&mut rng),
                value,
            });
        }
        let enemies = (2 + index as usize / 2).min(MAX_ENEMIES);
        for _ in 0..enemies {
            entities.push(SectionEntity::EnemySpawn {
                pos: ground_tile(&mut rng),
            });
        }

        Self {
            index,
            ground_offset,
            ground,
            wall,
            entities,
        }
    }

    pub fn ground_offset(&self) -> f32 {
        self.ground_offset
    }

    /// Place every tile and entity with the section's left edge at x = 0.
    pub fn generate(&self) -> Section {
        let ground = self
            .ground
            .iter()
            .enumerate()
            .flat_map(|(x, col)| {
                col.iter().enumerate().map(move |(y, &variant)| TilePlacement {
                    pos: Vec2::new(x as f32 * TILE_SIZE, self.ground_offset + y as f32 * TILE_SIZE),
                    variant,
                })
            })
            .collect();
        let wall = self
            .wall
            .iter()
            .enumerate()
            .flat_map(|(x, col)| {
                col.iter().enumerate().map(move |(y, &variant)| TilePlacement {
                    pos: Vec2::new(x as f32 * TILE_SIZE, y as f32 * TILE_SIZE),
                    variant,
                })
            })
            .collect();

        Section {
            index: self.index,
            origin_x: 0.0,
            ground,
            wall,
            entities: self.entities.clone(),
        }
    }
}

/// A placed section. The wall is attached to the ground: both share
/// `origin_x` and move together.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub index: u64,
    pub origin_x: f32,
    pub ground: Vec<TilePlacement>,
    pub wall: Vec<TilePlacement>,
    pub entities: Vec<SectionEntity>,
}

impl Section {
    pub fn width(&self) -> f32 {
        SECTION_COLUMNS as f32 * TILE_SIZE
    }

    pub fn shift_x(&mut self, dx: f32) {
        self.origin_x += dx;
        for tile in self.ground.iter_mut().chain(self.wall.iter_mut()) {
            tile.pos.x += dx;
        }
        for entity in &mut self.entities {
            entity.shift_x(dx);
        }
    }

    pub fn chests(&self) -> impl Iterator<Item = (Vec2, i64)> + '_ {
        self.entities.iter().filter_map(|e| match *e {
            SectionEntity::Chest { pos, value } => Some((pos, value)),
            SectionEntity::EnemySpawn { .. } => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(seed: u64, index: u64) -> Section {
        SectionGenerator::new(&RunSeed::new(seed), index, 480.0).generate()
    }

    #[test]
    fn test_same_seed_same_section() {
        assert_eq!(section(87, 2), section(87, 2));
        assert_ne!(section(87, 2).ground, section(87, 3).ground);
    }

    #[test]
    fn test_tile_layout() {
        let s = section(1, 0);
        assert_eq!(s.ground.len(), 70 * 24);
        assert_eq!(s.wall.len(), 70 * 12);
        assert_eq!(s.ground[0].pos, Vec2::new(0.0, 160.0));
        assert_eq!(s.ground[1].pos, Vec2::new(0.0, 176.0));
        assert_eq!(s.wall.last().unwrap().pos, Vec2::new(69.0 * 16.0, 11.0 * 16.0));
        assert!(s.ground.iter().all(|t| t.variant < GROUND_VARIANTS));
        assert!(s.wall.iter().all(|t| t.variant < WALL_VARIANTS));
    }

    #[test]
    fn test_entities_on_ground() {
        for index in 0..5 {
            let s = section(9, index);
            for e in &s.entities {
                let pos = e.pos();
                assert!(pos.y >= 160.0 && pos.y < 160.0 + 24.0 * 16.0);
                assert!(pos.x >= 0.0 && pos.x < s.width());
            }
        }
    }

    #[test]
    fn test_chest_value_grows() {
        let early: Vec<i64> = section(5, 0).chests().map(|(_, v)| v).collect();
        let late: Vec<i64> = section(5, 6).chests().map(|(_, v)| v).collect();
        assert!(early.iter().all(|v| (10..20).contains(v)));
        assert!(late.iter().all(|v| (70..80).contains(v)));
    }

    #[test]
    fn test_shift_moves_wall_with_ground() {
        let mut s = section(3, 0);
        let wall0 = s.wall[0].pos;
        let ground0 = s.ground[0].pos;
        s.shift_x(s.width());
        assert_eq!(s.origin_x, 1120.0);
        assert_eq!(s.wall[0].pos.x - wall0.x, 1120.0);
        assert_eq!(s.ground[0].pos.x - ground0.x, 1120.0);
    }
}
