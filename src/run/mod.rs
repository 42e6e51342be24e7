//! A run: the party marches right through procedurally generated sections.
//!
//! Sections are deterministic: the same run seed and section index always
//! give the same tiles, chests and enemy spawn points.

pub mod section;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

use crate::characters::doodads::Chest;
use crate::characters::{Constructor, MageClass};
use crate::config::GameConfig;
use crate::scenes::{GameScene, SceneScoped};

pub use section::{Section, SectionEntity, SectionGenerator, TilePlacement};

/// Root of all section generation for one run.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSeed {
    pub seed: u64,
}

impl RunSeed {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Deterministic per-section hash of the run seed and section index
    pub fn section_hash(&self, index: u64) -> u64 {
        let mut hasher = Sha3_256::new();
        hasher.update(self.seed.to_le_bytes());
        hasher.update(index.to_le_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(bytes)
    }
}

/// What the end-of-run screen shows.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInfo {
    pub party: Vec<MageClass>,
    pub sections_cleared: u32,
    pub enemies_defeated: u32,
}

impl RunInfo {
    pub fn new(party: Vec<MageClass>) -> Self {
        Self {
            party,
            ..Default::default()
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// The section the party is currently walking through.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct CurrentSection(pub Section);

/// Event: the party walked off the right edge of the current section
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionCleared {
    pub index: u64,
}

/// Event: an enemy was defeated during the run
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyDefeated(pub Entity);

/// Marks entities that belong to a generated section.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionMember(pub u64);

fn spawn_section(commands: &mut Commands, section: &Section) {
    for entity in &section.entities {
        if let SectionEntity::Chest { pos, value } = *entity {
            let mut chest = Chest::new(value);
            chest.activate();
            commands.spawn((
                chest.bundle(pos),
                SectionMember(section.index),
                SceneScoped(GameScene::Run),
            ));
        }
    }
    debug!(
        index = section.index,
        entities = section.entities.len(),
        "section spawned"
    );
}

fn start_run(mut commands: Commands, config: Res<GameConfig>) {
    let seed = RunSeed::new(config.run_seed);
    let screen = config.screen_size();
    let first = SectionGenerator::new(&seed, 0, screen.y).generate();
    spawn_section(&mut commands, &first);

    for (i, class) in config.party.iter().enumerate() {
        match Constructor::new(*class) {
            Ok(con) => {
                let pos = Vec2::new(120.0 - 24.0 * i as f32, screen.y * 2.0 / 3.0);
                commands.spawn((con.party_member(pos, 1.0), SceneScoped(GameScene::Run)));
            }
            Err(err) => error!(?class, "party member not spawned: {err}"),
        }
    }

    info!(seed = seed.seed, party = config.party.len(), "run started");
    commands.insert_resource(seed);
    commands.insert_resource(RunInfo::new(config.party.clone()));
    commands.insert_resource(CurrentSection(first));
}

/// System: fold run events into [`RunInfo`] and roll the next section
pub fn record_run_progress(
    mut commands: Commands,
    mut cleared: EventReader<SectionCleared>,
    mut defeated: EventReader<EnemyDefeated>,
    seed: Res<RunSeed>,
    config: Res<GameConfig>,
    mut info: ResMut<RunInfo>,
    mut current: ResMut<CurrentSection>,
    members: Query<(Entity, &SectionMember)>,
) {
    info.enemies_defeated += defeated.read().count() as u32;

    for SectionCleared { index } in cleared.read().copied() {
        if index != current.0.index {
            debug!(index, current = current.0.index, "stale section clear ignored");
            continue;
        }
        info.sections_cleared += 1;
        for (entity, member) in &members {
            if member.0 == index {
                commands.entity(entity).despawn_recursive();
            }
        }

        let mut next = SectionGenerator::new(&seed, index + 1, config.screen_height).generate();
        next.shift_x(current.0.origin_x + current.0.width());
        spawn_section(&mut commands, &next);
        current.0 = next;
        info!(cleared = info.sections_cleared, "section cleared");
    }
}

fn end_run(mut commands: Commands, info: Option<Res<RunInfo>>) {
    if let Some(info) = info {
        match info.to_json() {
            Ok(summary) => info!(%summary, "run ended"),
            Err(err) => warn!("run summary not serializable: {err}"),
        }
    }
    commands.remove_resource::<CurrentSection>();
}

pub struct RunPlugin;

impl Plugin for RunPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SectionCleared>()
            .add_event::<EnemyDefeated>()
            .add_systems(OnEnter(GameScene::Run), start_run)
            .add_systems(
                Update,
                record_run_progress.run_if(in_state(GameScene::Run)),
            )
            .add_systems(OnExit(GameScene::Run), end_run);
    }
}
