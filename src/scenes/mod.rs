//! Scene flow.
//!
//! Startup → Inn → Run, with Settings reachable from Startup. Each scene
//! keeps its working data in its own resource (inserted on enter, removed
//! on exit) instead of in globals, and everything spawned with
//! [`SceneScoped`] is despawned when its scene ends.

pub mod settings;

use bevy::prelude::*;
use bevy::state::state::StateTransitionEvent;
use serde::{Deserialize, Serialize};

use crate::abilities::product::discard_products;

pub use settings::{MenuInput, MenuItem, Settings, SettingsMenu};

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameScene {
    /// Title screen
    #[default]
    Startup,
    /// Hub where the party is assembled
    Inn,
    /// A side-scrolling run through generated sections
    Run,
    Settings,
}

/// Despawn this entity when `0` is exited.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneScoped(pub GameScene);

pub struct ScenesPlugin;

impl Plugin for ScenesPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameScene>()
            .add_event::<MenuInput>()
            .init_resource::<Settings>()
            .add_systems(OnEnter(GameScene::Settings), settings::open_settings_menu)
            .add_systems(
                Update,
                settings::drive_settings_menu.run_if(in_state(GameScene::Settings)),
            )
            .add_systems(OnExit(GameScene::Settings), settings::close_settings_menu)
            .add_systems(OnExit(GameScene::Run), discard_products)
            .add_systems(OnExit(GameScene::Inn), discard_products)
            .add_systems(Update, despawn_scoped);
    }
}

/// System: log every transition and despawn what the exited scene owned
fn despawn_scoped(
    mut commands: Commands,
    mut transitions: EventReader<StateTransitionEvent<GameScene>>,
    query: Query<(Entity, &SceneScoped)>,
) {
    for transition in transitions.read() {
        info!(from = ?transition.exited, to = ?transition.entered, "scene transition");
        let Some(exited) = transition.exited else {
            continue;
        };
        if transition.entered == Some(exited) {
            continue;
        }
        let mut count = 0;
        for (entity, scoped) in &query {
            if scoped.0 == exited {
                commands.entity(entity).despawn_recursive();
                count += 1;
            }
        }
        debug!(scene = ?exited, count, "scene entities despawned");
    }
}
