//! Banner Run core library.
//!
//! Gameplay for a side-scrolling party runner built on Bevy:
//! - Ability products: declarative producers, path interpolation, a
//!   frame-ticked lifecycle that resolves exactly once
//! - Buffs carried by products and applied on contact
//! - Mage classes and their specials
//! - The inn hub, the settings menu and scene flow
//! - Deterministic run sections
//!
//! Rendering, particles and collision are described here as components and
//! consumed by whichever renderer/physics layer the app installs.

pub mod abilities;
pub mod characters;
pub mod collision;
pub mod config;
pub mod constants;
pub mod inn;
pub mod logging;
pub mod particles;
pub mod render;
pub mod run;
pub mod scenes;

use bevy::prelude::*;

use crate::config::GameConfig;

/// Logging, every gameplay plugin and the config resource.
#[derive(Default)]
pub struct CorePlugin {
    pub config: GameConfig,
}

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(logging::LoggingPlugin {
            config: self.config.logging.clone(),
        })
        .insert_resource(self.config.clone())
        .add_plugins((
            scenes::ScenesPlugin,
            characters::CharactersPlugin,
            abilities::AbilitiesPlugin,
            inn::InnPlugin,
            run::RunPlugin,
        ));
    }
}
