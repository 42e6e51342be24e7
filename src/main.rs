use std::path::PathBuf;

use anyhow::Context;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use banner_core::config::GameConfig;
use banner_core::CorePlugin;

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("banner.ron"));
    let config = GameConfig::load_or_default(&path)
        .with_context(|| format!("loading config from {}", path.display()))?;
    let seed = config.run_seed;

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Banner Run".into(),
                    resolution: (config.screen_width, config.screen_height).into(),
                    ..default()
                }),
                ..default()
            })
            .disable::<LogPlugin>(),
    )
    .add_plugins(CorePlugin { config })
    .add_systems(Startup, setup);
    // The subscriber is live once CorePlugin has been added
    info!(path = %path.display(), from_file = path.exists(), seed, "config loaded");

    let exit = app.run();
    if let AppExit::Error(code) = exit {
        anyhow::bail!("app exited with code {code}");
    }
    Ok(())
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);
    info!("Banner Run core initialized");
}
