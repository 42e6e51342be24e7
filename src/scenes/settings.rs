//! Settings menu.
//!
//! The menu owns a working copy of the levels while the Settings scene is
//! active; nothing reaches the [`Settings`] resource until the menu is left.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::GameScene;
use crate::constants::{SLIDER_MAX, SLIDER_STEP};

/// Player preferences read by the audio and HUD layers.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub show_fps: bool,
    /// Levels in `[0, 1]`
    pub sfx_volume: f32,
    pub music_volume: f32,
    pub master_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_fps: false,
            sfx_volume: 1.0,
            music_volume: 1.0,
            master_volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuItem {
    ShowFps,
    SfxVolume,
    MusicVolume,
    MasterVolume,
    Return,
}

impl MenuItem {
    pub const ALL: [MenuItem; 5] = [
        MenuItem::ShowFps,
        MenuItem::SfxVolume,
        MenuItem::MusicVolume,
        MenuItem::MasterVolume,
        MenuItem::Return,
    ];
}

/// Input already mapped from keys / joystick
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum MenuInput {
    Up,
    Down,
    Select,
    /// Slide the selected slider by this many slider units
    Adjust(f32),
}

impl MenuInput {
    pub fn left() -> Self {
        MenuInput::Adjust(-SLIDER_STEP)
    }

    pub fn right() -> Self {
        MenuInput::Adjust(SLIDER_STEP)
    }
}

/// Working state of the open settings menu.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SettingsMenu {
    selected: usize,
    show_fps: bool,
    /// Slider positions on the 0..=100 scale: sfx, music, master
    sliders: [f32; 3],
    open: bool,
}

impl SettingsMenu {
    pub fn new(settings: &Settings) -> Self {
        let to_slider = |level: f32| (level * SLIDER_MAX).clamp(0.0, SLIDER_MAX);
        Self {
            selected: 0,
            show_fps: settings.show_fps,
            sliders: [
                to_slider(settings.sfx_volume),
                to_slider(settings.music_volume),
                to_slider(settings.master_volume),
            ],
            open: true,
        }
    }

    pub fn selected(&self) -> MenuItem {
        MenuItem::ALL[self.selected]
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn show_fps(&self) -> bool {
        self.show_fps
    }

    /// Slider value (0..=100) behind `item`, if it is a slider.
    pub fn slider(&self, item: MenuItem) -> Option<f32> {
        Self::slider_index(item).map(|i| self.sliders[i])
    }

    fn slider_index(item: MenuItem) -> Option<usize> {
        match item {
            MenuItem::SfxVolume => Some(0),
            MenuItem::MusicVolume => Some(1),
            MenuItem::MasterVolume => Some(2),
            MenuItem::ShowFps | MenuItem::Return => None,
        }
    }

    /// Move the highlight by `step` items, wrapping at both ends.
    pub fn move_selection(&mut self, step: i32) {
        let len = MenuItem::ALL.len() as i32;
        self.selected = (self.selected as i32 + step).rem_euclid(len) as usize;
    }

    pub fn select(&mut self) {
        match self.selected() {
            MenuItem::ShowFps => self.show_fps = !self.show_fps,
            MenuItem::Return => self.open = false,
            _ => {}
        }
    }

    pub fn adjust(&mut self, delta: f32) {
        if let Some(i) = Self::slider_index(self.selected()) {
            self.sliders[i] = (self.sliders[i] + delta).clamp(0.0, SLIDER_MAX);
        }
    }

    pub fn apply(&mut self, input: MenuInput) {
        match input {
            MenuInput::Up => self.move_selection(-1),
            MenuInput::Down => self.move_selection(1),
            MenuInput::Select => self.select(),
            MenuInput::Adjust(delta) => self.adjust(delta),
        }
    }

    /// Commit the menu's values and return the scene to go to.
    pub fn finish(&self, settings: &mut Settings) -> GameScene {
        let level = |value: f32| value * 0.01;
        settings.show_fps = self.show_fps;
        settings.sfx_volume = level(self.sliders[0]);
        settings.music_volume = level(self.sliders[1]);
        settings.master_volume = level(self.sliders[2]);
        GameScene::Startup
    }
}

pub(super) fn open_settings_menu(mut commands: Commands, settings: Res<Settings>) {
    commands.insert_resource(SettingsMenu::new(&settings));
}

pub(super) fn drive_settings_menu(
    mut inputs: EventReader<MenuInput>,
    menu: Option<ResMut<SettingsMenu>>,
    mut settings: ResMut<Settings>,
    mut next: ResMut<NextState<GameScene>>,
) {
    let Some(mut menu) = menu else {
        return;
    };
    if !menu.is_open() {
        return;
    }
    for input in inputs.read() {
        menu.apply(*input);
        if !menu.is_open() {
            let scene = menu.finish(&mut settings);
            info!(settings = ?*settings, "settings committed");
            next.set(scene);
            break;
        }
    }
}

pub(super) fn close_settings_menu(mut commands: Commands) {
    commands.remove_resource::<SettingsMenu>();
}
