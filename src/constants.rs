//! Centralized game constants for the Banner Run core.
//!
//! Values that gameplay tuning is allowed to override live in
//! [`crate::config::GameConfig`]; the constants here are the defaults and
//! the fixed geometry of the sprite sheets.

// =====================================================
// Screen
// =====================================================

/// Default window width in pixels
pub const SCREEN_WIDTH: f32 = 640.0;

/// Default window height in pixels
pub const SCREEN_HEIGHT: f32 = 480.0;

// =====================================================
// Products (ability projectiles / effects)
// =====================================================

/// Draw layer every product renderable and particle source is registered at
pub const PRODUCT_LAYER: u8 = 3;

/// Number of discrete motion steps when no frame length is given
pub const DEFAULT_FRAMES: usize = 100;

/// Collision bounds of a product when no size is given
pub const DEFAULT_PRODUCT_SIZE: f32 = 1.0;

/// Side length of the square icon shown for an active buff
pub const BUFF_ICON_SIZE: u32 = 8;

/// Side length of the square icon shown for an ability on the hotbar
pub const ABILITY_ICON_SIZE: u32 = 64;

// =====================================================
// Characters
// =====================================================

/// Width/height of a character cell on the 16x32 sheets
pub const CHARACTER_CELL: (u32, u32) = (16, 32);

/// Frames per second of walking animations
pub const WALK_FPS: f32 = 8.0;

// =====================================================
// Inn
// =====================================================

/// Left wall of the walkable inn floor
pub const INN_MIN_X: f32 = 220.0;

/// Ceiling of the walkable inn floor
pub const INN_MIN_Y: f32 = 32.0;

/// Walking speed inside the inn (pixels per tick, per axis)
pub const INN_WALK_SPEED: f32 = 5.0;

// =====================================================
// Run sections
// =====================================================

/// Side length of a ground or wall tile
pub const TILE_SIZE: f32 = 16.0;

/// Tiles across one section
pub const SECTION_COLUMNS: usize = 70;

/// Ground tiles down one section
pub const GROUND_ROWS: usize = 24;

/// Wall tiles down one section
pub const WALL_ROWS: usize = 12;

/// Base chest value before the section index multiplier
pub const BASE_CHEST_VALUE: i64 = 10;

// =====================================================
// Settings menu
// =====================================================

/// Slider step applied by one left/right input
pub const SLIDER_STEP: f32 = 10.0;

/// Slider range maximum (sliders run 0..=SLIDER_MAX)
pub const SLIDER_MAX: f32 = 100.0;
