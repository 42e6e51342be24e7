//! Renderable descriptors handed to the external renderer.
//!
//! Nothing here draws. A [`Renderable`] names an asset (or a flat color box)
//! plus the flip/scale modifiers applied to it; the renderer picks up every
//! entity carrying a `Renderable`, a [`DrawLayer`] and a `Transform`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("sheet `{sheet}` frame list must be (column, row) pairs, got {len} values")]
    OddFrameList { sheet: String, len: usize },
    #[error("sheet `{sheet}` sequence has no frames")]
    EmptySequence { sheet: String },
    #[error("sheet `{sheet}` cell size must be non-zero")]
    ZeroCell { sheet: String },
}

/// What to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Visual {
    /// Flat rectangle of one color
    ColorBox {
        width: u32,
        height: u32,
        color: [u8; 4],
    },
    /// Single image asset
    Sprite { asset: String },
    /// Animation cut from a sprite sheet
    Sequence {
        sheet: String,
        /// Cell size in pixels
        cell: UVec2,
        fps: f32,
        /// (column, row) of every frame, in play order
        frames: Vec<UVec2>,
    },
}

/// A visual plus the modifiers applied to it.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Renderable {
    pub visual: Visual,
    pub flip_x: bool,
    pub scale: Vec2,
}

impl Renderable {
    fn new(visual: Visual) -> Self {
        Self {
            visual,
            flip_x: false,
            scale: Vec2::ONE,
        }
    }

    pub fn color_box(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self::new(Visual::ColorBox {
            width,
            height,
            color,
        })
    }

    pub fn sprite(asset: impl Into<String>) -> Self {
        Self::new(Visual::Sprite {
            asset: asset.into(),
        })
    }

    /// Build an animation from a sheet, `frame_pairs` being flat
    /// `[col, row, col, row, ...]` indices into the sheet grid.
    pub fn sheet_sequence(
        sheet: impl Into<String>,
        cell_w: u32,
        cell_h: u32,
        fps: f32,
        frame_pairs: &[u32],
    ) -> Result<Self, RenderError> {
        let sheet = sheet.into();
        if cell_w == 0 || cell_h == 0 {
            return Err(RenderError::ZeroCell { sheet });
        }
        if frame_pairs.is_empty() {
            return Err(RenderError::EmptySequence { sheet });
        }
        if frame_pairs.len() % 2 != 0 {
            return Err(RenderError::OddFrameList {
                sheet,
                len: frame_pairs.len(),
            });
        }
        let frames = frame_pairs
            .chunks_exact(2)
            .map(|pair| UVec2::new(pair[0], pair[1]))
            .collect();
        Ok(Self::new(Visual::Sequence {
            sheet,
            cell: UVec2::new(cell_w, cell_h),
            fps,
            frames,
        }))
    }

    /// Copy mirrored horizontally.
    pub fn flipped_x(&self) -> Self {
        Self {
            flip_x: !self.flip_x,
            ..self.clone()
        }
    }

    /// Copy scaled by `(sx, sy)` on top of any existing scale.
    pub fn scaled(&self, sx: f32, sy: f32) -> Self {
        Self {
            scale: self.scale * Vec2::new(sx, sy),
            ..self.clone()
        }
    }

    /// Unscaled size of one frame in pixels.
    pub fn dims(&self) -> UVec2 {
        match &self.visual {
            Visual::ColorBox { width, height, .. } => UVec2::new(*width, *height),
            Visual::Sequence { cell, .. } => *cell,
            // Sprite size is only known once the renderer loads the asset.
            Visual::Sprite { .. } => UVec2::ZERO,
        }
    }

    pub fn frame_count(&self) -> usize {
        match &self.visual {
            Visual::Sequence { frames, .. } => frames.len(),
            _ => 1,
        }
    }
}

/// Draw order bucket; higher layers draw on top.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DrawLayer(pub u8);
