//! Precomputed motion paths for products.
//!
//! A path is sampled once at spawn into `frames` absolute positions; the
//! product then walks the `frames - 1` deltas between them, one per tick.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PathError {
    #[error("curve control points all coincide at ({}, {})", .0.x, .0.y)]
    Degenerate(Vec2),
    #[error("a curve needs at least two control points")]
    TooFewPoints,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PathShape {
    #[default]
    Straight,
    Arc,
}

/// Bezier curve of arbitrary degree, evaluated with de Casteljau's algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct Bezier {
    points: Vec<Vec2>,
}

impl Bezier {
    pub fn new(points: Vec<Vec2>) -> Result<Self, PathError> {
        let Some(&first) = points.first() else {
            return Err(PathError::TooFewPoints);
        };
        if points.len() < 2 {
            return Err(PathError::TooFewPoints);
        }
        if points.iter().all(|p| *p == first) {
            return Err(PathError::Degenerate(first));
        }
        Ok(Self { points })
    }

    /// Point at parameter `t` in `[0, 1]`.
    pub fn pos(&self, t: f32) -> Vec2 {
        let mut scratch = self.points.clone();
        for level in (1..scratch.len()).rev() {
            for i in 0..level {
                scratch[i] = scratch[i].lerp(scratch[i + 1], t);
            }
        }
        scratch[0]
    }
}

/// Control point of an arc between `start` and `end`.
///
/// The x term is half the horizontal span (relative) while the y term is half
/// the higher of the two points (absolute).
pub fn arc_control(start: Vec2, end: Vec2) -> Vec2 {
    Vec2::new((end.x - start.x) / 2.0, end.y.min(start.y) / 2.0)
}

pub fn curve(start: Vec2, end: Vec2, shape: PathShape) -> Result<Bezier, PathError> {
    match shape {
        PathShape::Straight => Bezier::new(vec![start, end]),
        PathShape::Arc => Bezier::new(vec![start, arc_control(start, end), end]),
    }
}

/// Sampled positions and the per-tick deltas between them.
#[derive(Debug, Clone, PartialEq)]
pub struct PathPlan {
    pub positions: Vec<Vec2>,
    pub deltas: Vec<Vec2>,
}

impl PathPlan {
    /// Sample `frames` positions from `start` to `end`, both included.
    pub fn new(start: Vec2, end: Vec2, shape: PathShape, frames: usize) -> Result<Self, PathError> {
        let curve = curve(start, end, shape)?;
        let positions: Vec<Vec2> = match frames {
            0 => Vec::new(),
            1 => vec![curve.pos(0.0)],
            n => {
                let last = (n - 1) as f32;
                (0..n).map(|i| curve.pos(i as f32 / last)).collect()
            }
        };
        let deltas = positions.windows(2).map(|w| w[1] - w[0]).collect();
        Ok(Self { positions, deltas })
    }

    /// Stay at `at` for `frames` samples. Never degenerate.
    pub fn hold(at: Vec2, frames: usize) -> Self {
        Self {
            positions: vec![at; frames],
            deltas: vec![Vec2::ZERO; frames.saturating_sub(1)],
        }
    }

    /// Sum of every delta; equals `last - first` position.
    pub fn total_displacement(&self) -> Vec2 {
        self.deltas.iter().copied().sum()
    }
}
