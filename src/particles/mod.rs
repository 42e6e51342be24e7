//! Particle emitter descriptors handed to the external particle system.
//!
//! A product that trails particles owns exactly one emitter entity carrying a
//! [`ParticleSource`]. The emitter follows the product every tick and is
//! stopped once when the product is torn down.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Particle outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleShape {
    Square,
    Circle,
    Diamond,
}

/// Inclusive range sampled per particle; `min == max` is a constant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range<T> {
    pub min: T,
    pub max: T,
}

impl<T: Copy> Range<T> {
    pub fn constant(value: T) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

/// Emission configuration: color gradient, shape, size, speed and lifespan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleSpec {
    pub start_color: [u8; 4],
    /// Random component added to `start_color` per particle
    pub start_color_rand: [u8; 4],
    pub end_color: [u8; 4],
    /// Random component added to `end_color` per particle
    pub end_color_rand: [u8; 4],
    pub shape: ParticleShape,
    pub size: Range<u32>,
    pub end_size: Range<u32>,
    /// Pixels per frame
    pub speed: Range<f32>,
    /// Frames a particle lives
    pub lifespan: Range<f32>,
}

impl Default for ParticleSpec {
    fn default() -> Self {
        Self {
            start_color: [255, 255, 255, 255],
            start_color_rand: [0, 0, 0, 0],
            end_color: [255, 255, 255, 0],
            end_color_rand: [0, 0, 0, 0],
            shape: ParticleShape::Square,
            size: Range::constant(1),
            end_size: Range::constant(1),
            speed: Range::constant(1.0),
            lifespan: Range::constant(10.0),
        }
    }
}

impl ParticleSpec {
    pub fn with_colors(
        mut self,
        start: [u8; 4],
        start_rand: [u8; 4],
        end: [u8; 4],
        end_rand: [u8; 4],
    ) -> Self {
        self.start_color = start;
        self.start_color_rand = start_rand;
        self.end_color = end;
        self.end_color_rand = end_rand;
        self
    }

    pub fn with_shape(mut self, shape: ParticleShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_size(mut self, size: Range<u32>) -> Self {
        self.size = size;
        self
    }

    pub fn with_end_size(mut self, end_size: Range<u32>) -> Self {
        self.end_size = end_size;
        self
    }

    pub fn with_speed(mut self, speed: Range<f32>) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_lifespan(mut self, lifespan: Range<f32>) -> Self {
        self.lifespan = lifespan;
        self
    }
}

/// Live emitter. Lives on its own entity, positioned by that entity's `Transform`.
#[derive(Component, Debug, Clone)]
pub struct ParticleSource {
    pub spec: ParticleSpec,
    pub layer: u8,
    active: bool,
}

impl ParticleSource {
    /// Start emitting at `layer`.
    pub fn start(spec: ParticleSpec, layer: u8) -> Self {
        Self {
            spec,
            layer,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Stop emitting. Returns `false` if the source was already stopped.
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }
}

/// Broadcast once when a product's emitter is stopped.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticleSourceStopped {
    pub product: Entity,
    pub source: Entity,
}
