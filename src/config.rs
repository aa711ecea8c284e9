use std::f32::consts::PI;

use thiserror::Error;

/// Inverse-distance brightness model: `1 / (1 + k * distance^n)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Falloff {
    pub k: f32,
    pub n: f32,
}

impl Falloff {
    #[inline]
    pub fn darken(&self, distance: f32) -> f32 {
        1.0 / (1.0 + self.k * distance.max(0.0).powf(self.n))
    }
}

/// Everything that used to differ between the forked engine copies.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub screen_width: usize,
    pub screen_height: usize,
    pub tile_size: f32,      // world units per tile, scales cast distances
    pub fov: f32,            // radians
    pub scale_constant: f32, // projected height multiplier
    pub max_range: f32,      // world units
    pub march_step: f32,     // grid units
    pub wall_falloff: Falloff,
    pub sprite_falloff: Falloff,
    pub sprite_near_clip: f32,
    pub sprite_far_clip: f32,
    pub background: [u8; 3],
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            screen_width: 160,
            screen_height: 120,
            tile_size: 1.0,
            fov: PI / 3.0,
            scale_constant: 0.6,
            max_range: 20.0,
            march_step: 0.01,
            wall_falloff: Falloff { k: 1.0, n: 2.0 },
            sprite_falloff: Falloff { k: 0.5, n: 2.0 },
            sprite_near_clip: 0.2,
            sprite_far_clip: 20.0,
            background: [0, 0, 0],
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("screen must be at least 1x1, got {width}x{height}")]
    EmptyScreen { width: usize, height: usize },
    #[error("{name} must be positive and finite, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("field of view must lie in (0, pi), got {0}")]
    FieldOfView(f32),
    #[error("march step {0} is too coarse, it must stay well below one tile")]
    CoarseStep(f32),
}

impl EngineConfig {
    /// Overrides the field of view from a value in degrees.
    pub fn with_fov_degrees(mut self, degrees: f32) -> Self {
        self.fov = degrees.to_radians();
        self
    }

    /// Sets the cast range and keeps the sprite far clip in step with it.
    pub fn with_max_range(mut self, range: f32) -> Self {
        self.max_range = range;
        self.sprite_far_clip = range;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(ConfigError::EmptyScreen {
                width: self.screen_width,
                height: self.screen_height,
            });
        }

        let positive = [
            ("tile_size", self.tile_size),
            ("scale_constant", self.scale_constant),
            ("max_range", self.max_range),
            ("march_step", self.march_step),
            ("sprite_far_clip", self.sprite_far_clip),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        if !(self.fov > 0.0 && self.fov < PI) {
            return Err(ConfigError::FieldOfView(self.fov));
        }
        if self.march_step > 0.1 {
            return Err(ConfigError::CoarseStep(self.march_step));
        }
        Ok(())
    }
}
