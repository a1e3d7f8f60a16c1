//! Particle profiles: the immutable per-kind configuration a particle system
//! is built from.

use foundation::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Linear RGBA color, components in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRgba {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const CYAN: Self = Self::new(0.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Blend toward `other`; `t` is clamped and both ends are exact.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let s = 1.0 - t;
        Self::new(
            self.r * s + other.r * t,
            self.g * s + other.g * t,
            self.b * s + other.b * t,
            self.a * s + other.a * t,
        )
    }
}

/// 8-bit RGBA pixel, as drawn into a raster surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba8(pub [u8; 4]);

impl Rgba8 {
    /// CSS-style `rgba(r, g, b, alpha)` with `alpha` in `[0, 1]`.
    pub fn css(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self([r, g, b, a])
    }
}

/// Procedural raster for a particle sprite: a solid rectangle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureSpec {
    pub width: u32,
    pub height: u32,
    pub fill: Rgba8,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmitterShape {
    /// Particles spawn inside the sphere and move outward from its center.
    Sphere { radius: f64 },
}

/// Per-particle velocity update, applied every simulation step.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VelocityRule {
    /// Subtracts `accel * dt` from the local up (z) component.
    DownwardAcceleration { accel: f64 },
}

impl VelocityRule {
    /// New velocity after `dt` seconds. Pure in velocity, position and time.
    pub fn apply(&self, velocity: Vec3, _position: Vec3, dt: f64) -> Vec3 {
        match *self {
            VelocityRule::DownwardAcceleration { accel } => {
                Vec3::new(velocity.x, velocity.y, velocity.z - accel * dt)
            }
        }
    }
}

/// Where the emitter sits relative to the camera.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementOffsets {
    /// Distance ahead of the camera along its view direction (meters).
    pub standoff_m: f64,
    /// Distance along the camera's up direction (meters).
    pub vertical_offset_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleProfile {
    pub texture: TextureSpec,
    pub start_color: ColorRgba,
    pub end_color: ColorRgba,
    pub start_scale: f64,
    pub end_scale: f64,
    pub min_particle_life_s: f64,
    pub max_particle_life_s: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    /// Sprite footprint in pixels (width, height).
    pub image_size: [f64; 2],
    /// Default particles per second, before any user intensity override.
    pub emission_rate: f64,
    /// The system emits in loops of this length (seconds).
    pub system_lifetime_s: f64,
    pub emitter: EmitterShape,
    pub velocity_rule: VelocityRule,
    pub placement: PlacementOffsets,
}

impl ParticleProfile {
    pub fn rain() -> Self {
        Self {
            texture: TextureSpec {
                width: 5,
                height: 15,
                fill: Rgba8::css(100, 180, 255, 0.8),
            },
            start_color: ColorRgba::CYAN.with_alpha(0.6),
            end_color: ColorRgba::CYAN.with_alpha(0.1),
            start_scale: 1.0,
            end_scale: 0.5,
            min_particle_life_s: 0.5,
            max_particle_life_s: 1.5,
            min_speed: 50.0,
            max_speed: 100.0,
            image_size: [5.0, 15.0],
            emission_rate: 5000.0,
            system_lifetime_s: 10.0,
            emitter: EmitterShape::Sphere { radius: 200.0 },
            velocity_rule: VelocityRule::DownwardAcceleration { accel: 300.0 },
            placement: PlacementOffsets {
                standoff_m: 100.0,
                vertical_offset_m: 50.0,
            },
        }
    }

    pub fn snow() -> Self {
        Self {
            texture: TextureSpec {
                width: 8,
                height: 8,
                fill: Rgba8::css(255, 255, 255, 0.9),
            },
            start_color: ColorRgba::WHITE.with_alpha(0.8),
            end_color: ColorRgba::WHITE.with_alpha(0.1),
            start_scale: 1.0,
            end_scale: 0.5,
            min_particle_life_s: 1.0,
            max_particle_life_s: 3.0,
            min_speed: 5.0,
            max_speed: 15.0,
            image_size: [5.0, 5.0],
            emission_rate: 3000.0,
            system_lifetime_s: 10.0,
            emitter: EmitterShape::Sphere { radius: 200.0 },
            velocity_rule: VelocityRule::DownwardAcceleration { accel: 20.0 },
            placement: PlacementOffsets {
                standoff_m: 100.0,
                vertical_offset_m: 50.0,
            },
        }
    }

    /// Checks the ranges a particle engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn finite_non_negative(name: &str, v: f64) -> Result<(), ConfigError> {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be >= 0, got {v}")))
            }
        }

        if self.texture.width == 0 || self.texture.height == 0 {
            return Err(ConfigError::Invalid("texture must be at least 1x1".into()));
        }
        finite_non_negative("start_scale", self.start_scale)?;
        finite_non_negative("end_scale", self.end_scale)?;
        finite_non_negative("min_particle_life_s", self.min_particle_life_s)?;
        finite_non_negative("min_speed", self.min_speed)?;
        finite_non_negative("emission_rate", self.emission_rate)?;
        finite_non_negative("system_lifetime_s", self.system_lifetime_s)?;
        if !(self.max_particle_life_s.is_finite()
            && self.max_particle_life_s >= self.min_particle_life_s)
        {
            return Err(ConfigError::Invalid(
                "max_particle_life_s must be >= min_particle_life_s".into(),
            ));
        }
        if !(self.max_speed.is_finite() && self.max_speed >= self.min_speed) {
            return Err(ConfigError::Invalid("max_speed must be >= min_speed".into()));
        }
        let EmitterShape::Sphere { radius } = self.emitter;
        finite_non_negative("emitter.radius", radius)?;
        if !(self.placement.standoff_m.is_finite() && self.placement.vertical_offset_m.is_finite())
        {
            return Err(ConfigError::Invalid("placement offsets must be finite".into()));
        }
        Ok(())
    }
}
