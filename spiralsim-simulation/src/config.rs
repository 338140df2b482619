use crate::error::ConfigError;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::Path;

/// Closed range a user supplied parameter has to fall into.
#[derive(Copy, Clone, Debug)]
pub struct Bounds<T> {
    pub field: &'static str,
    pub min: T,
    pub max: T,
}

impl<T> Bounds<T>
where
    T: PartialOrd + Copy + Display,
{
    pub fn contains(&self, value: T) -> bool {
        // written this way round so that NaN is rejected
        value >= self.min && value <= self.max
    }

    pub fn check(&self, value: T) -> Result<T, ConfigError> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(ConfigError::OutOfRange {
                field: self.field,
                min: self.min.to_string(),
                max: self.max.to_string(),
                value: value.to_string(),
            })
        }
    }
}

/// Settings of the decorative sparkle overlay.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SparkleConfig {
    /// Seconds of wall-clock time between two emissions.
    pub interval: f32,
    /// Seconds a sparkle stays visible.
    pub lifetime: f32,
    pub radius: f32,
    pub points: u8,
    /// Upper limit on simultaneously alive sparkles.
    pub max_active: usize,
}

impl SparkleConfig {
    /// Emission can never be scheduled more often than this.
    pub const MIN_INTERVAL: f32 = 0.02;
}

impl Default for SparkleConfig {
    fn default() -> Self {
        Self {
            interval: 0.1,
            lifetime: 1.5,
            radius: 6.0,
            points: 5,
            max_active: 64,
        }
    }
}

/// Parameters of a galaxy simulation.
///
/// Built once before the frame loop starts and handed to the simulation by value,
/// nothing mutates it afterwards.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalaxyConfig {
    pub count: u32,
    pub max_radius: f32,
    pub angle_increment: f32,
    pub num_arms: u32,
    /// Base inward drift per frame.
    pub speed: f32,
    /// Base rotation per frame in radians.
    pub base_rotation_speed: f32,
    pub center: Vector2<f32>,
    /// A point whose radius drops below this is sent back to the rim.
    pub respawn_threshold: f32,
    pub respawn_jitter: bool,
    pub large_point_probability: f32,
    pub small_point_size: f32,
    pub large_point_size: f32,
    /// Scale rotation and drift by the frame time instead of applying them once per frame.
    pub frame_rate_independent: bool,
    pub seed: Option<u64>,
    pub sparkles: SparkleConfig,
}

impl GalaxyConfig {
    pub const COUNT: Bounds<u32> = Bounds {
        field: "count",
        min: 5000,
        max: 30000,
    };
    pub const MAX_RADIUS: Bounds<f32> = Bounds {
        field: "max_radius",
        min: 300.0,
        max: 450.0,
    };
    pub const SPEED: Bounds<f32> = Bounds {
        field: "speed",
        min: 0.035,
        max: 0.099,
    };
    pub const BASE_ROTATION_SPEED: Bounds<f32> = Bounds {
        field: "base_rotation_speed",
        min: 0.0007,
        max: 0.007,
    };

    /// Frame rate the per frame constants were tuned for.
    pub const REFERENCE_FPS: f32 = 60.0;

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::COUNT.check(self.count)?;
        Self::MAX_RADIUS.check(self.max_radius)?;
        Self::SPEED.check(self.speed)?;
        Self::BASE_ROTATION_SPEED.check(self.base_rotation_speed)?;

        if self.num_arms == 0 {
            return Err(ConfigError::Invalid {
                field: "num_arms",
                reason: "a galaxy needs at least one arm",
            });
        }
        if !self.angle_increment.is_finite() {
            return Err(ConfigError::Invalid {
                field: "angle_increment",
                reason: "must be finite",
            });
        }
        if !self.center.iter().all(|c| c.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "center",
                reason: "must be finite",
            });
        }
        if !(self.respawn_threshold >= 0.0 && self.respawn_threshold < self.max_radius) {
            return Err(ConfigError::Invalid {
                field: "respawn_threshold",
                reason: "must lie in [0, max_radius)",
            });
        }
        if !(0.0..=1.0).contains(&self.large_point_probability) {
            return Err(ConfigError::Invalid {
                field: "large_point_probability",
                reason: "must lie in [0, 1]",
            });
        }
        if !(self.small_point_size > 0.0 && self.large_point_size > 0.0) {
            return Err(ConfigError::Invalid {
                field: "point size",
                reason: "must be positive",
            });
        }

        let sparkles = &self.sparkles;
        if !(sparkles.interval >= SparkleConfig::MIN_INTERVAL) {
            return Err(ConfigError::Invalid {
                field: "sparkles.interval",
                reason: "emission interval is below the safe minimum",
            });
        }
        if !(sparkles.lifetime > 0.0) {
            return Err(ConfigError::Invalid {
                field: "sparkles.lifetime",
                reason: "must be positive",
            });
        }
        if sparkles.points < 2 || !(sparkles.radius > 0.0) {
            return Err(ConfigError::Invalid {
                field: "sparkles",
                reason: "a star needs at least two points and a positive radius",
            });
        }
        if sparkles.max_active == 0 {
            return Err(ConfigError::Invalid {
                field: "sparkles.max_active",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Radius divided by `max_radius`.
    pub fn normalize(&self, radius: f32) -> f32 {
        radius / self.max_radius
    }

    /// Grows from 1 at the rim to 2 at the center, speeding up inner points.
    pub fn falloff(&self, radius: f32) -> f32 {
        1.0 + (self.max_radius - radius) / self.max_radius
    }

    /// Multiplier applied to the per frame rotation and drift.
    pub fn step_scale(&self, dt: f32) -> f32 {
        if self.frame_rate_independent {
            dt * Self::REFERENCE_FPS
        } else {
            1.0
        }
    }
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            count: 15000,
            max_radius: 450.0,
            angle_increment: 0.70,
            num_arms: 5,
            speed: 0.035,
            base_rotation_speed: 0.0007,
            center: Vector2::new(400.0, 400.0),
            respawn_threshold: 0.0,
            respawn_jitter: true,
            large_point_probability: 0.3,
            small_point_size: 1.0,
            large_point_size: 2.0,
            frame_rate_independent: false,
            seed: None,
            sparkles: SparkleConfig::default(),
        }
    }
}
