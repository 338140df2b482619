use crate::config::{GalaxyConfig, SparkleConfig};
use crate::rng::{sparkle_stream, SimRng};
use nalgebra::Vector2;
use rand::Rng;
use std::f32::consts::TAU;
use std::time::Duration;

/// A short lived star drawn on top of the galaxy. It never moves and fades out
/// linearly over its lifetime.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sparkle {
    position: Vector2<f32>,
    lifetime: f32,
    initial_lifetime: f32,
    alpha: u8,
}

impl Sparkle {
    pub fn new(position: Vector2<f32>, lifetime: f32) -> Self {
        Self {
            position,
            lifetime,
            initial_lifetime: lifetime,
            alpha: u8::MAX,
        }
    }

    pub fn position(&self) -> &Vector2<f32> {
        &self.position
    }

    /// Remaining lifetime in seconds.
    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    /// Counts the lifetime down by `dt`, returns `false` once it has run out.
    pub fn age(&mut self, dt: f32) -> bool {
        self.lifetime -= dt;
        if self.lifetime <= 0.0 {
            return false;
        }
        // a living sparkle never becomes fully transparent
        self.alpha = (255.0 * self.lifetime / self.initial_lifetime)
            .round()
            .clamp(1.0, 255.0) as u8;
        true
    }
}

/// Emits sparkles on a fixed wall-clock interval and retires them when they expire.
pub struct SparkleEmitter {
    active: Vec<Sparkle>,
    settings: SparkleConfig,
    center: Vector2<f32>,
    max_radius: f32,
    last_emission: Duration,
    rng: SimRng,
}

impl SparkleEmitter {
    pub fn new(config: &GalaxyConfig, seed: u64) -> Self {
        Self {
            active: Vec::with_capacity(config.sparkles.max_active),
            settings: config.sparkles,
            center: config.center,
            max_radius: config.max_radius,
            last_emission: Duration::ZERO,
            rng: sparkle_stream(seed),
        }
    }

    /// Ages every sparkle by the frame time `dt`, then emits a new one if more
    /// than one interval has passed since the last emission at time `now`.
    ///
    /// Returns whether a sparkle was emitted.
    pub fn update(&mut self, now: Duration, dt: f32) -> bool {
        self.age(dt);

        let since_last = now.saturating_sub(self.last_emission).as_secs_f32();
        if since_last <= self.settings.interval {
            return false;
        }
        self.last_emission = now;

        if self.active.len() >= self.settings.max_active {
            log::debug!(
                "{} sparkles alive, skipping emission",
                self.settings.max_active
            );
            return false;
        }
        self.emit();
        true
    }

    pub fn age(&mut self, dt: f32) {
        self.active.retain_mut(|sparkle| sparkle.age(dt));
    }

    /// Places a new sparkle at a random spot of the galaxy disk.
    pub fn emit(&mut self) -> &Sparkle {
        let radius = self.rng.gen::<f32>() * self.max_radius;
        let angle = self.rng.gen::<f32>() * TAU;
        let position = self.center + Vector2::new(angle.cos(), angle.sin()) * radius;

        self.active.push(Sparkle::new(position, self.settings.lifetime));
        &self.active[self.active.len() - 1]
    }

    /// Alive sparkles, oldest first.
    pub fn active(&self) -> &[Sparkle] {
        &self.active
    }

    pub fn settings(&self) -> &SparkleConfig {
        &self.settings
    }
}
