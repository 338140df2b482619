use crate::color::Color;
use crate::config::GalaxyConfig;
use crate::rng::{point_stream, respawn_salt};
use nalgebra::Vector2;
use rayon::prelude::*;

pub mod clock;
pub mod color;
pub mod config;
pub mod error;
pub mod generator;
pub mod integrator;
pub mod prompt;
pub mod render;
pub mod rng;
pub mod scene;
pub mod sparkle;

/// One particle of the galaxy.
///
/// The polar coordinates relative to the galaxy center are authoritative,
/// the cartesian position is derived from them whenever it is drawn.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point {
    pub radius: f32,
    /// Always wrapped into `[0, 2π)`.
    pub angle: f32,
    pub size: f32,
    /// Assigned at spawn and respawn, constant in between.
    pub color: Color,
}

impl Point {
    pub fn position(&self, center: &Vector2<f32>) -> Vector2<f32> {
        center + Vector2::new(self.angle.cos(), self.angle.sin()) * self.radius
    }
}

/// How per point work is scheduled.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum Schedule {
    #[default]
    Sequential,
    /// Spread over the rayon thread pool.
    Parallel,
}

/// The fixed set of points together with the parameters driving them.
pub struct Galaxy {
    points: Vec<Point>,
    config: GalaxyConfig,
    schedule: Schedule,
    seed: u64,
    frame: u64,
}

impl Galaxy {
    pub fn new(config: GalaxyConfig, schedule: Schedule, seed: u64) -> Self {
        let points = generator::generate(&config, seed, schedule);
        log::info!(
            "generated {} points on {} arms ({:?}, seed {})",
            points.len(),
            config.num_arms,
            schedule,
            seed
        );

        Self {
            points,
            config,
            schedule,
            seed,
            frame: 0,
        }
    }

    /// Advances every point by one frame and returns how many were respawned.
    ///
    /// Returns only once all points are updated, whatever the schedule.
    pub fn update(&mut self, dt: f32) -> usize {
        let config = &self.config;
        let seed = self.seed;
        let salt = respawn_salt(self.frame);
        let step = config.step_scale(dt);

        let advance = |(i, point): (usize, &mut Point)| {
            integrator::advance(point, config, step, || point_stream(seed, salt, i as u64)) as usize
        };

        let respawned: usize = match self.schedule {
            Schedule::Sequential => self.points.iter_mut().enumerate().map(advance).sum(),
            Schedule::Parallel => self.points.par_iter_mut().enumerate().map(advance).sum(),
        };

        self.frame += 1;
        respawned
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn config(&self) -> &GalaxyConfig {
        &self.config
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of updates applied so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> GalaxyConfig {
        GalaxyConfig {
            count: 5000,
            ..Default::default()
        }
    }

    #[test]
    fn position_is_derived_from_polar_state() {
        let point = Point {
            radius: 10.0,
            angle: std::f32::consts::FRAC_PI_2,
            size: 1.0,
            color: color::band_color(0.0),
        };
        let position = point.position(&Vector2::new(400.0, 400.0));
        assert!((position.x - 400.0).abs() < 1e-4);
        assert!((position.y - 410.0).abs() < 1e-4);
    }

    #[test]
    fn update_keeps_point_count() {
        let mut galaxy = Galaxy::new(small_config(), Schedule::Sequential, 1);
        for _ in 0..10 {
            galaxy.update(1.0 / 60.0);
        }
        assert_eq!(galaxy.points().len(), 5000);
        assert_eq!(galaxy.frame(), 10);
    }

    #[test]
    fn schedules_agree() {
        let mut sequential = Galaxy::new(small_config(), Schedule::Sequential, 99);
        let mut parallel = Galaxy::new(small_config(), Schedule::Parallel, 99);
        assert_eq!(sequential.points(), parallel.points());

        for _ in 0..50 {
            assert_eq!(sequential.update(0.016), parallel.update(0.016));
        }
        assert_eq!(sequential.points(), parallel.points());
    }

    #[test]
    fn points_stay_in_range() {
        let config = GalaxyConfig {
            count: 5000,
            speed: 0.099,
            ..Default::default()
        };
        let mut galaxy = Galaxy::new(config, Schedule::Parallel, 5);
        let mut respawned = 0;
        for _ in 0..600 {
            respawned += galaxy.update(0.016);
            for point in galaxy.points() {
                assert!(point.radius >= 0.0 && point.radius <= config.max_radius);
                assert!(point.angle >= 0.0 && point.angle <= std::f32::consts::TAU);
            }
        }
        // the innermost points reach the center within 600 frames
        assert!(respawned > 0);
    }
}
