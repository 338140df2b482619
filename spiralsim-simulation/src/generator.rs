//! Placement of the initial points along the spiral arms.

use crate::color::band_color;
use crate::config::GalaxyConfig;
use crate::rng::{point_stream, SPAWN_SALT};
use crate::{Point, Schedule};
use rand::Rng;
use rayon::prelude::*;
use std::f32::consts::TAU;

/// Builds `config.count` points, point `i` drawing from its own random stream.
pub fn generate(config: &GalaxyConfig, seed: u64, schedule: Schedule) -> Vec<Point> {
    let spawn = |i: u32| spawn_point(config, i, &mut point_stream(seed, SPAWN_SALT, i as u64));

    match schedule {
        Schedule::Sequential => (0..config.count).map(spawn).collect(),
        Schedule::Parallel => (0..config.count).into_par_iter().map(spawn).collect(),
    }
}

/// Places point `index` on a randomly chosen arm.
///
/// The arm angle combines a linear term in `index`, the offset of the chosen arm
/// and half of a random angle, which smears the arms into overlapping bands.
/// The radius samples the disk uniformly by area with ±10% jitter, capped at
/// `max_radius`.
pub fn spawn_point<R: Rng + ?Sized>(config: &GalaxyConfig, index: u32, rng: &mut R) -> Point {
    let angle_offset = rng.gen::<f32>() * TAU;
    let arm = rng.gen_range(0..config.num_arms);

    // the linear term grows large, reduce it in double precision
    let linear = (index as f64 * config.angle_increment as f64).rem_euclid(std::f64::consts::TAU);
    let arm_angle =
        linear as f32 + TAU / config.num_arms as f32 * arm as f32 + angle_offset * 0.5;

    let radius = config.max_radius * rng.gen::<f32>().sqrt() * (0.9 + 0.2 * rng.gen::<f32>());
    let radius = radius.min(config.max_radius);

    Point {
        radius,
        angle: arm_angle.rem_euclid(TAU),
        size: point_size(config, rng),
        color: band_color(config.normalize(radius)),
    }
}

pub(crate) fn point_size<R: Rng + ?Sized>(config: &GalaxyConfig, rng: &mut R) -> f32 {
    if rng.gen::<f32>() < config.large_point_probability {
        config.large_point_size
    } else {
        config.small_point_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn generates_requested_count() {
        let config = GalaxyConfig {
            count: 5000,
            ..Default::default()
        };
        let points = generate(&config, 3, Schedule::Sequential);
        assert_eq!(points.len(), 5000);
    }

    #[test]
    fn generation_is_reproducible() {
        let config = GalaxyConfig {
            count: 5000,
            ..Default::default()
        };
        assert_eq!(
            generate(&config, 11, Schedule::Sequential),
            generate(&config, 11, Schedule::Sequential)
        );
        assert_ne!(
            generate(&config, 11, Schedule::Sequential),
            generate(&config, 12, Schedule::Sequential)
        );
    }

    #[test]
    fn radius_and_color_follow_placement() {
        let config = GalaxyConfig::default();
        for point in generate(&config, 8, Schedule::Parallel) {
            assert!(point.radius >= 0.0 && point.radius <= config.max_radius);
            assert!(point.angle >= 0.0 && point.angle <= TAU);
            assert_eq!(point.color, band_color(point.radius / config.max_radius));
            assert!(point.size == 1.0 || point.size == 2.0);
        }
    }

    #[test]
    fn roughly_thirty_percent_are_large() {
        let config = GalaxyConfig::default();
        let points = generate(&config, 21, Schedule::Sequential);
        let large = points.iter().filter(|p| p.size == config.large_point_size).count();
        let share = large as f32 / points.len() as f32;
        assert!((0.27..0.33).contains(&share), "share of large points {}", share);
    }

    #[test]
    fn zero_draws_place_point_at_center() {
        let config = GalaxyConfig {
            count: 1,
            num_arms: 1,
            ..Default::default()
        };
        let point = spawn_point(&config, 0, &mut StepRng::new(0, 0));

        assert_eq!(point.radius, 0.0);
        assert_eq!(point.angle, 0.0);
        assert_eq!(point.position(&config.center), config.center);
        assert_eq!(point.color, band_color(0.0));
    }
}
