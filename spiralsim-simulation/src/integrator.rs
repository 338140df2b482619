//! Per frame motion of a single point.

use crate::color::band_color;
use crate::config::GalaxyConfig;
use crate::generator::point_size;
use crate::Point;
use rand::Rng;
use std::f32::consts::TAU;

/// Largest angle change applied when a point respawns, in radians.
pub const RESPAWN_ANGLE_JITTER: f32 = 0.1;
/// Largest relative radius change applied when a point respawns.
pub const RESPAWN_RADIUS_JITTER: f32 = 0.1;

/// Rotates `point` and pulls it toward the center, both faster the closer it is.
///
/// A point that falls below `respawn_threshold` is moved back to the rim with a
/// fresh size and the color of its new radius. `respawn_rng` is only called in
/// that case. `step` scales the per frame motion, see [`GalaxyConfig::step_scale`].
///
/// Returns whether the point was respawned.
pub fn advance<R, F>(point: &mut Point, config: &GalaxyConfig, step: f32, respawn_rng: F) -> bool
where
    R: Rng,
    F: FnOnce() -> R,
{
    let falloff = config.falloff(point.radius);
    let mut angle = point.angle + config.base_rotation_speed * falloff * step;
    let mut radius = point.radius - config.speed * falloff * step;

    let respawn = radius < config.respawn_threshold;
    if respawn {
        let mut rng = respawn_rng();
        radius = config.max_radius;
        if config.respawn_jitter {
            angle += (rng.gen::<f32>() * 2.0 - 1.0) * RESPAWN_ANGLE_JITTER;
            radius *= 1.0 + (rng.gen::<f32>() * 2.0 - 1.0) * RESPAWN_RADIUS_JITTER;
            radius = radius.min(config.max_radius);
        }
        point.size = point_size(config, &mut rng);
        point.color = band_color(config.normalize(radius));
    }

    point.radius = radius;
    point.angle = angle.rem_euclid(TAU);
    respawn
}
