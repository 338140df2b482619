use rand::rngs::mock::StepRng;
use spiralsim_simulation::color::band_color;
use spiralsim_simulation::config::GalaxyConfig;
use spiralsim_simulation::generator::spawn_point;
use spiralsim_simulation::integrator::advance;
use spiralsim_simulation::rng::point_stream;
use spiralsim_simulation::scene::Scene;
use spiralsim_simulation::{Galaxy, Point, Schedule};
use std::time::Duration;

fn rgb(radius: f32) -> (u8, u8, u8) {
    let color = band_color(radius);
    (color.red, color.green, color.blue)
}

#[test]
fn color_scenarios() {
    assert_eq!(rgb(0.0), (200, 200, 100));
    assert_eq!(rgb(0.3), (100, 100, 200));
    assert_eq!(rgb(1.0), (207, 0, 180));
}

#[test]
fn stubbed_generator_places_point_at_center() {
    let config = GalaxyConfig {
        count: 1,
        max_radius: 450.0,
        num_arms: 1,
        ..Default::default()
    };
    let point = spawn_point(&config, 0, &mut StepRng::new(0, 0));

    assert_eq!(point.radius, 0.0);
    assert_eq!(point.angle, 0.0);
    assert_eq!(point.position(&config.center), config.center);
    assert_eq!(point.color, band_color(0.0));
}

#[test]
fn point_below_threshold_respawns_on_next_update() {
    let config = GalaxyConfig::default();
    let mut point = Point {
        radius: 0.02,
        angle: 0.5,
        size: 1.0,
        color: band_color(0.0),
    };

    assert!(advance(&mut point, &config, 1.0, || point_stream(1, 1, 0)));
    assert!(point.radius >= 0.9 * config.max_radius - 1e-3);
    assert!(point.radius <= config.max_radius);
    assert_eq!(point.color, band_color(point.radius / config.max_radius));
}

#[test]
fn long_run_keeps_every_point_valid() {
    let config = GalaxyConfig {
        count: 5000,
        max_radius: 300.0,
        speed: 0.099,
        base_rotation_speed: 0.007,
        ..Default::default()
    };
    let mut galaxy = Galaxy::new(config, Schedule::Parallel, 1234);

    for _ in 0..2000 {
        galaxy.update(1.0 / 60.0);
    }
    for point in galaxy.points() {
        assert!(point.radius >= 0.0 && point.radius <= config.max_radius);
        assert!(point.angle >= 0.0 && point.angle <= std::f32::consts::TAU);
        assert!(point.size == config.small_point_size || point.size == config.large_point_size);
    }
}

#[test]
fn parallel_run_matches_sequential_run() {
    let config = GalaxyConfig {
        count: 8000,
        seed: Some(5),
        ..Default::default()
    };
    let run = |schedule| {
        let mut scene = Scene::new(config, schedule);
        let mut now = Duration::ZERO;
        for _ in 0..300 {
            now += Duration::from_millis(16);
            scene.step(0.016, now);
        }
        scene.galaxy().points().to_vec()
    };

    let sequential = run(Schedule::Sequential);
    assert_eq!(sequential, run(Schedule::Sequential));
    assert_eq!(sequential, run(Schedule::Parallel));
}
