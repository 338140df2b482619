use crate::clock::{FpsCounter, FrameClock};
use crate::config::GalaxyConfig;
use crate::render::{DrawCommand, Layer, Renderer, Shape};
use crate::sparkle::SparkleEmitter;
use crate::{Galaxy, Schedule};
use palette::Srgba;
use rayon::prelude::*;
use std::time::Duration;

/// Everything that changes from frame to frame.
pub struct Scene {
    galaxy: Galaxy,
    sparkles: SparkleEmitter,
    clock: FrameClock,
    fps: FpsCounter,
    show_fps: bool,

    point_commands: Vec<DrawCommand>,
    sparkle_commands: Vec<DrawCommand>,
}

impl Scene {
    /// Seeds from `config.seed`, or from entropy if there is none.
    pub fn new(config: GalaxyConfig, schedule: Schedule) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::with_seed(config, schedule, seed)
    }

    pub fn with_seed(config: GalaxyConfig, schedule: Schedule, seed: u64) -> Self {
        log::info!("starting galaxy with seed {}", seed);
        Self {
            sparkles: SparkleEmitter::new(&config, seed),
            point_commands: Vec::with_capacity(config.count as usize),
            sparkle_commands: Vec::with_capacity(config.sparkles.max_active),
            galaxy: Galaxy::new(config, schedule, seed),
            clock: FrameClock::new(),
            fps: FpsCounter::new(),
            show_fps: true,
        }
    }

    pub fn show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Runs one frame against the wall clock and draws it.
    pub fn frame<R: Renderer>(&mut self, renderer: &mut R) -> Result<(), R::Error> {
        let dt = self.clock.tick();
        self.step(dt, self.clock.elapsed());
        self.draw(renderer)
    }

    /// Advances the simulation by a frame of length `dt` ending at `now`.
    ///
    /// Returns the number of respawned points.
    pub fn step(&mut self, dt: f32, now: Duration) -> usize {
        let respawned = self.galaxy.update(dt);
        self.sparkles.update(now, dt);
        if self.show_fps {
            self.fps.record(dt);
        }
        respawned
    }

    pub fn draw<R: Renderer>(&mut self, renderer: &mut R) -> Result<(), R::Error> {
        renderer.clear();

        let center = self.galaxy.config().center;
        let to_command = |point: &crate::Point| DrawCommand {
            shape: Shape::Circle,
            position: point.position(&center),
            color: Srgba::new(point.color.red, point.color.green, point.color.blue, u8::MAX),
            size: point.size,
        };
        self.point_commands.clear();
        match self.galaxy.schedule() {
            Schedule::Sequential => self
                .point_commands
                .extend(self.galaxy.points().iter().map(to_command)),
            Schedule::Parallel => self
                .point_commands
                .par_extend(self.galaxy.points().par_iter().map(to_command)),
        }
        renderer.draw(Layer::Points, &self.point_commands);

        let settings = *self.sparkles.settings();
        self.sparkle_commands.clear();
        self.sparkle_commands
            .extend(self.sparkles.active().iter().map(|sparkle| DrawCommand {
                shape: Shape::star(settings.points),
                position: *sparkle.position(),
                color: Srgba::new(u8::MAX, u8::MAX, u8::MAX, sparkle.alpha()),
                size: settings.radius,
            }));
        renderer.draw(Layer::Sparkles, &self.sparkle_commands);

        if self.show_fps {
            renderer.draw_text(self.fps.readout());
        }
        renderer.display()
    }

    pub fn galaxy(&self) -> &Galaxy {
        &self.galaxy
    }

    pub fn sparkles(&self) -> &SparkleEmitter {
        &self.sparkles
    }

    pub fn fps(&self) -> &FpsCounter {
        &self.fps
    }
}
