//! Frame timing and the FPS readout.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Measures the wall-clock time between frames.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    delta: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            last: start,
            delta: 0.0,
        }
    }

    /// Seconds since the previous tick, or since the clock was created on the first one.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f32 {
        self.delta = now.saturating_duration_since(self.last).as_secs_f32();
        self.last = now;
        self.delta
    }

    /// Time from creation to the latest tick.
    pub fn elapsed(&self) -> Duration {
        self.last.saturating_duration_since(self.start)
    }

    /// Result of the latest tick.
    pub fn delta(&self) -> f32 {
        self.delta
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Frame rate for a frame time, `None` when the frame time is too small to divide by.
pub fn fps(dt: f32) -> Option<f32> {
    (dt > FpsCounter::MIN_DELTA).then(|| 1.0 / dt)
}

/// Tracks recent frame times and formats the overlay text.
#[derive(Debug)]
pub struct FpsCounter {
    samples: VecDeque<f32>,
    current: Option<f32>,
    since_refresh: f32,
    readout: String,
}

impl FpsCounter {
    /// Frame times at or below this are not counted.
    pub const MIN_DELTA: f32 = 1e-6;
    pub const WINDOW: usize = 60;
    /// Seconds between two readout refreshes.
    pub const REFRESH_INTERVAL: f32 = 0.5;

    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(Self::WINDOW),
            current: None,
            since_refresh: Self::REFRESH_INTERVAL,
            readout: Self::format(None, None),
        }
    }

    /// Records one frame time. Returns whether the readout text changed.
    pub fn record(&mut self, dt: f32) -> bool {
        self.current = fps(dt);
        if self.current.is_some() {
            if self.samples.len() == Self::WINDOW {
                self.samples.pop_front();
            }
            self.samples.push_back(dt);
            self.since_refresh += dt;
        }

        if self.since_refresh < Self::REFRESH_INTERVAL {
            return false;
        }
        self.since_refresh = 0.0;

        let readout = Self::format(self.current, self.average());
        log::debug!("{}", readout);
        let changed = readout != self.readout;
        self.readout = readout;
        changed
    }

    /// Frame rate of the latest valid frame time.
    pub fn current(&self) -> Option<f32> {
        self.current
    }

    /// Frame rate over the last [`Self::WINDOW`] valid frames.
    pub fn average(&self) -> Option<f32> {
        let total: f32 = self.samples.iter().sum();
        (total > Self::MIN_DELTA).then(|| self.samples.len() as f32 / total)
    }

    pub fn readout(&self) -> &str {
        &self.readout
    }

    fn format(current: Option<f32>, average: Option<f32>) -> String {
        match (current, average) {
            (Some(current), Some(average)) => {
                format!("FPS: {} (avg {:.1})", current as u32, average)
            }
            (Some(current), None) => format!("FPS: {}", current as u32),
            (None, _) => "FPS: —".to_owned(),
        }
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
