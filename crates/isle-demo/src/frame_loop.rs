//! Fixed-timestep frame loop that paces progressive generation.
//!
//! Frame time feeds an accumulator; every whole tick drains one fixed step
//! from it and runs one update. The demo advances the loop with simulated
//! frame times, so a run's pacing is reproducible.

use tracing::warn;

/// Frame time above which the loop clamps instead of catching up.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Fixed-timestep loop state.
pub struct FrameLoop {
    dt: f64,
    accumulator: f64,
    total_sim_time: f64,
    frame_count: u64,
    update_count: u64,
}

impl FrameLoop {
    /// A loop running `tick_rate_hz` updates per simulated second.
    /// A rate of zero is treated as one.
    pub fn new(tick_rate_hz: u32) -> Self {
        Self {
            dt: 1.0 / f64::from(tick_rate_hz.max(1)),
            accumulator: 0.0,
            total_sim_time: 0.0,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Length of one fixed step in seconds.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Run one frame of explicit length `frame_time` seconds.
    ///
    /// `update_fn(dt, total_sim_time)` is called once per whole fixed step
    /// the frame contains. Returns the interpolation alpha in `[0, 1)`.
    pub fn advance(&mut self, frame_time: f64, mut update_fn: impl FnMut(f64, f64)) -> f64 {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;
        while self.accumulator >= self.dt {
            update_fn(self.dt, self.total_sim_time);
            self.total_sim_time += self.dt;
            self.accumulator -= self.dt;
            self.update_count += 1;
        }

        self.frame_count += 1;
        self.alpha()
    }

    /// Returns the current interpolation alpha without running a frame.
    pub fn alpha(&self) -> f64 {
        if self.accumulator > 0.0 {
            self.accumulator / self.dt
        } else {
            0.0
        }
    }

    /// Returns the total number of frames run.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Returns the total number of fixed updates executed.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Returns the total simulated time in seconds.
    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}
