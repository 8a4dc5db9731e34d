//! One generation session: a generator painting into a tilemap, paced by a
//! fixed-timestep frame loop.

use isle_config::Config;
use isle_terrain::{
    GenerationError, IslandGenerator, PerlinNoise, RunMode, StepOutcome, TilemapSink,
};
use tracing::{debug, info};

use crate::frame_loop::FrameLoop;

/// Summary of a finished session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionReport {
    /// The seed the island was generated from.
    pub seed: String,
    /// Points the run spent.
    pub total_points: u64,
    /// Frame-loop ticks needed, one generation step per tick.
    pub ticks: u64,
    /// Simulated seconds those ticks represent.
    pub sim_seconds: f64,
    /// Tile emissions received by the sink.
    pub tiles_emitted: usize,
}

/// Drives an [`IslandGenerator`] one step per frame-loop tick.
pub struct IslandSession {
    generator: IslandGenerator<TilemapSink>,
    frames: FrameLoop,
    show_progress: bool,
}

impl IslandSession {
    /// Build the generator described by `config`.
    pub fn new(config: &Config) -> Result<Self, GenerationError> {
        let generator = IslandGenerator::builder(config.generator.clone())
            .noise(PerlinNoise::new(config.noise.permutation_seed))
            .sink(TilemapSink::new())
            .build()?;

        Ok(Self {
            generator,
            frames: FrameLoop::new(config.debug.tick_rate_hz),
            show_progress: config.debug.show_progress,
        })
    }

    /// The underlying generator.
    pub fn generator(&self) -> &IslandGenerator<TilemapSink> {
        &self.generator
    }

    /// Mutable access to the generator, e.g. for edge queries.
    pub fn generator_mut(&mut self) -> &mut IslandGenerator<TilemapSink> {
        &mut self.generator
    }

    /// Simulate the run's cost, then generate it tick by tick.
    pub fn run(&mut self) -> Result<SessionReport, GenerationError> {
        let total = self.generator.total_points()?;
        info!(total, "simulated point budget");

        self.generator.start(RunMode::Active)?;
        let start_ticks = self.frames.update_count();
        let start_time = self.frames.total_sim_time();
        let dt = self.frames.dt();

        let generator = &mut self.generator;
        let show_progress = self.show_progress;
        let mut finished: Option<Result<u64, GenerationError>> = None;
        while finished.is_none() {
            self.frames.advance(dt, |_, _| {
                if finished.is_some() {
                    return;
                }
                match generator.resume() {
                    Ok(StepOutcome::Yielded(points)) => {
                        if show_progress && total > 0 {
                            let percent = points as f64 * 100.0 / total as f64;
                            info!(points, total, "generating {percent:.1}%");
                        } else {
                            debug!(points, "step");
                        }
                    }
                    Ok(StepOutcome::Completed(points)) => finished = Some(Ok(points)),
                    Err(err) => finished = Some(Err(err)),
                }
            });
        }

        let total_points = finished.unwrap_or(Err(GenerationError::NoActiveRun))?;
        let report = SessionReport {
            seed: self.generator.seed().unwrap_or_default().to_string(),
            total_points,
            ticks: self.frames.update_count() - start_ticks,
            sim_seconds: self.frames.total_sim_time() - start_time,
            tiles_emitted: self.generator.sink().map_or(0, TilemapSink::emitted),
        };
        info!(
            seed = %report.seed,
            ticks = report.ticks,
            frames = self.frames.frame_count(),
            sim_seconds = report.sim_seconds,
            tiles = report.tiles_emitted,
            "island ready"
        );
        Ok(report)
    }
}
