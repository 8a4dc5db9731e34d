//! The island generator: owns the collaborators and drives one run at a time.

use glam::{DVec2, IVec2};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::config::GenerationConfig;
use crate::edge::{Quadrant, ellipse_x, find_edge_tile};
use crate::error::GenerationError;
use crate::noise_field::NoiseSource;
use crate::progressive::{GenerationRun, RunMode, StepOutcome};
use crate::seed::resolve_seed;
use crate::sink::{NullSink, TileSink};
use crate::tile::{MapFrame, TileCell, TileField};

type ProgressFn = Box<dyn FnMut(u64)>;

/// Builder for [`IslandGenerator`].
///
/// A noise source is mandatory. The sink is only needed for active runs, and
/// the random source defaults to an OS-seeded [`ChaCha8Rng`].
pub struct IslandGeneratorBuilder<S = NullSink> {
    config: GenerationConfig,
    noise: Option<Box<dyn NoiseSource>>,
    sink: Option<S>,
    rng: Option<Box<dyn RngCore>>,
    progress: Option<ProgressFn>,
}

impl IslandGeneratorBuilder<NullSink> {
    /// Start building a generator for `config`.
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            config,
            noise: None,
            sink: None,
            rng: None,
            progress: None,
        }
    }
}

impl<S: TileSink> IslandGeneratorBuilder<S> {
    /// Noise function sampled for every cell.
    pub fn noise(mut self, noise: impl NoiseSource + 'static) -> Self {
        self.noise = Some(Box::new(noise));
        self
    }

    /// Destination for emitted tiles.
    pub fn sink<T: TileSink>(self, sink: T) -> IslandGeneratorBuilder<T> {
        IslandGeneratorBuilder {
            config: self.config,
            noise: self.noise,
            sink: Some(sink),
            rng: self.rng,
            progress: self.progress,
        }
    }

    /// Random source for auto-seeds and edge-query defaults.
    pub fn rng(mut self, rng: impl RngCore + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Called with the cumulative point count every time a run yields.
    pub fn on_progress(mut self, progress: impl FnMut(u64) + 'static) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Validate the configuration and assemble the generator.
    ///
    /// # Errors
    ///
    /// [`GenerationError::InvalidConfiguration`] for a bad config,
    /// [`GenerationError::MissingNoiseSource`] if no noise was supplied.
    pub fn build(self) -> Result<IslandGenerator<S>, GenerationError> {
        self.config.validate()?;
        let noise = self.noise.ok_or(GenerationError::MissingNoiseSource)?;
        let rng = self
            .rng
            .unwrap_or_else(|| Box::new(ChaCha8Rng::from_os_rng()));

        Ok(IslandGenerator {
            config: self.config,
            noise,
            sink: self.sink,
            rng,
            progress: self.progress,
            seed: None,
            run: None,
            field: None,
        })
    }
}

/// Generates island fields and paints them into a [`TileSink`].
///
/// One run is in flight at a time. [`start`](Self::start) begins a run,
/// [`resume`](Self::resume) advances it by one step budget, and
/// [`generate`](Self::generate) does both until completion. The seed is
/// resolved once and pinned until [`reset`](Self::reset).
pub struct IslandGenerator<S = NullSink> {
    config: GenerationConfig,
    noise: Box<dyn NoiseSource>,
    sink: Option<S>,
    rng: Box<dyn RngCore>,
    progress: Option<ProgressFn>,
    seed: Option<String>,
    run: Option<GenerationRun>,
    field: Option<TileField>,
}

impl IslandGenerator<NullSink> {
    /// Shorthand for [`IslandGeneratorBuilder::new`].
    pub fn builder(config: GenerationConfig) -> IslandGeneratorBuilder<NullSink> {
        IslandGeneratorBuilder::new(config)
    }
}

impl<S: TileSink> IslandGenerator<S> {
    // -----------------------------------------------------------------------
    // Running
    // -----------------------------------------------------------------------

    /// Begin a new run, discarding any previous run and its field.
    ///
    /// # Errors
    ///
    /// [`GenerationError::MissingSink`] for an active run without a sink,
    /// [`GenerationError::InvalidConfiguration`] if the config fails validation.
    pub fn start(&mut self, mode: RunMode) -> Result<(), GenerationError> {
        if mode == RunMode::Active && self.sink.is_none() {
            return Err(GenerationError::MissingSink);
        }
        self.run = None;
        self.field = None;

        let seed = self.resolved_seed();
        info!(
            %seed,
            width = self.config.width,
            height = self.config.height,
            layers = self.config.layer_count(),
            ?mode,
            "starting island generation"
        );
        self.run = Some(GenerationRun::new(self.config.clone(), seed, mode)?);
        Ok(())
    }

    /// Advance the current run by one step budget.
    ///
    /// When the run completes its field becomes available through
    /// [`field`](Self::field) and the lookups.
    ///
    /// # Errors
    ///
    /// [`GenerationError::NoActiveRun`] if no run was started or the last one
    /// already completed.
    pub fn resume(&mut self) -> Result<StepOutcome, GenerationError> {
        let run = self.run.as_mut().ok_or(GenerationError::NoActiveRun)?;

        let mut null = NullSink;
        let sink: &mut dyn TileSink = match (run.mode(), self.sink.as_mut()) {
            (RunMode::Active, Some(sink)) => sink,
            (RunMode::Active, None) => return Err(GenerationError::MissingSink),
            (RunMode::Simulate, _) => &mut null,
        };
        let progress = &mut self.progress;
        let mut report = |points: u64| {
            if let Some(callback) = progress.as_mut() {
                callback(points);
            }
        };

        let outcome = run.resume(self.noise.as_ref(), sink, &mut report);
        if let StepOutcome::Completed(total) = outcome
            && let Some(run) = self.run.take()
        {
            info!(seed = run.seed(), total, "island generation complete");
            self.field = Some(run.into_field());
        }
        Ok(outcome)
    }

    /// Run an active generation to completion. Returns the points spent.
    ///
    /// # Errors
    ///
    /// [`GenerationError::MissingSink`] if the generator has no sink.
    pub fn generate(&mut self) -> Result<u64, GenerationError> {
        self.start(RunMode::Active)?;
        loop {
            if let StepOutcome::Completed(total) = self.resume()? {
                return Ok(total);
            }
        }
    }

    /// Points a full active run would spend with the current seed.
    ///
    /// Resolves and pins the seed, then simulates a separate run; any run in
    /// flight and the last generated field are left untouched.
    ///
    /// # Errors
    ///
    /// [`GenerationError::InvalidConfiguration`] if the config fails validation.
    pub fn total_points(&mut self) -> Result<u64, GenerationError> {
        let seed = self.resolved_seed();
        let mut run = GenerationRun::new(self.config.clone(), seed, RunMode::Simulate)?;
        let total = run.run_to_completion(self.noise.as_ref(), &mut NullSink, &mut |_| {});
        debug!(total, "simulated point total");
        Ok(total)
    }

    /// Forget the resolved seed so the next run derives a new one.
    pub fn reset(&mut self) {
        self.seed = None;
    }

    /// Returns `true` once a seed has been resolved and pinned.
    pub fn is_generated(&self) -> bool {
        self.seed.is_some()
    }

    /// Returns `true` while a started run has not completed.
    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Points spent by the run in flight, if any.
    pub fn points_done(&self) -> Option<u64> {
        self.run.as_ref().map(GenerationRun::points_done)
    }

    fn resolved_seed(&mut self) -> String {
        if let Some(seed) = &self.seed {
            return seed.clone();
        }
        let seed = resolve_seed(&self.config.seed, self.config.random_seed, self.rng.as_mut());
        debug!(%seed, "resolved seed");
        self.seed = Some(seed.clone());
        seed
    }

    // -----------------------------------------------------------------------
    // Configuration and collaborators
    // -----------------------------------------------------------------------

    /// The active configuration.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Replace the configuration. The pinned seed is dropped so a changed
    /// seed string takes effect; a run already in flight keeps its own copy.
    ///
    /// # Errors
    ///
    /// [`GenerationError::InvalidConfiguration`]; the old config is kept.
    pub fn set_config(&mut self, config: GenerationConfig) -> Result<(), GenerationError> {
        config.validate()?;
        self.config = config;
        self.seed = None;
        Ok(())
    }

    /// The resolved seed, if any.
    pub fn seed(&self) -> Option<&str> {
        self.seed.as_deref()
    }

    /// The tile sink.
    pub fn sink(&self) -> Option<&S> {
        self.sink.as_ref()
    }

    /// Mutable access to the tile sink.
    pub fn sink_mut(&mut self) -> Option<&mut S> {
        self.sink.as_mut()
    }

    // -----------------------------------------------------------------------
    // Field queries
    // -----------------------------------------------------------------------

    /// The last completed field, or the field of the run in flight once every
    /// cell has been classified and faded.
    pub fn field(&self) -> Option<&TileField> {
        self.field.as_ref().or_else(|| {
            self.run
                .as_ref()
                .filter(|run| run.is_classified())
                .map(GenerationRun::field)
        })
    }

    fn sampled_field(&self) -> Result<&TileField, GenerationError> {
        self.field().ok_or(GenerationError::FieldUnavailable)
    }

    /// Cell at a map-space position.
    ///
    /// # Errors
    ///
    /// [`GenerationError::FieldUnavailable`] before any field was classified.
    pub fn tile_at(&self, map: IVec2) -> Result<Option<&TileCell>, GenerationError> {
        Ok(self.sampled_field()?.get_map(map))
    }

    /// Cell at a grid-space position.
    ///
    /// # Errors
    ///
    /// [`GenerationError::FieldUnavailable`] before any field was classified.
    pub fn tile_at_grid(&self, grid: IVec2) -> Result<Option<&TileCell>, GenerationError> {
        Ok(self.sampled_field()?.get_grid(grid))
    }

    /// Cell containing a world-space position.
    ///
    /// # Errors
    ///
    /// [`GenerationError::FieldUnavailable`] before any field was classified.
    pub fn tile_at_world(&self, world: DVec2) -> Result<Option<&TileCell>, GenerationError> {
        self.tile_at_grid(self.config.grid.world_to_cell(world))
    }

    /// Offset from a cell's world position to its centre.
    pub fn tile_offset(&self) -> DVec2 {
        self.config.grid.tile_offset()
    }

    /// Map-space position → grid-space position for the current size.
    pub fn map_to_grid(&self, map: IVec2) -> IVec2 {
        self.frame().map_to_grid(map)
    }

    /// Grid-space position → map-space position for the current size.
    pub fn grid_to_map(&self, grid: IVec2) -> IVec2 {
        self.frame().grid_to_map(grid)
    }

    /// Silhouette X coordinate at `y` for the current size.
    pub fn ellipse_x(&self, y: i32) -> i32 {
        ellipse_x(self.config.width, self.config.height, y)
    }

    fn frame(&self) -> MapFrame {
        MapFrame::new(self.config.width, self.config.height)
    }

    /// First cell of at least `min_layer` walking in from the silhouette.
    ///
    /// A missing `quadrant` is picked at random; a missing `scan_y` is drawn
    /// from `[0, height / 2)`.
    ///
    /// # Errors
    ///
    /// [`GenerationError::FieldUnavailable`] before any field was classified,
    /// [`GenerationError::OutOfBounds`] if the walk finds nothing.
    pub fn edge_tile(
        &mut self,
        quadrant: Option<Quadrant>,
        scan_y: Option<i32>,
        min_layer: usize,
    ) -> Result<&TileCell, GenerationError> {
        let half_height = self.sampled_field()?.frame().height / 2;
        let quadrant = quadrant.unwrap_or_else(|| Quadrant::random(self.rng.as_mut()));
        let scan_y = match scan_y {
            Some(y) => y,
            None if half_height > 0 => self.rng.random_range(0..half_height),
            None => 0,
        };
        debug!(?quadrant, scan_y, min_layer, "edge query");
        find_edge_tile(self.sampled_field()?, quadrant, scan_y, min_layer)
    }
}
