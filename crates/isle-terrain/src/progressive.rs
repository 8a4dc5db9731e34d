//! Progressive generation: the whole pipeline as a resumable state machine.
//!
//! A [`GenerationRun`] owns the field being built plus a cursor naming the
//! next unit of work. Every unit (setting up, sampling one cell, classifying
//! one cell, fading the borders, emitting one tile) adds to a point counter.
//! Once more than `points_per_step` points have accumulated since the last
//! pause, [`GenerationRun::resume`] reports progress and returns, leaving the
//! cursor on the next unit. Calling it again continues exactly there, so the
//! field and the emission sequence do not depend on how often the run paused.
//!
//! Stages, in order:
//!
//! 1. setup: derive seed offsets, let the sink prepare its containers
//! 2. sample every cell (row-major)
//! 3. normalize and classify every cell (row-major)
//! 4. fade the borders (water border only)
//! 5. emit one tile per cell
//! 6. emit fade-smoothing tiles (fade-out only)
//! 7. emit the water padding bands (water border only)

use glam::IVec2;
use tracing::{debug, trace};

use crate::classify::LayerClassifier;
use crate::config::GenerationConfig;
use crate::error::GenerationError;
use crate::fade::fade_borders;
use crate::noise_field::{NoiseRange, NoiseSource, sample_raw};
use crate::seed::SeedOffsets;
use crate::sink::TileSink;
use crate::tile::{MapFrame, TileCell, TileField};

/// Neighbour offsets visited by the fade-smoothing pass, in map space:
/// up, up-right, right, down-right, down, down-left, left, up-left.
const FADE_NEIGHBOURS: [IVec2; 8] = [
    IVec2::new(0, 1),
    IVec2::new(1, 1),
    IVec2::new(1, 0),
    IVec2::new(1, -1),
    IVec2::new(0, -1),
    IVec2::new(-1, -1),
    IVec2::new(-1, 0),
    IVec2::new(-1, 1),
];

/// Whether a run paints tiles or only counts the work it would do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    /// Emit every tile into the sink.
    Active,
    /// Walk the identical state machine without touching the sink.
    Simulate,
}

/// Result of one [`GenerationRun::resume`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step budget ran out. Carries the points done so far.
    Yielded(u64),
    /// The run finished. Carries the total points spent.
    Completed(u64),
}

impl StepOutcome {
    /// Points done at the moment this outcome was produced.
    pub fn points(self) -> u64 {
        match self {
            Self::Yielded(points) | Self::Completed(points) => points,
        }
    }

    /// Returns `true` for [`StepOutcome::Completed`].
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Cursor into the pipeline. Indices name the next unit to execute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Setup,
    Sample { index: usize },
    Classify { index: usize },
    FadeBorders,
    EmitPrimary { index: usize },
    /// `index` walks `cell * 8 + neighbour`.
    EmitFade { index: usize },
    /// `index` walks `iteration * 2 + side` over the bottom/top bands.
    EmitWaterRows { index: usize },
    /// `index` walks `iteration * 2 + side` over the left/right bands.
    EmitWaterColumns { index: usize },
    Done,
}

/// Number of padding tiles the water-border pass emits.
///
/// Bottom and top bands span `width + 2 * border` columns, left and right
/// bands span `height` rows, each band `border` cells thick.
pub fn water_border_tile_count(width: usize, height: usize, border: usize) -> usize {
    2 * border * (width + 2 * border) + 2 * border * height
}

/// One in-flight generation: the field under construction and the cursor.
pub struct GenerationRun {
    config: GenerationConfig,
    mode: RunMode,
    seed: String,
    offsets: SeedOffsets,
    frame: MapFrame,
    field: TileField,
    range: NoiseRange,
    classifier: LayerClassifier,
    stage: Stage,
    points_done: u64,
    points_prev: u64,
}

impl GenerationRun {
    /// Create a run for `config` and a resolved seed.
    ///
    /// # Errors
    ///
    /// [`GenerationError::InvalidConfiguration`] if `config` fails validation.
    /// Nothing is allocated in that case.
    pub fn new(
        config: GenerationConfig,
        seed: impl Into<String>,
        mode: RunMode,
    ) -> Result<Self, GenerationError> {
        config.validate()?;
        let frame = MapFrame::new(config.width, config.height);
        let classifier = LayerClassifier::new(&config.layers);
        Ok(Self {
            field: TileField::with_frame(frame),
            config,
            mode,
            seed: seed.into(),
            offsets: SeedOffsets::default(),
            frame,
            range: NoiseRange::EMPTY,
            classifier,
            stage: Stage::Setup,
            points_done: 0,
            points_prev: 0,
        })
    }

    /// The run's mode.
    pub fn mode(&self) -> RunMode {
        self.mode
    }

    /// The seed string this run derives its offsets from.
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Offsets derived from the seed. Zero until the setup stage has run.
    pub fn offsets(&self) -> SeedOffsets {
        self.offsets
    }

    /// The configuration this run was created with.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// The field as built so far.
    pub fn field(&self) -> &TileField {
        &self.field
    }

    /// Consume the run, keeping its field.
    pub fn into_field(self) -> TileField {
        self.field
    }

    /// Points spent so far.
    pub fn points_done(&self) -> u64 {
        self.points_done
    }

    /// Returns `true` once every cell carries its final height and layer,
    /// i.e. classification and the border fade have both run.
    pub fn is_classified(&self) -> bool {
        matches!(
            self.stage,
            Stage::EmitPrimary { .. }
                | Stage::EmitFade { .. }
                | Stage::EmitWaterRows { .. }
                | Stage::EmitWaterColumns { .. }
                | Stage::Done
        )
    }

    /// Returns `true` once every stage has run.
    pub fn is_complete(&self) -> bool {
        self.stage == Stage::Done
    }

    /// Run until the step budget is exhausted or the pipeline finishes.
    ///
    /// `progress` receives the cumulative point count each time the run
    /// pauses. In [`RunMode::Simulate`] the sink is never called.
    pub fn resume(
        &mut self,
        noise: &dyn NoiseSource,
        sink: &mut dyn TileSink,
        progress: &mut dyn FnMut(u64),
    ) -> StepOutcome {
        loop {
            if self.stage == Stage::Done {
                return StepOutcome::Completed(self.points_done);
            }

            self.stage = self.advance(noise, sink);

            let budget = self.config.points_per_step;
            if budget > 0 && self.points_done - self.points_prev > budget {
                self.points_prev = self.points_done;
                trace!(points = self.points_done, stage = ?self.stage, "yielding");
                progress(self.points_done);
                return StepOutcome::Yielded(self.points_done);
            }
        }
    }

    /// Resume repeatedly until the run completes. Returns the total points.
    pub fn run_to_completion(
        &mut self,
        noise: &dyn NoiseSource,
        sink: &mut dyn TileSink,
        progress: &mut dyn FnMut(u64),
    ) -> u64 {
        loop {
            if let StepOutcome::Completed(total) = self.resume(noise, sink, progress) {
                return total;
            }
        }
    }

    /// Execute one unit of work and return the next cursor position.
    fn advance(&mut self, noise: &dyn NoiseSource, sink: &mut dyn TileSink) -> Stage {
        let cell_count = self.field.width() * self.field.height();
        let border = self.config.water_border as usize;

        match self.stage {
            Stage::Setup => {
                self.offsets = SeedOffsets::from_seed(&self.seed);
                if self.mode == RunMode::Active {
                    sink.prepare(&self.config.layers);
                }
                self.points_done += 1;
                debug!(seed = %self.seed, offsets = ?self.offsets, "setup complete");
                Stage::Sample { index: 0 }
            }

            Stage::Sample { index } => {
                self.sample_cell(noise, index);
                self.points_done += 1;
                if index + 1 < cell_count {
                    Stage::Sample { index: index + 1 }
                } else {
                    debug!(min = self.range.min, max = self.range.max, "sampling complete");
                    Stage::Classify { index: 0 }
                }
            }

            Stage::Classify { index } => {
                let normalized = self.range.normalize(self.field.cells()[index].z);
                let cell = self.field.cell_mut(index);
                match normalized {
                    Some(z) => {
                        cell.z = z;
                        cell.z_layer = self.classifier.classify(z);
                    }
                    None => {
                        cell.z = 0.0;
                        cell.z_layer = 0;
                    }
                }
                self.points_done += 1;
                if index + 1 < cell_count {
                    Stage::Classify { index: index + 1 }
                } else {
                    debug!(points = self.points_done, "classification complete");
                    if border > 0 {
                        Stage::FadeBorders
                    } else {
                        Stage::EmitPrimary { index: 0 }
                    }
                }
            }

            Stage::FadeBorders => {
                fade_borders(&mut self.field, &self.classifier);
                self.points_done += 1;
                debug!(points = self.points_done, "border fade complete");
                Stage::EmitPrimary { index: 0 }
            }

            Stage::EmitPrimary { index } => {
                let cell = &self.field.cells()[index];
                let layer = cell.z_layer.min(self.classifier.layer_count() - 1);
                let position = self.frame.map_to_grid(cell.map_position());
                self.emit(sink, layer, position);
                if index + 1 < cell_count {
                    Stage::EmitPrimary { index: index + 1 }
                } else {
                    debug!(points = self.points_done, "primary emission complete");
                    self.after_primary()
                }
            }

            Stage::EmitFade { index } => {
                let cell = &self.field.cells()[index / 8];
                let layer = cell.z_layer;
                let neighbour = cell.map_position() + FADE_NEIGHBOURS[index % 8];
                let lower = layer.checked_sub(1);
                if lower.is_some()
                    && self.field.get_map(neighbour).map(|n| n.z_layer) == lower
                {
                    let position = self.frame.map_to_grid(neighbour);
                    self.emit(sink, layer, position);
                }
                if index + 1 < cell_count * 8 {
                    Stage::EmitFade { index: index + 1 }
                } else {
                    debug!(points = self.points_done, "fade emission complete");
                    self.after_fade()
                }
            }

            Stage::EmitWaterRows { index } => {
                let (width, height) = (self.frame.width, self.frame.height);
                let b = border as i32;
                let iteration = (index / 2) as i32;
                let x = -b + iteration / b;
                let y = -b + iteration % b;
                let position = if index % 2 == 0 {
                    self.frame.map_to_grid(IVec2::new(x, y))
                } else {
                    IVec2::new(x - width / 2, y - height / 2 + b + height)
                };
                self.emit(sink, 0, position);
                if index + 1 < 2 * border * (self.field.width() + 2 * border) {
                    Stage::EmitWaterRows { index: index + 1 }
                } else {
                    Stage::EmitWaterColumns { index: 0 }
                }
            }

            Stage::EmitWaterColumns { index } => {
                let (width, height) = (self.frame.width, self.frame.height);
                let b = border as i32;
                let iteration = (index / 2) as i32;
                let y = iteration / b;
                let x = -b + iteration % b;
                let position = if index % 2 == 0 {
                    self.frame.map_to_grid(IVec2::new(x, y))
                } else {
                    IVec2::new(x - width / 2 + b + width, y - height / 2)
                };
                self.emit(sink, 0, position);
                if index + 1 < 2 * border * self.field.height() {
                    Stage::EmitWaterColumns { index: index + 1 }
                } else {
                    debug!(points = self.points_done, "water border emission complete");
                    Stage::Done
                }
            }

            Stage::Done => Stage::Done,
        }
    }

    fn sample_cell(&mut self, noise: &dyn NoiseSource, index: usize) {
        let (width, height) = (self.field.width(), self.field.height());
        let (x, y) = (index % width, index / width);
        let z = sample_raw(
            noise,
            self.offsets,
            x,
            y,
            width,
            height,
            self.config.scale,
            self.config.water_border > 0,
        );
        self.range.include(z);

        let map = IVec2::new(x as i32, y as i32);
        let world = self.config.grid.cell_to_world(self.frame.map_to_grid(map));
        self.field.push(TileCell {
            x,
            y,
            world,
            z,
            z_layer: 0,
        });
    }

    fn emit(&mut self, sink: &mut dyn TileSink, layer: usize, position: IVec2) {
        if self.mode == RunMode::Active {
            sink.emit(layer, position);
        }
        self.points_done += self.config.points_per_tile;
    }

    fn after_primary(&self) -> Stage {
        if self.config.fade_out {
            Stage::EmitFade { index: 0 }
        } else {
            self.after_fade()
        }
    }

    fn after_fade(&self) -> Stage {
        if self.config.water_border > 0 {
            Stage::EmitWaterRows { index: 0 }
        } else {
            Stage::Done
        }
    }
}
