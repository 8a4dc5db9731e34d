//! Procedural island generation: seeded noise sampling, weighted layer
//! classification, border fading, and a resumable progressive pipeline that
//! emits classified tiles into a caller-supplied sink.

mod classify;
mod config;
mod edge;
mod error;
mod fade;
mod generator;
mod noise_field;
mod progressive;
mod seed;
mod sink;
mod tile;

pub mod debug_viz;

pub use classify::LayerClassifier;
pub use config::{GenerationConfig, GridTransform, TerrainLayer};
pub use edge::{Quadrant, ellipse_x, find_edge_tile};
pub use error::GenerationError;
pub use fade::fade_borders;
pub use generator::{IslandGenerator, IslandGeneratorBuilder};
pub use noise_field::{NoiseRange, NoiseSource, PerlinNoise, island_falloff, sample_raw};
pub use progressive::{GenerationRun, RunMode, StepOutcome, water_border_tile_count};
pub use seed::{RANDOM_SEED_LENGTH, SeedOffsets, random_seed, resolve_seed};
pub use sink::{NullSink, RecordingSink, TileSink, TilemapSink};
pub use tile::{MapFrame, TileCell, TileField};
