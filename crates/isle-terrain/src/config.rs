//! Generation parameters: grid size, terrain layers, seeding, and the
//! progressive work budget.

use glam::{DVec2, IVec2};
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// One terrain classification bucket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainLayer {
    /// Key the tile sink resolves to a tile asset (e.g. `"water"`, `"sand"`).
    pub rule: String,
    /// Share of the normalized noise range claimed by this layer. Must be
    /// finite and non-negative.
    pub weight: f64,
}

impl TerrainLayer {
    /// Create a layer with the given rule key and weight.
    pub fn new(rule: impl Into<String>, weight: f64) -> Self {
        Self {
            rule: rule.into(),
            weight,
        }
    }
}

/// Maps grid cells to world space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridTransform {
    /// World-space size of one cell. Both components must be positive.
    pub cell_size: DVec2,
    /// World-space position of grid cell `(0, 0)`'s lower-left corner.
    pub origin: DVec2,
}

impl Default for GridTransform {
    fn default() -> Self {
        Self {
            cell_size: DVec2::ONE,
            origin: DVec2::ZERO,
        }
    }
}

impl GridTransform {
    /// World position of a grid cell's lower-left corner.
    pub fn cell_to_world(&self, cell: IVec2) -> DVec2 {
        self.origin + cell.as_dvec2() * self.cell_size
    }

    /// Grid cell containing a world position.
    pub fn world_to_cell(&self, world: DVec2) -> IVec2 {
        ((world - self.origin) / self.cell_size).floor().as_ivec2()
    }

    /// Offset from a cell's corner to its centre.
    pub fn tile_offset(&self) -> DVec2 {
        self.cell_size * 0.5
    }
}

/// Immutable parameters for one generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Field width in cells.
    pub width: i32,
    /// Field height in cells.
    pub height: i32,
    /// Terrain layers, lowest (water) first.
    pub layers: Vec<TerrainLayer>,
    /// Noise frequency divisor in `(0, 1]`. Smaller values zoom out.
    pub scale: f64,
    /// Seed string. An empty seed behaves like `random_seed = true`.
    pub seed: String,
    /// Always synthesize a fresh random seed.
    pub random_seed: bool,
    /// Enable the fade-smoothing emission pass.
    pub fade_out: bool,
    /// Thickness of the water padding emitted around the field. Zero disables
    /// the island falloff, the border fader and the padding pass.
    pub water_border: u32,
    /// Work points charged per emitted tile.
    pub points_per_tile: u64,
    /// Work points a progressive run may spend before yielding. Zero never yields.
    pub points_per_step: u64,
    /// Grid-to-world mapping used for [`TileCell::world`](crate::TileCell::world).
    pub grid: GridTransform,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            layers: vec![
                TerrainLayer::new("water", 2.0),
                TerrainLayer::new("sand", 0.5),
                TerrainLayer::new("grass", 1.5),
                TerrainLayer::new("forest", 1.0),
            ],
            scale: 0.5,
            seed: String::new(),
            random_seed: false,
            fade_out: true,
            water_border: 4,
            points_per_tile: 1,
            points_per_step: 2_000,
            grid: GridTransform::default(),
        }
    }
}

impl GenerationConfig {
    /// Check every constraint a run relies on.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidConfiguration`] describing the first
    /// violated constraint.
    pub fn validate(&self) -> Result<(), GenerationError> {
        let invalid = |msg: String| Err(GenerationError::InvalidConfiguration(msg));

        if self.width <= 0 || self.height <= 0 {
            return invalid(format!(
                "grid size must be positive, got {}x{}",
                self.width, self.height
            ));
        }
        if !(self.scale > 0.0 && self.scale <= 1.0) {
            return invalid(format!("scale must be in (0, 1], got {}", self.scale));
        }
        if self.layers.is_empty() {
            return invalid("at least one terrain layer is required".to_string());
        }
        if let Some((index, layer)) = self
            .layers
            .iter()
            .enumerate()
            .find(|(_, layer)| !(layer.weight.is_finite() && layer.weight >= 0.0))
        {
            return invalid(format!(
                "layer {index} ({}) has invalid weight {}",
                layer.rule, layer.weight
            ));
        }
        if self.layers.len() > 1 && self.total_weight() <= 0.0 {
            return invalid("total layer weight must be positive".to_string());
        }
        if !(self.grid.cell_size.x > 0.0 && self.grid.cell_size.y > 0.0) {
            return invalid(format!(
                "cell size must be positive, got {}",
                self.grid.cell_size
            ));
        }
        Ok(())
    }

    /// Sum of all layer weights.
    pub fn total_weight(&self) -> f64 {
        self.layers.iter().map(|layer| layer.weight).sum()
    }

    /// Number of configured layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Number of cells in the field. Only meaningful after [`validate`](Self::validate).
    pub fn cell_count(&self) -> usize {
        self.width.max(0) as usize * self.height.max(0) as usize
    }
}
