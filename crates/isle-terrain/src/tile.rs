//! The generated field and its coordinate spaces.
//!
//! *Map space* indexes the field directly (`0..width`, `0..height`). *Grid
//! space* is map space shifted so the island is centred on the origin; it is
//! the space tiles are emitted in.

use glam::{DVec2, IVec2};

/// One cell of a generated field.
#[derive(Clone, Debug, PartialEq)]
pub struct TileCell {
    /// Map-space X.
    pub x: usize,
    /// Map-space Y.
    pub y: usize,
    /// World-space position of the cell's corner.
    pub world: DVec2,
    /// Noise value. Raw while sampling, in `[0, 1]` once classified.
    pub z: f64,
    /// Assigned terrain layer.
    pub z_layer: usize,
}

impl TileCell {
    /// Map-space position as a signed vector.
    pub fn map_position(&self) -> IVec2 {
        IVec2::new(self.x as i32, self.y as i32)
    }
}

/// Conversion between map space and grid space for a `width`×`height` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapFrame {
    /// Field width in cells.
    pub width: i32,
    /// Field height in cells.
    pub height: i32,
}

impl MapFrame {
    /// Create a frame for a field of the given size.
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Map-space position → grid-space position.
    pub fn map_to_grid(&self, map: IVec2) -> IVec2 {
        IVec2::new(map.x - self.width / 2, map.y - self.height / 2)
    }

    /// Grid-space position → map-space position.
    pub fn grid_to_map(&self, grid: IVec2) -> IVec2 {
        IVec2::new(grid.x + self.width / 2, grid.y + self.height / 2)
    }

    /// Returns `true` if a map-space position lies inside the field.
    pub fn contains(&self, map: IVec2) -> bool {
        map.x >= 0 && map.x < self.width && map.y >= 0 && map.y < self.height
    }
}

/// A row-major `width`×`height` grid of [`TileCell`]s.
///
/// Cells are appended in row-major order while a run samples noise, so a
/// field is only fully populated once sampling has finished.
#[derive(Clone, Debug, PartialEq)]
pub struct TileField {
    frame: MapFrame,
    cells: Vec<TileCell>,
}

impl TileField {
    /// Allocate an empty field. `frame` must describe a positive size.
    pub(crate) fn with_frame(frame: MapFrame) -> Self {
        let capacity = frame.width.max(0) as usize * frame.height.max(0) as usize;
        Self {
            frame,
            cells: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, cell: TileCell) {
        debug_assert_eq!(cell.y * self.width() + cell.x, self.cells.len());
        self.cells.push(cell);
    }

    pub(crate) fn cell_mut(&mut self, index: usize) -> &mut TileCell {
        &mut self.cells[index]
    }

    pub(crate) fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut TileCell> {
        if x < self.width() && y < self.height() {
            let width = self.width();
            self.cells.get_mut(y * width + x)
        } else {
            None
        }
    }

    /// Build a classified field from row-major layer indices.
    #[cfg(test)]
    pub(crate) fn from_layers(width: usize, height: usize, layers: &[usize]) -> Self {
        assert_eq!(layers.len(), width * height);
        let mut field = Self::with_frame(MapFrame::new(width as i32, height as i32));
        for (index, &z_layer) in layers.iter().enumerate() {
            field.push(TileCell {
                x: index % width,
                y: index / width,
                world: DVec2::ZERO,
                z: 0.0,
                z_layer,
            });
        }
        field
    }

    /// The field's map/grid frame.
    pub fn frame(&self) -> MapFrame {
        self.frame
    }

    /// Width in cells.
    pub fn width(&self) -> usize {
        self.frame.width as usize
    }

    /// Height in cells.
    pub fn height(&self) -> usize {
        self.frame.height as usize
    }

    /// Returns `true` once every cell has been sampled.
    pub fn is_complete(&self) -> bool {
        self.cells.len() == self.width() * self.height()
    }

    /// All cells written so far, row-major.
    pub fn cells(&self) -> &[TileCell] {
        &self.cells
    }

    /// The cell at map position `(x, y)`, if it exists.
    pub fn get(&self, x: usize, y: usize) -> Option<&TileCell> {
        if x < self.width() && y < self.height() {
            self.cells.get(y * self.width() + x)
        } else {
            None
        }
    }

    /// The cell at a signed map-space position, if it exists.
    pub fn get_map(&self, map: IVec2) -> Option<&TileCell> {
        if self.frame.contains(map) {
            self.get(map.x as usize, map.y as usize)
        } else {
            None
        }
    }

    /// The cell at a grid-space position, if it exists.
    pub fn get_grid(&self, grid: IVec2) -> Option<&TileCell> {
        self.get_map(self.frame.grid_to_map(grid))
    }
}
