//! Tile emission sinks: where a progressive run paints its classified tiles.

use glam::IVec2;
use hashbrown::{HashMap, HashSet};

use crate::config::TerrainLayer;

/// Receives the tiles an active run emits, in row-major order per pass.
pub trait TileSink {
    /// Called once at the start of an active run, before any tile is emitted.
    ///
    /// Sinks that keep per-layer containers should (re)create them here.
    fn prepare(&mut self, layers: &[TerrainLayer]) {
        let _ = layers;
    }

    /// Paint layer `layer` at grid position `position`.
    fn emit(&mut self, layer: usize, position: IVec2);
}

impl<S: TileSink + ?Sized> TileSink for &mut S {
    fn prepare(&mut self, layers: &[TerrainLayer]) {
        (**self).prepare(layers);
    }

    fn emit(&mut self, layer: usize, position: IVec2) {
        (**self).emit(layer, position);
    }
}

/// A sink that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl TileSink for NullSink {
    fn emit(&mut self, _layer: usize, _position: IVec2) {}
}

/// Records every emission in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordingSink {
    /// Number of times [`TileSink::prepare`] was called.
    pub prepare_calls: usize,
    /// `(layer, grid position)` pairs in emission order.
    pub tiles: Vec<(usize, IVec2)>,
}

impl TileSink for RecordingSink {
    fn prepare(&mut self, _layers: &[TerrainLayer]) {
        self.prepare_calls += 1;
        self.tiles.clear();
    }

    fn emit(&mut self, layer: usize, position: IVec2) {
        self.tiles.push((layer, position));
    }
}

/// One tile container per terrain layer, like a stack of tilemaps.
///
/// Lower layer indices draw on top, so the visible layer at a position is the
/// lowest layer painted there. That is what lets the fade-smoothing pass paint
/// a higher layer under a lower neighbour without hiding it.
#[derive(Clone, Debug, Default)]
pub struct TilemapSink {
    rules: Vec<String>,
    layers: Vec<HashSet<IVec2>>,
    emitted: usize,
}

impl TilemapSink {
    /// Create an empty sink. Containers are allocated by [`TileSink::prepare`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of layer containers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Rule key of layer `index`.
    pub fn rule(&self, index: usize) -> Option<&str> {
        self.rules.get(index).map(String::as_str)
    }

    /// Positions painted on layer `index`.
    pub fn layer(&self, index: usize) -> Option<&HashSet<IVec2>> {
        self.layers.get(index)
    }

    /// Total emissions received since the last `prepare`, including repaints.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// The layer that would be visible at `position`.
    pub fn visible_layer(&self, position: IVec2) -> Option<usize> {
        self.layers
            .iter()
            .position(|tiles| tiles.contains(&position))
    }

    /// Bounding box `(min, max)` of every painted position, inclusive.
    pub fn bounds(&self) -> Option<(IVec2, IVec2)> {
        self.layers
            .iter()
            .flatten()
            .fold(None, |acc, &pos| match acc {
                None => Some((pos, pos)),
                Some((min, max)) => Some((min.min(pos), max.max(pos))),
            })
    }

    /// Count of visible tiles per layer.
    pub fn visible_histogram(&self) -> HashMap<usize, usize> {
        let mut histogram = HashMap::new();
        let mut seen = HashSet::new();
        for (index, tiles) in self.layers.iter().enumerate() {
            for pos in tiles {
                if seen.insert(*pos) {
                    *histogram.entry(index).or_insert(0) += 1;
                }
            }
        }
        histogram
    }
}

impl TileSink for TilemapSink {
    fn prepare(&mut self, layers: &[TerrainLayer]) {
        self.rules = layers.iter().map(|layer| layer.rule.clone()).collect();
        self.layers = vec![HashSet::new(); layers.len()];
        self.emitted = 0;
    }

    fn emit(&mut self, layer: usize, position: IVec2) {
        if let Some(tiles) = self.layers.get_mut(layer) {
            tiles.insert(position);
        }
        self.emitted += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layers() -> Vec<TerrainLayer> {
        vec![
            TerrainLayer::new("water", 1.0),
            TerrainLayer::new("sand", 1.0),
            TerrainLayer::new("grass", 1.0),
        ]
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let mut sink = RecordingSink::default();
        sink.prepare(&layers());
        sink.emit(2, IVec2::new(0, 0));
        sink.emit(0, IVec2::new(-1, 3));
        assert_eq!(sink.prepare_calls, 1);
        assert_eq!(sink.tiles, vec![(2, IVec2::new(0, 0)), (0, IVec2::new(-1, 3))]);
    }

    #[test]
    fn test_tilemap_lowest_layer_visible() {
        let mut sink = TilemapSink::new();
        sink.prepare(&layers());
        let pos = IVec2::new(1, 1);
        sink.emit(2, pos);
        sink.emit(1, pos);
        assert_eq!(sink.visible_layer(pos), Some(1));
        assert_eq!(sink.visible_layer(IVec2::new(5, 5)), None);
        assert_eq!(sink.rule(1), Some("sand"));
        assert_eq!(sink.emitted(), 2);
    }

    #[test]
    fn test_tilemap_bounds_and_histogram() {
        let mut sink = TilemapSink::new();
        sink.prepare(&layers());
        sink.emit(0, IVec2::new(-2, 4));
        sink.emit(1, IVec2::new(3, -1));
        sink.emit(2, IVec2::new(3, -1));
        assert_eq!(sink.bounds(), Some((IVec2::new(-2, -1), IVec2::new(3, 4))));

        let histogram = sink.visible_histogram();
        assert_eq!(histogram.get(&0), Some(&1));
        assert_eq!(histogram.get(&1), Some(&1));
        assert_eq!(histogram.get(&2), None);
    }

    #[test]
    fn test_prepare_resets_containers() {
        let mut sink = TilemapSink::new();
        sink.prepare(&layers());
        sink.emit(0, IVec2::ZERO);
        sink.prepare(&layers()[..2]);
        assert_eq!(sink.layer_count(), 2);
        assert_eq!(sink.emitted(), 0);
        assert!(sink.bounds().is_none());
    }

    #[test]
    fn test_out_of_range_layer_is_counted_but_not_stored() {
        let mut sink = TilemapSink::new();
        sink.prepare(&layers());
        sink.emit(7, IVec2::ZERO);
        assert_eq!(sink.emitted(), 1);
        assert!(sink.visible_layer(IVec2::ZERO).is_none());
    }
}
