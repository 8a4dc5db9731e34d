//! Border fading: forces a linear layer gradient along the four field edges.

use crate::classify::LayerClassifier;
use crate::tile::TileField;

#[derive(Clone, Copy, Debug)]
enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

const SWEEP_ORDER: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

/// Taper layer indices toward layer 0 near the field edges.
///
/// Each edge is swept `layer_count` rows (or columns) deep. At depth `d` every
/// cell whose `z * total_weight` exceeds the cumulative weight of layers
/// `0..d` is lowered to exactly that cumulative weight and to layer `d`.
/// Cells are only ever lowered. Edges are swept top, right, bottom, left;
/// where sweeps overlap the later one wins.
///
/// No-op for single-layer classifiers.
pub fn fade_borders(field: &mut TileField, classifier: &LayerClassifier) {
    let layer_count = classifier.layer_count();
    if layer_count <= 1 {
        return;
    }
    let total_weight = classifier.total_weight();
    let (width, height) = (field.width(), field.height());

    for edge in SWEEP_ORDER {
        let (depth_limit, span) = match edge {
            Edge::Top | Edge::Bottom => (height, width),
            Edge::Right | Edge::Left => (width, height),
        };

        let mut z_amount = 0.0;
        for depth in 0..layer_count.min(depth_limit) {
            for along in 0..span {
                let (x, y) = match edge {
                    Edge::Top => (along, height - 1 - depth),
                    Edge::Right => (width - 1 - depth, along),
                    Edge::Bottom => (along, depth),
                    Edge::Left => (depth, along),
                };
                // The layer guard keeps rounding in `z * total_weight` from
                // lifting a corner cell a previous sweep already lowered.
                if let Some(cell) = field.get_mut(x, y)
                    && cell.z * total_weight > z_amount
                    && depth <= cell.z_layer
                {
                    cell.z = z_amount / total_weight;
                    cell.z_layer = depth;
                }
            }
            z_amount += classifier.weight(depth);
        }
    }
}
