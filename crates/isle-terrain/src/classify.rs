//! Weighted layer bucketing of normalized noise values.

use crate::config::TerrainLayer;

/// Buckets normalized noise values into terrain layer indices.
///
/// Each layer claims a slice of `[0, total_weight]` proportional to its
/// weight; a value lands in the first layer whose cumulative weight reaches
/// `z * total_weight`. Ties go to the lower index.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerClassifier {
    weights: Vec<f64>,
    total_weight: f64,
}

impl LayerClassifier {
    /// Build a classifier for the given layers.
    pub fn new(layers: &[TerrainLayer]) -> Self {
        let weights: Vec<f64> = layers.iter().map(|layer| layer.weight).collect();
        let total_weight = weights.iter().sum();
        Self {
            weights,
            total_weight,
        }
    }

    /// Number of layers.
    pub fn layer_count(&self) -> usize {
        self.weights.len()
    }

    /// Sum of all layer weights.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Weight of layer `index`, or `1.0` past the last layer.
    pub fn weight(&self, index: usize) -> f64 {
        self.weights.get(index).copied().unwrap_or(1.0)
    }

    /// Layer index for a normalized value `z` in `[0, 1]`.
    ///
    /// Always `0` for a single-layer configuration, otherwise clamped to
    /// `[0, layer_count - 1]`.
    pub fn classify(&self, z: f64) -> usize {
        if self.weights.len() <= 1 {
            return 0;
        }

        let threshold = z * self.total_weight;
        let mut amount = 0.0;
        let mut index = 0;
        let mut weight = self.weight(index);
        while index < self.weights.len() && amount + weight < threshold {
            amount += weight;
            index += 1;
            weight = self.weight(index);
        }

        index.min(self.weights.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(weights: &[f64]) -> LayerClassifier {
        let layers: Vec<TerrainLayer> = weights
            .iter()
            .enumerate()
            .map(|(i, &w)| TerrainLayer::new(format!("layer{i}"), w))
            .collect();
        LayerClassifier::new(&layers)
    }

    #[test]
    fn test_single_layer_always_zero() {
        let c = classifier(&[3.0]);
        for z in [0.0, 0.5, 1.0] {
            assert_eq!(c.classify(z), 0);
        }
    }

    #[test]
    fn test_equal_weights_split_evenly() {
        let c = classifier(&[1.0, 1.0]);
        assert_eq!(c.classify(0.0), 0);
        assert_eq!(c.classify(0.25), 0);
        assert_eq!(c.classify(0.75), 1);
        assert_eq!(c.classify(1.0), 1);
    }

    #[test]
    fn test_boundary_tie_goes_to_lower_layer() {
        let c = classifier(&[1.0, 1.0, 2.0]);
        // threshold = 0.5 * 4 = 2.0 == cumulative weight of layers 0..=1
        assert_eq!(c.classify(0.5), 1);
        // threshold = 0.25 * 4 = 1.0 == weight of layer 0
        assert_eq!(c.classify(0.25), 0);
    }

    #[test]
    fn test_weights_shift_buckets() {
        let c = classifier(&[3.0, 1.0]);
        assert_eq!(c.classify(0.7), 0);
        assert_eq!(c.classify(0.8), 1);
    }

    #[test]
    fn test_zero_weight_layer_is_skipped() {
        let c = classifier(&[1.0, 0.0, 1.0]);
        assert_eq!(c.classify(0.75), 2);
    }

    #[test]
    fn test_classification_is_monotonic() {
        let c = classifier(&[2.0, 0.5, 1.5, 1.0]);
        let mut previous = 0;
        for i in 0..=1000 {
            let layer = c.classify(i as f64 / 1000.0);
            assert!(
                layer >= previous,
                "layer dropped from {previous} to {layer} at z={}",
                i as f64 / 1000.0
            );
            previous = layer;
        }
        assert_eq!(previous, 3);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let c = classifier(&[1.0, 1.0]);
        assert_eq!(c.classify(-0.5), 0);
        assert_eq!(c.classify(5.0), 1);
    }
}
