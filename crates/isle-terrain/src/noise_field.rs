//! Raw per-cell noise sampling with the island falloff term.

use noise::{NoiseFn, Perlin};

use crate::seed::SeedOffsets;

/// A deterministic 2D noise function.
///
/// Implementations must return the same value for the same input. Values
/// should fall approximately in `[0, 1]`; the classifier renormalizes the
/// whole field afterwards, so the exact range is not critical.
pub trait NoiseSource {
    /// Sample the noise at `(fx, fy)`.
    fn noise2d(&self, fx: f64, fy: f64) -> f64;
}

impl<F> NoiseSource for F
where
    F: Fn(f64, f64) -> f64,
{
    fn noise2d(&self, fx: f64, fy: f64) -> f64 {
        self(fx, fy)
    }
}

/// Classic Perlin noise remapped to `[0, 1]`.
pub struct PerlinNoise {
    perlin: Perlin,
}

impl PerlinNoise {
    /// Create a Perlin source with the given permutation seed.
    ///
    /// The permutation seed is independent of the island seed string, which
    /// only shifts the sampling coordinates.
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }
}

impl Default for PerlinNoise {
    fn default() -> Self {
        Self::new(0)
    }
}

impl NoiseSource for PerlinNoise {
    fn noise2d(&self, fx: f64, fy: f64) -> f64 {
        ((self.perlin.get([fx, fy]) + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

/// Manhattan distance of a cell from the field centre in normalized units.
///
/// Zero at the centre, `1.0` at the corners. Subtracting it from the raw
/// noise pushes outer cells toward the lowest layer.
pub fn island_falloff(x: usize, y: usize, width: usize, height: usize) -> f64 {
    (x as f64 / width as f64 - 0.5).abs() + (y as f64 / height as f64 - 0.5).abs()
}

/// Sample the raw (un-normalized) value of a single cell.
#[allow(clippy::too_many_arguments)]
pub fn sample_raw(
    noise: &dyn NoiseSource,
    offsets: SeedOffsets,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    scale: f64,
    falloff: bool,
) -> f64 {
    let fx = (x as f64 + offsets.x) / width as f64 / scale;
    let fy = (y as f64 + offsets.y) / height as f64 / scale;
    let z = noise.noise2d(fx, fy);
    if falloff {
        z - island_falloff(x, y, width, height)
    } else {
        z
    }
}

/// Running minimum and maximum of the raw samples of a field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseRange {
    /// Smallest sample seen so far.
    pub min: f64,
    /// Largest sample seen so far.
    pub max: f64,
}

impl NoiseRange {
    /// A range that has seen no samples.
    pub const EMPTY: Self = Self {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    /// Widen the range to include `z`.
    pub fn include(&mut self, z: f64) {
        self.min = self.min.min(z);
        self.max = self.max.max(z);
    }

    /// Rescale `z` into `[0, 1]`.
    ///
    /// Returns `None` when the range is empty or flat, in which case the
    /// field cannot be normalized.
    pub fn normalize(&self, z: f64) -> Option<f64> {
        let span = self.max - self.min;
        if span > 0.0 && span.is_finite() {
            Some((z - self.min) / span)
        } else {
            None
        }
    }
}

impl Default for NoiseRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_perlin_determinism() {
        let a = PerlinNoise::new(3);
        let b = PerlinNoise::new(3);
        for i in 0..100 {
            let (fx, fy) = (i as f64 * 0.137, i as f64 * 0.291);
            assert_eq!(a.noise2d(fx, fy), b.noise2d(fx, fy));
        }
    }

    #[test]
    fn test_perlin_in_unit_range() {
        let noise = PerlinNoise::default();
        for i in 0..50 {
            for j in 0..50 {
                let v = noise.noise2d(i as f64 * 0.21, j as f64 * 0.17);
                assert!((0.0..=1.0).contains(&v), "sample {v} out of range");
            }
        }
    }

    #[test]
    fn test_falloff_zero_at_centre_and_max_at_corner() {
        assert!(island_falloff(50, 50, 100, 100).abs() < EPSILON);
        assert!((island_falloff(0, 0, 100, 100) - 1.0).abs() < EPSILON);
        assert!(island_falloff(0, 50, 100, 100) > island_falloff(25, 50, 100, 100));
    }

    #[test]
    fn test_sample_raw_applies_offsets_and_scale() {
        let noise = |fx: f64, fy: f64| fx * 10.0 + fy;
        let offsets = SeedOffsets { x: 2.0, y: 6.0 };
        let z = sample_raw(&noise, offsets, 2, 2, 4, 8, 0.5, false);
        // fx = (2 + 2) / 4 / 0.5 = 2, fy = (2 + 6) / 8 / 0.5 = 2
        assert!((z - 22.0).abs() < EPSILON, "got {z}");
    }

    #[test]
    fn test_sample_raw_subtracts_falloff() {
        let flat = |_: f64, _: f64| 0.5;
        let plain = sample_raw(&flat, SeedOffsets::default(), 0, 0, 10, 10, 1.0, false);
        let island = sample_raw(&flat, SeedOffsets::default(), 0, 0, 10, 10, 1.0, true);
        assert!((plain - island - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_noise_range_tracks_extremes() {
        let mut range = NoiseRange::EMPTY;
        for z in [0.3, -0.2, 0.9, 0.1] {
            range.include(z);
        }
        assert_eq!(range.min, -0.2);
        assert_eq!(range.max, 0.9);
        assert!((range.normalize(0.9).unwrap() - 1.0).abs() < EPSILON);
        assert!(range.normalize(-0.2).unwrap().abs() < EPSILON);
    }

    #[test]
    fn test_flat_range_cannot_normalize() {
        let mut range = NoiseRange::EMPTY;
        assert!(range.normalize(0.0).is_none());
        range.include(0.4);
        range.include(0.4);
        assert!(range.normalize(0.4).is_none());
    }
}
