//! Edge queries: locate the island shore along an elliptical silhouette.

use glam::IVec2;
use rand::Rng;

use crate::error::GenerationError;
use crate::tile::{TileCell, TileField};

/// One quarter of the island silhouette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    UpperRight = 0,
    LowerRight = 1,
    LowerLeft = 2,
    UpperLeft = 3,
}

impl Quadrant {
    /// All quadrants in index order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::UpperRight,
        Quadrant::LowerRight,
        Quadrant::LowerLeft,
        Quadrant::UpperLeft,
    ];

    /// Quadrant for an index in `0..4`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Pick a quadrant uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Sign applied to the silhouette point `(x, y)` to place it in this
    /// quadrant, in grid space.
    fn corner_sign(self) -> IVec2 {
        match self {
            Quadrant::UpperRight => IVec2::new(1, 1),
            Quadrant::LowerRight => IVec2::new(1, -1),
            Quadrant::LowerLeft => IVec2::new(-1, -1),
            Quadrant::UpperLeft => IVec2::new(-1, 1),
        }
    }

    /// Diagonal step that walks from the silhouette toward the centre.
    fn inward_step(self) -> IVec2 {
        -self.corner_sign()
    }
}

/// X coordinate of the ellipse inscribed in a `width`×`height` field at `y`.
///
/// `x = round(sqrt((1 - y²/b²) · a²))` with `a = width / 2`, `b = height / 2`.
/// Halves round to even; rows beyond the ellipse give `0`.
pub fn ellipse_x(width: i32, height: i32, y: i32) -> i32 {
    let a = f64::from(width) / 2.0;
    let b = f64::from(height) / 2.0;
    let fy = f64::from(y);
    let radicand = ((1.0 - (fy * fy) / (b * b)) * (a * a)).max(0.0);
    libm::sqrt(radicand).round_ties_even() as i32
}

/// Walk inward from the silhouette until a cell of at least `min_layer`.
///
/// The walk starts at grid `(±ellipse_x(scan_y), ±scan_y)` for `quadrant`
/// and moves one cell diagonally per step. Positions outside the field are
/// skipped until the walk first enters it.
///
/// # Errors
///
/// [`GenerationError::OutOfBounds`] if the walk leaves the field again, or
/// never reaches it, without finding a matching cell. A `scan_y` further
/// from the centre than the field height fails immediately.
pub fn find_edge_tile(
    field: &TileField,
    quadrant: Quadrant,
    scan_y: i32,
    min_layer: usize,
) -> Result<&TileCell, GenerationError> {
    let frame = field.frame();
    // No row further out than the field height can reach it.
    if scan_y.unsigned_abs() > frame.height.unsigned_abs() {
        return Err(GenerationError::OutOfBounds {
            x: 0,
            y: scan_y,
            min_layer,
        });
    }
    let x = ellipse_x(frame.width, frame.height, scan_y);
    let start = IVec2::new(x, scan_y) * quadrant.corner_sign();
    let step = quadrant.inward_step();

    let mut position = frame.grid_to_map(start);
    let mut entered = false;
    for _ in 0..=(frame.width + frame.height) {
        match field.get_map(position) {
            Some(cell) => {
                if cell.z_layer >= min_layer {
                    return Ok(cell);
                }
                entered = true;
            }
            None if entered => break,
            None => {}
        }
        position += step;
    }

    Err(GenerationError::OutOfBounds {
        x: start.x,
        y: start.y,
        min_layer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_ellipse_extremes() {
        assert_eq!(ellipse_x(10, 10, 0), 5);
        assert_eq!(ellipse_x(10, 10, 5), 0);
        assert_eq!(ellipse_x(10, 10, 3), 4);
    }

    #[test]
    fn test_ellipse_outside_clamps_to_zero() {
        assert_eq!(ellipse_x(10, 10, 7), 0);
        assert_eq!(ellipse_x(10, 10, -7), 0);
    }

    #[test]
    fn test_ellipse_rounds_ties_to_even() {
        // a = 2.5, y = 0 -> exactly 2.5
        assert_eq!(ellipse_x(5, 8, 0), 2);
        // a = 3.5 -> 4
        assert_eq!(ellipse_x(7, 8, 0), 4);
    }

    #[test]
    fn test_all_land_upper_right() {
        let field = TileField::from_layers(10, 10, &[1; 100]);
        let cell = find_edge_tile(&field, Quadrant::UpperRight, 0, 1).unwrap();
        // Start at grid (5, 0) = map (10, 5), first in-field step is (9, 4).
        assert_eq!((cell.x, cell.y), (9, 4));
    }

    #[test]
    fn test_all_land_lower_left_starts_inside() {
        let field = TileField::from_layers(10, 10, &[1; 100]);
        let cell = find_edge_tile(&field, Quadrant::LowerLeft, 3, 1).unwrap();
        // grid (-4, -3) = map (1, 2)
        assert_eq!((cell.x, cell.y), (1, 2));
    }

    #[test]
    fn test_walks_inward_past_water() {
        // Only the centre cell is land.
        let mut layers = vec![0; 81];
        layers[4 * 9 + 4] = 2;
        let field = TileField::from_layers(9, 9, &layers);
        for quadrant in Quadrant::ALL {
            // Diagonals from map (8, 4) or (0, 4) miss the centre cell.
            let cell = find_edge_tile(&field, quadrant, 0, 1);
            assert!(cell.is_err(), "{quadrant:?} unexpectedly found land");
        }
    }

    #[test]
    fn test_finds_land_on_diagonal() {
        // Land on the anti-diagonal reached from the upper-right start.
        let mut layers = vec![0; 100];
        // Start map (10, 5): path (9, 4), (8, 3), (7, 2) ...
        layers[2 * 10 + 7] = 1;
        let field = TileField::from_layers(10, 10, &layers);
        let cell = find_edge_tile(&field, Quadrant::UpperRight, 0, 1).unwrap();
        assert_eq!((cell.x, cell.y), (7, 2));
    }

    #[test]
    fn test_all_water_is_out_of_bounds() {
        let field = TileField::from_layers(10, 10, &[0; 100]);
        for quadrant in Quadrant::ALL {
            let err = find_edge_tile(&field, quadrant, 2, 1).unwrap_err();
            assert!(
                matches!(err, GenerationError::OutOfBounds { min_layer: 1, .. }),
                "unexpected error {err:?}"
            );
        }
    }

    #[test]
    fn test_threshold_above_every_layer() {
        let field = TileField::from_layers(6, 6, &[3; 36]);
        assert!(find_edge_tile(&field, Quadrant::UpperLeft, 1, 4).is_err());
        assert!(find_edge_tile(&field, Quadrant::UpperLeft, 1, 3).is_ok());
    }

    #[test]
    fn test_scan_row_far_outside_field() {
        let field = TileField::from_layers(4, 4, &[1; 16]);
        assert!(find_edge_tile(&field, Quadrant::UpperRight, 50, 1).is_err());
    }

    #[test]
    fn test_extreme_scan_rows_fail_cleanly() {
        let field = TileField::from_layers(10, 10, &[1; 100]);
        for quadrant in Quadrant::ALL {
            for scan_y in [i32::MAX, i32::MIN, 11, -11] {
                let err = find_edge_tile(&field, quadrant, scan_y, 1).unwrap_err();
                assert_eq!(
                    err,
                    GenerationError::OutOfBounds {
                        x: 0,
                        y: scan_y,
                        min_layer: 1,
                    }
                );
            }
        }
        // A row exactly one field height out is still walked.
        assert!(find_edge_tile(&field, Quadrant::UpperRight, 10, 1).is_err());
    }

    #[test]
    fn test_random_quadrant_is_deterministic() {
        let mut a = ChaCha8Rng::seed_from_u64(9);
        let mut b = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..20 {
            assert_eq!(Quadrant::random(&mut a), Quadrant::random(&mut b));
        }
        assert_eq!(Quadrant::from_index(2), Some(Quadrant::LowerLeft));
        assert_eq!(Quadrant::from_index(4), None);
    }
}
