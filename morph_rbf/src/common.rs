/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines shared helpers for random point generation, evaluation grids and scaling utilities.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use faer::Mat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Coordinate ranges narrower than this fraction of the widest range are
/// treated as flat when scaling points for the polynomial terms.
const FLAT_EXTENT_RATIO: f64 = 1e-12;

/// Generate a matrix of random points in the unit hypercube.
///
/// # Parameters
/// - `n`: Number of points to generate (rows in the output matrix).
/// - `d`: Number of spatial dimensions per point (columns in the output matrix).
/// - `seed`: Optional random seed.
///   - If `Some(seed)` is provided, the same sequence of points will be generated
///     deterministically across runs and platforms (useful for reproducible tests).
///   - If `None`, the generator is seeded from the operating system's randomness source.
///
/// # Returns
/// A `Mat<f64>` of shape `(n, d)` where each element lies in `[0.0, 1.0)`.
///
/// # Example
/// ```
/// use morph_rbf::generate_random_points;
///
/// // Generate 100 reproducible 3D points
/// let pts = generate_random_points(100, 3, Some(42));
/// assert_eq!(pts.ncols(), 3);
/// ```
pub fn generate_random_points(n: usize, d: usize, seed: Option<u64>) -> Mat<f64> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    Mat::from_fn(n, d, |_, _| rng.random_range(0.0..1.0))
}

/// Create a regular evaluation grid from per-dimension ranges and sample counts.
///
/// # Arguments
/// * `ranges` - Inclusive `(min, max)` range for each dimension.
/// * `counts` - Number of grid samples per range; must match `ranges.len()`
///   and each count must be at least 2.
///
/// # Returns
/// A `Mat<f64>` with one row per grid point and one column per dimension.
pub fn create_evaluation_grid(ranges: &[(f64, f64)], counts: &[usize]) -> Mat<f64> {
    assert_eq!(ranges.len(), counts.len());

    let total_points: usize = counts.iter().product();
    let num_dimensions = ranges.len();

    Mat::from_fn(total_points, num_dimensions, |row_idx, col_idx| {
        let dim_points = counts[col_idx];
        let (start, end) = ranges[col_idx];
        let step = (end - start) / (dim_points as f64 - 1.0);

        let stride = match col_idx == 0 {
            true => 1,
            false => counts[..col_idx].iter().product::<usize>(),
        };

        let index_in_dim = (row_idx / stride) % dim_points;
        start + step * index_in_dim as f64
    })
}

/// Compute translation and scale factors to map points into a Chebyshev cube.
///
/// The translation is the midpoint of each coordinate range and the scale
/// is half the range. Ranges that are flat relative to the widest one get a
/// scale of `1.0`, so that their scaled coordinates stay near zero instead of
/// amplifying round-off.
///
/// # Returns
/// A tuple `(translation, scale)` where each is a per-dimension factor.
pub(crate) fn get_cheb_cube_scaling_factors(point_locations: &Mat<f64>) -> (Vec<f64>, Vec<f64>) {
    let dimensions = point_locations.ncols();
    let extents = morph_rbf_kernels::get_pointarray_extents(point_locations);

    if extents.is_empty() {
        return (vec![0.0; dimensions], vec![1.0; dimensions]);
    }

    let mut translation_factor: Vec<f64> = Vec::with_capacity(dimensions);
    let mut scale_factor: Vec<f64> = Vec::with_capacity(dimensions);

    (0..dimensions).for_each(|d| {
        let max_coord = extents[d + dimensions];
        let min_coord = extents[d];
        translation_factor.push((max_coord + min_coord) / 2.0);
        scale_factor.push((max_coord - min_coord) / 2.0);
    });

    let widest = scale_factor.iter().cloned().fold(0.0_f64, f64::max);

    scale_factor.iter_mut().for_each(|element| {
        if *element <= FLAT_EXTENT_RATIO * widest {
            *element = 1.0;
        }
    });

    (translation_factor, scale_factor)
}

/// Apply translation and scaling to map points into a normalized cube.
///
/// For each coordinate `x`, applies `(x - translation_factor[d]) / scale_factor[d]`.
pub(crate) fn scale_points(
    points: &mut Mat<f64>,
    translation_factor: &[f64],
    scale_factor: &[f64],
) {
    points.row_iter_mut().for_each(|row| {
        row.iter_mut().enumerate().for_each(|(col_idx, element)| {
            *element = (*element - translation_factor[col_idx]) / scale_factor[col_idx];
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;
    use faer::mat;

    #[test]
    fn seeded_points_are_reproducible() {
        let a = generate_random_points(20, 3, Some(7));
        let b = generate_random_points(20, 3, Some(7));
        assert!(a == b);
        assert!(a.col_iter().all(|c| c.iter().all(|v| (0.0..1.0).contains(v))));
    }

    #[test]
    fn grid_layout() {
        let grid = create_evaluation_grid(&[(0.0, 1.0), (10.0, 20.0)], &[3, 2]);
        assert!(grid.nrows() == 6);
        assert!(grid == mat![
            [0.0, 10.0],
            [0.5, 10.0],
            [1.0, 10.0],
            [0.0, 20.0],
            [0.5, 20.0],
            [1.0, 20.0],
        ]);
    }

    #[test]
    fn scaling_maps_into_unit_cube_and_keeps_flat_axes_flat() {
        let mut points = mat![[0.0, 5.0, 2.0], [4.0, 7.0, 2.0], [2.0, 6.0, 2.0]];
        let (translation, scale) = get_cheb_cube_scaling_factors(&points);

        assert!(translation == vec![2.0, 6.0, 2.0]);
        assert!(scale == vec![2.0, 1.0, 1.0]);

        scale_points(&mut points, &translation, &scale);
        assert!(points == mat![[-1.0, -1.0, 0.0], [1.0, 1.0, 0.0], [0.0, 0.0, 0.0]]);
    }
}
