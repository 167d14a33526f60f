/////////////////////////////////////////////////////////////////////////////////////////////
//
// Supplies general-purpose utilities for distances, extents and dense kernel matrices.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::traits::RadialKernel;
use faer::{Mat, RowRef};
use rayon::prelude::*;

/// Computes the axis aligned bounding box (AABB) extents of a matrix of points.
///
/// Returns a flat vector containing the minimum and maximum values along each column (dimension)
/// of the input matrix. The result is arranged as:
///
/// `[min_0, min_1, ..., min_n, max_0, max_1, ..., max_n]`
///
/// where `n` is the number of columns in the matrix. An empty matrix yields an empty vector.
///
/// # Examples
///
/// ```
/// use faer::mat;
/// use morph_rbf_kernels::get_pointarray_extents;
///
/// let points = mat![
///     [1.0, 2.0],
///     [3.0, -1.0],
///     [0.5, 4.0f64]
/// ];
/// let extents = get_pointarray_extents(&points);
/// assert_eq!(extents, vec![0.5, -1.0, 3.0, 4.0]);
/// ```
#[inline(always)]
pub fn get_pointarray_extents<T>(points: &Mat<T>) -> Vec<T>
where
    T: PartialOrd + Clone,
{
    let ncols = points.ncols();

    if points.nrows() == 0 {
        return Vec::new();
    }

    // The first half of the vector stores mins, the second half stores maxs.
    let mut extents: Vec<T> = Vec::with_capacity(2 * ncols);
    for col in 0..ncols {
        extents.push(points.get(0, col).clone());
    }
    for col in 0..ncols {
        extents.push(points.get(0, col).clone());
    }

    for row in points.row_iter() {
        for (col, item) in row.iter().enumerate() {
            if item < &extents[col] {
                extents[col] = item.clone();
            }
            if item > &extents[col + ncols] {
                extents[col + ncols] = item.clone();
            }
        }
    }

    extents
}

/// Calculates the euclidean distance between two points.
///
/// # Examples
///
/// ```
/// use faer::mat;
/// use morph_rbf_kernels::get_distance;
///
/// let points = mat![
///     [1.0, 2.0],
///     [4.0, 6.0],
/// ];
///
/// let dist = get_distance(points.row(0), points.row(1));
///
/// assert_eq!(dist, 5.0);
/// ```
#[inline(always)]
pub fn get_distance(target: RowRef<f64>, source: RowRef<f64>) -> f64 {
    get_distance_sq(target, source).sqrt()
}

/// Returns the squared Euclidean distance between two points.
#[inline(always)]
pub fn get_distance_sq(target: RowRef<f64>, source: RowRef<f64>) -> f64 {
    let mut dist = 0.0;
    for (t, s) in target.iter().zip(source.iter()) {
        let diff = t - s;
        dist += diff * diff;
    }
    dist
}

/// Builds the symmetric kernel matrix `A[i][j] = phi(|p_i - p_j|)` serially.
///
/// Each off-diagonal value is evaluated once and written to both `(i, j)` and
/// `(j, i)`, so the result is exactly symmetric.
pub fn get_a_matrix_symmetric(points: &Mat<f64>, kernel: &dyn RadialKernel) -> Mat<f64> {
    let n = points.nrows();

    let mut a_matrix = Mat::<f64>::zeros(n, n);

    for j in 0..n {
        let source_row = points.row(j);

        for i in j..n {
            let k_val = kernel.evaluate(points.row(i), source_row);

            a_matrix[(i, j)] = k_val;
            a_matrix[(j, i)] = k_val;
        }
    }

    a_matrix
}

/// Builds the same matrix as [`get_a_matrix_symmetric`] with the rows of the
/// lower triangle distributed over the rayon thread pool.
///
/// Every lower-triangle value is computed by exactly one task; the upper
/// triangle is mirrored from it when the dense matrix is formed.
pub fn get_a_matrix_symmetric_par(points: &Mat<f64>, kernel: &dyn RadialKernel) -> Mat<f64> {
    let n = points.nrows();

    let lower_rows: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|i| {
            let target_row = points.row(i);
            (0..=i)
                .map(|j| kernel.evaluate(target_row, points.row(j)))
                .collect()
        })
        .collect();

    Mat::from_fn(n, n, |i, j| match j <= i {
        true => lower_rows[i][j],
        false => lower_rows[j][i],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::{GaussianKernel, ImqbKernel};
    use equator::assert;
    use faer::mat;

    #[test]
    fn symmetric_matrix_has_kernel_entries() {
        let points = mat![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 2.0, 0.0]];
        let kernel = ImqbKernel::new(1.0).unwrap();

        let a = get_a_matrix_symmetric(&points, &kernel);

        assert!(a.nrows() == 3);
        for i in 0..3 {
            assert!(a[(i, i)] == 1.0);
            for j in 0..3 {
                assert!(a[(i, j)] == a[(j, i)]);
                assert!(a[(i, j)] == kernel.evaluate(points.row(i), points.row(j)));
            }
        }
        assert!((a[(1, 2)] - 1.0 / 6f64.sqrt()).abs() < 1e-15);
    }

    #[test]
    fn parallel_assembly_matches_serial() {
        let points = Mat::from_fn(57, 3, |i, j| ((i * 7 + j * 3) as f64 * 0.37).sin());
        let kernel = GaussianKernel::new(0.9).unwrap();

        let serial = get_a_matrix_symmetric(&points, &kernel);
        let parallel = get_a_matrix_symmetric_par(&points, &kernel);

        assert!(serial == parallel);
    }

    #[test]
    fn extents_of_empty_matrix() {
        let points = Mat::<f64>::zeros(0, 3);
        assert!(get_pointarray_extents(&points).is_empty());
    }
}
