/////////////////////////////////////////////////////////////////////////////////////////////
//
// Evaluates the constant + linear polynomial basis used to augment RBF systems.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::common;
use faer::{Mat, Row, RowRef};

/// Relative threshold on the pivoted R diagonal below which a monomial is
/// considered dependent on the ones already selected.
const RANK_TOLERANCE: f64 = 1E-10;

/// Evaluates the candidate monomials `[1, x_0, .., x_{d-1}]` at every point,
/// after mapping the points with the given translation and scale factors.
pub fn evaluate_monomials(
    points: &Mat<f64>,
    translation_factor: &[f64],
    scale_factor: &[f64],
) -> Mat<f64> {
    let mut scaled_points = points.clone();

    common::scale_points(&mut scaled_points, translation_factor, scale_factor);

    let (n, d) = scaled_points.shape();
    let mut monomials = Mat::<f64>::zeros(n, 1 + d);

    // constant column
    monomials.col_mut(0).fill(1.0);

    // linear columns
    monomials
        .subcols_mut(1, d)
        .copy_from(&scaled_points.as_ref());

    monomials
}

/// Returns the indices of a maximal set of linearly independent monomial
/// columns, found with a column pivoted QR.
///
/// Columns are dropped when the points cannot distinguish them, e.g. the `z`
/// term when all points lie in a plane of constant `z`.
pub fn select_unisolvent_columns(monomials: &Mat<f64>) -> Vec<usize> {
    let qrc = monomials.col_piv_qr();
    let rc = qrc.thin_R();
    let (piv_fwd, _) = qrc.P().arrays();

    // Treat tiny diagonal entries of rc as zero.
    let thresh = RANK_TOLERANCE * rc.get(0, 0).abs();

    let rank = rc
        .diagonal()
        .column_vector()
        .iter()
        .filter(|val| val.abs() > thresh)
        .count();

    let mut unisolvent_columns: Vec<usize> = piv_fwd[..rank].to_vec();
    unisolvent_columns.sort();
    unisolvent_columns
}

/// The polynomial block of an augmented interpolation system.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PolynomialBasis {
    translation_factor: Vec<f64>,
    scale_factor: Vec<f64>,
    columns: Vec<usize>,
    num_candidates: usize,
}

impl PolynomialBasis {
    /// Chooses the scaling and the supported monomials for a control point set.
    pub fn fit(control_points: &Mat<f64>) -> Self {
        let (translation_factor, scale_factor) =
            common::get_cheb_cube_scaling_factors(control_points);

        let monomials = evaluate_monomials(control_points, &translation_factor, &scale_factor);
        let columns = select_unisolvent_columns(&monomials);

        Self {
            translation_factor,
            scale_factor,
            columns,
            num_candidates: monomials.ncols(),
        }
    }

    /// Number of polynomial terms kept.
    pub fn size(&self) -> usize {
        self.columns.len()
    }

    /// Number of candidate terms the control point layout could not support.
    pub fn num_dropped(&self) -> usize {
        self.num_candidates - self.columns.len()
    }

    /// Evaluates the kept terms at every row of `points`.
    pub fn evaluate(&self, points: &Mat<f64>) -> Mat<f64> {
        let all = evaluate_monomials(points, &self.translation_factor, &self.scale_factor);
        Mat::from_fn(points.nrows(), self.columns.len(), |i, j| all[(i, self.columns[j])])
    }

    /// Evaluates the kept terms at a single point.
    pub fn evaluate_point(&self, point: RowRef<f64>) -> Row<f64> {
        Row::from_fn(self.columns.len(), |j| match self.columns[j] {
            0 => 1.0,
            c => (point[c - 1] - self.translation_factor[c - 1]) / self.scale_factor[c - 1],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;
    use faer::{mat, utils::approx::*, Mat};

    fn run_case(points: Mat<f64>, expected: Mat<f64>) {
        let (n, d) = points.shape();
        assert_eq!(n, expected.nrows(), "row mismatch in test setup");

        let translation_factor = vec![0.0; d];
        let scale_factor = vec![1.0; d];

        let monomials = evaluate_monomials(&points, &translation_factor, &scale_factor);

        let approx_eq = CwiseMat(ApproxEq::eps() * 128.0 * (2 as f64));
        assert!(&monomials ~ &expected);
    }

    #[test]
    fn monomials_linear_1d() {
        let points = mat![[1.0], [2.0]];
        // Basis: [1, x]
        let expected = mat![[1.0, 1.0], [1.0, 2.0]];
        run_case(points, expected);
    }

    #[test]
    fn monomials_linear_2d() {
        let points = mat![[1.0, 2.0], [3.0, 4.0]];
        // Basis: [1, x, y]
        let expected = mat![[1.0, 1.0, 2.0], [1.0, 3.0, 4.0]];
        run_case(points, expected);
    }

    #[test]
    fn monomials_linear_3d() {
        let points = mat![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        // Basis: [1, x, y, z]
        let expected = mat![[1.0, 1.0, 2.0, 3.0], [1.0, 4.0, 5.0, 6.0]];
        run_case(points, expected);
    }

    #[test]
    fn full_rank_cloud_keeps_every_term() {
        let points = mat![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
        ];
        let basis = PolynomialBasis::fit(&points);
        assert!(basis.size() == 4);
        assert!(basis.num_dropped() == 0);
    }

    #[test]
    fn coplanar_points_drop_the_normal_direction() {
        let points = mat![
            [0.0, 0.0, 2.0],
            [1.0, 0.0, 2.0],
            [0.0, 1.0, 2.0],
            [1.0, 1.0, 2.0],
            [0.5, 0.2, 2.0],
        ];
        let basis = PolynomialBasis::fit(&points);
        assert!(basis.columns == vec![0, 1, 2]);
        assert!(basis.num_dropped() == 1);
    }

    #[test]
    fn collinear_points_keep_two_terms() {
        let points = Mat::from_fn(6, 3, |i, _| i as f64 * 0.5);
        let basis = PolynomialBasis::fit(&points);
        assert!(basis.size() == 2);
    }

    #[test]
    fn single_point_keeps_only_the_constant() {
        let points = mat![[3.0, -1.0, 4.0]];
        let basis = PolynomialBasis::fit(&points);
        assert!(basis.columns == vec![0]);
    }

    #[test]
    fn point_and_matrix_evaluation_agree() {
        let points = mat![[0.0, 0.0], [2.0, 0.0], [0.0, 4.0], [2.0, 4.0]];
        let basis = PolynomialBasis::fit(&points);

        let targets = mat![[1.0, 1.0], [3.0, -2.0]];
        let block = basis.evaluate(&targets);

        for i in 0..targets.nrows() {
            let row = basis.evaluate_point(targets.row(i));
            for j in 0..basis.size() {
                assert!(row[j] == block[(i, j)]);
            }
        }
        // Scaled into [-1, 1]: x -> x - 1, y -> (y - 2) / 2.
        assert!(block[(0, 0)] == 1.0);
        assert!(block[(0, 1)] == 0.0);
        assert!(block[(1, 2)] == -2.0);
    }
}
