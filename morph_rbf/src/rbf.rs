/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the main RBF interpolator, coefficient management, and solver orchestration logic.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{
    config::Params,
    error::{InterpolationError, InterpolationResult},
    interpolant_config::InterpolantSettings,
    polynomials::PolynomialBasis,
    progress::{self, ProgressMsg, ProgressSink},
};

use faer::{
    linalg::solvers::{FullPivLu, Solve},
    Mat, Row, RowRef,
};
use morph_rbf_kernels::RadialKernel;
use rayon::prelude::*;
use std::{
    fmt::{self, Debug},
    sync::Arc,
    time::Instant,
};

/// Coefficients of a solved RBF system.
///
/// After fitting, an RBF interpolator produces a set of coefficients
/// that define the contribution of each basis function. These
/// coefficients are stored in this struct and used during evaluation.
/// Each column corresponds to one component of the interpolated field.
#[derive(Debug, Clone, PartialEq)]
pub struct Coefficients {
    /// Coefficients associated with the RBF centers (control points), in
    /// control point order.
    pub point_coefficients: Mat<f64>,

    /// Coefficients associated with the polynomial terms, if present.
    ///
    /// This is `None` when no polynomial component was included in the
    /// system, or `Some(matrix)` otherwise.
    pub poly_coefficients: Option<Mat<f64>>,
}

/// Factorisation of the (possibly augmented) interpolation matrix.
///
/// The factorisation depends only on the control points, so it is kept to
/// re-solve for new control point values without reassembling.
struct SystemFactor {
    lu: FullPivLu<f64>,
    num_points: usize,
    basis_size: usize,
    pivot_ratio: f64,
    tolerance: f64,
}

impl Debug for SystemFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemFactor")
            .field("num_points", &self.num_points)
            .field("basis_size", &self.basis_size)
            .field("pivot_ratio", &self.pivot_ratio)
            .finish()
    }
}

impl SystemFactor {
    /// Factorises `lhs` with full pivoting and rejects it when the smallest to
    /// largest pivot ratio is below `tolerance`.
    fn new(
        lhs: &Mat<f64>,
        num_points: usize,
        basis_size: usize,
        tolerance: f64,
    ) -> InterpolationResult<Self> {
        let lu = lhs.full_piv_lu();

        let (min_pivot, max_pivot) = lu
            .U()
            .diagonal()
            .column_vector()
            .iter()
            .fold((f64::INFINITY, 0.0_f64), |(lo, hi), val| {
                (lo.min(val.abs()), hi.max(val.abs()))
            });

        let pivot_ratio = match max_pivot > 0.0 {
            true => min_pivot / max_pivot,
            false => 0.0,
        };

        // Written so that a NaN ratio is rejected as well.
        if !(pivot_ratio >= tolerance) {
            return Err(InterpolationError::NumericalSingularity {
                pivot_ratio,
                tolerance,
            });
        }

        Ok(Self {
            lu,
            num_points,
            basis_size,
            pivot_ratio,
            tolerance,
        })
    }

    /// Solves `[[A, P], [P^T, 0]] [c; d] = [values; 0]`.
    fn solve(&self, values: &Mat<f64>) -> InterpolationResult<Coefficients> {
        let n = self.num_points;
        let m = self.basis_size;
        let k = values.ncols();

        let rhs = Mat::from_fn(n + m, k, |i, j| match i < n {
            true => values[(i, j)],
            false => 0.0,
        });

        let solution = self.lu.solve(&rhs);

        if solution
            .col_iter()
            .any(|col| col.iter().any(|val| !val.is_finite()))
        {
            return Err(InterpolationError::NumericalSingularity {
                pivot_ratio: self.pivot_ratio,
                tolerance: self.tolerance,
            });
        }

        let point_coefficients = Mat::from_fn(n, k, |i, j| solution[(i, j)]);
        let poly_coefficients = match m > 0 {
            true => Some(Mat::from_fn(m, k, |i, j| solution[(n + i, j)])),
            false => None,
        };

        Ok(Coefficients {
            point_coefficients,
            poly_coefficients,
        })
    }
}

/// Everything derived from one control point configuration.
struct SolvedSystem {
    polynomial_basis: Option<PolynomialBasis>,
    factor: SystemFactor,
    coefficients: Coefficients,
}

/// Convenience builder for constructing an [`RBFInterpolator`].
///
/// The builder should be called via the [`RBFInterpolator::builder`] method.
///
/// See [`RBFInterpolator`] for details on each field.
pub struct RBFInterpolatorBuilder {
    points: Mat<f64>,
    point_values: Mat<f64>,
    interpolant_settings: InterpolantSettings,
    params: Params,
    progress_callback: Option<Arc<dyn ProgressSink>>,
}

impl RBFInterpolatorBuilder {
    fn new(
        points: Mat<f64>,
        point_values: Mat<f64>,
        interpolant_settings: InterpolantSettings,
    ) -> Self {
        Self {
            points,
            point_values,
            interpolant_settings,
            params: Params::default(),
            progress_callback: None,
        }
    }

    /// Sets custom solver and assembly parameters.
    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Optional callback for reporting solver progress.
    pub fn progress_callback(mut self, progress_callback: Arc<dyn ProgressSink>) -> Self {
        self.progress_callback = Some(progress_callback);
        self
    }

    /// Assembles and solves the system, returning the configured [`RBFInterpolator`].
    pub fn build(self) -> InterpolationResult<RBFInterpolator> {
        RBFInterpolator::new(
            self.points,
            self.point_values,
            self.interpolant_settings,
            self.params,
            self.progress_callback,
        )
    }
}

/// A solved radial basis function interpolant.
///
/// The interpolant is defined by a set of control points (one row per point)
/// with known values (one row per point, one column per field component) and
/// the kernel selected in [`InterpolantSettings`]. The system is assembled and
/// solved once on construction; evaluations then reuse the coefficients.
///
/// When the control points move, call
/// [`RBFInterpolator::update_control_points`]. When only their values change,
/// [`RBFInterpolator::update_values`] re-solves against the stored
/// factorisation.
///
/// ### Example
/// ```
/// use faer::{mat, row};
/// use morph_rbf::{RBFInterpolator, interpolant_config::InterpolantSettings};
/// use morph_rbf_kernels::KernelType;
///
/// let points = mat![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
/// let values = mat![[0.0], [1.0], [0.0]];
/// let settings = InterpolantSettings::builder(KernelType::IMQB).radius(1.0).build().unwrap();
///
/// let rbfi = RBFInterpolator::builder(points, values, settings).build().unwrap();
///
/// let at_control = rbfi.evaluate_point(row![1.0, 0.0, 0.0].as_ref()).unwrap();
/// assert!((at_control[0] - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct RBFInterpolator {
    /// Coordinates of the control points.
    points: Mat<f64>,

    /// Known values at each control point.
    point_values: Mat<f64>,

    /// Solved coefficients for the RBF and polynomial terms.
    coefficients: Coefficients,

    /// Kernel built from the interpolant settings.
    kernel: Box<dyn RadialKernel>,

    /// Settings used to configure the interpolator.
    interpolant_settings: InterpolantSettings,

    /// Polynomial block, present when the settings enable it.
    polynomial_basis: Option<PolynomialBasis>,

    /// Factorised system matrix for the current control points.
    factor: SystemFactor,

    /// Solver and assembly parameters.
    params: Params,

    /// Optional callback for reporting solver progress.
    progress_callback: Option<Arc<dyn ProgressSink>>,
}

impl RBFInterpolator {
    /// Creates a new [`RBFInterpolatorBuilder`] for the given control points,
    /// values, and settings.
    ///
    /// This is the way to construct an interpolator.
    pub fn builder(
        points: Mat<f64>,
        point_values: Mat<f64>,
        interpolant_settings: InterpolantSettings,
    ) -> RBFInterpolatorBuilder {
        RBFInterpolatorBuilder::new(points, point_values, interpolant_settings)
    }

    fn new(
        points: Mat<f64>,
        point_values: Mat<f64>,
        interpolant_settings: InterpolantSettings,
        params: Params,
        progress_callback: Option<Arc<dyn ProgressSink>>,
    ) -> InterpolationResult<Self> {
        interpolant_settings.validate()?;

        let kernel = interpolant_settings.kernel.build_kernel()?;

        let system = setup_and_solve(
            &points,
            &point_values,
            kernel.as_ref(),
            &interpolant_settings,
            &params,
            &progress_callback,
        )?;

        Ok(Self {
            points,
            point_values,
            coefficients: system.coefficients,
            kernel,
            interpolant_settings,
            polynomial_basis: system.polynomial_basis,
            factor: system.factor,
            params,
            progress_callback,
        })
    }

    /// Coordinates of the control points.
    pub fn points(&self) -> &Mat<f64> {
        &self.points
    }

    /// Known values at the control points.
    pub fn point_values(&self) -> &Mat<f64> {
        &self.point_values
    }

    /// Coefficients solved for the current configuration.
    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    /// The kernel in use.
    pub fn kernel(&self) -> &dyn RadialKernel {
        self.kernel.as_ref()
    }

    pub fn interpolant_settings(&self) -> &InterpolantSettings {
        &self.interpolant_settings
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Number of polynomial terms in the system (zero without augmentation).
    pub fn basis_size(&self) -> usize {
        self.polynomial_basis.as_ref().map_or(0, |b| b.size())
    }

    /// Smallest to largest pivot ratio of the current factorisation.
    pub fn pivot_ratio(&self) -> f64 {
        self.factor.pivot_ratio
    }

    /// Replaces the control points and their values, reassembling and
    /// re-solving the system.
    ///
    /// On error the interpolator keeps its previous configuration.
    pub fn update_control_points(
        &mut self,
        points: Mat<f64>,
        point_values: Mat<f64>,
    ) -> InterpolationResult<()> {
        let system = setup_and_solve(
            &points,
            &point_values,
            self.kernel.as_ref(),
            &self.interpolant_settings,
            &self.params,
            &self.progress_callback,
        )?;

        self.points = points;
        self.point_values = point_values;
        self.polynomial_basis = system.polynomial_basis;
        self.factor = system.factor;
        self.coefficients = system.coefficients;

        Ok(())
    }

    /// Replaces the values at the unchanged control points and re-solves using
    /// the stored factorisation.
    ///
    /// On error the interpolator keeps its previous values and coefficients.
    pub fn update_values(&mut self, point_values: Mat<f64>) -> InterpolationResult<()> {
        check_values(&point_values, self.points.nrows())?;

        let coefficients = self.factor.solve(&point_values)?;

        self.point_values = point_values;
        self.coefficients = coefficients;

        Ok(())
    }

    /// Evaluate the interpolant at a single point.
    ///
    /// The kernel weights of `query` against the control points are combined
    /// with the point coefficients, the polynomial part is added if present,
    /// and the damping factor is applied if configured.
    pub fn evaluate_point(&self, query: RowRef<f64>) -> InterpolationResult<Row<f64>> {
        let weights = self.kernel.weights(self.points.as_ref(), query)?;
        Ok(self.combine(&weights, query))
    }

    /// Evaluate the interpolant at arbitrary target points.
    ///
    /// ### Returns
    /// A `(n_targets × n_value_components)` matrix.
    ///
    /// ### Errors
    /// `DimensionMismatch` when the targets do not have the same number of
    /// coordinates as the control points.
    pub fn evaluate(&self, target_points: &Mat<f64>) -> InterpolationResult<Mat<f64>> {
        let dimensions = self.points.ncols();
        if target_points.ncols() != dimensions {
            return Err(InterpolationError::DimensionMismatch {
                expected: dimensions,
                found: target_points.ncols(),
                context: "target point coordinates",
            });
        }

        let rows = (0..target_points.nrows())
            .into_par_iter()
            .map(|i| self.evaluate_point(target_points.row(i)))
            .collect::<InterpolationResult<Vec<Row<f64>>>>()?;

        Ok(Mat::from_fn(
            target_points.nrows(),
            self.point_values.ncols(),
            |i, j| rows[i][j],
        ))
    }

    /// Evaluate the interpolant **at the control points**.
    ///
    /// Useful for diagnostics: without damping the result matches the input
    /// values to within the accuracy of the solve.
    pub fn evaluate_at_source(&self) -> InterpolationResult<Mat<f64>> {
        self.evaluate(&self.points)
    }

    fn combine(&self, weights: &Row<f64>, query: RowRef<f64>) -> Row<f64> {
        let n = self.points.nrows();
        let point_coefficients = &self.coefficients.point_coefficients;

        let poly_values = self
            .polynomial_basis
            .as_ref()
            .zip(self.coefficients.poly_coefficients.as_ref())
            .map(|(basis, poly_coefficients)| (basis.evaluate_point(query), poly_coefficients));

        let damping_factor = self
            .interpolant_settings
            .damping
            .as_ref()
            .map_or(1.0, |damping| damping.factor(query));

        Row::from_fn(self.point_values.ncols(), |c| {
            let mut value: f64 = (0..n).map(|i| weights[i] * point_coefficients[(i, c)]).sum();

            if let Some((monomials, poly_coefficients)) = &poly_values {
                value += (0..monomials.ncols())
                    .map(|j| monomials[j] * poly_coefficients[(j, c)])
                    .sum::<f64>();
            }

            value * damping_factor
        })
    }
}

/// Checks control points and values before any assembly work.
fn check_inputs(
    points: &Mat<f64>,
    point_values: &Mat<f64>,
    interpolant_settings: &InterpolantSettings,
) -> InterpolationResult<()> {
    let dimensions = points.ncols();

    if !(1..=3).contains(&dimensions) {
        return Err(InterpolationError::Configuration {
            reason: format!("unsupported number of dimensions: {}", dimensions),
        });
    }

    if points.nrows() == 0 {
        return Err(InterpolationError::DimensionMismatch {
            expected: 1,
            found: 0,
            context: "control point count",
        });
    }

    if points.col_iter().any(|col| col.iter().any(|val| !val.is_finite())) {
        return Err(InterpolationError::Configuration {
            reason: "control point coordinates must be finite".to_string(),
        });
    }

    check_values(point_values, points.nrows())?;

    if let Some(damping) = &interpolant_settings.damping {
        damping.validate(dimensions)?;
    }

    Ok(())
}

fn check_values(point_values: &Mat<f64>, num_points: usize) -> InterpolationResult<()> {
    if point_values.nrows() != num_points {
        return Err(InterpolationError::DimensionMismatch {
            expected: num_points,
            found: point_values.nrows(),
            context: "control point value count",
        });
    }

    if point_values.ncols() == 0 {
        return Err(InterpolationError::DimensionMismatch {
            expected: 1,
            found: 0,
            context: "value components",
        });
    }

    if point_values
        .col_iter()
        .any(|col| col.iter().any(|val| !val.is_finite()))
    {
        return Err(InterpolationError::Configuration {
            reason: "control point values must be finite".to_string(),
        });
    }

    Ok(())
}

/// Assembles, factorises and solves the interpolation system for one control
/// point configuration.
fn setup_and_solve(
    points: &Mat<f64>,
    point_values: &Mat<f64>,
    kernel: &dyn RadialKernel,
    interpolant_settings: &InterpolantSettings,
    params: &Params,
    progress_callback: &Option<Arc<dyn ProgressSink>>,
) -> InterpolationResult<SolvedSystem> {
    check_inputs(points, point_values, interpolant_settings)?;

    let solver_start = Instant::now();
    let num_points = points.nrows();

    let a_matrix = match num_points >= params.parallel_assembly_threshold {
        true => morph_rbf_kernels::get_a_matrix_symmetric_par(points, kernel),
        false => morph_rbf_kernels::get_a_matrix_symmetric(points, kernel),
    };

    let polynomial_basis = match interpolant_settings.polynomials {
        true => Some(PolynomialBasis::fit(points)),
        false => None,
    };

    let lhs = match &polynomial_basis {
        Some(basis) => {
            if basis.num_dropped() != 0 {
                log::debug!(
                    "dropping {} polynomial term(s) unsupported by the control point layout",
                    basis.num_dropped()
                );
                progress::emit(
                    progress_callback,
                    ProgressMsg::PolynomialTermsDropped {
                        num_dropped: basis.num_dropped(),
                    },
                );
            }
            augment_with_polynomials(a_matrix, &basis.evaluate(points))
        }
        None => a_matrix,
    };

    let basis_size = lhs.nrows() - num_points;

    log::debug!(
        "assembled {0}x{0} {1} system for {2} control points",
        lhs.nrows(),
        kernel.type_name(),
        num_points
    );
    progress::emit(
        progress_callback,
        ProgressMsg::SystemAssembled {
            num_points,
            basis_size,
        },
    );

    let factor = SystemFactor::new(&lhs, num_points, basis_size, params.pivot_tolerance)
        .inspect_err(|err| log::warn!("{}", err))?;

    if factor.pivot_ratio < params.pivot_tolerance * 1e3 {
        log::warn!(
            "interpolation system is close to singular (pivot ratio {:e})",
            factor.pivot_ratio
        );
    }

    let coefficients = factor.solve(point_values)?;

    progress::emit(
        progress_callback,
        ProgressMsg::SystemSolved {
            num_points,
            pivot_ratio: factor.pivot_ratio,
        },
    );

    let solver_duration = solver_start.elapsed();

    if progress_callback.is_some() {
        let msg = format!(
            "Took {:?} to solve RBF for {} points using the following settings:\n\
            Kernel: {}, Radius: {}, Polynomial terms: {}",
            solver_duration,
            num_points,
            kernel.type_name(),
            kernel.radius(),
            basis_size,
        );
        progress::emit(progress_callback, ProgressMsg::Message { message: msg });
    }

    Ok(SolvedSystem {
        polynomial_basis,
        factor,
        coefficients,
    })
}

/// Forms `[[A, P], [P^T, 0]]`.
fn augment_with_polynomials(a_matrix: Mat<f64>, monomials: &Mat<f64>) -> Mat<f64> {
    let n = a_matrix.nrows();
    let size = n + monomials.ncols();

    Mat::from_fn(size, size, |i, j| match (i < n, j < n) {
        (true, true) => a_matrix[(i, j)],
        (true, false) => monomials[(i, j - n)],
        (false, true) => monomials[(j, i - n)],
        (false, false) => 0.0,
    })
}
