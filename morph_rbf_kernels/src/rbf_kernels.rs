/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the concrete RBF kernel functions and their faer-compatible evaluations.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{
    error::KernelResult,
    kernel_helpers::validate_radius,
    traits::{KernelFromParams, RadialKernel},
    utils::get_distance_sq,
};
use faer::RowRef;

/// Inverse multiquadric biharmonic kernel with `phi(r) = 1 / sqrt(r^2 + c^2)`.
///
/// The kernel is finite everywhere, including at zero distance where it takes
/// the value `1 / c`. Larger radii give smoother, more global interpolants.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct ImqbKernel {
    radius: f64,
    radius_sq: f64,
}

impl ImqbKernel {
    pub fn new(radius: f64) -> KernelResult<Self> {
        let radius = validate_radius(radius)?;
        Ok(Self {
            radius,
            radius_sq: radius * radius,
        })
    }

    #[inline(always)]
    pub fn eval_r2(&self, r2: f64) -> f64 {
        1.0 / (r2 + self.radius_sq).sqrt()
    }
}

impl RadialKernel for ImqbKernel {
    fn type_name(&self) -> &'static str {
        "IMQB"
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    #[inline(always)]
    fn phi(&self, r: f64) -> f64 {
        self.eval_r2(r * r)
    }

    #[inline(always)]
    fn evaluate(&self, target: RowRef<f64>, source: RowRef<f64>) -> f64 {
        self.eval_r2(get_distance_sq(target, source))
    }

    fn clone_kernel(&self) -> Box<dyn RadialKernel> {
        Box::new(*self)
    }
}

impl KernelFromParams for ImqbKernel {
    fn from_radius(radius: f64) -> KernelResult<Self> {
        Self::new(radius)
    }
}

/// Gaussian kernel with `phi(r) = exp(-(r / c)^2)`.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct GaussianKernel {
    radius: f64,
    inv_radius_sq: f64,
}

impl GaussianKernel {
    pub fn new(radius: f64) -> KernelResult<Self> {
        let radius = validate_radius(radius)?;
        Ok(Self {
            radius,
            inv_radius_sq: 1.0 / (radius * radius),
        })
    }

    #[inline(always)]
    pub fn eval_r2(&self, r2: f64) -> f64 {
        (-r2 * self.inv_radius_sq).exp()
    }
}

impl RadialKernel for GaussianKernel {
    fn type_name(&self) -> &'static str {
        "Gaussian"
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    #[inline(always)]
    fn phi(&self, r: f64) -> f64 {
        self.eval_r2(r * r)
    }

    #[inline(always)]
    fn evaluate(&self, target: RowRef<f64>, source: RowRef<f64>) -> f64 {
        self.eval_r2(get_distance_sq(target, source))
    }

    fn clone_kernel(&self) -> Box<dyn RadialKernel> {
        Box::new(*self)
    }
}

impl KernelFromParams for GaussianKernel {
    fn from_radius(radius: f64) -> KernelResult<Self> {
        Self::new(radius)
    }
}

/// Thin plate spline kernel with `phi(r) = r^2 log r`.
///
/// The radius is validated and stored like every other kernel, but it does not
/// change the profile. Thin plate splines are conditionally positive definite,
/// so interpolants built on them should enable the polynomial terms.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct ThinPlateSplineKernel {
    radius: f64,
}

impl ThinPlateSplineKernel {
    pub fn new(radius: f64) -> KernelResult<Self> {
        Ok(Self {
            radius: validate_radius(radius)?,
        })
    }
}

impl RadialKernel for ThinPlateSplineKernel {
    fn type_name(&self) -> &'static str {
        "TPS"
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    #[inline(always)]
    fn phi(&self, r: f64) -> f64 {
        match r.abs() < f64::EPSILON {
            true => 0.0,
            false => r.powi(2) * r.ln(),
        }
    }

    fn clone_kernel(&self) -> Box<dyn RadialKernel> {
        Box::new(*self)
    }
}

impl KernelFromParams for ThinPlateSplineKernel {
    fn from_radius(radius: f64) -> KernelResult<Self> {
        Self::new(radius)
    }
}

/// Wendland C2 kernel with compact support `c`:
/// `phi(r) = (1 - r/c)^4 (4 r/c + 1)` for `r < c`, zero beyond.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct WendlandC2Kernel {
    radius: f64,
}

impl WendlandC2Kernel {
    pub fn new(radius: f64) -> KernelResult<Self> {
        Ok(Self {
            radius: validate_radius(radius)?,
        })
    }
}

impl RadialKernel for WendlandC2Kernel {
    fn type_name(&self) -> &'static str {
        "W2"
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    #[inline(always)]
    fn phi(&self, r: f64) -> f64 {
        let xi = r / self.radius;
        if xi >= 1.0 {
            0.0
        } else {
            (1.0 - xi).powi(4) * (4.0 * xi + 1.0)
        }
    }

    fn clone_kernel(&self) -> Box<dyn RadialKernel> {
        Box::new(*self)
    }
}

impl KernelFromParams for WendlandC2Kernel {
    fn from_radius(radius: f64) -> KernelResult<Self> {
        Self::new(radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::KernelError, kernel_helpers::ConfigBlock};
    use equator::assert;
    use faer::{mat, row, Mat};

    fn line_points() -> Mat<f64> {
        mat![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]
    }

    fn scattered_points() -> Mat<f64> {
        mat![
            [0.1, 0.2, 0.3],
            [-1.0, 0.5, 2.0],
            [3.0, -2.0, 0.25],
            [0.0, 0.0, 0.0],
            [1.5, 1.5, -1.5],
        ]
    }

    #[test]
    fn imqb_three_point_line() {
        let kernel = ImqbKernel::new(1.0).unwrap();
        let points = line_points();
        let query = row![1.0, 0.0, 0.0];

        let w = kernel.weights(points.as_ref(), query.as_ref()).unwrap();

        assert!(w.ncols() == 3);
        assert!((w[0] - 0.7071067811865475).abs() < 1e-12);
        assert!(w[1] == 1.0);
        assert!((w[2] - 0.7071067811865475).abs() < 1e-12);
    }

    #[test]
    fn imqb_matches_closed_form() {
        let radius = 0.37;
        let kernel = ImqbKernel::new(radius).unwrap();
        let points = scattered_points();
        let query = row![0.4, -0.3, 1.1];

        let w = kernel.weights(points.as_ref(), query.as_ref()).unwrap();

        for i in 0..points.nrows() {
            let d2: f64 = (0..3).map(|d| (points[(i, d)] - query[d]).powi(2)).sum();
            let expected = 1.0 / (radius * radius + d2).sqrt();
            assert!((w[i] - expected).abs() <= 1e-14 * expected);
            assert!(w[i] > 0.0);
            assert!(w[i].is_finite());
        }
    }

    #[test]
    fn imqb_is_finite_at_coincident_points() {
        for radius in [1e-6, 0.3, 1.0, 2.0, 125.0] {
            let kernel = ImqbKernel::new(radius).unwrap();
            let points = scattered_points();

            for i in 0..points.nrows() {
                let w = kernel.weights(points.as_ref(), points.row(i)).unwrap();
                assert!(w[i] == 1.0 / radius);
            }
        }
    }

    #[test]
    fn imqb_decreases_strictly_with_distance() {
        let kernel = ImqbKernel::new(0.5).unwrap();
        let mut previous = kernel.phi(0.0);

        for step in 1..200 {
            let r = step as f64 * 0.25;
            let value = kernel.phi(r);
            assert!(value < previous);
            assert!(value > 0.0);
            previous = value;
        }
    }

    #[test]
    fn imqb_weights_are_invariant_under_rigid_motion() {
        let kernel = ImqbKernel::new(0.8).unwrap();
        let points = scattered_points();
        let query = row![0.7, 0.1, -0.4];

        // Rotation about z by 30 degrees, then about x by 45 degrees.
        let (sz, cz) = (30f64.to_radians().sin(), 30f64.to_radians().cos());
        let (sx, cx) = (45f64.to_radians().sin(), 45f64.to_radians().cos());
        let rz = mat![[cz, -sz, 0.0], [sz, cz, 0.0], [0.0, 0.0, 1.0]];
        let rx = mat![[1.0, 0.0, 0.0], [0.0, cx, -sx], [0.0, sx, cx]];
        let rotation = &rx * &rz;
        let shift = row![10.0, -4.0, 2.5];

        let moved_points = Mat::from_fn(points.nrows(), 3, |i, j| {
            (0..3).map(|k| rotation[(j, k)] * points[(i, k)]).sum::<f64>() + shift[j]
        });
        let moved_query = faer::Row::from_fn(3, |j| {
            (0..3).map(|k| rotation[(j, k)] * query[k]).sum::<f64>() + shift[j]
        });

        let w = kernel.weights(points.as_ref(), query.as_ref()).unwrap();
        let w_moved = kernel
            .weights(moved_points.as_ref(), moved_query.as_ref())
            .unwrap();

        for i in 0..points.nrows() {
            assert!((w[i] - w_moved[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn clones_behave_like_the_original() {
        let points = scattered_points();
        let query = row![0.0, 1.0, 0.0];

        let kernels: Vec<Box<dyn RadialKernel>> = vec![
            Box::new(ImqbKernel::new(0.6).unwrap()),
            Box::new(GaussianKernel::new(1.2).unwrap()),
            Box::new(ThinPlateSplineKernel::new(1.0).unwrap()),
            Box::new(WendlandC2Kernel::new(3.0).unwrap()),
        ];

        for kernel in kernels.iter() {
            let copy = kernel.clone_kernel();
            assert!(copy.type_name() == kernel.type_name());
            assert!(copy.radius() == kernel.radius());
            assert!(
                copy.weights(points.as_ref(), query.as_ref()).unwrap()
                    == kernel.weights(points.as_ref(), query.as_ref()).unwrap()
            );
        }
    }

    #[test]
    fn configured_and_direct_kernels_agree() {
        let block = ConfigBlock::new().with_entry("radius", 2.0);
        let from_block = ImqbKernel::from_config(&block).unwrap();
        let direct = ImqbKernel::new(2.0).unwrap();

        let points = scattered_points();
        let query = row![0.5, 0.5, 0.5];
        assert!(
            from_block.weights(points.as_ref(), query.as_ref()).unwrap()
                == direct.weights(points.as_ref(), query.as_ref()).unwrap()
        );
    }

    #[test]
    fn zero_radius_is_rejected() {
        let block = ConfigBlock::new().with_entry("radius", 0.0);
        let err = ImqbKernel::from_config(&block).unwrap_err();
        assert!(matches!(err, KernelError::Configuration { .. }));

        assert!(ImqbKernel::new(-2.0).is_err());
        assert!(GaussianKernel::new(0.0).is_err());
        assert!(WendlandC2Kernel::new(f64::NAN).is_err());
    }

    #[test]
    fn missing_or_non_numeric_radius_is_rejected() {
        let err = ImqbKernel::from_config(&ConfigBlock::new()).unwrap_err();
        assert!(matches!(err, KernelError::Configuration { .. }));

        let block = ConfigBlock::new().with_entry("radius", "wide");
        let err = ImqbKernel::from_config(&block).unwrap_err();
        assert!(matches!(err, KernelError::Configuration { .. }));
    }

    #[test]
    fn empty_control_points_are_a_dimension_mismatch() {
        let kernel = ImqbKernel::new(1.0).unwrap();
        let empty = Mat::<f64>::zeros(0, 3);
        let query = row![0.0, 0.0, 0.0];

        let err = kernel.weights(empty.as_ref(), query.as_ref()).unwrap_err();
        assert!(matches!(err, KernelError::DimensionMismatch { expected: 1, found: 0, .. }));
    }

    #[test]
    fn query_dimension_must_match() {
        let kernel = ImqbKernel::new(1.0).unwrap();
        let points = line_points();
        let query = row![0.0, 0.0];

        let err = kernel.weights(points.as_ref(), query.as_ref()).unwrap_err();
        assert!(matches!(err, KernelError::DimensionMismatch { expected: 3, found: 2, .. }));
    }

    #[test]
    fn other_profiles() {
        let gaussian = GaussianKernel::new(2.0).unwrap();
        assert!(gaussian.phi(0.0) == 1.0);
        assert!((gaussian.phi(2.0) - (-1.0f64).exp()).abs() < 1e-15);

        let tps = ThinPlateSplineKernel::new(1.0).unwrap();
        assert!(tps.phi(0.0) == 0.0);
        assert!(tps.phi(1.0) == 0.0);
        assert!((tps.phi(2.0) - 4.0 * 2f64.ln()).abs() < 1e-14);

        let w2 = WendlandC2Kernel::new(2.0).unwrap();
        assert!(w2.phi(0.0) == 1.0);
        assert!((w2.phi(1.0) - 0.1875).abs() < 1e-15);
        assert!(w2.phi(2.0) == 0.0);
        assert!(w2.phi(5.0) == 0.0);
    }
}
