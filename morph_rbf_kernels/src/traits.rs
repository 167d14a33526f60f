/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares the radial kernel capability trait and the shared construction trait.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{
    error::{KernelError, KernelResult},
    kernel_helpers::{ConfigBlock, KernelParams, RADIUS_KEY},
    utils::get_distance,
};
use faer::{MatRef, Row, RowRef};
use std::fmt::Debug;

/// A radial kernel `phi(r)` parameterised by a positive radius.
///
/// Kernels are immutable once built, so a single instance can be shared
/// read-only between threads. Use [`RadialKernel::clone_kernel`] to obtain an
/// independent copy behind a new box.
pub trait RadialKernel: Send + Sync + Debug {
    /// Registry name of the kernel, e.g. `"IMQB"`.
    fn type_name(&self) -> &'static str;

    /// Shape parameter the kernel was built with.
    fn radius(&self) -> f64;

    /// Evaluates the radial profile at distance `r >= 0`.
    fn phi(&self, r: f64) -> f64;

    /// Evaluates the kernel between a target and source point.
    #[inline(always)]
    fn evaluate(&self, target: RowRef<f64>, source: RowRef<f64>) -> f64 {
        self.phi(get_distance(target, source))
    }

    /// Returns `phi(|p_i - q|)` for every control point `p_i`, in control point order.
    ///
    /// Fails with [`KernelError::DimensionMismatch`] when `control_points` is
    /// empty or when `query` has a different number of coordinates.
    fn weights(
        &self,
        control_points: MatRef<'_, f64>,
        query: RowRef<'_, f64>,
    ) -> KernelResult<Row<f64>> {
        check_weight_inputs(control_points, query)?;

        Ok(Row::from_fn(control_points.nrows(), |i| {
            self.evaluate(query, control_points.row(i))
        }))
    }

    /// Creates and returns an independent copy of this kernel.
    fn clone_kernel(&self) -> Box<dyn RadialKernel>;
}

impl Clone for Box<dyn RadialKernel> {
    fn clone(&self) -> Self {
        self.clone_kernel()
    }
}

/// Shared construction paths for concrete kernel types.
pub trait KernelFromParams: Sized {
    /// Constructs `Self` from an explicit radius.
    fn from_radius(radius: f64) -> KernelResult<Self>;

    /// Constructs `Self` from a set of uniform kernel parameters.
    fn from_params(p: &KernelParams) -> KernelResult<Self> {
        Self::from_radius(p.radius)
    }

    /// Constructs `Self` from a configuration block carrying a `radius` entry.
    fn from_config(block: &ConfigBlock) -> KernelResult<Self> {
        Self::from_radius(block.scalar(RADIUS_KEY)?)
    }
}

/// Validates the shapes passed to [`RadialKernel::weights`].
pub fn check_weight_inputs(
    control_points: MatRef<'_, f64>,
    query: RowRef<'_, f64>,
) -> KernelResult<()> {
    if control_points.nrows() == 0 {
        return Err(KernelError::DimensionMismatch {
            expected: 1,
            found: 0,
            context: "control point count",
        });
    }

    if control_points.ncols() != query.ncols() {
        return Err(KernelError::DimensionMismatch {
            expected: control_points.ncols(),
            found: query.ncols(),
            context: "query point coordinates",
        });
    }

    Ok(())
}
