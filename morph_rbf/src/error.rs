/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares the error type returned while setting up, solving and evaluating interpolants.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use morph_rbf_kernels::KernelError;
use std::{error::Error, fmt};

/// Result alias used by the interpolation engine.
pub type InterpolationResult<T> = std::result::Result<T, InterpolationError>;

/// Errors that can occur when building, updating or evaluating an
/// [`RBFInterpolator`](crate::RBFInterpolator).
///
/// A failed solve is always reported here; the interpolator never falls back
/// to zero or default coefficients.
#[derive(Debug, Clone, PartialEq)]
pub enum InterpolationError {
    /// Kernel construction or weight evaluation failed.
    Kernel(KernelError),

    /// The interpolant settings are invalid.
    Configuration {
        reason: String,
    },

    /// Input shapes disagree, e.g. the number of values differs from the
    /// number of control points.
    DimensionMismatch {
        expected: usize,
        found: usize,
        context: &'static str,
    },

    /// The interpolation system is singular or too ill-conditioned to solve.
    NumericalSingularity {
        /// Ratio of the smallest to the largest pivot magnitude of the factorisation.
        pivot_ratio: f64,
        /// Ratio below which the system is rejected.
        tolerance: f64,
    },
}

impl fmt::Display for InterpolationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpolationError::Kernel(source) => write!(f, "kernel error: {}", source),
            InterpolationError::Configuration { reason } => {
                write!(f, "invalid interpolant configuration: {}", reason)
            }
            InterpolationError::DimensionMismatch {
                expected,
                found,
                context,
            } => write!(
                f,
                "dimension mismatch in {}: expected {}, found {}",
                context, expected, found
            ),
            InterpolationError::NumericalSingularity {
                pivot_ratio,
                tolerance,
            } => write!(
                f,
                "interpolation system is numerically singular: pivot ratio {:e} is below {:e} \
                 (check for duplicate control points or reduce the kernel radius)",
                pivot_ratio, tolerance
            ),
        }
    }
}

impl Error for InterpolationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            InterpolationError::Kernel(source) => Some(source),
            InterpolationError::Configuration { .. }
            | InterpolationError::DimensionMismatch { .. }
            | InterpolationError::NumericalSingularity { .. } => None,
        }
    }
}

impl From<KernelError> for InterpolationError {
    fn from(value: KernelError) -> Self {
        InterpolationError::Kernel(value)
    }
}
