/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares configuration types for matrix assembly and the dense solver.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Declares configuration types for matrix assembly and the dense solver.
use serde::{Deserialize, Serialize};

/// Solver and assembly parameters for an [`RBFInterpolator`](crate::RBFInterpolator).
///
/// ### Intended Usage
/// The defaults suit mesh-motion problems with up to a few thousand control
/// points. They are part of the public API mainly for users who need to relax
/// or tighten the singularity check, or to tune when assembly goes parallel.
///
/// The pivot ratio of globally supported kernels shrinks quickly as control
/// points get denser relative to the kernel radius. With uniform points in a
/// unit cube and a radius of `1.0`, a few hundred points pass the default
/// check while a thousand do not. Larger or denser clouds need a smaller
/// radius or a looser `pivot_tolerance`.
///
/// ### Default Values
/// - `pivot_tolerance`: `1e-13`
/// - `parallel_assembly_threshold`: `256`
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Params {
    /// The factorisation is rejected as numerically singular when the ratio of
    /// its smallest to largest pivot magnitude falls below this value.
    pub pivot_tolerance: f64,

    /// Number of control points from which the kernel matrix is assembled on
    /// the rayon thread pool rather than serially.
    pub parallel_assembly_threshold: usize,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            pivot_tolerance: 1e-13,
            parallel_assembly_threshold: 256,
        }
    }
}

impl Params {
    /// Returns a new [`ParamsBuilder`] populated with the defaults.
    pub fn builder() -> ParamsBuilder {
        ParamsBuilder {
            params: Params::default(),
        }
    }
}

/// A convenience builder for constructing a [`Params`] instance.
///
/// The builder should be called via the [`Params::builder`] method.
#[derive(Debug, Clone, Copy)]
pub struct ParamsBuilder {
    params: Params,
}

impl ParamsBuilder {
    /// Sets the pivot ratio below which a solve is rejected.
    pub fn pivot_tolerance(mut self, pivot_tolerance: f64) -> Self {
        self.params.pivot_tolerance = pivot_tolerance;
        self
    }

    /// Sets the point count from which assembly runs in parallel.
    pub fn parallel_assembly_threshold(mut self, parallel_assembly_threshold: usize) -> Self {
        self.params.parallel_assembly_threshold = parallel_assembly_threshold;
        self
    }

    /// Builds and returns a [`Params`] instance.
    pub fn build(self) -> Params {
        self.params
    }
}
