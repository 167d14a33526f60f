/////////////////////////////////////////////////////////////////////////////////////////////
//
// Re-exports the kernel family, registry, configuration blocks and helpers used by morph_rbf.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Radial kernels for the `morph_rbf` crate
//!
//! Every kernel implements [`RadialKernel`], which exposes the radial profile
//! `phi(r)`, the weight vector of a query point against a set of control
//! points, and an independent clone. Kernels are built either directly
//! (`ImqbKernel::new(0.5)`), from a [`ConfigBlock`] carrying a `radius` entry,
//! or by name through the registry ([`new_kernel`], [`new_kernel_from_config`]).
//!
//! | name       | profile                              |
//! |------------|--------------------------------------|
//! | `IMQB`     | `1 / sqrt(r^2 + c^2)`                |
//! | `Gaussian` | `exp(-(r / c)^2)`                    |
//! | `TPS`      | `r^2 log r`                          |
//! | `W2`       | `(1 - r/c)^4 (4 r/c + 1)`, `r < c`   |
mod error;
mod kernel_helpers;
mod rbf_kernels;
mod registry;
mod traits;
mod utils;

/// Implemented kernels.
pub mod kernels {
    pub use super::rbf_kernels::*;
}

pub use {
    error::{KernelError, KernelResult},
    kernel_helpers::{ConfigBlock, KernelParams, KernelParamsBuilder, RADIUS_KEY},
    registry::{kernel_names, lookup, new_kernel, new_kernel_from_config, KernelType},
    traits::{check_weight_inputs, KernelFromParams, RadialKernel},
    utils::{
        get_a_matrix_symmetric, get_a_matrix_symmetric_par, get_distance, get_distance_sq,
        get_pointarray_extents,
    },
};
