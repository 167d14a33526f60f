/////////////////////////////////////////////////////////////////////////////////////////////
//
// Exposes the public API and high-level documentation for dense RBF interpolation.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Dense Radial Basis Function (RBF) interpolation.
//!
//! Given a set of control points with known values, an [`RBFInterpolator`]
//! builds the smooth function
//!
//! ```text
//! s(x) = sum_i c_i phi(|x - x_i|) + p(x)
//! ```
//!
//! that reproduces the values exactly, where `phi` is one of the kernels in
//! [`morph_rbf_kernels`] and `p` is an optional constant + linear polynomial.
//! The typical use is mesh motion: boundary displacements are interpolated
//! into the volume, optionally faded out with distance via [`MotionDamping`].
//!
//! The system is dense and solved directly with a full-pivot LU from
//! [`faer`](https://docs.rs/faer/latest/faer/), so it is intended for control
//! point sets of up to a few thousand points. The factorisation is kept, so
//! new values at unchanged control points only cost a pair of triangular
//! solves.
//!
//! # Features
//! - Supports 1D, 2D, and 3D input domains
//! - Scalar and vector valued fields
//! - Polynomial augmentation that adapts to coplanar or collinear control points
//! - Selection of kernels by name from JSON style configuration blocks
//!
//! # Examples
//!
//! ```
//! use faer::{mat, row};
//! use morph_rbf::{
//!     RBFInterpolator,
//!     interpolant_config::InterpolantSettings,
//! };
//! use morph_rbf_kernels::ConfigBlock;
//!
//! let block = ConfigBlock::from_json_str(
//!     r#"{ "RBF": "IMQB", "IMQBCoeffs": { "radius": 1.0 }, "polynomials": true }"#,
//! ).unwrap();
//! let settings = InterpolantSettings::from_config(&block).unwrap();
//!
//! // Displacements of four boundary points.
//! let points = mat![
//!     [0.0, 0.0, 0.0],
//!     [1.0, 0.0, 0.0],
//!     [0.0, 1.0, 0.0],
//!     [0.0, 0.0, 1.0],
//! ];
//! let displacements = mat![
//!     [0.1, 0.0, 0.0],
//!     [0.1, 0.0, 0.0],
//!     [0.1, 0.0, 0.0],
//!     [0.1, 0.0, 0.0],
//! ];
//!
//! let rbfi = RBFInterpolator::builder(points, displacements, settings).build().unwrap();
//!
//! // A uniform translation is reproduced everywhere.
//! let moved = rbfi.evaluate_point(row![0.3, 0.3, 0.3].as_ref()).unwrap();
//! assert!((moved[0] - 0.1).abs() < 1e-10);
//! assert!(moved[1].abs() < 1e-10);
//! ```
//!
//! # References
//! 1.  Fasshauer, G., 2007. Meshfree Approximation Methods with Matlab. World Scientific
//!     Publishing Co.
//! 2.  A. de Boer, M. S. van der Schoot, H. Bijl. Mesh deformation based on radial basis
//!     function interpolation. Computers & Structures, 85(11):784–795, 2007.
pub mod interpolant_config;

mod common;

mod damping;

mod error;

mod rbf;

mod polynomials;

pub mod progress;

pub mod config;

pub use {
    common::{create_evaluation_grid, generate_random_points},
    damping::MotionDamping,
    error::{InterpolationError, InterpolationResult},
    polynomials::{evaluate_monomials, select_unisolvent_columns},
    rbf::{Coefficients, RBFInterpolator, RBFInterpolatorBuilder},
};
