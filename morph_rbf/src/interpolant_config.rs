/////////////////////////////////////////////////////////////////////////////////////////////
//
// Specifies kernel, polynomial and damping options for configuring RBF interpolants.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Specifies kernel, polynomial and damping options for configuring RBF interpolants.
use crate::{
    damping::MotionDamping,
    error::{InterpolationError, InterpolationResult},
};
use morph_rbf_kernels::{ConfigBlock, KernelParams, KernelType};
use serde::{Deserialize, Serialize};

/// Configuration key naming the kernel type.
pub const KERNEL_TYPE_KEY: &str = "RBF";
/// Configuration key toggling the constant + linear polynomial terms.
pub const POLYNOMIALS_KEY: &str = "polynomials";
/// Configuration key for the damping focal point.
pub const FOCAL_POINT_KEY: &str = "focalPoint";
/// Configuration key for the damping inner radius.
pub const INNER_RADIUS_KEY: &str = "innerRadius";
/// Configuration key for the damping outer radius.
pub const OUTER_RADIUS_KEY: &str = "outerRadius";

/// Returns whether the kernel needs the polynomial terms to give a solvable system.
///
/// Thin plate splines are only conditionally positive definite of order two,
/// so they need at least the constant + linear terms.
pub fn requires_polynomials(kernel_type: KernelType) -> bool {
    matches!(kernel_type, KernelType::TPS)
}

/// Settings describing one interpolant: which kernel, whether the system is
/// augmented with polynomial terms, and optional motion damping.
///
/// # Configuration block
/// Settings can be read from a block laid out as
///
/// ```json
/// {
///   "RBF": "IMQB",
///   "IMQBCoeffs": { "radius": 0.5 },
///   "polynomials": true,
///   "focalPoint": [0.0, 0.0, 0.0],
///   "innerRadius": 1.0,
///   "outerRadius": 4.0
/// }
/// ```
///
/// where the damping entries are optional but must appear together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpolantSettings {
    /// The RBF kernel to use for interpolation.
    pub kernel: KernelParams,

    /// Whether to augment the system with constant + linear polynomial terms.
    /// This reproduces rigid and affine motions exactly.
    pub polynomials: bool,

    /// Optional fade-out of interpolated values away from a focal point.
    pub damping: Option<MotionDamping>,
}

impl InterpolantSettings {
    /// Returns a new [`InterpolantSettingsBuilder`] for the given kernel type.
    pub fn builder(kernel_type: KernelType) -> InterpolantSettingsBuilder {
        InterpolantSettingsBuilder::new(kernel_type)
    }

    /// Reads settings from a configuration block. Unknown keys are ignored.
    pub fn from_config(block: &ConfigBlock) -> InterpolationResult<Self> {
        let type_name = block.word(KERNEL_TYPE_KEY)?;
        let coeffs = block.sub_block(&format!("{}Coeffs", type_name));

        // Resolve the name first so an unknown type is reported as such even
        // when its coefficients block is absent too.
        morph_rbf_kernels::lookup(type_name)?;
        let kernel = KernelParams::from_config(type_name, &coeffs?)?;

        let polynomials = block.bool_or(POLYNOMIALS_KEY, requires_polynomials(kernel.kernel_type))?;

        let focal_point = block.optional_vector(FOCAL_POINT_KEY)?;
        let inner_radius = block.optional_scalar(INNER_RADIUS_KEY)?;
        let outer_radius = block.optional_scalar(OUTER_RADIUS_KEY)?;

        let damping = match (focal_point, inner_radius, outer_radius) {
            (None, None, None) => None,
            (Some(focal_point), Some(inner_radius), Some(outer_radius)) => {
                Some(MotionDamping::new(focal_point, inner_radius, outer_radius))
            }
            _ => {
                return Err(InterpolationError::Configuration {
                    reason: format!(
                        "{}, {} and {} must be given together",
                        FOCAL_POINT_KEY, INNER_RADIUS_KEY, OUTER_RADIUS_KEY
                    ),
                });
            }
        };

        let settings = Self {
            kernel,
            polynomials,
            damping,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Checks combinations that cannot give a solvable system.
    pub(crate) fn validate(&self) -> InterpolationResult<()> {
        if requires_polynomials(self.kernel.kernel_type) && !self.polynomials {
            return Err(InterpolationError::Configuration {
                reason: format!(
                    "the {} kernel requires polynomial terms",
                    self.kernel.kernel_type.type_name()
                ),
            });
        }
        Ok(())
    }
}

/// A convenience builder for constructing a [`InterpolantSettings`] instance
/// with defaults tailored to the selected kernel type.
///
/// The builder should be called via the [`InterpolantSettings::builder`] method.
#[derive(Debug, Clone)]
pub struct InterpolantSettingsBuilder {
    kernel_type: KernelType,
    radius: f64,
    polynomials: bool,
    damping: Option<MotionDamping>,
}

impl InterpolantSettingsBuilder {
    fn new(kernel_type: KernelType) -> Self {
        Self {
            kernel_type,
            radius: 1.0,
            polynomials: requires_polynomials(kernel_type),
            damping: None,
        }
    }

    /// Sets the kernel radius.
    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Enables or disables the polynomial terms.
    pub fn polynomials(mut self, polynomials: bool) -> Self {
        self.polynomials = polynomials;
        self
    }

    /// Sets the motion damping.
    pub fn damping(mut self, damping: MotionDamping) -> Self {
        self.damping = Some(damping);
        self
    }

    /// Builds and returns an instance of [`InterpolantSettings`] from the values
    /// defined in the builder.
    pub fn build(self) -> InterpolationResult<InterpolantSettings> {
        let kernel = KernelParams::builder(self.kernel_type)
            .radius(self.radius)
            .build()?;

        let settings = InterpolantSettings {
            kernel,
            polynomials: self.polynomials,
            damping: self.damping,
        };
        settings.validate()?;
        Ok(settings)
    }
}
