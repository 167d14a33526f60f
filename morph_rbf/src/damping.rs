/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the radial fade-out applied to interpolated motion away from a focal point.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::error::{InterpolationError, InterpolationResult};
use faer::RowRef;
use serde::{Deserialize, Serialize};

/// Fades interpolated values to zero with distance from a focal point.
///
/// Values are left untouched inside `inner_radius`, zeroed beyond
/// `outer_radius`, and blended with a C1 smoothstep `1 - t^2 (3 - 2t)` in
/// between, where `t = (|x - focal_point| - inner_radius) / (outer_radius - inner_radius)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionDamping {
    pub focal_point: Vec<f64>,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl MotionDamping {
    pub fn new(focal_point: Vec<f64>, inner_radius: f64, outer_radius: f64) -> Self {
        Self {
            focal_point,
            inner_radius,
            outer_radius,
        }
    }

    /// Checks the radii and that the focal point has `dimensions` coordinates.
    pub(crate) fn validate(&self, dimensions: usize) -> InterpolationResult<()> {
        if self.focal_point.len() != dimensions {
            return Err(InterpolationError::Configuration {
                reason: format!(
                    "damping focal point has {} coordinates, control points have {}",
                    self.focal_point.len(),
                    dimensions
                ),
            });
        }

        let radii_ok = self.inner_radius.is_finite()
            && self.outer_radius.is_finite()
            && self.inner_radius >= 0.0
            && self.inner_radius < self.outer_radius;

        if !radii_ok || self.focal_point.iter().any(|c| !c.is_finite()) {
            return Err(InterpolationError::Configuration {
                reason: format!(
                    "damping requires a finite focal point and 0 <= innerRadius < outerRadius, \
                     found innerRadius = {}, outerRadius = {}",
                    self.inner_radius, self.outer_radius
                ),
            });
        }

        Ok(())
    }

    /// Scale factor in `[0, 1]` for a point.
    #[inline]
    pub fn factor(&self, point: RowRef<f64>) -> f64 {
        let distance = point
            .iter()
            .zip(self.focal_point.iter())
            .map(|(x, c)| (x - c) * (x - c))
            .sum::<f64>()
            .sqrt();

        if distance <= self.inner_radius {
            1.0
        } else if distance >= self.outer_radius {
            0.0
        } else {
            let t = (distance - self.inner_radius) / (self.outer_radius - self.inner_radius);
            1.0 - t * t * (3.0 - 2.0 * t)
        }
    }
}
