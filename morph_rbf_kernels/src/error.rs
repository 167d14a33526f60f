/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares the error type raised while building kernels or evaluating kernel weights.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use std::{error::Error, fmt};

/// Result alias used throughout the kernel crate.
pub type KernelResult<T> = std::result::Result<T, KernelError>;

/// Errors that can occur when constructing a kernel or evaluating its weights.
///
/// Construction errors are fatal: no partially built kernel is ever returned
/// alongside one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum KernelError {
    /// A construction parameter is missing or invalid.
    Configuration {
        /// Configuration key the problem relates to (e.g. `radius`).
        key: String,
        /// Human readable description of what was wrong.
        reason: String,
    },

    /// The requested kernel type name is not present in the registry.
    UnknownKernel {
        name: String,
    },

    /// The supplied points do not have compatible shapes.
    DimensionMismatch {
        expected: usize,
        found: usize,
        context: &'static str,
    },
}

impl KernelError {
    pub(crate) fn configuration(key: &str, reason: impl Into<String>) -> Self {
        KernelError::Configuration {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::Configuration { key, reason } => {
                write!(f, "invalid kernel configuration for `{}`: {}", key, reason)
            }
            KernelError::UnknownKernel { name } => write!(
                f,
                "unknown kernel type {:?} (registered: {})",
                name,
                crate::registry::kernel_names().join(", ")
            ),
            KernelError::DimensionMismatch {
                expected,
                found,
                context,
            } => write!(
                f,
                "dimension mismatch in {}: expected {}, found {}",
                context, expected, found
            ),
        }
    }
}

impl Error for KernelError {}
