/////////////////////////////////////////////////////////////////////////////////////////////
//
// Maps kernel type names to constructors and builds kernels from parameters or config blocks.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Runtime kernel selection.
//!
//! The kernel family is declared once in the `for_each_kernel!` invocation at
//! the bottom of this file. From that list the macro generates the
//! serialisable [`KernelType`] selector and the static name → constructor
//! table that backs [`new_kernel`] and [`new_kernel_from_config`].

use crate::{
    error::{KernelError, KernelResult},
    kernel_helpers::ConfigBlock,
    traits::{KernelFromParams, RadialKernel},
};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, str::FromStr};

type RadiusConstructor = fn(f64) -> KernelResult<Box<dyn RadialKernel>>;
type ConfigConstructor = fn(&ConfigBlock) -> KernelResult<Box<dyn RadialKernel>>;

/// One registry row: the selector plus both construction paths.
#[derive(Clone, Copy)]
struct RegistryEntry {
    kernel_type: KernelType,
    from_radius: RadiusConstructor,
    from_config: ConfigConstructor,
}

fn boxed_from_radius<K>(radius: f64) -> KernelResult<Box<dyn RadialKernel>>
where
    K: KernelFromParams + RadialKernel + 'static,
{
    Ok(Box::new(K::from_radius(radius)?))
}

fn boxed_from_config<K>(block: &ConfigBlock) -> KernelResult<Box<dyn RadialKernel>>
where
    K: KernelFromParams + RadialKernel + 'static,
{
    Ok(Box::new(K::from_config(block)?))
}

macro_rules! for_each_kernel {
    ( registry = [ $( ($V:ident, $name:literal, $Kty:path) ),* $(,)? ] ) => {

        /// Runtime kernel selector built from the kernel registry.
        ///
        /// Serialises as the registry name, e.g. `"IMQB"`.
        #[allow(clippy::upper_case_acronyms)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum KernelType {
            $(
                #[serde(rename = $name)]
                $V,
            )*
        }

        impl KernelType {
            /// Every registered kernel type, in declaration order.
            pub const ALL: &'static [KernelType] = &[ $( KernelType::$V, )* ];

            /// Registry name of this kernel type.
            pub fn type_name(&self) -> &'static str {
                match self {
                    $( KernelType::$V => $name, )*
                }
            }
        }

        lazy_static! {
            static ref KERNEL_REGISTRY: HashMap<&'static str, RegistryEntry> = {
                let mut registry = HashMap::new();
                $(
                    registry.insert(
                        $name,
                        RegistryEntry {
                            kernel_type: KernelType::$V,
                            from_radius: boxed_from_radius::<$Kty>,
                            from_config: boxed_from_config::<$Kty>,
                        },
                    );
                )*
                registry
            };
        }
    };
}

fn entry(type_name: &str) -> KernelResult<&'static RegistryEntry> {
    KERNEL_REGISTRY
        .get(type_name)
        .ok_or_else(|| KernelError::UnknownKernel {
            name: type_name.to_string(),
        })
}

/// Returns the registered kernel names in sorted order.
pub fn kernel_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = KERNEL_REGISTRY.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Resolves a kernel type name.
pub fn lookup(type_name: &str) -> KernelResult<KernelType> {
    entry(type_name).map(|e| e.kernel_type)
}

/// Builds the named kernel with an explicit radius.
///
/// # Examples
///
/// ```
/// use faer::{mat, row};
/// use morph_rbf_kernels::new_kernel;
///
/// let kernel = new_kernel("IMQB", 1.0).unwrap();
/// let points = mat![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
/// let weights = kernel.weights(points.as_ref(), row![1.0, 0.0, 0.0].as_ref()).unwrap();
/// assert_eq!(weights[1], 1.0);
///
/// assert!(new_kernel("Multiquadric", 1.0).is_err());
/// ```
pub fn new_kernel(type_name: &str, radius: f64) -> KernelResult<Box<dyn RadialKernel>> {
    (entry(type_name)?.from_radius)(radius)
}

/// Builds the named kernel from a configuration block carrying a `radius` entry.
pub fn new_kernel_from_config(
    type_name: &str,
    block: &ConfigBlock,
) -> KernelResult<Box<dyn RadialKernel>> {
    (entry(type_name)?.from_config)(block)
}

impl FromStr for KernelType {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s)
    }
}

for_each_kernel! {
    registry = [
        (IMQB,     "IMQB",     crate::kernels::ImqbKernel),
        (Gaussian, "Gaussian", crate::kernels::GaussianKernel),
        (TPS,      "TPS",      crate::kernels::ThinPlateSplineKernel),
        (W2,       "W2",       crate::kernels::WendlandC2Kernel),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;
    use faer::{mat, row};

    #[test]
    fn every_type_resolves_to_itself() {
        for kernel_type in KernelType::ALL {
            assert!(lookup(kernel_type.type_name()).unwrap() == *kernel_type);

            let kernel = new_kernel(kernel_type.type_name(), 1.5).unwrap();
            assert!(kernel.type_name() == kernel_type.type_name());
            assert!(kernel.radius() == 1.5);
        }
    }

    #[test]
    fn names_are_sorted_and_complete() {
        assert!(kernel_names() == vec!["Gaussian", "IMQB", "TPS", "W2"]);
    }

    #[test]
    fn unknown_names_produce_no_kernel() {
        let err = new_kernel("RBF9000", 1.0).unwrap_err();
        assert!(err == KernelError::UnknownKernel { name: "RBF9000".to_string() });

        let block = ConfigBlock::new().with_entry("radius", 1.0);
        assert!(new_kernel_from_config("imqb", &block).is_err());
        assert!("imqb".parse::<KernelType>().is_err());
        assert!(err.to_string().contains("IMQB"));
    }

    #[test]
    fn config_path_validates_radius() {
        let block = ConfigBlock::new().with_entry("radius", 0);
        let err = new_kernel_from_config("IMQB", &block).unwrap_err();
        assert!(matches!(err, KernelError::Configuration { .. }));
    }

    #[test]
    fn config_and_direct_paths_agree() {
        let block = ConfigBlock::from_json_str(r#"{ "radius": 2.0 }"#).unwrap();
        let configured = new_kernel_from_config("IMQB", &block).unwrap();
        let direct = new_kernel("IMQB", 2.0).unwrap();

        let points = mat![[0.0, 1.0, 0.0], [3.0, 2.0, 1.0]];
        let query = row![0.5, 0.5, 0.5];
        assert!(
            configured.weights(points.as_ref(), query.as_ref()).unwrap()
                == direct.weights(points.as_ref(), query.as_ref()).unwrap()
        );
    }

    #[test]
    fn boxed_clone_is_independent() {
        let kernel = new_kernel("W2", 4.0).unwrap();
        let copy = kernel.clone();
        drop(kernel);
        assert!(copy.type_name() == "W2");
        assert!(copy.phi(0.0) == 1.0);
    }
}
