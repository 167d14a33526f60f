/////////////////////////////////////////////////////////////////////////////////////////////
//
// Provides configuration blocks, parameter and builder types for configuring RBF kernels.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{
    error::{KernelError, KernelResult},
    registry::{self, KernelType},
    traits::RadialKernel,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key holding the shape parameter in a kernel configuration block.
pub const RADIUS_KEY: &str = "radius";

/// A named block of configuration entries.
///
/// Blocks are plain JSON objects. Lookups are by key, and entries the reader
/// does not ask for are ignored, so a block may carry settings for several
/// consumers at once.
///
/// # Examples
///
/// ```
/// use morph_rbf_kernels::ConfigBlock;
///
/// let block = ConfigBlock::from_json_str(r#"{ "radius": 2.0, "comment": "ignored" }"#).unwrap();
/// assert_eq!(block.scalar("radius").unwrap(), 2.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigBlock {
    entries: Map<String, Value>,
}

impl ConfigBlock {
    /// Creates an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a block from JSON text. The top level value must be an object.
    pub fn from_json_str(text: &str) -> KernelResult<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| KernelError::configuration("<block>", format!("malformed JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Wraps an existing JSON value. The value must be an object.
    pub fn from_value(value: Value) -> KernelResult<Self> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(KernelError::configuration(
                "<block>",
                format!("expected an object, found {}", json_kind(&other)),
            )),
        }
    }

    /// Adds an entry, returning the block for chaining.
    pub fn with_entry(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.entries.insert(key.to_string(), value.into());
    }

    /// Returns the raw JSON value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns whether an entry exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Reads a required numeric entry.
    pub fn scalar(&self, key: &str) -> KernelResult<f64> {
        match self.optional_scalar(key)? {
            Some(v) => Ok(v),
            None => Err(KernelError::configuration(key, "required entry is missing")),
        }
    }

    /// Reads an optional numeric entry. Present but non-numeric values are errors.
    pub fn optional_scalar(&self, key: &str) -> KernelResult<Option<f64>> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(|| {
                KernelError::configuration(key, format!("{} is not representable as f64", n))
            }),
            Some(other) => Err(KernelError::configuration(
                key,
                format!("expected a number, found {}", json_kind(other)),
            )),
        }
    }

    /// Reads a boolean entry, falling back to `default` when absent.
    pub fn bool_or(&self, key: &str, default: bool) -> KernelResult<bool> {
        match self.entries.get(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(KernelError::configuration(
                key,
                format!("expected a boolean, found {}", json_kind(other)),
            )),
        }
    }

    /// Reads a required string entry.
    pub fn word(&self, key: &str) -> KernelResult<&str> {
        match self.entries.get(key) {
            None => Err(KernelError::configuration(key, "required entry is missing")),
            Some(Value::String(s)) => Ok(s.as_str()),
            Some(other) => Err(KernelError::configuration(
                key,
                format!("expected a string, found {}", json_kind(other)),
            )),
        }
    }

    /// Reads an optional list of numbers, e.g. a point.
    pub fn optional_vector(&self, key: &str) -> KernelResult<Option<Vec<f64>>> {
        let items = match self.entries.get(key) {
            None => return Ok(None),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(KernelError::configuration(
                    key,
                    format!("expected a list of numbers, found {}", json_kind(other)),
                ));
            }
        };

        items
            .iter()
            .map(|item| {
                item.as_f64().ok_or_else(|| {
                    KernelError::configuration(
                        key,
                        format!("expected a list of numbers, found element {}", json_kind(item)),
                    )
                })
            })
            .collect::<KernelResult<Vec<f64>>>()
            .map(Some)
    }

    /// Reads a required nested block.
    pub fn sub_block(&self, key: &str) -> KernelResult<ConfigBlock> {
        match self.entries.get(key) {
            None => Err(KernelError::configuration(key, "required block is missing")),
            Some(value) => ConfigBlock::from_value(value.clone()).map_err(|_| {
                KernelError::configuration(
                    key,
                    format!("expected a block, found {}", json_kind(value)),
                )
            }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a block",
    }
}

/// Checks that a shape parameter is usable: finite and strictly positive.
pub(crate) fn validate_radius(radius: f64) -> KernelResult<f64> {
    if radius.is_finite() && radius > 0.0 {
        Ok(radius)
    } else {
        Err(KernelError::configuration(
            RADIUS_KEY,
            format!("expected a positive finite value, found {}", radius),
        ))
    }
}

/// Defines the [`KernelType`] to use, along with its shape parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KernelParams {
    /// KernelType enum variant to use.
    pub kernel_type: KernelType,

    /// Shape parameter of the kernel. Larger values give smoother, more global
    /// influence; smaller values restrict influence to a local neighbourhood.
    /// For compactly supported kernels this is the support radius.
    pub radius: f64,
}

impl KernelParams {
    /// Begins building a [`KernelParams`] instance for the given kernel type.
    pub fn builder(kernel_type: KernelType) -> KernelParamsBuilder {
        KernelParamsBuilder {
            kernel_type,
            radius: 1.0,
        }
    }

    /// Resolves `type_name` through the registry and reads the radius from `block`.
    pub fn from_config(type_name: &str, block: &ConfigBlock) -> KernelResult<Self> {
        let kernel_type = registry::lookup(type_name)?;
        let radius = validate_radius(block.scalar(RADIUS_KEY)?)?;
        Ok(Self {
            kernel_type,
            radius,
        })
    }

    /// Builds the kernel described by these parameters.
    pub fn build_kernel(&self) -> KernelResult<Box<dyn RadialKernel>> {
        registry::new_kernel(self.kernel_type.type_name(), self.radius)
    }
}

/// Builder for [`KernelParams`] that provides sensible defaults.
#[derive(Debug, Clone, Copy)]
pub struct KernelParamsBuilder {
    kernel_type: KernelType,
    radius: f64,
}

impl KernelParamsBuilder {
    /// Sets the `radius` parameter on the builder.
    pub fn radius(mut self, v: f64) -> Self {
        self.radius = v;
        self
    }

    /// Finalises the builder into a [`KernelParams`] value.
    pub fn build(self) -> KernelResult<KernelParams> {
        Ok(KernelParams {
            kernel_type: self.kernel_type,
            radius: validate_radius(self.radius)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;
    use serde_json::json;

    #[test]
    fn scalar_reads_numbers_and_ignores_unknown_keys() {
        let block = ConfigBlock::from_value(json!({ "radius": 0.25, "other": "x" })).unwrap();
        assert!(block.scalar("radius").unwrap() == 0.25);
        assert!(block.contains("other"));
        assert!(block.get("other") == Some(&json!("x")));
        assert!(block.get("missing") == None);
    }

    #[test]
    fn scalar_reports_missing_and_non_numeric_entries() {
        let block = ConfigBlock::new().with_entry("radius", "big");

        let err = block.scalar("radius").unwrap_err();
        assert!(matches!(err, KernelError::Configuration { ref key, .. } if key == "radius"));

        let err = ConfigBlock::new().scalar("radius").unwrap_err();
        assert!(matches!(err, KernelError::Configuration { .. }));
    }

    #[test]
    fn non_object_json_is_rejected() {
        let err = ConfigBlock::from_json_str("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, KernelError::Configuration { .. }));

        let err = ConfigBlock::from_json_str("{ radius: ").unwrap_err();
        assert!(matches!(err, KernelError::Configuration { .. }));
    }

    #[test]
    fn vectors_and_sub_blocks() {
        let block = ConfigBlock::from_json_str(
            r#"{ "focalPoint": [1.0, 2, 3.5], "IMQBCoeffs": { "radius": 1.5 }, "bad": [1, "a"] }"#,
        )
        .unwrap();

        assert!(block.optional_vector("focalPoint").unwrap() == Some(vec![1.0, 2.0, 3.5]));
        assert!(block.optional_vector("missing").unwrap() == None);
        assert!(block.optional_vector("bad").is_err());
        assert!(block.sub_block("IMQBCoeffs").unwrap().scalar("radius").unwrap() == 1.5);
        assert!(block.sub_block("focalPoint").is_err());
    }

    #[test]
    fn radius_validation() {
        assert!(validate_radius(0.5).is_ok());
        assert!(validate_radius(0.0).is_err());
        assert!(validate_radius(-1.0).is_err());
        assert!(validate_radius(f64::NAN).is_err());
        assert!(validate_radius(f64::INFINITY).is_err());
    }

    #[test]
    fn params_builder_validates_radius() {
        let params = KernelParams::builder(KernelType::IMQB).radius(2.0).build().unwrap();
        assert!(params.radius == 2.0);
        assert!(KernelParams::builder(KernelType::IMQB).radius(0.0).build().is_err());
    }

    #[test]
    fn params_from_config() {
        let block = ConfigBlock::new().with_entry("radius", 3.0);
        let params = KernelParams::from_config("Gaussian", &block).unwrap();
        assert!(params.kernel_type == KernelType::Gaussian);
        assert!(params.radius == 3.0);

        let err = KernelParams::from_config("Nope", &block).unwrap_err();
        assert!(matches!(err, KernelError::UnknownKernel { .. }));
    }

    #[test]
    fn params_round_trip_through_json() {
        let params = KernelParams::builder(KernelType::W2).radius(0.75).build().unwrap();
        let text = serde_json::to_string(&params).unwrap();
        assert!(text.contains("\"W2\""));
        let back: KernelParams = serde_json::from_str(&text).unwrap();
        assert!(back == params);
    }
}
