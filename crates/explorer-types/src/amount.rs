// SPDX-FileCopyrightText: 2025 Explorer Client Contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Normalization of the explorer's ambiguous monetary wire format
//!
//! Monetary fields in explorer responses are serialized inconsistently:
//! some endpoints (and some server versions) emit a JSON number, others a
//! decimal string of the same magnitude. [`WireAmount`] captures that
//! variance as a tagged union at the wire boundary, and [`normalize`]
//! resolves it into a canonical `f64` exactly once, during decode.
//!
//! Records embed the resolution step directly via [`deserialize`], so the
//! raw representation never survives into a decoded value:
//!
//! ```rust
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Payment {
//!     #[serde(deserialize_with = "explorer_types::amount::deserialize")]
//!     value: f64,
//! }
//!
//! let as_number: Payment = serde_json::from_str(r#"{"value": 1.5}"#).unwrap();
//! let as_string: Payment = serde_json::from_str(r#"{"value": "1.5"}"#).unwrap();
//! assert_eq!(as_number.value, as_string.value);
//! ```

use serde::{Deserialize, Deserializer, de};
use serde_json::Value;
use thiserror::Error;

/// Errors produced while normalizing a monetary wire value
#[derive(Debug, Error)]
pub enum AmountError {
    /// The value was neither a JSON number nor a string
    #[error("expected a number or decimal string, found {found}")]
    TypeMismatch {
        /// JSON type name of the offending value
        found: &'static str,
    },

    /// The value was a string but not a parseable decimal
    #[error("malformed decimal string {value:?}: {source}")]
    Malformed {
        /// The offending string as received
        value: String,
        /// Underlying float parse failure
        source: std::num::ParseFloatError,
    },
}

/// A monetary value as it appears on the wire, before resolution
#[derive(Debug, Clone, PartialEq)]
pub enum WireAmount {
    /// Serialized as a JSON number
    Number(f64),
    /// Serialized as a decimal string
    Text(String),
}

impl WireAmount {
    /// Classify a decoded JSON value into one of the two known shapes.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::TypeMismatch`] for any other JSON shape,
    /// including non-representable numbers (e.g. an integer outside `f64`
    /// range).
    pub fn classify(value: &Value) -> Result<Self, AmountError> {
        match value {
            Value::Number(n) => n
                .as_f64()
                .map(WireAmount::Number)
                .ok_or(AmountError::TypeMismatch { found: "number" }),
            Value::String(s) => Ok(WireAmount::Text(s.clone())),
            Value::Null => Err(AmountError::TypeMismatch { found: "null" }),
            Value::Bool(_) => Err(AmountError::TypeMismatch { found: "boolean" }),
            Value::Array(_) => Err(AmountError::TypeMismatch { found: "array" }),
            Value::Object(_) => Err(AmountError::TypeMismatch { found: "object" }),
        }
    }

    /// Resolve to the canonical float representation.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Malformed`] if a text amount does not parse
    /// as a decimal.
    pub fn resolve(&self) -> Result<f64, AmountError> {
        match self {
            WireAmount::Number(f) => Ok(*f),
            WireAmount::Text(s) => s.parse::<f64>().map_err(|source| AmountError::Malformed {
                value: s.clone(),
                source,
            }),
        }
    }
}

/// Classify and resolve a decoded JSON value in one step.
///
/// # Errors
///
/// Returns [`AmountError::TypeMismatch`] for shapes other than number or
/// string, and [`AmountError::Malformed`] for unparseable decimal strings.
pub fn normalize(value: &Value) -> Result<f64, AmountError> {
    WireAmount::classify(value)?.resolve()
}

/// Serde adapter for ambiguous monetary fields.
///
/// Used with `#[serde(deserialize_with = "explorer_types::amount::deserialize")]`
/// on every monetary field so normalization failures surface as ordinary
/// decode errors.
pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    normalize(&value).map_err(de::Error::custom)
}
