// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Loosely typed device attribute values.
//!
//! Vaillant devices report attributes as numbers, booleans encoded as `0`/`1`
//! (or as JSON booleans), and occasionally as string enums. [`AttributeValue`]
//! keeps the reported shape and offers typed accessors so that each entity
//! property validates the value where it is read.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single attribute value as reported by the device.
///
/// Absence is never encoded as a variant: "no value" is always
/// `Option::<AttributeValue>::None`, so `Heating_Enable = 0` stays a
/// meaningful, present value.
///
/// # Examples
///
/// ```
/// use vaillant_plus::types::AttributeValue;
///
/// let enabled: AttributeValue = serde_json::from_str("1").unwrap();
/// assert!(enabled.is_one());
///
/// let disabled = AttributeValue::from(false);
/// assert!(disabled.is_zero());
///
/// let setpoint = AttributeValue::from(42.5);
/// assert_eq!(setpoint.as_f64(), Some(42.5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// A boolean flag.
    Bool(bool),
    /// A numeric reading or setpoint.
    Number(f64),
    /// A string enum.
    Text(String),
}

impl AttributeValue {
    /// Returns the numeric value, if this is a number.
    ///
    /// Booleans are not coerced; temperatures reported as `true` are invalid.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Bool(_) | Self::Text(_) => None,
        }
    }

    /// Returns the value as a flag, if it is a boolean or a number.
    ///
    /// Any non-zero number counts as set.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Number(n) => Some(*n != 0.0),
            Self::Text(_) => None,
        }
    }

    /// Returns `true` if the value equals one (`1`, `1.0` or `true`).
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_one(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n == 1.0,
            Self::Text(_) => false,
        }
    }

    /// Returns `true` if the value equals zero (`0`, `0.0` or `false`).
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Bool(b) => !*b,
            Self::Number(n) => *n == 0.0,
            Self::Text(_) => false,
        }
    }

    /// Returns a short name of the value kind, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u8> for AttributeValue {
    fn from(value: u8) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
