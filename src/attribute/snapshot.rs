// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Partial attribute snapshots pushed by the dispatcher.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::ParseError;
use crate::types::AttributeValue;

/// A partial mapping of attribute names to values.
///
/// Snapshots carry only the attributes that changed, or whatever the device
/// happened to report. JSON `null` is treated as "not reported" and never
/// enters a snapshot.
///
/// # Examples
///
/// ```
/// use vaillant_plus::attribute::Snapshot;
///
/// let snapshot = Snapshot::from_json(r#"{"Heating_Enable": 1, "DHW_setpoint": null}"#).unwrap();
///
/// assert!(snapshot.contains("Heating_Enable"));
/// assert!(!snapshot.contains("DHW_setpoint"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    values: HashMap<String, AttributeValue>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a snapshot from a JSON object.
    ///
    /// Null values are skipped. Nested objects and arrays are not device
    /// attributes and are skipped as well.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the input is not valid JSON or not an object.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Builds a snapshot from an already parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnexpectedFormat`] if the value is not an object.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ParseError> {
        let map = match value {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(ParseError::UnexpectedFormat(format!(
                    "expected an attribute object, got {other}"
                )));
            }
        };

        let mut snapshot = Self::new();
        for (name, raw) in map {
            if raw.is_null() {
                continue;
            }
            match serde_json::from_value::<AttributeValue>(raw) {
                Ok(value) => snapshot.insert(name, value),
                Err(_) => {
                    tracing::trace!(attribute = %name, "Skipping non-scalar attribute");
                }
            }
        }
        Ok(snapshot)
    }

    /// Adds or replaces a value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Adds a value and returns the snapshot, for building snapshots inline.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Returns the value reported for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.values.get(name)
    }

    /// Returns `true` if the snapshot reports `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterates over all reported attributes.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of reported attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Snapshot
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
