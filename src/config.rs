// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Config entry data and entity defaults.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::event::DeviceId;

/// Default climate target temperature in °C.
pub const DEFAULT_TARGET_TEMPERATURE: f64 = 35.0;

/// Default lower central heating limit in °C.
pub const DEFAULT_MIN_TEMPERATURE: f64 = 30.0;

/// Default upper central heating limit in °C.
pub const DEFAULT_MAX_TEMPERATURE: f64 = 75.0;

/// Data of one config entry: the device the platforms are set up for.
///
/// # Examples
///
/// ```
/// use vaillant_plus::EntryConfig;
///
/// let entry = EntryConfig::from_value(serde_json::json!({"did": "a1b2c3"})).unwrap();
/// assert_eq!(entry.device_id.as_str(), "a1b2c3");
///
/// // Defaults can be overridden per entry
/// let entry = EntryConfig::new("a1b2c3")
///     .with_climate_defaults(Default::default());
/// assert_eq!(entry.climate.target_temperature, 35.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryConfig {
    /// The device id assigned by the cloud.
    #[serde(rename = "did")]
    pub device_id: DeviceId,

    /// Values the climate entity shows until the device reports its own.
    #[serde(default)]
    pub climate: ClimateDefaults,
}

impl EntryConfig {
    /// Creates an entry for a device with default settings.
    #[must_use]
    pub fn new(device_id: impl Into<DeviceId>) -> Self {
        Self {
            device_id: device_id.into(),
            climate: ClimateDefaults::default(),
        }
    }

    /// Parses and validates raw entry data.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the data does not deserialize and
    /// [`ConfigError::EmptyDeviceId`] if the device id is blank.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        let entry: Self = serde_json::from_value(value)?;
        entry.validate()?;
        Ok(entry)
    }

    /// Checks the entry for values no device could have.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyDeviceId`] if the device id is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device_id.as_str().trim().is_empty() {
            return Err(ConfigError::EmptyDeviceId);
        }
        Ok(())
    }

    /// Sets the climate defaults.
    #[must_use]
    pub fn with_climate_defaults(mut self, defaults: ClimateDefaults) -> Self {
        self.climate = defaults;
        self
    }
}

/// Fallback values of the climate entity.
///
/// Used when neither the device nor the cache knows an attribute yet.
///
/// # Examples
///
/// ```
/// use vaillant_plus::ClimateDefaults;
///
/// let defaults = ClimateDefaults::default()
///     .with_target_temperature(40.0)
///     .with_max_temperature(70.0);
/// assert_eq!(defaults.min_temperature, 30.0);
/// assert_eq!(defaults.max_temperature, 70.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateDefaults {
    /// Target and current temperature.
    pub target_temperature: f64,
    /// Minimum and low target temperature.
    pub min_temperature: f64,
    /// Maximum and high target temperature.
    pub max_temperature: f64,
}

impl Default for ClimateDefaults {
    fn default() -> Self {
        Self {
            target_temperature: DEFAULT_TARGET_TEMPERATURE,
            min_temperature: DEFAULT_MIN_TEMPERATURE,
            max_temperature: DEFAULT_MAX_TEMPERATURE,
        }
    }
}

impl ClimateDefaults {
    /// Sets the default target temperature.
    #[must_use]
    pub fn with_target_temperature(mut self, celsius: f64) -> Self {
        self.target_temperature = celsius;
        self
    }

    /// Sets the default minimum temperature.
    #[must_use]
    pub fn with_min_temperature(mut self, celsius: f64) -> Self {
        self.min_temperature = celsius;
        self
    }

    /// Sets the default maximum temperature.
    #[must_use]
    pub fn with_max_temperature(mut self, celsius: f64) -> Self {
        self.max_temperature = celsius;
        self
    }
}
