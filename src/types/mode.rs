// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Categorical states derived from device attributes.
//!
//! These are the values an entity reports to its consumer. Each one is
//! computed from a raw attribute by a pure mapping function (see the
//! `from_*` constructors) and is what sticky slots hold.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;
use crate::types::AttributeValue;

/// HVAC operation mode of the climate entity.
///
/// # Examples
///
/// ```
/// use vaillant_plus::types::{AttributeValue, HvacMode};
///
/// assert_eq!(HvacMode::from_heating_enable(&AttributeValue::from(1)), Some(HvacMode::Heat));
/// assert_eq!(HvacMode::from_heating_enable(&AttributeValue::from(0)), Some(HvacMode::Off));
/// assert_eq!("heat".parse::<HvacMode>().unwrap(), HvacMode::Heat);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacMode {
    /// Central heating is enabled.
    Heat,
    /// Central heating is disabled.
    Off,
}

impl HvacMode {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Heat => "heat",
            Self::Off => "off",
        }
    }

    /// Maps a `Heating_Enable` value to a mode.
    ///
    /// One means heating, any other number or boolean means off. Text values
    /// cannot be interpreted and yield `None`.
    #[must_use]
    pub fn from_heating_enable(value: &AttributeValue) -> Option<Self> {
        value
            .as_flag()
            .map(|_| if value.is_one() { Self::Heat } else { Self::Off })
    }

    /// Returns `true` if heating is enabled in this mode.
    #[must_use]
    pub const fn heating_enabled(&self) -> bool {
        matches!(self, Self::Heat)
    }
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HvacMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "heat" => Ok(Self::Heat),
            "off" => Ok(Self::Off),
            _ => Err(ValueError::InvalidHvacMode(s.to_string())),
        }
    }
}

/// What the climate entity is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacAction {
    /// The boiler is heating.
    Heating,
    /// The boiler is on but not heating, or the state is unknown.
    Idle,
    /// The boiler is off.
    Off,
}

impl HvacAction {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Heating => "heating",
            Self::Idle => "idle",
            Self::Off => "off",
        }
    }

    /// Maps a `Heating_Enable` value to an action.
    ///
    /// Zero means off, one means heating and every other value is idle.
    #[must_use]
    pub fn from_heating_enable(value: &AttributeValue) -> Self {
        if value.is_zero() {
            Self::Off
        } else if value.is_one() {
            Self::Heating
        } else {
            Self::Idle
        }
    }
}

impl From<HvacMode> for HvacAction {
    fn from(mode: HvacMode) -> Self {
        match mode {
            HvacMode::Heat => Self::Heating,
            HvacMode::Off => Self::Off,
        }
    }
}

impl fmt::Display for HvacAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation mode of the water heater entity.
///
/// # Examples
///
/// ```
/// use vaillant_plus::types::{AttributeValue, WaterHeaterOperation};
///
/// let op = WaterHeaterOperation::from_tank_loading(&AttributeValue::from(1));
/// assert_eq!(op, Some(WaterHeaterOperation::On));
/// assert_eq!(WaterHeaterOperation::Off.as_flag(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterHeaterOperation {
    /// Tank loading is enabled.
    On,
    /// Tank loading is disabled.
    Off,
}

impl WaterHeaterOperation {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }

    /// Returns the `0`/`1` flag written to `WarmStar_Tank_Loading_Enable`.
    #[must_use]
    pub const fn as_flag(&self) -> u8 {
        match self {
            Self::On => 1,
            Self::Off => 0,
        }
    }

    /// Maps a `WarmStar_Tank_Loading_Enable` value to an operation.
    ///
    /// Text values cannot be interpreted and yield `None`.
    #[must_use]
    pub fn from_tank_loading(value: &AttributeValue) -> Option<Self> {
        value
            .as_flag()
            .map(|_| if value.is_one() { Self::On } else { Self::Off })
    }
}

impl fmt::Display for WaterHeaterOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WaterHeaterOperation {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            _ => Err(ValueError::InvalidOperation(s.to_string())),
        }
    }
}

/// Temperature unit reported by both entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    /// Degrees Celsius.
    #[default]
    #[serde(rename = "°C")]
    Celsius,
}

impl TemperatureUnit {
    /// Returns the unit symbol.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
