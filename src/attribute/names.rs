// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Attribute names reported and accepted by Vaillant devices.
//!
//! Names are opaque keys to the cache; they only decide which mapping an
//! entity applies.

/// Central heating enable flag (`0`/`1` or boolean).
pub const HEATING_ENABLE: &str = "Heating_Enable";

/// Central heating flow temperature setpoint in °C.
pub const FLOW_TEMPERATURE_SETPOINT: &str = "Flow_Temperature_Setpoint";

/// Lowest allowed central heating setpoint in °C.
pub const LOWER_CH_SETPOINT: &str = "Lower_Limitation_of_CH_Setpoint";

/// Highest allowed central heating setpoint in °C.
pub const UPPER_CH_SETPOINT: &str = "Upper_Limitation_of_CH_Setpoint";

/// Domestic hot water setpoint in °C.
pub const DHW_SETPOINT: &str = "DHW_setpoint";

/// Hot water tank loading enable flag (`0`/`1`).
pub const TANK_LOADING_ENABLE: &str = "WarmStar_Tank_Loading_Enable";

/// Lowest allowed domestic hot water setpoint in °C.
pub const LOWER_DHW_SETPOINT: &str = "Lower_Limitation_of_DHW_Setpoint";

/// Highest allowed domestic hot water setpoint in °C.
pub const UPPER_DHW_SETPOINT: &str = "Upper_Limitation_of_DHW_Setpoint";

/// Attributes the climate entity keeps in its cache.
pub const CLIMATE_ATTRIBUTES: [&str; 4] = [
    HEATING_ENABLE,
    FLOW_TEMPERATURE_SETPOINT,
    LOWER_CH_SETPOINT,
    UPPER_CH_SETPOINT,
];

/// Attributes the water heater entity keeps in its cache.
pub const WATER_HEATER_ATTRIBUTES: [&str; 4] = [
    TANK_LOADING_ENABLE,
    DHW_SETPOINT,
    LOWER_DHW_SETPOINT,
    UPPER_DHW_SETPOINT,
];
