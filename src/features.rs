// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Features an entity advertises to its consumer.

use serde::Serialize;

/// Operations an entity accepts.
///
/// # Examples
///
/// ```
/// use vaillant_plus::SupportedFeatures;
///
/// let climate = SupportedFeatures::climate();
/// assert!(climate.target_temperature);
/// assert!(climate.turn_off);
/// assert!(!climate.operation_mode);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
// Each flag is an independent feature bit.
#[allow(clippy::struct_excessive_bools)]
pub struct SupportedFeatures {
    /// Accepts a target temperature.
    pub target_temperature: bool,

    /// Can be turned off directly.
    pub turn_off: bool,

    /// Accepts an operation mode.
    pub operation_mode: bool,

    /// Accepts a preset mode.
    pub preset_mode: bool,
}

impl SupportedFeatures {
    /// Features of the climate entity.
    #[must_use]
    pub const fn climate() -> Self {
        Self {
            target_temperature: true,
            turn_off: true,
            operation_mode: false,
            preset_mode: false,
        }
    }

    /// Features of the water heater entity.
    #[must_use]
    pub const fn water_heater() -> Self {
        Self {
            target_temperature: true,
            turn_off: false,
            operation_mode: true,
            preset_mode: false,
        }
    }
}
