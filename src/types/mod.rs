// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for Vaillant device attributes and entity states.

mod mode;
mod value;

pub use mode::{HvacAction, HvacMode, TemperatureUnit, WaterHeaterOperation};
pub use value::AttributeValue;
