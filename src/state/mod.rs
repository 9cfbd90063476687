// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state source.
//!
//! Entities never own the device state: they obtain a handle implementing
//! [`DeviceStateSource`] and read best-effort current values through it.
//! [`SharedDeviceState`] is the in-process implementation shared between the
//! cloud client, the dispatcher and the entities of one device.
//!
//! # Examples
//!
//! ```
//! use vaillant_plus::attribute::Snapshot;
//! use vaillant_plus::state::{DeviceStateSource, SharedDeviceState};
//!
//! let state = SharedDeviceState::from_snapshot(
//!     &Snapshot::new().with("Heating_Enable", 1),
//! );
//!
//! let value = state.get("Heating_Enable").unwrap();
//! assert!(value.is_some_and(|v| v.is_one()));
//! ```

mod device_state;

pub use device_state::{DeviceAttributes, SharedDeviceState};

use crate::attribute::Snapshot;
use crate::command::ControlCommand;
use crate::error::SourceError;
use crate::types::AttributeValue;

/// Read/write access to the last-known state of a device.
pub trait DeviceStateSource {
    /// Fetches the current value of an attribute.
    ///
    /// Returns `Ok(None)` if the attribute was never reported.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the state cannot be read right now.
    fn get(&self, name: &str) -> Result<Option<AttributeValue>, SourceError>;

    /// Stores a value for an attribute.
    fn set(&self, name: &str, value: AttributeValue);

    /// Stores every field of a command.
    ///
    /// Implementations backed by a lock should override this to apply all
    /// fields under a single acquisition.
    fn set_many(&self, command: &ControlCommand) {
        for (name, value) in command.iter() {
            self.set(name, value.clone());
        }
    }

    /// Stores every value of a snapshot pushed by the device.
    fn set_snapshot(&self, snapshot: &Snapshot) {
        for (name, value) in snapshot.iter() {
            self.set(name, value.clone());
        }
    }
}
