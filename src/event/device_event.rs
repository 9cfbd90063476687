// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device event types.

use crate::attribute::Snapshot;

use super::DeviceId;

/// Events published by the cloud client.
///
/// # Examples
///
/// ```
/// use vaillant_plus::attribute::Snapshot;
/// use vaillant_plus::event::{DeviceEvent, DeviceId};
///
/// let device_id = DeviceId::new("d1");
/// let attributes = Snapshot::new().with("Heating_Enable", 1);
///
/// let connected = DeviceEvent::connected(device_id.clone(), attributes.clone());
/// assert!(connected.is_connected());
///
/// let updated = DeviceEvent::updated(device_id, attributes);
/// assert_eq!(updated.attributes().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// A device connected and reported its full attribute set.
    Connected {
        /// The ID of the device.
        device_id: DeviceId,
        /// Every attribute the device reported on connect.
        attributes: Snapshot,
    },

    /// A device pushed new attribute values.
    Updated {
        /// The ID of the device.
        device_id: DeviceId,
        /// The pushed values; may be partial.
        attributes: Snapshot,
    },
}

impl DeviceEvent {
    /// Creates a connected event.
    #[must_use]
    pub fn connected(device_id: DeviceId, attributes: Snapshot) -> Self {
        Self::Connected {
            device_id,
            attributes,
        }
    }

    /// Creates an updated event.
    #[must_use]
    pub fn updated(device_id: DeviceId, attributes: Snapshot) -> Self {
        Self::Updated {
            device_id,
            attributes,
        }
    }

    /// Returns the device ID associated with this event.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        match self {
            Self::Connected { device_id, .. } | Self::Updated { device_id, .. } => device_id,
        }
    }

    /// Returns the attributes carried by this event.
    #[must_use]
    pub fn attributes(&self) -> &Snapshot {
        match self {
            Self::Connected { attributes, .. } | Self::Updated { attributes, .. } => attributes,
        }
    }

    /// Returns `true` if this is a connect event.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    /// Returns `true` if this is an update event.
    #[must_use]
    pub fn is_update(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}
