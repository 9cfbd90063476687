// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Update dispatcher.
//!
//! The cloud client publishes a [`DeviceEvent`] on the [`EventBus`] whenever a
//! device connects or pushes new attribute values. Platform listeners
//! subscribe to the bus, create entities on connect and forward updates to
//! them.
//!
//! # Examples
//!
//! ```
//! use vaillant_plus::attribute::Snapshot;
//! use vaillant_plus::event::{DeviceEvent, DeviceId, EventBus};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! let device_id = DeviceId::new("d1");
//! bus.publish(DeviceEvent::updated(
//!     device_id,
//!     Snapshot::new().with("DHW_setpoint", 50.0),
//! ));
//! ```

mod device_event;
mod device_id;
mod event_bus;

pub use device_event::DeviceEvent;
pub use device_id::DeviceId;
pub use event_bus::EventBus;
