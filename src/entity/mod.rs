// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Home-automation entities of a Vaillant device.
//!
//! Both entities follow the same pattern: properties are read through an
//! [`AttributeCache`](crate::attribute::AttributeCache) so they stay stable
//! while the cloud is unreachable, writes go through the cache's
//! write-through path, and every state change is rendered into a
//! serializable state struct published on a `watch` channel.

mod climate;
mod water_heater;

pub use climate::{ClimateState, VaillantClimate};
pub use water_heater::{VaillantWaterHeater, WaterHeaterState};

use std::sync::Arc;

use crate::attribute::Snapshot;
use crate::config::EntryConfig;
use crate::event::DeviceId;
use crate::features::SupportedFeatures;

/// Precision of every temperature reported by the device, in °C.
pub const TEMPERATURE_STEP: f64 = 0.5;

/// Behavior shared by all entities.
pub trait Entity {
    /// The device this entity belongs to.
    fn device_id(&self) -> &DeviceId;

    /// Stable identifier of the entity across restarts.
    fn unique_id(&self) -> String;

    /// Display name. `None` lets the consumer use the device name.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Entities are pushed updates and never polled.
    fn should_poll(&self) -> bool {
        false
    }

    /// Operations the entity accepts.
    fn supported_features(&self) -> SupportedFeatures;

    /// Merges pushed attribute values and notifies subscribers once.
    fn update_from_latest_data(&self, snapshot: &Snapshot);
}

/// An entity that a platform creates when its device connects.
pub trait PlatformEntity<C, S>: Entity + Sized {
    /// Platform name, used as the unique id suffix and in logs.
    const KIND: &'static str;

    /// Attribute the device must report for the entity to exist.
    const REQUIRED_ATTRIBUTE: &'static str;

    /// Creates the entity for the device of `entry`.
    fn create(entry: &EntryConfig, client: Arc<C>, source: S) -> Self;
}
