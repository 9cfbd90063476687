// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vaillant Plus - climate and water heater entities for Vaillant boilers.
//!
//! This library models the two home-automation entities of a cloud-connected
//! Vaillant boiler: a climate entity for central heating and a water heater
//! entity for domestic hot water. Both are built to stay stable while the
//! cloud connection is flaky.
//!
//! # How It Works
//!
//! - **Stale-tolerant reads**: every property is read from the device state
//!   first, then from the last-good cached value, then from a default.
//! - **Sticky derived state**: the HVAC mode and action only change when a
//!   value maps cleanly, so a garbled reading never flips the mode.
//! - **Write-through**: a write reaches the cache only after the remote call
//!   succeeded. Failures are logged and leave local state untouched.
//! - **Push updates**: the cloud client publishes snapshots on an
//!   [`EventBus`](event::EventBus); each entity merges them and notifies its
//!   subscribers once per snapshot.
//!
//! The cloud API client itself is outside this crate. It plugs in through the
//! [`ControlClient`](protocol::ControlClient) trait and a
//! [`DeviceStateSource`](state::DeviceStateSource).
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use vaillant_plus::entity::{VaillantClimate, VaillantWaterHeater};
//! use vaillant_plus::event::EventBus;
//! use vaillant_plus::state::SharedDeviceState;
//! use vaillant_plus::{EntryConfig, setup_platform};
//! # use vaillant_plus::command::ControlCommand;
//! # use vaillant_plus::error::ControlError;
//! # use vaillant_plus::protocol::ControlClient;
//! # struct CloudClient;
//! # impl ControlClient for CloudClient {
//! #     async fn control_device(&self, _: &ControlCommand) -> Result<(), ControlError> { Ok(()) }
//! # }
//!
//! #[tokio::main]
//! async fn main() -> vaillant_plus::Result<()> {
//!     let entry = EntryConfig::from_value(serde_json::json!({"did": "a1b2c3"}))?;
//!     let client = Arc::new(CloudClient);
//!     let state = SharedDeviceState::new();
//!     let bus = EventBus::new();
//!
//!     let _climate = setup_platform::<VaillantClimate<CloudClient, SharedDeviceState>, _, _, _>(
//!         entry.clone(),
//!         Arc::clone(&client),
//!         state.clone(),
//!         &bus,
//!         |climate| println!("climate added: {:?}", climate.state()),
//!     );
//!     let _water_heater = setup_platform::<VaillantWaterHeater<CloudClient, SharedDeviceState>, _, _, _>(
//!         entry,
//!         client,
//!         state,
//!         &bus,
//!         |heater| println!("water heater added: {:?}", heater.state()),
//!     );
//!
//!     // The cloud client now publishes DeviceEvent::Connected and
//!     // DeviceEvent::Updated on the bus.
//!     Ok(())
//! }
//! ```

pub mod attribute;
pub mod command;
mod config;
pub mod entity;
pub mod error;
pub mod event;
mod features;
mod platform;
pub mod protocol;
pub mod state;
pub mod types;

pub use config::{
    ClimateDefaults, DEFAULT_MAX_TEMPERATURE, DEFAULT_MIN_TEMPERATURE, DEFAULT_TARGET_TEMPERATURE,
    EntryConfig,
};
pub use entity::{
    ClimateState, Entity, PlatformEntity, VaillantClimate, VaillantWaterHeater, WaterHeaterState,
};
pub use error::{ConfigError, ControlError, Error, ParseError, Result, SourceError, ValueError};
pub use features::SupportedFeatures;
pub use platform::{PlatformHandle, setup_platform};
pub use types::{AttributeValue, HvacAction, HvacMode, TemperatureUnit, WaterHeaterOperation};
