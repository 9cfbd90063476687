// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Platform setup for a config entry.
//!
//! A platform listens on the [`EventBus`] for its device. When the device
//! connects and reports the attribute the platform needs, the entity is
//! created once and handed to the consumer. Every later update for the
//! device is forwarded to that entity.
//!
//! Each event for the device is stored in the shared device state before
//! the entity sees it, so reads through the state never lag a push.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use vaillant_plus::attribute::Snapshot;
//! use vaillant_plus::command::ControlCommand;
//! use vaillant_plus::entity::VaillantWaterHeater;
//! use vaillant_plus::error::ControlError;
//! use vaillant_plus::event::{DeviceEvent, DeviceId, EventBus};
//! use vaillant_plus::protocol::ControlClient;
//! use vaillant_plus::state::SharedDeviceState;
//! use vaillant_plus::{EntryConfig, setup_platform};
//!
//! struct Accept;
//!
//! impl ControlClient for Accept {
//!     async fn control_device(&self, _: &ControlCommand) -> Result<(), ControlError> {
//!         Ok(())
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let bus = EventBus::new();
//! let (tx, mut added) = tokio::sync::mpsc::unbounded_channel();
//!
//! let handle = setup_platform::<VaillantWaterHeater<Accept, SharedDeviceState>, _, _, _>(
//!     EntryConfig::new("d1"),
//!     Arc::new(Accept),
//!     SharedDeviceState::new(),
//!     &bus,
//!     move |entity| {
//!         let _ = tx.send(entity);
//!     },
//! );
//!
//! bus.publish(DeviceEvent::connected(
//!     DeviceId::new("d1"),
//!     Snapshot::new().with("DHW_setpoint", 50.0),
//! ));
//!
//! let heater = added.recv().await.unwrap();
//! assert_eq!(heater.target_temperature(), Some(50.0));
//!
//! handle.unsubscribe();
//! # }
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::attribute::Snapshot;
use crate::config::EntryConfig;
use crate::entity::PlatformEntity;
use crate::event::{DeviceEvent, EventBus};
use crate::state::DeviceStateSource;

/// Handle to a running platform listener.
///
/// Dropping the handle stops the listener, as does [`unsubscribe`].
///
/// [`unsubscribe`]: PlatformHandle::unsubscribe
#[derive(Debug)]
pub struct PlatformHandle<E> {
    entity: Arc<Mutex<Option<Arc<E>>>>,
    task: JoinHandle<()>,
}

impl<E> PlatformHandle<E> {
    /// Returns the entity, once the device has connected.
    #[must_use]
    pub fn entity(&self) -> Option<Arc<E>> {
        self.entity.lock().clone()
    }

    /// Returns `true` if the listener has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops listening for device events.
    pub fn unsubscribe(self) {
        self.task.abort();
    }
}

impl<E> Drop for PlatformHandle<E> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Starts the listener of one platform for the device of `entry`.
///
/// The bus is subscribed before this returns, so no event published
/// afterwards is missed. Must be called from within a tokio runtime.
pub fn setup_platform<E, C, S, F>(
    entry: EntryConfig,
    client: Arc<C>,
    source: S,
    bus: &EventBus,
    mut add_entities: F,
) -> PlatformHandle<E>
where
    E: PlatformEntity<C, S> + Send + Sync + 'static,
    C: Send + Sync + 'static,
    S: DeviceStateSource + Clone + Send + 'static,
    F: FnMut(Arc<E>) + Send + 'static,
{
    let mut rx = bus.subscribe();
    let entity: Arc<Mutex<Option<Arc<E>>>> = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&entity);

    let task = tokio::spawn(async move {
        tracing::debug!(device_id = %entry.device_id, platform = E::KIND, "Platform listener started");

        loop {
            match rx.recv().await {
                Ok(event) if event.device_id() == &entry.device_id => {
                    source.set_snapshot(event.attributes());

                    match event {
                        DeviceEvent::Connected { attributes, .. } => {
                            let created =
                                on_connected(&entry, &client, &source, &slot, &attributes);
                            if let Some(created) = created {
                                add_entities(created);
                            }
                        }
                        DeviceEvent::Updated { attributes, .. } => {
                            let current = slot.lock().clone();
                            if let Some(current) = current {
                                current.update_from_latest_data(&attributes);
                            }
                        }
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        device_id = %entry.device_id,
                        platform = E::KIND,
                        skipped,
                        "Platform listener lagged behind device events"
                    );
                }
                Err(RecvError::Closed) => break,
            }
        }

        tracing::debug!(device_id = %entry.device_id, platform = E::KIND, "Platform listener stopped");
    });

    PlatformHandle { entity, task }
}

/// Creates the entity on first connect. Returns it if it was just created.
fn on_connected<E, C, S>(
    entry: &EntryConfig,
    client: &Arc<C>,
    source: &S,
    slot: &Mutex<Option<Arc<E>>>,
    attributes: &Snapshot,
) -> Option<Arc<E>>
where
    E: PlatformEntity<C, S>,
    S: Clone,
{
    let mut slot = slot.lock();
    if slot.is_some() {
        tracing::debug!(device_id = %entry.device_id, platform = E::KIND, "Entity already added");
        return None;
    }

    if !attributes.contains(E::REQUIRED_ATTRIBUTE) {
        tracing::warn!(
            device_id = %entry.device_id,
            platform = E::KIND,
            attribute = E::REQUIRED_ATTRIBUTE,
            "Device does not report required attribute, skipping entity"
        );
        return None;
    }

    let entity = Arc::new(E::create(entry, Arc::clone(client), source.clone()));
    entity.update_from_latest_data(attributes);
    *slot = Some(Arc::clone(&entity));
    Some(entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ControlCommand;
    use crate::entity::{Entity, VaillantClimate};
    use crate::error::ControlError;
    use crate::event::DeviceId;
    use crate::protocol::ControlClient;
    use crate::state::SharedDeviceState;
    use crate::types::{AttributeValue, HvacMode};
    use tokio::sync::mpsc;

    struct Accept;

    impl ControlClient for Accept {
        async fn control_device(&self, _: &ControlCommand) -> Result<(), ControlError> {
            Ok(())
        }
    }

    type Climate = VaillantClimate<Accept, SharedDeviceState>;

    fn start(
        bus: &EventBus,
    ) -> (
        PlatformHandle<Climate>,
        mpsc::UnboundedReceiver<Arc<Climate>>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = setup_platform::<Climate, _, _, _>(
            EntryConfig::new("d1"),
            Arc::new(Accept),
            SharedDeviceState::new(),
            bus,
            move |entity| {
                let _ = tx.send(entity);
            },
        );
        (handle, rx)
    }

    fn heating(value: i32) -> Snapshot {
        Snapshot::new().with("Heating_Enable", value)
    }

    #[tokio::test]
    async fn creates_entity_on_connect() {
        let bus = EventBus::new();
        let (handle, mut added) = start(&bus);

        bus.publish(DeviceEvent::connected(DeviceId::new("d1"), heating(1)));

        let climate = added.recv().await.unwrap();
        assert_eq!(climate.unique_id(), "d1_climate");
        assert_eq!(climate.hvac_mode(), HvacMode::Heat);
        assert!(handle.entity().is_some());
    }

    #[tokio::test]
    async fn skips_device_without_required_attribute() {
        let bus = EventBus::new();
        let (handle, mut added) = start(&bus);

        bus.publish(DeviceEvent::connected(
            DeviceId::new("d1"),
            Snapshot::new().with("DHW_setpoint", 50.0),
        ));
        bus.publish(DeviceEvent::connected(DeviceId::new("d1"), heating(0)));

        // Only the second connect creates an entity
        let climate = added.recv().await.unwrap();
        assert_eq!(climate.hvac_mode(), HvacMode::Off);
        drop(handle);
    }

    #[tokio::test]
    async fn adds_entity_once_and_forwards_updates() {
        let bus = EventBus::new();
        let (handle, mut added) = start(&bus);

        bus.publish(DeviceEvent::connected(DeviceId::new("d1"), heating(0)));
        let climate = added.recv().await.unwrap();
        let mut rx = climate.subscribe();

        bus.publish(DeviceEvent::connected(DeviceId::new("d1"), heating(0)));
        bus.publish(DeviceEvent::updated(DeviceId::new("other"), heating(1)));
        bus.publish(DeviceEvent::updated(DeviceId::new("d1"), heating(1)));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().hvac_mode, HvacMode::Heat);
        assert!(added.try_recv().is_err());
        drop(handle);
    }

    #[tokio::test]
    async fn update_before_connect_is_ignored() {
        let bus = EventBus::new();
        let (handle, mut added) = start(&bus);

        bus.publish(DeviceEvent::updated(DeviceId::new("d1"), heating(1)));
        bus.publish(DeviceEvent::connected(DeviceId::new("d1"), heating(0)));

        let climate = added.recv().await.unwrap();
        assert_eq!(climate.hvac_mode(), HvacMode::Off);
        drop(handle);
    }

    #[tokio::test]
    async fn pushed_values_reach_device_state() {
        let bus = EventBus::new();
        let state = SharedDeviceState::new();
        let (tx, mut added) = mpsc::unbounded_channel();
        let _handle = setup_platform::<Climate, _, _, _>(
            EntryConfig::new("d1"),
            Arc::new(Accept),
            state.clone(),
            &bus,
            move |entity| {
                let _ = tx.send(entity);
            },
        );

        bus.publish(DeviceEvent::connected(DeviceId::new("d1"), heating(1)));
        let climate = added.recv().await.unwrap();
        assert_eq!(state.get("Heating_Enable"), Ok(Some(AttributeValue::from(1))));

        let mut rx = climate.subscribe();
        bus.publish(DeviceEvent::updated(DeviceId::new("other"), heating(1)));
        bus.publish(DeviceEvent::updated(DeviceId::new("d1"), heating(0)));
        rx.changed().await.unwrap();

        // The source is reachable and agrees with the push
        assert_eq!(state.get("Heating_Enable"), Ok(Some(AttributeValue::from(0))));
        assert_eq!(climate.hvac_mode(), HvacMode::Off);
    }

    #[tokio::test]
    async fn closed_bus_stops_listener() {
        let bus = EventBus::new();
        let (handle, _added) = start(&bus);

        drop(bus);
        tokio::time::timeout(std::time::Duration::from_secs(1), async {
            while !handle.is_finished() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn unsubscribe_stops_listener() {
        let bus = EventBus::new();
        let (handle, _added) = start(&bus);
        assert_eq!(bus.subscriber_count(), 1);

        handle.unsubscribe();
        tokio::time::timeout(std::time::Duration::from_secs(1), async {
            while bus.subscriber_count() > 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
    }
}
