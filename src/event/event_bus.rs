// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast channel between the cloud client and the platform listeners.

use tokio::sync::broadcast;

use super::DeviceEvent;

/// Events buffered per listener before the slowest one starts lagging.
const CAPACITY: usize = 256;

/// Fans device events out to every platform listener.
///
/// One bus serves every device of an account. Each platform of each config
/// entry subscribes once and keeps only the events of its own device, so
/// the climate and water heater platforms of one boiler both see each push.
///
/// A listener that falls more than 256 events behind loses the oldest ones
/// and is told so by [`broadcast::error::RecvError::Lagged`].
///
/// # Examples
///
/// ```
/// use vaillant_plus::attribute::Snapshot;
/// use vaillant_plus::event::{DeviceEvent, DeviceId, EventBus};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let bus = EventBus::new();
/// let mut climate = bus.subscribe();
/// let mut water_heater = bus.subscribe();
///
/// bus.publish(DeviceEvent::updated(
///     DeviceId::new("boiler"),
///     Snapshot::new().with("Heating_Enable", 1),
/// ));
///
/// assert_eq!(climate.recv().await.unwrap().device_id().as_str(), "boiler");
/// assert!(water_heater.recv().await.unwrap().is_update());
/// # }
/// ```
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<DeviceEvent>,
}

impl EventBus {
    /// Creates a bus with no listeners.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CAPACITY);
        Self { sender }
    }

    /// Registers a listener. It sees only events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of live listeners.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Sends an event to every listener.
    ///
    /// With no listener the event is dropped; a device may push before any
    /// platform is set up.
    pub fn publish(&self, event: DeviceEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("No platform listening, device event dropped");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
