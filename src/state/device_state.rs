// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Last-known device state.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::attribute::Snapshot;
use crate::command::ControlCommand;
use crate::error::SourceError;
use crate::types::AttributeValue;

use super::DeviceStateSource;

/// Last-known attributes of a single device.
///
/// Attributes are only ever added or overwritten. The `available` flag
/// mirrors the device connection: while it is cleared, reads through
/// [`DeviceStateSource`] fail with [`SourceError::Unavailable`] even though
/// the stored values are kept.
///
/// # Examples
///
/// ```
/// use vaillant_plus::attribute::Snapshot;
/// use vaillant_plus::state::DeviceAttributes;
///
/// let mut attrs = DeviceAttributes::new();
/// let changed = attrs.apply(&Snapshot::new().with("Heating_Enable", 1));
/// assert!(changed);
///
/// // Applying the same values again changes nothing
/// assert!(!attrs.apply(&Snapshot::new().with("Heating_Enable", 1)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceAttributes {
    values: HashMap<String, AttributeValue>,
    available: bool,
}

impl Default for DeviceAttributes {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
            available: true,
        }
    }
}

impl DeviceAttributes {
    /// Creates an empty, available device state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored value of an attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.values.get(name)
    }

    /// Stores a value, replacing any previous one.
    pub fn set(&mut self, name: impl Into<String>, value: AttributeValue) {
        self.values.insert(name.into(), value);
    }

    /// Returns `true` if the device is reachable.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Marks the device reachable or unreachable.
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Returns the number of known attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no attribute is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Merges a snapshot and returns whether any value actually changed.
    pub fn apply(&mut self, snapshot: &Snapshot) -> bool {
        let mut changed = false;
        for (name, value) in snapshot.iter() {
            if self.values.get(name) != Some(value) {
                self.values.insert(name.to_string(), value.clone());
                changed = true;
            }
        }
        changed
    }
}

/// Shared handle to the last-known state of one device.
///
/// The handle is owned by whoever talks to the device (the cloud client and
/// its dispatcher); entities receive a clone and read through it, and the
/// write-through path stores successful writes into it. Cloning is cheap and
/// every clone sees the same state. Each operation takes the lock once, so a
/// multi-field update is never observed half-applied.
///
/// # Examples
///
/// ```
/// use vaillant_plus::state::{DeviceStateSource, SharedDeviceState};
/// use vaillant_plus::types::AttributeValue;
///
/// let state = SharedDeviceState::new();
/// state.set("DHW_setpoint", AttributeValue::from(50.0));
///
/// let reader = state.clone();
/// assert_eq!(reader.get("DHW_setpoint"), Ok(Some(AttributeValue::from(50.0))));
///
/// state.set_available(false);
/// assert!(reader.get("DHW_setpoint").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedDeviceState {
    inner: Arc<RwLock<DeviceAttributes>>,
}

impl SharedDeviceState {
    /// Creates an empty shared state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a shared state seeded with a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let state = Self::new();
        state.apply(snapshot);
        state
    }

    /// Returns a copy of the current attributes.
    #[must_use]
    pub fn attributes(&self) -> DeviceAttributes {
        self.inner.read().clone()
    }

    /// Merges a snapshot and returns whether anything changed.
    pub fn apply(&self, snapshot: &Snapshot) -> bool {
        self.inner.write().apply(snapshot)
    }

    /// Marks the device reachable or unreachable.
    pub fn set_available(&self, available: bool) {
        self.inner.write().set_available(available);
    }

    /// Returns `true` if the device is reachable.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.inner.read().is_available()
    }
}

impl DeviceStateSource for SharedDeviceState {
    fn get(&self, name: &str) -> Result<Option<AttributeValue>, SourceError> {
        let attrs = self.inner.read();
        if !attrs.is_available() {
            return Err(SourceError::Unavailable);
        }
        Ok(attrs.get(name).cloned())
    }

    fn set(&self, name: &str, value: AttributeValue) {
        self.inner.write().set(name, value);
    }

    fn set_many(&self, command: &ControlCommand) {
        let mut attrs = self.inner.write();
        for (name, value) in command.iter() {
            attrs.set(name, value.clone());
        }
    }

    fn set_snapshot(&self, snapshot: &Snapshot) {
        self.apply(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_empty_and_available() {
        let attrs = DeviceAttributes::new();
        assert!(attrs.is_empty());
        assert!(attrs.is_available());
    }

    #[test]
    fn apply_reports_changes() {
        let mut attrs = DeviceAttributes::new();
        let snapshot = Snapshot::new().with("Flow_Temperature_Setpoint", 45.0);

        assert!(attrs.apply(&snapshot));
        assert!(!attrs.apply(&snapshot));
        assert!(attrs.apply(&Snapshot::new().with("Flow_Temperature_Setpoint", 46.0)));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn missing_attribute_is_none_not_error() {
        let state = SharedDeviceState::new();
        assert_eq!(state.get("Heating_Enable"), Ok(None));
    }

    #[test]
    fn unavailable_state_fails_reads_but_keeps_values() {
        let state = SharedDeviceState::from_snapshot(&Snapshot::new().with("Heating_Enable", 1));
        state.set_available(false);

        assert_eq!(state.get("Heating_Enable"), Err(SourceError::Unavailable));
        assert_eq!(
            state.attributes().get("Heating_Enable"),
            Some(&AttributeValue::from(1))
        );

        state.set_available(true);
        assert_eq!(state.get("Heating_Enable"), Ok(Some(AttributeValue::from(1))));
    }

    #[test]
    fn set_many_writes_every_field() {
        let state = SharedDeviceState::new();
        let cmd = ControlCommand::heating_enable(false).with("Flow_Temperature_Setpoint", 40.0);

        state.set_many(&cmd);

        let attrs = state.attributes();
        assert_eq!(attrs.get("Heating_Enable"), Some(&AttributeValue::from(false)));
        assert_eq!(
            attrs.get("Flow_Temperature_Setpoint"),
            Some(&AttributeValue::from(40.0))
        );
    }

    #[test]
    fn set_snapshot_stores_values_while_unavailable() {
        let state = SharedDeviceState::from_snapshot(&Snapshot::new().with("Heating_Enable", 1));
        state.set_available(false);

        state.set_snapshot(&Snapshot::new().with("Heating_Enable", 0));

        state.set_available(true);
        assert_eq!(state.get("Heating_Enable"), Ok(Some(AttributeValue::from(0))));
    }

    #[test]
    fn clones_share_state() {
        let a = SharedDeviceState::new();
        let b = a.clone();

        a.set("DHW_setpoint", AttributeValue::from(55.0));
        assert_eq!(b.get("DHW_setpoint"), Ok(Some(AttributeValue::from(55.0))));
    }
}
