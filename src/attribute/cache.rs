// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stale-tolerant attribute cache.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::command::ControlCommand;
use crate::error::{ControlError, SourceError};
use crate::protocol::ControlClient;
use crate::state::DeviceStateSource;
use crate::types::AttributeValue;

use super::Snapshot;

/// Last-good values of the attributes an entity displays.
///
/// Reads consult the device state source first and fall back to the cached
/// value, then to a caller-supplied default, so a transient read failure
/// never blanks a displayed value. Writes reach the cache only after the
/// remote control call succeeded.
///
/// Keys are never removed, only overwritten. All methods take `&self`; the
/// lock is held only for the duration of a single synchronous operation and
/// never across an `.await`.
///
/// # Examples
///
/// ```
/// use vaillant_plus::attribute::AttributeCache;
/// use vaillant_plus::state::{DeviceStateSource, SharedDeviceState};
/// use vaillant_plus::types::AttributeValue;
///
/// let source = SharedDeviceState::new();
/// let cache = AttributeCache::new();
///
/// // Nothing known yet: the default is returned and nothing is cached
/// assert_eq!(cache.read_f64(&source, "Flow_Temperature_Setpoint", 35.0), 35.0);
/// assert!(cache.is_empty());
///
/// // A fresh value is cached...
/// source.set("Flow_Temperature_Setpoint", AttributeValue::from(42.5));
/// assert_eq!(cache.read_f64(&source, "Flow_Temperature_Setpoint", 35.0), 42.5);
///
/// // ...and survives the source going away
/// source.set_available(false);
/// assert_eq!(cache.read_f64(&source, "Flow_Temperature_Setpoint", 35.0), 42.5);
/// ```
#[derive(Debug, Default)]
pub struct AttributeCache {
    values: RwLock<HashMap<String, AttributeValue>>,
}

impl AttributeCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value without consulting any source.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<AttributeValue> {
        self.values.read().get(name).cloned()
    }

    /// Returns `true` if a value has ever been cached for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.read().contains_key(name)
    }

    /// Returns the number of cached attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Returns `true` if nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    /// Stores a value, overwriting any previous one.
    pub fn insert(&self, name: impl Into<String>, value: AttributeValue) {
        self.values.write().insert(name.into(), value);
    }

    /// Reads an attribute: fresh value, else cached value, else `default`.
    ///
    /// A fresh value is cached before it is returned. Source failures and
    /// missing attributes are treated alike and never propagate.
    pub fn read<S>(&self, source: &S, name: &str, default: AttributeValue) -> AttributeValue
    where
        S: DeviceStateSource + ?Sized,
    {
        self.read_optional(source, name).unwrap_or(default)
    }

    /// Reads an attribute: fresh value, else cached value, else `None`.
    pub fn read_optional<S>(&self, source: &S, name: &str) -> Option<AttributeValue>
    where
        S: DeviceStateSource + ?Sized,
    {
        self.read_as(source, name, "any value", |v| Some(v.clone()))
    }

    /// Reads a numeric attribute, falling back to `default`.
    ///
    /// A fresh value that is not a number counts as unreadable: it is not
    /// cached and the cached number (or `default`) is returned instead.
    pub fn read_f64<S>(&self, source: &S, name: &str, default: f64) -> f64
    where
        S: DeviceStateSource + ?Sized,
    {
        self.read_optional_f64(source, name).unwrap_or(default)
    }

    /// Reads a numeric attribute with no default.
    pub fn read_optional_f64<S>(&self, source: &S, name: &str) -> Option<f64>
    where
        S: DeviceStateSource + ?Sized,
    {
        self.read_as(source, name, "number", AttributeValue::as_f64)
    }

    /// Reads an on/off attribute, falling back to `default`.
    ///
    /// A fresh text value is not cached, so one garbled reading cannot
    /// displace a good cached flag. A cached text value came from a pushed
    /// snapshot and is returned as is for the caller's mapping to judge.
    pub fn read_flag<S>(&self, source: &S, name: &str, default: AttributeValue) -> AttributeValue
    where
        S: DeviceStateSource + ?Sized,
    {
        self.read_as(source, name, "flag", |v| v.as_flag().map(|_| v.clone()))
            .or_else(|| self.get(name))
            .unwrap_or(default)
    }

    /// Shared fallback path for every read.
    fn read_as<S, T>(
        &self,
        source: &S,
        name: &str,
        expected: &'static str,
        parse: impl Fn(&AttributeValue) -> Option<T>,
    ) -> Option<T>
    where
        S: DeviceStateSource + ?Sized,
    {
        match source.get(name) {
            Ok(Some(value)) => {
                if let Some(parsed) = parse(&value) {
                    self.insert(name, value);
                    return Some(parsed);
                }
                let error = SourceError::UnexpectedType {
                    attribute: name.to_string(),
                    expected,
                };
                tracing::debug!(kind = value.kind(), error = %error, "Ignoring device attribute");
            }
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(attribute = %name, error = %e, "Failed to get device attribute");
            }
        }

        self.values.read().get(name).and_then(parse)
    }

    /// Stores every field of a command in one step.
    pub fn store(&self, command: &ControlCommand) {
        let mut values = self.values.write();
        for (name, value) in command.iter() {
            values.insert(name.to_string(), value.clone());
        }
    }

    /// Merges the tracked keys of a snapshot, last writer wins.
    ///
    /// Returns `true` if at least one tracked key was present.
    pub fn apply_snapshot(&self, snapshot: &Snapshot, tracked: &[&str]) -> bool {
        let mut values = self.values.write();
        let mut applied = false;
        for name in tracked {
            if let Some(value) = snapshot.get(name) {
                values.insert((*name).to_string(), value.clone());
                applied = true;
            }
        }
        applied
    }

    /// Writes a command to the device, then to the cache and the source.
    ///
    /// Only the remote call suspends. Once it succeeds every field of the
    /// command is stored in the cache and in `source`, so a read that
    /// happens after this returns sees the written values. On failure
    /// neither the cache nor the source is touched.
    ///
    /// # Errors
    ///
    /// Returns the [`ControlError`] reported by the client.
    pub async fn write_through<C, S>(
        &self,
        client: &C,
        source: &S,
        command: &ControlCommand,
    ) -> Result<(), ControlError>
    where
        C: ControlClient + ?Sized,
        S: DeviceStateSource + ?Sized,
    {
        client.control_device(command).await?;
        self.store(command);
        source.set_many(command);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SharedDeviceState;
    use parking_lot::Mutex;

    const SETPOINT: &str = "Flow_Temperature_Setpoint";

    #[derive(Default)]
    struct RecordingClient {
        fail: bool,
        sent: Mutex<Vec<ControlCommand>>,
    }

    impl ControlClient for RecordingClient {
        async fn control_device(&self, command: &ControlCommand) -> Result<(), ControlError> {
            if self.fail {
                return Err(ControlError::Transport("connection reset".to_string()));
            }
            self.sent.lock().push(command.clone());
            Ok(())
        }
    }

    fn offline() -> SharedDeviceState {
        let source = SharedDeviceState::new();
        source.set_available(false);
        source
    }

    #[test]
    fn fresh_value_wins_and_is_cached() {
        let source = SharedDeviceState::new();
        let cache = AttributeCache::new();
        cache.insert(SETPOINT, AttributeValue::from(40.0));
        source.set(SETPOINT, AttributeValue::from(45.0));

        assert_eq!(cache.read_f64(&source, SETPOINT, 35.0), 45.0);
        assert_eq!(cache.get(SETPOINT), Some(AttributeValue::from(45.0)));
    }

    #[test]
    fn cached_value_used_when_source_fails() {
        let source = offline();
        let cache = AttributeCache::new();
        cache.insert(SETPOINT, AttributeValue::from(40.0));

        assert_eq!(cache.read_f64(&source, SETPOINT, 35.0), 40.0);
        assert_eq!(cache.get(SETPOINT), Some(AttributeValue::from(40.0)));
    }

    #[test]
    fn cached_value_used_when_attribute_absent() {
        let source = SharedDeviceState::new();
        let cache = AttributeCache::new();
        cache.insert(SETPOINT, AttributeValue::from(40.0));

        assert_eq!(cache.read_f64(&source, SETPOINT, 35.0), 40.0);
    }

    #[test]
    fn default_used_and_nothing_cached_when_both_absent() {
        let source = offline();
        let cache = AttributeCache::new();

        assert_eq!(cache.read_f64(&source, SETPOINT, 35.0), 35.0);
        assert!(!cache.contains(SETPOINT));
        assert_eq!(cache.read_optional(&source, SETPOINT), None);
    }

    #[test]
    fn zero_is_a_real_value() {
        let source = SharedDeviceState::new();
        let cache = AttributeCache::new();
        source.set("Heating_Enable", AttributeValue::from(0));

        let value = cache.read(&source, "Heating_Enable", AttributeValue::from(true));
        assert!(value.is_zero());
    }

    #[test]
    fn wrongly_typed_fresh_value_falls_back_to_cached_number() {
        let source = SharedDeviceState::new();
        let cache = AttributeCache::new();
        cache.insert(SETPOINT, AttributeValue::from(40.0));
        source.set(SETPOINT, AttributeValue::from("n/a"));

        assert_eq!(cache.read_f64(&source, SETPOINT, 35.0), 40.0);
        assert_eq!(cache.get(SETPOINT), Some(AttributeValue::from(40.0)));
    }

    #[test]
    fn flag_read_keeps_cached_flag_over_fresh_text() {
        let source = SharedDeviceState::new();
        let cache = AttributeCache::new();
        let read = || cache.read_flag(&source, "Heating_Enable", AttributeValue::from(false));

        source.set("Heating_Enable", AttributeValue::from(1));
        assert!(read().is_one());

        source.set("Heating_Enable", AttributeValue::from("E-42"));
        assert!(read().is_one());
        assert_eq!(cache.get("Heating_Enable"), Some(AttributeValue::from(1)));

        source.set_available(false);
        assert!(read().is_one());
    }

    #[test]
    fn flag_read_returns_pushed_text_unchanged() {
        let source = offline();
        let cache = AttributeCache::new();
        cache.apply_snapshot(
            &Snapshot::new().with("Heating_Enable", "E-42"),
            &["Heating_Enable"],
        );

        assert_eq!(
            cache.read_flag(&source, "Heating_Enable", AttributeValue::from(false)),
            AttributeValue::from("E-42")
        );
    }

    #[test]
    fn snapshot_applies_only_tracked_keys() {
        let cache = AttributeCache::new();
        let snapshot = Snapshot::new().with(SETPOINT, 45.0).with("Other", 1);

        assert!(cache.apply_snapshot(&snapshot, &[SETPOINT]));
        assert_eq!(cache.len(), 1);
        assert!(!cache.apply_snapshot(&Snapshot::new().with("Other", 2), &[SETPOINT]));
    }

    #[test]
    fn snapshot_is_idempotent() {
        let cache = AttributeCache::new();
        let snapshot = Snapshot::new().with(SETPOINT, 45.0);

        cache.apply_snapshot(&snapshot, &[SETPOINT]);
        let once = cache.get(SETPOINT);
        cache.apply_snapshot(&snapshot, &[SETPOINT]);

        assert_eq!(cache.get(SETPOINT), once);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn stale_tolerant_scenario() {
        let source = offline();
        let cache = AttributeCache::new();

        assert_eq!(cache.read_f64(&source, SETPOINT, 35.0), 35.0);

        cache.apply_snapshot(&Snapshot::new().with(SETPOINT, 42.5), &[SETPOINT]);
        assert_eq!(cache.read_f64(&source, SETPOINT, 35.0), 42.5);

        // Still unreachable: the pushed value sticks
        assert_eq!(cache.read_f64(&source, SETPOINT, 35.0), 42.5);
    }

    #[tokio::test]
    async fn write_through_updates_cache_and_source() {
        let client = RecordingClient::default();
        let source = SharedDeviceState::new();
        let cache = AttributeCache::new();
        source.set(SETPOINT, AttributeValue::from(40.0));

        let cmd = ControlCommand::flow_temperature_setpoint(50.0);
        cache.write_through(&client, &source, &cmd).await.unwrap();

        assert_eq!(client.sent.lock().len(), 1);
        assert_eq!(cache.get(SETPOINT), Some(AttributeValue::from(50.0)));
        assert_eq!(source.get(SETPOINT), Ok(Some(AttributeValue::from(50.0))));
        assert_eq!(cache.read_f64(&source, SETPOINT, 35.0), 50.0);
    }

    #[tokio::test]
    async fn failed_write_changes_nothing() {
        let client = RecordingClient {
            fail: true,
            ..Default::default()
        };
        let source = SharedDeviceState::new();
        let cache = AttributeCache::new();
        source.set(SETPOINT, AttributeValue::from(40.0));
        cache.insert(SETPOINT, AttributeValue::from(40.0));

        let cmd = ControlCommand::flow_temperature_setpoint(50.0);
        let result = cache.write_through(&client, &source, &cmd).await;

        assert!(matches!(result, Err(ControlError::Transport(_))));
        assert_eq!(cache.get(SETPOINT), Some(AttributeValue::from(40.0)));
        assert_eq!(source.get(SETPOINT), Ok(Some(AttributeValue::from(40.0))));
    }

    #[tokio::test]
    async fn composite_write_applies_every_field() {
        let client = RecordingClient::default();
        let source = SharedDeviceState::new();
        let cache = AttributeCache::new();

        let cmd = ControlCommand::heating_enable(false).with(SETPOINT, 30.0);
        cache.write_through(&client, &source, &cmd).await.unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(source.attributes().len(), 2);
    }
}
