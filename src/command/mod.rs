// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Control commands sent to Vaillant devices.
//!
//! A [`ControlCommand`] is a set of attribute writes that travel to the
//! device in a single round trip. Entities hand commands to a
//! [`ControlClient`](crate::protocol::ControlClient) and, once the client
//! reports success, apply every field of the command to their local state.
//!
//! # Available Commands
//!
//! | Constructor | Attribute | Payload |
//! |-------------|-----------|---------|
//! | [`ControlCommand::heating_enable`] | `Heating_Enable` | `true` / `false` |
//! | [`ControlCommand::flow_temperature_setpoint`] | `Flow_Temperature_Setpoint` | °C |
//! | [`ControlCommand::dhw_setpoint`] | `DHW_setpoint` | °C |
//! | [`ControlCommand::tank_loading`] | `WarmStar_Tank_Loading_Enable` | `1` / `0` |
//!
//! # Examples
//!
//! ```
//! use vaillant_plus::command::ControlCommand;
//!
//! let cmd = ControlCommand::heating_enable(false);
//! assert_eq!(cmd.payload().to_string(), r#"{"Heating_Enable":false}"#);
//!
//! let composite = ControlCommand::new()
//!     .with("Heating_Enable", true)
//!     .with("Flow_Temperature_Setpoint", 45.0);
//! assert_eq!(composite.len(), 2);
//! ```

use std::collections::BTreeMap;

use crate::attribute::names;
use crate::types::{AttributeValue, WaterHeaterOperation};

/// A set of attribute writes delivered to the device in one call.
///
/// Fields are kept in name order so payloads are deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlCommand {
    fields: BTreeMap<String, AttributeValue>,
}

impl ControlCommand {
    /// Creates an empty command.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a command that writes a single attribute.
    #[must_use]
    pub fn single(name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self::new().with(name, value)
    }

    /// Adds a field to the command.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Enables or disables central heating.
    #[must_use]
    pub fn heating_enable(enabled: bool) -> Self {
        Self::single(names::HEATING_ENABLE, enabled)
    }

    /// Sets the central heating flow temperature.
    #[must_use]
    pub fn flow_temperature_setpoint(celsius: f64) -> Self {
        Self::single(names::FLOW_TEMPERATURE_SETPOINT, celsius)
    }

    /// Sets the domestic hot water temperature.
    #[must_use]
    pub fn dhw_setpoint(celsius: f64) -> Self {
        Self::single(names::DHW_SETPOINT, celsius)
    }

    /// Enables or disables hot water tank loading.
    #[must_use]
    pub fn tank_loading(operation: WaterHeaterOperation) -> Self {
        Self::single(names::TANK_LOADING_ENABLE, operation.as_flag())
    }

    /// Returns the value written to `name`, if part of this command.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.fields.get(name)
    }

    /// Iterates over the fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the command writes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the JSON object a client sends to the device.
    ///
    /// Non-finite numbers have no JSON representation and are sent as `null`.
    #[must_use]
    pub fn payload(&self) -> serde_json::Value {
        let map = self
            .fields
            .iter()
            .map(|(name, value)| {
                let json = match value {
                    AttributeValue::Bool(b) => serde_json::Value::Bool(*b),
                    AttributeValue::Number(n) => serde_json::Number::from_f64(*n)
                        .map_or(serde_json::Value::Null, serde_json::Value::Number),
                    AttributeValue::Text(s) => serde_json::Value::String(s.clone()),
                };
                (name.clone(), json)
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heating_enable_sends_boolean() {
        let cmd = ControlCommand::heating_enable(true);
        assert_eq!(
            cmd.get(names::HEATING_ENABLE),
            Some(&AttributeValue::Bool(true))
        );
        assert_eq!(cmd.payload(), serde_json::json!({"Heating_Enable": true}));
    }

    #[test]
    fn tank_loading_sends_flag() {
        let cmd = ControlCommand::tank_loading(WaterHeaterOperation::On);
        assert_eq!(
            cmd.payload(),
            serde_json::json!({"WarmStar_Tank_Loading_Enable": 1.0})
        );
    }

    #[test]
    fn setpoint_payload() {
        let cmd = ControlCommand::flow_temperature_setpoint(45.5);
        assert_eq!(
            cmd.payload(),
            serde_json::json!({"Flow_Temperature_Setpoint": 45.5})
        );
    }

    #[test]
    fn composite_keeps_every_field() {
        let cmd = ControlCommand::heating_enable(false).with(names::DHW_SETPOINT, 50.0);
        let fields: Vec<_> = cmd.iter().map(|(k, _)| k).collect();

        assert_eq!(fields, vec![names::DHW_SETPOINT, names::HEATING_ENABLE]);
    }

    #[test]
    fn non_finite_number_is_null() {
        let cmd = ControlCommand::dhw_setpoint(f64::NAN);
        assert_eq!(cmd.payload(), serde_json::json!({"DHW_setpoint": null}));
    }

    #[test]
    fn empty_command() {
        let cmd = ControlCommand::new();
        assert!(cmd.is_empty());
        assert_eq!(cmd.payload(), serde_json::json!({}));
    }
}
