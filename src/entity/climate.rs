// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Central heating climate entity.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::attribute::names::{
    CLIMATE_ATTRIBUTES, FLOW_TEMPERATURE_SETPOINT, HEATING_ENABLE, LOWER_CH_SETPOINT,
    UPPER_CH_SETPOINT,
};
use crate::attribute::{AttributeCache, Snapshot, StickySlot};
use crate::command::ControlCommand;
use crate::config::{ClimateDefaults, EntryConfig};
use crate::event::DeviceId;
use crate::features::SupportedFeatures;
use crate::protocol::ControlClient;
use crate::state::DeviceStateSource;
use crate::types::{AttributeValue, HvacAction, HvacMode, TemperatureUnit};

use super::{Entity, PlatformEntity, TEMPERATURE_STEP};

const HVAC_MODES: &[HvacMode] = &[HvacMode::Heat, HvacMode::Off];

const PRESET_MODES: &[&str] = &["comfort"];

/// Rendered state of a [`VaillantClimate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateState {
    /// Current flow temperature.
    pub current_temperature: f64,
    /// Target flow temperature.
    pub target_temperature: f64,
    /// Lowest settable temperature.
    pub min_temp: f64,
    /// Highest settable temperature.
    pub max_temp: f64,
    /// Lower bound of the target range.
    pub target_temperature_low: f64,
    /// Upper bound of the target range.
    pub target_temperature_high: f64,
    /// Target temperature increment.
    pub target_temperature_step: f64,
    /// Unit of every temperature above.
    pub temperature_unit: TemperatureUnit,
    /// Current HVAC mode.
    pub hvac_mode: HvacMode,
    /// What the boiler is doing.
    pub hvac_action: HvacAction,
    /// Selectable HVAC modes.
    pub hvac_modes: &'static [HvacMode],
    /// Active preset, if any.
    pub preset_mode: Option<&'static str>,
    /// Known presets.
    pub preset_modes: &'static [&'static str],
    /// Accepted operations.
    pub supported_features: SupportedFeatures,
}

/// Climate entity controlling the central heating of a boiler.
///
/// Shared as `Arc<VaillantClimate<_, _>>`: every method takes `&self`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use vaillant_plus::attribute::Snapshot;
/// use vaillant_plus::command::ControlCommand;
/// use vaillant_plus::entity::{Entity, VaillantClimate};
/// use vaillant_plus::error::ControlError;
/// use vaillant_plus::event::DeviceId;
/// use vaillant_plus::protocol::ControlClient;
/// use vaillant_plus::state::SharedDeviceState;
/// use vaillant_plus::types::HvacMode;
///
/// struct Accept;
///
/// impl ControlClient for Accept {
///     async fn control_device(&self, _: &ControlCommand) -> Result<(), ControlError> {
///         Ok(())
///     }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let state = SharedDeviceState::new();
/// let climate = VaillantClimate::new(DeviceId::new("d1"), Arc::new(Accept), state);
/// assert_eq!(climate.unique_id(), "d1_climate");
/// assert_eq!(climate.target_temperature(), 35.0);
///
/// climate.set_temperature(Some(45.0)).await;
/// assert_eq!(climate.target_temperature(), 45.0);
///
/// climate.update_from_latest_data(&Snapshot::new().with("Heating_Enable", 1));
/// assert_eq!(climate.hvac_mode(), HvacMode::Heat);
/// # }
/// ```
pub struct VaillantClimate<C, S> {
    device_id: DeviceId,
    client: Arc<C>,
    source: S,
    defaults: ClimateDefaults,
    cache: AttributeCache,
    hvac_mode: StickySlot<HvacMode>,
    hvac_action: StickySlot<HvacAction>,
    state_tx: watch::Sender<ClimateState>,
}

impl<C, S> VaillantClimate<C, S>
where
    C: ControlClient,
    S: DeviceStateSource,
{
    /// Creates the climate entity of a device.
    pub fn new(device_id: DeviceId, client: Arc<C>, source: S) -> Self {
        let defaults = ClimateDefaults::default();
        let (state_tx, _) = watch::channel(Self::placeholder_state(&defaults));
        let entity = Self {
            device_id,
            client,
            source,
            defaults,
            cache: AttributeCache::new(),
            hvac_mode: StickySlot::new(),
            hvac_action: StickySlot::new(),
            state_tx,
        };
        entity.publish_state();
        entity
    }

    /// Replaces the values shown before the device reports its own.
    #[must_use]
    pub fn with_defaults(mut self, defaults: ClimateDefaults) -> Self {
        self.defaults = defaults;
        self.publish_state();
        self
    }

    fn placeholder_state(defaults: &ClimateDefaults) -> ClimateState {
        ClimateState {
            current_temperature: defaults.target_temperature,
            target_temperature: defaults.target_temperature,
            min_temp: defaults.min_temperature,
            max_temp: defaults.max_temperature,
            target_temperature_low: defaults.min_temperature,
            target_temperature_high: defaults.max_temperature,
            target_temperature_step: TEMPERATURE_STEP,
            temperature_unit: TemperatureUnit::Celsius,
            hvac_mode: HvacMode::Off,
            hvac_action: HvacAction::Off,
            hvac_modes: HVAC_MODES,
            preset_mode: None,
            preset_modes: PRESET_MODES,
            supported_features: SupportedFeatures::climate(),
        }
    }

    /// Current flow temperature in °C.
    ///
    /// The device reports no separate measurement, so this is the setpoint.
    pub fn current_temperature(&self) -> f64 {
        self.target_temperature()
    }

    /// Target flow temperature in °C.
    pub fn target_temperature(&self) -> f64 {
        self.cache.read_f64(
            &self.source,
            FLOW_TEMPERATURE_SETPOINT,
            self.defaults.target_temperature,
        )
    }

    /// Lowest settable flow temperature in °C.
    pub fn min_temp(&self) -> f64 {
        self.cache
            .read_f64(&self.source, LOWER_CH_SETPOINT, self.defaults.min_temperature)
    }

    /// Highest settable flow temperature in °C.
    pub fn max_temp(&self) -> f64 {
        self.cache
            .read_f64(&self.source, UPPER_CH_SETPOINT, self.defaults.max_temperature)
    }

    /// Lower bound of the target range, same as [`min_temp`](Self::min_temp).
    pub fn target_temperature_low(&self) -> f64 {
        self.min_temp()
    }

    /// Upper bound of the target range, same as [`max_temp`](Self::max_temp).
    pub fn target_temperature_high(&self) -> f64 {
        self.max_temp()
    }

    /// Target temperature increment in °C.
    #[must_use]
    pub fn target_temperature_step(&self) -> f64 {
        TEMPERATURE_STEP
    }

    /// Unit of every temperature.
    #[must_use]
    pub fn temperature_unit(&self) -> TemperatureUnit {
        TemperatureUnit::Celsius
    }

    /// Current HVAC mode, derived from `Heating_Enable`.
    ///
    /// An unreadable or unmappable value keeps the last known mode.
    pub fn hvac_mode(&self) -> HvacMode {
        let raw = self.heating_enable();
        self.hvac_mode
            .derive(Some(&raw), HvacMode::from_heating_enable)
            .unwrap_or(HvacMode::Off)
    }

    /// What the boiler is doing, derived from `Heating_Enable`.
    pub fn hvac_action(&self) -> HvacAction {
        let raw = self.heating_enable();
        self.hvac_action
            .derive(Some(&raw), |v| Some(HvacAction::from_heating_enable(v)))
            .unwrap_or(HvacAction::Idle)
    }

    fn heating_enable(&self) -> AttributeValue {
        self.cache
            .read_flag(&self.source, HEATING_ENABLE, AttributeValue::Bool(false))
    }

    /// Selectable HVAC modes.
    #[must_use]
    pub fn hvac_modes(&self) -> &'static [HvacMode] {
        HVAC_MODES
    }

    /// Active preset. No preset is ever active.
    #[must_use]
    pub fn preset_mode(&self) -> Option<&'static str> {
        None
    }

    /// Known presets.
    #[must_use]
    pub fn preset_modes(&self) -> &'static [&'static str] {
        PRESET_MODES
    }

    /// Renders the current state.
    pub fn state(&self) -> ClimateState {
        let min_temp = self.min_temp();
        let max_temp = self.max_temp();
        let target_temperature = self.target_temperature();
        ClimateState {
            current_temperature: target_temperature,
            target_temperature,
            min_temp,
            max_temp,
            target_temperature_low: min_temp,
            target_temperature_high: max_temp,
            target_temperature_step: self.target_temperature_step(),
            temperature_unit: self.temperature_unit(),
            hvac_mode: self.hvac_mode(),
            hvac_action: self.hvac_action(),
            hvac_modes: HVAC_MODES,
            preset_mode: self.preset_mode(),
            preset_modes: PRESET_MODES,
            supported_features: self.supported_features(),
        }
    }

    /// Creates a receiver that sees every rendered state.
    pub fn subscribe(&self) -> watch::Receiver<ClimateState> {
        self.state_tx.subscribe()
    }

    fn publish_state(&self) {
        self.state_tx.send_replace(self.state());
    }

    /// Sets the target flow temperature. `None` does nothing.
    pub async fn set_temperature(&self, temperature: Option<f64>) {
        let Some(temperature) = temperature else {
            return;
        };

        tracing::debug!(device_id = %self.device_id, temperature, "Setting target temperature");

        if self
            .write(ControlCommand::flow_temperature_setpoint(temperature))
            .await
        {
            self.publish_state();
        }
    }

    /// Enables or disables central heating.
    pub async fn set_hvac_mode(&self, mode: HvacMode) {
        tracing::debug!(device_id = %self.device_id, mode = %mode, "Setting HVAC mode");
        self.apply_hvac_mode(mode).await;
    }

    /// Turns central heating off.
    pub async fn turn_off(&self) {
        tracing::debug!(device_id = %self.device_id, "Turning off");
        self.apply_hvac_mode(HvacMode::Off).await;
    }

    /// Accepts a preset change without acting on it.
    ///
    /// The device exposes no writable preset.
    pub async fn set_preset_mode(&self, preset: &str) {
        tracing::debug!(device_id = %self.device_id, preset, "Ignoring preset mode change");
    }

    async fn apply_hvac_mode(&self, mode: HvacMode) {
        let command = ControlCommand::heating_enable(mode.heating_enabled());
        if self.write(command).await {
            self.hvac_mode.set(mode);
            self.hvac_action.set(HvacAction::from(mode));
            self.publish_state();
        }
    }

    /// Sends a command through the cache. Failures are logged, not raised.
    async fn write(&self, command: ControlCommand) -> bool {
        match self
            .cache
            .write_through(self.client.as_ref(), &self.source, &command)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    device_id = %self.device_id,
                    command = %command.payload(),
                    error = %e,
                    "Failed to control climate"
                );
                false
            }
        }
    }
}

impl<C, S> Entity for VaillantClimate<C, S>
where
    C: ControlClient,
    S: DeviceStateSource,
{
    fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    fn unique_id(&self) -> String {
        format!("{}_climate", self.device_id)
    }

    fn supported_features(&self) -> SupportedFeatures {
        SupportedFeatures::climate()
    }

    fn update_from_latest_data(&self, snapshot: &Snapshot) {
        if !self.cache.apply_snapshot(snapshot, &CLIMATE_ATTRIBUTES) {
            tracing::trace!(device_id = %self.device_id, "Snapshot has no climate attributes");
        }

        if let Some(raw) = snapshot.get(HEATING_ENABLE) {
            self.hvac_mode.derive(Some(raw), HvacMode::from_heating_enable);
            self.hvac_action
                .derive(Some(raw), |v| Some(HvacAction::from_heating_enable(v)));
        }

        self.publish_state();
    }
}

impl<C, S> PlatformEntity<C, S> for VaillantClimate<C, S>
where
    C: ControlClient,
    S: DeviceStateSource,
{
    const KIND: &'static str = "climate";
    const REQUIRED_ATTRIBUTE: &'static str = HEATING_ENABLE;

    fn create(entry: &EntryConfig, client: Arc<C>, source: S) -> Self {
        Self::new(entry.device_id.clone(), client, source).with_defaults(entry.climate)
    }
}

impl<C, S> std::fmt::Debug for VaillantClimate<C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaillantClimate")
            .field("device_id", &self.device_id)
            .field("defaults", &self.defaults)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ControlError;
    use crate::state::SharedDeviceState;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct FakeClient {
        fail: bool,
        sent: Mutex<Vec<ControlCommand>>,
    }

    impl ControlClient for FakeClient {
        async fn control_device(&self, command: &ControlCommand) -> Result<(), ControlError> {
            if self.fail {
                return Err(ControlError::Rejected("busy".to_string()));
            }
            self.sent.lock().push(command.clone());
            Ok(())
        }
    }

    fn climate(fail: bool) -> (VaillantClimate<FakeClient, SharedDeviceState>, SharedDeviceState) {
        let state = SharedDeviceState::new();
        let client = Arc::new(FakeClient {
            fail,
            ..Default::default()
        });
        (
            VaillantClimate::new(DeviceId::new("d1"), client, state.clone()),
            state,
        )
    }

    #[test]
    fn fixed_properties() {
        let (climate, _) = climate(false);

        assert_eq!(climate.unique_id(), "d1_climate");
        assert_eq!(climate.name(), None);
        assert!(!climate.should_poll());
        assert_eq!(climate.hvac_modes(), &[HvacMode::Heat, HvacMode::Off]);
        assert_eq!(climate.preset_modes(), &["comfort"]);
        assert_eq!(climate.preset_mode(), None);
        assert_eq!(climate.target_temperature_step(), 0.5);
        assert_eq!(climate.temperature_unit(), TemperatureUnit::Celsius);
        assert!(climate.supported_features().turn_off);
    }

    #[test]
    fn defaults_before_any_data() {
        let (climate, _) = climate(false);

        assert_eq!(climate.current_temperature(), 35.0);
        assert_eq!(climate.target_temperature(), 35.0);
        assert_eq!(climate.min_temp(), 30.0);
        assert_eq!(climate.target_temperature_low(), 30.0);
        assert_eq!(climate.max_temp(), 75.0);
        assert_eq!(climate.target_temperature_high(), 75.0);
        assert_eq!(climate.hvac_mode(), HvacMode::Off);
        assert_eq!(climate.hvac_action(), HvacAction::Off);
    }

    #[test]
    fn custom_defaults() {
        let (climate, _) = climate(false);
        let climate = climate.with_defaults(ClimateDefaults::default().with_max_temperature(65.0));

        assert_eq!(climate.max_temp(), 65.0);
        assert_eq!(climate.state().max_temp, 65.0);
    }

    #[test]
    fn reads_device_state() {
        let (climate, state) = climate(false);
        state.apply(
            &Snapshot::new()
                .with(HEATING_ENABLE, 1)
                .with(FLOW_TEMPERATURE_SETPOINT, 50.0)
                .with(LOWER_CH_SETPOINT, 25.0)
                .with(UPPER_CH_SETPOINT, 80.0),
        );

        assert_eq!(climate.target_temperature(), 50.0);
        assert_eq!(climate.min_temp(), 25.0);
        assert_eq!(climate.max_temp(), 80.0);
        assert_eq!(climate.hvac_mode(), HvacMode::Heat);
        assert_eq!(climate.hvac_action(), HvacAction::Heating);
    }

    #[test]
    fn unknown_heating_value_is_idle() {
        let (climate, state) = climate(false);
        state.apply(&Snapshot::new().with(HEATING_ENABLE, 2));

        assert_eq!(climate.hvac_mode(), HvacMode::Off);
        assert_eq!(climate.hvac_action(), HvacAction::Idle);
    }

    #[test]
    fn garbled_heating_value_keeps_mode() {
        let (climate, state) = climate(false);
        climate.update_from_latest_data(&Snapshot::new().with(HEATING_ENABLE, 1));
        assert_eq!(climate.hvac_mode(), HvacMode::Heat);

        state.apply(&Snapshot::new().with(HEATING_ENABLE, "unknown"));
        assert_eq!(climate.hvac_mode(), HvacMode::Heat);
    }

    #[test]
    fn garbled_reading_then_outage_keeps_heating() {
        let (climate, state) = climate(false);
        state.apply(&Snapshot::new().with(HEATING_ENABLE, 1));
        assert_eq!(climate.hvac_action(), HvacAction::Heating);

        state.apply(&Snapshot::new().with(HEATING_ENABLE, "unknown"));
        assert_eq!(climate.hvac_action(), HvacAction::Heating);

        state.set_available(false);
        assert_eq!(climate.hvac_mode(), HvacMode::Heat);
        assert_eq!(climate.hvac_action(), HvacAction::Heating);
    }

    #[test]
    fn values_survive_source_outage() {
        let (climate, state) = climate(false);
        state.apply(&Snapshot::new().with(FLOW_TEMPERATURE_SETPOINT, 48.0));
        assert_eq!(climate.target_temperature(), 48.0);

        state.set_available(false);
        assert_eq!(climate.target_temperature(), 48.0);
    }

    #[tokio::test]
    async fn set_temperature_none_sends_nothing() {
        let (climate, _) = climate(false);
        climate.set_temperature(None).await;

        assert!(climate.client.sent.lock().is_empty());
        assert_eq!(climate.target_temperature(), 35.0);
    }

    #[tokio::test]
    async fn set_hvac_mode_updates_derived_state() {
        let (climate, state) = climate(false);

        climate.set_hvac_mode(HvacMode::Heat).await;
        assert_eq!(climate.hvac_mode(), HvacMode::Heat);
        assert_eq!(climate.hvac_action(), HvacAction::Heating);
        assert_eq!(
            state.get(HEATING_ENABLE),
            Ok(Some(AttributeValue::Bool(true)))
        );

        climate.set_hvac_mode(HvacMode::Off).await;
        assert_eq!(climate.hvac_mode(), HvacMode::Off);
        assert_eq!(climate.hvac_action(), HvacAction::Off);
    }

    #[tokio::test]
    async fn failed_hvac_mode_keeps_state() {
        let (climate, state) = climate(true);
        state.apply(&Snapshot::new().with(HEATING_ENABLE, 1));
        assert_eq!(climate.hvac_mode(), HvacMode::Heat);

        climate.turn_off().await;

        assert_eq!(climate.hvac_mode(), HvacMode::Heat);
        assert_eq!(climate.hvac_action(), HvacAction::Heating);
        assert_eq!(state.get(HEATING_ENABLE), Ok(Some(AttributeValue::from(1))));
    }

    #[tokio::test]
    async fn preset_mode_is_ignored() {
        let (climate, _) = climate(false);
        climate.set_preset_mode("comfort").await;

        assert!(climate.client.sent.lock().is_empty());
        assert_eq!(climate.preset_mode(), None);
    }

    #[test]
    fn one_notification_per_snapshot() {
        let (climate, _) = climate(false);
        let mut rx = climate.subscribe();
        assert!(!rx.has_changed().unwrap());

        climate.update_from_latest_data(
            &Snapshot::new()
                .with(HEATING_ENABLE, 1)
                .with(FLOW_TEMPERATURE_SETPOINT, 44.0)
                .with(UPPER_CH_SETPOINT, 70.0),
        );

        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.target_temperature, 44.0);
        assert_eq!(state.max_temp, 70.0);
        assert_eq!(state.hvac_mode, HvacMode::Heat);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn state_serializes() {
        let (climate, _) = climate(false);
        let json = serde_json::to_value(climate.state()).unwrap();

        assert_eq!(json["hvac_mode"], "off");
        assert_eq!(json["temperature_unit"], "°C");
        assert_eq!(json["preset_modes"], serde_json::json!(["comfort"]));
    }
}
