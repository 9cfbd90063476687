// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Domestic hot water entity.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::attribute::names::{
    DHW_SETPOINT, LOWER_DHW_SETPOINT, TANK_LOADING_ENABLE, UPPER_DHW_SETPOINT,
    WATER_HEATER_ATTRIBUTES,
};
use crate::attribute::{AttributeCache, Snapshot, StickySlot};
use crate::command::ControlCommand;
use crate::config::EntryConfig;
use crate::event::DeviceId;
use crate::features::SupportedFeatures;
use crate::protocol::ControlClient;
use crate::state::DeviceStateSource;
use crate::types::{TemperatureUnit, WaterHeaterOperation};

use super::{Entity, PlatformEntity, TEMPERATURE_STEP};

const OPERATION_LIST: &[WaterHeaterOperation] =
    &[WaterHeaterOperation::On, WaterHeaterOperation::Off];

/// Rendered state of a [`VaillantWaterHeater`].
///
/// Temperatures the device never reported are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterHeaterState {
    /// Current hot water temperature.
    pub current_temperature: Option<f64>,
    /// Hot water setpoint.
    pub target_temperature: Option<f64>,
    /// Lowest settable setpoint.
    pub min_temp: Option<f64>,
    /// Highest settable setpoint.
    pub max_temp: Option<f64>,
    /// Lower bound of the target range.
    pub target_temperature_low: Option<f64>,
    /// Upper bound of the target range.
    pub target_temperature_high: Option<f64>,
    /// Precision of every temperature above.
    pub precision: f64,
    /// Unit of every temperature above.
    pub temperature_unit: TemperatureUnit,
    /// Whether tank loading is on, once known.
    pub current_operation: Option<WaterHeaterOperation>,
    /// Selectable operations.
    pub operation_list: &'static [WaterHeaterOperation],
    /// Accepted operations.
    pub supported_features: SupportedFeatures,
}

/// Water heater entity controlling the hot water tank of a boiler.
///
/// Unlike the climate entity there are no fallback temperatures: a value
/// the device never reported stays `None`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use vaillant_plus::attribute::Snapshot;
/// use vaillant_plus::command::ControlCommand;
/// use vaillant_plus::entity::{Entity, VaillantWaterHeater};
/// use vaillant_plus::error::ControlError;
/// use vaillant_plus::event::DeviceId;
/// use vaillant_plus::protocol::ControlClient;
/// use vaillant_plus::state::SharedDeviceState;
///
/// struct Accept;
///
/// impl ControlClient for Accept {
///     async fn control_device(&self, _: &ControlCommand) -> Result<(), ControlError> {
///         Ok(())
///     }
/// }
///
/// let heater = VaillantWaterHeater::new(
///     DeviceId::new("d1"),
///     Arc::new(Accept),
///     SharedDeviceState::new(),
/// );
/// assert_eq!(heater.min_temp(), None);
/// assert_eq!(heater.target_temperature_high(), None);
///
/// heater.update_from_latest_data(
///     &Snapshot::new()
///         .with("Lower_Limitation_of_DHW_Setpoint", 35.0)
///         .with("Upper_Limitation_of_DHW_Setpoint", 65.0),
/// );
/// assert_eq!(heater.target_temperature_low(), Some(35.0));
/// assert_eq!(heater.max_temp(), Some(65.0));
/// ```
pub struct VaillantWaterHeater<C, S> {
    device_id: DeviceId,
    client: Arc<C>,
    source: S,
    cache: AttributeCache,
    operation: StickySlot<WaterHeaterOperation>,
    state_tx: watch::Sender<WaterHeaterState>,
}

impl<C, S> VaillantWaterHeater<C, S>
where
    C: ControlClient,
    S: DeviceStateSource,
{
    /// Creates the water heater entity of a device.
    pub fn new(device_id: DeviceId, client: Arc<C>, source: S) -> Self {
        let (state_tx, _) = watch::channel(WaterHeaterState {
            current_temperature: None,
            target_temperature: None,
            min_temp: None,
            max_temp: None,
            target_temperature_low: None,
            target_temperature_high: None,
            precision: TEMPERATURE_STEP,
            temperature_unit: TemperatureUnit::Celsius,
            current_operation: None,
            operation_list: OPERATION_LIST,
            supported_features: SupportedFeatures::water_heater(),
        });
        let entity = Self {
            device_id,
            client,
            source,
            cache: AttributeCache::new(),
            operation: StickySlot::new(),
            state_tx,
        };
        entity.publish_state();
        entity
    }

    /// Current hot water temperature in °C.
    ///
    /// The device reports no separate measurement, so this is the setpoint.
    pub fn current_temperature(&self) -> Option<f64> {
        self.target_temperature()
    }

    /// Target hot water temperature in °C.
    pub fn target_temperature(&self) -> Option<f64> {
        self.cache.read_optional_f64(&self.source, DHW_SETPOINT)
    }

    /// Lowest settable hot water temperature in °C.
    ///
    /// `None` until the device reports it.
    pub fn min_temp(&self) -> Option<f64> {
        self.cache.read_optional_f64(&self.source, LOWER_DHW_SETPOINT)
    }

    /// Highest settable hot water temperature in °C.
    ///
    /// `None` until the device reports it.
    pub fn max_temp(&self) -> Option<f64> {
        self.cache.read_optional_f64(&self.source, UPPER_DHW_SETPOINT)
    }

    /// Lower bound of the target range, same as [`min_temp`](Self::min_temp).
    pub fn target_temperature_low(&self) -> Option<f64> {
        self.min_temp()
    }

    /// Upper bound of the target range, same as [`max_temp`](Self::max_temp).
    pub fn target_temperature_high(&self) -> Option<f64> {
        self.max_temp()
    }

    /// Precision of reported temperatures in °C.
    #[must_use]
    pub fn precision(&self) -> f64 {
        TEMPERATURE_STEP
    }

    /// Unit of every temperature.
    #[must_use]
    pub fn temperature_unit(&self) -> TemperatureUnit {
        TemperatureUnit::Celsius
    }

    /// Whether tank loading is enabled.
    ///
    /// `None` until a mappable `WarmStar_Tank_Loading_Enable` value was seen.
    pub fn current_operation(&self) -> Option<WaterHeaterOperation> {
        let raw = self.cache.read_optional(&self.source, TANK_LOADING_ENABLE);
        self.operation
            .derive(raw.as_ref(), WaterHeaterOperation::from_tank_loading)
    }

    /// Selectable operations.
    #[must_use]
    pub fn operation_list(&self) -> &'static [WaterHeaterOperation] {
        OPERATION_LIST
    }

    /// Renders the current state.
    pub fn state(&self) -> WaterHeaterState {
        let target_temperature = self.target_temperature();
        let min_temp = self.min_temp();
        let max_temp = self.max_temp();
        WaterHeaterState {
            current_temperature: target_temperature,
            target_temperature,
            min_temp,
            max_temp,
            target_temperature_low: min_temp,
            target_temperature_high: max_temp,
            precision: self.precision(),
            temperature_unit: self.temperature_unit(),
            current_operation: self.current_operation(),
            operation_list: OPERATION_LIST,
            supported_features: self.supported_features(),
        }
    }

    /// Creates a receiver that sees every rendered state.
    pub fn subscribe(&self) -> watch::Receiver<WaterHeaterState> {
        self.state_tx.subscribe()
    }

    fn publish_state(&self) {
        self.state_tx.send_replace(self.state());
    }

    /// Sets the target hot water temperature. `None` does nothing.
    pub async fn set_temperature(&self, temperature: Option<f64>) {
        let Some(temperature) = temperature else {
            return;
        };

        tracing::debug!(device_id = %self.device_id, temperature, "Setting target temperature");

        self.write(ControlCommand::dhw_setpoint(temperature)).await;
    }

    /// Enables or disables tank loading.
    pub async fn set_operation_mode(&self, operation: WaterHeaterOperation) {
        tracing::debug!(device_id = %self.device_id, operation = %operation, "Setting operation mode");

        self.write(ControlCommand::tank_loading(operation)).await;
    }

    /// Sends a command through the cache. Failures are logged, not raised.
    async fn write(&self, command: ControlCommand) {
        match self
            .cache
            .write_through(self.client.as_ref(), &self.source, &command)
            .await
        {
            Ok(()) => self.publish_state(),
            Err(e) => tracing::error!(
                device_id = %self.device_id,
                command = %command.payload(),
                error = %e,
                "Failed to control water heater"
            ),
        }
    }
}

impl<C, S> Entity for VaillantWaterHeater<C, S>
where
    C: ControlClient,
    S: DeviceStateSource,
{
    fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    fn unique_id(&self) -> String {
        format!("{}_water_heater", self.device_id)
    }

    fn supported_features(&self) -> SupportedFeatures {
        SupportedFeatures::water_heater()
    }

    fn update_from_latest_data(&self, snapshot: &Snapshot) {
        if !self.cache.apply_snapshot(snapshot, &WATER_HEATER_ATTRIBUTES) {
            tracing::trace!(device_id = %self.device_id, "Snapshot has no water heater attributes");
        }

        self.operation.derive(
            snapshot.get(TANK_LOADING_ENABLE),
            WaterHeaterOperation::from_tank_loading,
        );

        self.publish_state();
    }
}

impl<C, S> PlatformEntity<C, S> for VaillantWaterHeater<C, S>
where
    C: ControlClient,
    S: DeviceStateSource,
{
    const KIND: &'static str = "water_heater";
    const REQUIRED_ATTRIBUTE: &'static str = DHW_SETPOINT;

    fn create(entry: &EntryConfig, client: Arc<C>, source: S) -> Self {
        Self::new(entry.device_id.clone(), client, source)
    }
}

impl<C, S> std::fmt::Debug for VaillantWaterHeater<C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaillantWaterHeater")
            .field("device_id", &self.device_id)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
