// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Vaillant entity platforms.
//!
//! Entities never surface these errors to their consumers: failed reads
//! degrade to cached or default values and failed writes are logged. The
//! types exist so that collaborators (the device state source and the
//! remote control client) can report what went wrong, and so that entry
//! configuration and snapshot parsing can fail loudly at the boundary.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A mode or value string could not be interpreted.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The remote control client rejected or failed a write.
    #[error("control error: {0}")]
    Control(#[from] ControlError),

    /// The device state source could not provide a value.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// A snapshot or attribute payload could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The config entry is invalid.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to interpreting mode and value strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// An unknown HVAC mode string was provided.
    #[error("invalid HVAC mode: {0}")]
    InvalidHvacMode(String),

    /// An unknown water heater operation string was provided.
    #[error("invalid operation mode: {0}")]
    InvalidOperation(String),
}

/// Errors reported by a [`ControlClient`](crate::protocol::ControlClient).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControlError {
    /// The transport to the cloud or device failed.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The device or cloud API rejected the command.
    #[error("command rejected: {0}")]
    Rejected(String),

    /// The request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// The client has been shut down.
    #[error("client is closed")]
    Closed,
}

/// Errors reported by a [`DeviceStateSource`](crate::state::DeviceStateSource).
///
/// A missing attribute is not an error: sources report it as `Ok(None)`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The device state is currently unavailable (e.g. the device is offline).
    #[error("device state is unavailable")]
    Unavailable,

    /// The stored value has a type the caller cannot use.
    #[error("attribute {attribute} has unexpected type: expected {expected}")]
    UnexpectedType {
        /// The attribute that was read.
        attribute: String,
        /// The expected value kind.
        expected: &'static str,
    },
}

/// Errors related to parsing snapshots and attribute payloads.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload was valid JSON but not an attribute object.
    #[error("unexpected payload format: {0}")]
    UnexpectedFormat(String),
}

/// Errors related to config entry data.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config entry data could not be deserialized.
    #[error("invalid config entry: {0}")]
    Invalid(#[from] serde_json::Error),

    /// The device id is empty.
    #[error("config entry has an empty device id")]
    EmptyDeviceId,
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
