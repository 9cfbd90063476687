// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Remote control seam.
//!
//! The cloud API client that talks to Vaillant devices lives outside this
//! crate. Entities only need to hand it a [`ControlCommand`] and learn whether
//! the write went through, which is what [`ControlClient`] captures.
//! Timeouts and transport retries are the client's business.

use crate::command::ControlCommand;
use crate::error::ControlError;

/// A client that can write attributes to a Vaillant device.
#[allow(async_fn_in_trait)]
pub trait ControlClient {
    /// Sends every field of `command` to the device in one request.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError`] if the request could not be delivered or was
    /// rejected. No field of the command may be assumed applied in that case.
    async fn control_device(&self, command: &ControlCommand) -> Result<(), ControlError>;
}
