// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory cloud client shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use vaillant_plus::command::ControlCommand;
use vaillant_plus::error::ControlError;
use vaillant_plus::protocol::ControlClient;

/// Records every command and can be told to fail or to respond slowly.
#[derive(Debug, Default)]
pub struct FakeCloud {
    failing: AtomicBool,
    delay: Mutex<Option<Duration>>,
    sent: Mutex<Vec<ControlCommand>>,
}

impl FakeCloud {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    pub fn sent(&self) -> Vec<ControlCommand> {
        self.sent.lock().clone()
    }
}

impl ControlClient for FakeCloud {
    async fn control_device(&self, command: &ControlCommand) -> Result<(), ControlError> {
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(ControlError::Transport("cloud unreachable".to_string()));
        }

        self.sent.lock().push(command.clone());
        Ok(())
    }
}
