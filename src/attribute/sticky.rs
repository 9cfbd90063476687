// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Last-good derived values.

use parking_lot::Mutex;

use crate::types::AttributeValue;

/// Holds the last successfully derived value of a property.
///
/// A slot is updated only when a raw value is available *and* maps cleanly.
/// Otherwise it keeps what it had, so a garbled or missing reading never
/// flips a displayed mode.
///
/// # Examples
///
/// ```
/// use vaillant_plus::attribute::StickySlot;
/// use vaillant_plus::types::{AttributeValue, HvacMode};
///
/// let slot = StickySlot::new();
/// assert_eq!(slot.get_or(HvacMode::Off), HvacMode::Off);
///
/// slot.derive(Some(&AttributeValue::from(1)), HvacMode::from_heating_enable);
/// assert_eq!(slot.get(), Some(HvacMode::Heat));
///
/// // Unmappable input leaves the slot alone
/// slot.derive(Some(&AttributeValue::from("garbage")), HvacMode::from_heating_enable);
/// assert_eq!(slot.get(), Some(HvacMode::Heat));
/// ```
#[derive(Debug)]
pub struct StickySlot<T> {
    value: Mutex<Option<T>>,
}

impl<T> Default for StickySlot<T> {
    fn default() -> Self {
        Self {
            value: Mutex::new(None),
        }
    }
}

impl<T: Copy> StickySlot<T> {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last-good value.
    #[must_use]
    pub fn get(&self) -> Option<T> {
        *self.value.lock()
    }

    /// Returns the last-good value or `fallback` if none was ever derived.
    #[must_use]
    pub fn get_or(&self, fallback: T) -> T {
        self.get().unwrap_or(fallback)
    }

    /// Stores a value directly.
    pub fn set(&self, value: T) {
        *self.value.lock() = Some(value);
    }

    /// Maps `raw` and stores the result if it succeeds.
    ///
    /// Returns the slot's value after the update attempt.
    pub fn derive(
        &self,
        raw: Option<&AttributeValue>,
        map: impl FnOnce(&AttributeValue) -> Option<T>,
    ) -> Option<T> {
        let mut slot = self.value.lock();
        if let Some(derived) = raw.and_then(map) {
            *slot = Some(derived);
        }
        *slot
    }
}
