// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device attributes as seen by an entity.
//!
//! - [`names`] lists the attribute keys used by the Vaillant devices.
//! - [`Snapshot`] is a bulk push of attribute values from the cloud.
//! - [`AttributeCache`] keeps the last-good value of every attribute an
//!   entity displays and implements the read and write-through paths.
//! - [`StickySlot`] keeps the last-good value of a derived property.

mod cache;
pub mod names;
mod snapshot;
mod sticky;

pub use cache::AttributeCache;
pub use snapshot::Snapshot;
pub use sticky::StickySlot;
