// Copyright 2026 the Playcount Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Local wall-clock stamps.
//!
//! The ledger stores `lastSeen` as display text, not as an instant. A
//! [`LocalTime`] carries just the fields that text needs and renders them as
//! `M-D H:MM`: month, day and hour unpadded, minute padded to two digits.

use alloc::string::String;
use core::fmt;

/// A local calendar time with minute resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalTime {
    /// Month of the year, 1–12.
    pub month: u8,
    /// Day of the month, 1–31.
    pub day: u8,
    /// Hour of the day, 0–23.
    pub hour: u8,
    /// Minute of the hour, 0–59.
    pub minute: u8,
}

impl LocalTime {
    /// Creates a stamp from its parts. Values are not range-checked.
    #[inline]
    #[must_use]
    pub const fn new(month: u8, day: u8, hour: u8, minute: u8) -> Self {
        Self {
            month,
            day,
            hour,
            minute,
        }
    }

    /// Returns the `lastSeen` text for this stamp.
    #[must_use]
    pub fn label(&self) -> String {
        alloc::format!("{self}")
    }
}

impl fmt::Display for LocalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} {}:{:02}",
            self.month, self.day, self.hour, self.minute
        )
    }
}
