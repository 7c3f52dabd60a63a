// Copyright 2026 the Playcount Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for playcount.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`LocalStorage`]: `window.localStorage` as a
//!   [`KeyValueStore`](playcount_core::store::KeyValueStore)
//! - [`DomPage`]: reads the content id and metadata from the live document
//! - [`MediaProbe`]: finds the media element, now or once it appears
//! - [`DomPanel`]: the collapsible leaderboard overlay
//! - [`ConsoleSink`]: diagnostics to the developer console

#![no_std]

extern crate alloc;

mod console;
mod page;
mod presenter;
mod probe;
mod storage;

pub use console::ConsoleSink;
pub use page::DomPage;
pub use playcount_core::leaderboard::BoardPresenter;
pub use presenter::DomPanel;
pub use probe::MediaProbe;
pub use storage::{LocalStorage, open_store};

use playcount_core::time::LocalTime;

/// Returns the current local wall-clock time from `new Date()`.
#[must_use]
pub fn local_now() -> LocalTime {
    let date = js_sys::Date::new_0();
    stamp(
        date.get_month(),
        date.get_date(),
        date.get_hours(),
        date.get_minutes(),
    )
}

/// Builds a [`LocalTime`] from `Date` getter values.
///
/// `month0` is zero-based, as returned by `Date.prototype.getMonth`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "Date getters return values below 60"
)]
fn stamp(month0: u32, day: u32, hour: u32, minute: u32) -> LocalTime {
    LocalTime::new((month0 + 1) as u8, day as u8, hour as u8, minute as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_is_one_based() {
        let t = stamp(0, 3, 9, 5);
        assert_eq!(t, LocalTime::new(1, 3, 9, 5));
        assert_eq!(t.label(), "1-3 9:05");
    }

    #[test]
    fn december_evening() {
        assert_eq!(stamp(11, 31, 23, 59).label(), "12-31 23:59");
    }
}
