// Copyright 2026 the Playcount Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Developer console diagnostics.

use alloc::format;

use playcount_core::ledger::{LedgerError, LoadIssue};
use playcount_core::trace::{AttachEvent, RecordedEvent, SkipReason, TraceSink};
use playcount_core::watcher::SessionState;
use wasm_bindgen::JsValue;
use web_sys::console;

/// [`TraceSink`] that writes to `console`.
///
/// A recorded completion always logs. Failures go to `console.warn`. The
/// remaining events log only when `verbose` is set.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink {
    verbose: bool,
}

impl ConsoleSink {
    /// Logs completions and failures only.
    #[must_use]
    pub const fn new() -> Self {
        Self { verbose: false }
    }

    /// Logs every event.
    #[must_use]
    pub const fn verbose() -> Self {
        Self { verbose: true }
    }

    fn debug(&self, msg: &str) {
        if self.verbose {
            console::debug_1(&JsValue::from_str(msg));
        }
    }
}

fn warn(msg: &str) {
    console::warn_1(&JsValue::from_str(msg));
}

impl TraceSink for ConsoleSink {
    fn on_attached(&mut self, e: &AttachEvent<'_>) {
        let when = if e.immediate { "at startup" } else { "after wait" };
        self.debug(&format!(
            "playcount: bound `{}` {when} ({:?})",
            e.selector, e.strategy
        ));
    }

    fn on_playback_started(&mut self, previous: SessionState) {
        self.debug(&format!("playcount: play (was {previous:?})"));
    }

    fn on_completion_recorded(&mut self, e: &RecordedEvent<'_>) {
        console::log_1(&JsValue::from_str(&format!("🎬 记录成功：{}", e.title)));
        self.debug(&format!(
            "playcount: {} now {} at {}",
            e.id, e.count, e.last_seen
        ));
    }

    fn on_completion_skipped(&mut self, reason: SkipReason) {
        self.debug(&format!("playcount: ended ignored ({reason:?})"));
    }

    fn on_ledger_recovered(&mut self, issue: &LoadIssue) {
        warn(&format!("playcount: stored counts recovered: {issue}"));
    }

    fn on_save_failed(&mut self, error: &LedgerError) {
        warn(&format!("playcount: counts not saved: {error}"));
    }

    fn on_config_rejected(&mut self, reason: &str) {
        warn(&format!("playcount: config ignored: {reason}"));
    }

    fn on_board_presented(&mut self, rows: usize) {
        self.debug(&format!("playcount: board shows {rows} rows"));
    }
}
