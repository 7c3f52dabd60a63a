// Copyright 2026 the Playcount Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Local diagnostics for the counter.
//!
//! Nothing in the counter surfaces errors to the viewer; every failure
//! degrades to a skip or a default. This module is where those skips become
//! visible. [`TraceSink`] has one method per event, all defaulting to no-ops.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.

use crate::config::AttachStrategy;
use crate::ledger::{LedgerError, LoadIssue};
use crate::watcher::SessionState;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// Why a playback end did not produce a count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// This play cycle was already counted.
    AlreadyCounted,
    /// The page is not a content page.
    NoIdentifier,
}

/// Emitted once when the watcher binds to a media element.
#[derive(Clone, Copy, Debug)]
pub struct AttachEvent<'a> {
    /// Selector that matched.
    pub selector: &'a str,
    /// Discovery strategy in use.
    pub strategy: AttachStrategy,
    /// `true` when the element existed at startup.
    pub immediate: bool,
}

/// Emitted after a completion was counted and persisted.
#[derive(Clone, Copy, Debug)]
pub struct RecordedEvent<'a> {
    /// Content id.
    pub id: &'a str,
    /// Stored title.
    pub title: &'a str,
    /// Count after the increment.
    pub count: u64,
    /// Stored `lastSeen` text.
    pub last_seen: &'a str,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives diagnostic events from the counter.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a media element is bound.
    fn on_attached(&mut self, e: &AttachEvent<'_>) {
        _ = e;
    }

    /// Called on every playback start with the state it reset.
    fn on_playback_started(&mut self, previous: SessionState) {
        _ = previous;
    }

    /// Called after a completion is persisted.
    fn on_completion_recorded(&mut self, e: &RecordedEvent<'_>) {
        _ = e;
    }

    /// Called when a playback end is ignored.
    fn on_completion_skipped(&mut self, reason: SkipReason) {
        _ = reason;
    }

    /// Called when persisted data had to be discarded while loading.
    fn on_ledger_recovered(&mut self, issue: &LoadIssue) {
        _ = issue;
    }

    /// Called when the ledger could not be written.
    fn on_save_failed(&mut self, error: &LedgerError) {
        _ = error;
    }

    /// Called when a configuration override was unusable.
    fn on_config_rejected(&mut self, reason: &str) {
        _ = reason;
    }

    /// Called after a leaderboard is handed to the presenter.
    fn on_board_presented(&mut self, rows: usize) {
        _ = rows;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits an [`AttachEvent`].
    #[inline]
    pub fn attached(&mut self, e: &AttachEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_attached(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a playback start.
    #[inline]
    pub fn playback_started(&mut self, previous: SessionState) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_playback_started(previous);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = previous;
        }
    }

    /// Emits a [`RecordedEvent`].
    #[inline]
    pub fn completion_recorded(&mut self, e: &RecordedEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_completion_recorded(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a skipped completion.
    #[inline]
    pub fn completion_skipped(&mut self, reason: SkipReason) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_completion_skipped(reason);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = reason;
        }
    }

    /// Emits a [`LoadIssue`].
    #[inline]
    pub fn ledger_recovered(&mut self, issue: &LoadIssue) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_ledger_recovered(issue);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = issue;
        }
    }

    /// Emits a [`LedgerError`] from a failed save.
    #[inline]
    pub fn save_failed(&mut self, error: &LedgerError) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_save_failed(error);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = error;
        }
    }

    /// Emits a rejected configuration override.
    #[inline]
    pub fn config_rejected(&mut self, reason: &str) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_config_rejected(reason);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = reason;
        }
    }

    /// Emits the row count of a presented leaderboard.
    #[inline]
    pub fn board_presented(&mut self, rows: usize) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_board_presented(rows);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = rows;
        }
    }
}
