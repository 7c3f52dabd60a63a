// Copyright 2026 the Playcount Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use playcount_core::ledger::{LedgerError, LoadIssue};
use playcount_core::trace::{AttachEvent, RecordedEvent, SkipReason, TraceSink};
use playcount_core::watcher::SessionState;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn state_name(state: SessionState) -> &'static str {
    match state {
        SessionState::Idle => "idle",
        SessionState::Counted => "counted",
    }
}

fn skip_name(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::AlreadyCounted => "already-counted",
        SkipReason::NoIdentifier => "no-id",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_attached(&mut self, e: &AttachEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[attach] selector={} strategy={:?} immediate={}",
            e.selector, e.strategy, e.immediate,
        );
    }

    fn on_playback_started(&mut self, previous: SessionState) {
        let _ = writeln!(self.writer, "[play] was={}", state_name(previous));
    }

    fn on_completion_recorded(&mut self, e: &RecordedEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[record] id={} count={} at={} title={:?}",
            e.id, e.count, e.last_seen, e.title,
        );
    }

    fn on_completion_skipped(&mut self, reason: SkipReason) {
        let _ = writeln!(self.writer, "[skip] reason={}", skip_name(reason));
    }

    fn on_ledger_recovered(&mut self, issue: &LoadIssue) {
        let _ = writeln!(self.writer, "[recover] {issue}");
    }

    fn on_save_failed(&mut self, error: &LedgerError) {
        let _ = writeln!(self.writer, "[save] FAILED {error}");
    }

    fn on_config_rejected(&mut self, reason: &str) {
        let _ = writeln!(self.writer, "[config] rejected {reason}");
    }

    fn on_board_presented(&mut self, rows: usize) {
        let _ = writeln!(self.writer, "[board] rows={rows}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playcount_core::store::StoreError;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn pretty_print_record() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_completion_recorded(&RecordedEvent {
            id: "BV1q",
            title: "Clip",
            count: 3,
            last_seen: "5-20 21:07",
        });
        let output = output(sink);
        assert!(output.starts_with("[record]"), "got: {output}");
        assert!(output.contains("id=BV1q"), "got: {output}");
        assert!(output.contains("count=3"), "got: {output}");
    }

    #[test]
    fn one_line_per_event() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_playback_started(SessionState::Counted);
        sink.on_completion_skipped(SkipReason::NoIdentifier);
        sink.on_save_failed(&LedgerError::Store(StoreError::Rejected("quota".to_owned())));
        let output = output(sink);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3, "got: {output}");
        assert_eq!(lines[0], "[play] was=counted");
        assert_eq!(lines[1], "[skip] reason=no-id");
        assert!(lines[2].starts_with("[save] FAILED"), "got: {output}");
    }
}
