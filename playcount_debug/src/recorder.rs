// Copyright 2026 the Playcount Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and keeps every event as an owned
//! [`TraceRecord`]. Borrowed fields are copied and errors are kept as their
//! display text. [`RecorderSink::to_json_lines`] writes one JSON object per
//! event for offline inspection.

use std::io::{self, Write};

use playcount_core::config::AttachStrategy;
use playcount_core::ledger::{LedgerError, LoadIssue};
use playcount_core::trace::{AttachEvent, RecordedEvent, SkipReason, TraceSink};
use playcount_core::watcher::SessionState;
use serde::Serialize;

/// One recorded trace event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceRecord {
    /// A media element was bound.
    Attached {
        /// Selector that matched.
        selector: String,
        /// Discovery strategy.
        strategy: AttachStrategy,
        /// Whether the element existed at startup.
        immediate: bool,
    },
    /// Playback started.
    PlaybackStarted {
        /// `true` when the reset cleared a counted cycle.
        was_counted: bool,
    },
    /// A completion was counted and saved.
    Recorded {
        /// Content id.
        id: String,
        /// Stored title.
        title: String,
        /// Count after the increment.
        count: u64,
        /// Stored `lastSeen`.
        last_seen: String,
    },
    /// A playback end was ignored.
    Skipped {
        /// `already_counted` or `no_identifier`.
        reason: &'static str,
    },
    /// Stored data was partly or wholly discarded.
    Recovered {
        /// Description of what was discarded.
        issue: String,
    },
    /// The ledger was not written.
    SaveFailed {
        /// The error's display text.
        error: String,
    },
    /// A configuration override was ignored.
    ConfigRejected {
        /// Why.
        reason: String,
    },
    /// A leaderboard was handed to the presenter.
    BoardPresented {
        /// Row count.
        rows: usize,
    },
}

/// A [`TraceSink`] that keeps every event in memory.
#[derive(Clone, Debug, Default)]
pub struct RecorderSink {
    records: Vec<TraceRecord>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events in order.
    #[must_use]
    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    /// Consumes the recorder and returns the recorded events.
    #[must_use]
    pub fn into_records(self) -> Vec<TraceRecord> {
        self.records
    }

    /// Number of recorded completions.
    #[must_use]
    pub fn recorded_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r, TraceRecord::Recorded { .. }))
            .count()
    }

    /// Writes one JSON object per event, newline separated.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn to_json_lines<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for record in &self.records {
            serde_json::to_writer(&mut writer, record)?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    }
}

impl TraceSink for RecorderSink {
    fn on_attached(&mut self, e: &AttachEvent<'_>) {
        self.records.push(TraceRecord::Attached {
            selector: e.selector.to_owned(),
            strategy: e.strategy,
            immediate: e.immediate,
        });
    }

    fn on_playback_started(&mut self, previous: SessionState) {
        self.records.push(TraceRecord::PlaybackStarted {
            was_counted: previous == SessionState::Counted,
        });
    }

    fn on_completion_recorded(&mut self, e: &RecordedEvent<'_>) {
        self.records.push(TraceRecord::Recorded {
            id: e.id.to_owned(),
            title: e.title.to_owned(),
            count: e.count,
            last_seen: e.last_seen.to_owned(),
        });
    }

    fn on_completion_skipped(&mut self, reason: SkipReason) {
        let reason = match reason {
            SkipReason::AlreadyCounted => "already_counted",
            SkipReason::NoIdentifier => "no_identifier",
        };
        self.records.push(TraceRecord::Skipped { reason });
    }

    fn on_ledger_recovered(&mut self, issue: &LoadIssue) {
        self.records.push(TraceRecord::Recovered {
            issue: issue.to_string(),
        });
    }

    fn on_save_failed(&mut self, error: &LedgerError) {
        self.records.push(TraceRecord::SaveFailed {
            error: error.to_string(),
        });
    }

    fn on_config_rejected(&mut self, reason: &str) {
        self.records.push(TraceRecord::ConfigRejected {
            reason: reason.to_owned(),
        });
    }

    fn on_board_presented(&mut self, rows: usize) {
        self.records.push(TraceRecord::BoardPresented { rows });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playcount_core::config::CounterConfig;
    use playcount_core::identity::PageSource;
    use playcount_core::leaderboard::{BoardPresenter, Leaderboard};
    use playcount_core::store::MemoryStore;
    use playcount_core::time::LocalTime;
    use playcount_core::trace::Tracer;
    use playcount_core::watcher::PlaybackWatcher;

    struct Page {
        path: &'static str,
    }

    impl PageSource for Page {
        fn location_path(&self) -> String {
            self.path.to_owned()
        }

        fn document_title(&self) -> String {
            "Clip_哔哩哔哩_bilibili".to_owned()
        }

        fn query_attribute(&self, _selector: &str, _attribute: &str) -> Option<String> {
            None
        }

        fn query_text(&self, _selector: &str) -> Option<String> {
            None
        }
    }

    struct Discard;

    impl BoardPresenter for Discard {
        fn present(&mut self, _board: &Leaderboard) {}
    }

    const AT: LocalTime = LocalTime::new(3, 7, 9, 5);

    #[test]
    fn records_watcher_session() {
        let mut sink = RecorderSink::new();
        let mut watcher =
            PlaybackWatcher::new(MemoryStore::new(), Discard, CounterConfig::bilibili());
        let video = Page { path: "/video/BV1q" };
        {
            let mut tracer = Tracer::new(&mut sink);
            watcher.on_playback_started(&mut tracer);
            watcher.on_playback_ended(&video, AT, &mut tracer);
            watcher.on_playback_ended(&video, AT, &mut tracer);
            watcher.on_playback_started(&mut tracer);
            watcher.on_playback_ended(&Page { path: "/" }, AT, &mut tracer);
        }

        assert_eq!(
            sink.records(),
            [
                TraceRecord::PlaybackStarted { was_counted: false },
                TraceRecord::Recorded {
                    id: "BV1q".to_owned(),
                    title: "Clip".to_owned(),
                    count: 1,
                    last_seen: "3-7 9:05".to_owned(),
                },
                TraceRecord::BoardPresented { rows: 1 },
                TraceRecord::Skipped {
                    reason: "already_counted"
                },
                TraceRecord::PlaybackStarted { was_counted: true },
                TraceRecord::Skipped {
                    reason: "no_identifier"
                },
            ]
        );
        assert_eq!(sink.recorded_count(), 1);
    }

    #[test]
    fn records_recovery_and_save_failure() {
        let mut sink = RecorderSink::new();
        let store = MemoryStore::with_value("bili_play_counts_v2", "not json").read_only();
        let mut watcher = PlaybackWatcher::new(store, Discard, CounterConfig::bilibili());
        watcher.on_playback_ended(
            &Page {
                path: "/video/BV1q",
            },
            AT,
            &mut Tracer::new(&mut sink),
        );

        assert!(matches!(sink.records()[0], TraceRecord::Recovered { .. }));
        assert!(matches!(sink.records()[1], TraceRecord::SaveFailed { .. }));
        assert_eq!(sink.records().len(), 2);
        assert_eq!(sink.recorded_count(), 0);
    }

    #[test]
    fn json_lines_are_tagged() {
        let mut sink = RecorderSink::new();
        sink.on_attached(&AttachEvent {
            selector: "video",
            strategy: AttachStrategy::Poll { interval_ms: 500 },
            immediate: false,
        });
        sink.on_board_presented(0);

        let mut out = Vec::new();
        sink.to_json_lines(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                r#"{"event":"attached","selector":"video","strategy":{"mode":"poll","intervalMs":500},"immediate":false}"#,
                r#"{"event":"board_presented","rows":0}"#,
            ]
        );
    }
}
