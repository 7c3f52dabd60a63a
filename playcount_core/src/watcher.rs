// Copyright 2026 the Playcount Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Playback completion dedup.
//!
//! A [`PlaybackWatcher`] is bound to one media element for the life of the
//! page. It tracks a single [`SessionState`]:
//!
//! ```text
//!            play (always)
//!        ┌─────────────────────┐
//!        ▼                     │
//!      Idle ── ended on a ──► Counted ──┐
//!        │    content page      ▲       │ ended (ignored)
//!        │                      └───────┘
//!        └── ended elsewhere (ignored, stays Idle)
//! ```
//!
//! The reset on every `play` is what lets multi-part and auto-continuing
//! videos count again when the next part starts, while repeated `ended`
//! events for the same cycle are absorbed.
//!
//! Every counted completion reloads the ledger from the store before
//! updating it, then saves the whole ledger and redraws the leaderboard. The
//! store has no locking; another tab writing between the load and the save
//! loses its update.

use crate::config::CounterConfig;
use crate::identity::{ContentId, PageIdentity, PageSource};
use crate::leaderboard::{BoardPresenter, Leaderboard};
use crate::ledger::{Ledger, PlayLedger};
use crate::store::KeyValueStore;
use crate::time::LocalTime;
use crate::trace::{RecordedEvent, SkipReason, Tracer};

/// Whether the current play cycle has been counted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Nothing counted since playback last started.
    #[default]
    Idle,
    /// A completion was counted for this cycle.
    Counted,
}

/// Result of handling a playback end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    /// The completion was counted and persisted.
    Recorded {
        /// Content that was counted.
        id: ContentId,
        /// Count after the increment.
        count: u64,
    },
    /// The completion was counted but the ledger could not be written.
    ///
    /// The cycle is still marked counted and the board is not redrawn.
    Unsaved {
        /// Content that was counted.
        id: ContentId,
    },
    /// This cycle was already counted.
    AlreadyCounted,
    /// The page is not a content page.
    NotContent,
}

/// Counts completed plays of one media element.
#[derive(Debug)]
pub struct PlaybackWatcher<S, P> {
    ledger: PlayLedger<S>,
    presenter: P,
    config: CounterConfig,
    state: SessionState,
}

impl<S: KeyValueStore, P: BoardPresenter> PlaybackWatcher<S, P> {
    /// Creates a watcher in the [`Idle`](SessionState::Idle) state.
    ///
    /// The ledger is stored under `config.storage_key` in `store`.
    pub fn new(store: S, presenter: P, config: CounterConfig) -> Self {
        Self {
            ledger: PlayLedger::new(store, config.storage_key.clone()),
            presenter,
            config,
            state: SessionState::Idle,
        }
    }

    /// Current dedup state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    /// The persisted ledger.
    #[must_use]
    pub fn ledger(&self) -> &PlayLedger<S> {
        &self.ledger
    }

    /// The leaderboard presenter.
    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Handles a playback (re)start: the state returns to `Idle`.
    pub fn on_playback_started(&mut self, tracer: &mut Tracer<'_>) {
        tracer.playback_started(self.state);
        self.state = SessionState::Idle;
    }

    /// Handles a playback end.
    ///
    /// Counts at most once per play cycle and only on content pages. `now`
    /// becomes the record's `lastSeen`.
    pub fn on_playback_ended(
        &mut self,
        page: &impl PageSource,
        now: LocalTime,
        tracer: &mut Tracer<'_>,
    ) -> Completion {
        if self.state == SessionState::Counted {
            tracer.completion_skipped(SkipReason::AlreadyCounted);
            return Completion::AlreadyCounted;
        }
        let Some(PageIdentity { id, meta }) = PageIdentity::extract(page, &self.config) else {
            tracer.completion_skipped(SkipReason::NoIdentifier);
            return Completion::NotContent;
        };

        let mut ledger = self.ledger.load(tracer);
        let count = ledger.record_completion(&id, meta, now).count;
        self.state = SessionState::Counted;

        if let Err(err) = self.ledger.save(&ledger) {
            tracer.save_failed(&err);
            return Completion::Unsaved { id };
        }
        if let Some(record) = ledger.get(id.as_str()) {
            tracer.completion_recorded(&RecordedEvent {
                id: id.as_str(),
                title: &record.title,
                count,
                last_seen: &record.last_seen,
            });
        }
        self.present(&ledger, tracer);
        Completion::Recorded { id, count }
    }

    /// Redraws the leaderboard from the persisted ledger.
    pub fn refresh(&mut self, tracer: &mut Tracer<'_>) {
        let ledger = self.ledger.load(tracer);
        self.present(&ledger, tracer);
    }

    fn present(&mut self, ledger: &Ledger, tracer: &mut Tracer<'_>) {
        let board = Leaderboard::rank(ledger, &self.config.host, self.config.top_n);
        self.presenter.present(&board);
        tracer.board_presented(board.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::ContentRecord;
    use crate::store::MemoryStore;
    use crate::testing::{RecordingPresenter, StaticPage};
    use alloc::string::ToString as _;

    const KEY: &str = "bili_play_counts_v2";
    const AT: LocalTime = LocalTime::new(5, 20, 21, 7);

    fn watcher(store: MemoryStore) -> PlaybackWatcher<MemoryStore, RecordingPresenter> {
        PlaybackWatcher::new(store, RecordingPresenter::default(), CounterConfig::bilibili())
    }

    fn video_page() -> StaticPage {
        StaticPage::new("/video/BV1q", "Clip_哔哩哔哩_bilibili").with_text(".up-name", "someone")
    }

    fn count_of(w: &PlaybackWatcher<MemoryStore, RecordingPresenter>, id: &str) -> Option<u64> {
        w.ledger()
            .load(&mut Tracer::none())
            .get(id)
            .map(|r| r.count)
    }

    #[test]
    fn play_then_end_counts_once() {
        let mut w = watcher(MemoryStore::new());
        let page = video_page();
        w.on_playback_started(&mut Tracer::none());
        let outcome = w.on_playback_ended(&page, AT, &mut Tracer::none());

        assert_eq!(
            outcome,
            Completion::Recorded {
                id: ContentId::from_path("/video/BV1q").unwrap(),
                count: 1
            }
        );
        assert_eq!(w.state(), SessionState::Counted);
        let ledger = w.ledger().load(&mut Tracer::none());
        let rec = ledger.get("BV1q").unwrap();
        assert_eq!(rec.count, 1);
        assert_eq!(rec.title, "Clip");
        assert_eq!(rec.author, "someone");
        assert_eq!(rec.last_seen, "5-20 21:07");
    }

    #[test]
    fn duplicate_end_is_ignored() {
        let mut w = watcher(MemoryStore::new());
        let page = video_page();
        w.on_playback_started(&mut Tracer::none());
        w.on_playback_ended(&page, AT, &mut Tracer::none());
        let second = w.on_playback_ended(&page, AT, &mut Tracer::none());

        assert_eq!(second, Completion::AlreadyCounted);
        assert_eq!(count_of(&w, "BV1q"), Some(1));
        assert_eq!(w.presenter().boards.len(), 1, "no redraw for ignored end");
    }

    #[test]
    fn replay_counts_again() {
        let mut w = watcher(MemoryStore::new());
        let page = video_page();
        for _ in 0..2 {
            w.on_playback_started(&mut Tracer::none());
            w.on_playback_ended(&page, AT, &mut Tracer::none());
        }
        assert_eq!(count_of(&w, "BV1q"), Some(2));
    }

    #[test]
    fn play_resets_from_any_state() {
        let mut w = watcher(MemoryStore::new());
        w.on_playback_started(&mut Tracer::none());
        assert_eq!(w.state(), SessionState::Idle);

        w.on_playback_ended(&video_page(), AT, &mut Tracer::none());
        assert_eq!(w.state(), SessionState::Counted);
        w.on_playback_started(&mut Tracer::none());
        assert_eq!(w.state(), SessionState::Idle);
        w.on_playback_started(&mut Tracer::none());
        assert_eq!(w.state(), SessionState::Idle);
    }

    #[test]
    fn end_without_prior_play_counts() {
        let mut w = watcher(MemoryStore::new());
        let outcome = w.on_playback_ended(&video_page(), AT, &mut Tracer::none());
        assert!(matches!(outcome, Completion::Recorded { count: 1, .. }));
    }

    #[test]
    fn non_content_page_writes_nothing() {
        let mut w = watcher(MemoryStore::new());
        let page = StaticPage::new("/bangumi/play/ep1", "Anime");
        w.on_playback_started(&mut Tracer::none());
        let outcome = w.on_playback_ended(&page, AT, &mut Tracer::none());

        assert_eq!(outcome, Completion::NotContent);
        assert_eq!(w.state(), SessionState::Idle);
        assert_eq!(w.ledger().store().raw(KEY), None);
        assert!(w.presenter().boards.is_empty());
    }

    #[test]
    fn content_page_after_skip_still_counts() {
        let mut w = watcher(MemoryStore::new());
        w.on_playback_ended(&StaticPage::new("/", "Home"), AT, &mut Tracer::none());
        let outcome = w.on_playback_ended(&video_page(), AT, &mut Tracer::none());
        assert!(matches!(outcome, Completion::Recorded { count: 1, .. }));
    }

    #[test]
    fn multi_part_video_counts_each_part() {
        let mut w = watcher(MemoryStore::new());
        let part_one = StaticPage::new("/video/BV1m", "Series");
        let part_two = StaticPage::new("/video/BV1m/", "Series");
        w.on_playback_started(&mut Tracer::none());
        w.on_playback_ended(&part_one, AT, &mut Tracer::none());
        w.on_playback_ended(&part_one, AT, &mut Tracer::none());
        // Auto-continue into the next part fires `play` again.
        w.on_playback_started(&mut Tracer::none());
        w.on_playback_ended(&part_two, AT, &mut Tracer::none());
        assert_eq!(count_of(&w, "BV1m"), Some(2));
    }

    #[test]
    fn navigation_counts_new_content_separately() {
        let mut w = watcher(MemoryStore::new());
        w.on_playback_ended(&StaticPage::new("/video/BV1a", "A"), AT, &mut Tracer::none());
        w.on_playback_started(&mut Tracer::none());
        w.on_playback_ended(&StaticPage::new("/video/BV1b", "B"), AT, &mut Tracer::none());
        assert_eq!(count_of(&w, "BV1a"), Some(1));
        assert_eq!(count_of(&w, "BV1b"), Some(1));
    }

    #[test]
    fn existing_metadata_survives_new_completion() {
        let seeded = r#"{"BV1q": {"title": "A", "count": 5, "cover": "c", "author": "first", "lastSeen": "1-1 0:00"}}"#;
        let mut w = watcher(MemoryStore::with_value(KEY, seeded));
        w.on_playback_ended(&video_page(), AT, &mut Tracer::none());

        let ledger = w.ledger().load(&mut Tracer::none());
        assert_eq!(
            ledger.get("BV1q"),
            Some(&ContentRecord {
                title: "A".to_string(),
                count: 6,
                cover: "c".to_string(),
                author: "first".to_string(),
                last_seen: "5-20 21:07".to_string(),
                extra: serde_json::Map::new(),
            })
        );
    }

    #[test]
    fn completion_reloads_store_before_writing() {
        let mut w = watcher(MemoryStore::with_value(
            KEY,
            r#"{"BV9": {"title": "other tab", "count": 3}}"#,
        ));
        w.on_playback_ended(&video_page(), AT, &mut Tracer::none());
        assert_eq!(count_of(&w, "BV9"), Some(3));
        assert_eq!(count_of(&w, "BV1q"), Some(1));
    }

    #[test]
    fn corrupt_store_starts_fresh() {
        let mut w = watcher(MemoryStore::with_value(KEY, "{{{"));
        let outcome = w.on_playback_ended(&video_page(), AT, &mut Tracer::none());
        assert!(matches!(outcome, Completion::Recorded { count: 1, .. }));
        assert_eq!(count_of(&w, "BV1q"), Some(1));
    }

    #[test]
    fn failed_save_marks_cycle_counted_without_redraw() {
        let mut w = watcher(MemoryStore::new().read_only());
        let outcome = w.on_playback_ended(&video_page(), AT, &mut Tracer::none());
        assert!(matches!(outcome, Completion::Unsaved { .. }));
        assert_eq!(w.state(), SessionState::Counted);
        assert!(w.presenter().boards.is_empty());
    }

    #[test]
    fn recorded_completion_redraws_board() {
        let mut w = watcher(MemoryStore::new());
        w.on_playback_ended(&video_page(), AT, &mut Tracer::none());
        let board = w.presenter().boards.last().unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board.rows()[0].id, "BV1q");
        assert_eq!(board.rows()[0].count, 1);
    }

    #[test]
    fn refresh_presents_persisted_ledger() {
        let mut w = watcher(MemoryStore::with_value(
            KEY,
            r#"{"BV1": {"title": "a", "count": 1}, "BV2": {"title": "b", "count": 4}}"#,
        ));
        w.refresh(&mut Tracer::none());
        let board = w.presenter().boards.last().unwrap();
        let ids: alloc::vec::Vec<&str> = board.rows().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["BV2", "BV1"]);
    }

    #[test]
    fn refresh_of_empty_store_presents_empty_board() {
        let mut w = watcher(MemoryStore::new());
        w.refresh(&mut Tracer::none());
        assert_eq!(w.presenter().boards.len(), 1);
        assert!(w.presenter().boards[0].is_empty());
    }
}
