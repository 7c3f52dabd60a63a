// Copyright 2026 the Playcount Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Play counting, persisted aggregation, and leaderboard ranking.
//!
//! `playcount_core` holds everything about the watch counter that does not
//! touch a browser. It is `no_std` compatible (with `alloc`); the page, the
//! key-value store and the overlay are reached through small traits that the
//! web backend implements and tests replace with in-memory doubles.
//!
//! # Architecture
//!
//! ```text
//!   media "play"  ──► PlaybackWatcher::on_playback_started()   (state → Idle)
//!
//!   media "ended" ──► PlaybackWatcher::on_playback_ended()
//!                          │  Idle only
//!                          ▼
//!                  PageIdentity::extract(PageSource)
//!                          │  content page only
//!                          ▼
//!        PlayLedger::load() ──► Ledger::record_completion() ──► PlayLedger::save()
//!                                                                   │
//!                          ┌────────────────────────────────────────┘
//!                          ▼
//!        Leaderboard::rank() ──► BoardPresenter::present()        (state → Counted)
//! ```
//!
//! **[`identity`]**: Content id parsing from the URL path and metadata reads
//! through the [`PageSource`](identity::PageSource) trait.
//!
//! **[`ledger`]**: [`ContentRecord`](ledger::ContentRecord) and the keyed
//! [`Ledger`](ledger::Ledger), its JSON encoding, and the
//! [`PlayLedger`](ledger::PlayLedger) load/save wrapper.
//!
//! **[`store`]**: The [`KeyValueStore`](store::KeyValueStore) contract and an
//! in-memory implementation.
//!
//! **[`watcher`]**: The per-attachment dedup state machine.
//!
//! **[`leaderboard`]**: Top-N ranking and the
//! [`BoardPresenter`](leaderboard::BoardPresenter) trait.
//!
//! **[`panel`]**: Collapsed/expanded state of the overlay.
//!
//! **[`config`]**: [`CounterConfig`](config::CounterConfig) with the site
//! defaults and an optional JSON override.
//!
//! **[`time`]**: Wall-clock stamp recorded as `lastSeen`.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and the zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod config;
pub mod identity;
pub mod leaderboard;
pub mod ledger;
pub mod panel;
pub mod store;
pub mod time;
pub mod trace;
pub mod watcher;

#[cfg(test)]
pub(crate) mod testing;
