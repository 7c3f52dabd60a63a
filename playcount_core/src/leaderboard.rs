// Copyright 2026 the Playcount Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Top-N ranking of the ledger.
//!
//! [`Leaderboard::rank`] orders records by count, highest first. Records with
//! equal counts are ordered by ascending content id, so the same ledger always
//! produces the same board regardless of how it was loaded.
//!
//! A [`BoardPresenter`] turns a board into something visible. The DOM panel
//! implements it in the web backend.

use alloc::format;
use alloc::string::{String, ToString as _};
use alloc::vec::Vec;

use crate::ledger::{ContentRecord, Ledger};

/// One ranked leaderboard entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardRow {
    /// 1-based rank.
    pub rank: usize,
    /// Content id.
    pub id: String,
    /// Canonical URL of the content.
    pub url: String,
    /// Stored title.
    pub title: String,
    /// Stored author.
    pub author: String,
    /// Stored thumbnail URL.
    pub cover: String,
    /// Counted completions.
    pub count: u64,
    /// Time of the latest completion, possibly empty.
    pub last_seen: String,
}

impl BoardRow {
    fn new(rank: usize, id: &str, record: &ContentRecord, host: &str) -> Self {
        Self {
            rank,
            id: id.to_string(),
            url: canonical_url(host, id),
            title: record.title.clone(),
            author: record.author.clone(),
            cover: record.cover.clone(),
            count: record.count,
            last_seen: record.last_seen.clone(),
        }
    }

    /// Author caption, `UP: <author>`.
    #[must_use]
    pub fn author_line(&self) -> String {
        format!("UP: {}", self.author)
    }

    /// Count caption, `播放 <n> 次`.
    #[must_use]
    pub fn count_line(&self) -> String {
        format!("播放 {} 次", self.count)
    }
}

/// Builds `https://<host>/video/<id>`.
#[must_use]
pub fn canonical_url(host: &str, id: &str) -> String {
    format!("https://{host}/video/{id}")
}

/// A ranked, truncated view of a [`Ledger`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Leaderboard {
    rows: Vec<BoardRow>,
}

impl Leaderboard {
    /// Ranks `ledger` and keeps the first `limit` rows.
    ///
    /// Rows link to `host`. Order is descending count, then ascending id.
    #[must_use]
    pub fn rank(ledger: &Ledger, host: &str, limit: usize) -> Self {
        let mut entries: Vec<(&str, &ContentRecord)> = ledger.iter().collect();
        entries.sort_by(|(a_id, a), (b_id, b)| {
            b.count.cmp(&a.count).then_with(|| a_id.cmp(b_id))
        });
        let rows = entries
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(i, (id, record))| BoardRow::new(i + 1, id, record, host))
            .collect();
        Self { rows }
    }

    /// Ranked rows, best first.
    #[must_use]
    pub fn rows(&self) -> &[BoardRow] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the board has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Displays a [`Leaderboard`].
///
/// Each call replaces whatever the previous call displayed.
pub trait BoardPresenter {
    /// Shows `board`.
    fn present(&mut self, board: &Leaderboard);
}
