// Copyright 2026 the Playcount Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Counter configuration.
//!
//! [`CounterConfig::bilibili`] carries the values the counter was built
//! around. Every field can be overridden from JSON; fields left out of the
//! override keep their defaults.

use alloc::string::{String, ToString as _};
use alloc::vec;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

/// Delay between media element checks when polling.
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 500;

/// How the watcher finds a media element that may not exist yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum AttachStrategy {
    /// Check, then re-check on a fixed timer until the element appears.
    Poll {
        /// Delay between checks, in milliseconds.
        #[serde(rename = "intervalMs", default = "default_poll_interval")]
        interval_ms: u32,
    },
    /// Check once, then watch DOM mutations until the element appears.
    Observe,
}

impl Default for AttachStrategy {
    fn default() -> Self {
        Self::Poll {
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

fn default_poll_interval() -> u32 {
    DEFAULT_POLL_INTERVAL_MS
}

/// Everything site-specific about the counter.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct CounterConfig {
    /// Key of the persisted ledger in the key-value store.
    pub storage_key: String,
    /// Host used to build canonical content URLs.
    pub host: String,
    /// Text removed from the document title to get the content title.
    pub title_suffix: String,
    /// Author recorded when no author element resolves.
    pub unknown_author: String,
    /// Selector for the cover metadata tag.
    pub cover_selector: String,
    /// Attribute of the cover tag holding the image URL.
    pub cover_attribute: String,
    /// Author selectors, tried in order.
    pub author_selectors: Vec<String>,
    /// Selector for the media element to watch.
    pub media_selector: String,
    /// Number of leaderboard rows.
    pub top_n: usize,
    /// Media element discovery.
    pub attach: AttachStrategy,
    /// Element id of the overlay panel.
    pub panel_id: String,
    /// Element id of the row list inside the panel.
    pub list_id: String,
    /// Element id of the collapse toggle inside the panel.
    pub toggle_id: String,
    /// Log every diagnostic event, not only completions and failures.
    pub verbose: bool,
}

impl CounterConfig {
    /// Configuration for `www.bilibili.com` video pages.
    #[must_use]
    pub fn bilibili() -> Self {
        Self {
            storage_key: "bili_play_counts_v2".to_string(),
            host: "www.bilibili.com".to_string(),
            title_suffix: "_哔哩哔哩_bilibili".to_string(),
            unknown_author: "未知".to_string(),
            cover_selector: r#"meta[property="og:image"]"#.to_string(),
            cover_attribute: "content".to_string(),
            author_selectors: vec![".up-name".to_string(), ".name".to_string()],
            media_selector: "video".to_string(),
            top_n: 10,
            attach: AttachStrategy::default(),
            panel_id: "bili-panel".to_string(),
            list_id: "bili-list".to_string(),
            toggle_id: "bili-toggle".to_string(),
            verbose: false,
        }
    }

    /// Parses a JSON override on top of [`bilibili`](Self::bilibili).
    ///
    /// # Errors
    ///
    /// Returns the parse error when `raw` is not a JSON object of known
    /// fields with the right types.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self::bilibili()
    }
}
