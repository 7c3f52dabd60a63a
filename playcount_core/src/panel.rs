// Copyright 2026 the Playcount Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay visibility state.
//!
//! The panel starts collapsed on every page load. The flag lives only in
//! memory; nothing about it is persisted.

/// Panel heading text.
pub const HEADING: &str = "播放 Top10";

/// Toggle label while collapsed.
pub const EXPAND_LABEL: &str = "展开 ▾";

/// Toggle label while expanded.
pub const COLLAPSE_LABEL: &str = "收起 ▴";

/// Whether the leaderboard list is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanelState {
    expanded: bool,
}

impl PanelState {
    /// A collapsed panel.
    #[must_use]
    pub const fn collapsed() -> Self {
        Self { expanded: false }
    }

    /// Returns `true` when the list is visible.
    #[must_use]
    pub const fn is_expanded(self) -> bool {
        self.expanded
    }

    /// Flips between collapsed and expanded and returns the new state.
    pub fn toggle(&mut self) -> Self {
        self.expanded = !self.expanded;
        *self
    }

    /// Text for the toggle control.
    #[must_use]
    pub const fn toggle_label(self) -> &'static str {
        if self.expanded {
            COLLAPSE_LABEL
        } else {
            EXPAND_LABEL
        }
    }

    /// CSS `display` value for the list.
    #[must_use]
    pub const fn list_display(self) -> &'static str {
        if self.expanded { "block" } else { "none" }
    }
}
