// Copyright 2026 the Playcount Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test doubles shared by the unit tests.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString as _};
use alloc::vec::Vec;

use crate::identity::PageSource;
use crate::leaderboard::{BoardPresenter, Leaderboard};

/// A page whose contents are fixed at construction.
#[derive(Clone, Debug, Default)]
pub(crate) struct StaticPage {
    path: String,
    title: String,
    texts: BTreeMap<String, String>,
    attributes: BTreeMap<(String, String), String>,
}

impl StaticPage {
    pub(crate) fn new(path: &str, title: &str) -> Self {
        Self {
            path: path.to_string(),
            title: title.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn with_text(mut self, selector: &str, text: &str) -> Self {
        self.texts.insert(selector.to_string(), text.to_string());
        self
    }

    pub(crate) fn with_attribute(mut self, selector: &str, attribute: &str, value: &str) -> Self {
        self.attributes.insert(
            (selector.to_string(), attribute.to_string()),
            value.to_string(),
        );
        self
    }
}

impl PageSource for StaticPage {
    fn location_path(&self) -> String {
        self.path.clone()
    }

    fn document_title(&self) -> String {
        self.title.clone()
    }

    fn query_attribute(&self, selector: &str, attribute: &str) -> Option<String> {
        self.attributes
            .get(&(selector.to_string(), attribute.to_string()))
            .cloned()
    }

    fn query_text(&self, selector: &str) -> Option<String> {
        self.texts.get(selector).cloned()
    }
}

/// Keeps every board it is asked to present.
#[derive(Debug, Default)]
pub(crate) struct RecordingPresenter {
    pub(crate) boards: Vec<Leaderboard>,
}

impl BoardPresenter for RecordingPresenter {
    fn present(&mut self, board: &Leaderboard) {
        self.boards.push(board.clone());
    }
}
