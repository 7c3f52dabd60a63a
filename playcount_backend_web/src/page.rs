// Copyright 2026 the Playcount Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Live document reads.

use alloc::string::String;

use playcount_core::identity::PageSource;
use wasm_bindgen::JsCast as _;
use web_sys::{Document, Element, HtmlElement};

/// [`PageSource`] over a live [`Document`].
///
/// Every call reads the document again, so metadata reflects in-page
/// navigation that happened after startup.
#[derive(Clone)]
pub struct DomPage {
    document: Document,
}

impl core::fmt::Debug for DomPage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomPage").finish_non_exhaustive()
    }
}

impl DomPage {
    /// Wraps `document`.
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }
}

impl PageSource for DomPage {
    fn location_path(&self) -> String {
        self.document
            .location()
            .and_then(|l| l.pathname().ok())
            .unwrap_or_default()
    }

    fn document_title(&self) -> String {
        self.document.title()
    }

    fn query_attribute(&self, selector: &str, attribute: &str) -> Option<String> {
        self.query(selector)?.get_attribute(attribute)
    }

    fn query_text(&self, selector: &str) -> Option<String> {
        let el = self.query(selector)?;
        // Rendered text where available; `textContent` for non-HTML nodes.
        Some(match el.dyn_ref::<HtmlElement>() {
            Some(html) => html.inner_text(),
            None => el.text_content().unwrap_or_default(),
        })
    }
}
