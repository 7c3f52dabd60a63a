// Copyright 2026 the Playcount Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Content identity and page metadata.
//!
//! A page counts as a content page when its URL path contains
//! `/video/BV<word>`. [`ContentId::from_path`] finds that id; the remaining
//! metadata (title, cover, author) is read through [`PageSource`] and never
//! fails, falling back to defaults from [`CounterConfig`].
//!
//! Nothing here is cached. [`PageIdentity::extract`] reads the page every
//! time it is called, so client-side navigation between videos is picked up
//! on the next completion.

use alloc::string::{String, ToString as _};
use core::fmt;

use crate::config::CounterConfig;

const VIDEO_SEGMENT: &str = "/video/";
const ID_PREFIX: &str = "BV";

/// Stable identifier of a piece of content, e.g. `BV1xx411c7mD`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentId(String);

impl ContentId {
    /// Extracts the first `/video/BV<word>` id from a URL path.
    ///
    /// `<word>` is one or more ASCII letters, digits or underscores and is
    /// taken greedily. Returns `None` when no occurrence qualifies.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let mut offset = 0;
        while let Some(found) = path[offset..].find(VIDEO_SEGMENT) {
            let start = offset + found + VIDEO_SEGMENT.len();
            let rest = &path[start..];
            if rest.starts_with(ID_PREFIX) {
                let word = rest[ID_PREFIX.len()..]
                    .bytes()
                    .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
                    .count();
                if word > 0 {
                    return Some(Self(path[start..start + ID_PREFIX.len() + word].to_string()));
                }
            }
            // Resume one byte past the slash that began this occurrence.
            offset += found + 1;
        }
        None
    }

    /// Returns the id text.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({})", self.0)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Read access to the current page.
///
/// Implemented over the live DOM by the web backend. Every method is a fresh
/// read; implementations must not cache.
pub trait PageSource {
    /// Path component of the current URL.
    fn location_path(&self) -> String;

    /// Current document title.
    fn document_title(&self) -> String;

    /// Value of `attribute` on the first element matching `selector`.
    fn query_attribute(&self, selector: &str, attribute: &str) -> Option<String>;

    /// Rendered text of the first element matching `selector`.
    fn query_text(&self, selector: &str) -> Option<String>;
}

/// Descriptive metadata captured when a content record is created.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentMeta {
    /// Display title.
    pub title: String,
    /// Thumbnail URL, possibly empty.
    pub cover: String,
    /// Creator name or the configured unknown-author sentinel.
    pub author: String,
}

impl ContentMeta {
    /// Reads title, cover and author from `page`.
    #[must_use]
    pub fn read(page: &impl PageSource, config: &CounterConfig) -> Self {
        Self {
            title: clean_title(&page.document_title(), &config.title_suffix),
            cover: page
                .query_attribute(&config.cover_selector, &config.cover_attribute)
                .unwrap_or_default(),
            author: config
                .author_selectors
                .iter()
                .find_map(|selector| page.query_text(selector))
                .map(|text| text.trim().to_string())
                .unwrap_or_else(|| config.unknown_author.clone()),
        }
    }
}

/// Removes the first occurrence of `suffix` from `raw` and trims the result.
#[must_use]
pub fn clean_title(raw: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        return raw.trim().to_string();
    }
    raw.replacen(suffix, "", 1).trim().to_string()
}

/// A content page: its id plus the metadata visible right now.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageIdentity {
    /// Content id parsed from the URL path.
    pub id: ContentId,
    /// Metadata read from the document.
    pub meta: ContentMeta,
}

impl PageIdentity {
    /// Identifies the current page.
    ///
    /// Returns `None` when the path carries no content id. Metadata is only
    /// read for content pages.
    #[must_use]
    pub fn extract(page: &impl PageSource, config: &CounterConfig) -> Option<Self> {
        let id = ContentId::from_path(&page.location_path())?;
        Some(Self {
            id,
            meta: ContentMeta::read(page, config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticPage;

    #[test]
    fn id_from_plain_video_path() {
        let id = ContentId::from_path("/video/BV1xx411c7mD").unwrap();
        assert_eq!(id.as_str(), "BV1xx411c7mD");
    }

    #[test]
    fn id_stops_at_non_word_character() {
        let id = ContentId::from_path("/video/BV1GJ411x7h7/?p=2").unwrap();
        assert_eq!(id.as_str(), "BV1GJ411x7h7");
    }

    #[test]
    fn id_may_appear_after_other_segments() {
        let id = ContentId::from_path("/list/watchlater/video/BV1ab_9").unwrap();
        assert_eq!(id.as_str(), "BV1ab_9");
    }

    #[test]
    fn later_occurrence_is_used_when_first_does_not_qualify() {
        let id = ContentId::from_path("/video/av170001/video/BV1q").unwrap();
        assert_eq!(id.as_str(), "BV1q");
    }

    #[test]
    fn non_content_paths_have_no_id() {
        for path in [
            "/",
            "/anime/",
            "/video/",
            "/video/BV",
            "/video/BV/",
            "/video/av170001",
            "/video/bv1xx411c7mD",
            "/videos/BV1xx",
        ] {
            assert!(ContentId::from_path(path).is_none(), "{path} should not match");
        }
    }

    #[test]
    fn title_suffix_is_stripped_and_trimmed() {
        assert_eq!(
            clean_title("  Some Song _哔哩哔哩_bilibili ", "_哔哩哔哩_bilibili"),
            "Some Song"
        );
        assert_eq!(clean_title("No suffix here", "_哔哩哔哩_bilibili"), "No suffix here");
    }

    #[test]
    fn only_first_suffix_occurrence_is_removed() {
        assert_eq!(clean_title("a_x_b_x", "_x"), "a_b_x");
    }

    #[test]
    fn metadata_falls_back_to_defaults() {
        let page = StaticPage::new("/video/BV1q", "Title_哔哩哔哩_bilibili");
        let meta = ContentMeta::read(&page, &CounterConfig::bilibili());
        assert_eq!(meta.title, "Title");
        assert_eq!(meta.cover, "");
        assert_eq!(meta.author, "未知");
    }

    #[test]
    fn author_prefers_primary_selector() {
        let page = StaticPage::new("/video/BV1q", "T")
            .with_text(".up-name", "  primary ")
            .with_text(".name", "fallback");
        let meta = ContentMeta::read(&page, &CounterConfig::bilibili());
        assert_eq!(meta.author, "primary");
    }

    #[test]
    fn author_uses_fallback_selector() {
        let page = StaticPage::new("/video/BV1q", "T").with_text(".name", "fallback\n");
        let meta = ContentMeta::read(&page, &CounterConfig::bilibili());
        assert_eq!(meta.author, "fallback");
    }

    #[test]
    fn cover_is_read_from_meta_tag() {
        let page = StaticPage::new("/video/BV1q", "T").with_attribute(
            r#"meta[property="og:image"]"#,
            "content",
            "https://i0.hdslb.com/cover.jpg",
        );
        let meta = ContentMeta::read(&page, &CounterConfig::bilibili());
        assert_eq!(meta.cover, "https://i0.hdslb.com/cover.jpg");
    }

    #[test]
    fn extract_skips_non_content_pages() {
        let page = StaticPage::new("/account/history", "History");
        assert!(PageIdentity::extract(&page, &CounterConfig::bilibili()).is_none());
    }

    #[test]
    fn extract_reads_id_and_metadata() {
        let page = StaticPage::new("/video/BV1q", "Clip_哔哩哔哩_bilibili")
            .with_text(".up-name", "someone");
        let identity = PageIdentity::extract(&page, &CounterConfig::bilibili()).unwrap();
        assert_eq!(identity.id.as_str(), "BV1q");
        assert_eq!(identity.meta.title, "Clip");
        assert_eq!(identity.meta.author, "someone");
    }
}
