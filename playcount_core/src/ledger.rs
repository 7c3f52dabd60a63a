// Copyright 2026 the Playcount Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The play ledger.
//!
//! [`Ledger`] maps content ids to [`ContentRecord`]s. It is persisted as one
//! JSON object under a single store key:
//!
//! ```json
//! {"BV1q": {"title": "Clip", "count": 3, "cover": "", "author": "未知", "lastSeen": "3-7 9:05"}}
//! ```
//!
//! Records are created on the first counted completion and never removed.
//! [`Ledger::record_completion`] is the only mutation. Loading never fails:
//! unreadable data is discarded and reported as a [`LoadIssue`], keeping
//! whatever entries are still well formed.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString as _};
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::{ContentId, ContentMeta};
use crate::store::{KeyValueStore, StoreError};
use crate::time::LocalTime;
use crate::trace::Tracer;

/// Aggregate stored per content id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    /// Title captured on the first completion.
    #[serde(default)]
    pub title: String,
    /// Counted completions, at least 1.
    pub count: u64,
    /// Thumbnail URL captured on the first completion.
    #[serde(default)]
    pub cover: String,
    /// Author captured on the first completion.
    #[serde(default)]
    pub author: String,
    /// Time of the most recent completion. Empty in data written before the
    /// field existed.
    #[serde(default)]
    pub last_seen: String,
    /// Fields this crate does not interpret, kept so saving does not drop
    /// them.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ContentRecord {
    fn created(meta: ContentMeta) -> Self {
        Self {
            title: meta.title,
            count: 0,
            cover: meta.cover,
            author: meta.author,
            last_seen: String::new(),
            extra: serde_json::Map::new(),
        }
    }
}

/// What was discarded while decoding persisted data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadIssue {
    /// The stored value was not JSON.
    Malformed,
    /// The stored value was JSON but not an object.
    NotAnObject,
    /// Some entries were unreadable or had a zero count.
    DroppedEntries {
        /// Entries discarded.
        dropped: usize,
        /// Entries kept.
        kept: usize,
    },
}

impl fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => f.write_str("stored ledger is not valid JSON; starting empty"),
            Self::NotAnObject => f.write_str("stored ledger is not a JSON object; starting empty"),
            Self::DroppedEntries { dropped, kept } => {
                write!(f, "dropped {dropped} unreadable ledger entries, kept {kept}")
            }
        }
    }
}

/// Errors from [`PlayLedger::save`].
#[derive(Debug)]
pub enum LedgerError {
    /// The ledger could not be serialized.
    Encode(serde_json::Error),
    /// The store refused the write.
    Store(StoreError),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode ledger: {err}"),
            Self::Store(err) => write!(f, "failed to save ledger: {err}"),
        }
    }
}

impl core::error::Error for LedgerError {}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

/// Mapping from content id to [`ContentRecord`].
///
/// Iteration is in ascending id order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ledger {
    records: BTreeMap<String, ContentRecord>,
}

impl Ledger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when no content has been counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the record for `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ContentRecord> {
        self.records.get(id)
    }

    /// Iterates `(id, record)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContentRecord)> {
        self.records.iter().map(|(id, record)| (id.as_str(), record))
    }

    /// Counts one completion of `id`.
    ///
    /// Creates the record from `meta` if `id` is new; an existing record keeps
    /// its title, cover and author. Then increments the count and stamps
    /// `lastSeen` with `at`.
    pub fn record_completion(
        &mut self,
        id: &ContentId,
        meta: ContentMeta,
        at: LocalTime,
    ) -> &ContentRecord {
        let record = self
            .records
            .entry(id.as_str().to_string())
            .or_insert_with(|| ContentRecord::created(meta));
        record.count = record.count.saturating_add(1);
        record.last_seen = at.label();
        record
    }

    /// Serializes the ledger to its persisted JSON form.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes persisted JSON, keeping every well-formed entry.
    ///
    /// Returns the recovered ledger and what, if anything, was discarded.
    /// Entries whose count is zero are discarded.
    #[must_use]
    pub fn decode(raw: &str) -> (Self, Option<LoadIssue>) {
        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(_) => return (Self::new(), Some(LoadIssue::Malformed)),
        };
        let serde_json::Value::Object(entries) = value else {
            return (Self::new(), Some(LoadIssue::NotAnObject));
        };

        let mut records = BTreeMap::new();
        let mut dropped = 0;
        for (id, entry) in entries {
            match serde_json::from_value::<ContentRecord>(entry) {
                Ok(record) if record.count > 0 => {
                    records.insert(id, record);
                }
                _ => dropped += 1,
            }
        }

        let issue = (dropped > 0).then_some(LoadIssue::DroppedEntries {
            dropped,
            kept: records.len(),
        });
        (Self { records }, issue)
    }
}

impl FromIterator<(String, ContentRecord)> for Ledger {
    /// Builds a ledger from existing records, skipping zero counts.
    fn from_iter<I: IntoIterator<Item = (String, ContentRecord)>>(iter: I) -> Self {
        Self {
            records: iter
                .into_iter()
                .filter(|(_, record)| record.count > 0)
                .collect(),
        }
    }
}

/// A [`Ledger`] persisted under one key of a [`KeyValueStore`].
#[derive(Debug)]
pub struct PlayLedger<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> PlayLedger<S> {
    /// Binds the ledger to `key` in `store`.
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Reads the persisted ledger.
    ///
    /// A missing or blank value is an empty ledger. Corrupt data is dropped
    /// and reported to `tracer`; this never fails.
    pub fn load(&self, tracer: &mut Tracer<'_>) -> Ledger {
        let Some(raw) = self.store.get(&self.key) else {
            return Ledger::new();
        };
        if raw.trim().is_empty() {
            return Ledger::new();
        }
        let (ledger, issue) = Ledger::decode(&raw);
        if let Some(issue) = issue {
            tracer.ledger_recovered(&issue);
        }
        ledger
    }

    /// Replaces the persisted value with `ledger`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when encoding or the store write fails. The
    /// previous value is left as it was.
    pub fn save(&mut self, ledger: &Ledger) -> Result<(), LedgerError> {
        let raw = ledger.to_json().map_err(LedgerError::Encode)?;
        self.store.set(&self.key, &raw)?;
        Ok(())
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}
