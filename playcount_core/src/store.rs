// Copyright 2026 the Playcount Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key-value storage contract.
//!
//! The ledger persists as a single string value. Backends only need to get
//! and replace whole values; there is no partial update, locking or
//! versioning. Two writers holding the same key race and the last write wins.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString as _};
use core::fmt;

/// Errors from [`KeyValueStore::set`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// The storage refused the write (for example, quota exceeded).
    Rejected(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(reason) => write!(f, "storage rejected write: {reason}"),
        }
    }
}

impl core::error::Error for StoreError {}

/// String-keyed, string-valued persistent storage.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, or `None` when missing or
    /// unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the value was not written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// An in-memory [`KeyValueStore`].
///
/// Used when the browser refuses access to persistent storage, and as a test
/// double. Contents live only as long as the value.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    /// Creates an empty, writable store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `value` under `key`.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }

    /// Makes every subsequent [`set`](KeyValueStore::set) fail.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Returns the raw stored value for `key`.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::Rejected("read-only store".to_string()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
