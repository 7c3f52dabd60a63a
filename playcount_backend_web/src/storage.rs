// Copyright 2026 the Playcount Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `window.localStorage` adapter.

use alloc::boxed::Box;
use alloc::string::{String, ToString as _};

use playcount_core::store::{KeyValueStore, MemoryStore, StoreError};
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::Storage;

/// [`KeyValueStore`] backed by the page origin's `localStorage`.
pub struct LocalStorage {
    storage: Storage,
}

impl core::fmt::Debug for LocalStorage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LocalStorage").finish_non_exhaustive()
    }
}

impl LocalStorage {
    /// Opens the window's `localStorage`.
    ///
    /// Returns `None` when there is no window or the browser denies access.
    #[must_use]
    pub fn open() -> Option<Self> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .map(|storage| Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|err| StoreError::Rejected(js_message(&err)))
    }
}

/// Opens `localStorage`, or an in-memory store when it is unavailable.
///
/// With the in-memory fallback counts survive only until the page unloads.
#[must_use]
pub fn open_store() -> Box<dyn KeyValueStore> {
    match LocalStorage::open() {
        Some(storage) => Box::new(storage),
        None => Box::new(MemoryStore::new()),
    }
}

fn js_message(err: &JsValue) -> String {
    if let Some(err) = err.dyn_ref::<js_sys::Error>() {
        return err.message().into();
    }
    err.as_string()
        .unwrap_or_else(|| "storage write failed".to_string())
}
