// Copyright 2026 the Playcount Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-shot media element discovery.
//!
//! The player is often inserted after the userscript runs. [`MediaProbe`]
//! checks once at [`start`](MediaProbe::start) and, if nothing matches yet,
//! keeps looking with the configured [`AttachStrategy`]:
//!
//! - `Poll` (default): a `setTimeout` chain re-checks every `interval_ms`.
//! - `Observe`: a `MutationObserver` on the document subtree re-checks on each
//!   batch of DOM mutations.
//!
//! Either way the callback runs at most once and the probe then stops.
//! Elements that replace the found one later are not picked up.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use core::cell::{Cell, RefCell};

use playcount_core::config::AttachStrategy;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlMediaElement, MutationObserver, MutationObserverInit};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "setTimeout")]
    fn set_timeout(callback: &JsValue, delay_ms: u32) -> i32;

    #[wasm_bindgen(js_name = "clearTimeout")]
    fn clear_timeout(id: i32);
}

type FoundCallback = Box<dyn FnOnce(HtmlMediaElement, bool)>;
type ObserverClosure = Closure<dyn FnMut(js_sys::Array, MutationObserver)>;
type PollClosure = Closure<dyn FnMut()>;

/// Finds the first element matching a selector that is an
/// `HTMLMediaElement`, then hands it to a callback once.
///
/// The callback's second argument is `true` when the element already existed
/// at [`start`](Self::start).
pub struct MediaProbe {
    inner: Rc<ProbeInner>,
}

struct ProbeInner {
    document: Document,
    selector: String,
    strategy: AttachStrategy,

    /// Taken on the first match.
    on_found: RefCell<Option<FoundCallback>>,

    /// Set once the callback has run or the probe was stopped.
    done: Cell<bool>,

    observer: RefCell<Option<MutationObserver>>,
    observer_closure: RefCell<Option<ObserverClosure>>,

    /// Re-registers itself with `setTimeout` until a match.
    poll_closure: RefCell<Option<PollClosure>>,
    timer_id: Cell<Option<i32>>,
}

impl ProbeInner {
    fn find(&self) -> Option<HtmlMediaElement> {
        self.document
            .query_selector(&self.selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlMediaElement>().ok())
    }

    fn finish(&self, media: HtmlMediaElement, immediate: bool) {
        self.done.set(true);
        // Release the borrow before running user code.
        let callback = self.on_found.borrow_mut().take();
        if let Some(callback) = callback {
            callback(media, immediate);
        }
    }

    fn schedule(&self, interval_ms: u32) {
        if let Some(ref closure) = *self.poll_closure.borrow() {
            let id = set_timeout(closure.as_ref().unchecked_ref(), interval_ms);
            self.timer_id.set(Some(id));
        }
    }
}

impl MediaProbe {
    /// Creates a probe that is **not yet looking**.
    pub fn new(
        document: Document,
        selector: impl Into<String>,
        strategy: AttachStrategy,
        on_found: impl FnOnce(HtmlMediaElement, bool) + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(ProbeInner {
                document,
                selector: selector.into(),
                strategy,
                on_found: RefCell::new(Some(Box::new(on_found))),
                done: Cell::new(false),
                observer: RefCell::new(None),
                observer_closure: RefCell::new(None),
                poll_closure: RefCell::new(None),
                timer_id: Cell::new(None),
            }),
        }
    }

    /// Checks for the element now and, if absent, starts waiting for it.
    ///
    /// If the probe already finished, this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the browser's exception when the observer cannot be created
    /// or attached.
    pub fn start(&self) -> Result<(), JsValue> {
        if self.inner.done.get() {
            return Ok(());
        }
        if let Some(media) = self.inner.find() {
            self.inner.finish(media, true);
            return Ok(());
        }
        match self.inner.strategy {
            AttachStrategy::Poll { interval_ms } => {
                self.poll(interval_ms);
                Ok(())
            }
            AttachStrategy::Observe => self.observe(),
        }
    }

    fn observe(&self) -> Result<(), JsValue> {
        let root = self
            .inner
            .document
            .document_element()
            .ok_or_else(|| JsValue::from_str("document has no root element"))?;

        let inner = Rc::clone(&self.inner);
        let closure = Closure::wrap(Box::new(
            move |_records: js_sys::Array, observer: MutationObserver| {
                if inner.done.get() {
                    return;
                }
                if let Some(media) = inner.find() {
                    observer.disconnect();
                    inner.finish(media, false);
                }
            },
        ) as Box<dyn FnMut(js_sys::Array, MutationObserver)>);

        let observer = MutationObserver::new(closure.as_ref().unchecked_ref())?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer.observe_with_options(&root, &init)?;

        *self.inner.observer.borrow_mut() = Some(observer);
        *self.inner.observer_closure.borrow_mut() = Some(closure);
        Ok(())
    }

    fn poll(&self, interval_ms: u32) {
        let inner = Rc::clone(&self.inner);
        let closure = Closure::wrap(Box::new(move || {
            inner.timer_id.set(None);
            if inner.done.get() {
                return;
            }
            match inner.find() {
                Some(media) => inner.finish(media, false),
                None => inner.schedule(interval_ms),
            }
        }) as Box<dyn FnMut()>);

        *self.inner.poll_closure.borrow_mut() = Some(closure);
        self.inner.schedule(interval_ms);
    }

    /// Stops looking without running the callback.
    pub fn stop(&self) {
        self.inner.done.set(true);
        if let Some(observer) = self.inner.observer.borrow_mut().take() {
            observer.disconnect();
        }
        if let Some(id) = self.inner.timer_id.take() {
            clear_timeout(id);
        }
    }

    /// Returns `true` once the element was found or the probe was stopped.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.inner.done.get()
    }
}

impl Drop for MediaProbe {
    fn drop(&mut self) {
        self.stop();
        // Drop the JS closures so they don't leak.
        self.inner.observer_closure.borrow_mut().take();
        self.inner.poll_closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for MediaProbe {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MediaProbe")
            .field("selector", &self.inner.selector)
            .field("strategy", &self.inner.strategy)
            .field("done", &self.inner.done.get())
            .finish()
    }
}
