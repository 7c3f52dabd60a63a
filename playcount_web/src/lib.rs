// Copyright 2026 the Playcount Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Userscript entry point.
//!
//! Mounts the collapsed Top-10 panel, waits for the page's `<video>`, counts
//! each play that runs to its end, and redraws the panel after every counted
//! completion.
//!
//! Build with: `wasm-pack build --target no-modules playcount_web`
//! Then load `pkg/` from the userscript in `userscript.js`.
//!
//! Set `window.playcountConfig` before the module starts to override
//! [`CounterConfig`] fields, either as a JSON string or as a plain object.
//! The module reads the global of the script that loaded it, so under a
//! userscript manager the assignment belongs in the userscript itself,
//! ahead of `wasm_bindgen(...)`. Unknown keys reject the whole override.

#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::{String, ToString as _};
use core::cell::RefCell;

use playcount_backend_web::{ConsoleSink, DomPage, DomPanel, MediaProbe, local_now, open_store};
use playcount_core::config::CounterConfig;
use playcount_core::store::KeyValueStore;
use playcount_core::trace::{AttachEvent, Tracer};
use playcount_core::watcher::PlaybackWatcher;
use wasm_bindgen::prelude::*;
use web_sys::{Event, HtmlMediaElement, Window};

/// Global the userscript may set to override configuration.
const CONFIG_GLOBAL: &str = "playcountConfig";

type Watcher = PlaybackWatcher<Box<dyn KeyValueStore>, DomPanel>;

/// Starts counting on the current page.
///
/// # Errors
///
/// Returns the browser's exception if the panel cannot be mounted or media
/// discovery cannot start.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let (config, rejected) = resolve_config(config_override(&window).as_deref());
    let mut sink = if config.verbose {
        ConsoleSink::verbose()
    } else {
        ConsoleSink::new()
    };
    if let Some(reason) = rejected {
        Tracer::new(&mut sink).config_rejected(&reason);
    }

    let panel = DomPanel::mount(&document, &config)?;
    let selector = config.media_selector.clone();
    let strategy = config.attach;
    let watcher: Rc<RefCell<Watcher>> = Rc::new(RefCell::new(PlaybackWatcher::new(
        open_store(),
        panel,
        config,
    )));

    let page = DomPage::new(document.clone());
    let bound = Rc::clone(&watcher);
    let probe = MediaProbe::new(
        document,
        selector.clone(),
        strategy,
        move |media, immediate| {
            let mut sink = sink;
            Tracer::new(&mut sink).attached(&AttachEvent {
                selector: &selector,
                strategy,
                immediate,
            });
            if let Err(err) = bind_media(&media, &bound, page, sink) {
                web_sys::console::error_2(&JsValue::from_str("playcount: bind failed"), &err);
            }
        },
    );
    probe.start()?;
    // The probe must outlive this function; it stops itself after one match.
    core::mem::forget(probe);

    watcher.borrow_mut().refresh(&mut Tracer::new(&mut sink));
    Ok(())
}

/// Wires `play` and `ended` on `media` to the watcher.
fn bind_media(
    media: &HtmlMediaElement,
    watcher: &Rc<RefCell<Watcher>>,
    page: DomPage,
    sink: ConsoleSink,
) -> Result<(), JsValue> {
    let play_watcher = Rc::clone(watcher);
    let mut play_sink = sink;
    let on_play = Closure::wrap(Box::new(move |_event: Event| {
        play_watcher
            .borrow_mut()
            .on_playback_started(&mut Tracer::new(&mut play_sink));
    }) as Box<dyn FnMut(Event)>);
    media.add_event_listener_with_callback("play", on_play.as_ref().unchecked_ref())?;
    on_play.forget();

    let ended_watcher = Rc::clone(watcher);
    let mut ended_sink = sink;
    let on_ended = Closure::wrap(Box::new(move |_event: Event| {
        ended_watcher.borrow_mut().on_playback_ended(
            &page,
            local_now(),
            &mut Tracer::new(&mut ended_sink),
        );
    }) as Box<dyn FnMut(Event)>);
    media.add_event_listener_with_callback("ended", on_ended.as_ref().unchecked_ref())?;
    on_ended.forget();

    Ok(())
}

/// Reads `window.playcountConfig` as JSON text.
fn config_override(window: &Window) -> Option<String> {
    let value = js_sys::Reflect::get(window, &JsValue::from_str(CONFIG_GLOBAL)).ok()?;
    if value.is_undefined() || value.is_null() {
        return None;
    }
    if let Some(raw) = value.as_string() {
        return Some(raw);
    }
    js_sys::JSON::stringify(&value).ok().map(String::from)
}

/// Applies an optional JSON override.
///
/// An unusable override yields the default configuration together with the
/// reason it was ignored.
fn resolve_config(raw: Option<&str>) -> (CounterConfig, Option<String>) {
    let Some(raw) = raw else {
        return (CounterConfig::bilibili(), None);
    };
    match CounterConfig::from_json(raw) {
        Ok(config) => (config, None),
        Err(err) => (CounterConfig::bilibili(), Some(err.to_string())),
    }
}
