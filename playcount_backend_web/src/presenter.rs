// Copyright 2026 the Playcount Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The leaderboard overlay.
//!
//! A fixed card in the bottom-right corner with a heading, a toggle control,
//! and a scrollable list that starts hidden. Every [`present`] call replaces
//! the list's children. Stored titles, authors and covers only ever reach the
//! DOM through `textContent` and attribute setters, never as markup.
//!
//! [`present`]: BoardPresenter::present

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::ToString as _;
use core::cell::Cell;

use playcount_core::config::CounterConfig;
use playcount_core::leaderboard::{BoardPresenter, BoardRow, Leaderboard};
use playcount_core::panel::{HEADING, PanelState};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{Document, Element, Event, HtmlElement};

const PANEL_CSS: &str = "position: fixed; bottom: 20px; right: 20px; width: 260px; \
    background: rgba(255, 255, 255, 0.98); color: #18191c; z-index: 99999; \
    border-radius: 12px; padding: 8px; font-size: 13px; \
    box-shadow: 0 8px 24px rgba(0,0,0,0.1); border: 1px solid #e3e5e7; \
    display: flex; flex-direction: column; \
    font-family: -apple-system,BlinkMacSystemFont,Helvetica Neue,Helvetica,Arial,Microsoft YaHei,PingFang SC,sans-serif;";
const HEADER_CSS: &str = "display:flex;justify-content:space-between;align-items:center;\
    padding-bottom:8px;border-bottom:1px solid #f1f2f3;";
const HEADING_CSS: &str = "color:#fb7299;display:flex;align-items:center;gap:4px;";
const TOGGLE_CSS: &str = "cursor:pointer;color:#9499a0;font-size:12px;user-select:none;";
const LIST_CSS: &str = "overflow-y:auto;overflow-x:hidden;max-height:380px;padding-right:4px;";

const ROW_CSS: &str = "text-decoration:none; color:inherit; display:flex; margin-bottom:12px; \
    align-items:flex-start; transition: opacity 0.2s;";
const THUMB_WRAP_CSS: &str = "position:relative;";
const THUMB_CSS: &str = "width:80px; height:50px; border-radius:6px; margin-right:10px; \
    object-fit:cover; border:1px solid #e3e5e7;";
const RANK_CSS: &str = "position:absolute; left:0; top:0; background:rgba(251,114,153,0.9); \
    color:white; font-size:10px; padding:0 4px; border-radius:6px 0 6px 0;";
const TEXT_CSS: &str = "flex:1; overflow:hidden;";
const TITLE_CSS: &str = "white-space:nowrap; overflow:hidden; text-overflow:ellipsis; \
    font-weight:500; margin-bottom:2px; font-size:12px; color:#18191c;";
const AUTHOR_CSS: &str = "color:#9499a0; font-size:11px;";
const FOOTER_CSS: &str = "display:flex; justify-content:space-between; align-items:center; \
    margin-top:4px;";
const COUNT_CSS: &str = "color:#fb7299; font-size:11px; font-weight:bold;";
const SEEN_CSS: &str = "color:#bdc1c6; font-size:10px;";

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const ICON_PATH: &str = "M732.1 202.9c-20.9 0-37.9 17-37.9 37.9V315H329.8v-74.2c0-20.9-17-37.9-37.9-37.9s-37.9 17-37.9 37.9v74.2H172c-48.4 0-87.7 39.3-87.7 87.7v446.4c0 48.4 39.3 87.7 87.7 87.7h680c48.4 0 87.7-39.3 87.7-87.7V314.9c0-48.4-39.3-87.7-87.7-87.7h-82v-74.3c0-20.9-17-37.9-37.9-37.9zM884.2 849c0 6.6-5.4 12-12 12H172c-6.6 0-12-5.4-12-12V470.1h724.2V849zM512 556.7l163.7 114.3-163.7 114.3V556.7z";

/// The overlay panel, presenting each [`Leaderboard`] as its list.
///
/// Create with [`mount`](Self::mount). If a panel with the configured id is
/// already in the document, that panel is adopted instead of adding a second
/// one.
pub struct DomPanel {
    document: Document,
    list: HtmlElement,
    toggle: HtmlElement,
    state: Rc<Cell<PanelState>>,
    on_toggle: Option<Closure<dyn FnMut(Event)>>,
}

impl core::fmt::Debug for DomPanel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomPanel")
            .field("state", &self.state.get())
            .field("owns_toggle", &self.on_toggle.is_some())
            .finish_non_exhaustive()
    }
}

impl DomPanel {
    /// Adds the collapsed panel to `document.body`, or adopts an existing one.
    ///
    /// # Errors
    ///
    /// Returns the browser's exception if an element cannot be created or
    /// appended, or if the document has no body.
    pub fn mount(document: &Document, config: &CounterConfig) -> Result<Self, JsValue> {
        if document.get_element_by_id(&config.panel_id).is_some() {
            return Self::adopt(document, config);
        }

        let panel = element(document, "div")?;
        panel.set_id(&config.panel_id);
        style(&panel, PANEL_CSS)?;

        let header = element(document, "div")?;
        style(&header, HEADER_CSS)?;
        let heading = element(document, "strong")?;
        style(&heading, HEADING_CSS)?;
        let icon = icon(document)?;
        heading.append_child(&icon)?;
        heading.append_child(&document.create_text_node(HEADING))?;
        header.append_child(&heading)?;

        let state = PanelState::collapsed();
        let toggle = element(document, "span")?;
        toggle.set_id(&config.toggle_id);
        style(&toggle, TOGGLE_CSS)?;
        toggle.set_text_content(Some(state.toggle_label()));
        header.append_child(&toggle)?;
        panel.append_child(&header)?;

        let list = element(document, "div")?;
        list.set_id(&config.list_id);
        style(&list, LIST_CSS)?;
        list.style().set_property("display", state.list_display())?;
        panel.append_child(&list)?;

        document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?
            .append_child(&panel)?;

        let mut this = Self {
            document: document.clone(),
            list,
            toggle,
            state: Rc::new(Cell::new(state)),
            on_toggle: None,
        };
        this.bind_toggle()?;
        Ok(this)
    }

    /// Uses the list and toggle of a panel another instance already mounted.
    ///
    /// That instance keeps handling the toggle.
    fn adopt(document: &Document, config: &CounterConfig) -> Result<Self, JsValue> {
        let list = by_id(document, &config.list_id)?;
        let toggle = by_id(document, &config.toggle_id)?;
        let mut state = PanelState::collapsed();
        if list.style().get_property_value("display")?.as_str() == "block" {
            state.toggle();
        }
        Ok(Self {
            document: document.clone(),
            list,
            toggle,
            state: Rc::new(Cell::new(state)),
            on_toggle: None,
        })
    }

    fn bind_toggle(&mut self) -> Result<(), JsValue> {
        let state = Rc::clone(&self.state);
        let list = self.list.clone();
        let toggle = self.toggle.clone();
        let closure = Closure::wrap(Box::new(move |_event: Event| {
            let mut next = state.get();
            next.toggle();
            state.set(next);
            let _ = list.style().set_property("display", next.list_display());
            toggle.set_text_content(Some(next.toggle_label()));
        }) as Box<dyn FnMut(Event)>);
        self.toggle
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        self.on_toggle = Some(closure);
        Ok(())
    }

    /// Current collapsed/expanded state.
    #[must_use]
    pub fn state(&self) -> PanelState {
        self.state.get()
    }
}

impl Drop for DomPanel {
    fn drop(&mut self) {
        if let Some(closure) = self.on_toggle.take() {
            let _ = self
                .toggle
                .remove_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        }
    }
}

impl BoardPresenter for DomPanel {
    fn present(&mut self, board: &Leaderboard) {
        self.list.set_text_content(None);
        append_rows(board.rows(), |row| {
            let el = build_row(&self.document, row)?;
            self.list.append_child(&el).map(drop)
        });
    }
}

/// Appends rows in order and stops at the first failure.
///
/// A document that refuses one row refuses the rest too, so a partial
/// list keeps the top of the ranking. Returns how many rows were appended.
fn append_rows<E>(
    rows: &[BoardRow],
    mut append: impl FnMut(&BoardRow) -> Result<(), E>,
) -> usize {
    let mut appended = 0;
    for row in rows {
        if append(row).is_err() {
            break;
        }
        appended += 1;
    }
    appended
}

/// Builds one linked leaderboard row.
fn build_row(doc: &Document, row: &BoardRow) -> Result<Element, JsValue> {
    let link = doc.create_element("a")?;
    link.set_attribute("href", &row.url)?;
    link.set_attribute("target", "_blank")?;
    style(&link, ROW_CSS)?;

    let thumb_wrap = element(doc, "div")?;
    style(&thumb_wrap, THUMB_WRAP_CSS)?;
    let thumb = doc.create_element("img")?;
    thumb.set_attribute("src", &row.cover)?;
    thumb.set_attribute("referrerpolicy", "no-referrer")?;
    style(&thumb, THUMB_CSS)?;
    thumb_wrap.append_child(&thumb)?;
    let rank = text(doc, "span", RANK_CSS, &row.rank.to_string())?;
    thumb_wrap.append_child(&rank)?;
    link.append_child(&thumb_wrap)?;

    let body = element(doc, "div")?;
    style(&body, TEXT_CSS)?;
    let title = text(doc, "div", TITLE_CSS, &row.title)?;
    title.set_attribute("title", &row.title)?;
    body.append_child(&title)?;
    let author = text(doc, "div", AUTHOR_CSS, &row.author_line())?;
    body.append_child(&author)?;

    let footer = element(doc, "div")?;
    style(&footer, FOOTER_CSS)?;
    let count = text(doc, "span", COUNT_CSS, &row.count_line())?;
    footer.append_child(&count)?;
    let seen = text(doc, "span", SEEN_CSS, &row.last_seen)?;
    footer.append_child(&seen)?;
    body.append_child(&footer)?;
    link.append_child(&body)?;

    Ok(link)
}

fn icon(doc: &Document) -> Result<Element, JsValue> {
    let svg = doc.create_element_ns(Some(SVG_NS), "svg")?;
    svg.set_attribute("style", "width:16px;height:16px;")?;
    svg.set_attribute("viewBox", "0 0 1024 1024")?;
    let path = doc.create_element_ns(Some(SVG_NS), "path")?;
    path.set_attribute("fill", "currentColor")?;
    path.set_attribute("d", ICON_PATH)?;
    svg.append_child(&path)?;
    Ok(svg)
}

fn element(doc: &Document, tag: &str) -> Result<HtmlElement, JsValue> {
    Ok(doc.create_element(tag)?.unchecked_into())
}

fn text(doc: &Document, tag: &str, css: &str, content: &str) -> Result<Element, JsValue> {
    let el = doc.create_element(tag)?;
    style(&el, css)?;
    el.set_text_content(Some(content));
    Ok(el)
}

fn style(el: &Element, css: &str) -> Result<(), JsValue> {
    el.set_attribute("style", css)
}

fn by_id(doc: &Document, id: &str) -> Result<HtmlElement, JsValue> {
    doc.get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .ok_or_else(|| JsValue::from_str(&format!("panel has no #{id}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec::Vec;

    fn row(rank: usize) -> BoardRow {
        BoardRow {
            rank,
            id: format!("BV{rank}"),
            url: format!("https://www.bilibili.com/video/BV{rank}"),
            title: format!("T{rank}"),
            author: String::new(),
            cover: String::new(),
            count: 1,
            last_seen: String::new(),
        }
    }

    #[test]
    fn failed_append_stops_remaining_rows() {
        let rows: Vec<BoardRow> = (1..=4).map(row).collect();
        let mut tried = Vec::new();
        let appended = append_rows(&rows, |row| {
            tried.push(row.rank);
            if row.rank == 2 { Err(()) } else { Ok(()) }
        });
        assert_eq!(appended, 1);
        assert_eq!(tried, [1, 2]);
    }

    #[test]
    fn all_rows_appended_in_rank_order() {
        let rows: Vec<BoardRow> = (1..=3).map(row).collect();
        let mut seen = Vec::new();
        let appended = append_rows(&rows, |row| {
            seen.push(row.rank);
            Ok::<(), ()>(())
        });
        assert_eq!(appended, 3);
        assert_eq!(seen, [1, 2, 3]);
    }
}
