//! Event Dispatcher (browser side)
//!
//! Attaches the three capturing listeners to `document.body` and turns each
//! DOM event into an `ElementSnapshot` path for `trip_core::dispatch`.

use std::collections::BTreeMap;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement, KeyboardEvent};

use trip_core::dispatch::{
    attach, dataset_key, resolve, Action, ActionKind, ActionMap, ElementSnapshot, EventKind, EventRoot, KeyInfo,
    MARKER_ATTRIBUTE,
};

pub type Handler = Box<dyn Fn(&Action)>;
pub type Handlers = Rc<ActionMap<Handler>>;

/// The document body with the routing table it feeds
struct BodyRoot {
    body: HtmlElement,
    handlers: Handlers,
}

impl EventRoot for BodyRoot {
    type Error = JsValue;

    fn has_marker(&self) -> bool {
        self.body.has_attribute(MARKER_ATTRIBUTE)
    }

    fn set_marker(&self) -> Result<(), JsValue> {
        self.body.set_attribute(MARKER_ATTRIBUTE, "true")
    }

    fn listen(&self, kind: EventKind) -> Result<(), JsValue> {
        let handlers = self.handlers.clone();
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            on_event(kind, &event, &handlers);
        });
        self.body
            .add_event_listener_with_callback_and_bool(kind.as_str(), closure.as_ref().unchecked_ref(), true)?;
        // Listeners live as long as the page
        closure.forget();
        Ok(())
    }
}

/// Attach the delegated listeners once. Later calls are no-ops.
pub fn install(handlers: Handlers) -> Result<bool, JsValue> {
    let body = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
        .ok_or_else(|| JsValue::from_str("no document body"))?;
    let missing = handlers.missing();
    if !missing.is_empty() {
        web_sys::console::warn_1(&format!("[DISPATCH] No handler for {:?}", missing).into());
    }
    let attached = attach(&BodyRoot { body, handlers })?;
    web_sys::console::log_1(&format!("[DISPATCH] Listeners attached: {}", attached).into());
    Ok(attached)
}

fn on_event(kind: EventKind, event: &Event, handlers: &Handlers) {
    let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
        return;
    };
    let path = snapshot_path(&target);
    let keyboard = event.dyn_ref::<KeyboardEvent>().map(|k| (k.key(), k.shift_key()));
    let key = keyboard.as_ref().map(|(key, shift)| KeyInfo { key: key.as_str(), shift: *shift });
    let Some(action) = resolve(kind, &path, key) else {
        return;
    };
    // Keep links, form buttons and Enter-in-input from doing their own thing
    if kind != EventKind::Change && action.kind != ActionKind::CloseModal {
        event.prevent_default();
    }
    if !handlers.dispatch(&action) {
        web_sys::console::warn_1(&format!("[DISPATCH] Unhandled action {}", action.kind.as_str()).into());
    }
}

/// Snapshots from the target up to (and including) the body
fn snapshot_path(target: &Element) -> Vec<ElementSnapshot> {
    let mut path = Vec::new();
    let mut current = Some(target.clone());
    while let Some(el) = current {
        path.push(snapshot(&el));
        if el.tag_name().eq_ignore_ascii_case("body") {
            break;
        }
        current = el.parent_element();
    }
    path
}

fn snapshot(el: &Element) -> ElementSnapshot {
    let mut dataset = BTreeMap::new();
    for name in el.get_attribute_names().iter().filter_map(|n| n.as_string()) {
        if let (Some(key), Some(value)) = (dataset_key(&name), el.get_attribute(&name)) {
            dataset.insert(key, value);
        }
    }

    let (value, checked) = if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        let checked = matches!(input.type_().as_str(), "checkbox" | "radio").then(|| input.checked());
        (Some(input.value()), checked)
    } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
        (Some(area.value()), None)
    } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
        (Some(select.value()), None)
    } else {
        (None, None)
    };

    let id = el.id();
    ElementSnapshot {
        tag: el.tag_name().to_lowercase(),
        id: (!id.is_empty()).then_some(id),
        // `className` is not a string on SVG elements
        classes: el
            .get_attribute("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default(),
        dataset,
        value,
        checked,
        disabled: el.has_attribute("disabled"),
    }
}
