//! DOM Helpers
//!
//! Handlers read form values straight from the page by element id. A
//! missing element reads as empty; nothing here fails.

use wasm_bindgen::JsCast;
use web_sys::{File, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

fn element(id: &str) -> Option<web_sys::Element> {
    web_sys::window()?.document()?.get_element_by_id(id)
}

/// Trimmed value of an input, textarea or select
pub fn input_value(id: &str) -> String {
    let Some(el) = element(id) else {
        return String::new();
    };
    let value = if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
        select.value()
    } else {
        String::new()
    };
    value.trim().to_string()
}

pub fn clear_input(id: &str) {
    let Some(el) = element(id) else {
        return;
    };
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        input.set_value("");
    } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
        area.set_value("");
    }
}

/// Files picked in a file input; clears the selection so the same file
/// can be picked again
pub fn take_files(id: &str) -> Vec<File> {
    let Some(input) = element(id).and_then(|el| el.dyn_into::<HtmlInputElement>().ok()) else {
        return Vec::new();
    };
    let files = input
        .files()
        .map(|list| (0..list.length()).filter_map(|i| list.get(i)).collect())
        .unwrap_or_default();
    input.set_value("");
    files
}

/// Optional numeric field (e.g. day selector); empty or invalid is `None`
pub fn input_number(id: &str) -> Option<u32> {
    input_value(id).parse().ok()
}
