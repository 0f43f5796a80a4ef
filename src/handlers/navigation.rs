//! Navigation, modal and toast handlers

use leptos::prelude::*;
use trip_core::dispatch::Action;

use crate::context::AppContext;
use crate::models::{Modal, Section};
use crate::store::AppStateStoreFields;

pub fn show_section(ctx: AppContext, action: &Action) {
    let Some(section) = action.data("section").and_then(Section::from_key) else {
        return;
    };
    ctx.store.section().set(section);
    ctx.store.mobile_menu_open().set(false);
    if let Some(window) = web_sys::window() {
        window.scroll_to_with_x_and_y(0.0, 0.0);
    }
}

pub fn toggle_mobile_menu(ctx: AppContext, _action: &Action) {
    ctx.store.mobile_menu_open().update(|open| *open = !*open);
}

pub fn close_mobile_menu(ctx: AppContext, _action: &Action) {
    ctx.store.mobile_menu_open().set(false);
}

pub fn open_modal(ctx: AppContext, action: &Action) {
    let modal = match action.data("modal") {
        Some("activity") => action.data("id").map(|id| Modal::Activity { id: id.to_string() }),
        Some("answer") => ctx.store.last_answer().get_untracked().map(|text| Modal::Answer {
            title: "תשובת העוזר".to_string(),
            text,
            day: None,
        }),
        _ => None,
    };
    if modal.is_some() {
        ctx.store.modal().set(modal);
    }
}

/// Also bound to Escape, so it closes the mobile menu too
pub fn close_modal(ctx: AppContext, _action: &Action) {
    if ctx.store.modal().with_untracked(Option::is_some) {
        ctx.store.modal().set(None);
    }
    ctx.store.mobile_menu_open().set(false);
}

pub fn dismiss_toast(ctx: AppContext, _action: &Action) {
    ctx.flow.dismiss_visible();
}
