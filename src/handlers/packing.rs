//! Packing list handlers

use leptos::prelude::*;

use trip_core::dispatch::Action;
use trip_core::packing::PackingProgress;
use trip_core::state;

use super::{persist, report};
use crate::context::AppContext;
use crate::dom;
use crate::models::TripData;
use crate::store::{store_update_trip, AppStateStoreFields};

fn progress(trip: &TripData) -> PackingProgress {
    match &trip.packing_list_data {
        Some(list) => PackingProgress::of(list, trip.interactive_packing.as_deref().unwrap_or_default()),
        None => PackingProgress::default(),
    }
}

/// Celebrate the toggle that completes the list
fn celebrate_if_done(ctx: AppContext, before: PackingProgress) {
    let after = ctx.store.trip().with_untracked(progress);
    if after.is_complete() && !before.is_complete() {
        ctx.flow.celebration("הכל ארוז! אפשר לצאת לדרך 🎉");
    }
}

pub fn toggle_packing(ctx: AppContext, action: &Action) {
    let (Some(category), Some(index)) = (action.data("category"), action.data_index("index")) else {
        return;
    };
    let checked = action.checked.unwrap_or(false);
    let before = ctx.store.trip().with_untracked(progress);
    match store_update_trip(&ctx.store, |trip| state::set_packing_checked(trip, category, index, checked)) {
        Ok(op) => {
            persist(ctx, vec![op], None);
            celebrate_if_done(ctx, before);
        }
        Err(e) => report(ctx, e, "לא ניתן לעדכן את הפריט"),
    }
}

pub fn toggle_shared_packing(ctx: AppContext, action: &Action) {
    let Some(index) = action.data_index("index") else {
        return;
    };
    let checked = action.checked.unwrap_or(false);
    let before = ctx.store.trip().with_untracked(progress);
    match store_update_trip(&ctx.store, |trip| state::set_shared_packing_checked(trip, index, checked)) {
        Ok(ops) => {
            persist(ctx, ops, None);
            celebrate_if_done(ctx, before);
        }
        Err(e) => report(ctx, e, "לא ניתן לעדכן את הפריט"),
    }
}

pub fn add_shared_packing(ctx: AppContext, _action: &Action) {
    let name = dom::input_value("packing-item-name");
    let category = dom::input_value("packing-item-category");
    let added_by = ctx.store.display_name().get_untracked();
    let result = store_update_trip(&ctx.store, |trip| {
        state::add_shared_packing(trip, &name, &category, &added_by, chrono::Utc::now())
    });
    match result {
        Ok((item, op)) => {
            dom::clear_input("packing-item-name");
            persist(ctx, vec![op], Some("הפריט נוסף לרשימה"));
            web_sys::console::log_1(&format!("[PACKING] Added {} ({})", item.name, item.category).into());
        }
        Err(e @ trip_core::DomainError::Rejected(_)) => report(ctx, e, "הפריט כבר נמצא ברשימה"),
        Err(e) => report(ctx, e, "נא לכתוב שם פריט"),
    }
}

pub fn remove_shared_packing(ctx: AppContext, action: &Action) {
    let Some(index) = action.data_index("index") else {
        return;
    };
    match store_update_trip(&ctx.store, |trip| state::remove_shared_packing(trip, index)) {
        Ok(op) => persist(ctx, vec![op], Some("הפריט הוסר")),
        Err(e) => report(ctx, e, "לא ניתן להסיר את הפריט"),
    }
}

pub fn reset_packing(ctx: AppContext, _action: &Action) {
    let confirmed = web_sys::window()
        .and_then(|w| w.confirm_with_message("לאפס את כל הסימונים ברשימת הציוד?").ok())
        .unwrap_or(false);
    if !confirmed {
        return;
    }
    let ops = match store_update_trip(&ctx.store, state::reset_packing) {
        Ok(ops) => ops,
        Err(e) => return report(ctx, e, "לא ניתן לאפס את הרשימה"),
    };
    if ops.is_empty() {
        ctx.flow.info("אין מה לאפס");
        return;
    }
    persist(ctx, ops, Some("רשימת הציוד אופסה"));
}
