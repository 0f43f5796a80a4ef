//! Bulletin board and family memories handlers

use trip_core::dispatch::Action;
use trip_core::state;

use super::{author_or_default, persist, report};
use crate::context::AppContext;
use crate::dom;
use crate::store::store_update_trip;

pub fn post_bulletin(ctx: AppContext, _action: &Action) {
    let author = author_or_default(ctx, "bulletin-author");
    let message = dom::input_value("bulletin-message");
    match store_update_trip(&ctx.store, |trip| state::post_bulletin(trip, &author, &message, chrono::Utc::now())) {
        Ok(op) => {
            dom::clear_input("bulletin-message");
            persist(ctx, vec![op], Some("ההודעה פורסמה בלוח"));
        }
        Err(e) => report(ctx, e, "נא לכתוב הודעה"),
    }
}

pub fn delete_bulletin(ctx: AppContext, action: &Action) {
    let Some(index) = action.data_index("index") else {
        return;
    };
    match store_update_trip(&ctx.store, |trip| state::delete_bulletin(trip, index)) {
        Ok(op) => persist(ctx, vec![op], Some("ההודעה נמחקה")),
        Err(e) => report(ctx, e, "לא ניתן למחוק את ההודעה"),
    }
}

pub fn add_memory(ctx: AppContext, _action: &Action) {
    let author = author_or_default(ctx, "memory-author");
    let text = dom::input_value("memory-text");
    let day = dom::input_number("memory-day");
    match store_update_trip(&ctx.store, |trip| state::add_memory(trip, &author, &text, day, chrono::Utc::now())) {
        Ok(op) => {
            dom::clear_input("memory-text");
            persist(ctx, vec![op], Some("הזיכרון נשמר 💛"));
        }
        Err(e) => report(ctx, e, "נא לכתוב את הזיכרון"),
    }
}
