//! Chat, free-text AI and saved plan handlers

use leptos::prelude::*;
use leptos::task::spawn_local;

use trip_core::ai::{chat_request, trip_question_prompt, GenerateRequest, Part};
use trip_core::dispatch::Action;
use trip_core::state;

use super::{ask_model, persist, report};
use crate::context::AppContext;
use crate::dom;
use crate::models::{ChatRole, Modal};
use crate::store::{store_update_trip, AppStateStoreFields};

pub fn send_chat(ctx: AppContext, _action: &Action) {
    let message = dom::input_value("chat-input");
    if message.is_empty() || ctx.store.chat_pending().get_untracked() {
        return;
    }
    dom::clear_input("chat-input");
    let request = ctx
        .store
        .trip()
        .with_untracked(|trip| chat_request(trip.chat_messages.as_deref().unwrap_or_default(), &message));
    match store_update_trip(&ctx.store, |trip| state::push_chat(trip, ChatRole::User, &message, chrono::Utc::now())) {
        Ok(op) => persist(ctx, vec![op], None),
        Err(e) => return report(ctx, e, "לא ניתן לשלוח את ההודעה"),
    }
    ctx.store.chat_pending().set(true);

    spawn_local(async move {
        let reply = ask_model(ctx, "chat", "העוזר מקליד...", request).await;
        ctx.store.chat_pending().set(false);
        if let Some(text) = reply {
            match store_update_trip(&ctx.store, |trip| {
                state::push_chat(trip, ChatRole::Assistant, &text, chrono::Utc::now())
            }) {
                Ok(op) => persist(ctx, vec![op], None),
                Err(e) => report(ctx, e, "לא ניתן לשמור את התשובה"),
            }
        }
    });
}

pub fn clear_chat(ctx: AppContext, _action: &Action) {
    let confirmed = web_sys::window()
        .and_then(|w| w.confirm_with_message("למחוק את כל השיחה?").ok())
        .unwrap_or(false);
    if confirmed {
        let op = store_update_trip(&ctx.store, state::clear_chat);
        persist(ctx, vec![op], Some("השיחה נמחקה"));
    }
}

pub fn ask_ai(ctx: AppContext, _action: &Action) {
    if ctx.store.ai_pending().get_untracked() {
        return;
    }
    let question = dom::input_value("ai-prompt-input");
    let prompt = match ctx.store.trip().with_untracked(|trip| trip_question_prompt(&question, trip)) {
        Ok(prompt) => prompt,
        Err(e) => return report(ctx, e, "נא לכתוב שאלה"),
    };
    ctx.store.ai_pending().set(true);

    spawn_local(async move {
        let reply = ask_model(ctx, "ask-ai", "חושב...", GenerateRequest::single(vec![Part::text(prompt)])).await;
        ctx.store.ai_pending().set(false);
        if let Some(text) = reply {
            dom::clear_input("ai-prompt-input");
            ctx.store.last_answer().set(Some(text));
        }
    });
}

/// Save the answer on screen (modal first, then the assistant panel)
pub fn save_custom_plan(ctx: AppContext, _action: &Action) {
    let (content, day) = match ctx.store.modal().get_untracked() {
        Some(Modal::Answer { text, day, .. }) => (text, day),
        _ => (ctx.store.last_answer().get_untracked().unwrap_or_default(), dom::input_number("plan-day")),
    };
    let typed = dom::input_value("plan-title");
    let title = if typed.is_empty() {
        match day {
            Some(day) => format!("תוכנית ליום {}", day),
            None => format!("תוכנית מ-{}", chrono::Local::now().format("%d/%m %H:%M")),
        }
    } else {
        typed
    };
    match store_update_trip(&ctx.store, |trip| state::save_custom_plan(trip, &title, &content, day, chrono::Utc::now())) {
        Ok(op) => {
            dom::clear_input("plan-title");
            ctx.store.modal().set(None);
            persist(ctx, vec![op], Some("התוכנית נשמרה"));
        }
        Err(e) => report(ctx, e, "אין תשובה לשמור"),
    }
}

pub fn delete_custom_plan(ctx: AppContext, action: &Action) {
    let Some(index) = action.data_index("index") else {
        return;
    };
    match store_update_trip(&ctx.store, |trip| state::delete_custom_plan(trip, index)) {
        Ok(op) => persist(ctx, vec![op], Some("התוכנית נמחקה")),
        Err(e) => report(ctx, e, "לא ניתן למחוק את התוכנית"),
    }
}
