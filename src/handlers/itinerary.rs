//! Itinerary handlers

use leptos::prelude::*;
use leptos::task::spawn_local;

use trip_core::ai::{day_plan_prompt, GenerateRequest, Part};
use trip_core::dispatch::Action;

use super::ask_model;
use crate::context::AppContext;
use crate::models::{Modal, PlanChoice};
use crate::store::AppStateStoreFields;

fn day_of(action: &Action) -> Option<u32> {
    action.data("day").and_then(|d| d.parse().ok())
}

pub fn select_plan(ctx: AppContext, action: &Action) {
    let Some(day) = day_of(action) else {
        return;
    };
    let choice = PlanChoice::from_str(action.data("plan").unwrap_or("main"));
    ctx.store.plan_choice().update(|plans| {
        plans.insert(day, choice);
    });
}

pub fn ask_ai_for_day(ctx: AppContext, action: &Action) {
    let Some(day) = day_of(action) else {
        return;
    };
    let prompt = ctx.store.trip().with_untracked(|trip| {
        trip.itinerary_data
            .as_ref()
            .and_then(|days| days.iter().find(|d| d.day_index == day))
            .map(|entry| day_plan_prompt(entry, trip))
    });
    let Some(prompt) = prompt else {
        ctx.flow.warning("היום הזה לא נמצא במסלול");
        return;
    };
    if ctx.store.ai_pending().get_untracked() {
        return;
    }
    ctx.store.ai_pending().set(true);

    spawn_local(async move {
        let reply = ask_model(ctx, "day-plan", "חושב על היום...", GenerateRequest::single(vec![Part::text(prompt)])).await;
        ctx.store.ai_pending().set(false);
        if let Some(text) = reply {
            ctx.store.last_answer().set(Some(text.clone()));
            ctx.store.modal().set(Some(Modal::Answer {
                title: format!("רעיונות ליום {}", day),
                text,
                day: Some(day),
            }));
        }
    });
}
