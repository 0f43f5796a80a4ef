//! Activity filter and pagination handlers

use leptos::prelude::*;
use leptos::task::spawn_local;

use trip_core::activities::{PageStep, PAGE_SIZE};
use trip_core::ai::{activity_generation_prompt, parse_generated_activities, GenerateRequest};
use trip_core::dispatch::Action;
use trip_core::state;

use super::{ask_model, persist, report};
use crate::context::AppContext;
use crate::models::{CategoryFilter, TimeFilter};
use crate::store::{store_highlight, store_update_trip, AppStateStoreFields};

pub fn filter_category(ctx: AppContext, action: &Action) {
    let key = action.data("category").or(action.value.as_deref()).unwrap_or("all");
    ctx.store.filters().update(|f| f.category = CategoryFilter::from_key(key));
    ctx.store.pager().update(|p| p.reset());
}

pub fn filter_time(ctx: AppContext, action: &Action) {
    let key = action.data("time").unwrap_or("all");
    ctx.store.filters().update(|f| f.time = TimeFilter::from_key(key));
    ctx.store.pager().update(|p| p.reset());
}

fn filtered_count(ctx: AppContext) -> usize {
    let filters = ctx.store.filters().get_untracked();
    ctx.store
        .trip()
        .with_untracked(|trip| trip.activities_data.as_deref().map(|list| filters.apply(list).len()))
        .unwrap_or(0)
}

/// Reveal the next batch; once the cached list is exhausted ask the model
/// for more
pub fn load_more(ctx: AppContext, _action: &Action) {
    let total = filtered_count(ctx);
    let mut step = PageStep::NeedsGeneration;
    ctx.store.pager().update(|p| step = p.load_more(total));
    if let PageStep::Revealed { from, to } = step {
        web_sys::console::log_1(&format!("[ACTIVITIES] Showing {}..{} of {}", from, to, total).into());
        return;
    }
    if ctx.store.generating_activities().get_untracked() {
        return;
    }
    ctx.store.generating_activities().set(true);

    let category = match ctx.store.filters().get_untracked().category {
        CategoryFilter::Exact(category) => Some(category),
        CategoryFilter::All => None,
    };
    let prompt = ctx.store.trip().with_untracked(|trip| {
        activity_generation_prompt(trip.activities_data.as_deref().unwrap_or_default(), category.as_deref(), PAGE_SIZE)
    });

    spawn_local(async move {
        let reply = ask_model(ctx, "activities", "מחפש אטרקציות נוספות...", GenerateRequest::structured(prompt)).await;
        ctx.store.generating_activities().set(false);
        let Some(reply) = reply else {
            return;
        };
        let generated = match parse_generated_activities(&reply) {
            Ok(generated) => generated,
            Err(e) => return report(ctx, e, "לא הצלחנו להבין את ההצעות, נסו שוב"),
        };
        let (added, op) = match store_update_trip(&ctx.store, |trip| {
            state::add_generated_activities(trip, generated, chrono::Utc::now())
        }) {
            Ok(result) => result,
            Err(e) => return report(ctx, e, "לא ניתן לשמור את האטרקציות החדשות"),
        };
        if added.is_empty() {
            ctx.flow.info("לא נמצאו אטרקציות חדשות שלא ברשימה");
            return;
        }
        store_highlight(&ctx.store, added.iter().map(|a| a.highlight_key()));
        let total = filtered_count(ctx);
        ctx.store.pager().update(|p| {
            p.load_more(total);
        });
        persist(ctx, op.into_iter().collect(), None);
        ctx.flow.celebration(&format!("נוספו {} אטרקציות חדשות!", added.len()));
    });
}
