//! Itinerary View
//!
//! One card per day showing the selected plan. Plan items that point at an
//! activity show its name (looked up by id, then by name); others show their
//! description.

use leptos::prelude::*;

use crate::components::Loading;
use crate::models::{DayEntry, Plan, PlanItem, TripData};
use crate::store::{store_plan_choice, use_app_store, AppStateStoreFields};

#[component]
pub fn ItinerarySection() -> impl IntoView {
    let store = use_app_store();

    view! {
        <section class="section itinerary-section">
            <h2>"🗓️ המסלול שלנו"</h2>
            {move || {
                let days = store.trip().read().itinerary_data.clone();
                match days {
                    None => view! { <Loading /> }.into_any(),
                    Some(days) if days.is_empty() => {
                        view! { <p class="empty-state">"המסלול עדיין ריק"</p> }.into_any()
                    }
                    Some(days) => days.into_iter().map(|day| view! { <DayCard day=day /> }).collect_view().into_any(),
                }
            }}
        </section>
    }
}

#[component]
fn DayCard(day: DayEntry) -> impl IntoView {
    let store = use_app_store();
    let index = day.day_index;
    let plans = day.available_plans();
    let subtitle = [day.day_name.as_str(), day.date.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" · ");
    let title = day.title.clone();
    let solo_tip = day.solo_tip.clone();

    view! {
        <article class="day-card">
            <header class="day-header">
                <span class="day-badge">{format!("יום {}", index)}</span>
                <div>
                    <h3>{title}</h3>
                    <span class="day-date">{subtitle}</span>
                </div>
            </header>
            {(plans.len() > 1).then(|| view! {
                <div class="plan-tabs">
                    {plans.into_iter().map(|choice| view! {
                        <button
                            class=move || if store_plan_choice(&store, index) == choice { "plan-tab active" } else { "plan-tab" }
                            data-day=index.to_string()
                            data-plan=choice.as_str()
                        >
                            {choice.label()}
                        </button>
                    }).collect_view()}
                </div>
            })}
            {move || day.plan(store_plan_choice(&store, index)).cloned().map(|plan| view! { <PlanView plan=plan /> })}
            {solo_tip.map(|tip| view! { <div class="solo-tip">"💡 " {tip}</div> })}
            <button
                class="ask-ai-day-btn"
                data-action="ask-ai-for-day"
                data-day=index.to_string()
                disabled=move || store.ai_pending().get()
            >
                "✨ רעיונות מ-AI ליום הזה"
            </button>
        </article>
    }
}

/// Display line for a plan item, with the activity id when it resolved
fn describe(trip: &TripData, item: &PlanItem) -> (String, Option<String>) {
    let activity = item.activity_id.as_deref().and_then(|id| trip.find_activity(id));
    match (activity, &item.description) {
        (Some(activity), _) => (activity.name.clone(), Some(activity.id.clone())),
        (None, Some(description)) => (description.clone(), None),
        (None, None) => (item.activity_id.clone().unwrap_or_default(), None),
    }
}

#[component]
fn PlanView(plan: Plan) -> impl IntoView {
    let store = use_app_store();
    let title = plan.title.clone();

    view! {
        <div class="plan">
            {(!title.is_empty()).then(|| view! { <h4 class="plan-title">{title}</h4> })}
            <ol class="plan-items">
                {move || {
                    let lines: Vec<_> = {
                        let trip = store.trip().read();
                        plan.items.iter().map(|item| describe(&trip, item)).collect()
                    };
                    lines.into_iter().map(|(label, activity_id)| match activity_id {
                        Some(id) => view! {
                            <li class="plan-item linked" data-action="open-modal" data-modal="activity" data-id=id>
                                {label}
                            </li>
                        }.into_any(),
                        None => view! { <li class="plan-item">{label}</li> }.into_any(),
                    }).collect_view()
                }}
            </ol>
        </div>
    }
}
