//! Activities View
//!
//! Category and travel-time filters over the activity catalogue, revealed
//! in batches. The last batch button asks the model for more.

use leptos::prelude::*;

use trip_core::activities::categories;

use crate::components::Loading;
use crate::models::{Activity, CategoryFilter, TimeFilter};
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn ActivitiesSection() -> impl IntoView {
    let store = use_app_store();

    let category_buttons = move || {
        let found = store.trip().with(|trip| trip.activities_data.as_deref().map(categories).unwrap_or_default());
        let active = store.filters().with(|f| f.category.clone());
        std::iter::once(CategoryFilter::All)
            .chain(found.into_iter().map(CategoryFilter::Exact))
            .map(|filter| {
                let class = if filter == active { "filter-btn active" } else { "filter-btn" };
                let label = match &filter {
                    CategoryFilter::All => "הכל".to_string(),
                    CategoryFilter::Exact(category) => category.clone(),
                };
                view! { <button class=class data-category=filter.key().to_string()>{label}</button> }
            })
            .collect_view()
    };

    let time_buttons = move || {
        let active = store.filters().with(|f| f.time);
        TimeFilter::ALL
            .iter()
            .map(|filter| {
                let class = if *filter == active { "time-filter-btn active" } else { "time-filter-btn" };
                view! { <button class=class data-time=filter.key()>{filter.label()}</button> }
            })
            .collect_view()
    };

    let listing = move || {
        let filters = store.filters().get();
        let pager = store.pager().get();
        let highlighted = store.highlighted().get();
        let page = store.trip().with(|trip| {
            trip.activities_data.as_ref().map(|all| {
                let filtered = filters.apply(all);
                let total = filtered.len();
                let shown: Vec<Activity> = filtered.into_iter().take(pager.visible_count(total)).cloned().collect();
                (shown, pager.has_more(total))
            })
        });
        let Some((shown, has_more)) = page else {
            return view! { <Loading /> }.into_any();
        };
        let empty = shown.is_empty();
        view! {
            <div class="activities-grid">
                {shown.into_iter().map(|activity| {
                    let fresh = highlighted.contains(&activity.highlight_key());
                    view! { <ActivityCard activity=activity highlighted=fresh /> }
                }).collect_view()}
            </div>
            {empty.then(|| view! { <p class="empty-state">"אין פעילויות שמתאימות לסינון"</p> })}
            <button
                id="load-more-activities"
                class="load-more-btn"
                disabled=move || store.generating_activities().get()
            >
                {move || {
                    if store.generating_activities().get() {
                        "מחפש רעיונות..."
                    } else if has_more {
                        "הצג עוד"
                    } else {
                        "✨ גלו עוד פעילויות עם AI"
                    }
                }}
            </button>
        }
        .into_any()
    };

    view! {
        <section class="section activities-section">
            <h2>"🎡 פעילויות"</h2>
            <div class="filter-bar">{category_buttons}</div>
            <div class="filter-bar time-filters">{time_buttons}</div>
            {listing}
        </section>
    }
}

#[component]
fn ActivityCard(activity: Activity, highlighted: bool) -> impl IntoView {
    let class = if highlighted { "activity-card highlight" } else { "activity-card" };
    let badge = activity.generated.unwrap_or(false).then(|| view! { <span class="ai-badge">"AI"</span> });

    view! {
        <article class=class data-action="open-modal" data-modal="activity" data-id=activity.id.clone()>
            <header>
                <h3>{activity.name.clone()} {badge}</h3>
                <span class="activity-category">{activity.category.clone()}</span>
            </header>
            <ul class="activity-meta">
                {(!activity.time.is_empty()).then(|| view! { <li>"🚗 " {activity.time.clone()}</li> })}
                {(!activity.cost.is_empty()).then(|| view! { <li>"💰 " {activity.cost.clone()}</li> })}
            </ul>
            <p class="activity-description">{activity.description.clone()}</p>
        </article>
    }
}
