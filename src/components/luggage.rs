//! Luggage Planner View

use leptos::prelude::*;

use crate::components::Loading;
use crate::markdown::parse_markdown;
use crate::models::Luggage;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn LuggageSection() -> impl IntoView {
    let store = use_app_store();

    let cards = move || {
        let bags = store.trip().with(|trip| trip.luggage_data.clone());
        match bags {
            None => view! { <Loading /> }.into_any(),
            Some(bags) if bags.is_empty() => view! { <p class="empty-state">"עוד לא נוספו מזוודות"</p> }.into_any(),
            Some(bags) => view! {
                <div class="luggage-grid">
                    {bags.into_iter().enumerate().map(|(index, bag)| view! { <LuggageCard index=index bag=bag /> }).collect_view()}
                </div>
            }
            .into_any(),
        }
    };

    view! {
        <section class="section luggage-section">
            <h2>"🧳 מתכנן המזוודות"</h2>
            <div class="luggage-form">
                <input id="luggage-name" type="text" placeholder="שם המזוודה (למשל: המזוודה הכחולה)" />
                <input id="luggage-owner" type="text" placeholder="של מי?" />
                <textarea id="luggage-items" rows="4" placeholder="מה בפנים? פריט בכל שורה או מופרד בפסיקים"></textarea>
                <button id="add-luggage-btn">"➕ הוסף מזוודה"</button>
            </div>
            {cards}
        </section>
    }
}

#[component]
fn LuggageCard(index: usize, bag: Luggage) -> impl IntoView {
    let store = use_app_store();
    let input_id = format!("luggage-photo-input-{}", index);
    let analysis = bag.analysis.as_deref().map(parse_markdown);

    view! {
        <article class="luggage-card">
            <header>
                <h3>{bag.name}</h3>
                {(!bag.owner.is_empty()).then(|| view! { <span class="luggage-owner">{bag.owner}</span> })}
                <button class="icon-btn" data-action="remove-luggage" data-index=index.to_string() aria-label="הסר">
                    "✕"
                </button>
            </header>
            <ul class="luggage-items">
                {bag.items.into_iter().map(|item| view! { <li>{item}</li> }).collect_view()}
            </ul>
            {bag.photo_url.map(|url| view! { <img class="luggage-photo" src=url alt="תמונת המזוודה" loading="lazy" /> })}
            {analysis.map(|html| view! { <div class="luggage-analysis markdown" inner_html=html></div> })}
            <label class="upload-label" class:disabled=move || store.ai_pending().get()>
                "📸 צלמו את המזוודה ו-AI יבדוק מה חסר"
                <input
                    id=input_id
                    type="file"
                    accept="image/*"
                    data-action="analyze-luggage"
                    data-index=index.to_string()
                    disabled=move || store.ai_pending().get()
                />
            </label>
        </article>
    }
}
