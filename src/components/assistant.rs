//! AI Assistant
//!
//! Free-text trip questions with "save as plan", the family chat with the
//! model, and the saved plans list.

use leptos::prelude::*;

use trip_core::state::display_time;

use crate::components::Loading;
use crate::markdown::parse_markdown;
use crate::models::{ChatMessage, ChatRole, CustomPlan};
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn AssistantSection() -> impl IntoView {
    view! {
        <section class="section assistant-section">
            <h2>"🤖 העוזר החכם"</h2>
            <AskPanel />
            <ChatPanel />
            <SavedPlans />
        </section>
    }
}

#[component]
fn AskPanel() -> impl IntoView {
    let store = use_app_store();

    let day_options = move || {
        let days: Vec<u32> =
            store.trip().with(|trip| trip.itinerary_data.iter().flatten().map(|day| day.day_index).collect());
        days.into_iter()
            .map(|day| view! { <option value=day.to_string()>{format!("יום {}", day)}</option> })
            .collect_view()
    };

    view! {
        <div class="ask-panel">
            <h3>"שאלו כל דבר על הטיול"</h3>
            <textarea id="ai-prompt-input" rows="3" placeholder="למשל: מה כדאי לעשות ביום גשום?"></textarea>
            <button id="ask-ai-btn" disabled=move || store.ai_pending().get()>
                {move || if store.ai_pending().get() { "חושב..." } else { "✨ שאל" }}
            </button>
            {move || store.last_answer().get().map(|answer| view! {
                <div class="ai-answer">
                    <div class="markdown" inner_html=parse_markdown(&answer)></div>
                    <div class="save-plan-form">
                        <input id="plan-title" type="text" placeholder="שם לתוכנית (לא חובה)" />
                        <select id="plan-day">
                            <option value="">"כללי"</option>
                            {day_options}
                        </select>
                        <button id="save-ai-plan-btn">"💾 שמור כתוכנית"</button>
                        <button class="secondary-btn" data-action="open-modal" data-modal="answer">"⤢ הגדל"</button>
                    </div>
                </div>
            })}
        </div>
    }
}

#[component]
fn ChatPanel() -> impl IntoView {
    let store = use_app_store();

    let transcript = move || {
        let messages = store.trip().with(|trip| trip.chat_messages.clone());
        match messages {
            None => view! { <Loading /> }.into_any(),
            Some(messages) if messages.is_empty() => {
                view! { <p class="empty-state">"שלום! אני כאן לכל שאלה על ז'נבה 👋"</p> }.into_any()
            }
            Some(messages) => messages.into_iter().map(|message| view! { <Bubble message=message /> }).collect_view().into_any(),
        }
    };

    view! {
        <div class="chat-panel">
            <h3>"💬 צ'אט"</h3>
            <div class="chat-messages">
                {transcript}
                <Show when=move || store.chat_pending().get()>
                    <div class="chat-bubble assistant typing">"..."</div>
                </Show>
            </div>
            <div class="chat-input-row">
                <input id="chat-input" type="text" placeholder="כתבו הודעה..." autocomplete="off" />
                <button id="send-chat-btn" disabled=move || store.chat_pending().get()>"שלח"</button>
                <button id="clear-chat-btn" class="secondary-btn">"🗑️"</button>
            </div>
        </div>
    }
}

#[component]
fn Bubble(message: ChatMessage) -> impl IntoView {
    let body = match message.role {
        ChatRole::User => view! { <div class="chat-text">{message.text}</div> }.into_any(),
        ChatRole::Assistant => view! { <div class="chat-text markdown" inner_html=parse_markdown(&message.text)></div> }.into_any(),
    };
    let class = match message.role {
        ChatRole::User => "chat-bubble user",
        ChatRole::Assistant => "chat-bubble assistant",
    };

    view! {
        <div class=class>
            {body}
            <span class="chat-time">{display_time(&message.timestamp)}</span>
        </div>
    }
}

#[component]
fn SavedPlans() -> impl IntoView {
    let store = use_app_store();

    view! {
        <div class="saved-plans">
            <h3>"📋 תוכניות שמורות"</h3>
            {move || {
                let plans = store.trip().with(|trip| trip.custom_plans.clone());
                match plans {
                    None => view! { <Loading /> }.into_any(),
                    Some(plans) if plans.is_empty() => view! { <p class="empty-state">"אין עדיין תוכניות שמורות"</p> }.into_any(),
                    Some(plans) => plans
                        .into_iter()
                        .enumerate()
                        .rev()
                        .map(|(index, plan)| view! { <PlanCard index=index plan=plan /> })
                        .collect_view()
                        .into_any(),
                }
            }}
        </div>
    }
}

#[component]
fn PlanCard(index: usize, plan: CustomPlan) -> impl IntoView {
    view! {
        <article class="plan-card">
            <header>
                <h4>{plan.title}</h4>
                {plan.day.map(|day| view! { <span class="plan-day">{format!("יום {}", day)}</span> })}
                <span class="post-time">{display_time(&plan.timestamp)}</span>
                <button class="icon-btn" data-action="delete-custom-plan" data-index=index.to_string() aria-label="מחק">
                    "✕"
                </button>
            </header>
            <div class="markdown" inner_html=parse_markdown(&plan.content)></div>
        </article>
    }
}
