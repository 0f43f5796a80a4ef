//! Family Board
//!
//! Bulletin board and shared memories, newest first.

use leptos::prelude::*;

use trip_core::state::display_time;

use crate::components::Loading;
use crate::models::{BulletinPost, Memory};
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn FamilySection() -> impl IntoView {
    let store = use_app_store();
    let display_name = store.display_name().get_untracked();

    let day_options = move || {
        let days: Vec<(u32, String)> = store.trip().with(|trip| {
            trip.itinerary_data
                .iter()
                .flatten()
                .map(|day| (day.day_index, day.title.clone()))
                .collect()
        });
        days.into_iter()
            .map(|(index, title)| view! { <option value=index.to_string()>{format!("יום {} - {}", index, title)}</option> })
            .collect_view()
    };

    let bulletins = move || {
        let posts = store.trip().with(|trip| trip.bulletin_board.clone());
        match posts {
            None => view! { <Loading /> }.into_any(),
            Some(posts) if posts.is_empty() => view! { <p class="empty-state">"הלוח ריק. כתבו משהו!"</p> }.into_any(),
            Some(posts) => view! {
                <ul class="bulletin-list">
                    {posts.into_iter().enumerate().rev().map(|(index, post)| view! { <BulletinCard index=index post=post /> }).collect_view()}
                </ul>
            }
            .into_any(),
        }
    };

    let memories = move || {
        let memories = store.trip().with(|trip| trip.family_memories.clone());
        match memories {
            None => view! { <Loading /> }.into_any(),
            Some(memories) if memories.is_empty() => view! { <p class="empty-state">"עוד אין זיכרונות"</p> }.into_any(),
            Some(memories) => view! {
                <ul class="memory-list">
                    {memories.into_iter().rev().map(|memory| view! { <MemoryCard memory=memory /> }).collect_view()}
                </ul>
            }
            .into_any(),
        }
    };

    view! {
        <section class="section family-section">
            <h2>"👨‍👩‍👧‍👦 לוח המשפחה"</h2>
            <div class="board-form">
                <input id="bulletin-author" type="text" placeholder="השם שלך" value=display_name.clone() />
                <textarea id="bulletin-message" rows="3" placeholder="מה רציתם לספר?"></textarea>
                <button id="post-bulletin-btn">"📌 פרסם"</button>
            </div>
            {bulletins}

            <h3>"💛 זיכרונות מהטיול"</h3>
            <div class="board-form">
                <input id="memory-author" type="text" placeholder="השם שלך" value=display_name />
                <select id="memory-day">
                    <option value="">"בלי יום מסוים"</option>
                    {day_options}
                </select>
                <textarea id="memory-text" rows="3" placeholder="רגע שלא רוצים לשכוח..."></textarea>
                <button id="add-memory-btn">"שמור זיכרון"</button>
            </div>
            {memories}
        </section>
    }
}

#[component]
fn BulletinCard(index: usize, post: BulletinPost) -> impl IntoView {
    view! {
        <li class="bulletin-card">
            <header>
                <strong>{post.author}</strong>
                <span class="post-time">{display_time(&post.timestamp)}</span>
                <button class="icon-btn" data-action="delete-bulletin" data-index=index.to_string() aria-label="מחק">
                    "✕"
                </button>
            </header>
            <p>{post.message}</p>
        </li>
    }
}

#[component]
fn MemoryCard(memory: Memory) -> impl IntoView {
    view! {
        <li class="memory-card">
            <p>{memory.text}</p>
            <footer>
                <span>{memory.author}</span>
                {memory.day.map(|day| view! { <span class="memory-day">{format!("יום {}", day)}</span> })}
                <span class="post-time">{display_time(&memory.timestamp)}</span>
            </footer>
        </li>
    }
}
