//! Modal Host
//!
//! Renders the single open modal. The backdrop is a sibling of the dialog
//! so clicks inside the dialog never reach it.

use leptos::prelude::*;

use crate::markdown::parse_markdown;
use crate::models::{Activity, Modal};
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn ModalHost() -> impl IntoView {
    let store = use_app_store();

    move || {
        store.modal().get().map(|modal| {
            let body = match modal {
                Modal::Photo { url, caption } => view! {
                    <figure class="modal-photo">
                        <img src=url alt=caption.clone() />
                        <figcaption>{caption}</figcaption>
                    </figure>
                }
                .into_any(),
                Modal::Activity { id } => {
                    let activity = store.trip().with(|trip| trip.find_activity(&id).cloned());
                    match activity {
                        Some(activity) => view! { <ActivityDetail activity=activity /> }.into_any(),
                        None => view! { <p class="empty-state">"הפעילות לא נמצאה"</p> }.into_any(),
                    }
                }
                Modal::Answer { title, text, .. } => view! {
                    <h3>{title}</h3>
                    <div class="markdown" inner_html=parse_markdown(&text)></div>
                    <div class="modal-actions">
                        <button data-action="save-custom-plan">"💾 שמור כתוכנית"</button>
                    </div>
                }
                .into_any(),
            };
            view! {
                <div class="modal-backdrop" data-action="close-modal"></div>
                <div class="modal" role="dialog" aria-modal="true">
                    <button class="modal-close" aria-label="סגור">"✕"</button>
                    {body}
                </div>
            }
        })
    }
}

#[component]
fn ActivityDetail(activity: Activity) -> impl IntoView {
    let map_url = activity.map_url();
    let rows = [
        ("🏷️", activity.category.clone()),
        ("🚗", activity.time.clone()),
        ("💰", activity.cost.clone()),
        ("🚌", activity.transport.clone()),
        ("📍", activity.address.clone()),
    ];

    view! {
        <article class="activity-detail">
            <h3>{activity.name}</h3>
            <ul class="activity-meta">
                {rows
                    .into_iter()
                    .filter(|(_, value)| !value.is_empty())
                    .map(|(icon, value)| view! { <li>{icon} " " {value}</li> })
                    .collect_view()}
            </ul>
            <p>{activity.description}</p>
            <div class="activity-links">
                {activity.link.map(|href| view! {
                    <a href=href target="_blank" rel="noopener noreferrer">"🔗 לאתר"</a>
                })}
                {map_url.map(|href| view! {
                    <a href=href target="_blank" rel="noopener noreferrer">"🗺️ ניווט"</a>
                })}
            </div>
        </article>
    }
}
