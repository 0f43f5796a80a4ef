//! Packing View
//!
//! Fixed per-category checklist, family-added items and packing photos.

use leptos::prelude::*;

use trip_core::packing::{category_progress, PackingProgress};
use trip_core::state::DEFAULT_PACKING_CATEGORY;
use trip_core::upload::UploadCategory;

use crate::components::{Loading, PhotoGrid};
use crate::models::{PackingItem, SharedPackingItem};
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn PackingSection() -> impl IntoView {
    let store = use_app_store();

    let overall = move || {
        store.trip().with(|trip| {
            trip.packing_list_data
                .as_ref()
                .map(|list| PackingProgress::of(list, trip.interactive_packing.as_deref().unwrap_or_default()))
        })
    };

    let fixed_list = move || {
        let list = store.trip().with(|trip| trip.packing_list_data.clone());
        let Some(list) = list else {
            return view! { <Loading /> }.into_any();
        };
        list.into_iter()
            .map(|(category, items)| view! { <PackingCategory category=category items=items /> })
            .collect_view()
            .into_any()
    };

    let shared_list = move || {
        let shared = store.trip().with(|trip| trip.interactive_packing.clone());
        let Some(shared) = shared else {
            return view! { <Loading /> }.into_any();
        };
        if shared.is_empty() {
            return view! { <p class="empty-state">"עוד לא נוספו פריטים"</p> }.into_any();
        }
        view! {
            <ul class="shared-packing-list">
                {shared.into_iter().enumerate().map(|(index, item)| view! { <SharedItem index=index item=item /> }).collect_view()}
            </ul>
        }
        .into_any()
    };

    let category_options = move || {
        let mut names: Vec<String> =
            store.trip().with(|trip| trip.packing_list_data.as_ref().map(|l| l.keys().cloned().collect()).unwrap_or_default());
        if !names.iter().any(|n| n == DEFAULT_PACKING_CATEGORY) {
            names.insert(0, DEFAULT_PACKING_CATEGORY.to_string());
        }
        names.into_iter().map(|name| { let value = name.clone(); view! { <option value=value>{name}</option> } }).collect_view()
    };

    view! {
        <section class="section packing-section">
            <h2>"🧳 רשימת ציוד"</h2>
            {move || overall().map(|progress| view! {
                <div class="packing-progress">
                    <div class="progress-bar">
                        <div class="progress-fill" style=format!("width: {}%", progress.percent)></div>
                    </div>
                    <span>{format!("{}/{} ארוזים ({}%)", progress.checked, progress.total, progress.percent)}</span>
                </div>
            })}
            <div class="packing-categories">{fixed_list}</div>

            <h3>"➕ פריטים שהמשפחה הוסיפה"</h3>
            <div class="add-packing-form">
                <input id="packing-item-name" type="text" placeholder="מה עוד צריך לארוז?" data-enter-action="add-shared-packing" />
                <select id="packing-item-category">{category_options}</select>
                <button id="add-packing-item-btn">"הוסף"</button>
            </div>
            {shared_list}

            <button id="reset-packing-btn" class="secondary-btn">"🔄 איפוס סימונים"</button>

            <h3>"📸 תמונות אריזה"</h3>
            <label class="upload-label">
                "העלאת תמונות"
                <input id="packing-photo-input" type="file" accept="image/*" multiple data-category="packing" />
            </label>
            <PhotoGrid category=UploadCategory::Packing />
        </section>
    }
}

#[component]
fn PackingCategory(category: String, items: Vec<PackingItem>) -> impl IntoView {
    let progress = category_progress(&items);

    view! {
        <div class="packing-category">
            <h4>{category.clone()} <span class="category-count">{format!("{}/{}", progress.checked, progress.total)}</span></h4>
            <ul>
                {items.into_iter().enumerate().map(|(index, item)| view! {
                    <li class={if item.checked { "packing-item checked" } else { "packing-item" }}>
                        <label>
                            <input
                                type="checkbox"
                                class="packing-checkbox"
                                data-category=category.clone()
                                data-index=index.to_string()
                                prop:checked=item.checked
                            />
                            {item.name}
                        </label>
                    </li>
                }).collect_view()}
            </ul>
        </div>
    }
}

#[component]
fn SharedItem(index: usize, item: SharedPackingItem) -> impl IntoView {
    let meta = if item.added_by.is_empty() { item.category.clone() } else { format!("{} · {}", item.category, item.added_by) };

    view! {
        <li class={if item.checked { "packing-item checked" } else { "packing-item" }}>
            <label>
                <input type="checkbox" class="shared-packing-checkbox" data-index=index.to_string() prop:checked=item.checked />
                {item.name}
            </label>
            <span class="item-meta">{meta}</span>
            <button class="icon-btn" data-action="remove-shared-packing" data-index=index.to_string() aria-label="הסר">
                "✕"
            </button>
        </li>
    }
}
