//! Top Navigation Bar

use leptos::prelude::*;

use crate::models::Section;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn NavBar() -> impl IntoView {
    let store = use_app_store();

    view! {
        <header class="top-bar">
            <div class="brand">"🇨🇭 ז'נבה 2025"</div>
            <nav class="desktop-nav">
                {Section::ALL.iter().map(|section| {
                    let section = *section;
                    view! {
                        <button
                            class=move || if store.section().get() == section { "nav-link active" } else { "nav-link" }
                            data-section=section.key()
                        >
                            {section.icon()} " " {section.label()}
                        </button>
                    }
                }).collect_view()}
            </nav>
            <button id="mobile-menu-btn" class="mobile-menu-btn" aria-label="תפריט">
                {move || if store.mobile_menu_open().get() { "✕" } else { "☰" }}
            </button>
        </header>
    }
}
