//! Mobile Menu
//!
//! Slide-in section list for narrow screens. Opening, closing and section
//! changes all go through the dispatcher; this only renders.

use leptos::prelude::*;

use crate::models::Section;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn MobileMenu() -> impl IntoView {
    let store = use_app_store();

    view! {
        <Show when=move || store.mobile_menu_open().get()>
            <div class="mobile-menu-backdrop" data-action="close-mobile-menu"></div>
            <nav class="mobile-menu">
                {Section::ALL.iter().map(|section| {
                    let section = *section;
                    view! {
                        <button
                            class=move || if store.section().get() == section { "nav-link mobile-nav-item active" } else { "nav-link mobile-nav-item" }
                            data-section=section.key()
                        >
                            <span class="mobile-nav-icon">{section.icon()}</span>
                            <span class="mobile-nav-label">{section.label()}</span>
                        </button>
                    }
                }).collect_view()}
            </nav>
        </Show>
    }
}
