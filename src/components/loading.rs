//! Loading Indicators

use leptos::prelude::*;

use crate::feedback::use_flow;

/// Placeholder shown while a collection is not loaded yet
#[component]
pub fn Loading() -> impl IntoView {
    view! { <div class="loading-placeholder">"טוען..."</div> }
}

/// Global spinner, visible while any loading token is active
#[component]
pub fn Spinner() -> impl IntoView {
    let flow = use_flow();

    view! {
        <Show when=move || flow.is_spinner_visible()>
            <div class="spinner-overlay" role="status" aria-live="polite">
                <div class="spinner"></div>
                <div class="spinner-message">{move || flow.loading_message().unwrap_or_default()}</div>
            </div>
        </Show>
    }
}
