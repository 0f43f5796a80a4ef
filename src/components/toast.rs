//! Toast Host
//!
//! Renders the single toast the feedback queue has on screen. Clicking it
//! dismisses it through the dispatcher (`data-action="dismiss-toast"`).

use leptos::prelude::*;

use crate::feedback::use_flow;

#[component]
pub fn ToastHost() -> impl IntoView {
    let flow = use_flow();

    view! {
        <div class="toast-container" aria-live="assertive">
            {move || flow.visible().map(|toast| view! {
                <div class=toast.kind.css_class() data-action="dismiss-toast">
                    <span class="toast-icon">{toast.kind.icon()}</span>
                    <span class="toast-message">{toast.message}</span>
                </div>
            })}
        </div>
    }
}
