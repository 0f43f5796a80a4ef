//! Geneva Trip Guide App
//!
//! Builds the store and feedback manager, bootstraps configuration and the
//! trip document, installs the event dispatcher and renders the active
//! section.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::commands;
use crate::components::{
    ActivitiesSection, AssistantSection, FamilySection, GallerySection, ItinerarySection, LuggageSection,
    ModalHost, NavBar, PackingSection, Spinner, ToastHost,
};
use crate::context::{load_display_name, load_user_id, AppContext};
use crate::dispatch;
use crate::feedback::Flow;
use crate::handlers;
use crate::mobile::MobileMenu;
use crate::models::Section;
use crate::store::{AppState, AppStateStoreFields, AppStore};

#[component]
pub fn App() -> impl IntoView {
    let store: AppStore = Store::new(AppState::new(load_user_id(), load_display_name()));
    let flow = Flow::new();
    let ctx = AppContext::new(store, flow);

    // Provide context to all children
    provide_context(store);
    provide_context(flow);
    provide_context(ctx);

    // Attach the delegated listeners once the body is there
    Effect::new(move |_| {
        if let Err(e) = dispatch::install(Rc::new(handlers::action_map(ctx))) {
            web_sys::console::error_1(&format!("[APP] Dispatcher not installed: {:?}", e).into());
        }
    });

    // Bootstrap: configuration first, then the trip document
    Effect::new(move |_| {
        spawn_local(bootstrap(ctx));
    });

    let active_section = move || match store.section().get() {
        Section::Itinerary => view! { <ItinerarySection /> }.into_any(),
        Section::Activities => view! { <ActivitiesSection /> }.into_any(),
        Section::Packing => view! { <PackingSection /> }.into_any(),
        Section::Gallery => view! { <GallerySection /> }.into_any(),
        Section::Family => view! { <FamilySection /> }.into_any(),
        Section::Luggage => view! { <LuggageSection /> }.into_any(),
        Section::Assistant => view! { <AssistantSection /> }.into_any(),
    };

    view! {
        <div class="app-layout" dir="rtl">
            <NavBar />
            <MobileMenu />
            <main class="main-content">{active_section}</main>
            <ModalHost />
            <ToastHost />
            <Spinner />
        </div>
    }
}

async fn bootstrap(ctx: AppContext) {
    let token = ctx.flow.show_loading("bootstrap", "טוען את נתוני הטיול...");

    let config = match commands::fetch_config().await {
        Ok(config) => config,
        Err(e) => {
            ctx.flow.hide_loading(&token);
            ctx.flow.error(&format!("טעינת ההגדרות נכשלה: {}", e));
            return;
        }
    };
    web_sys::console::log_1(&format!("[APP] Config loaded for trip {}", config.trip_id).into());

    match commands::load_trip(&config).await {
        Ok(trip) => {
            web_sys::console::log_1(
                &format!(
                    "[APP] Loaded trip: {} days, {} activities",
                    trip.itinerary_data.as_ref().map_or(0, Vec::len),
                    trip.activities_data.as_ref().map_or(0, Vec::len)
                )
                .into(),
            );
            ctx.store.trip().set(trip);
        }
        Err(e) => ctx.flow.error(&format!("טעינת נתוני הטיול נכשלה: {}", e)),
    }
    ctx.store.config().set(Some(config));
    ctx.flow.hide_loading(&token);
}
