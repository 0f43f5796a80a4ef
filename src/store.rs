//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The trip
//! document is one field; everything else is transient UI state.

use std::collections::{HashMap, HashSet};

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::{ActivityFilters, ClientConfig, Modal, Pager, PlanChoice, Section, TripData};

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// The trip document (`currentData`)
    pub trip: TripData,
    /// Provider credentials, set once at startup
    pub config: Option<ClientConfig>,
    /// Per-browser id used in storage paths
    pub user_id: String,
    /// Name shown on posts, remembered between visits
    pub display_name: String,
    pub section: Section,
    pub mobile_menu_open: bool,
    pub modal: Option<Modal>,
    pub filters: ActivityFilters,
    pub pager: Pager,
    /// Highlight keys of activities added this session
    pub highlighted: HashSet<String>,
    /// Selected plan per day index
    pub plan_choice: HashMap<u32, PlanChoice>,
    /// Requests in flight, used to disable their buttons
    pub chat_pending: bool,
    pub ai_pending: bool,
    pub generating_activities: bool,
    /// Last free-text AI answer, kept for "save as plan"
    pub last_answer: Option<String>,
}

impl AppState {
    pub fn new(user_id: String, display_name: String) -> Self {
        Self {
            user_id,
            display_name,
            ..Default::default()
        }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Config snapshot for a service call; `None` until bootstrap finished
pub fn store_config(store: &AppStore) -> Option<ClientConfig> {
    store.config().get_untracked()
}

/// Run an update on the trip document and return its result
pub fn store_update_trip<T>(store: &AppStore, update: impl FnOnce(&mut TripData) -> T) -> T {
    update(&mut store.trip().write())
}

pub fn store_plan_choice(store: &AppStore, day_index: u32) -> PlanChoice {
    store.plan_choice().read().get(&day_index).copied().unwrap_or_default()
}

pub fn store_highlight(store: &AppStore, keys: impl IntoIterator<Item = String>) {
    store.highlighted().write().extend(keys);
}
