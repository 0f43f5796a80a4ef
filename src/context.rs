//! Application Context
//!
//! Shared handles provided via Leptos Context API, plus the few values
//! remembered in `localStorage` between visits.

use crate::feedback::Flow;
use crate::store::AppStore;

const USER_ID_KEY: &str = "geneva-trip-user-id";
const DISPLAY_NAME_KEY: &str = "geneva-trip-display-name";

/// Everything a handler needs: the state store and the feedback manager
#[derive(Clone, Copy)]
pub struct AppContext {
    pub store: AppStore,
    pub flow: Flow,
}

impl AppContext {
    pub fn new(store: AppStore, flow: Flow) -> Self {
        Self { store, flow }
    }
}

// ========================
// Local storage
// ========================

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Stable per-browser id, created on first visit
pub fn load_user_id() -> String {
    let storage = local_storage();
    if let Some(id) = storage.as_ref().and_then(|s| s.get_item(USER_ID_KEY).ok().flatten()) {
        return id;
    }
    let id = format!(
        "u{}{:06}",
        chrono::Utc::now().timestamp_millis(),
        (js_sys::Math::random() * 1_000_000.0) as u32
    );
    if let Some(storage) = storage {
        let _ = storage.set_item(USER_ID_KEY, &id);
    }
    id
}

pub fn load_display_name() -> String {
    local_storage()
        .and_then(|s| s.get_item(DISPLAY_NAME_KEY).ok().flatten())
        .unwrap_or_default()
}

pub fn save_display_name(name: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(DISPLAY_NAME_KEY, name);
    }
}
