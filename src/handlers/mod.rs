//! Action Handlers
//!
//! One function per `ActionKind`, organized by feature. Handlers apply the
//! change to the store first, then commit the resulting writes; failures
//! are reported through the feedback queue and never stop the page.

mod activities;
mod assistant;
mod family;
mod itinerary;
mod luggage;
mod navigation;
mod packing;
mod photos;

use leptos::prelude::*;
use leptos::task::spawn_local;

use trip_core::ai::GenerateRequest;
use trip_core::dispatch::{Action, ActionKind, ActionMap};
use trip_core::firestore::WriteOp;
use trip_core::DomainError;

use crate::commands;
use crate::context::AppContext;
use crate::dispatch::Handler;
use crate::dom;
use crate::store::{store_config, AppStateStoreFields};

fn route(ctx: AppContext, handler: fn(AppContext, &Action)) -> Handler {
    Box::new(move |action: &Action| handler(ctx, action))
}

/// Routing table with a handler for every action kind
pub fn action_map(ctx: AppContext) -> ActionMap<Handler> {
    use ActionKind::*;

    let table: [(ActionKind, fn(AppContext, &Action)); 30] = [
        (ShowSection, navigation::show_section),
        (ToggleMobileMenu, navigation::toggle_mobile_menu),
        (CloseMobileMenu, navigation::close_mobile_menu),
        (OpenModal, navigation::open_modal),
        (CloseModal, navigation::close_modal),
        (DismissToast, navigation::dismiss_toast),
        (FilterCategory, activities::filter_category),
        (FilterTime, activities::filter_time),
        (LoadMoreActivities, activities::load_more),
        (SelectPlan, itinerary::select_plan),
        (AskAiForDay, itinerary::ask_ai_for_day),
        (TogglePacking, packing::toggle_packing),
        (ToggleSharedPacking, packing::toggle_shared_packing),
        (AddSharedPacking, packing::add_shared_packing),
        (RemoveSharedPacking, packing::remove_shared_packing),
        (ResetPacking, packing::reset_packing),
        (UploadPhotos, photos::upload_photos),
        (OpenPhoto, photos::open_photo),
        (DeletePhoto, photos::delete_photo),
        (PostBulletin, family::post_bulletin),
        (DeleteBulletin, family::delete_bulletin),
        (AddMemory, family::add_memory),
        (AddLuggage, luggage::add_luggage),
        (RemoveLuggage, luggage::remove_luggage),
        (AnalyzeLuggage, luggage::analyze_luggage),
        (SendChat, assistant::send_chat),
        (ClearChat, assistant::clear_chat),
        (AskAi, assistant::ask_ai),
        (SaveCustomPlan, assistant::save_custom_plan),
        (DeleteCustomPlan, assistant::delete_custom_plan),
    ];

    table
        .into_iter()
        .fold(ActionMap::new(), |map, (kind, handler)| map.on(kind, route(ctx, handler)))
}

// ========================
// Shared helpers
// ========================

/// Commit writes in the background and report the acknowledgment
fn persist(ctx: AppContext, ops: Vec<WriteOp>, success: Option<&'static str>) {
    if ops.is_empty() {
        return;
    }
    let Some(config) = store_config(&ctx.store) else {
        ctx.flow.warning("האפליקציה עדיין נטענת, השינוי לא נשמר");
        return;
    };
    spawn_local(async move {
        match commands::commit(&config, &ops).await {
            Ok(_) => {
                if let Some(message) = success {
                    ctx.flow.success(message);
                }
            }
            Err(e) => ctx.flow.error(&format!("השמירה נכשלה: {}", e)),
        }
    });
}

/// Surface a rejected update. Validation problems are warnings with the
/// caller's hint; anything else is an error.
fn report(ctx: AppContext, err: DomainError, hint: &str) {
    web_sys::console::log_1(&format!("[HANDLER] {}", err).into());
    match err {
        DomainError::InvalidInput(_) | DomainError::Rejected(_) => ctx.flow.warning(hint),
        DomainError::NotFound(_) => ctx.flow.error("הפריט לא נמצא, נסו לרענן את הדף"),
        DomainError::Upstream(msg) => ctx.flow.error(&format!("שגיאה: {}", msg)),
    }
}

/// Run one AI request behind a loading token. `None` when it failed (already reported).
async fn ask_model(ctx: AppContext, context: &str, message: &str, request: GenerateRequest) -> Option<String> {
    let Some(config) = store_config(&ctx.store) else {
        ctx.flow.warning("האפליקציה עדיין נטענת, נסו שוב בעוד רגע");
        return None;
    };
    let token = ctx.flow.show_loading(context, message);
    let result = commands::generate(&config, &request).await;
    ctx.flow.hide_loading(&token);
    match result {
        Ok(text) => Some(text),
        Err(e) => {
            ctx.flow.ai_error(&e);
            None
        }
    }
}

/// Name typed into `field_id`, else the remembered name. A typed name is
/// remembered for next time.
fn author_or_default(ctx: AppContext, field_id: &str) -> String {
    let typed = dom::input_value(field_id);
    if typed.is_empty() {
        return ctx.store.display_name().get_untracked();
    }
    crate::context::save_display_name(&typed);
    ctx.store.display_name().set(typed.clone());
    typed
}
