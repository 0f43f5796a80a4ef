//! Luggage planner handlers

use leptos::prelude::*;
use leptos::task::spawn_local;

use trip_core::ai::{luggage_analysis_parts, GenerateRequest};
use trip_core::dispatch::Action;
use trip_core::state;
use trip_core::upload::{check_file, storage_path, FileMeta, UploadCategory};

use super::{ask_model, persist, report};
use crate::commands;
use crate::context::AppContext;
use crate::dom;
use crate::models::ClientConfig;
use crate::store::{store_config, store_update_trip, AppStateStoreFields};

pub fn add_luggage(ctx: AppContext, _action: &Action) {
    let name = dom::input_value("luggage-name");
    let owner = dom::input_value("luggage-owner");
    let items = dom::input_value("luggage-items");
    match store_update_trip(&ctx.store, |trip| state::add_luggage(trip, &name, &owner, &items, chrono::Utc::now())) {
        Ok(op) => {
            for id in ["luggage-name", "luggage-owner", "luggage-items"] {
                dom::clear_input(id);
            }
            persist(ctx, vec![op], Some("המזוודה נוספה"));
        }
        Err(e) => report(ctx, e, "נא לתת שם למזוודה"),
    }
}

pub fn remove_luggage(ctx: AppContext, action: &Action) {
    let Some(index) = action.data_index("index") else {
        return;
    };
    match store_update_trip(&ctx.store, |trip| state::remove_luggage(trip, index)) {
        Ok(op) => persist(ctx, vec![op], Some("המזוודה הוסרה")),
        Err(e) => report(ctx, e, "לא ניתן להסיר את המזוודה"),
    }
}

/// Upload a luggage photo, ask the model what is missing and store both
/// on the luggage record
pub fn analyze_luggage(ctx: AppContext, action: &Action) {
    let (Some(index), Some(input_id)) = (action.data_index("index"), action.element_id.clone()) else {
        return;
    };
    if ctx.store.ai_pending().get_untracked() {
        return;
    }
    let Some(file) = dom::take_files(&input_id).into_iter().next() else {
        return;
    };
    let name = file.name();
    let mime = match check_file(FileMeta { name: &name, mime: &file.type_(), size: file.size() as u64 }) {
        Ok(mime) => mime,
        Err(rejection) => return ctx.flow.warning(&rejection.message(&name)),
    };
    let Some(config) = store_config(&ctx.store) else {
        ctx.flow.warning("האפליקציה עדיין נטענת, נסו שוב בעוד רגע");
        return;
    };
    // the list can change while the model is busy; the bag is found again afterwards
    let Some(bag) = ctx
        .store
        .trip()
        .with_untracked(|trip| trip.luggage_data.as_ref().and_then(|l| l.get(index)).cloned())
    else {
        return;
    };
    let user_id = ctx.store.user_id().get_untracked();
    ctx.store.ai_pending().set(true);

    spawn_local(async move {
        let result = photo_and_analysis(ctx, &config, &file, &name, &mime, &user_id, &bag.owner).await;
        ctx.store.ai_pending().set(false);
        let Some((photo_url, analysis)) = result else {
            return;
        };
        match store_update_trip(&ctx.store, |trip| state::attach_luggage_analysis(trip, &bag, photo_url, &analysis)) {
            Ok(ops) => persist(ctx, ops, Some("ניתוח המזוודה מוכן")),
            Err(e) => report(ctx, e, "המזוודה הוסרה לפני שהניתוח הסתיים"),
        }
    });
}

/// Best-effort photo upload followed by the model call
async fn photo_and_analysis(
    ctx: AppContext,
    config: &ClientConfig,
    file: &web_sys::File,
    name: &str,
    mime: &str,
    user_id: &str,
    owner: &str,
) -> Option<(Option<String>, String)> {
    let bytes = match commands::read_file_bytes(file).await {
        Ok(bytes) => bytes,
        Err(e) => {
            ctx.flow.error(&format!("לא ניתן לקרוא את הקובץ: {}", e));
            return None;
        }
    };
    let path = storage_path(UploadCategory::Luggage, user_id, chrono::Utc::now().timestamp_millis(), name);
    let photo_url = match commands::upload_object(config, &path, mime, bytes.clone()).await {
        Ok(url) => Some(url),
        Err(e) => {
            web_sys::console::warn_1(&format!("[UPLOAD] Luggage photo not stored: {}", e).into());
            None
        }
    };
    let request = GenerateRequest::single(luggage_analysis_parts(owner, mime, &bytes));
    let analysis = ask_model(ctx, "luggage", "מנתח את המזוודה...", request).await?;
    Some((photo_url, analysis))
}
