//! Photo album handlers

use leptos::prelude::*;
use leptos::task::spawn_local;

use trip_core::dispatch::Action;
use trip_core::state;
use trip_core::upload::{check_file, storage_path, FileMeta, UploadCategory};

use super::{persist, report};
use crate::commands;
use crate::context::AppContext;
use crate::dom;
use crate::models::{Modal, Photo};
use crate::store::{store_config, store_update_trip, AppStateStoreFields};

fn category_of(action: &Action) -> UploadCategory {
    match action.data("category") {
        Some(category) => UploadCategory::from_str(category),
        None if action.element_id.as_deref() == Some("packing-photo-input") => UploadCategory::Packing,
        None => UploadCategory::Album,
    }
}

fn photo_at(ctx: AppContext, category: UploadCategory, index: usize) -> Option<Photo> {
    ctx.store.trip().with_untracked(|trip| {
        let list = match category {
            UploadCategory::Packing => trip.packing_photos.as_ref(),
            _ => trip.photo_album.as_ref(),
        };
        list.and_then(|photos| photos.get(index).cloned())
    })
}

/// Upload every picked file in order. Files that fail the pre-flight check
/// are skipped with a warning; failed uploads are kept as local-only photos.
pub fn upload_photos(ctx: AppContext, action: &Action) {
    let Some(input_id) = action.element_id.clone() else {
        return;
    };
    let files = dom::take_files(&input_id);
    if files.is_empty() {
        return;
    }
    let Some(config) = store_config(&ctx.store) else {
        ctx.flow.warning("האפליקציה עדיין נטענת, נסו שוב בעוד רגע");
        return;
    };
    let category = category_of(action);
    let user_id = ctx.store.user_id().get_untracked();
    let uploaded_by = ctx.store.display_name().get_untracked();

    spawn_local(async move {
        let token = ctx.flow.show_loading("upload", &format!("מעלה {} תמונות...", files.len()));
        let mut saved = 0;
        for file in files {
            let name = file.name();
            let mime = match check_file(FileMeta { name: &name, mime: &file.type_(), size: file.size() as u64 }) {
                Ok(mime) => mime,
                Err(rejection) => {
                    ctx.flow.warning(&rejection.message(&name));
                    continue;
                }
            };
            let now = chrono::Utc::now();
            let path = storage_path(category, &user_id, now.timestamp_millis(), &name);
            let uploaded = match commands::read_file_bytes(&file).await {
                Ok(bytes) => commands::upload_object(&config, &path, &mime, bytes).await,
                Err(e) => Err(e),
            };
            let photo = match uploaded {
                Ok(url) => Photo {
                    url,
                    caption: String::new(),
                    uploaded_by: uploaded_by.clone(),
                    storage_path: Some(path),
                    is_local: false,
                    timestamp: state::timestamp(now),
                    raw: None,
                },
                Err(e) => {
                    web_sys::console::error_1(&format!("[UPLOAD] {} failed: {}", name, e).into());
                    let Ok(url) = commands::local_object_url(&file) else {
                        ctx.flow.error(&format!("העלאת {} נכשלה", name));
                        continue;
                    };
                    ctx.flow.warning(&format!("העלאת {} נכשלה. התמונה תוצג רק במכשיר הזה", name));
                    Photo {
                        url,
                        caption: String::new(),
                        uploaded_by: uploaded_by.clone(),
                        storage_path: None,
                        is_local: true,
                        timestamp: state::timestamp(now),
                        raw: None,
                    }
                }
            };
            match store_update_trip(&ctx.store, |trip| state::add_photo(trip, category, photo)) {
                Ok(op) => {
                    saved += 1;
                    persist(ctx, op.into_iter().collect(), None);
                }
                Err(e) => report(ctx, e, "לא ניתן לשמור את התמונה"),
            }
        }
        ctx.flow.hide_loading(&token);
        if saved > 0 {
            ctx.flow.success(&format!("נוספו {} תמונות", saved));
        }
    });
}

pub fn open_photo(ctx: AppContext, action: &Action) {
    let Some(index) = action.data_index("index") else {
        return;
    };
    if let Some(photo) = photo_at(ctx, category_of(action), index) {
        ctx.store.modal().set(Some(Modal::Photo { url: photo.url, caption: photo.caption }));
    }
}

pub fn delete_photo(ctx: AppContext, action: &Action) {
    let Some(index) = action.data_index("index") else {
        return;
    };
    let confirmed = web_sys::window()
        .and_then(|w| w.confirm_with_message("למחוק את התמונה?").ok())
        .unwrap_or(false);
    if !confirmed {
        return;
    }
    let category = category_of(action);
    let (photo, op) = match store_update_trip(&ctx.store, |trip| state::delete_photo(trip, category, index)) {
        Ok(removed) => removed,
        Err(e) => return report(ctx, e, "לא ניתן למחוק את התמונה"),
    };
    ctx.store.modal().set(None);
    if photo.is_local {
        let _ = web_sys::Url::revoke_object_url(&photo.url);
        ctx.flow.success("התמונה נמחקה");
        return;
    }
    persist(ctx, op.into_iter().collect(), Some("התמונה נמחקה"));
    if let (Some(path), Some(config)) = (photo.storage_path, store_config(&ctx.store)) {
        spawn_local(async move {
            if let Err(e) = commands::delete_object(&config, &path).await {
                web_sys::console::warn_1(&format!("[UPLOAD] Could not delete {}: {}", path, e).into());
            }
        });
    }
}
