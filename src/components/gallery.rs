//! Photo Gallery
//!
//! `PhotoGrid` is shared by the album and the packing photos. Photos are
//! listed newest first; `data-index` keeps the position in the stored list.

use leptos::prelude::*;

use trip_core::state::display_time;
use trip_core::upload::UploadCategory;

use crate::components::Loading;
use crate::models::Photo;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn GallerySection() -> impl IntoView {
    view! {
        <section class="section gallery-section">
            <h2>"📷 אלבום התמונות"</h2>
            <label class="upload-label">
                "📤 העלאת תמונות"
                <input id="photo-upload-input" type="file" accept="image/*" multiple />
            </label>
            <PhotoGrid category=UploadCategory::Album />
        </section>
    }
}

#[component]
pub fn PhotoGrid(category: UploadCategory) -> impl IntoView {
    let store = use_app_store();
    let folder = category.folder();

    move || {
        let photos = store.trip().with(|trip| match category {
            UploadCategory::Packing => trip.packing_photos.clone(),
            _ => trip.photo_album.clone(),
        });
        let Some(photos) = photos else {
            return view! { <Loading /> }.into_any();
        };
        if photos.is_empty() {
            return view! { <p class="empty-state">"עדיין אין תמונות"</p> }.into_any();
        }
        view! {
            <div class="photo-grid">
                {photos.into_iter().enumerate().rev().map(|(index, photo)| view! {
                    <PhotoTile photo=photo index=index folder=folder />
                }).collect_view()}
            </div>
        }
        .into_any()
    }
}

#[component]
fn PhotoTile(photo: Photo, index: usize, folder: &'static str) -> impl IntoView {
    let caption = if photo.caption.is_empty() { photo.uploaded_by.clone() } else { photo.caption.clone() };
    let when = display_time(&photo.timestamp);

    view! {
        <figure class="photo-item" data-index=index.to_string() data-category=folder>
            <img src=photo.url alt=caption.clone() loading="lazy" />
            {photo.is_local.then(|| view! { <span class="local-badge" title="נשמר רק בדפדפן הזה">"מקומי"</span> })}
            <figcaption>
                <span>{caption}</span>
                <span class="photo-time">{when}</span>
            </figcaption>
            <button class="photo-delete" data-action="delete-photo" data-index=index.to_string() data-category=folder aria-label="מחק">
                "🗑️"
            </button>
        </figure>
    }
}
