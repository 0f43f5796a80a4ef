//! Photo Upload Rules
//!
//! Files are checked locally before any network call; accepted files are
//! written to `{category}/{userId}/{millis}_{name}` in the storage bucket.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;

use crate::model::Collection;

pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/heic",
    "image/heif",
];

/// Storage object names are encoded as a single path segment ('/' included)
const OBJECT_NAME: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

const STORAGE_ROOT: &str = "https://firebasestorage.googleapis.com/v0/b";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadRejection {
    Empty,
    TooLarge { size: u64 },
    NotImage { mime: String },
}

impl UploadRejection {
    /// User-facing message for this rejection
    pub fn message(&self, file_name: &str) -> String {
        match self {
            UploadRejection::Empty => format!("הקובץ {} ריק", file_name),
            UploadRejection::TooLarge { size } => format!(
                "הקובץ {} גדול מדי ({:.1}MB). הגודל המקסימלי הוא 10MB",
                file_name,
                *size as f64 / (1024.0 * 1024.0)
            ),
            UploadRejection::NotImage { .. } => {
                format!("הקובץ {} אינו תמונה. ניתן להעלות JPG, PNG, GIF, WEBP או HEIC", file_name)
            }
        }
    }
}

/// What the browser tells us about a picked file
#[derive(Debug, Clone, Copy)]
pub struct FileMeta<'a> {
    pub name: &'a str,
    /// May be empty on some mobile browsers
    pub mime: &'a str,
    pub size: u64,
}

/// Pre-flight check. Returns the MIME type to upload with.
pub fn check_file(meta: FileMeta<'_>) -> Result<String, UploadRejection> {
    if meta.size == 0 {
        return Err(UploadRejection::Empty);
    }
    if meta.size > MAX_UPLOAD_BYTES {
        return Err(UploadRejection::TooLarge { size: meta.size });
    }
    let mime = if meta.mime.is_empty() {
        mime_guess::from_path(meta.name)
            .first()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_default()
    } else {
        meta.mime.to_ascii_lowercase()
    };
    if ALLOWED_IMAGE_TYPES.contains(&mime.as_str()) {
        Ok(mime)
    } else {
        Err(UploadRejection::NotImage { mime })
    }
}

/// Logical bucket folder for an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadCategory {
    Album,
    Packing,
    Luggage,
}

impl UploadCategory {
    pub fn folder(&self) -> &'static str {
        match self {
            UploadCategory::Album => "photos",
            UploadCategory::Packing => "packing",
            UploadCategory::Luggage => "luggage",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "packing" => UploadCategory::Packing,
            "luggage" => UploadCategory::Luggage,
            _ => UploadCategory::Album,
        }
    }

    /// List the uploaded photo is recorded in, if any
    pub fn collection(&self) -> Option<Collection> {
        match self {
            UploadCategory::Album => Some(Collection::PhotoAlbum),
            UploadCategory::Packing => Some(Collection::PackingPhotos),
            UploadCategory::Luggage => None,
        }
    }
}

fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    let trimmed = out.trim_matches('_');
    let base = if trimmed.is_empty() || trimmed.starts_with('.') {
        format!("photo{}", trimmed)
    } else {
        trimmed.to_string()
    };
    base.chars().rev().take(80).collect::<Vec<_>>().into_iter().rev().collect()
}

pub fn storage_path(category: UploadCategory, user_id: &str, millis: i64, file_name: &str) -> String {
    format!("{}/{}/{}_{}", category.folder(), user_id, millis, sanitize_file_name(file_name))
}

pub fn upload_url(bucket: &str, path: &str) -> String {
    format!(
        "{}/{}/o?uploadType=media&name={}",
        STORAGE_ROOT,
        bucket,
        utf8_percent_encode(path, OBJECT_NAME)
    )
}

/// Object resource (DELETE target, base of the download URL)
pub fn object_url(bucket: &str, path: &str) -> String {
    format!("{}/{}/o/{}", STORAGE_ROOT, bucket, utf8_percent_encode(path, OBJECT_NAME))
}

pub fn download_url(bucket: &str, path: &str, token: &str) -> String {
    format!("{}?alt=media&token={}", object_url(bucket, path), token)
}

/// Object metadata returned by the upload call
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedObject {
    pub name: String,
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub download_tokens: Option<String>,
}

impl UploadedObject {
    /// Public URL, if the service issued a download token
    pub fn public_url(&self, bucket: &str) -> Option<String> {
        let token = self.download_tokens.as_deref()?.split(',').next()?.trim();
        if token.is_empty() {
            return None;
        }
        let bucket = if self.bucket.is_empty() { bucket } else { &self.bucket };
        Some(download_url(bucket, &self.name, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta<'a>(name: &'a str, mime: &'a str, size: u64) -> FileMeta<'a> {
        FileMeta { name, mime, size }
    }

    #[test]
    fn test_rejects_large_files() {
        let err = check_file(meta("lake.jpg", "image/jpeg", 11 * 1024 * 1024)).unwrap_err();
        assert_eq!(err, UploadRejection::TooLarge { size: 11 * 1024 * 1024 });
        assert!(err.message("lake.jpg").contains("11.0MB"));
        assert!(check_file(meta("lake.jpg", "image/jpeg", MAX_UPLOAD_BYTES)).is_ok());
    }

    #[test]
    fn test_rejects_non_images() {
        let err = check_file(meta("plan.pdf", "application/pdf", 2000)).unwrap_err();
        assert!(matches!(err, UploadRejection::NotImage { .. }));
        assert!(err.message("plan.pdf").contains("אינו תמונה"));
        assert!(check_file(meta("icon.svg", "image/svg+xml", 10)).is_err());
    }

    #[test]
    fn test_rejects_empty_files() {
        let err = check_file(meta("x.png", "image/png", 0)).unwrap_err();
        assert_eq!(err, UploadRejection::Empty);
        assert_eq!(err.message("x.png"), "הקובץ x.png ריק");
    }

    #[test]
    fn test_guesses_missing_mime_from_name() {
        assert_eq!(check_file(meta("IMG_0001.JPG", "", 500)).unwrap(), "image/jpeg");
        assert_eq!(check_file(meta("shot.png", "", 500)).unwrap(), "image/png");
        assert!(check_file(meta("notes", "", 500)).is_err());
    }

    #[test]
    fn test_storage_path() {
        assert_eq!(
            storage_path(UploadCategory::Album, "u123", 1720000000000, "אגם ז'נבה 1.jpg"),
            "photos/u123/1720000000000_1.jpg"
        );
        assert_eq!(
            storage_path(UploadCategory::Packing, "u1", 5, "my bag (2).png"),
            "packing/u1/5_my_bag_2_.png"
        );
        assert_eq!(storage_path(UploadCategory::Luggage, "u1", 5, "???"), "luggage/u1/5_photo");
    }

    #[test]
    fn test_urls_encode_slashes() {
        assert_eq!(
            upload_url("trip.appspot.com", "photos/u1/5_a.jpg"),
            "https://firebasestorage.googleapis.com/v0/b/trip.appspot.com/o?uploadType=media&name=photos%2Fu1%2F5_a.jpg"
        );
        let uploaded = UploadedObject {
            name: "photos/u1/5_a.jpg".into(),
            bucket: String::new(),
            download_tokens: Some("tok1,tok2".into()),
        };
        assert_eq!(
            uploaded.public_url("trip.appspot.com").unwrap(),
            "https://firebasestorage.googleapis.com/v0/b/trip.appspot.com/o/photos%2Fu1%2F5_a.jpg?alt=media&token=tok1"
        );
        let no_token = UploadedObject { download_tokens: None, ..uploaded };
        assert!(no_token.public_url("b").is_none());
    }
}
