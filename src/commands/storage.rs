//! Object Storage Commands

use js_sys::Uint8Array;
use wasm_bindgen_futures::JsFuture;
use web_sys::File;

use trip_core::config::ClientConfig;
use trip_core::upload::{object_url, upload_url, UploadedObject};

use super::{client, read_json};

/// Read a picked file into memory
pub async fn read_file_bytes(file: &File) -> Result<Vec<u8>, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Read error: {:?}", e))?;
    Ok(Uint8Array::new(&buffer).to_vec())
}

/// Upload bytes to `path` and return the public download URL
pub async fn upload_object(config: &ClientConfig, path: &str, mime: &str, bytes: Vec<u8>) -> Result<String, String> {
    let response = client()
        .post(upload_url(&config.storage_bucket, path))
        .header("Content-Type", mime)
        .body(bytes)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    let uploaded: UploadedObject = read_json(response).await?;
    uploaded
        .public_url(&config.storage_bucket)
        .ok_or_else(|| "Upload finished without a download token".to_string())
}

/// Best-effort delete of a stored object
pub async fn delete_object(config: &ClientConfig, path: &str) -> Result<(), String> {
    let response = client()
        .delete(object_url(&config.storage_bucket, path))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        Ok(())
    } else {
        Err(format!("HTTP {}", response.status().as_u16()))
    }
}

/// Tab-local URL for a file that could not be uploaded
pub fn local_object_url(file: &File) -> Result<String, String> {
    web_sys::Url::create_object_url_with_blob(file).map_err(|e| format!("{:?}", e))
}
