//! Trip Document Commands
//!
//! One document read at startup, then explicit commits for every change.

use reqwest::StatusCode;
use trip_core::config::ClientConfig;
use trip_core::firestore::{commit_request, decode_document, WriteAck, WriteOp};
use trip_core::model::TripData;

use super::{client, read_json};

/// Load the trip document. A document that does not exist yet loads as an
/// empty trip rather than an error.
pub async fn load_trip(config: &ClientConfig) -> Result<TripData, String> {
    let url = config.trip_document().get_url(&config.api_key);
    let response = client().get(&url).send().await.map_err(|e| e.to_string())?;
    if response.status() == StatusCode::NOT_FOUND {
        web_sys::console::log_1(&"[STORE] Trip document missing, starting empty".into());
        return Ok(TripData::empty());
    }
    let document: serde_json::Value = read_json(response).await?;
    Ok(TripData::from_json(decode_document(&document)))
}

/// Commit a batch of writes and return the store's acknowledgment
pub async fn commit(config: &ClientConfig, ops: &[WriteOp]) -> Result<WriteAck, String> {
    if ops.is_empty() {
        return Ok(WriteAck::default());
    }
    let document = config.trip_document();
    let body = commit_request(&document, ops);
    let response = client()
        .post(document.commit_url(&config.api_key))
        .json(&body)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    let ack: WriteAck = read_json(response).await?;
    web_sys::console::log_1(
        &format!("[STORE] Committed {} write(s) at {:?}", ack.write_results.len(), ack.commit_time).into(),
    );
    Ok(ack)
}
