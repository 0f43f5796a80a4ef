//! Service Bindings
//!
//! Async wrappers around the remote services the guide talks to, organized
//! by service. Every call returns `Result<_, String>`; callers surface the
//! error through the feedback queue.

mod config;
mod firestore;
mod gemini;
mod storage;

use serde::de::DeserializeOwned;
use trip_core::firestore::ApiErrorBody;

// Re-export all public items
pub use config::*;
pub use firestore::*;
pub use gemini::*;
pub use storage::*;

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

/// Decode a JSON body, turning non-2xx responses into their API message
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, String> {
    let status = response.status();
    if status.is_success() {
        return response.json::<T>().await.map_err(|e| format!("Response error: {}", e));
    }
    let body = response.text().await.unwrap_or_default();
    Err(match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(parsed) => parsed.error.to_string(),
        Err(_) if body.is_empty() => format!("HTTP {}", status.as_u16()),
        Err(_) => format!("HTTP {}: {}", status.as_u16(), body),
    })
}
