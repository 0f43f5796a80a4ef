//! Bootstrap Configuration

use trip_core::config::ClientConfig;

use super::{client, read_json};

fn origin() -> Result<String, String> {
    let window = web_sys::window().ok_or("no window")?;
    window.location().origin().map_err(|_| "no origin".to_string())
}

/// Fetch provider credentials from the config endpoint
pub async fn fetch_config() -> Result<ClientConfig, String> {
    let url = format!("{}/api/config", origin()?);
    let response = client().get(&url).send().await.map_err(|e| e.to_string())?;
    read_json(response).await
}
