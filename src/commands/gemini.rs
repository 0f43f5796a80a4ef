//! Generative AI Commands

use trip_core::ai::{endpoint, GenerateRequest, GenerateResponse};
use trip_core::config::ClientConfig;

use super::{client, read_json};

/// Send one generateContent request and return the reply text
pub async fn generate(config: &ClientConfig, request: &GenerateRequest) -> Result<String, String> {
    let url = endpoint(&config.gemini_model, &config.gemini_api_key);
    let response = client()
        .post(&url)
        .json(request)
        .send()
        .await
        .map_err(|e| format!("network error: {}", e))?;
    let reply: GenerateResponse = read_json(response).await?;
    reply.text().map_err(|e| e.to_string())
}
