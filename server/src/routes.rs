use axum::{Json, extract};
use tracing::info;
use trip_core::config::ClientConfig;

use crate::{error::AppError, state::State};

/// `GET /api/config`
pub async fn config_handler(extract::State(state): extract::State<State>) -> Result<Json<ClientConfig>, AppError> {
    let config = ClientConfig::from_lookup(|key| state.var(key))?;
    info!("Serving config for trip {}", config.trip_id);
    Ok(Json(config))
}
