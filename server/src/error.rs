use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use trip_core::config::MissingVars;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    MissingConfig(#[from] MissingVars),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("{self}");
        let body = match &self {
            AppError::MissingConfig(MissingVars(missing)) => json!({
                "error": self.to_string(),
                "missing": missing,
            }),
            AppError::Io(_) => json!({ "error": self.to_string() }),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
