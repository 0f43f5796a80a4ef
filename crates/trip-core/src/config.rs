//! Client Bootstrap Configuration
//!
//! Shape returned by the `/api/config` endpoint and consumed by the browser.
//! Built from environment variables on the server; any required variable
//! that is absent or blank makes the whole load fail.

use serde::{Deserialize, Serialize};

use crate::ai::DEFAULT_MODEL;
use crate::firestore::DocumentPath;

/// Collection holding trip documents
pub const TRIP_COLLECTION: &str = "trips";

pub const DEFAULT_TRIP_ID: &str = "geneva";

/// Required variables, in the order they are reported
pub const REQUIRED_VARS: [&str; 6] = [
    "FIREBASE_API_KEY",
    "FIREBASE_AUTH_DOMAIN",
    "FIREBASE_PROJECT_ID",
    "FIREBASE_STORAGE_BUCKET",
    "FIREBASE_APP_ID",
    "GEMINI_API_KEY",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_sender_id: Option<String>,
    pub gemini_api_key: String,
    #[serde(default = "default_trip_id")]
    pub trip_id: String,
    #[serde(default = "default_model")]
    pub gemini_model: String,
}

fn default_trip_id() -> String {
    DEFAULT_TRIP_ID.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

/// Names of required variables that were absent or blank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingVars(pub Vec<&'static str>);

impl std::fmt::Display for MissingVars {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Missing required configuration: {}", self.0.join(", "))
    }
}

impl std::error::Error for MissingVars {}

impl ClientConfig {
    /// Build from a variable lookup (`std::env::var` on the server)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MissingVars>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let missing: Vec<&'static str> = REQUIRED_VARS.iter().copied().filter(|key| read(*key).is_none()).collect();
        if !missing.is_empty() {
            return Err(MissingVars(missing));
        }
        let required = |key: &str| read(key).unwrap_or_default();

        Ok(Self {
            api_key: required("FIREBASE_API_KEY"),
            auth_domain: required("FIREBASE_AUTH_DOMAIN"),
            project_id: required("FIREBASE_PROJECT_ID"),
            storage_bucket: required("FIREBASE_STORAGE_BUCKET"),
            app_id: required("FIREBASE_APP_ID"),
            messaging_sender_id: read("FIREBASE_MESSAGING_SENDER_ID"),
            gemini_api_key: required("GEMINI_API_KEY"),
            trip_id: read("TRIP_ID").unwrap_or_else(default_trip_id),
            gemini_model: read("GEMINI_MODEL").unwrap_or_else(default_model),
        })
    }

    pub fn trip_document(&self) -> DocumentPath {
        DocumentPath::new(&self.project_id, TRIP_COLLECTION, &self.trip_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("FIREBASE_API_KEY", "key"),
            ("FIREBASE_AUTH_DOMAIN", "trip.firebaseapp.com"),
            ("FIREBASE_PROJECT_ID", "trip"),
            ("FIREBASE_STORAGE_BUCKET", "trip.appspot.com"),
            ("FIREBASE_APP_ID", "1:2:web:3"),
            ("GEMINI_API_KEY", "gem"),
        ])
    }

    #[test]
    fn test_loads_with_defaults() {
        let env = full_env();
        let config = ClientConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.trip_id, "geneva");
        assert_eq!(config.gemini_model, DEFAULT_MODEL);
        assert!(config.messaging_sender_id.is_none());
        assert_eq!(config.trip_document().name(), "projects/trip/databases/(default)/documents/trips/geneva");

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["apiKey"], "key");
        assert_eq!(json["storageBucket"], "trip.appspot.com");
        assert!(json.get("messagingSenderId").is_none());
    }

    #[test]
    fn test_fails_closed_on_missing_or_blank() {
        let mut env = full_env();
        env.remove("GEMINI_API_KEY");
        env.insert("FIREBASE_PROJECT_ID", "   ");
        let err = ClientConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap_err();
        assert_eq!(err, MissingVars(vec!["FIREBASE_PROJECT_ID", "GEMINI_API_KEY"]));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_optional_overrides() {
        let mut env = full_env();
        env.insert("TRIP_ID", "geneva-2025");
        env.insert("GEMINI_MODEL", "gemini-2.0-flash");
        let config = ClientConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.trip_id, "geneva-2025");
        assert_eq!(config.gemini_model, "gemini-2.0-flash");
    }
}
