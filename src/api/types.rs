//! API request and error types.
//!
//! Field names are camelCase to match the existing dashboard client.

use serde::{Deserialize, Serialize};

/// Body of `POST /generate-mock-data`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockDataRequest {
    #[serde(default)]
    pub system_id: String,
    /// Falls back to `generator.default_days`.
    #[serde(default)]
    pub days: Option<u32>,
}

/// Body of `POST /system-status`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    #[serde(default)]
    pub system_id: String,
}

/// Error response body for 4xx/5xx responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
