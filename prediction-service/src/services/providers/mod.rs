//! Prediction backends.
//!
//! The relay talks to a [`PredictionClient`]; the Vertex AI REST client is
//! used in production and the mock for local runs and tests.

pub mod mock;
pub mod vertex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One input record: feature name to value. Never inspected by the relay.
pub type Instance = serde_json::Map<String, Value>;

/// Error type for prediction calls.
#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Prediction API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Body of a successful `:predict` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    #[serde(default)]
    pub predictions: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_model_id: Option<String>,
}

/// Sends instances to a deployed model endpoint.
#[async_trait]
pub trait PredictionClient: Send + Sync {
    /// Run online prediction for `instances` on `endpoint`
    /// (`projects/{p}/locations/{l}/endpoints/{id}`).
    async fn predict(
        &self,
        endpoint: &str,
        instances: &[Instance],
    ) -> Result<PredictResponse, PredictionError>;
}
