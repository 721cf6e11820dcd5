//! Vertex AI online prediction over REST.

use super::{Instance, PredictResponse, PredictionClient, PredictionError};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use service_core::observability::PropagateTrace;
use service_core::utils::google_error_message;
use std::time::Duration;

/// Vertex prediction client configuration.
#[derive(Debug, Clone)]
pub struct VertexPredictionConfig {
    /// Scheme and host, e.g. `https://us-central1-aiplatform.googleapis.com`.
    pub api_base: String,
    pub access_token: Option<Secret<String>>,
    pub timeout: Duration,
}

/// REST client for `POST /v1/{endpoint}:predict`.
pub struct VertexPredictionClient {
    config: VertexPredictionConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: &'a [Instance],
}

impl VertexPredictionClient {
    pub fn new(config: VertexPredictionConfig) -> Result<Self, PredictionError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                PredictionError::NotConfigured(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/v1/{}:predict",
            self.config.api_base.trim_end_matches('/'),
            endpoint
        )
    }
}

#[async_trait]
impl PredictionClient for VertexPredictionClient {
    async fn predict(
        &self,
        endpoint: &str,
        instances: &[Instance],
    ) -> Result<PredictResponse, PredictionError> {
        let url = self.api_url(endpoint);

        tracing::debug!(
            endpoint,
            instance_count = instances.len(),
            "Sending request to Vertex AI prediction endpoint"
        );

        let mut request = self
            .client
            .post(&url)
            .with_trace_context()
            .json(&PredictRequest { instances });
        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| PredictionError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            return Err(PredictionError::ApiError {
                status: status.as_u16(),
                message: google_error_message(&error_text),
            });
        }

        response
            .json()
            .await
            .map_err(|e| PredictionError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}
