//! Client abstraction over the retrieval service.

use crate::error::ClientError;
use crate::resources::{RetrieveContextsRequest, RetrieveContextsResponse};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use service_core::observability::PropagateTrace;
use service_core::utils::google_error_message;
use std::time::Duration;

/// Submits retrieval requests. Implementations must be shareable across tasks.
#[async_trait]
pub trait RagServiceClient: Send + Sync {
    async fn retrieve_contexts(
        &self,
        request: &RetrieveContextsRequest,
    ) -> Result<RetrieveContextsResponse, ClientError>;
}

/// Settings for [`VertexRagClient`].
#[derive(Debug, Clone)]
pub struct VertexRagClientConfig {
    /// Scheme and host, e.g. `https://us-central1-aiplatform.googleapis.com`.
    pub api_base: String,
    /// OAuth access token sent as a bearer token.
    pub access_token: Option<Secret<String>>,
    pub timeout: Duration,
}

impl VertexRagClientConfig {
    /// Regional endpoint for `location` with a 60 second timeout.
    pub fn for_location(location: &str) -> Self {
        Self {
            api_base: format!("https://{}-aiplatform.googleapis.com", location),
            access_token: None,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(Secret::new(token.into()));
        self
    }
}

/// REST client for the v1beta1 `retrieveContexts` method.
pub struct VertexRagClient {
    config: VertexRagClientConfig,
    client: Client,
}

impl VertexRagClient {
    pub fn new(config: VertexRagClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::NotConfigured(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn api_url(&self, parent: &str) -> String {
        format!(
            "{}/v1beta1/{}:retrieveContexts",
            self.config.api_base.trim_end_matches('/'),
            parent
        )
    }
}

#[async_trait]
impl RagServiceClient for VertexRagClient {
    async fn retrieve_contexts(
        &self,
        request: &RetrieveContextsRequest,
    ) -> Result<RetrieveContextsResponse, ClientError> {
        let url = self.api_url(&request.parent);

        tracing::debug!(url = %url, "Sending retrieveContexts request");

        let mut builder = self.client.post(&url).with_trace_context().json(request);
        if let Some(token) = &self.config.access_token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = google_error_message(&error_text);

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(ClientError::RateLimited(message));
            }

            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}
