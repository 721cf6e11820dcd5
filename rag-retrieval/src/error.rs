use reqwest::StatusCode;
use service_core::utils::is_retryable_status;
use thiserror::Error;

/// Failure talking to the retrieval service.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Client not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("RAG API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Transient failures a caller may retry. Nothing in this crate retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network(_) | ClientError::RateLimited(_) => true,
            ClientError::Api { status, .. } => StatusCode::from_u16(*status)
                .map(is_retryable_status)
                .unwrap_or(false),
            ClientError::NotConfigured(_) | ClientError::InvalidResponse(_) => false,
        }
    }
}

/// Error returned by [`crate::retrieval_query`].
#[derive(Error, Debug)]
pub enum RagError {
    /// The query was rejected before any request was sent.
    #[error("{0}")]
    InvalidArgument(String),

    /// The retrieval service call failed.
    #[error("Failed in retrieving contexts due to: {source}")]
    Retrieval {
        #[source]
        source: ClientError,
    },
}

impl RagError {
    pub fn invalid(message: impl Into<String>) -> Self {
        RagError::InvalidArgument(message.into())
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            RagError::InvalidArgument(_) => false,
            RagError::Retrieval { source } => source.is_retryable(),
        }
    }
}
