//! Helpers for interpreting error responses from Google Cloud REST APIs.

use serde::Deserialize;

/// Longest raw body echoed back when the error is not Google's JSON shape.
const MAX_RAW_ERROR_LEN: usize = 512;

#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Extract a readable message from a Google API error body.
///
/// Google returns `{"error": {"code", "message", "status"}}`; anything else is
/// returned as (truncated) text.
pub fn google_error_message(body: &str) -> String {
    match serde_json::from_str::<GoogleErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(status) => format!("{}: {}", status, envelope.error.message),
            None => envelope.error.message,
        },
        Err(_) => {
            let trimmed = body.trim();
            match trimmed.char_indices().nth(MAX_RAW_ERROR_LEN) {
                Some((idx, _)) => format!("{}...", &trimmed[..idx]),
                None => trimmed.to_string(),
            }
        }
    }
}

/// Whether an upstream HTTP status is worth retrying by the caller.
pub fn is_retryable_status(status: http::StatusCode) -> bool {
    status == http::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
