pub mod upstream;

pub use upstream::{google_error_message, is_retryable_status};
