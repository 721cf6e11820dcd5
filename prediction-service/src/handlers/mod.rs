//! HTTP handlers for the prediction relay.

pub mod health;
pub mod predict;

pub use health::{health_check, home, metrics_endpoint};
pub use predict::{predict, PredictRequest, PredictResponseBody};
