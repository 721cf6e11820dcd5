//! Prediction relay: forwards instance lists to a managed Vertex AI endpoint.

pub mod config;
pub mod handlers;
pub mod services;
pub mod startup;
