//! Spawns the full application with the mock client on a random port.

use prediction_service::config::{PredictionConfig, ServiceConfig, VertexConfig, DEFAULT_HOME_MESSAGE};
use prediction_service::startup::Application;
use reqwest::Client;
use serde_json::json;
use service_core::config::Config;
use std::time::Duration;

fn test_config() -> PredictionConfig {
    PredictionConfig {
        common: Config { port: 0 },
        vertex: VertexConfig {
            project_id: "test-project".to_string(),
            region: "us-central1".to_string(),
            endpoint_id: "1".to_string(),
            api_base: None,
            access_token: None,
            timeout_secs: 5,
        },
        service: ServiceConfig {
            home_message: Some(DEFAULT_HOME_MESSAGE.to_string()),
            use_mock: true,
            otlp_endpoint: None,
        },
    }
}

/// Spawn the application on a random port and return the port number.
async fn spawn_app() -> u16 {
    let app = Application::build(test_config())
        .await
        .expect("Failed to build application");

    let port = app.port();

    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    port
}

#[tokio::test]
async fn liveness_route_answers() {
    let port = spawn_app().await;

    let response = Client::new()
        .get(format!("http://127.0.0.1:{}/", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), DEFAULT_HOME_MESSAGE);
}

#[tokio::test]
async fn predict_round_trip_with_mock_client() {
    let port = spawn_app().await;

    let response = Client::new()
        .post(format!("http://127.0.0.1:{}/predict", port))
        .json(&json!({ "instances": [{ "hr_bpm": 80, "spo2_pct": 95 }] }))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, json!({ "predictions": [{ "risk": "low" }] }));
}

#[tokio::test]
async fn empty_instances_return_400() {
    let port = spawn_app().await;

    let response = Client::new()
        .post(format!("http://127.0.0.1:{}/predict", port))
        .json(&json!({ "instances": [] }))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, json!({ "error": "No instances provided" }));
}
