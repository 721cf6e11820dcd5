//! Mock prediction client for local runs and tests.

use super::{Instance, PredictResponse, PredictionClient, PredictionError};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Answers every instance with the same prediction.
pub struct MockPredictionClient {
    enabled: bool,
    prediction: Value,
}

impl MockPredictionClient {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            prediction: json!({ "risk": "low" }),
        }
    }

    pub fn with_prediction(mut self, prediction: Value) -> Self {
        self.prediction = prediction;
        self
    }
}

#[async_trait]
impl PredictionClient for MockPredictionClient {
    async fn predict(
        &self,
        _endpoint: &str,
        instances: &[Instance],
    ) -> Result<PredictResponse, PredictionError> {
        if !self.enabled {
            return Err(PredictionError::NotConfigured(
                "Mock prediction client not enabled".to_string(),
            ));
        }

        Ok(PredictResponse {
            predictions: vec![self.prediction.clone(); instances.len()],
            deployed_model_id: Some("mock".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn one_prediction_per_instance() {
        let client = MockPredictionClient::new(true).with_prediction(json!({ "risk": "high" }));
        let instances = vec![Instance::new(), Instance::new()];

        let response = client.predict("endpoint", &instances).await.unwrap();

        assert_eq!(response.predictions, vec![json!({ "risk": "high" }); 2]);
    }

    #[tokio::test]
    async fn disabled_mock_fails() {
        let err = MockPredictionClient::new(false)
            .predict("endpoint", &[Instance::new()])
            .await
            .unwrap_err();
        assert!(matches!(err, PredictionError::NotConfigured(_)));
    }
}
