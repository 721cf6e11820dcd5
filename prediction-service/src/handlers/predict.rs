use crate::services::Instance;
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use metrics::counter;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service_core::error::AppError;
use service_core::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// `null` and a missing key are both treated as no instances.
    #[serde(default)]
    pub instances: Option<Vec<Instance>>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponseBody {
    pub predictions: Vec<Value>,
}

/// Forward `instances` to the configured endpoint and return its predictions
/// unchanged.
#[tracing::instrument(skip_all, fields(request_id = %request_id.0))]
pub async fn predict(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponseBody>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection, "Rejected malformed predict body");
        AppError::BadRequest(anyhow::anyhow!(rejection.body_text()))
    })?;

    let instances = request.instances.unwrap_or_default();
    if instances.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!("No instances provided")));
    }

    let response = state
        .prediction_client
        .predict(&state.endpoint, &instances)
        .await
        .map_err(|e| {
            counter!("prediction_failures_total").increment(1);
            tracing::error!(
                endpoint = %state.endpoint,
                error = %e,
                "Prediction request failed"
            );
            AppError::Upstream(e.to_string())
        })?;

    counter!("predictions_forwarded_total").increment(instances.len() as u64);
    tracing::info!(
        instance_count = instances.len(),
        prediction_count = response.predictions.len(),
        deployed_model_id = response.deployed_model_id.as_deref().unwrap_or("-"),
        "Prediction succeeded"
    );

    Ok(Json(PredictResponseBody {
        predictions: response.predictions,
    }))
}
