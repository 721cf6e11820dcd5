//! Application startup and lifecycle management.

use crate::config::PredictionConfig;
use crate::handlers::{health_check, home, metrics_endpoint, predict};
use crate::services::{
    MockPredictionClient, PredictionClient, VertexPredictionClient, VertexPredictionConfig,
};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware};
use service_core::observability::{extract_traceparent, REQUEST_ID_HEADER};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub prediction_client: Arc<dyn PredictionClient>,
    /// Fully-qualified endpoint every request is forwarded to.
    pub endpoint: Arc<str>,
    pub home_message: Option<Arc<str>>,
}

impl AppState {
    pub fn new(
        prediction_client: Arc<dyn PredictionClient>,
        endpoint: impl Into<Arc<str>>,
        home_message: Option<&str>,
    ) -> Self {
        Self {
            prediction_client,
            endpoint: endpoint.into(),
            home_message: home_message.map(Arc::from),
        }
    }
}

/// Build the HTTP router. `GET /` is only routed when a home message is set.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_endpoint));

    if state.home_message.is_some() {
        router = router.route("/", get(home));
    }

    router
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");
                let traceparent = extract_traceparent(request.headers());

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    traceparent = traceparent.as_deref().unwrap_or("-"),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Build the prediction client selected by configuration.
pub fn build_prediction_client(
    config: &PredictionConfig,
) -> Result<Arc<dyn PredictionClient>, AppError> {
    if config.service.use_mock {
        tracing::info!("PREDICTION_MOCK set, using mock prediction client");
        return Ok(Arc::new(MockPredictionClient::new(true)));
    }

    let client = VertexPredictionClient::new(VertexPredictionConfig {
        api_base: config.vertex.api_base(),
        access_token: config.vertex.access_token.clone(),
        timeout: Duration::from_secs(config.vertex.timeout_secs),
    })
    .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;

    if config.vertex.access_token.is_none() {
        tracing::warn!("VERTEX_ACCESS_TOKEN not set, prediction calls will be unauthenticated");
    }
    tracing::info!(
        api_base = %config.vertex.api_base(),
        endpoint = %config.vertex.endpoint_path(),
        "Initialized Vertex AI prediction client"
    );

    Ok(Arc::new(client))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: PredictionConfig) -> Result<Self, AppError> {
        let prediction_client = build_prediction_client(&config)?;
        Self::build_with_client(config, prediction_client).await
    }

    /// Build the application around an already constructed client.
    pub async fn build_with_client(
        config: PredictionConfig,
        prediction_client: Arc<dyn PredictionClient>,
    ) -> Result<Self, AppError> {
        let state = AppState::new(
            prediction_client,
            config.vertex.endpoint_path(),
            config.service.home_message.as_deref(),
        );

        // port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Prediction service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT/SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
