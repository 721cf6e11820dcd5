use secrecy::Secret;
use service_core::config::{self as core_config, get_env, get_env_flag, get_env_opt, is_production};
use service_core::error::AppError;

/// Default liveness text served on `GET /`.
pub const DEFAULT_HOME_MESSAGE: &str = "Airway prediction API is running!";

const DEFAULT_PROJECT_ID: &str = "569713108976";
const DEFAULT_REGION: &str = "us-central1";
const DEFAULT_ENDPOINT_ID: &str = "1010876696926093312";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct PredictionConfig {
    pub common: core_config::Config,
    pub vertex: VertexConfig,
    pub service: ServiceConfig,
}

#[derive(Debug, Clone)]
pub struct VertexConfig {
    pub project_id: String,
    pub region: String,
    pub endpoint_id: String,
    /// Overrides the regional `https://{region}-aiplatform.googleapis.com` host.
    pub api_base: Option<String>,
    pub access_token: Option<Secret<String>>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Text for `GET /`. `None` leaves the route unmounted.
    pub home_message: Option<String>,
    /// Answer from the in-process mock instead of calling Vertex AI.
    pub use_mock: bool,
    pub otlp_endpoint: Option<String>,
}

impl VertexConfig {
    /// Fully-qualified endpoint resource name.
    pub fn endpoint_path(&self) -> String {
        format!(
            "projects/{}/locations/{}/endpoints/{}",
            self.project_id, self.region, self.endpoint_id
        )
    }

    pub fn api_base(&self) -> String {
        self.api_base
            .clone()
            .unwrap_or_else(|| format!("https://{}-aiplatform.googleapis.com", self.region))
    }
}

impl PredictionConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = is_production();

        let timeout_secs = parse_timeout_secs(&get_env(
            "VERTEX_TIMEOUT_SECS",
            Some(&DEFAULT_TIMEOUT_SECS.to_string()),
            is_prod,
        )?)?;

        // HOME_MESSAGE="" disables the liveness route.
        let home_message = match std::env::var("HOME_MESSAGE") {
            Ok(message) if message.is_empty() => None,
            Ok(message) => Some(message),
            Err(_) => Some(DEFAULT_HOME_MESSAGE.to_string()),
        };

        Ok(PredictionConfig {
            common: common_config,
            vertex: VertexConfig {
                project_id: get_env("VERTEX_PROJECT_ID", Some(DEFAULT_PROJECT_ID), is_prod)?,
                region: get_env("VERTEX_REGION", Some(DEFAULT_REGION), is_prod)?,
                endpoint_id: get_env("VERTEX_ENDPOINT_ID", Some(DEFAULT_ENDPOINT_ID), is_prod)?,
                api_base: get_env_opt("VERTEX_API_BASE"),
                access_token: get_env_opt("VERTEX_ACCESS_TOKEN").map(Secret::new),
                timeout_secs,
            },
            service: ServiceConfig {
                home_message,
                use_mock: get_env_flag("PREDICTION_MOCK"),
                otlp_endpoint: get_env_opt("OTLP_ENDPOINT"),
            },
        })
    }
}

/// Upstream request timeout in seconds. Zero is rejected; an unparseable
/// value falls back to the default.
fn parse_timeout_secs(raw: &str) -> Result<u64, AppError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(AppError::ConfigError(anyhow::anyhow!(
            "VERTEX_TIMEOUT_SECS must be greater than 0"
        ))),
        Ok(secs) => Ok(secs),
        Err(e) => {
            tracing::warn!(
                value = raw,
                error = %e,
                default = DEFAULT_TIMEOUT_SECS,
                "Invalid VERTEX_TIMEOUT_SECS, using default"
            );
            Ok(DEFAULT_TIMEOUT_SECS)
        }
    }
}
