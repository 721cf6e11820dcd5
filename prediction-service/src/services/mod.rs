pub mod providers;

pub use providers::mock::MockPredictionClient;
pub use providers::vertex::{VertexPredictionClient, VertexPredictionConfig};
pub use providers::{Instance, PredictResponse, PredictionClient, PredictionError};
