//! Request and response shapes of the `retrieveContexts` REST method.
//!
//! Field names follow the v1beta1 JSON mapping (camelCase); unset optional
//! fields are omitted so the service applies its own defaults.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A corpus to retrieve from, optionally narrowed to some of its files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RagResource {
    /// Full resource name or bare corpus id.
    pub rag_corpus: String,
    pub rag_file_ids: Vec<String>,
}

impl RagResource {
    pub fn new(rag_corpus: impl Into<String>) -> Self {
        Self {
            rag_corpus: rag_corpus.into(),
            rag_file_ids: Vec::new(),
        }
    }

    pub fn with_file_ids<I, S>(mut self, file_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rag_file_ids = file_ids.into_iter().map(Into::into).collect();
        self
    }
}

/// Retrieval tuning parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RagRetrievalConfig {
    /// Number of contexts to retrieve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "top_k must be at least 1"))]
    pub top_k: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub hybrid_search: Option<HybridSearch>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub filter: Option<Filter>,
}

impl RagRetrievalConfig {
    pub fn with_top_k(mut self, top_k: i32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.hybrid_search = Some(HybridSearch { alpha: Some(alpha) });
        self
    }

    pub fn with_vector_distance_threshold(mut self, threshold: f64) -> Self {
        self.filter = Some(Filter {
            vector_distance_threshold: Some(threshold),
            vector_similarity_threshold: None,
        });
        self
    }

    pub fn alpha(&self) -> Option<f32> {
        self.hybrid_search.as_ref().and_then(|h| h.alpha)
    }

    pub fn vector_distance_threshold(&self) -> Option<f64> {
        self.filter.as_ref().and_then(|f| f.vector_distance_threshold)
    }
}

/// Weighting between sparse (0.0) and dense (1.0) vector search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_finite_alpha"))]
pub struct HybridSearch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 1.0, message = "alpha must be within [0, 1]"))]
    pub alpha: Option<f32>,
}

// NaN passes the range check, both comparisons being false.
fn validate_finite_alpha(hybrid_search: &HybridSearch) -> Result<(), ValidationError> {
    match hybrid_search.alpha {
        Some(alpha) if !alpha.is_finite() => {
            let mut err = ValidationError::new("range");
            err.message = Some("alpha must be within [0, 1]".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

/// Result filter. The two thresholds are mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_filter"))]
pub struct Filter {
    /// Only return contexts with a vector distance below this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_distance_threshold: Option<f64>,

    /// Only return contexts with a vector similarity above this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_similarity_threshold: Option<f64>,
}

impl Filter {
    pub fn has_threshold(&self) -> bool {
        self.vector_distance_threshold.is_some() || self.vector_similarity_threshold.is_some()
    }
}

fn validate_filter(filter: &Filter) -> Result<(), ValidationError> {
    let thresholds = [filter.vector_distance_threshold, filter.vector_similarity_threshold];
    if thresholds.iter().flatten().any(|t| !t.is_finite()) {
        let mut err = ValidationError::new("non_finite_threshold");
        err.message = Some("filter thresholds must be finite numbers".into());
        return Err(err);
    }
    if filter.vector_distance_threshold.is_some() && filter.vector_similarity_threshold.is_some() {
        let mut err = ValidationError::new("exclusive_thresholds");
        err.message = Some(
            "vector_distance_threshold and vector_similarity_threshold are mutually exclusive"
                .into(),
        );
        return Err(err);
    }
    Ok(())
}

/// Resolved corpus with file scoping, as sent on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VertexRagResource {
    pub rag_corpus: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rag_file_ids: Vec<String>,
}

/// What the query runs against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum VertexRagStore {
    /// Corpus plus optional file ids.
    RagResources(Vec<VertexRagResource>),
    /// Whole corpora by name.
    RagCorpora(Vec<String>),
}

impl VertexRagStore {
    /// The single corpus this store targets.
    pub fn corpus(&self) -> Option<&str> {
        match self {
            VertexRagStore::RagResources(resources) => {
                resources.first().map(|r| r.rag_corpus.as_str())
            }
            VertexRagStore::RagCorpora(corpora) => corpora.first().map(String::as_str),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RagQuery {
    pub text: String,
    pub rag_retrieval_config: RagRetrievalConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveContextsRequest {
    /// `projects/{project}/locations/{location}`; part of the URL, not the body.
    #[serde(skip)]
    pub parent: String,
    pub vertex_rag_store: VertexRagStore,
    pub query: RagQuery,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveContextsResponse {
    #[serde(default)]
    pub contexts: RagContexts,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RagContexts {
    #[serde(default)]
    pub contexts: Vec<RagContext>,
}

/// One retrieved chunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RagContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}
