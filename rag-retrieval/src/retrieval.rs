//! Builds `retrieveContexts` requests and submits them.

use crate::client::RagServiceClient;
use crate::error::RagError;
use crate::names::{resolve_corpus_name, LocationPath};
use crate::resources::{
    Filter, HybridSearch, RagQuery, RagResource, RagRetrievalConfig, RetrieveContextsRequest,
    RetrieveContextsResponse, VertexRagResource, VertexRagStore,
};
use validator::Validate;

pub const DEFAULT_SIMILARITY_TOP_K: i32 = 10;
pub const DEFAULT_VECTOR_SEARCH_ALPHA: f32 = 0.5;
pub const DEFAULT_VECTOR_DISTANCE_THRESHOLD: f64 = 0.3;

const DEPRECATION_TARGET: &str = "rag_retrieval::deprecation";

/// Arguments of a retrieval query.
///
/// Exactly one corpus is addressed, through either `rag_resources` or the
/// deprecated `rag_corpora`. The three scalar tuning fields are deprecated in
/// favour of `rag_retrieval_config` but still honoured.
#[derive(Debug, Clone, Default)]
pub struct RetrievalQuery {
    pub text: String,
    pub rag_resources: Vec<RagResource>,
    pub rag_corpora: Vec<String>,
    pub similarity_top_k: Option<i32>,
    pub vector_distance_threshold: Option<f64>,
    pub vector_search_alpha: Option<f32>,
    pub rag_retrieval_config: Option<RagRetrievalConfig>,
}

impl RetrievalQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_rag_resource(mut self, resource: RagResource) -> Self {
        self.rag_resources.push(resource);
        self
    }

    pub fn with_rag_corpus(mut self, name: impl Into<String>) -> Self {
        self.rag_corpora.push(name.into());
        self
    }

    pub fn with_similarity_top_k(mut self, top_k: i32) -> Self {
        self.similarity_top_k = Some(top_k);
        self
    }

    pub fn with_vector_distance_threshold(mut self, threshold: f64) -> Self {
        self.vector_distance_threshold = Some(threshold);
        self
    }

    pub fn with_vector_search_alpha(mut self, alpha: f32) -> Self {
        self.vector_search_alpha = Some(alpha);
        self
    }

    pub fn with_retrieval_config(mut self, config: RagRetrievalConfig) -> Self {
        self.rag_retrieval_config = Some(config);
        self
    }
}

fn warn_deprecated(parameter: &'static str, replacement: &'static str) {
    tracing::warn!(
        target: DEPRECATION_TARGET,
        parameter,
        replacement,
        "{} is deprecated. Please use {} instead.",
        parameter,
        replacement
    );
}

/// Final retrieval config for `query`.
///
/// Sub-fields set on `rag_retrieval_config` win. Unset ones are filled from
/// the deprecated scalars, or from the defaults when those are unset too.
/// A filter that already carries a similarity threshold gets no default
/// distance threshold, the two being exclusive. An explicit
/// `vector_distance_threshold` is still carried over so that the conflict
/// fails validation.
pub fn reconcile_retrieval_config(query: &RetrievalQuery) -> RagRetrievalConfig {
    let top_k = match query.similarity_top_k {
        Some(top_k) => {
            warn_deprecated("similarity_top_k", "rag_retrieval_config.top_k");
            top_k
        }
        None => DEFAULT_SIMILARITY_TOP_K,
    };
    let alpha = match query.vector_search_alpha {
        Some(alpha) => {
            warn_deprecated("vector_search_alpha", "rag_retrieval_config.alpha");
            alpha
        }
        None => DEFAULT_VECTOR_SEARCH_ALPHA,
    };
    if query.vector_distance_threshold.is_some() {
        warn_deprecated(
            "vector_distance_threshold",
            "rag_retrieval_config.filter.vector_distance_threshold",
        );
    }

    let mut config = query.rag_retrieval_config.clone().unwrap_or_default();

    config.top_k.get_or_insert(top_k);
    config
        .hybrid_search
        .get_or_insert_with(HybridSearch::default)
        .alpha
        .get_or_insert(alpha);

    let filter = config.filter.get_or_insert_with(Filter::default);
    match query.vector_distance_threshold {
        // A supplied threshold is always kept; validation rejects it next to
        // a similarity threshold.
        Some(threshold) => {
            filter.vector_distance_threshold.get_or_insert(threshold);
        }
        None if !filter.has_threshold() => {
            filter.vector_distance_threshold = Some(DEFAULT_VECTOR_DISTANCE_THRESHOLD);
        }
        None => {}
    }

    config
}

/// Resolve the corpus and assemble the request without sending it.
pub fn build_retrieve_contexts_request(
    parent: &LocationPath,
    query: RetrievalQuery,
) -> Result<RetrieveContextsRequest, RagError> {
    let (name, resource) = match (query.rag_resources.as_slice(), query.rag_corpora.as_slice()) {
        ([resource], _) => (resource.rag_corpus.as_str(), Some(resource)),
        ([_, _, ..], _) => return Err(RagError::invalid("Currently only support 1 RagResource.")),
        ([], [corpus]) => {
            warn_deprecated("rag_corpora", "rag_resources");
            (corpus.as_str(), None)
        }
        ([], [_, _, ..]) => return Err(RagError::invalid("Currently only support 1 RagCorpus.")),
        ([], []) => {
            return Err(RagError::invalid(
                "rag_resources or rag_corpora must be specified.",
            ))
        }
    };

    let rag_corpus = resolve_corpus_name(name, parent)?;

    let vertex_rag_store = match resource {
        Some(resource) => VertexRagStore::RagResources(vec![VertexRagResource {
            rag_corpus,
            rag_file_ids: resource.rag_file_ids.clone(),
        }]),
        None => VertexRagStore::RagCorpora(vec![rag_corpus]),
    };

    let rag_retrieval_config = reconcile_retrieval_config(&query);
    rag_retrieval_config
        .validate()
        .map_err(|e| RagError::invalid(format!("Invalid rag_retrieval_config: {}", e)))?;

    Ok(RetrieveContextsRequest {
        parent: parent.to_string(),
        vertex_rag_store,
        query: RagQuery {
            text: query.text,
            rag_retrieval_config,
        },
    })
}

/// Retrieve the contexts most relevant to `query.text`.
///
/// Validation failures return [`RagError::InvalidArgument`] before the
/// client is called. Client failures return [`RagError::Retrieval`] with the
/// client error as source.
pub async fn retrieval_query<C>(
    client: &C,
    parent: &LocationPath,
    query: RetrievalQuery,
) -> Result<RetrieveContextsResponse, RagError>
where
    C: RagServiceClient + ?Sized,
{
    let request = build_retrieve_contexts_request(parent, query)?;

    tracing::debug!(
        parent = %request.parent,
        corpus = request.vertex_rag_store.corpus().unwrap_or_default(),
        top_k = ?request.query.rag_retrieval_config.top_k,
        "Submitting retrieveContexts request"
    );

    client.retrieve_contexts(&request).await.map_err(|source| {
        tracing::error!(error = %source, parent = %request.parent, "retrieveContexts failed");
        RagError::Retrieval { source }
    })
}
