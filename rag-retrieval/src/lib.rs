//! Retrieval queries against a managed RAG corpus.
//!
//! [`retrieval_query`] resolves the corpus, reconciles the deprecated scalar
//! tuning parameters with a structured [`RagRetrievalConfig`], and submits a
//! single [`RetrieveContextsRequest`] through an injected
//! [`RagServiceClient`].
//!
//! ```ignore
//! let client = VertexRagClient::new(VertexRagClientConfig::for_location("us-central1"))?;
//! let parent = LocationPath::new("my-project", "us-central1");
//!
//! let response = retrieval_query(
//!     &client,
//!     &parent,
//!     RetrievalQuery::new("Why is the sky blue?").with_rag_resource(
//!         RagResource::new("projects/my-project/locations/us-central1/ragCorpora/rag-corpus-1")
//!             .with_file_ids(["rag-file-1", "rag-file-2"]),
//!     ),
//! )
//! .await?;
//! ```

pub mod client;
pub mod error;
pub mod names;
pub mod resources;
pub mod retrieval;

pub use client::{RagServiceClient, VertexRagClient, VertexRagClientConfig};
pub use error::{ClientError, RagError};
pub use names::{parse_rag_corpus_path, resolve_corpus_name, LocationPath, RagCorpusPath};
pub use resources::{
    Filter, HybridSearch, RagContext, RagContexts, RagQuery, RagResource, RagRetrievalConfig,
    RetrieveContextsRequest, RetrieveContextsResponse, VertexRagResource, VertexRagStore,
};
pub use retrieval::{
    build_retrieve_contexts_request, reconcile_retrieval_config, retrieval_query, RetrievalQuery,
    DEFAULT_SIMILARITY_TOP_K, DEFAULT_VECTOR_DISTANCE_THRESHOLD, DEFAULT_VECTOR_SEARCH_ALPHA,
};
