//! End-to-end behaviour of `retrieval_query` against an in-memory client.

use async_trait::async_trait;
use rag_retrieval::{
    retrieval_query, ClientError, LocationPath, RagContext, RagContexts, RagError, RagResource,
    RagRetrievalConfig, RagServiceClient, RetrievalQuery, RetrieveContextsRequest,
    RetrieveContextsResponse, VertexRagStore,
};
use std::sync::Mutex;

/// Records every request and answers with a canned result.
struct RecordingClient {
    requests: Mutex<Vec<RetrieveContextsRequest>>,
    fail: bool,
}

impl RecordingClient {
    fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    fn requests(&self) -> Vec<RetrieveContextsRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RagServiceClient for RecordingClient {
    async fn retrieve_contexts(
        &self,
        request: &RetrieveContextsRequest,
    ) -> Result<RetrieveContextsResponse, ClientError> {
        self.requests.lock().unwrap().push(request.clone());

        if self.fail {
            return Err(ClientError::Api {
                status: 403,
                message: "PERMISSION_DENIED: caller lacks aiplatform.ragCorpora.get".to_string(),
            });
        }

        Ok(RetrieveContextsResponse {
            contexts: RagContexts {
                contexts: vec![RagContext {
                    source_uri: Some("gs://corpus/sky.pdf".to_string()),
                    text: Some("Rayleigh scattering".to_string()),
                    distance: Some(0.12),
                    ..Default::default()
                }],
            },
        })
    }
}

fn parent() -> LocationPath {
    LocationPath::new("my-project", "us-central1")
}

#[tokio::test]
async fn returns_client_response_unchanged() {
    let client = RecordingClient::new();

    let response = retrieval_query(
        &client,
        &parent(),
        RetrievalQuery::new("Why is the sky blue?").with_rag_resource(
            RagResource::new("projects/my-project/locations/us-central1/ragCorpora/rag-corpus-1")
                .with_file_ids(["rag-file-1", "rag-file-2"]),
        ),
    )
    .await
    .unwrap();

    assert_eq!(response.contexts.contexts.len(), 1);
    assert_eq!(
        response.contexts.contexts[0].text.as_deref(),
        Some("Rayleigh scattering")
    );

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query.text, "Why is the sky blue?");
    assert_eq!(requests[0].parent, "projects/my-project/locations/us-central1");
    match &requests[0].vertex_rag_store {
        VertexRagStore::RagResources(resources) => {
            assert_eq!(resources.len(), 1);
            assert_eq!(resources[0].rag_file_ids, vec!["rag-file-1", "rag-file-2"]);
        }
        other => panic!("expected resource-scoped store, got {other:?}"),
    }
}

#[tokio::test]
async fn submits_default_config_when_nothing_is_tuned() {
    let client = RecordingClient::new();

    retrieval_query(
        &client,
        &parent(),
        RetrievalQuery::new("q").with_rag_corpus("rag-corpus-1"),
    )
    .await
    .unwrap();

    let config = &client.requests()[0].query.rag_retrieval_config;
    assert_eq!(
        config,
        &RagRetrievalConfig::default()
            .with_top_k(10)
            .with_alpha(0.5)
            .with_vector_distance_threshold(0.3)
    );
}

#[tokio::test]
async fn legacy_scalars_reach_the_request() {
    let client = RecordingClient::new();

    retrieval_query(
        &client,
        &parent(),
        RetrievalQuery::new("q")
            .with_rag_corpus("rag-corpus-1")
            .with_similarity_top_k(2)
            .with_vector_distance_threshold(0.5)
            .with_vector_search_alpha(0.75),
    )
    .await
    .unwrap();

    let config = &client.requests()[0].query.rag_retrieval_config;
    assert_eq!(config.top_k, Some(2));
    assert_eq!(config.alpha(), Some(0.75));
    assert_eq!(config.vector_distance_threshold(), Some(0.5));
}

#[tokio::test]
async fn validation_errors_never_reach_the_client() {
    let client = RecordingClient::new();

    let cases = vec![
        RetrievalQuery::new("q"),
        RetrievalQuery::new("q")
            .with_rag_resource(RagResource::new("a"))
            .with_rag_resource(RagResource::new("b"))
            .with_rag_corpus("c")
            .with_rag_corpus("d"),
        RetrievalQuery::new("q").with_rag_corpus("Not A Valid Name"),
        RetrievalQuery::new("q")
            .with_rag_corpus("rag-corpus-1")
            .with_retrieval_config(RagRetrievalConfig::default().with_alpha(-0.1)),
    ];

    for query in cases {
        let err = retrieval_query(&client, &parent(), query).await.unwrap_err();
        assert!(matches!(err, RagError::InvalidArgument(_)), "{err}");
        assert!(!err.is_retryable());
    }

    assert!(client.requests().is_empty());
}

#[tokio::test]
async fn client_failure_is_wrapped_with_source() {
    let client = RecordingClient::failing();

    let err = retrieval_query(
        &client,
        &parent(),
        RetrievalQuery::new("q").with_rag_corpus("rag-corpus-1"),
    )
    .await
    .unwrap_err();

    match &err {
        RagError::Retrieval { source } => {
            assert!(matches!(source, ClientError::Api { status: 403, .. }));
        }
        other => panic!("expected retrieval error, got {other:?}"),
    }
    assert!(err
        .to_string()
        .starts_with("Failed in retrieving contexts due to: RAG API error 403"));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn works_through_a_trait_object() {
    let client: Box<dyn RagServiceClient> = Box::new(RecordingClient::new());

    let response = retrieval_query(
        client.as_ref(),
        &parent(),
        RetrievalQuery::new("q").with_rag_corpus("rag-corpus-1"),
    )
    .await
    .unwrap();

    assert_eq!(response.contexts.contexts.len(), 1);
}
