//! Corpus resource names.

use crate::error::RagError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static RAG_CORPUS_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^projects/(?P<project>.+?)/locations/(?P<location>.+?)/ragCorpora/(?P<rag_corpus>.+?)$")
        .expect("valid corpus path pattern")
});

/// Ids the service accepts for a corpus given without its parent.
static RESOURCE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-zA-Z0-9._-]{0,127}$").expect("valid resource id pattern"));

/// `projects/{project}/locations/{location}`, the parent of every corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationPath {
    pub project: String,
    pub location: String,
}

impl LocationPath {
    pub fn new(project: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            location: location.into(),
        }
    }

    /// Full resource name of a corpus under this location.
    pub fn rag_corpus(&self, corpus_id: &str) -> String {
        format!("{}/ragCorpora/{}", self, corpus_id)
    }
}

impl fmt::Display for LocationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "projects/{}/locations/{}", self.project, self.location)
    }
}

/// Components of a fully-qualified corpus name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RagCorpusPath {
    pub project: String,
    pub location: String,
    pub rag_corpus: String,
}

pub fn parse_rag_corpus_path(name: &str) -> Option<RagCorpusPath> {
    let captures = RAG_CORPUS_PATH.captures(name)?;
    Some(RagCorpusPath {
        project: captures["project"].to_string(),
        location: captures["location"].to_string(),
        rag_corpus: captures["rag_corpus"].to_string(),
    })
}

/// Canonical corpus name for `name`.
///
/// Fully-qualified names are returned unchanged; bare ids are qualified under
/// `parent`; anything else is rejected.
pub fn resolve_corpus_name(name: &str, parent: &LocationPath) -> Result<String, RagError> {
    if parse_rag_corpus_path(name).is_some() {
        Ok(name.to_string())
    } else if RESOURCE_ID.is_match(name) {
        Ok(parent.rag_corpus(name))
    } else {
        Err(RagError::invalid(format!(
            "Invalid RagCorpus name: {}. Proper format should be: \
             projects/{{project}}/locations/{{location}}/ragCorpora/{{rag_corpus_id}}",
            name
        )))
    }
}
