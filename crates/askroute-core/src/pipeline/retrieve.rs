//! Document retrieval stage

use crate::db::Database;
use crate::error::Result;
use crate::llm::Embedder;

/// Fixed context used when retrieval matches nothing, distinguishable
/// from real passage content by the caller
pub const NO_DOCUMENTS_SENTINEL: &str =
    "No relevant documents found in the collection. (Has a PDF been ingested?)";

/// Outcome of a retrieval: matched passages or a typed empty marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievedContext {
    /// Matched chunk texts joined with blank lines, rank order preserved
    Passages(String),
    /// Zero matches
    Empty,
}

impl RetrievedContext {
    /// Render into the context blob handed to the generator
    pub fn into_blob(self) -> String {
        match self {
            RetrievedContext::Passages(text) => text,
            RetrievedContext::Empty => NO_DOCUMENTS_SENTINEL.to_string(),
        }
    }
}

/// Embed the query and fetch the top-k nearest chunks.
///
/// Store and embedding failures propagate; only a zero-match result is
/// soft, reported as `RetrievedContext::Empty`.
pub async fn retrieve(
    db: &Database,
    embedder: &dyn Embedder,
    collection: &str,
    question: &str,
    top_k: usize,
) -> Result<RetrievedContext> {
    let query_embedding = embedder.embed(question).await?;
    let results = db.query_nearest(collection, &query_embedding, top_k)?;

    if results.is_empty() {
        return Ok(RetrievedContext::Empty);
    }

    tracing::debug!(matches = results.len(), "retrieved document chunks");

    let joined = results
        .iter()
        .map(|r| r.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    Ok(RetrievedContext::Passages(joined))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_renders_sentinel() {
        assert_eq!(RetrievedContext::Empty.into_blob(), NO_DOCUMENTS_SENTINEL);
    }

    #[test]
    fn test_passages_render_verbatim() {
        let ctx = RetrievedContext::Passages("first\n\nsecond".to_string());
        assert_eq!(ctx.into_blob(), "first\n\nsecond");
    }
}
