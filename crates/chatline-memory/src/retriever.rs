// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query-time retrieval: embed the query, then rank corpus chunks.

use std::path::Path;
use std::sync::Arc;

use chatline_config::model::CorpusConfig;
use chatline_core::ChatlineError;
use chatline_core::traits::EmbeddingAdapter;
use chatline_core::types::EmbeddingInput;
use tracing::{debug, info, warn};

use crate::index::CorpusIndex;
use crate::splitter;
use crate::types::ScoredChunk;

/// Retrieves the most relevant corpus chunks for a query string.
pub struct CorpusRetriever {
    index: CorpusIndex,
    embedder: Arc<dyn EmbeddingAdapter + Send + Sync>,
    top_k: usize,
}

impl CorpusRetriever {
    pub fn new(
        index: CorpusIndex,
        embedder: Arc<dyn EmbeddingAdapter + Send + Sync>,
        top_k: usize,
    ) -> Self {
        Self {
            index,
            embedder,
            top_k,
        }
    }

    /// Reads the document at `path`, splits it per `config`, and embeds
    /// every chunk.
    pub async fn from_file(
        path: impl AsRef<Path>,
        config: &CorpusConfig,
        embedder: Arc<dyn EmbeddingAdapter + Send + Sync>,
    ) -> Result<Self, ChatlineError> {
        let path = path.as_ref();
        let document = tokio::fs::read_to_string(path).await.map_err(|e| {
            ChatlineError::Retrieval(format!(
                "failed to read corpus {}: {e}",
                path.display()
            ))
        })?;

        let chunks = splitter::split(
            &document,
            &config.separator,
            config.chunk_size,
            config.chunk_overlap,
        );
        if chunks.is_empty() {
            warn!(path = %path.display(), "corpus is empty, retrieval will return no context");
        }
        info!(path = %path.display(), chunks = chunks.len(), "corpus split");

        let index = CorpusIndex::build(chunks, embedder.as_ref(), config.embed_batch_size).await?;
        Ok(Self::new(index, embedder, config.top_k))
    }

    pub fn index(&self) -> &CorpusIndex {
        &self.index
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Embeds `query` and returns the top-k chunks, best first.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<ScoredChunk>, ChatlineError> {
        if self.index.is_empty() {
            return Ok(Vec::new());
        }

        let output = self
            .embedder
            .embed(EmbeddingInput {
                texts: vec![query.to_string()],
            })
            .await?;
        let query_embedding = output.embeddings.into_iter().next().ok_or_else(|| {
            ChatlineError::Retrieval("embedding returned no results".to_string())
        })?;

        let results = self.index.search(&query_embedding, self.top_k)?;
        debug!(
            query_len = query.len(),
            results = results.len(),
            top_score = results.first().map(|r| r.score),
            "corpus retrieval complete"
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatline_test_utils::MockEmbedder;

    fn config(top_k: usize) -> CorpusConfig {
        CorpusConfig {
            chunk_size: 40,
            top_k,
            ..CorpusConfig::default()
        }
    }

    const DOC: &str = "Store hours are nine to five.\n\n\
                       Returns are accepted within 30 days.\n\n\
                       Shipping is free over 50 dollars.";

    #[tokio::test]
    async fn from_file_splits_and_indexes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.txt");
        std::fs::write(&path, DOC).unwrap();

        let embedder = Arc::new(MockEmbedder::new(32));
        let retriever = CorpusRetriever::from_file(&path, &config(2), embedder)
            .await
            .unwrap();
        assert_eq!(retriever.index().len(), 3);
        assert_eq!(retriever.top_k(), 2);
    }

    #[tokio::test]
    async fn retrieve_returns_top_k_best_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.txt");
        std::fs::write(&path, DOC).unwrap();

        let embedder = Arc::new(MockEmbedder::new(32));
        let retriever = CorpusRetriever::from_file(&path, &config(2), embedder)
            .await
            .unwrap();

        let results = retriever
            .retrieve("Returns are accepted within 30 days.")
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.text, "Returns are accepted within 30 days.");
    }

    #[tokio::test]
    async fn retrieval_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.txt");
        std::fs::write(&path, DOC).unwrap();

        let embedder = Arc::new(MockEmbedder::new(32));
        let retriever = CorpusRetriever::from_file(&path, &config(3), embedder)
            .await
            .unwrap();

        let first = retriever.retrieve("shipping cost").await.unwrap();
        let second = retriever.retrieve("shipping cost").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn missing_file_is_retrieval_error() {
        let embedder = Arc::new(MockEmbedder::new(4));
        let err = CorpusRetriever::from_file("/nonexistent/corpus.txt", &config(1), embedder)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ChatlineError::Retrieval(_)));
    }

    #[tokio::test]
    async fn empty_corpus_retrieves_nothing_without_embedding() {
        let embedder = Arc::new(MockEmbedder::new(4));
        let retriever = CorpusRetriever::new(CorpusIndex::default(), embedder.clone(), 4);
        assert!(retriever.retrieve("anything").await.unwrap().is_empty());
        assert!(embedder.batch_sizes().is_empty());
    }

    #[tokio::test]
    async fn embedder_failure_propagates() {
        let embedder = Arc::new(MockEmbedder::new(4));
        let index = CorpusIndex::from_parts(vec!["a".into()], vec![vec![1.0; 4]]).unwrap();
        let retriever = CorpusRetriever::new(index, embedder.clone(), 1);
        embedder.fail_next();
        let err = retriever.retrieve("a").await.unwrap_err();
        assert!(matches!(err, ChatlineError::Provider { .. }));
    }
}
