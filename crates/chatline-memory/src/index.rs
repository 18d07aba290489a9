// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory vector index over corpus chunks.

use chatline_core::ChatlineError;
use chatline_core::traits::EmbeddingAdapter;
use chatline_core::types::EmbeddingInput;
use tracing::{debug, info};

use crate::types::{Chunk, ScoredChunk, cosine_similarity};

/// Immutable index of chunks and their embeddings. Built once at startup.
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    chunks: Vec<Chunk>,
    embeddings: Vec<Vec<f32>>,
}

impl CorpusIndex {
    /// Embeds every chunk through `embedder`, `batch_size` texts per call.
    ///
    /// Fails if the embedder returns the wrong number of vectors or vectors
    /// of inconsistent dimension.
    pub async fn build(
        texts: Vec<String>,
        embedder: &dyn EmbeddingAdapter,
        batch_size: usize,
    ) -> Result<Self, ChatlineError> {
        let batch_size = batch_size.max(1);
        let mut embeddings: Vec<Vec<f32>> = Vec::with_capacity(texts.len());

        for (batch_no, batch) in texts.chunks(batch_size).enumerate() {
            let output = embedder
                .embed(EmbeddingInput {
                    texts: batch.to_vec(),
                })
                .await?;
            if output.embeddings.len() != batch.len() {
                return Err(ChatlineError::Retrieval(format!(
                    "embedder returned {} vectors for {} chunks",
                    output.embeddings.len(),
                    batch.len()
                )));
            }
            debug!(batch = batch_no, size = batch.len(), "embedded corpus batch");
            embeddings.extend(output.embeddings);
        }

        let index = Self::from_parts(texts, embeddings)?;
        info!(
            chunks = index.len(),
            dimension = index.dimension().unwrap_or(0),
            "corpus index built"
        );
        Ok(index)
    }

    /// Assembles an index from precomputed embeddings.
    pub fn from_parts(
        texts: Vec<String>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Self, ChatlineError> {
        if texts.len() != embeddings.len() {
            return Err(ChatlineError::Retrieval(format!(
                "{} embeddings for {} chunks",
                embeddings.len(),
                texts.len()
            )));
        }
        if let Some(first) = embeddings.first() {
            let dim = first.len();
            if let Some(pos) = embeddings.iter().position(|e| e.len() != dim) {
                return Err(ChatlineError::Retrieval(format!(
                    "embedding {pos} has dimension {}, expected {dim}",
                    embeddings[pos].len()
                )));
            }
        }

        let chunks = texts
            .into_iter()
            .enumerate()
            .map(|(position, text)| Chunk { position, text })
            .collect();
        Ok(Self { chunks, embeddings })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn dimension(&self) -> Option<usize> {
        self.embeddings.first().map(Vec::len)
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Returns up to `k` chunks ranked by cosine similarity, best first.
    /// Equal scores keep document order.
    pub fn search(
        &self,
        query_embedding: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredChunk>, ChatlineError> {
        if let Some(dim) = self.dimension()
            && dim != query_embedding.len()
        {
            return Err(ChatlineError::Retrieval(format!(
                "query embedding has dimension {}, index has {dim}",
                query_embedding.len()
            )));
        }

        let mut scored: Vec<ScoredChunk> = self
            .chunks
            .iter()
            .zip(&self.embeddings)
            .map(|(chunk, embedding)| ScoredChunk {
                chunk: chunk.clone(),
                score: cosine_similarity(query_embedding, embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then(a.chunk.position.cmp(&b.chunk.position))
        });
        scored.truncate(k);
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatline_test_utils::MockEmbedder;

    fn index() -> CorpusIndex {
        CorpusIndex::from_parts(
            vec!["north".into(), "east".into(), "north again".into(), "south".into()],
            vec![
                vec![1.0, 0.0],
                vec![0.0, 1.0],
                vec![2.0, 0.0],
                vec![-1.0, 0.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn search_ranks_by_similarity() {
        let results = index().search(&[1.0, 0.1], 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.text, "north");
        assert_eq!(results[1].chunk.text, "north again");
        assert!(results[0].score >= results[1].score);
    }

    #[test]
    fn equal_scores_keep_document_order() {
        // "north" and "north again" point the same way.
        let results = index().search(&[1.0, 0.0], 4).unwrap();
        assert_eq!(results[0].chunk.position, 0);
        assert_eq!(results[1].chunk.position, 2);
        assert_eq!(results[3].chunk.text, "south");
    }

    #[test]
    fn k_larger_than_index_returns_everything() {
        assert_eq!(index().search(&[0.0, 1.0], 10).unwrap().len(), 4);
    }

    #[test]
    fn k_zero_returns_nothing() {
        assert!(index().search(&[0.0, 1.0], 0).unwrap().is_empty());
    }

    #[test]
    fn dimension_mismatch_is_retrieval_error() {
        let err = index().search(&[1.0, 0.0, 0.0], 1).unwrap_err();
        assert!(matches!(err, ChatlineError::Retrieval(_)));
    }

    #[test]
    fn from_parts_rejects_ragged_embeddings() {
        let err = CorpusIndex::from_parts(
            vec!["a".into(), "b".into()],
            vec![vec![1.0, 0.0], vec![1.0]],
        )
        .unwrap_err();
        assert!(err.to_string().contains("dimension"));
    }

    #[test]
    fn empty_index_searches_to_nothing() {
        let index = CorpusIndex::default();
        assert!(index.is_empty());
        assert!(index.search(&[1.0], 3).unwrap().is_empty());
    }

    #[tokio::test]
    async fn build_embeds_in_batches() {
        let embedder = MockEmbedder::new(8);
        let texts: Vec<String> = (0..5).map(|i| format!("chunk {i}")).collect();
        let index = CorpusIndex::build(texts, &embedder, 2).await.unwrap();

        assert_eq!(index.len(), 5);
        assert_eq!(index.dimension(), Some(8));
        assert_eq!(embedder.batch_sizes(), vec![2, 2, 1]);
    }

    #[tokio::test]
    async fn build_finds_exact_text() {
        let embedder = MockEmbedder::new(16);
        let texts = vec!["opening hours".to_string(), "return policy".to_string()];
        let index = CorpusIndex::build(texts, &embedder, 64).await.unwrap();

        let query = embedder.vector_for("return policy");
        let results = index.search(&query, 1).unwrap();
        assert_eq!(results[0].chunk.text, "return policy");
        assert!((results[0].score - 1.0).abs() < 1e-5);
    }
}
