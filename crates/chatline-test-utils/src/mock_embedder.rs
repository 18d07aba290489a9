// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic embedder for retrieval tests.
//!
//! Each text maps to a fixed pseudo-random unit vector seeded from its bytes.
//! Identical texts embed identically; distinct texts are nearly orthogonal.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use chatline_core::ChatlineError;
use chatline_core::traits::{EmbeddingAdapter, PluginAdapter};
use chatline_core::types::{AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus};

pub struct MockEmbedder {
    dimension: usize,
    batch_sizes: Mutex<Vec<usize>>,
    fail_next: AtomicBool,
}

impl MockEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            batch_sizes: Mutex::new(Vec::new()),
            fail_next: AtomicBool::new(false),
        }
    }

    /// The vector `embed` produces for `text`.
    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        // FNV-1a seed, then an xorshift stream.
        let mut state = text.bytes().fold(0xcbf2_9ce4_8422_2325u64, |h, b| {
            (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
        });
        let mut v: Vec<f32> = (0..self.dimension)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                (state % 2001) as f32 / 1000.0 - 1.0
            })
            .collect();
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        v
    }

    /// Size of every `embed` call so far, in call order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes
            .lock()
            .map(|sizes| sizes.clone())
            .unwrap_or_default()
    }

    /// Make the next `embed` call fail with a `Provider` error.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl PluginAdapter for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, ChatlineError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ChatlineError> {
        Ok(())
    }
}

#[async_trait]
impl EmbeddingAdapter for MockEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, ChatlineError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ChatlineError::Provider {
                message: "mock embedding failure".into(),
                source: None,
            });
        }
        if let Ok(mut sizes) = self.batch_sizes.lock() {
            sizes.push(input.texts.len());
        }
        Ok(EmbeddingOutput {
            embeddings: input.texts.iter().map(|t| self.vector_for(t)).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_same_vector() {
        let embedder = MockEmbedder::new(8);
        assert_eq!(embedder.vector_for("abc"), embedder.vector_for("abc"));
        assert_ne!(embedder.vector_for("abc"), embedder.vector_for("abd"));
    }

    #[test]
    fn vectors_are_unit_length() {
        let v = MockEmbedder::new(16).vector_for("hello");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn embed_records_batches_and_can_fail() {
        let embedder = MockEmbedder::new(4);
        let out = embedder
            .embed(EmbeddingInput {
                texts: vec!["a".into(), "b".into()],
            })
            .await
            .unwrap();
        assert_eq!(out.embeddings.len(), 2);
        assert_eq!(embedder.batch_sizes(), vec![2]);

        embedder.fail_next();
        assert!(embedder.embed(EmbeddingInput { texts: vec!["c".into()] }).await.is_err());
        assert_eq!(embedder.batch_sizes(), vec![2]);
    }
}
