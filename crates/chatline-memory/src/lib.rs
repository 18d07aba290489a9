// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reference corpus for context-augmented answers.
//!
//! The document is split once at startup ([`splitter::split`]), each chunk is
//! embedded into an immutable [`CorpusIndex`], and [`CorpusRetriever`] ranks
//! chunks against a query by cosine similarity.

pub mod index;
pub mod retriever;
pub mod splitter;
pub mod types;

pub use index::CorpusIndex;
pub use retriever::CorpusRetriever;
pub use types::{Chunk, ScoredChunk, cosine_similarity};
