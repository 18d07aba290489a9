// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Separator-based text splitter.
//!
//! The document is cut on a separator, then adjacent pieces are merged
//! greedily until the next piece would push the chunk past the size limit.
//! Lengths are counted in characters and include the separators that join
//! pieces inside a chunk. A piece longer than the limit on its own still
//! becomes a single (oversized) chunk.

use std::collections::VecDeque;

use tracing::warn;

/// Splits `document` into chunks of at most `max_chunk_size` characters.
///
/// `overlap` is the number of trailing characters of one chunk that may be
/// carried into the next; `0` means no text is repeated. Chunks are trimmed
/// and empty chunks are dropped.
pub fn split(document: &str, separator: &str, max_chunk_size: usize, overlap: usize) -> Vec<String> {
    let pieces: Vec<&str> = if separator.is_empty() {
        document
            .char_indices()
            .map(|(i, c)| &document[i..i + c.len_utf8()])
            .collect()
    } else {
        document.split(separator).filter(|p| !p.is_empty()).collect()
    };
    merge(&pieces, separator, max_chunk_size, overlap)
}

fn merge(pieces: &[&str], separator: &str, max_chunk_size: usize, overlap: usize) -> Vec<String> {
    let sep_len = separator.chars().count();
    let mut chunks = Vec::new();
    let mut current: VecDeque<(&str, usize)> = VecDeque::new();
    let mut total = 0usize;

    for &piece in pieces {
        let len = piece.chars().count();
        let joiner = if current.is_empty() { 0 } else { sep_len };

        if total + len + joiner > max_chunk_size {
            if total > max_chunk_size {
                warn!(
                    size = total,
                    limit = max_chunk_size,
                    "created a chunk longer than the configured size"
                );
            }
            if !current.is_empty() {
                push_chunk(&mut chunks, &current, separator);

                // Drop leading pieces until what remains fits the overlap
                // budget and leaves room for the incoming piece.
                while total > overlap
                    || (total > 0
                        && total + len + if current.is_empty() { 0 } else { sep_len }
                            > max_chunk_size)
                {
                    let Some((_, first_len)) = current.pop_front() else {
                        break;
                    };
                    total -= first_len + if current.is_empty() { 0 } else { sep_len };
                }
            }
        }

        let joiner = if current.is_empty() { 0 } else { sep_len };
        current.push_back((piece, len));
        total += len + joiner;
    }

    push_chunk(&mut chunks, &current, separator);
    chunks
}

fn push_chunk(chunks: &mut Vec<String>, current: &VecDeque<(&str, usize)>, separator: &str) {
    let joined = current
        .iter()
        .map(|(p, _)| *p)
        .collect::<Vec<_>>()
        .join(separator);
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn merges_small_paragraphs() {
        let doc = "aaa\n\nbbb\n\nccc";
        assert_eq!(split(doc, "\n\n", 8, 0), vec!["aaa\n\nbbb", "ccc"]);
    }

    #[test]
    fn separator_counts_toward_length() {
        // "aaa" + "\n\n" + "bbb" is 8 characters.
        assert_eq!(split("aaa\n\nbbb", "\n\n", 7, 0), vec!["aaa", "bbb"]);
        assert_eq!(split("aaa\n\nbbb", "\n\n", 8, 0), vec!["aaa\n\nbbb"]);
    }

    #[test]
    fn oversized_piece_becomes_own_chunk() {
        let doc = format!("short\n\n{}\n\ntail", "x".repeat(50));
        let chunks = split(&doc, "\n\n", 10, 0);
        assert_eq!(chunks, vec!["short".to_string(), "x".repeat(50), "tail".to_string()]);
    }

    #[test]
    fn chunks_are_trimmed_and_empty_dropped() {
        let doc = "  first  \n\n\n\n   \n\n second ";
        let chunks = split(doc, "\n\n", 5, 0);
        assert_eq!(chunks, vec!["first", "second"]);
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let doc = "ねこ\n\nいぬ";
        // 2 + 2 + 2 characters, well under the limit even though it is 16 bytes.
        assert_eq!(split(doc, "\n\n", 6, 0), vec!["ねこ\n\nいぬ"]);
    }

    #[test]
    fn overlap_repeats_trailing_pieces() {
        let doc = "aa\n\nbb\n\ncc\n\ndd";
        let chunks = split(doc, "\n\n", 6, 2);
        assert_eq!(chunks, vec!["aa\n\nbb", "bb\n\ncc", "cc\n\ndd"]);
    }

    #[test]
    fn empty_document_has_no_chunks() {
        assert!(split("", "\n\n", 100, 0).is_empty());
    }

    proptest! {
        #[test]
        fn no_overlap_preserves_every_piece_in_order(
            pieces in proptest::collection::vec("[a-z]{1,20}", 0..30),
            size in 20usize..200,
        ) {
            let doc = pieces.join("\n\n");
            let chunks = split(&doc, "\n\n", size, 0);

            for chunk in &chunks {
                prop_assert!(chunk.chars().count() <= size);
            }
            let rejoined: Vec<String> = chunks
                .iter()
                .flat_map(|c| c.split("\n\n").map(str::to_string))
                .collect();
            prop_assert_eq!(rejoined, pieces);
        }
    }
}
