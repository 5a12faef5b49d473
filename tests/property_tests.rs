//! Property-based tests for splitting and batching.
//!
//! These tests verify the invariants every split must keep:
//! - Coverage: chunks span the source end to end, gaps are only whitespace
//! - Ordered: chunks and boundaries are in source order
//! - Bounds: chunks fit the target unless they are a single atomic unit
//! - Batching: partitions of the input, idempotent coalescing

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use proptest::prelude::*;
use seams::{
    constrained_batches, constrained_coalesce, reverse_merge, BoxError, Chunk, EmbeddingProvider,
    SemanticSplitter, SplitConfig, StructureConfig, SplitTrace,
};

// =============================================================================
// Test Fixtures
// =============================================================================

/// Deterministic pseudo-embeddings derived from a hash of the text.
struct HashEmbedder;

impl EmbeddingProvider for HashEmbedder {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, BoxError> {
        Ok(texts
            .iter()
            .map(|text| {
                let mut hasher = DefaultHasher::new();
                text.hash(&mut hasher);
                let seed = hasher.finish();
                (0..8)
                    .map(|i| {
                        let bits = seed.rotate_left(i * 8) ^ (u64::from(i) << 32);
                        (bits as f32) / u64::MAX as f32 - 0.5
                    })
                    .collect()
            })
            .collect())
    }
}

fn splitter(target_size: usize, percentile: f64) -> SemanticSplitter {
    SemanticSplitter::new(Arc::new(HashEmbedder)).with_config(
        SplitConfig::new(target_size)
            .window_size(2)
            .smoothing(2, 5)
            .percentile(percentile)
            .structure(StructureConfig {
                line_size: 40,
                sentence_size: 40,
                cleanup_size: 6,
            }),
    )
}

// =============================================================================
// Test Generators
// =============================================================================

/// Lines of words and punctuation, including blank lines.
fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::string::string_regex("([A-Za-z]{1,10}[ .,!?]{1,2}){0,15}").unwrap(),
        0..30,
    )
    .prop_map(|lines| lines.join("\n"))
}

fn words() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::string::string_regex("[a-z]{0,12}").unwrap(), 0..40)
}

// =============================================================================
// Invariant Helpers
// =============================================================================

/// Chunks span the whole input, match their spans, are ordered, and only
/// whitespace lies between neighbours.
fn covers_source(chunks: &[Chunk], text: &str) -> bool {
    if chunks.is_empty() {
        return text.is_empty();
    }
    if chunks[0].start != 0 || chunks.last().map(|c| c.end) != Some(text.len()) {
        return false;
    }
    let mut cursor = 0;
    for chunk in chunks {
        if chunk.start < cursor || chunk.end > text.len() || chunk.start >= chunk.end {
            return false;
        }
        if text[chunk.span()] != chunk.text || !text[cursor..chunk.start].trim().is_empty() {
            return false;
        }
        cursor = chunk.end;
    }
    cursor == text.len()
}

/// Oversized chunks must be a single unit passed through whole.
fn within_target(trace: &SplitTrace, target: usize) -> bool {
    trace.chunks.iter().all(|chunk| {
        chunk.len() <= target
            || trace
                .units
                .iter()
                .any(|u| u.start == chunk.start && u.end == chunk.end)
    })
}

// =============================================================================
// Pipeline Properties
// =============================================================================

proptest! {
    #[test]
    fn split_covers_source(text in document(), target in 20usize..200) {
        let trace = splitter(target, 0.4).analyze(&text).unwrap();
        prop_assert!(covers_source(&trace.chunks, &text));
    }

    #[test]
    fn split_respects_target(text in document(), target in 20usize..200) {
        let trace = splitter(target, 0.4).analyze(&text).unwrap();
        prop_assert!(within_target(&trace, target));
    }

    #[test]
    fn boundaries_strictly_increasing(text in document()) {
        let trace = splitter(80, 0.6).analyze(&text).unwrap();
        prop_assert!(trace.boundaries.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(trace.boundaries.iter().all(|&b| b >= 1 && b < trace.units.len()));
        prop_assert_eq!(trace.curve.len(), trace.units.len().saturating_sub(1));
    }

    #[test]
    fn chunk_indices_sequential(text in document()) {
        let chunks = splitter(60, 0.4).split(&text).unwrap();
        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.index, i);
        }
    }

    #[test]
    fn chunks_never_cross_boundaries(text in document()) {
        let trace = splitter(500, 0.8).analyze(&text).unwrap();
        for &b in &trace.boundaries {
            let wall = trace.units[b].start;
            prop_assert!(trace.chunks.iter().all(|c| c.end <= wall || c.start >= wall));
        }
    }

    #[test]
    fn splitting_is_deterministic(text in document()) {
        let s = splitter(70, 0.4);
        prop_assert_eq!(s.analyze(&text).unwrap(), s.analyze(&text).unwrap());
    }
}

// =============================================================================
// Batching Properties
// =============================================================================

proptest! {
    #[test]
    fn coalesce_is_idempotent(items in words(), max in 1usize..40) {
        let once = constrained_coalesce(items, max, " ");
        let twice = constrained_coalesce(once.clone(), max, " ");
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn coalesce_partitions_input(items in words(), max in 1usize..40) {
        let merged = constrained_coalesce(items.clone(), max, " ");
        prop_assert_eq!(merged.join(" "), items.join(" "));
        prop_assert!(merged.len() <= items.len());
    }

    #[test]
    fn coalesce_respects_max(items in words(), max in 1usize..40) {
        let merged = constrained_coalesce(items.clone(), max, "-");
        for piece in &merged {
            prop_assert!(piece.len() <= max || items.contains(piece));
        }
    }

    #[test]
    fn batches_partition_and_respect_max(items in words(), max in 1usize..40) {
        let batches = constrained_batches(items.clone(), max, " ", false).unwrap();
        prop_assert_eq!(batches.join(" "), items.join(" "));
        for batch in &batches {
            prop_assert!(batch.len() <= max || items.contains(batch));
        }
    }

    #[test]
    fn strict_batches_fail_only_on_oversized(items in words(), max in 1usize..40) {
        let oversized = items.iter().any(|i| i.len() > max);
        let result = constrained_batches(items, max, " ", true);
        prop_assert_eq!(result.is_err(), oversized);
    }

    #[test]
    fn reverse_merge_leaves_no_tiny_pieces(items in words(), n in 1usize..8) {
        let merged = reverse_merge(items.clone(), n, " ");
        prop_assert_eq!(merged.join(" "), items.join(" "));
        if merged.len() > 1 {
            prop_assert!(merged.iter().all(|piece| piece.len() >= n));
        }
    }
}

// =============================================================================
// Uniformity
// =============================================================================

fn std_dev(pieces: &[String]) -> f64 {
    let n = pieces.len() as f64;
    let mean = pieces.iter().map(|p| p.len() as f64).sum::<f64>() / n;
    (pieces
        .iter()
        .map(|p| (p.len() as f64 - mean).powi(2))
        .sum::<f64>()
        / n)
        .sqrt()
}

fn equal_items(len: usize, count: usize) -> Vec<String> {
    (0..count).map(|_| "x".repeat(len)).collect()
}

proptest! {
    #[test]
    fn coalesce_at_least_as_uniform_as_greedy(
        len in 1usize..4,
        count in 1usize..80,
        extra in 0usize..40,
        separator in prop::sample::select(vec!["", " ", "\n\n"]),
    ) {
        let max = len + extra;
        let items = equal_items(len, count);
        let greedy = constrained_batches(items.clone(), max, separator, false).unwrap();
        let coalesced = constrained_coalesce(items, max, separator);
        prop_assert!(
            std_dev(&coalesced) <= std_dev(&greedy) + 1e-12,
            "coalesce={:?} greedy={:?}",
            coalesced.iter().map(String::len).collect::<Vec<_>>(),
            greedy.iter().map(String::len).collect::<Vec<_>>()
        );
    }

    #[test]
    fn coalesce_fills_at_least_as_far_as_greedy(
        len in 1usize..4,
        count in 1usize..80,
        extra in 0usize..40,
    ) {
        let max = len + extra;
        let items = equal_items(len, count);
        let greedy = constrained_batches(items.clone(), max, " ", false).unwrap();
        let coalesced = constrained_coalesce(items, max, " ");
        prop_assert!(coalesced.len() <= greedy.len());
    }
}

#[test]
fn coalesce_alphabet_fills_each_group() {
    let items: Vec<String> = ('a'..='z').map(String::from).collect();
    assert_eq!(
        constrained_coalesce(items, 5, ""),
        ["abcde", "fghij", "klmno", "pqrst", "uvwxy", "z"]
    );
}
