//! # seams
//!
//! Boundary-aware semantic chunking for retrieval and embedding pipelines.
//!
//! ## The Problem
//!
//! Retrieval wants chunks of roughly uniform size. Meaning doesn't come in
//! uniform sizes. Cutting every N bytes slices through arguments; cutting
//! only at topic changes gives chunks anywhere from a sentence to a chapter.
//!
//! seams does both: it finds where the topic changes, treats those points as
//! walls, and packs text up to a target size between the walls.
//!
//! ## The Pipeline
//!
//! ```text
//! 1. Structural split   lines, then sentences for oversized lines → units
//! 2. Embed              one vector per unit (injected provider)
//! 3. Similarity curve   mean cross-similarity of the w units before and
//!                       after each gap
//! 4. Boundaries         Savitzky–Golay derivatives → local minima
//!                       → keep those below the q-th percentile
//! 5. Reconstruct        coalesce units up to target_size within each
//!                       boundary-delimited partition
//! ```
//!
//! ```text
//! similarity curve
//!   1.0 ┤ ╭──╮       ╭───╮
//!       │╭╯  ╰╮    ╭─╯   ╰─╮     ╭─
//!   0.5 ┤╯    ╰╮  ╭╯       ╰╮   ╭╯
//!       │      ╰──╯         ╰───╯
//!   0.0 ┼──────────────────────────▶ unit gap
//!                 ↑             ↑
//!              boundary      boundary
//! ```
//!
//! ## Batching
//!
//! Within a partition, units are merged by [`constrained_coalesce`]: the
//! adjacent pair that comes closest to the target without exceeding it is
//! merged first, so chunks fill up towards the target instead of taking
//! whatever greedy left-to-right packing ([`constrained_batches`]) leaves
//! over. Tiny leftovers such as blank lines are folded into their neighbours
//! by [`reverse_merge`].
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use seams::{BoxError, EmbeddingProvider, SemanticSplitter, SplitConfig};
//!
//! struct Constant;
//!
//! impl EmbeddingProvider for Constant {
//!     fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, BoxError> {
//!         Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
//!     }
//! }
//!
//! let splitter = SemanticSplitter::new(Arc::new(Constant))
//!     .with_config(SplitConfig::new(512).window_size(3).smoothing(3, 5).percentile(0.4));
//!
//! let chunks = splitter.split("First line.\nSecond line.").unwrap();
//! assert_eq!(chunks[0].text, "First line.\nSecond line.");
//! ```
//!
//! With the `fastembed` feature, `FastEmbedProvider` supplies real
//! embeddings from a local ONNX model.
//!
//! ## Logging
//!
//! Stages emit `tracing` events at `debug` and `trace` level inside a
//! `semantic_split` span. The library never installs a subscriber.

mod batch;
mod boundary;
mod chunk;
mod config;
mod embed;
mod error;
mod reconstruct;
mod savgol;
mod sentence;
mod similarity;
mod splitter;
mod structure;
mod unit;

pub use batch::{constrained_batches, constrained_coalesce, reverse_merge, Segment};
pub use boundary::{find_boundaries, find_candidates, percentile, BoundaryCandidate, BoundarySet};
pub use chunk::Chunk;
pub use config::{ReconstructionMode, SplitConfig, StructureConfig};
pub use embed::{cosine_similarity, normalize, validate_embeddings, EmbeddingProvider};
pub use error::{BoxError, Error, Result};
pub use reconstruct::{partitions, reconstruct};
pub use savgol::{SavitzkyGolay, MAX_DERIVATIVE};
pub use sentence::{align_sentences, SentenceSplitter, UnicodeSentenceSplitter};
pub use similarity::windowed_similarity;
pub use splitter::{SemanticSplitter, SplitTrace};
pub use structure::StructuralSplitter;
pub use unit::Unit;

#[cfg(feature = "fastembed")]
pub use embed::FastEmbedProvider;

/// A text chunking strategy.
///
/// ```rust
/// use seams::{Chunk, Chunker, Result};
///
/// fn chunk_document(chunker: &dyn Chunker, text: &str) -> Result<Vec<Chunk>> {
///     chunker.chunk(text)
/// }
/// ```
pub trait Chunker: Send + Sync {
    /// Split text into chunks.
    ///
    /// Each chunk is a [`Chunk`] containing the text and its byte offsets
    /// in the original document.
    ///
    /// # Errors
    ///
    /// Implementation-specific; see the implementing type.
    fn chunk(&self, text: &str) -> Result<Vec<Chunk>>;

    /// Estimate the number of chunks for a given text length.
    ///
    /// Useful for pre-allocation. May be approximate.
    fn estimate_chunks(&self, text_len: usize) -> usize {
        (text_len / 500).max(1)
    }
}
