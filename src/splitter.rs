//! The end-to-end pipeline.
//!
//! ```text
//! text ──▶ StructuralSplitter ──▶ units ──▶ EmbeddingProvider ──▶ vectors
//!                                                                    │
//! chunks ◀── reconstruct ◀── boundaries ◀── find_boundaries ◀── windowed_similarity
//! ```
//!
//! Every stage consumes the full output of the previous one; boundary
//! detection needs the whole similarity curve. The splitter holds no mutable
//! state, so one instance can serve many threads.

use std::sync::Arc;

use crate::boundary::{find_boundaries, BoundaryCandidate, BoundarySet};
use crate::config::SplitConfig;
use crate::embed::{embed_units, EmbeddingProvider};
use crate::reconstruct::reconstruct;
use crate::sentence::{SentenceSplitter, UnicodeSentenceSplitter};
use crate::similarity::windowed_similarity;
use crate::structure::StructuralSplitter;
use crate::{Chunk, Chunker, Result, Unit};

/// Everything the pipeline computed for one document.
///
/// Returned by [`SemanticSplitter::analyze`] for inspection, tuning and
/// plotting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitTrace {
    /// Units from structural splitting.
    pub units: Vec<Unit>,
    /// Windowed similarity curve; one entry per adjacent unit pair.
    pub curve: Vec<f64>,
    /// All derivative zero crossings on the curve.
    pub candidates: Vec<BoundaryCandidate>,
    /// Percentile value minima had to fall below.
    pub threshold: Option<f64>,
    /// Unit indices where partitions start.
    pub boundaries: Vec<usize>,
    /// Final chunks.
    pub chunks: Vec<Chunk>,
}

/// Boundary-aware semantic splitter.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
/// use seams::{BoxError, EmbeddingProvider, SemanticSplitter, SplitConfig};
///
/// /// Marks lines mentioning cats as one topic, everything else as another.
/// struct CatDetector;
///
/// impl EmbeddingProvider for CatDetector {
///     fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, BoxError> {
///         Ok(texts
///             .iter()
///             .map(|t| if t.contains("cat") { vec![1.0, 0.0] } else { vec![0.0, 1.0] })
///             .collect())
///     }
/// }
///
/// let splitter = SemanticSplitter::new(Arc::new(CatDetector))
///     .with_config(SplitConfig::new(256));
///
/// let chunks = splitter.split("A cat sat on the mat.").unwrap();
/// assert_eq!(chunks.len(), 1);
/// assert_eq!(chunks[0].text, "A cat sat on the mat.");
/// ```
#[derive(Clone)]
pub struct SemanticSplitter {
    embedder: Arc<dyn EmbeddingProvider>,
    sentences: Arc<dyn SentenceSplitter>,
    config: SplitConfig,
}

impl SemanticSplitter {
    /// Create a splitter with the default configuration and the UAX #29
    /// sentence splitter.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            embedder,
            sentences: Arc::new(UnicodeSentenceSplitter),
            config: SplitConfig::default(),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: SplitConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the sentence splitter.
    #[must_use]
    pub fn with_sentence_splitter(mut self, sentences: Arc<dyn SentenceSplitter>) -> Self {
        self.sentences = sentences;
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Split `text` into chunks.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration) for
    /// a bad configuration; collaborator failures are propagated.
    pub fn split(&self, text: &str) -> Result<Vec<Chunk>> {
        self.analyze(text).map(|trace| trace.chunks)
    }

    /// Run the pipeline and keep every intermediate result.
    ///
    /// # Errors
    ///
    /// Same as [`split`](Self::split).
    pub fn analyze(&self, text: &str) -> Result<SplitTrace> {
        let config = &self.config;
        config.validate()?;

        let span = tracing::debug_span!(
            "semantic_split",
            bytes = text.len(),
            target_size = config.target_size
        );
        let _enter = span.enter();

        if text.is_empty() {
            return Ok(SplitTrace::default());
        }

        let units = StructuralSplitter::new(
            config.target_size,
            config.structure,
            self.sentences.as_ref(),
        )
        .split(text)?;

        let (curve, boundaries) = if units.len() < 2 {
            (Vec::new(), BoundarySet::default())
        } else {
            let texts: Vec<&str> = units.iter().map(|u| u.text(text)).collect();
            let embeddings = embed_units(self.embedder.as_ref(), &texts)?;
            let curve = windowed_similarity(&embeddings, config.window_size, |a, b| {
                self.embedder.vector_similarity(a, b)
            })?;
            let boundaries = find_boundaries(
                &curve,
                config.poly_order,
                config.savgol_window,
                config.percentile,
            )?;
            (curve, boundaries)
        };

        if boundaries.is_degenerate() {
            tracing::debug!(units = units.len(), "no significant boundaries, single partition");
        }

        let chunks = reconstruct(
            text,
            &units,
            &boundaries.indices,
            config.target_size,
            config.mode,
        )?;

        tracing::debug!(
            units = units.len(),
            boundaries = boundaries.indices.len(),
            chunks = chunks.len(),
            "split complete"
        );

        Ok(SplitTrace {
            units,
            curve,
            candidates: boundaries.candidates,
            threshold: boundaries.threshold,
            boundaries: boundaries.indices,
            chunks,
        })
    }
}

impl Chunker for SemanticSplitter {
    fn chunk(&self, text: &str) -> Result<Vec<Chunk>> {
        self.split(text)
    }

    fn estimate_chunks(&self, text_len: usize) -> usize {
        (text_len / self.config.target_size.max(1)).max(1)
    }
}

impl std::fmt::Debug for SemanticSplitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticSplitter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
