//! Error types for seams.

/// Boxed error returned by injected collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur during splitting.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A size, window, order or percentile parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An atomic item exceeds the batch limit in strict mode.
    #[error("item of size {size} exceeds max_size {max_size}")]
    SizeConstraintViolation {
        /// Size of the offending item.
        size: usize,
        /// The limit it was checked against.
        max_size: usize,
    },

    /// The sentence splitter returned text that is not present in the source,
    /// or left non-whitespace source text out of its sentences.
    #[error("sentence splitter output does not align with the source at byte {offset}")]
    UnalignedSentence {
        /// Byte offset where the search started.
        offset: usize,
    },

    /// The sentence splitter failed.
    #[error("sentence splitting failed")]
    SentenceSplit(#[source] BoxError),

    /// The embedding provider failed.
    #[error("embedding failed")]
    Embedding(#[source] BoxError),

    /// The embedding provider returned the wrong number of vectors.
    #[error("expected {expected} embeddings, got {actual}")]
    EmbeddingCount {
        /// Number of texts sent to the provider.
        expected: usize,
        /// Number of vectors returned.
        actual: usize,
    },

    /// Embedding vectors do not share a dimension.
    #[error("embedding {index} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        /// Position of the offending vector.
        index: usize,
        /// Dimension of the first vector.
        expected: usize,
        /// Dimension of the offending vector.
        actual: usize,
    },
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

/// Result type for seams operations.
pub type Result<T> = std::result::Result<T, Error>;
