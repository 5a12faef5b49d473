//! Embedding providers.
//!
//! The pipeline never loads a model itself. It asks an [`EmbeddingProvider`]
//! for one vector per unit and compares those vectors with the provider's
//! similarity function (cosine by default).
//!
//! Providers are expected to return L2-normalized vectors of a fixed
//! dimension, in input order. [`validate_embeddings`] checks the count and
//! dimension before anything downstream indexes into them.

use crate::{BoxError, Error, Result};

/// Produces embeddings for unit texts.
///
/// ```rust
/// use seams::{BoxError, EmbeddingProvider};
///
/// /// Two-dimensional toy embedding: vowel share vs. consonant share.
/// struct Vowels;
///
/// impl EmbeddingProvider for Vowels {
///     fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, BoxError> {
///         Ok(texts
///             .iter()
///             .map(|t| {
///                 let vowels = t.chars().filter(|c| "aeiou".contains(*c)).count() as f32;
///                 vec![vowels, t.len() as f32 - vowels]
///             })
///             .collect())
///     }
/// }
///
/// let vectors = Vowels.embed(&["banana", "rhythm"]).unwrap();
/// assert!(Vowels.vector_similarity(&vectors[0], &vectors[1]) < 0.9);
/// ```
pub trait EmbeddingProvider: Send + Sync {
    /// Embed each text; the output has the same length and order as `texts`.
    ///
    /// # Errors
    ///
    /// Any error reaches the caller of the pipeline as
    /// [`Error::Embedding`](crate::Error::Embedding), with the original
    /// error as its source.
    fn embed(&self, texts: &[&str]) -> std::result::Result<Vec<Vec<f32>>, BoxError>;

    /// Similarity between two vectors produced by [`embed`](Self::embed).
    fn vector_similarity(&self, a: &[f32], b: &[f32]) -> f64 {
        cosine_similarity(a, b)
    }
}

/// Cosine similarity, accumulated in `f64`.
///
/// Returns `0.0` if either vector has zero norm.
///
/// ```rust
/// use seams::cosine_similarity;
///
/// assert!((cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-12);
/// assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
/// ```
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let (dot, norm_a, norm_b) = a.iter().zip(b).fold(
        (0.0f64, 0.0f64, 0.0f64),
        |(dot, na, nb), (&x, &y)| {
            let (x, y) = (f64::from(x), f64::from(y));
            (dot + x * y, na + x * x, nb + y * y)
        },
    );
    if norm_a > 0.0 && norm_b > 0.0 {
        dot / (norm_a.sqrt() * norm_b.sqrt())
    } else {
        0.0
    }
}

/// L2-normalize a vector in place. Zero vectors are left as they are.
pub fn normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 1e-9 {
        for x in v {
            *x /= norm;
        }
    }
}

/// Check that `embeddings` has `expected` vectors of one shared dimension.
///
/// # Errors
///
/// [`Error::EmbeddingCount`] or [`Error::DimensionMismatch`].
pub fn validate_embeddings(embeddings: &[Vec<f32>], expected: usize) -> Result<()> {
    if embeddings.len() != expected {
        return Err(Error::EmbeddingCount {
            expected,
            actual: embeddings.len(),
        });
    }
    let Some(dim) = embeddings.first().map(Vec::len) else {
        return Ok(());
    };
    match embeddings.iter().position(|v| v.len() != dim) {
        Some(index) => Err(Error::DimensionMismatch {
            index,
            expected: dim,
            actual: embeddings[index].len(),
        }),
        None => Ok(()),
    }
}

/// Embed `texts` with `provider` and validate the result.
pub(crate) fn embed_units(
    provider: &dyn EmbeddingProvider,
    texts: &[&str],
) -> Result<Vec<Vec<f32>>> {
    let embeddings = provider.embed(texts).map_err(Error::Embedding)?;
    validate_embeddings(&embeddings, texts.len())?;
    Ok(embeddings)
}

#[cfg(feature = "fastembed")]
pub use self::fastembed_provider::FastEmbedProvider;

#[cfg(feature = "fastembed")]
mod fastembed_provider {
    use super::{normalize, BoxError, EmbeddingProvider};
    use crate::{Error, Result};

    /// Embedding provider backed by `fastembed`.
    ///
    /// Uses fastembed's default model (BGE-small-en, 384 dimensions) unless
    /// constructed from an existing [`fastembed::TextEmbedding`].
    pub struct FastEmbedProvider {
        model: fastembed::TextEmbedding,
        batch_size: Option<usize>,
    }

    impl FastEmbedProvider {
        /// Load the default model.
        ///
        /// # Errors
        ///
        /// Returns [`Error::Embedding`] if the model fails to load.
        pub fn new() -> Result<Self> {
            let model = fastembed::TextEmbedding::try_new(Default::default())
                .map_err(|e| Error::Embedding(e.into()))?;
            Ok(Self::from_model(model))
        }

        /// Wrap an already-initialized model.
        pub fn from_model(model: fastembed::TextEmbedding) -> Self {
            Self {
                model,
                batch_size: None,
            }
        }

        /// Set the batch size passed to the model.
        #[must_use]
        pub fn with_batch_size(mut self, batch_size: usize) -> Self {
            self.batch_size = Some(batch_size);
            self
        }
    }

    impl EmbeddingProvider for FastEmbedProvider {
        fn embed(&self, texts: &[&str]) -> std::result::Result<Vec<Vec<f32>>, BoxError> {
            let mut embeddings = self.model.embed(texts.to_vec(), self.batch_size)?;
            for v in &mut embeddings {
                normalize(v);
            }
            Ok(embeddings)
        }
    }

    impl std::fmt::Debug for FastEmbedProvider {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("FastEmbedProvider")
                .field("batch_size", &self.batch_size)
                .finish_non_exhaustive()
        }
    }
}
