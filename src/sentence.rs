//! Sentence boundary detection.
//!
//! The structural splitter falls back to sentences when a line-level unit is
//! larger than the target size. Finding sentences is delegated to a
//! [`SentenceSplitter`] so that a language-aware segmenter can be plugged in.
//!
//! ## The Hard Part: Finding Sentences
//!
//! ```text
//! "Dr. Smith went to Washington D.C. on Jan. 15th."
//!     ^                          ^       ^
//!     Not a sentence end (abbreviation)
//! ```
//!
//! The default [`UnicodeSentenceSplitter`] uses Unicode Standard Annex #29
//! (UAX #29), which handles decimal numbers, ellipses and most abbreviations.
//!
//! ## Alignment
//!
//! Splitters return plain strings. [`align_sentences`] maps them back onto
//! byte spans of the text they came from by searching forward from the end
//! of the previous sentence, so splitters are free to trim whitespace.

use unicode_segmentation::UnicodeSegmentation;

use crate::{BoxError, Error, Result, Unit};

/// Splits text into sentences.
///
/// Implementations must return the sentences in order, and each returned
/// sentence must appear verbatim in the input. Non-empty input should yield
/// at least one sentence.
pub trait SentenceSplitter: Send + Sync {
    /// Split `text` into sentences.
    ///
    /// # Errors
    ///
    /// Any error reaches the caller of the pipeline as
    /// [`Error::SentenceSplit`], with the original error as its source.
    fn split_sentences(&self, text: &str) -> std::result::Result<Vec<String>, BoxError>;
}

/// UAX #29 sentence splitter from `unicode-segmentation`.
///
/// ```rust
/// use seams::{SentenceSplitter, UnicodeSentenceSplitter};
///
/// let sentences = UnicodeSentenceSplitter
///     .split_sentences("Hello world. How are you?")
///     .unwrap();
/// assert_eq!(sentences, ["Hello world.", "How are you?"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSentenceSplitter;

impl SentenceSplitter for UnicodeSentenceSplitter {
    fn split_sentences(&self, text: &str) -> std::result::Result<Vec<String>, BoxError> {
        let sentences: Vec<String> = text
            .split_sentence_bounds()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if sentences.is_empty() && !text.is_empty() {
            return Ok(vec![text.to_string()]);
        }
        Ok(sentences)
    }
}

/// Map sentence strings onto byte spans of `text`, offset by `base`.
///
/// Only whitespace may lie before, between and after the sentences, so no
/// text is lost.
///
/// # Errors
///
/// Returns [`Error::UnalignedSentence`] if a sentence cannot be found in the
/// remaining text, or if the sentences skip over non-whitespace text.
pub fn align_sentences<S: AsRef<str>>(text: &str, base: usize, sentences: &[S]) -> Result<Vec<Unit>> {
    let mut offset = 0;
    let mut units = Vec::with_capacity(sentences.len());

    for sentence in sentences {
        let sentence = sentence.as_ref();
        if sentence.is_empty() {
            continue;
        }
        let pos = text[offset..]
            .find(sentence)
            .ok_or(Error::UnalignedSentence {
                offset: base + offset,
            })?;
        let start = offset + pos;
        if !text[offset..start].trim().is_empty() {
            return Err(Error::UnalignedSentence {
                offset: base + offset,
            });
        }
        let end = start + sentence.len();
        units.push(Unit::new(base + start, base + end));
        offset = end;
    }

    if !text[offset..].trim().is_empty() {
        return Err(Error::UnalignedSentence {
            offset: base + offset,
        });
    }
    Ok(units)
}

/// Run `splitter` over `text` and return the aligned sentence spans.
pub(crate) fn sentence_units(
    splitter: &dyn SentenceSplitter,
    text: &str,
    base: usize,
) -> Result<Vec<Unit>> {
    let sentences = splitter.split_sentences(text).map_err(Error::SentenceSplit)?;
    align_sentences(text, base, &sentences)
}
