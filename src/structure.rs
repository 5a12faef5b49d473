//! Structural splitting: raw text into units.
//!
//! Units are the atoms the rest of the pipeline works with. They should be
//! small enough that a topic change rarely hides inside one, and large
//! enough that each carries a meaningful embedding.
//!
//! ## The Algorithm
//!
//! ```text
//! 1. Split on "\n" (hard line breaks)
//! 2. Coalesce lines up to line_size, joined by "\n"
//! 3. Reverse-merge lines shorter than cleanup_size into their predecessor
//! 4. For each unit still larger than target_size:
//!    - split it into sentences
//!    - coalesce sentences up to min(sentence_size, target_size), joined by " "
//!    - reverse-merge sentences shorter than cleanup_size
//! 5. Trim whitespace between units; drop blank ones
//! 6. Stretch the first and last unit to the document edges
//! ```
//!
//! Units therefore cover the document from byte 0 to its end, with only
//! whitespace between neighbours. A blank document is a single unit.
//!
//! A sentence that is itself larger than the target passes through as one
//! unit. That is the decomposition floor, not an error.

use crate::batch::{constrained_coalesce, reverse_merge};
use crate::config::StructureConfig;
use crate::sentence::{sentence_units, SentenceSplitter};
use crate::{Result, Unit};

/// Breaks a document into [`Unit`]s.
///
/// ```rust
/// use seams::{StructuralSplitter, StructureConfig, UnicodeSentenceSplitter};
///
/// let text = "A short line.\nAnother short line.";
/// let splitter = StructuralSplitter::new(512, StructureConfig::default(), &UnicodeSentenceSplitter);
/// let units = splitter.split(text).unwrap();
///
/// assert_eq!(units.len(), 1);
/// assert_eq!(units[0].text(text), text);
/// ```
pub struct StructuralSplitter<'a> {
    target_size: usize,
    config: StructureConfig,
    sentences: &'a dyn SentenceSplitter,
}

impl<'a> StructuralSplitter<'a> {
    /// Create a splitter for the given target size.
    pub fn new(
        target_size: usize,
        config: StructureConfig,
        sentences: &'a dyn SentenceSplitter,
    ) -> Self {
        Self {
            target_size,
            config,
            sentences,
        }
    }

    /// Split `text` into non-blank units in source order, covering it from
    /// the first to the last byte.
    ///
    /// # Errors
    ///
    /// Propagates sentence splitter failures and alignment errors.
    pub fn split(&self, text: &str) -> Result<Vec<Unit>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let lines = line_units(text);
        let line_count = lines.len();
        let lines = constrained_coalesce(lines, self.config.line_size, "\n");
        let lines = reverse_merge(lines, self.config.cleanup_size, "\n");

        let sentence_size = self.config.sentence_size.min(self.target_size);
        let mut units = Vec::with_capacity(lines.len());
        for line in lines {
            if line.len() <= self.target_size {
                units.push(line);
                continue;
            }
            let sentences = sentence_units(self.sentences, line.text(text), line.start)?;
            tracing::trace!(
                start = line.start,
                len = line.len(),
                sentences = sentences.len(),
                "re-splitting oversized line"
            );
            let sentences = constrained_coalesce(sentences, sentence_size, " ");
            units.extend(reverse_merge(sentences, self.config.cleanup_size, " "));
        }

        let mut units: Vec<Unit> = units.iter().filter_map(|u| u.trimmed(text)).collect();
        if let Some(first) = units.first_mut() {
            first.start = 0;
        } else {
            units.push(Unit::new(0, text.len()));
        }
        if let Some(last) = units.last_mut() {
            last.end = text.len();
        }
        tracing::debug!(lines = line_count, units = units.len(), "structural split");
        Ok(units)
    }
}

/// One unit per `\n`-terminated line, excluding the terminator and any `\r`.
fn line_units(text: &str) -> Vec<Unit> {
    let mut units = Vec::new();
    let mut start = 0;
    for line in text.split('\n') {
        let end = start + line.len();
        let content_end = if line.ends_with('\r') { end - 1 } else { end };
        units.push(Unit::new(start, content_end));
        start = end + 1;
    }
    units
}
