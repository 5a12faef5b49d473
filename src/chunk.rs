//! The Chunk type: a finished piece of text with position metadata.

use crate::Unit;

/// A chunk of text with its position in the original document.
///
/// Chunks are what the pipeline hands back: one or more [`Unit`]s merged
/// within a single semantic partition. They own their text so they can
/// outlive the source document.
///
/// ## Byte Offsets
///
/// `start` and `end` are byte offsets into the original text, not character
/// indices. This matches Rust's string slicing semantics:
///
/// ```rust
/// use seams::Chunk;
///
/// let text = "Hello, world!";
/// let chunk = Chunk::new("world", 7, 12, 0);
///
/// assert_eq!(&text[chunk.start..chunk.end], "world");
/// ```
///
/// Chunks never overlap. Whatever lies between `chunks[i].end` and
/// `chunks[i + 1].start` is the whitespace that separated them in the source:
///
/// ```text
/// Original: "Topic one.\n\nTopic two."
/// Chunk 0:  "Topic one."   [0..10]
/// Chunk 1:  "Topic two."   [12..22]
///                 gap "\n\n" [10..12]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The chunk text.
    pub text: String,
    /// Byte offset where this chunk starts in the original document.
    pub start: usize,
    /// Byte offset where this chunk ends (exclusive) in the original document.
    pub end: usize,
    /// Zero-based index of this chunk in the sequence.
    pub index: usize,
}

impl Chunk {
    /// Create a new chunk.
    #[must_use]
    pub fn new(text: impl Into<String>, start: usize, end: usize, index: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            index,
        }
    }

    /// Materialize a unit span of `source` as the `index`-th chunk.
    pub(crate) fn from_unit(source: &str, unit: Unit, index: usize) -> Self {
        Self::new(unit.text(source), unit.start, unit.end, index)
    }

    /// The length of this chunk in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether this chunk is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The byte span of this chunk in the original document.
    #[must_use]
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunk {{ index: {}, span: {}..{}, len: {} }}",
            self.index,
            self.start,
            self.end,
            self.len()
        )
    }
}
