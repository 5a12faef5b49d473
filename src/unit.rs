//! Units: the atomic spans produced by structural splitting.

use crate::batch::Segment;

/// An atomic span of the source document.
///
/// Units do not own text. They are byte ranges into the document they were
/// split from, which keeps them `Copy` and lets merging two neighbours be a
/// matter of taking the outer bounds:
///
/// ```rust
/// use seams::Unit;
///
/// let source = "first line\nsecond line";
/// let a = Unit::new(0, 10);
/// let b = Unit::new(11, 22);
///
/// assert_eq!(a.text(source), "first line");
/// assert_eq!(a.span_to(b).text(source), source);
/// ```
///
/// Because a merged unit covers the bytes between its parts, its size
/// always reflects the real separator found in the source, whatever
/// separator string the batching call was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Unit {
    /// Byte offset where the unit starts.
    pub start: usize,
    /// Byte offset where the unit ends (exclusive).
    pub end: usize,
}

impl Unit {
    /// Create a unit spanning `start..end`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the unit covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Borrow the unit's text from the document it was split from.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// The unit covering `self` through `next`, including the gap between.
    #[must_use]
    pub const fn span_to(&self, next: Self) -> Self {
        Self::new(self.start, next.end)
    }

    /// Shrink the span to exclude leading and trailing whitespace.
    ///
    /// Returns `None` if the unit is blank.
    #[must_use]
    pub fn trimmed(&self, source: &str) -> Option<Self> {
        let text = self.text(source);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let leading = text.len() - text.trim_start().len();
        Some(Self::new(
            self.start + leading,
            self.start + leading + trimmed.len(),
        ))
    }
}

impl Segment for Unit {
    fn size(&self) -> usize {
        self.len()
    }

    fn joined_size(&self, next: &Self, _separator: &str) -> usize {
        next.end - self.start
    }

    fn join(self, next: Self, _separator: &str) -> Self {
        self.span_to(next)
    }
}
