//! Size-constrained batching primitives.
//!
//! Three ways to combine an ordered sequence of pieces into larger pieces
//! without reordering anything:
//!
//! | Operation | Strategy | Bound |
//! |-----------|----------|-------|
//! | [`constrained_batches`] | greedy, left to right | `<= max_size` |
//! | [`constrained_coalesce`] | largest neighbouring pair that fits first | `<= max_size` |
//! | [`reverse_merge`] | absorb tiny pieces into the previous one | none |
//!
//! ## Greedy vs. Coalesce
//!
//! Greedy batching never looks ahead: an item joins whichever batch happens
//! to be open when it arrives. Coalescing instead looks at every neighbouring
//! pair and merges the one whose result comes closest to the limit:
//!
//! ```text
//! items: a bb ccc    max_size: 5
//!
//! greedy:   [abb] [ccc]      sizes 3 3
//! coalesce: [a] [bbccc]      sizes 1 5
//! ```
//!
//! Filling pairs up to the limit first keeps chunks as large as the target
//! allows. For items of equal size both strategies produce the same packing,
//! so coalescing is never less uniform than greedy batching there.
//!
//! Everything here is generic over [`Segment`], so the same code runs on
//! plain strings and on source-anchored [`Unit`](crate::Unit) spans.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::{Error, Result};

/// Something that can be measured and joined with its right-hand neighbour.
pub trait Segment: Sized {
    /// Size in bytes.
    fn size(&self) -> usize;

    /// Size of `self` joined with `next` by `separator`, without joining.
    fn joined_size(&self, next: &Self, separator: &str) -> usize;

    /// Join `next` onto the end of `self`.
    #[must_use]
    fn join(self, next: Self, separator: &str) -> Self;
}

impl Segment for String {
    fn size(&self) -> usize {
        self.len()
    }

    fn joined_size(&self, next: &Self, separator: &str) -> usize {
        self.len() + separator.len() + next.len()
    }

    fn join(mut self, next: Self, separator: &str) -> Self {
        self.reserve(separator.len() + next.len());
        self.push_str(separator);
        self.push_str(&next);
        self
    }
}

/// Greedy left-to-right batching.
///
/// Appends items to the current batch while the joined size stays within
/// `max_size`, otherwise starts a new batch.
///
/// # Errors
///
/// With `strict`, an item larger than `max_size` fails with
/// [`Error::SizeConstraintViolation`]. Without it, such an item becomes a
/// batch of its own.
///
/// ```rust
/// use seams::constrained_batches;
///
/// let items = ["aa", "bb", "cc"].map(String::from);
/// let batches = constrained_batches(items, 5, " ", false).unwrap();
/// assert_eq!(batches, ["aa bb", "cc"]);
/// ```
pub fn constrained_batches<T, I>(
    items: I,
    max_size: usize,
    separator: &str,
    strict: bool,
) -> Result<Vec<T>>
where
    T: Segment,
    I: IntoIterator<Item = T>,
{
    let mut batches = Vec::new();
    let mut current: Option<T> = None;

    for item in items {
        if item.size() > max_size {
            if strict {
                return Err(Error::SizeConstraintViolation {
                    size: item.size(),
                    max_size,
                });
            }
            batches.extend(current.take());
            batches.push(item);
            continue;
        }

        current = Some(match current.take() {
            Some(batch) if batch.joined_size(&item, separator) <= max_size => {
                batch.join(item, separator)
            }
            Some(batch) => {
                batches.push(batch);
                item
            }
            None => item,
        });
    }

    batches.extend(current);
    Ok(batches)
}

/// Heap entry for a mergeable neighbouring pair.
///
/// The max-heap pops the largest joined size first, then the smallest left
/// slot, which is also the earlier position since slots never move.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct PairCandidate {
    size: usize,
    left: Reverse<usize>,
    right: usize,
    left_gen: u32,
    right_gen: u32,
}

/// Neighbour-pair coalescing.
///
/// Repeatedly merges the adjacent pair with the largest joined size that
/// still fits in `max_size`, earliest pair first on ties, until no pair fits.
/// Items already larger than `max_size` are never merged.
///
/// Runs as a loop over a linked array of slots with a max-heap of candidate
/// pairs; stale heap entries are skipped by comparing slot generations.
///
/// ```rust
/// use seams::constrained_coalesce;
///
/// let items = ["a", "bb", "ccc"].map(String::from);
/// assert_eq!(constrained_coalesce(items, 5, ""), ["a", "bbccc"]);
/// ```
pub fn constrained_coalesce<T, I>(items: I, max_size: usize, separator: &str) -> Vec<T>
where
    T: Segment,
    I: IntoIterator<Item = T>,
{
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let n = slots.len();
    if n < 2 {
        return slots.into_iter().flatten().collect();
    }

    // `next[i] == n` marks the tail.
    let mut next: Vec<usize> = (1..=n).collect();
    let mut prev: Vec<Option<usize>> = (0..n).map(|i| i.checked_sub(1)).collect();
    let mut generation = vec![0u32; n];

    let candidate = |slots: &[Option<T>], generation: &[u32], left: usize, right: usize| {
        let (Some(a), Some(b)) = (&slots[left], &slots[right]) else {
            return None;
        };
        let size = a.joined_size(b, separator);
        (size <= max_size).then(|| PairCandidate {
            size,
            left: Reverse(left),
            right,
            left_gen: generation[left],
            right_gen: generation[right],
        })
    };

    let mut heap: BinaryHeap<PairCandidate> = (0..n - 1)
        .filter_map(|i| candidate(&slots, &generation, i, i + 1))
        .collect();

    while let Some(pair) = heap.pop() {
        let PairCandidate {
            left: Reverse(left),
            right,
            left_gen,
            right_gen,
            ..
        } = pair;
        let stale = next[left] != right
            || generation[left] != left_gen
            || generation[right] != right_gen
            || slots[left].is_none()
            || slots[right].is_none();
        if stale {
            continue;
        }
        let (Some(a), Some(b)) = (slots[left].take(), slots[right].take()) else {
            continue;
        };

        slots[left] = Some(a.join(b, separator));
        generation[left] += 1;
        generation[right] += 1;

        let after = next[right];
        next[left] = after;
        if after < n {
            prev[after] = Some(left);
            heap.extend(candidate(&slots, &generation, left, after));
        }
        if let Some(before) = prev[left] {
            heap.extend(candidate(&slots, &generation, before, left));
        }
    }

    slots.into_iter().flatten().collect()
}

/// Absorb items smaller than `n` into their predecessor.
///
/// A single forward pass. Any item with `size() < n` is joined onto the
/// previous output item regardless of the resulting size. A tiny leading
/// item has no predecessor, so it is carried forward into the next one.
///
/// ```rust
/// use seams::reverse_merge;
///
/// let items = ["ab", "x", "cdef"].map(String::from);
/// assert_eq!(reverse_merge(items, 2, "-"), ["ab-x", "cdef"]);
/// ```
pub fn reverse_merge<T, I>(items: I, n: usize, separator: &str) -> Vec<T>
where
    T: Segment,
    I: IntoIterator<Item = T>,
{
    let mut merged: Vec<T> = Vec::new();
    let mut carry: Option<T> = None;

    for item in items {
        let item = match carry.take() {
            Some(head) => head.join(item, separator),
            None => item,
        };

        if item.size() >= n {
            merged.push(item);
            continue;
        }

        match merged.pop() {
            Some(last) => merged.push(last.join(item, separator)),
            None => carry = Some(item),
        }
    }

    merged.extend(carry);
    merged
}
