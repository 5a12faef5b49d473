//! Chunk reconstruction from units and boundaries.
//!
//! Boundaries cut the unit sequence into partitions; each partition is
//! coalesced on its own, so no chunk ever straddles a detected topic change:
//!
//! ```text
//! units:       u0 u1 u2 u3 | u4 u5 | u6 u7 u8
//! boundaries:              4       6
//! partitions:  [0..4]        [4..6]  [6..9]
//! chunks:      [u0 u1][u2 u3] [u4 u5] [u6 u7 u8]
//! ```
//!
//! [`ReconstructionMode::Flat`] ignores the boundaries and batches greedily
//! across the whole sequence instead.

use std::ops::Range;

use crate::batch::{constrained_batches, constrained_coalesce};
use crate::config::ReconstructionMode;
use crate::{Chunk, Error, Result, Unit};

/// Split `0..len` at `boundaries`.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] unless the boundaries are strictly
/// increasing and each lies in `1..len`.
///
/// ```rust
/// use seams::partitions;
///
/// assert_eq!(partitions(9, &[4, 6]).unwrap(), [0..4, 4..6, 6..9]);
/// assert_eq!(partitions(3, &[]).unwrap(), [0..3]);
/// ```
pub fn partitions(len: usize, boundaries: &[usize]) -> Result<Vec<Range<usize>>> {
    if len == 0 {
        return Ok(Vec::new());
    }

    let mut ranges = Vec::with_capacity(boundaries.len() + 1);
    let mut start = 0;
    for &end in boundaries {
        if end <= start || end >= len {
            return Err(Error::invalid(format!(
                "boundary {end} must be strictly increasing and within 1..{len}"
            )));
        }
        ranges.push(start..end);
        start = end;
    }
    ranges.push(start..len);
    Ok(ranges)
}

/// Rebuild chunks of at most `target_size` bytes from `units`.
///
/// Units larger than the target come out as chunks of their own.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] for a zero target size or
/// malformed boundaries.
pub fn reconstruct(
    source: &str,
    units: &[Unit],
    boundaries: &[usize],
    target_size: usize,
    mode: ReconstructionMode,
) -> Result<Vec<Chunk>> {
    if target_size == 0 {
        return Err(Error::invalid("target_size must be > 0"));
    }
    let ranges = partitions(units.len(), boundaries)?;

    let merged: Vec<Unit> = match mode {
        ReconstructionMode::Partitioned => ranges
            .into_iter()
            .flat_map(|range| constrained_coalesce(units[range].iter().copied(), target_size, " "))
            .collect(),
        ReconstructionMode::Flat => {
            constrained_batches(units.iter().copied(), target_size, " ", false)?
        }
    };

    tracing::debug!(
        units = units.len(),
        partitions = boundaries.len() + 1,
        chunks = merged.len(),
        ?mode,
        "reconstruction"
    );

    Ok(merged
        .into_iter()
        .enumerate()
        .map(|(index, unit)| Chunk::from_unit(source, unit, index))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ten-byte words separated by single spaces.
    fn words(n: usize) -> (String, Vec<Unit>) {
        let text = (0..n)
            .map(|i| format!("word{i:06}"))
            .collect::<Vec<_>>()
            .join(" ");
        let units = (0..n).map(|i| Unit::new(i * 11, i * 11 + 10)).collect();
        (text, units)
    }

    #[test]
    fn test_partitions_reject_bad_boundaries() {
        assert!(partitions(5, &[0]).is_err());
        assert!(partitions(5, &[5]).is_err());
        assert!(partitions(5, &[3, 3]).is_err());
        assert!(partitions(5, &[3, 2]).is_err());
        assert!(partitions(0, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_no_boundaries_single_partition() {
        let (text, units) = words(6);
        let chunks = reconstruct(&text, &units, &[], 32, ReconstructionMode::Partitioned).unwrap();
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(
            texts,
            [
                "word000000 word000001 word000002",
                "word000003 word000004 word000005"
            ]
        );
    }

    #[test]
    fn test_boundaries_never_crossed() {
        let (text, units) = words(6);
        let chunks =
            reconstruct(&text, &units, &[1, 3], 100, ReconstructionMode::Partitioned).unwrap();
        let spans: Vec<_> = chunks.iter().map(Chunk::span).collect();
        assert_eq!(spans, [0..10, 11..32, 33..65]);
    }

    #[test]
    fn test_flat_mode_ignores_boundaries() {
        let (text, units) = words(6);
        let chunks = reconstruct(&text, &units, &[1, 3], 100, ReconstructionMode::Flat).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, text);
    }

    #[test]
    fn test_oversized_unit_kept_whole() {
        let text = "tiny enormous-unit-text tiny";
        let units = [Unit::new(0, 4), Unit::new(5, 23), Unit::new(24, 28)];
        let chunks = reconstruct(text, &units, &[], 10, ReconstructionMode::Partitioned).unwrap();
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["tiny", "enormous-unit-text", "tiny"]);
    }

    #[test]
    fn test_indices_sequential() {
        let (text, units) = words(8);
        let chunks =
            reconstruct(&text, &units, &[2, 5], 21, ReconstructionMode::Partitioned).unwrap();
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
            assert_eq!(&text[chunk.span()], chunk.text);
        }
    }

    #[test]
    fn test_zero_target_rejected() {
        let (text, units) = words(2);
        assert!(reconstruct(&text, &units, &[], 0, ReconstructionMode::Flat).is_err());
    }
}
