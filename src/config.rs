//! Pipeline configuration.
//!
//! All knobs live in [`SplitConfig`]. Every struct here implements
//! `Default`, has builder-style setters, and derives serde traits with
//! `#[serde(default)]`, so a partial JSON or TOML document fills in the rest:
//!
//! ```rust
//! use seams::SplitConfig;
//!
//! let config = SplitConfig::new(1024).window_size(5).percentile(0.25);
//! assert!(config.validate().is_ok());
//! assert_eq!(config.savgol_window, 5);
//! ```
//!
//! Validation is separate from construction. [`SemanticSplitter`](crate::SemanticSplitter)
//! validates before touching the input, so a bad configuration fails fast
//! with [`Error::InvalidConfiguration`].

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// How chunks are rebuilt from units once boundaries are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconstructionMode {
    /// Coalesce within each boundary-delimited partition. Chunks never cross
    /// a detected boundary.
    #[default]
    Partitioned,
    /// Greedy batching over all units, ignoring boundaries.
    Flat,
}

/// Sizes used while breaking the raw document into units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    /// Cap when coalescing lines.
    pub line_size: usize,
    /// Cap when coalescing the sentences of an oversized line. Never larger
    /// than the target size in effect.
    pub sentence_size: usize,
    /// Pieces shorter than this are merged into their predecessor.
    pub cleanup_size: usize,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            line_size: 96,
            sentence_size: 96,
            cleanup_size: 32,
        }
    }
}

impl StructureConfig {
    /// Check that the caps are usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `line_size` or
    /// `sentence_size` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.line_size == 0 {
            return Err(Error::invalid("line_size must be > 0"));
        }
        if self.sentence_size == 0 {
            return Err(Error::invalid("sentence_size must be > 0"));
        }
        Ok(())
    }
}

/// Configuration for [`SemanticSplitter`](crate::SemanticSplitter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Target chunk size in bytes; chunks are filled up to it.
    pub target_size: usize,
    /// Number of units on each side of a boundary averaged into the curve.
    pub window_size: usize,
    /// Polynomial order of the smoothing filter.
    pub poly_order: usize,
    /// Smoothing window length. Must be odd and greater than `poly_order`.
    pub savgol_window: usize,
    /// Only minima below this quantile of the curve become boundaries.
    pub percentile: f64,
    /// How chunks are rebuilt.
    pub mode: ReconstructionMode,
    /// Structural splitting sizes.
    pub structure: StructureConfig,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            target_size: 1536,
            window_size: 3,
            poly_order: 3,
            savgol_window: 5,
            percentile: 0.4,
            mode: ReconstructionMode::default(),
            structure: StructureConfig::default(),
        }
    }
}

impl SplitConfig {
    /// Default configuration with the given target size.
    #[must_use]
    pub fn new(target_size: usize) -> Self {
        Self {
            target_size,
            ..Self::default()
        }
    }

    /// Set the similarity window.
    #[must_use]
    pub fn window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the smoothing filter's polynomial order and window.
    #[must_use]
    pub fn smoothing(mut self, poly_order: usize, savgol_window: usize) -> Self {
        self.poly_order = poly_order;
        self.savgol_window = savgol_window;
        self
    }

    /// Set the boundary percentile threshold.
    #[must_use]
    pub fn percentile(mut self, percentile: f64) -> Self {
        self.percentile = percentile;
        self
    }

    /// Set the reconstruction mode.
    #[must_use]
    pub fn mode(mut self, mode: ReconstructionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the structural splitting sizes.
    #[must_use]
    pub fn structure(mut self, structure: StructureConfig) -> Self {
        self.structure = structure;
        self
    }

    /// Check every parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first bad parameter.
    pub fn validate(&self) -> Result<()> {
        if self.target_size == 0 {
            return Err(Error::invalid("target_size must be > 0"));
        }
        if self.window_size == 0 {
            return Err(Error::invalid("window_size must be >= 1"));
        }
        if self.poly_order >= self.savgol_window {
            return Err(Error::invalid(format!(
                "poly_order ({}) must be < savgol_window ({})",
                self.poly_order, self.savgol_window
            )));
        }
        if self.savgol_window % 2 == 0 {
            return Err(Error::invalid(format!(
                "savgol_window ({}) must be odd",
                self.savgol_window
            )));
        }
        if !(0.0..=1.0).contains(&self.percentile) {
            return Err(Error::invalid(format!(
                "percentile ({}) must be within [0, 1]",
                self.percentile
            )));
        }
        self.structure.validate()
    }
}
