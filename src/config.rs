//! Configuration for the regionizer pipeline.
//!
//! The defaults reproduce the reference behaviour: a fixed ΔE threshold of
//! 5.0, list-based region merging and the `_regionized` output suffix.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use regionizer::RegionizerConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = RegionizerConfig::from_json_file(Path::new("regionizer.json"))?;
//!
//! // Or use defaults with a custom threshold
//! let config = RegionizerConfig::default().with_threshold(8.0);
//! # Ok::<(), regionizer::RegionizeError>(())
//! ```
//!
//! Every field is optional in JSON; missing fields take their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{output, segmentation};
use crate::error::{RegionizeError, Result};

/// How row merging unions column regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MergeStrategy {
    /// Relabel every member of the absorbed region on each merge
    #[default]
    MemberList,
    /// Union-find with path halving, relabelled once after the pass
    DisjointSet,
}

/// Complete pipeline configuration.
///
/// Can be serialized to/from JSON for reproducible runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionizerConfig {
    /// Maximum ΔE76 distance between adjacent pixels of one region
    pub threshold: f64,

    /// Union strategy used by the row merge pass
    pub merge_strategy: MergeStrategy,

    /// Run color conversion, column segmentation and border passes on the
    /// rayon thread pool
    pub parallel: bool,

    /// Inserted before the final extension of the input file name
    pub output_suffix: String,

    /// Also flag the first pixel of every row and column, framing the top
    /// and left edges of the mask
    pub frame_edges: bool,
}

impl Default for RegionizerConfig {
    fn default() -> Self {
        Self {
            threshold: segmentation::DEFAULT_THRESHOLD,
            merge_strategy: MergeStrategy::default(),
            parallel: true,
            output_suffix: output::DEFAULT_SUFFIX.to_string(),
            frame_edges: false,
        }
    }
}

impl RegionizerConfig {
    /// Replace the color-distance threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Replace the merge strategy
    pub fn with_merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.merge_strategy = strategy;
        self
    }

    /// Enable or disable the rayon-backed stages
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check that every parameter is usable
    ///
    /// # Errors
    ///
    /// Returns `RegionizeError::InvalidParameter` if:
    /// - `threshold` is negative, NaN or infinite
    /// - `output_suffix` is empty or contains a path separator
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(RegionizeError::invalid_parameter("threshold", self.threshold));
        }

        if self.output_suffix.is_empty() || self.output_suffix.contains(['/', '\\']) {
            return Err(RegionizeError::invalid_parameter(
                "output_suffix",
                format!("{:?}", self.output_suffix),
            ));
        }

        Ok(())
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RegionizeError::config(path, "cannot read file", e))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| RegionizeError::config(path, "invalid JSON", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| RegionizeError::config(path, "cannot serialize", e))?;
        std::fs::write(path, json)
            .map_err(|e| RegionizeError::config(path, "cannot write file", e))?;
        Ok(())
    }
}
