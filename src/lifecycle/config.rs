//! Disposal thresholds
//!
//! Use the builder methods on [`DisposalConfig`] to override the defaults.
//!
//! # Example
//!
//! ```rust
//! use tilemeta::lifecycle::DisposalConfig;
//!
//! let config = DisposalConfig::default()
//!     .large_threshold(64 * 1024)
//!     .batch_size(16);
//! assert!(config.validate().is_ok());
//! ```

use crate::core::error::{MetaError, MetaResult};

/// Records estimated above this many bytes are "large" and dispose in batches
pub const LARGE_METADATA_THRESHOLD: u64 = 1_000_000;

/// Records estimated above this many bytes trigger a reclaim hint
pub const VERY_LARGE_METADATA_THRESHOLD: u64 = 10_000_000;

/// Frames cleared between two cooperative yields
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Thresholds controlling tier selection in
/// [`LifecycleController`](crate::lifecycle::LifecycleController)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisposalConfig {
    /// Estimate above which asynchronous disposal is batched
    pub large_threshold: u64,
    /// Estimate above which a reclaim hint is issued after clearing
    pub very_large_threshold: u64,
    /// Frames cleared per batch
    pub batch_size: usize,
}

impl Default for DisposalConfig {
    fn default() -> Self {
        Self {
            large_threshold: LARGE_METADATA_THRESHOLD,
            very_large_threshold: VERY_LARGE_METADATA_THRESHOLD,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl DisposalConfig {
    /// Set the large-metadata threshold.
    pub fn large_threshold(mut self, bytes: u64) -> Self {
        self.large_threshold = bytes;
        self
    }

    /// Set the very-large-metadata threshold.
    pub fn very_large_threshold(mut self, bytes: u64) -> Self {
        self.very_large_threshold = bytes;
        self
    }

    /// Set the number of frames cleared per batch.
    pub fn batch_size(mut self, frames: usize) -> Self {
        self.batch_size = frames;
        self
    }

    /// Check the configuration is usable
    ///
    /// # Returns
    ///
    /// * `Err(MetaError::BadConfig)` if `batch_size` is zero or the
    ///   very-large threshold is below the large threshold
    pub fn validate(&self) -> MetaResult<()> {
        if self.batch_size == 0 {
            return Err(MetaError::BadConfig(
                "batch size must be greater than 0".to_string(),
            ));
        }
        if self.very_large_threshold < self.large_threshold {
            return Err(MetaError::BadConfig(format!(
                "very large threshold ({}) must not be below large threshold ({})",
                self.very_large_threshold, self.large_threshold
            )));
        }
        Ok(())
    }

    /// Whether `estimate` counts as large metadata
    pub fn is_large(&self, estimate: u64) -> bool {
        estimate > self.large_threshold
    }

    /// Whether `estimate` warrants a reclaim hint
    pub fn is_very_large(&self, estimate: u64) -> bool {
        estimate > self.very_large_threshold
    }
}
