//! Record lifecycle
//!
//! This module provides the [`LifecycleController`] that disposes a record
//! either immediately or in cooperative batches, depending on its size
//! estimate.

pub mod cancel;
pub mod config;
pub mod controller;

pub use cancel::CancelToken;
pub use config::{
    DisposalConfig, DEFAULT_BATCH_SIZE, LARGE_METADATA_THRESHOLD, VERY_LARGE_METADATA_THRESHOLD,
};
pub use controller::{DisposalOutcome, DisposalTier, LifecycleController, LifecycleState};
