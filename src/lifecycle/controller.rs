//! Tiered disposal of metadata records
//!
//! [`LifecycleController`] owns a record and moves it from
//! [`LifecycleState::Live`] to the terminal [`LifecycleState::Disposed`].
//! Disposing twice is a no-op.
//!
//! Small records are always cleared in one go. Large records disposed
//! through [`LifecycleController::dispose_async`] are cleared group by
//! group with a cooperative yield between groups and between batches of
//! animation frames, so one disposal never holds the executor for long.

use log::{debug, trace};

use crate::core::error::{MetaError, MetaResult};
use crate::core::record::{FieldGroup, MetadataRecord};
use crate::lifecycle::cancel::CancelToken;
use crate::lifecycle::config::DisposalConfig;

/// Lifecycle state of a controlled record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Record is in use
    Live,
    /// Record has been cleared (terminal)
    Disposed,
}

/// Which disposal path ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisposalTier {
    /// The record was already disposed; nothing happened
    AlreadyDisposed,
    /// Every field was cleared without suspending
    Immediate,
    /// Fields were cleared in groups and batches with yields in between
    Batched,
}

/// Summary of a disposal call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisposalOutcome {
    /// Path taken
    pub tier: DisposalTier,
    /// Size estimate right before clearing
    pub estimated_before: u64,
    /// Number of cooperative yields performed
    pub yields: usize,
    /// Whether a reclaim hint was issued
    pub reclaim_hinted: bool,
}

impl DisposalOutcome {
    fn already_disposed() -> Self {
        Self {
            tier: DisposalTier::AlreadyDisposed,
            estimated_before: 0,
            yields: 0,
            reclaim_hinted: false,
        }
    }
}

/// Owner of a metadata record that controls its disposal
///
/// # Example
///
/// ```rust
/// use tilemeta::formats::jpeg::JpegMetadata;
/// use tilemeta::lifecycle::{LifecycleController, LifecycleState};
///
/// let mut jpeg = JpegMetadata::new(256, 256);
/// jpeg.icc_profile = vec![0u8; 4096];
///
/// let mut controller = LifecycleController::new(jpeg);
/// assert!(!controller.has_large_metadata());
/// controller.dispose();
/// assert_eq!(controller.state(), LifecycleState::Disposed);
/// assert!(controller.record().icc_profile.is_empty());
/// ```
#[derive(Debug)]
pub struct LifecycleController<R> {
    record: R,
    state: LifecycleState,
    config: DisposalConfig,
}

impl<R: MetadataRecord> LifecycleController<R> {
    /// Wrap a live record using the default thresholds
    pub fn new(record: R) -> Self {
        Self {
            record,
            state: LifecycleState::Live,
            config: DisposalConfig::default(),
        }
    }

    /// Wrap a live record with custom thresholds
    ///
    /// # Returns
    ///
    /// * `Err(MetaError::BadConfig)` if the configuration is invalid
    pub fn with_config(record: R, config: DisposalConfig) -> MetaResult<Self> {
        config.validate()?;
        Ok(Self {
            record,
            state: LifecycleState::Live,
            config,
        })
    }

    /// Active thresholds
    pub fn config(&self) -> &DisposalConfig {
        &self.config
    }

    /// Current state
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Whether the record has been disposed
    pub fn is_disposed(&self) -> bool {
        self.state == LifecycleState::Disposed
    }

    /// Borrow the record
    pub fn record(&self) -> &R {
        &self.record
    }

    /// Borrow the record mutably
    ///
    /// Returns `None` once the record is disposed.
    pub fn record_mut(&mut self) -> Option<&mut R> {
        match self.state {
            LifecycleState::Live => Some(&mut self.record),
            LifecycleState::Disposed => None,
        }
    }

    /// Release the record
    pub fn into_inner(self) -> R {
        self.record
    }

    /// Current size estimate of the record
    pub fn estimated_size(&self) -> u64 {
        self.record.estimated_size()
    }

    /// Whether the estimate exceeds the configured large threshold
    pub fn has_large_metadata(&self) -> bool {
        self.config.is_large(self.record.estimated_size())
    }

    /// Clear every field immediately
    ///
    /// Performs no I/O and never suspends. Calling it on a disposed record
    /// does nothing.
    pub fn dispose(&mut self) -> DisposalOutcome {
        if self.is_disposed() {
            debug!("{} record already disposed", self.record.format());
            return DisposalOutcome::already_disposed();
        }

        let estimated_before = self.record.estimated_size();
        self.record.clear_all();
        self.state = LifecycleState::Disposed;
        debug!(
            "disposed {} record immediately ({} bytes estimated)",
            self.record.format(),
            estimated_before
        );

        DisposalOutcome {
            tier: DisposalTier::Immediate,
            estimated_before,
            yields: 0,
            reclaim_hinted: false,
        }
    }

    /// Clear every field, yielding cooperatively for large records
    ///
    /// Records at or below the large threshold are cleared exactly like
    /// [`dispose`](Self::dispose). Larger ones are cleared in
    /// [`FieldGroup::ORDER`], yielding between groups and after every
    /// `batch_size` frames when the frame sequence exceeds one batch.
    ///
    /// `cancel` is checked before each group and after each frame batch.
    ///
    /// # Returns
    ///
    /// * `Ok(DisposalOutcome)` once the record is disposed
    /// * `Err(MetaError::Cancelled)` if cancellation was requested; the
    ///   record stays [`LifecycleState::Live`] and partially cleared, and a
    ///   later call finishes the job
    pub async fn dispose_async(&mut self, cancel: &CancelToken) -> MetaResult<DisposalOutcome> {
        if self.is_disposed() {
            debug!("{} record already disposed", self.record.format());
            return Ok(DisposalOutcome::already_disposed());
        }

        let estimated_before = self.record.estimated_size();
        if !self.config.is_large(estimated_before) {
            return Ok(self.dispose());
        }

        debug!(
            "disposing large {} record in batches ({} bytes estimated, {} frames)",
            self.record.format(),
            estimated_before,
            self.record.frame_count()
        );

        let batch_size = self.config.batch_size;
        let mut yields = 0;
        let last = FieldGroup::ORDER.len() - 1;

        for (completed, group) in FieldGroup::ORDER.into_iter().enumerate() {
            check_cancel(cancel, completed)?;

            if group == FieldGroup::Collections && self.record.frame_count() > batch_size {
                while self.record.clear_frames(batch_size) > 0 {
                    trace!("cleared frame batch, {} frames left", self.record.frame_count());
                    yield_point(&mut yields).await;
                    check_cancel(cancel, completed)?;
                }
            }

            self.record.clear_group(group);
            trace!("cleared field group {}", group);

            if completed < last {
                yield_point(&mut yields).await;
            }
        }

        self.state = LifecycleState::Disposed;

        let reclaim_hinted = self.config.is_very_large(estimated_before);
        if reclaim_hinted {
            // Memory is returned to the allocator as each field is replaced,
            // so the hint has nothing further to trigger.
            debug!(
                "reclaim hint for {} record ({} bytes released)",
                self.record.format(),
                estimated_before
            );
        }

        Ok(DisposalOutcome {
            tier: DisposalTier::Batched,
            estimated_before,
            yields,
            reclaim_hinted,
        })
    }
}

fn check_cancel(cancel: &CancelToken, completed_groups: usize) -> MetaResult<()> {
    if cancel.is_cancelled() {
        debug!("disposal cancelled after {} field group(s)", completed_groups);
        return Err(MetaError::Cancelled { completed_groups });
    }
    Ok(())
}

async fn yield_point(yields: &mut usize) {
    *yields += 1;
    tokio::task::yield_now().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::base::MetadataCore;
    use crate::core::format::ImageFormat;
    use crate::core::frame::AnimationFrame;
    use crate::core::record::truncate_tail;
    use crate::core::size::SizeEstimate;

    #[derive(Debug, Default, PartialEq)]
    struct TestRecord {
        core: MetadataCore,
        icc: Vec<u8>,
        exif: Vec<u8>,
        frames: Vec<AnimationFrame>,
    }

    impl MetadataRecord for TestRecord {
        fn format(&self) -> ImageFormat {
            ImageFormat::Webp
        }

        fn core(&self) -> &MetadataCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut MetadataCore {
            &mut self.core
        }

        fn estimated_size(&self) -> u64 {
            SizeEstimate::new()
                .fixed(self.core.estimated_size())
                .blob(&self.icc)
                .blob(&self.exif)
                .frames(&self.frames)
                .finish()
        }

        fn clear_group(&mut self, group: FieldGroup) {
            match group {
                FieldGroup::IccProfile => self.icc = Vec::new(),
                FieldGroup::Exif => self.exif = Vec::new(),
                FieldGroup::Xmp => {}
                FieldGroup::Collections => self.frames = Vec::new(),
                FieldGroup::Scalars => self.core.clear(),
            }
        }

        fn frame_count(&self) -> usize {
            self.frames.len()
        }

        fn clear_frames(&mut self, max: usize) -> usize {
            truncate_tail(&mut self.frames, max)
        }
    }

    fn large_record(frames: usize) -> TestRecord {
        TestRecord {
            core: MetadataCore::with_dimensions(512, 512),
            icc: vec![0; 1_200_000],
            exif: vec![0; 64],
            frames: (0..frames)
                .map(|_| AnimationFrame::new(0, 0, 8, 8, 100).with_pixel_data(vec![0; 16]))
                .collect(),
        }
    }

    #[test]
    fn test_sync_dispose_clears_and_is_idempotent() {
        let mut controller = LifecycleController::new(large_record(3));
        let first = controller.dispose();
        assert_eq!(first.tier, DisposalTier::Immediate);
        assert!(controller.is_disposed());
        assert_eq!(controller.record(), &TestRecord::default());

        let second = controller.dispose();
        assert_eq!(second.tier, DisposalTier::AlreadyDisposed);
        assert_eq!(controller.record(), &TestRecord::default());
    }

    #[test]
    fn test_record_mut_unavailable_after_dispose() {
        let mut controller = LifecycleController::new(TestRecord::default());
        assert!(controller.record_mut().is_some());
        controller.dispose();
        assert!(controller.record_mut().is_none());
    }

    #[test]
    fn test_with_config_rejects_bad_config() {
        let result = LifecycleController::with_config(
            TestRecord::default(),
            DisposalConfig::default().batch_size(0),
        );
        assert!(matches!(result, Err(MetaError::BadConfig(_))));
    }

    #[tokio::test]
    async fn test_async_small_record_is_immediate() {
        let mut record = TestRecord::default();
        record.icc = vec![0; 1000];
        let mut controller = LifecycleController::new(record);

        let outcome = controller.dispose_async(&CancelToken::new()).await.unwrap();
        assert_eq!(outcome.tier, DisposalTier::Immediate);
        assert_eq!(outcome.yields, 0);
        assert!(controller.is_disposed());
    }

    #[tokio::test]
    async fn test_async_large_record_yields_between_groups() {
        let mut controller = LifecycleController::new(large_record(0));
        assert!(controller.has_large_metadata());

        let outcome = controller.dispose_async(&CancelToken::new()).await.unwrap();
        assert_eq!(outcome.tier, DisposalTier::Batched);
        assert_eq!(outcome.yields, FieldGroup::ORDER.len() - 1);
        assert!(!outcome.reclaim_hinted);
        assert_eq!(controller.record(), &TestRecord::default());
    }

    #[tokio::test]
    async fn test_async_frames_yield_per_batch() {
        let mut controller = LifecycleController::new(large_record(250));
        let outcome = controller.dispose_async(&CancelToken::new()).await.unwrap();
        // 3 frame batches (100, 100, 50) plus 4 inter-group yields
        assert_eq!(outcome.yields, 3 + 4);
        assert_eq!(controller.record().frames.len(), 0);
    }

    #[tokio::test]
    async fn test_async_very_large_hints_reclaim() {
        let mut record = large_record(0);
        record.icc = vec![0; 10_000_001];
        let mut controller = LifecycleController::new(record);
        let outcome = controller.dispose_async(&CancelToken::new()).await.unwrap();
        assert!(outcome.reclaim_hinted);
    }

    #[tokio::test]
    async fn test_async_cancel_before_start() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut controller = LifecycleController::new(large_record(10));

        let err = controller.dispose_async(&cancel).await.unwrap_err();
        assert!(matches!(err, MetaError::Cancelled { completed_groups: 0 }));
        assert_eq!(controller.state(), LifecycleState::Live);
        assert_eq!(controller.record().icc.len(), 1_200_000);

        // a later call without cancellation finishes the job
        controller.dispose_async(&CancelToken::new()).await.unwrap();
        assert!(controller.is_disposed());
        assert_eq!(controller.record(), &TestRecord::default());
    }

    #[tokio::test]
    async fn test_async_cancel_between_groups() {
        let cancel = CancelToken::new();
        let remote = cancel.clone();
        // runs at the first yield, after the ICC profile group
        tokio::spawn(async move { remote.cancel() });

        let mut controller = LifecycleController::new(large_record(300));
        let err = controller.dispose_async(&cancel).await.unwrap_err();
        assert!(matches!(err, MetaError::Cancelled { completed_groups: 1 }));
        assert_eq!(controller.state(), LifecycleState::Live);
        assert!(controller.record().icc.is_empty());
        assert_eq!(controller.record().exif.len(), 64);
        assert_eq!(controller.record().frames.len(), 300);

        // without the ICC profile the remainder is small
        let outcome = controller.dispose_async(&CancelToken::new()).await.unwrap();
        assert_eq!(outcome.tier, DisposalTier::Immediate);
        assert!(controller.is_disposed());
        assert_eq!(controller.record(), &TestRecord::default());
    }

    /// Cancels its token once the first frame batch is gone
    #[derive(Debug)]
    struct CancellingRecord {
        inner: TestRecord,
        cancel: CancelToken,
    }

    impl MetadataRecord for CancellingRecord {
        fn format(&self) -> ImageFormat {
            self.inner.format()
        }

        fn core(&self) -> &MetadataCore {
            self.inner.core()
        }

        fn core_mut(&mut self) -> &mut MetadataCore {
            self.inner.core_mut()
        }

        fn estimated_size(&self) -> u64 {
            self.inner.estimated_size()
        }

        fn clear_group(&mut self, group: FieldGroup) {
            self.inner.clear_group(group)
        }

        fn frame_count(&self) -> usize {
            self.inner.frame_count()
        }

        fn clear_frames(&mut self, max: usize) -> usize {
            let cleared = self.inner.clear_frames(max);
            self.cancel.cancel();
            cleared
        }
    }

    #[tokio::test]
    async fn test_async_cancel_between_frame_batches() {
        let cancel = CancelToken::new();
        let mut controller = LifecycleController::new(CancellingRecord {
            inner: large_record(250),
            cancel: cancel.clone(),
        });

        let err = controller.dispose_async(&cancel).await.unwrap_err();
        // ICC profile, EXIF and XMP are done; one batch of 100 frames went
        assert!(matches!(err, MetaError::Cancelled { completed_groups: 3 }));
        assert_eq!(controller.state(), LifecycleState::Live);
        assert!(controller.record().inner.icc.is_empty());
        assert!(controller.record().inner.exif.is_empty());
        assert_eq!(controller.record().inner.frames.len(), 150);

        controller.dispose_async(&CancelToken::new()).await.unwrap();
        assert!(controller.is_disposed());
        assert_eq!(controller.record().inner, TestRecord::default());
    }

    #[tokio::test]
    async fn test_async_twice_is_noop() {
        let mut controller = LifecycleController::new(large_record(5));
        controller.dispose_async(&CancelToken::new()).await.unwrap();
        let again = controller.dispose_async(&CancelToken::new()).await.unwrap();
        assert_eq!(again.tier, DisposalTier::AlreadyDisposed);
    }
}
