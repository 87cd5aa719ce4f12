//! Shared read access across threads
//!
//! Records have no interior mutability, so `estimated_size` and `validate`
//! can run concurrently on a shared record.

use std::sync::Arc;
use std::thread;

use tilemeta::formats::tiff::TiffMetadata;
use tilemeta::{AnyRecord, ImageFormat, MetadataRecord, Validate};

#[test]
fn concurrent_validation_agrees() {
    let mut tiff = TiffMetadata::new(70_000, 512);
    tiff.icc_profile = vec![0; 10_000];
    let record = Arc::new(AnyRecord::from(tiff));
    let expected = record.validate();

    let mut handles = vec![];
    for _ in 0..8 {
        let record = Arc::clone(&record);
        handles.push(thread::spawn(move || {
            (record.estimated_size(), record.validate())
        }));
    }

    for handle in handles {
        let (size, report) = handle.join().unwrap();
        assert_eq!(size, record.estimated_size());
        assert_eq!(report, expected);
        assert!(!report.is_valid());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn records_move_between_tasks() {
    let mut records = Vec::new();
    for format in ImageFormat::ALL {
        records.push(AnyRecord::new(format, 128, 128).unwrap());
    }

    let mut tasks = Vec::new();
    for record in records {
        tasks.push(tokio::spawn(async move {
            let mut controller = tilemeta::LifecycleController::new(record);
            controller
                .dispose_async(&tilemeta::CancelToken::new())
                .await
                .map(|outcome| outcome.tier)
        }));
    }

    for task in tasks {
        let tier = task.await.unwrap().unwrap();
        assert_eq!(tier, tilemeta::DisposalTier::Immediate);
    }
}
