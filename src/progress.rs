//! Progress-callback trait for per-file pipeline events.
//!
//! Inject an [`Arc<dyn JournalProgressCallback>`] via
//! [`crate::config::JournalConfigBuilder::progress_callback`] to receive
//! events as the aggregator works through the upload batch.
//!
//! # Example
//!
//! ```rust
//! use trailteller::{JournalConfig, JournalProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     done: AtomicUsize,
//! }
//!
//! impl JournalProgressCallback for CountingCallback {
//!     fn on_file_complete(&self, index: usize, total: usize, name: &str, kind: &str) {
//!         self.done.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{index}/{total} {name} ({kind})");
//!     }
//! }
//!
//! let cb = Arc::new(CountingCallback { done: AtomicUsize::new(0) });
//! let config = JournalConfig::builder()
//!     .progress_callback(cb as Arc<dyn JournalProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the pipeline as it processes each uploaded file.
///
/// Implementations must be `Send + Sync`: with `concurrency > 1` several
/// files are in flight at once and events for them interleave. All methods
/// default to no-ops.
///
/// `index` is 1-based upload position.
pub trait JournalProgressCallback: Send + Sync {
    /// Called once before the first file is looked at.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called when work on a file begins.
    fn on_file_start(&self, index: usize, total_files: usize, name: &str) {
        let _ = (index, total_files, name);
    }

    /// Called when a file produced a record.
    ///
    /// `kind` is `"document"` or `"photo"`.
    fn on_file_complete(&self, index: usize, total_files: usize, name: &str, kind: &str) {
        let _ = (index, total_files, name, kind);
    }

    /// Called when a file produced no record, either because its type is
    /// unsupported or because extraction failed.
    fn on_file_skipped(&self, index: usize, total_files: usize, name: &str, reason: &str) {
        let _ = (index, total_files, name, reason);
    }

    /// Called right before the single synthesis request.
    fn on_synthesis_start(&self, record_count: usize) {
        let _ = record_count;
    }

    /// Called once after every file has been attempted.
    fn on_batch_complete(&self, total_files: usize, record_count: usize) {
        let _ = (total_files, record_count);
    }
}

/// The default when no callback is configured.
pub struct NoopProgressCallback;

impl JournalProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::JournalConfig`].
pub type ProgressCallback = Arc<dyn JournalProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        skips: AtomicUsize,
        records: AtomicUsize,
    }

    impl JournalProgressCallback for TrackingCallback {
        fn on_file_start(&self, _index: usize, _total: usize, _name: &str) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_file_complete(&self, _index: usize, _total: usize, _name: &str, _kind: &str) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_file_skipped(&self, _index: usize, _total: usize, _name: &str, _reason: &str) {
            self.skips.fetch_add(1, Ordering::SeqCst);
        }

        fn on_batch_complete(&self, _total: usize, record_count: usize) {
            self.records.store(record_count, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_batch_start(2);
        cb.on_file_start(1, 2, "a.jpg");
        cb.on_file_complete(1, 2, "a.jpg", "photo");
        cb.on_file_skipped(2, 2, "b.txt", "unsupported");
        cb.on_synthesis_start(1);
        cb.on_batch_complete(2, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_file_start(1, 3, "day1.docx");
        tracker.on_file_complete(1, 3, "day1.docx", "document");
        tracker.on_file_start(2, 3, "lake.jpg");
        tracker.on_file_complete(2, 3, "lake.jpg", "photo");
        tracker.on_file_start(3, 3, "notes.txt");
        tracker.on_file_skipped(3, 3, "notes.txt", "Unsupported file: notes.txt");
        tracker.on_batch_complete(3, 2);

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.skips.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.records.load(Ordering::SeqCst), 2);
    }
}
