//! Trip record aggregation: upload batch → ordered [`TripDataset`].
//!
//! Every file resolves to its own `Result<Option<TripRecord>, FileError>`:
//! a record, nothing (unsupported type), or a per-file failure. One bad
//! file never stops the files after it.
//!
//! With `concurrency > 1` files are driven through an ordered buffered
//! stream, so several captions can be in flight while records still come
//! out in upload order.

use crate::classify::{classify, Capabilities, FileKind, PhotoFormat};
use crate::config::JournalConfig;
use crate::error::FileError;
use crate::pipeline::{extract_geo_tags, extract_text, normalize, Captioner};
use crate::record::{TripDataset, TripRecord, UploadedFile, Warning};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

/// Result of folding an upload batch.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// One record per successfully processed file, in upload order.
    pub dataset: TripDataset,
    /// One entry per file with an unsupported type.
    pub warnings: Vec<Warning>,
    /// One entry per file whose extraction failed.
    pub failures: Vec<FileError>,
}

impl Aggregation {
    pub fn documents(&self) -> usize {
        self.dataset.records().iter().filter(|r| !r.is_photo()).count()
    }

    pub fn photos(&self) -> usize {
        self.dataset.records().iter().filter(|r| r.is_photo()).count()
    }
}

/// What happened to a single file.
#[derive(Debug)]
enum FileOutcome {
    Record(TripRecord),
    Skipped(Warning),
    Failed(FileError),
}

/// Fold `files` into typed records.
///
/// `caps` decides which extensions are accepted; pass
/// [`Capabilities::detect()`] unless HEIC has been handled upstream.
pub async fn aggregate(
    files: Vec<UploadedFile>,
    captioner: &dyn Captioner,
    caps: &Capabilities,
    config: &JournalConfig,
) -> Aggregation {
    let total = files.len();
    info!("Aggregating {} uploaded files", total);
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let outcomes: Vec<FileOutcome> = stream::iter(files.into_iter().enumerate().map(
        |(i, file)| async move {
            let index = i + 1;
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_start(index, total, &file.name);
            }
            let name = file.name.clone();
            let outcome = process_file(file, captioner, caps).await;
            report(config, index, total, &name, &outcome);
            outcome
        },
    ))
    .buffered(config.concurrency.max(1))
    .collect()
    .await;

    let mut aggregation = Aggregation::default();
    for outcome in outcomes {
        match outcome {
            FileOutcome::Record(r) => aggregation.dataset.push(r),
            FileOutcome::Skipped(w) => aggregation.warnings.push(w),
            FileOutcome::Failed(e) => aggregation.failures.push(e),
        }
    }

    info!(
        "Aggregated {} records ({} documents, {} photos), {} skipped, {} failed",
        aggregation.dataset.len(),
        aggregation.documents(),
        aggregation.photos(),
        aggregation.warnings.len(),
        aggregation.failures.len()
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, aggregation.dataset.len());
    }
    aggregation
}

/// Turn one upload into a record, a warning, or a failure.
async fn process_file(
    file: UploadedFile,
    captioner: &dyn Captioner,
    caps: &Capabilities,
) -> FileOutcome {
    let UploadedFile { name, bytes } = file;
    let kind = classify(&name, caps);
    debug!("{}: classified as {:?}", name, kind);

    let result = match kind {
        FileKind::Unsupported => {
            let warning = Warning::unsupported(&name);
            warn!("{}", warning);
            return FileOutcome::Skipped(warning);
        }
        FileKind::Document => extract_text(&bytes)
            .map(TripRecord::text)
            .map_err(|e| FileError::DocumentParse {
                filename: name.clone(),
                detail: e.to_string(),
            }),
        FileKind::Photo(format) => photo_record(&name, bytes, format, captioner).await,
    };

    match result {
        Ok(record) => FileOutcome::Record(record),
        Err(e) => {
            warn!("Skipping {}", e);
            FileOutcome::Failed(e)
        }
    }
}

async fn photo_record(
    name: &str,
    bytes: Vec<u8>,
    format: PhotoFormat,
    captioner: &dyn Captioner,
) -> Result<TripRecord, FileError> {
    // Location is read from the upload as-is: the JPEG that normalization
    // produces carries no EXIF. Neither GPS nor caption can fail the file.
    let gps = extract_geo_tags(&bytes);
    let bytes = if format == PhotoFormat::Heic {
        normalize(bytes, name).map_err(|e| FileError::Format {
            filename: name.to_string(),
            detail: e.to_string(),
        })?
    } else {
        bytes
    };

    let caption = captioner.caption(&bytes).await;
    debug!("{}: {} GPS tags", name, gps.len());
    Ok(TripRecord::photo(caption, gps))
}

fn report(config: &JournalConfig, index: usize, total: usize, name: &str, outcome: &FileOutcome) {
    let Some(ref cb) = config.progress_callback else {
        return;
    };
    match outcome {
        FileOutcome::Record(r) => {
            let kind = if r.is_photo() { "photo" } else { "document" };
            cb.on_file_complete(index, total, name, kind);
        }
        FileOutcome::Skipped(w) => cb.on_file_skipped(index, total, name, &w.message),
        FileOutcome::Failed(e) => cb.on_file_skipped(index, total, name, &e.to_string()),
    }
}
