//! # trailteller
//!
//! Turn a batch of travel documents and photos into a narrative travel
//! journal using Vision Language Models (VLMs).
//!
//! ## Pipeline Overview
//!
//! ```text
//! uploads (.docx .jpg .jpeg .png .heic)
//!  │
//!  ├─ 1. Classify   one case-insensitive extension check per file
//!  ├─ 2. Normalize  HEIC → JPEG (feature `heic`)
//!  ├─ 3. Extract    DOCX paragraphs │ EXIF GPS tags + VLM caption
//!  ├─ 4. Aggregate  ordered TripRecords, warnings, per-file failures
//!  └─ 5. Synthesize one LLM call → journal Markdown
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trailteller::{create_journal, JournalConfig, UploadedFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY
//!     let config = JournalConfig::default();
//!     let files = vec![
//!         UploadedFile::new("day1.docx", std::fs::read("day1.docx")?),
//!         UploadedFile::new("lake.jpg", std::fs::read("lake.jpg")?),
//!     ];
//!     let output = create_journal(files, &config).await?;
//!     for w in &output.warnings {
//!         eprintln!("{w}");
//!     }
//!     if let Some(story) = output.narrative {
//!         println!("{story}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `trailteller` binary (clap + anyhow + tracing-subscriber) |
//! | `heic`  | off     | HEIC decoding via the system libheif |
//!
//! Without `heic`, `.heic` uploads are reported as unsupported instead of
//! failing mid-batch.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod error;
pub mod journal;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod record;
pub mod synthesize;

#[cfg(test)]
mod testing;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use aggregate::{aggregate, Aggregation};
pub use classify::{classify, Capabilities, FileKind, PhotoFormat};
pub use config::{JournalConfig, JournalConfigBuilder};
pub use error::{CapabilityUnavailable, DocumentParseError, FileError, FormatError, TrailError};
pub use journal::{create_journal, create_journal_with, resolve_provider, write_journal};
pub use pipeline::{extract_geo_tags, extract_text, normalize, Captioner, VisionCaptioner};
pub use progress::{JournalProgressCallback, NoopProgressCallback, ProgressCallback};
pub use record::{
    GeoTagMap, JournalOutput, JournalStats, TripDataset, TripRecord, UploadedFile, Warning,
};
pub use synthesize::{LlmNarrator, NarrativeSynthesizer};
