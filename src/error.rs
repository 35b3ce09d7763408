//! Error types for the trailteller library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`TrailError`] — **Fatal**: the journal cannot be produced at all
//!   (input file missing, provider not configured, synthesis call failed).
//!   Returned as `Err(TrailError)` from the top-level `create_journal*`
//!   functions.
//!
//! * [`FileError`] — **Non-fatal**: one uploaded file could not be turned
//!   into a record (corrupt HEIC, malformed DOCX) but the rest of the batch
//!   is fine. Collected in [`crate::aggregate::Aggregation::failures`].
//!
//! Two softer conditions never surface as errors: a corrupt EXIF block
//! degrades to an empty geo-tag map, and a captioning failure degrades to a
//! visible marker caption.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the trailteller library.
#[derive(Debug, Error)]
pub enum TrailError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// No provider could be set up (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The journal synthesis request failed. There is no partial narrative.
    #[error("Journal synthesis failed: {message}")]
    SynthesisFailed { message: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output journal file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single uploaded file.
///
/// The file contributes no record; the batch carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum FileError {
    /// HEIC bytes could not be decoded or re-encoded as JPEG.
    #[error("{filename}: image conversion failed: {detail}")]
    Format { filename: String, detail: String },

    /// The DOCX container or its XML body is malformed.
    #[error("{filename}: document could not be parsed: {detail}")]
    DocumentParse { filename: String, detail: String },
}

impl FileError {
    /// Name of the file this error belongs to.
    pub fn filename(&self) -> &str {
        match self {
            FileError::Format { filename, .. } | FileError::DocumentParse { filename, .. } => {
                filename
            }
        }
    }
}

/// HEIC bytes failed to decode, or HEIC support is not compiled in.
///
/// Produced by [`crate::pipeline::normalize`]; the aggregator attaches the
/// filename and turns it into [`FileError::Format`].
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct FormatError(pub String);

/// The DOCX container or its XML body is malformed.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct DocumentParseError(pub String);

/// A codec the runtime would need is missing. Detected once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityUnavailable {
    #[error("HEIC support unavailable (built without the `heic` feature). Convert iPhone photos to JPEG.")]
    Heic,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesis_failed_display() {
        let e = TrailError::SynthesisFailed {
            message: "503 Service Unavailable".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("synthesis failed"), "got: {msg}");
        assert!(msg.contains("503"));
    }

    #[test]
    fn provider_not_configured_display() {
        let e = TrailError::ProviderNotConfigured {
            provider: "openai".into(),
            hint: "Set OPENAI_API_KEY".into(),
        };
        assert!(e.to_string().contains("openai"));
        assert!(e.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn file_error_names_the_file() {
        let e = FileError::DocumentParse {
            filename: "notes.docx".into(),
            detail: "invalid Zip archive".into(),
        };
        assert_eq!(e.filename(), "notes.docx");
        assert!(e.to_string().starts_with("notes.docx:"));
    }

    #[test]
    fn capability_notice_mentions_jpeg() {
        assert!(CapabilityUnavailable::Heic.to_string().contains("JPEG"));
    }
}
