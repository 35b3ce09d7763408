//! File-type classification and runtime codec capabilities.
//!
//! This is the one place an uploaded file's type is decided. The decision is
//! made from the declared filename's extension, case-insensitively, and it is
//! made once per file; every later stage matches on the resulting
//! [`FileKind`].

use crate::error::CapabilityUnavailable;
use std::path::Path;

/// Photo encodings the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoFormat {
    Jpeg,
    Png,
    /// Must pass through [`crate::pipeline::normalize`] before anything else.
    Heic,
}

/// What the aggregator will do with a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Document,
    Photo(PhotoFormat),
    Unsupported,
}

impl FileKind {
    /// Short label used in progress events and logs.
    pub fn label(&self) -> &'static str {
        match self {
            FileKind::Document => "document",
            FileKind::Photo(_) => "photo",
            FileKind::Unsupported => "unsupported",
        }
    }
}

/// Optional codecs available in this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub heic: bool,
}

impl Capabilities {
    /// Probe the build once at startup.
    pub fn detect() -> Self {
        Self {
            heic: cfg!(feature = "heic"),
        }
    }

    /// Everything enabled, regardless of the build. For tests and callers
    /// that normalise HEIC themselves.
    pub fn all() -> Self {
        Self { heic: true }
    }

    /// Notices to show the user for capabilities this build lacks.
    pub fn missing(&self) -> Vec<CapabilityUnavailable> {
        let mut missing = Vec::new();
        if !self.heic {
            missing.push(CapabilityUnavailable::Heic);
        }
        missing
    }

    /// Extensions currently accepted for upload, lowercase, without dots.
    pub fn accepted_extensions(&self) -> Vec<&'static str> {
        let mut exts = vec!["docx", "jpg", "jpeg", "png"];
        if self.heic {
            exts.push("heic");
        }
        exts
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::detect()
    }
}

/// Lowercased extension of `name`, if any.
pub fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// True when `name` declares the HEIC encoding.
pub fn is_heic_name(name: &str) -> bool {
    extension_of(name).as_deref() == Some("heic")
}

/// Classify a declared filename.
pub fn classify(name: &str, caps: &Capabilities) -> FileKind {
    match extension_of(name).as_deref() {
        Some("docx") => FileKind::Document,
        Some("jpg") | Some("jpeg") => FileKind::Photo(PhotoFormat::Jpeg),
        Some("png") => FileKind::Photo(PhotoFormat::Png),
        Some("heic") if caps.heic => FileKind::Photo(PhotoFormat::Heic),
        _ => FileKind::Unsupported,
    }
}
