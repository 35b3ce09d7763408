//! Per-file extraction stages.
//!
//! Each submodule implements exactly one transformation step and knows
//! nothing about the batch it is part of; [`crate::aggregate`] strings them
//! together.
//!
//! ## Data Flow
//!
//! ```text
//!              ┌─ docx ──────────────────────────▶ Text record
//! classify ──▶ ┤
//!              └─ normalize ─┬─ geotags ─┐
//!                (HEIC→JPEG) └─ caption ─┴──────▶ Photo record
//! ```
//!
//! 1. [`normalize`] — HEIC to JPEG; everything else passes through
//! 2. [`docx`]      — visible paragraph text of a DOCX
//! 3. [`geotags`]   — EXIF GPS tags; never fails
//! 4. [`caption`]   — vision-model caption; never fails
//! 5. [`encode`]    — base64 wrapping and JPEG encoding shared by 1 and 4
//!
//! [`input`] sits in front of all of them and turns CLI arguments into
//! uploads.

pub mod caption;
pub mod docx;
pub mod encode;
pub mod geotags;
pub mod input;
pub mod normalize;

pub use caption::{Captioner, VisionCaptioner};
pub use docx::extract_text;
pub use geotags::extract_geo_tags;
pub use normalize::normalize;
