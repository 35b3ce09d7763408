//! Shared fixtures and fakes for the integration tests.
//!
//! Every fixture is built in memory: DOCX files with docx-rs, photos with
//! `image`, and EXIF GPS blocks with kamadak-exif's writer.

#![allow(dead_code)]

use async_trait::async_trait;
use docx_rs::{Docx, Paragraph, Run};
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, LLMResponse, LlmError};
use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use trailteller::{Captioner, NarrativeSynthesizer, TrailError, TripDataset};

// ── Fixtures ─────────────────────────────────────────────────────────────────

/// A DOCX with one body paragraph per entry of `paragraphs`; an empty
/// entry becomes a paragraph with no runs.
pub fn docx(paragraphs: &[&str]) -> Vec<u8> {
    let doc = paragraphs.iter().fold(Docx::new(), |doc, p| {
        let para = if p.is_empty() {
            Paragraph::new()
        } else {
            Paragraph::new().add_run(Run::new().add_text(*p))
        };
        doc.add_paragraph(para)
    });
    let mut buf = Vec::new();
    doc.build().pack(Cursor::new(&mut buf)).unwrap();
    buf
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Jpeg)
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Png)
}

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([90, 140, 200])));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

/// A JPEG whose EXIF block holds `GPSLatitude = <degrees>/1`.
pub fn jpeg_with_latitude(degrees: u32) -> Vec<u8> {
    let field = Field {
        tag: Tag::GPSLatitude,
        ifd_num: In::PRIMARY,
        value: Value::Rational(vec![Rational::from((degrees, 1))]),
    };
    let mut writer = Writer::new();
    writer.push_field(&field);
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, false).unwrap();
    insert_exif(&jpeg(16, 12), &tiff.into_inner())
}

/// Splice an APP1 "Exif" segment right after the JPEG SOI marker.
fn insert_exif(jpeg: &[u8], tiff: &[u8]) -> Vec<u8> {
    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(tiff);
    let len = u16::try_from(payload.len() + 2).unwrap();

    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}

// ── Fakes ────────────────────────────────────────────────────────────────────

/// Captions every photo with the same sentence and counts calls.
pub struct FixedCaptioner {
    pub caption: String,
    pub calls: AtomicUsize,
}

impl FixedCaptioner {
    pub fn new(caption: &str) -> Self {
        Self {
            caption: caption.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Captioner for FixedCaptioner {
    async fn caption(&self, _bytes: &[u8]) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.caption.clone()
    }
}

/// An LLM endpoint that refuses every connection.
pub struct DownProvider;

#[async_trait]
impl LLMProvider for DownProvider {
    fn name(&self) -> &str {
        "down"
    }

    fn model(&self) -> &str {
        "down-model"
    }

    fn max_context_length(&self) -> usize {
        4096
    }

    async fn complete(&self, _prompt: &str) -> edgequake_llm::Result<LLMResponse> {
        Err(LlmError::NetworkError("connection refused".to_string()))
    }

    async fn complete_with_options(
        &self,
        prompt: &str,
        _options: &CompletionOptions,
    ) -> edgequake_llm::Result<LLMResponse> {
        self.complete(prompt).await
    }

    async fn chat(
        &self,
        _messages: &[ChatMessage],
        _options: Option<&CompletionOptions>,
    ) -> edgequake_llm::Result<LLMResponse> {
        self.complete("").await
    }
}

/// Captions with the byte length of the photo, so tests can tell photos
/// apart, after sleeping longer for earlier photos.
pub struct SlowSizedCaptioner;

#[async_trait]
impl Captioner for SlowSizedCaptioner {
    async fn caption(&self, bytes: &[u8]) -> String {
        let delay = 200_000 / (bytes.len() as u64).max(1);
        tokio::time::sleep(std::time::Duration::from_millis(delay.min(50))).await;
        format!("{} bytes", bytes.len())
    }
}

/// Records every dataset it is asked to narrate.
#[derive(Default)]
pub struct RecordingSynthesizer {
    pub seen: Mutex<Vec<TripDataset>>,
}

impl RecordingSynthesizer {
    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl NarrativeSynthesizer for RecordingSynthesizer {
    async fn synthesize(&self, dataset: &TripDataset) -> Result<String, TrailError> {
        self.seen.lock().unwrap().push(dataset.clone());
        Ok(format!("A journal of {} moments.", dataset.len()))
    }
}

/// A synthesis service that is down.
pub struct FailingSynthesizer;

#[async_trait]
impl NarrativeSynthesizer for FailingSynthesizer {
    async fn synthesize(&self, _dataset: &TripDataset) -> Result<String, TrailError> {
        Err(TrailError::SynthesisFailed {
            message: "503 Service Unavailable".into(),
        })
    }
}
