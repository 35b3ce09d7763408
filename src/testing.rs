//! Providers that misbehave on purpose, and photo fixtures, for unit tests.

use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, LLMResponse, LlmError};
use std::time::Duration;

/// Every request fails the way an unreachable endpoint does.
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

/// Answers, but only after `delay`.
pub struct StalledProvider {
    pub delay: Duration,
}

#[async_trait]
impl LLMProvider for StalledProvider {
    fn name(&self) -> &str {
        "stalled"
    }

    fn model(&self) -> &str {
        "stalled-model"
    }

    fn max_context_length(&self) -> usize {
        4096
    }

    async fn complete(&self, _prompt: &str) -> edgequake_llm::Result<LLMResponse> {
        tokio::time::sleep(self.delay).await;
        Ok(LLMResponse::new("too late", "stalled-model"))
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

/// Encode a `width`×`height` RGB gradient as HEIC, optionally carrying a
/// raw TIFF EXIF block.
#[cfg(feature = "heic")]
pub fn heic(width: u32, height: u32, exif_tiff: Option<&[u8]>) -> Vec<u8> {
    use libheif_rs::{
        Channel, ColorSpace, CompressionFormat, EncoderQuality, HeifContext, Image, LibHeif,
        RgbChroma,
    };

    let mut image = Image::new(width, height, ColorSpace::Rgb(RgbChroma::Rgb)).unwrap();
    image
        .create_plane(Channel::Interleaved, width, height, 8)
        .unwrap();
    let plane = image.planes_mut().interleaved.unwrap();
    let stride = plane.stride;
    let data = plane.data;
    for y in 0..height as usize {
        let row = &mut data[y * stride..];
        for x in 0..width as usize {
            row[x * 3] = (x * 7) as u8;
            row[x * 3 + 1] = (y * 11) as u8;
            row[x * 3 + 2] = 128;
        }
    }

    let lib = LibHeif::new();
    let mut ctx = HeifContext::new().unwrap();
    let mut encoder = lib.encoder_for_format(CompressionFormat::Hevc).unwrap();
    encoder.set_quality(EncoderQuality::Lossy(90)).unwrap();
    let handle = ctx.encode_image(&image, &mut encoder, None).unwrap();
    if let Some(tiff) = exif_tiff {
        ctx.add_exif_metadata(&handle, tiff).unwrap();
    }
    ctx.write_to_bytes().unwrap()
}

/// A TIFF-framed EXIF block holding `GPSLatitude = <degrees>/1`.
#[cfg(feature = "heic")]
pub fn gps_tiff(degrees: u32) -> Vec<u8> {
    use exif::experimental::Writer;
    use exif::{Field, In, Rational, Tag, Value};

    let field = Field {
        tag: Tag::GPSLatitude,
        ifd_num: In::PRIMARY,
        value: Value::Rational(vec![Rational::from((degrees, 1))]),
    };
    let mut writer = Writer::new();
    writer.push_field(&field);
    let mut buf = std::io::Cursor::new(Vec::new());
    writer.write(&mut buf, false).unwrap();
    buf.into_inner()
}
