//! Image encoding: photo bytes → base64 `ImageData`, and rasters → JPEG.
//!
//! VLM APIs accept images as base64 data-URIs embedded in the JSON request
//! body. Uploaded JPEG and PNG bytes are forwarded untouched; only the MIME
//! type is sniffed so the data-URI header matches the payload.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_llm::ImageData;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use tracing::debug;

/// JPEG quality used when re-encoding decoded HEIC rasters.
pub const JPEG_QUALITY: u8 = 90;

/// MIME type for the data-URI, sniffed from magic bytes.
///
/// Anything that is not recognisably PNG is labelled JPEG, which is what
/// every non-PNG photo is by the time it reaches the captioner.
pub fn photo_mime(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => "image/png",
        _ => "image/jpeg",
    }
}

/// Wrap photo bytes as a base64 attachment for the vision request.
pub fn encode_photo(bytes: &[u8]) -> ImageData {
    let mime = photo_mime(bytes);
    let b64 = STANDARD.encode(bytes);
    debug!("Encoded photo → {} bytes base64 ({})", b64.len(), mime);
    ImageData::new(b64, mime)
}

/// Encode a raster as baseline JPEG.
///
/// JPEG has no alpha channel, so the image is flattened to RGB first.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buf), quality);
    DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)?;
    Ok(buf)
}
