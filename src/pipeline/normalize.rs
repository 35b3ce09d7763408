//! Format normalisation: HEIC → JPEG before any other stage sees the photo.
//!
//! The EXIF reader and the vision APIs both handle JPEG and PNG; neither
//! reliably handles HEIC. Decoding needs the system libheif, so it sits
//! behind the `heic` feature. Builds without it never classify a file as
//! HEIC (see [`crate::classify::Capabilities`]), so the "missing codec"
//! branch below is only reachable by calling [`normalize`] directly.

use crate::classify::is_heic_name;
use crate::error::FormatError;
#[cfg(feature = "heic")]
use crate::pipeline::encode::{encode_jpeg, JPEG_QUALITY};
use tracing::debug;

/// Return JPEG bytes for a HEIC upload, or the input unchanged otherwise.
///
/// Decode failures are reported, never passed through: every later stage
/// assumes JPEG- or PNG-decodable bytes.
pub fn normalize(bytes: Vec<u8>, declared_name: &str) -> Result<Vec<u8>, FormatError> {
    if !is_heic_name(declared_name) {
        return Ok(bytes);
    }
    let jpeg = heic_to_jpeg(&bytes)?;
    debug!(
        "Normalised {}: {} HEIC bytes → {} JPEG bytes",
        declared_name,
        bytes.len(),
        jpeg.len()
    );
    Ok(jpeg)
}

#[cfg(feature = "heic")]
fn heic_to_jpeg(bytes: &[u8]) -> Result<Vec<u8>, FormatError> {
    let img = decode_heic(bytes)?;
    encode_jpeg(&img, JPEG_QUALITY).map_err(|e| FormatError(format!("JPEG encoding failed: {e}")))
}

#[cfg(not(feature = "heic"))]
fn heic_to_jpeg(_bytes: &[u8]) -> Result<Vec<u8>, FormatError> {
    Err(FormatError(
        crate::error::CapabilityUnavailable::Heic.to_string(),
    ))
}

/// Decode the primary image of a HEIC container to an RGB raster of the
/// same dimensions.
#[cfg(feature = "heic")]
fn decode_heic(bytes: &[u8]) -> Result<image::DynamicImage, FormatError> {
    use image::{DynamicImage, RgbImage};
    use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

    let lib = LibHeif::new();
    let ctx = HeifContext::read_from_bytes(bytes)
        .map_err(|e| FormatError(format!("not a readable HEIC container: {e}")))?;
    let handle = ctx
        .primary_image_handle()
        .map_err(|e| FormatError(format!("no primary image: {e}")))?;
    let decoded = lib
        .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
        .map_err(|e| FormatError(format!("HEIC decode failed: {e}")))?;

    let plane = decoded
        .planes()
        .interleaved
        .ok_or_else(|| FormatError("decoded HEIC has no interleaved RGB plane".into()))?;
    let (width, height) = (plane.width, plane.height);
    let row_len = width as usize * 3;

    // libheif pads rows to `stride`; copy only the visible pixels.
    let mut pixels = Vec::with_capacity(row_len * height as usize);
    for row in plane.data.chunks(plane.stride).take(height as usize) {
        let visible = row
            .get(..row_len)
            .ok_or_else(|| FormatError("HEIC row shorter than image width".into()))?;
        pixels.extend_from_slice(visible);
    }

    let raster = RgbImage::from_raw(width, height, pixels)
        .ok_or_else(|| FormatError("HEIC pixel buffer does not match dimensions".into()))?;
    Ok(DynamicImage::ImageRgb8(raster))
}
