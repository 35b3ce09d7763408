//! Image metadata extraction: EXIF GPS tags → [`GeoTagMap`].
//!
//! Location is an annotation, not a requirement. A photo without EXIF, or
//! with EXIF but no GPS block, yields an empty map. A corrupt EXIF block
//! yields an empty map too, logged at debug level; it never costs the photo
//! its caption.

use crate::record::GeoTagMap;
use exif::{Field, In, Reader, Value};
use std::io::Cursor;
use tracing::debug;

/// Tag-name prefix shared by every tag in the EXIF GPS IFD.
pub const GEO_TAG_PREFIX: &str = "GPS";

/// Read the GPS tags embedded in a JPEG, PNG, TIFF, HEIF or WebP image.
pub fn extract_geo_tags(bytes: &[u8]) -> GeoTagMap {
    let exif = match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return GeoTagMap::new(),
        Err(e) => {
            debug!("EXIF metadata unreadable, continuing without location: {}", e);
            return GeoTagMap::new();
        }
    };

    exif.fields()
        .filter(|f| f.ifd_num == In::PRIMARY)
        .filter_map(|f| {
            let name = f.tag.to_string();
            name.starts_with(GEO_TAG_PREFIX)
                .then(|| (name, render_value(f)))
        })
        .collect()
}

/// Render a field value as plain text.
///
/// Rationals that divide exactly print as integers, so a latitude of
/// `40/1, 26/1, 4641/100` becomes `40, 26, 46.41`.
fn render_value(field: &Field) -> String {
    fn join<T: ToString>(items: impl IntoIterator<Item = T>) -> String {
        items
            .into_iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    match &field.value {
        Value::Ascii(parts) => join(
            parts
                .iter()
                .map(|p| String::from_utf8_lossy(p).trim_end_matches('\0').to_string()),
        ),
        Value::Rational(rs) => join(rs.iter().map(|r| ratio(r.num as f64, r.denom as f64))),
        Value::SRational(rs) => join(rs.iter().map(|r| ratio(r.num as f64, r.denom as f64))),
        Value::Byte(v) => join(v),
        Value::Short(v) => join(v),
        Value::Long(v) => join(v),
        _ => field.display_value().to_string(),
    }
}

fn ratio(num: f64, denom: f64) -> String {
    if denom == 0.0 {
        return "NaN".to_string();
    }
    let v = num / denom;
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
