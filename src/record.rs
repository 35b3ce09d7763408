//! Data model: uploaded files, typed trip records, and the per-invocation
//! dataset handed to the synthesizer.
//!
//! Nothing here outlives one pipeline invocation.

use crate::error::FileError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// EXIF tag name → rendered value, restricted to the GPS tags.
///
/// May be empty; most screenshots and edited photos carry no location.
pub type GeoTagMap = BTreeMap<String, String>;

/// One file from the upload batch: its declared name and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// A single piece of trip evidence extracted from one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TripRecord {
    /// Visible paragraph text of a document.
    Text { content: String },
    /// Model caption plus any GPS tags found in the photo.
    Photo { caption: String, gps: GeoTagMap },
}

impl TripRecord {
    pub fn text(content: impl Into<String>) -> Self {
        TripRecord::Text {
            content: content.into(),
        }
    }

    pub fn photo(caption: impl Into<String>, gps: GeoTagMap) -> Self {
        TripRecord::Photo {
            caption: caption.into(),
            gps,
        }
    }

    pub fn is_photo(&self) -> bool {
        matches!(self, TripRecord::Photo { .. })
    }
}

/// Ordered records for one invocation, in upload order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripDataset {
    records: Vec<TripRecord>,
}

impl TripDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: TripRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Canonical text form embedded in the synthesis prompt.
    ///
    /// One JSON object per line, in dataset order:
    ///
    /// ```text
    /// {"type":"text","content":"Day 1 at the lake"}
    /// {"type":"photo","caption":"A red canoe at dusk.","gps":{"GPSLatitude":"40"}}
    /// ```
    ///
    /// `gps` keys are sorted, so equal datasets always serialise identically.
    pub fn to_prompt_text(&self) -> String {
        self.records
            .iter()
            // Serialising a String/BTreeMap-only enum cannot fail.
            .filter_map(|r| serde_json::to_string(r).ok())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<Vec<TripRecord>> for TripDataset {
    fn from(records: Vec<TripRecord>) -> Self {
        Self { records }
    }
}

impl IntoIterator for TripDataset {
    type Item = TripRecord;
    type IntoIter = std::vec::IntoIter<TripRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// Surfaced to the user for a file that was skipped, not failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub filename: String,
    pub message: String,
}

impl Warning {
    pub fn unsupported(filename: impl Into<String>) -> Self {
        let filename = filename.into();
        let message = format!("Unsupported file: {filename}");
        Self { filename, message }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Counters for one journal run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalStats {
    /// Files in the upload batch.
    pub total_files: usize,
    pub documents: usize,
    pub photos: usize,
    /// Files with an unsupported extension.
    pub skipped_files: usize,
    /// Files that failed with a [`FileError`].
    pub failed_files: usize,
    pub total_duration_ms: u64,
    pub extraction_duration_ms: u64,
    pub synthesis_duration_ms: u64,
}

/// Everything one `create_journal*` call produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalOutput {
    /// Generated journal. `None` when no file produced a record, in which
    /// case synthesis was skipped.
    pub narrative: Option<String>,
    pub warnings: Vec<Warning>,
    pub failures: Vec<FileError>,
    pub stats: JournalStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_text_is_one_json_object_per_record() {
        let mut gps = GeoTagMap::new();
        gps.insert("GPSLongitude".into(), "12".into());
        gps.insert("GPSLatitude".into(), "40".into());
        let dataset = TripDataset::from(vec![
            TripRecord::text("Day 1 at the lake\nSunset was beautiful"),
            TripRecord::photo("A red canoe at dusk.", gps),
        ]);

        let text = dataset.to_prompt_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"type":"text","content":"Day 1 at the lake\nSunset was beautiful"}"#
        );
        assert_eq!(
            lines[1],
            r#"{"type":"photo","caption":"A red canoe at dusk.","gps":{"GPSLatitude":"40","GPSLongitude":"12"}}"#
        );
    }

    #[test]
    fn empty_dataset_serialises_to_empty_string() {
        assert_eq!(TripDataset::new().to_prompt_text(), "");
    }

    #[test]
    fn unsupported_warning_names_file() {
        let w = Warning::unsupported("packing-list.txt");
        assert_eq!(w.filename, "packing-list.txt");
        assert_eq!(w.to_string(), "Unsupported file: packing-list.txt");
    }
}
