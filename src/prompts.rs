//! Prompts for photo captioning and journal synthesis.
//!
//! Callers can override either instruction via
//! [`crate::config::JournalConfig::caption_prompt`] and
//! [`crate::config::JournalConfig::narrative_prompt`]; the constants here are
//! used only when no override is provided.

use crate::record::TripDataset;

/// Instruction sent alongside every photo.
pub const DEFAULT_CAPTION_PROMPT: &str =
    "Describe this travel photo accurately in one short, vivid sentence.";

/// Instruction placed before the serialized trip records.
pub const DEFAULT_NARRATIVE_PROMPT: &str = r#"You are an expert travel writer.
Write a beautiful, chronological travel journal that summarizes the experiences in the travel data below.
Include emotional tone, sensory details, and natural transitions.

The travel data is given one record per line, in the order the traveller supplied it:
- {"type":"text","content":...} is the traveller's own notes.
- {"type":"photo","caption":...,"gps":{...}} is a photo description with any GPS tags it carried.
Captions in [square brackets] mark photos that could not be described; do not quote them."#;

/// Prefix that marks a caption produced by a failed captioning call.
pub const CAPTION_FAILURE_MARKER: &str = "[Image captioning failed";

/// Format the caption string used when the vision call fails.
pub fn caption_failure(reason: &str) -> String {
    format!("{CAPTION_FAILURE_MARKER}: {reason}]")
}

/// Build the full synthesis prompt for `dataset`.
///
/// `instruction` replaces [`DEFAULT_NARRATIVE_PROMPT`] when given.
pub fn narrative_prompt(dataset: &TripDataset, instruction: Option<&str>) -> String {
    let instruction = instruction.unwrap_or(DEFAULT_NARRATIVE_PROMPT);
    format!(
        "{instruction}\n\nTravel data:\n\"\"\"\n{}\n\"\"\"",
        dataset.to_prompt_text()
    )
}
