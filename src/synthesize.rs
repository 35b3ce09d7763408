//! Narrative synthesis: one text request that turns the whole dataset into
//! a journal.
//!
//! Unlike captioning there is nothing to degrade to here. A failed request
//! is a failed invocation and surfaces as [`TrailError::SynthesisFailed`].

use crate::config::JournalConfig;
use crate::error::TrailError;
use crate::prompts::narrative_prompt;
use crate::record::TripDataset;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Writes the journal for a dataset.
#[async_trait]
pub trait NarrativeSynthesizer: Send + Sync {
    async fn synthesize(&self, dataset: &TripDataset) -> Result<String, TrailError>;
}

/// [`NarrativeSynthesizer`] backed by an [`LLMProvider`].
pub struct LlmNarrator {
    provider: Arc<dyn LLMProvider>,
    instruction: Option<String>,
    options: CompletionOptions,
}

impl LlmNarrator {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &JournalConfig) -> Self {
        Self {
            provider,
            instruction: config.narrative_prompt.clone(),
            options: build_options(config),
        }
    }
}

#[async_trait]
impl NarrativeSynthesizer for LlmNarrator {
    async fn synthesize(&self, dataset: &TripDataset) -> Result<String, TrailError> {
        let start = Instant::now();
        let prompt = narrative_prompt(dataset, self.instruction.as_deref());
        debug!("Synthesis prompt: {} chars, {} records", prompt.len(), dataset.len());

        let messages = vec![ChatMessage::user(prompt)];
        let response = self
            .provider
            .chat(&messages, Some(&self.options))
            .await
            .map_err(|e| TrailError::SynthesisFailed {
                message: e.to_string(),
            })?;

        let narrative = response.content.trim().to_string();
        if narrative.is_empty() {
            return Err(TrailError::SynthesisFailed {
                message: "model returned an empty journal".into(),
            });
        }
        info!(
            "Journal written: {} chars, {} output tokens, {:?}",
            narrative.len(),
            response.completion_tokens,
            start.elapsed()
        );
        Ok(narrative)
    }
}

/// Build `CompletionOptions` for the synthesis request.
fn build_options(config: &JournalConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.narrative_temperature),
        max_tokens: Some(config.narrative_max_tokens),
        ..Default::default()
    }
}
