//! Photo captioning: one vision request per photo, one sentence back.
//!
//! The contract is non-throwing. Whatever goes wrong on the wire, the
//! caller gets a caption string; failures show up as
//! `[Image captioning failed: <reason>]` so the journal writer and the user
//! can both see which photo went undescribed.

use crate::config::JournalConfig;
use crate::pipeline::encode::encode_photo;
use crate::prompts::{caption_failure, DEFAULT_CAPTION_PROMPT};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

/// Describes a photo in one sentence.
#[async_trait]
pub trait Captioner: Send + Sync {
    /// Never fails; errors are folded into the returned caption.
    async fn caption(&self, bytes: &[u8]) -> String;
}

/// [`Captioner`] backed by a vision-capable [`LLMProvider`].
pub struct VisionCaptioner {
    provider: Arc<dyn LLMProvider>,
    prompt: String,
    options: CompletionOptions,
    api_timeout: Option<Duration>,
}

impl VisionCaptioner {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &JournalConfig) -> Self {
        Self {
            provider,
            prompt: config
                .caption_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_CAPTION_PROMPT.to_string()),
            options: build_options(config),
            api_timeout: config.api_timeout_secs.map(Duration::from_secs),
        }
    }

    async fn request(&self, bytes: &[u8]) -> Result<String, String> {
        let messages = vec![ChatMessage::user_with_images(
            &self.prompt,
            vec![encode_photo(bytes)],
        )];
        let call = self.provider.chat(&messages, Some(&self.options));

        let response = match self.api_timeout {
            Some(limit) => timeout(limit, call)
                .await
                .map_err(|_| format!("timed out after {}s", limit.as_secs()))?,
            None => call.await,
        }
        .map_err(|e| e.to_string())?;

        debug!(
            "Caption: {} input tokens, {} output tokens",
            response.prompt_tokens, response.completion_tokens
        );
        let caption = response.content.trim().to_string();
        if caption.is_empty() {
            return Err("model returned an empty caption".into());
        }
        Ok(caption)
    }
}

#[async_trait]
impl Captioner for VisionCaptioner {
    async fn caption(&self, bytes: &[u8]) -> String {
        let start = Instant::now();
        match self.request(bytes).await {
            Ok(caption) => {
                debug!("Captioned photo in {:?}", start.elapsed());
                caption
            }
            Err(reason) => {
                warn!("Image captioning failed: {}", reason);
                caption_failure(&reason)
            }
        }
    }
}

/// Build `CompletionOptions` for caption requests.
fn build_options(config: &JournalConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.caption_temperature),
        max_tokens: Some(config.caption_max_tokens),
        ..Default::default()
    }
}
