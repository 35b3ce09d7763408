//! Configuration for a journal run.
//!
//! Every knob lives in [`JournalConfig`], built once at process start via
//! [`JournalConfigBuilder`] and passed by reference into the captioner,
//! the synthesizer and the aggregator. Extraction code never reads the
//! environment.

use crate::error::TrailError;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Model used for both captioning and synthesis when none is given.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for turning an upload batch into a journal.
///
/// # Example
/// ```rust
/// use trailteller::JournalConfig;
///
/// let config = JournalConfig::builder()
///     .model("gpt-4o")
///     .narrative_temperature(0.9)
///     .build()
///     .unwrap();
/// assert_eq!(config.caption_temperature, 0.4);
/// ```
#[derive(Clone)]
pub struct JournalConfig {
    /// LLM model identifier. If None, uses [`DEFAULT_MODEL`].
    pub model: Option<String>,

    /// LLM provider name (e.g. "openai", "anthropic", "ollama").
    /// If None along with `provider`, the provider is detected from the
    /// environment at startup.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature for photo captions. Default: 0.4.
    ///
    /// Kept low so captions describe what is in the frame.
    pub caption_temperature: f32,

    /// Sampling temperature for the journal narrative. Default: 0.8.
    pub narrative_temperature: f32,

    /// Maximum tokens for one caption. Default: 120.
    pub caption_max_tokens: usize,

    /// Maximum tokens for the narrative. Default: 2048.
    pub narrative_max_tokens: usize,

    /// Custom caption instruction. If None, uses the built-in one.
    pub caption_prompt: Option<String>,

    /// Custom narrative instruction. If None, uses the built-in one.
    /// The serialized records are always appended after it.
    pub narrative_prompt: Option<String>,

    /// Files processed at once. Default: 1 (strictly one after another).
    ///
    /// Values above 1 overlap caption requests for different photos; the
    /// record order is unaffected.
    pub concurrency: usize,

    /// Per-caption-call timeout in seconds. Default: None (transport default).
    pub api_timeout_secs: Option<u64>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Per-file progress events. Default: None.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            provider: None,
            caption_temperature: 0.4,
            narrative_temperature: 0.8,
            caption_max_tokens: 120,
            narrative_max_tokens: 2048,
            caption_prompt: None,
            narrative_prompt: None,
            concurrency: 1,
            api_timeout_secs: None,
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for JournalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JournalConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("caption_temperature", &self.caption_temperature)
            .field("narrative_temperature", &self.narrative_temperature)
            .field("caption_max_tokens", &self.caption_max_tokens)
            .field("narrative_max_tokens", &self.narrative_max_tokens)
            .field("concurrency", &self.concurrency)
            .field("caption_prompt", &self.caption_prompt)
            .field("narrative_prompt", &self.narrative_prompt)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn JournalProgressCallback>"),
            )
            .finish()
    }
}

impl JournalConfig {
    /// Create a new builder for `JournalConfig`.
    pub fn builder() -> JournalConfigBuilder {
        JournalConfigBuilder {
            config: Self::default(),
        }
    }

    /// The model to request, falling back to [`DEFAULT_MODEL`].
    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

/// Builder for [`JournalConfig`].
pub struct JournalConfigBuilder {
    config: JournalConfig,
}

impl fmt::Debug for JournalConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JournalConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl JournalConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn caption_temperature(mut self, t: f32) -> Self {
        self.config.caption_temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn narrative_temperature(mut self, t: f32) -> Self {
        self.config.narrative_temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn caption_max_tokens(mut self, n: usize) -> Self {
        self.config.caption_max_tokens = n;
        self
    }

    pub fn narrative_max_tokens(mut self, n: usize) -> Self {
        self.config.narrative_max_tokens = n;
        self
    }

    pub fn caption_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.caption_prompt = Some(prompt.into());
        self
    }

    pub fn narrative_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.narrative_prompt = Some(prompt.into());
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = Some(secs);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<JournalConfig, TrailError> {
        let c = &self.config;
        if c.caption_max_tokens == 0 || c.narrative_max_tokens == 0 {
            return Err(TrailError::InvalidConfig(
                "max tokens must be ≥ 1".into(),
            ));
        }
        if c.api_timeout_secs == Some(0) {
            return Err(TrailError::InvalidConfig(
                "API timeout must be ≥ 1 second".into(),
            ));
        }
        if matches!(c.model.as_deref(), Some(m) if m.trim().is_empty()) {
            return Err(TrailError::InvalidConfig("model must not be empty".into()));
        }
        Ok(self.config)
    }
}
