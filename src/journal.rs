//! Journal entry points: upload batch in, narrative out.
//!
//! [`create_journal`] is what the CLI calls. [`create_journal_with`] takes
//! the two external collaborators as trait objects, which is how tests run
//! the whole pipeline without a network.

use crate::aggregate::aggregate;
use crate::classify::Capabilities;
use crate::config::JournalConfig;
use crate::error::TrailError;
use crate::pipeline::{Captioner, VisionCaptioner};
use crate::record::{JournalOutput, JournalStats, UploadedFile};
use crate::synthesize::{LlmNarrator, NarrativeSynthesizer};
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Environment variable holding the OpenAI key.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Build a journal from an upload batch using the configured LLM provider.
///
/// The provider is resolved before any file is looked at, so a missing API
/// key fails fast.
///
/// # Errors
/// - [`TrailError::ProviderNotConfigured`] when no provider can be set up
/// - [`TrailError::SynthesisFailed`] when the final request fails
///
/// Per-file problems never error; they are reported in
/// [`JournalOutput::warnings`] and [`JournalOutput::failures`].
pub async fn create_journal(
    files: Vec<UploadedFile>,
    config: &JournalConfig,
) -> Result<JournalOutput, TrailError> {
    let provider = resolve_provider(config)?;
    let captioner = VisionCaptioner::new(Arc::clone(&provider), config);
    let narrator = LlmNarrator::new(provider, config);
    create_journal_with(files, &captioner, &narrator, &Capabilities::detect(), config).await
}

/// Build a journal with explicit collaborators.
///
/// Synthesis runs exactly once when at least one record was produced, and
/// not at all otherwise (`narrative` is then `None`).
pub async fn create_journal_with(
    files: Vec<UploadedFile>,
    captioner: &dyn Captioner,
    synthesizer: &dyn NarrativeSynthesizer,
    caps: &Capabilities,
    config: &JournalConfig,
) -> Result<JournalOutput, TrailError> {
    let total_start = Instant::now();
    let total_files = files.len();

    // ── Step 1: Extract records ──────────────────────────────────────────
    let extract_start = Instant::now();
    let aggregation = aggregate(files, captioner, caps, config).await;
    let extraction_duration_ms = extract_start.elapsed().as_millis() as u64;

    let mut stats = JournalStats {
        total_files,
        documents: aggregation.documents(),
        photos: aggregation.photos(),
        skipped_files: aggregation.warnings.len(),
        failed_files: aggregation.failures.len(),
        extraction_duration_ms,
        ..Default::default()
    };

    // ── Step 2: Synthesize ───────────────────────────────────────────────
    let narrative = if aggregation.dataset.is_empty() {
        warn!("No file produced a record; skipping journal synthesis");
        None
    } else {
        if let Some(ref cb) = config.progress_callback {
            cb.on_synthesis_start(aggregation.dataset.len());
        }
        let synth_start = Instant::now();
        let text = synthesizer.synthesize(&aggregation.dataset).await?;
        stats.synthesis_duration_ms = synth_start.elapsed().as_millis() as u64;
        Some(text)
    };

    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    info!(
        "Journal complete: {} records from {} files, {}ms total",
        aggregation.dataset.len(),
        total_files,
        stats.total_duration_ms
    );

    Ok(JournalOutput {
        narrative,
        warnings: aggregation.warnings,
        failures: aggregation.failures,
        stats,
    })
}

/// Write `narrative` to `path` atomically (temp file + rename).
pub async fn write_journal(path: impl AsRef<Path>, narrative: &str) -> Result<(), TrailError> {
    let path = path.as_ref();
    let write_err = |source: std::io::Error| TrailError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let mut contents = narrative.to_string();
    if !contents.ends_with('\n') {
        contents.push('\n');
    }

    let tmp_path = path.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, contents).await.map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;
    Ok(())
}

/// Instantiate a named provider with the given model.
fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, TrailError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        TrailError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`) — used as-is.
/// 2. **Named provider** (`config.provider_name`) — built by
///    [`ProviderFactory`], which reads that provider's own API key.
/// 3. **`OPENAI_API_KEY`** present and non-empty — OpenAI.
/// 4. **Auto-detection** (`ProviderFactory::from_env`) — first provider
///    with a key in the environment.
///
/// Call this once at startup: every path checks credentials without making
/// a request.
pub fn resolve_provider(config: &JournalConfig) -> Result<Arc<dyn LLMProvider>, TrailError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    let model = config.model_or_default();

    if let Some(ref name) = config.provider_name {
        return create_provider(name, model);
    }

    if let Ok(key) = std::env::var(OPENAI_API_KEY_VAR) {
        if !key.trim().is_empty() {
            return create_provider("openai", model);
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| TrailError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be detected from the environment.\n\
                Set {OPENAI_API_KEY_VAR} (or put it in a .env file) or pass --provider.\n\
                Error: {e}"
            ),
        })?;

    Ok(llm_provider)
}
