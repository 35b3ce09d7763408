//! CLI binary for trailteller.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `JournalConfig`, loads the uploads, and prints the journal.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use trailteller::pipeline::input::load_uploads;
use trailteller::{
    create_journal_with, resolve_provider, write_journal, Capabilities, JournalConfig,
    JournalProgressCallback, LlmNarrator, ProgressCallback, VisionCaptioner,
};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a bar across the batch plus one log line
/// per file.
struct CliProgressCallback {
    bar: ProgressBar,
    skipped: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS),
        );
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self {
            bar,
            skipped: AtomicUsize::new(0),
        })
    }

    fn truncate(msg: &str) -> String {
        if msg.chars().count() > 80 {
            format!("{}\u{2026}", msg.chars().take(79).collect::<String>())
        } else {
            msg.to_string()
        }
    }
}

impl JournalProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} files  ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);
        self.bar.set_length(total_files as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Reading");
    }

    fn on_file_start(&self, _index: usize, _total: usize, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn on_file_complete(&self, index: usize, total: usize, name: &str, kind: &str) {
        self.bar.println(format!(
            "  {} {:>3}/{:<3} {}  {}",
            green("✓"),
            index,
            total,
            name,
            dim(kind)
        ));
        self.bar.inc(1);
    }

    fn on_file_skipped(&self, index: usize, total: usize, _name: &str, reason: &str) {
        self.skipped.fetch_add(1, Ordering::SeqCst);
        self.bar.println(format!(
            "  {} {:>3}/{:<3} {}",
            yellow("⚠"),
            index,
            total,
            yellow(&Self::truncate(reason))
        ));
        self.bar.inc(1);
    }

    fn on_synthesis_start(&self, record_count: usize) {
        self.bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS),
        );
        self.bar.set_prefix("Writing");
        self.bar
            .set_message(format!("crafting your travel journal from {record_count} records…"));
    }

    fn on_batch_complete(&self, total_files: usize, record_count: usize) {
        let skipped = self.skipped.load(Ordering::SeqCst);
        self.bar.println(format!(
            "{} {}/{} files used{}",
            if record_count == 0 { red("✘") } else { green("◆") },
            bold(&record_count.to_string()),
            total_files,
            if skipped > 0 {
                format!("  ({skipped} skipped)")
            } else {
                String::new()
            }
        ));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Journal from a diary and some photos (stdout)
  trailteller day1.docx lake.jpg IMG_4242.HEIC

  # Write to a file
  trailteller trip/*.docx trip/*.jpg -o journal.md

  # Use a specific model or provider
  trailteller --model gpt-4o notes.docx beach.png
  trailteller --provider anthropic --model claude-sonnet-4-20250514 notes.docx

  # Photos from the web
  trailteller https://example.com/photos/summit.jpg

SUPPORTED FILES:
  .docx             paragraph text
  .jpg .jpeg .png   GPS tags + one-sentence caption
  .heic             as above, when built with --features heic
  Anything else is skipped with a warning.

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key (also read from ./.env)
  ANTHROPIC_API_KEY       Anthropic API key (with --provider anthropic)
  GEMINI_API_KEY          Google Gemini API key (with --provider gemini)
  TRAILTELLER_MODEL       Override model ID
  TRAILTELLER_PROVIDER    Override provider
"#;

/// Turn travel documents and photos into a narrative travel journal.
#[derive(Parser, Debug)]
#[command(
    name = "trailteller",
    version,
    about = "Turn travel documents and photos into a narrative travel journal",
    long_about = "Reads Word documents and photos (JPEG, PNG, HEIC), captions each photo with a \
Vision Language Model, collects any GPS tags, and asks an LLM to write one chronological travel \
journal from everything it found.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Files to include, as local paths or HTTP/HTTPS URLs, in trip order.
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Write the journal to this file instead of stdout.
    #[arg(short, long, env = "TRAILTELLER_OUTPUT")]
    output: Option<PathBuf>,

    /// LLM model ID (default: gpt-4o-mini).
    #[arg(long, env = "TRAILTELLER_MODEL")]
    model: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(long, env = "TRAILTELLER_PROVIDER")]
    provider: Option<String>,

    /// Files processed at once. Record order is unaffected.
    #[arg(short, long, env = "TRAILTELLER_CONCURRENCY", default_value_t = 1)]
    concurrency: usize,

    /// Caption temperature (0.0–2.0).
    #[arg(long, env = "TRAILTELLER_CAPTION_TEMPERATURE", default_value_t = 0.4)]
    caption_temperature: f32,

    /// Journal temperature (0.0–2.0).
    #[arg(long, env = "TRAILTELLER_NARRATIVE_TEMPERATURE", default_value_t = 0.8)]
    narrative_temperature: f32,

    /// Max LLM output tokens for the journal.
    #[arg(long, env = "TRAILTELLER_MAX_TOKENS", default_value_t = 2048)]
    max_tokens: usize,

    /// Path to a text file replacing the built-in journal instruction.
    #[arg(long, env = "TRAILTELLER_STYLE_PROMPT")]
    style_prompt: Option<PathBuf>,

    /// Per-caption LLM call timeout in seconds.
    #[arg(long, env = "TRAILTELLER_API_TIMEOUT")]
    api_timeout: Option<u64>,

    /// HTTP download timeout in seconds for URL inputs.
    #[arg(long, env = "TRAILTELLER_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Disable progress bar.
    #[arg(long, env = "TRAILTELLER_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "TRAILTELLER_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the journal.
    #[arg(short, long, env = "TRAILTELLER_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal; the key may come from the shell.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Startup checks ───────────────────────────────────────────────────
    let caps = Capabilities::detect();
    if !cli.quiet {
        for notice in caps.missing() {
            eprintln!("{} {}", yellow("⚠"), notice);
        }
    }

    let cli_progress = show_progress.then(CliProgressCallback::new);
    let progress_cb: Option<ProgressCallback> = cli_progress
        .as_ref()
        .map(|cb| Arc::clone(cb) as Arc<dyn JournalProgressCallback>);
    let config = build_config(&cli, progress_cb).await?;

    // Fails here, before any upload is read, when no API key is set.
    let provider = resolve_provider(&config).context("No LLM provider available")?;
    let captioner = VisionCaptioner::new(Arc::clone(&provider), &config);
    let narrator = LlmNarrator::new(provider, &config);

    // ── Load uploads ─────────────────────────────────────────────────────
    let files = load_uploads(&cli.inputs, config.download_timeout_secs)
        .await
        .context("Failed to read uploads")?;

    // ── Run pipeline ─────────────────────────────────────────────────────
    let result = create_journal_with(files, &captioner, &narrator, &caps, &config).await;
    if let Some(ref cb) = cli_progress {
        cb.bar.finish_and_clear();
    }
    let output = result.context("Journal generation failed")?;

    if !cli.quiet && !show_progress {
        for warning in &output.warnings {
            eprintln!("{} {}", yellow("⚠"), warning);
        }
        for failure in &output.failures {
            eprintln!("{} {}", red("✗"), failure);
        }
    }

    let Some(narrative) = output.narrative else {
        anyhow::bail!(
            "None of the {} files could be used; nothing to write. Supported: {}",
            output.stats.total_files,
            caps.accepted_extensions().join(", ")
        );
    };

    if let Some(ref path) = cli.output {
        write_journal(path, &narrative)
            .await
            .context("Failed to write journal")?;
        if !cli.quiet {
            eprintln!(
                "{}  Travel journal created  {}ms  →  {}",
                green("✨"),
                output.stats.total_duration_ms,
                bold(&path.display().to_string()),
            );
        }
    } else {
        if !cli.quiet {
            eprintln!("{}  Travel journal created", green("✨"));
        }
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(narrative.as_bytes())
            .context("Failed to write to stdout")?;
        if !narrative.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    Ok(())
}

/// Map CLI args to `JournalConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<JournalConfig> {
    let mut builder = JournalConfig::builder()
        .concurrency(cli.concurrency)
        .caption_temperature(cli.caption_temperature)
        .narrative_temperature(cli.narrative_temperature)
        .narrative_max_tokens(cli.max_tokens)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    if let Some(secs) = cli.api_timeout {
        builder = builder.api_timeout_secs(secs);
    }
    if let Some(ref path) = cli.style_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read style prompt from {:?}", path))?;
        builder = builder.narrative_prompt(prompt);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
