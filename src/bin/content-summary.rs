//! CLI binary for content-summary.
//!
//! A thin shim over the library crate: maps flags and environment variables
//! to `SummaryConfig`, then either serves the HTTP API or runs one input.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use content_summary::config::DEFAULT_MAX_INPUT_CHARS;
use content_summary::pipeline::input::resolve_input;
use content_summary::{
    extract, server, ChromiumLoader, ErrorPolicy, Pipeline, PipelineProgressCallback,
    PipelineState, ProgressCallback, Status, Step, SummaryConfig,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner showing the current step, with one log line per finished step.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Starting");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl PipelineProgressCallback for CliProgressCallback {
    fn on_pipeline_start(&self, input: &str) {
        self.bar.set_message(input.to_string());
    }

    fn on_step_start(&self, step: Step) {
        self.bar.set_prefix(match step {
            Step::Fetch => "Fetching",
            Step::Summarize => "Summarizing",
        });
    }

    fn on_step_complete(&self, step: Step, status: Status) {
        let mark = if status == Status::Success {
            green("✓")
        } else {
            red("✗")
        };
        self.bar.println(format!("  {mark} {step}"));
    }

    fn on_pipeline_complete(&self, _status: Status, _message: &str) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve the JSON API and web UI on port 8000
  content-summary serve

  # Summarise a page (bare domains get https://)
  content-summary summarize example.com

  # Summarise a local PDF or a PDF URL
  content-summary summarize paper.pdf
  content-summary summarize https://arxiv.org/pdf/1706.03762v7.pdf

  # Print the extracted text only (no API key needed)
  content-summary extract https://example.com

  # Full pipeline state as JSON
  content-summary summarize --json example.com

ENVIRONMENT VARIABLES:
  ANTHROPIC_API_KEY        API key for provider 'anthropic' (default)
  OPENAI_API_KEY           API key for provider 'openai'
  GEMINI_API_KEY           API key for provider 'gemini'
  LANGSMITH_PROJECT        Trace project name recorded on pipeline spans
  CHROME_PATH              Chrome/Chromium executable
  RUST_LOG                 Log filter, overrides --verbose/--quiet

  A .env file in the working directory is loaded first if present.
"#;

/// Summarise web pages and PDF documents with an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "content-summary",
    version,
    about = "Summarise web pages and PDF documents with an LLM",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// LLM provider: anthropic, openai, gemini, ollama.
    #[arg(long, global = true, env = "SUMMARY_LLM_PROVIDER", default_value = "anthropic")]
    provider: String,

    /// LLM model ID. Defaults to a per-provider model.
    #[arg(long, global = true, env = "SUMMARY_MODEL")]
    model: Option<String>,

    /// Max tokens the model may generate.
    #[arg(long, global = true, env = "SUMMARY_MAX_TOKENS", default_value_t = 1000)]
    max_tokens: usize,

    /// Sampling temperature (0.0–1.0).
    #[arg(long, global = true, env = "SUMMARY_TEMPERATURE", default_value_t = 0.2)]
    temperature: f32,

    /// Characters of extracted text sent to the model.
    #[arg(long, global = true, env = "SUMMARY_MAX_INPUT_CHARS", default_value_t = DEFAULT_MAX_INPUT_CHARS)]
    max_input_chars: usize,

    /// Text file replacing the instruction paragraph of the prompt.
    #[arg(long, global = true, env = "SUMMARY_INSTRUCTIONS_FILE")]
    instructions_file: Option<PathBuf>,

    /// Show the browser window instead of running headless.
    #[arg(long, global = true, env = "SUMMARY_HEADED")]
    headed: bool,

    /// Chrome/Chromium executable.
    #[arg(long, global = true, env = "CHROME_PATH")]
    chrome: Option<PathBuf>,

    /// Page-load timeout in seconds.
    #[arg(long, global = true, env = "SUMMARY_PAGE_TIMEOUT", default_value_t = 30)]
    page_timeout: u64,

    /// Wait after the load event before reading the page, in milliseconds.
    #[arg(long, global = true, env = "SUMMARY_SETTLE_MS", default_value_t = 500)]
    settle_ms: u64,

    /// HTTP download timeout for PDF URLs in seconds.
    #[arg(long, global = true, env = "SUMMARY_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Run the summarizer even after a failed fetch.
    #[arg(long, global = true, env = "SUMMARY_CONTINUE_ON_ERROR")]
    continue_on_error: bool,

    /// Trace project recorded on every pipeline span.
    #[arg(long, global = true, env = "LANGSMITH_PROJECT")]
    trace_project: Option<String>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "SUMMARY_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "SUMMARY_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API and web UI.
    Serve {
        /// Address to listen on.
        #[arg(long, env = "SUMMARY_BIND", default_value = "0.0.0.0:8000")]
        bind: SocketAddr,
    },
    /// Fetch an input and print its summary.
    Summarize {
        /// URL, bare domain, or local PDF path.
        input: String,

        /// Print the full pipeline state as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Fetch an input and print the extracted text.
    Extract {
        /// URL, bare domain, or local PDF path.
        input: String,

        /// Print the full pipeline state as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing, so `env = ...` flags see values from .env.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // One-shot commands show a spinner; library INFO logs would fight it.
    let one_shot_json = match cli.command {
        Command::Serve { .. } => None,
        Command::Summarize { json, .. } | Command::Extract { json, .. } => Some(json),
    };
    let show_progress = !cli.quiet && one_shot_json == Some(false);
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress || one_shot_json == Some(true) {
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

    let progress: Option<ProgressCallback> = if show_progress && !cli.verbose {
        Some(CliProgressCallback::new() as Arc<dyn PipelineProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress).await?;

    match &cli.command {
        Command::Serve { bind } => {
            let pipeline = Pipeline::from_config(config).context("Failed to start")?;
            server::serve(Arc::new(pipeline), *bind)
                .await
                .with_context(|| format!("Server on {bind} failed"))?;
        }
        Command::Summarize { input, json } => {
            let source = resolve_input(input).context("Invalid input")?;
            let pipeline = Pipeline::from_config(config).context("Failed to start")?;
            let state = pipeline.run(&source).await;
            print_result(&state, *json, &state.summary)?;
        }
        Command::Extract { input, json } => {
            let source = resolve_input(input).context("Invalid input")?;
            let loader = ChromiumLoader::from_config(&config);
            let state = extract(&loader, &source, &config).await;
            print_result(&state, *json, &state.text_content)?;
        }
    }

    Ok(())
}

/// Print `body` on success (or the whole state with `--json`); fail with the
/// state's message otherwise.
fn print_result(state: &PipelineState, json: bool, body: &str) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(state).context("Failed to serialise state")?;
        println!("{out}");
    } else if state.is_success() {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(body.as_bytes())
            .context("Failed to write to stdout")?;
        if !body.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    if state.is_error() {
        anyhow::bail!("{}", state.message);
    }
    eprintln!("{}", dim(&format!("{} ({})", state.message, state.input)));
    Ok(())
}

/// Map CLI args to `SummaryConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<SummaryConfig> {
    let mut builder = SummaryConfig::builder()
        .provider_name(&cli.provider)
        .max_tokens(cli.max_tokens)
        .temperature(cli.temperature)
        .max_input_chars(cli.max_input_chars)
        .headless(!cli.headed)
        .page_load_timeout_secs(cli.page_timeout)
        .settle_ms(cli.settle_ms)
        .download_timeout_secs(cli.download_timeout)
        .error_policy(if cli.continue_on_error {
            ErrorPolicy::Continue
        } else {
            ErrorPolicy::Halt
        });

    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(ref path) = cli.instructions_file {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read instructions from {:?}", path))?;
        builder = builder.instructions(text);
    }
    if let Some(ref chrome) = cli.chrome {
        builder = builder.chrome_executable(chrome);
    }
    if let Some(ref project) = cli.trace_project {
        builder = builder.trace_project(project);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
