//! `fetch-pages` entry point.
//!
//! Renders every pending product page of one fetch scope and records the
//! outcome of each job in the job store.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pagefetch::{
    load_settings, ConsolePrinter, DatabaseSettings, JobStore, PagefetchError, Pipeline,
    PipelineConfig, RunSettings, RunSummary, SeaOrmJobStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "fetch-pages")]
#[command(about = "Render pending product pages of a fetch scope and store their HTML")]
#[command(version)]
struct Cli {
    /// Fetch scope (gap_data_fetch_id) to process
    scope_id: i64,

    /// JSON settings file; flags below override its values
    #[arg(short, long, env = "PAGEFETCH_CONFIG")]
    config: Option<PathBuf>,

    /// Root that relative product folders are resolved against
    #[arg(long, env = "PAGEFETCH_CONTENT_ROOT")]
    content_root: Option<PathBuf>,

    /// Pause between consecutive jobs, in milliseconds
    #[arg(long, env = "PAGEFETCH_PAUSE_MS")]
    pause_ms: Option<u64>,

    /// Wait after network idle before capturing, in milliseconds
    #[arg(long, env = "PAGEFETCH_SETTLE_DELAY_MS")]
    settle_delay_ms: Option<u64>,

    /// Bound on one navigation, in seconds
    #[arg(long, env = "PAGEFETCH_NAVIGATION_TIMEOUT_SECS")]
    navigation_timeout_secs: Option<u64>,

    /// Default browser request timeout, in seconds
    #[arg(long, env = "PAGEFETCH_REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: Option<u64>,

    /// Chromium executable (auto-detected when unset)
    #[arg(long, env = "CHROME_PATH")]
    chrome_path: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    headful: bool,

    /// Log level (overridden by RUST_LOG)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,

    /// Print the run summary as JSON on stdout when done
    #[arg(long)]
    json_summary: bool,
}

impl Cli {
    fn run_settings(&self) -> Result<RunSettings, PagefetchError> {
        let mut settings = match self.config {
            Some(ref path) => load_settings(path)?,
            None => RunSettings::default(),
        };

        if let Some(ref root) = self.content_root {
            settings.content_root = root.clone();
        }
        if let Some(ms) = self.pause_ms {
            settings.pause_ms = ms;
        }
        if let Some(ms) = self.settle_delay_ms {
            settings.browser.settle_delay_ms = ms;
        }
        if let Some(secs) = self.navigation_timeout_secs {
            settings.browser.navigation_timeout_secs = secs;
        }
        if let Some(secs) = self.request_timeout_secs {
            settings.browser.request_timeout_secs = secs;
        }
        if let Some(ref path) = self.chrome_path {
            settings.browser.chrome_executable = Some(path.clone());
        }
        if self.headful {
            settings.browser.headless = false;
        }

        settings.validate()?;
        Ok(settings)
    }
}

fn init_tracing(cli: &Cli) {
    // Priority: RUST_LOG env var > --log-level CLI arg > default "info"
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries the run log; diagnostics go to stderr.
    match cli.log_format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

async fn run(cli: &Cli) -> Result<RunSummary, PagefetchError> {
    let settings = cli.run_settings()?;
    let database = DatabaseSettings::from_env()?;

    let store = SeaOrmJobStore::connect(&database.url).await?;
    process_scope(cli, &settings, Arc::new(store)).await
}

async fn process_scope(
    cli: &Cli,
    settings: &RunSettings,
    store: Arc<dyn JobStore>,
) -> Result<RunSummary, PagefetchError> {
    let config = Arc::new(PipelineConfig::from_settings(settings));
    let pipeline = Pipeline::from_config(config, store);

    let summary = pipeline.run(cli.scope_id, &ConsolePrinter).await?;

    if cli.json_summary {
        match serde_json::to_string(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Failed to serialize run summary: {}", e),
        }
    }
    Ok(summary)
}

/// Usage errors exit 1; `--help` and `--version` exit 0.
fn usage_exit_code(err: &clap::Error) -> ExitCode {
    if err.use_stderr() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// A completed run exits 0 even when jobs failed; setup errors exit 1.
fn run_exit_code(result: &Result<RunSummary, PagefetchError>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return usage_exit_code(&e);
        }
    };

    init_tracing(&cli);
    info!("fetch-pages v{} starting for scope {}", env!("CARGO_PKG_VERSION"), cli.scope_id);

    let result = run(&cli).await;
    if let Err(ref e) = result {
        error!("{}", e);
        eprintln!("Fatal error: {}", e);
    }
    run_exit_code(&result)
}
