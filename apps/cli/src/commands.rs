//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use articlecast_core::{Pipeline, ProgressReporter, RunReport, Stage};
use articlecast_publish::DryRunPublisher;
use articlecast_shared::{
    AppConfig, RuntimeConfig, Secrets, config_file_path, init_config, load_config,
    load_config_from,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Articlecast: summarize Wikipedia and Medium articles into a Telegram channel.
#[derive(Parser)]
#[command(
    name = "articlecast",
    version,
    about = "Find Wikipedia and Medium articles for a query, summarize them, and post to Telegram.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ~/.articlecast/articlecast.toml).
    #[arg(long, global = true, env = "ARTICLECAST_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Result output format for `run`.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the pipeline for one query and publish the result.
    Run {
        /// Free-text query, e.g. "machine learning".
        query: String,

        /// Summarize but do not send anything to Telegram.
        #[arg(long)]
        dry_run: bool,

        /// Output format for the result.
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
    /// Validate configuration and required environment variables.
    Check,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so stdout stays
/// clean for results.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "articlecast=info",
        1 => "articlecast=debug",
        _ => "articlecast=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Run {
            query,
            dry_run,
            output,
        } => cmd_run(config_path, &query, dry_run, &output).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
            ConfigAction::Check => cmd_config_check(config_path),
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

async fn cmd_run(
    config_path: Option<&Path>,
    query: &str,
    dry_run: bool,
    output: &OutputFormat,
) -> Result<()> {
    if query.trim().is_empty() {
        return Err(eyre!("query must not be empty"));
    }

    // Secrets are checked up front, before any network call.
    let runtime = RuntimeConfig::from_env(resolve_config(config_path)?)
        .wrap_err("configuration is incomplete (see `articlecast config check`)")?;

    let mut pipeline = Pipeline::from_config(&runtime)?;
    if dry_run {
        pipeline = pipeline.with_publisher(Arc::new(DryRunPublisher));
    }

    info!(query, dry_run, model = %runtime.app.model.model, "running pipeline");

    let reporter = CliProgress::new();
    let result = pipeline.run(query, &reporter).await;
    reporter.spinner.finish_and_clear();
    let report = result?;

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report(&report, dry_run),
    }

    Ok(())
}

fn print_report(report: &RunReport, dry_run: bool) {
    let state = &report.state;

    println!();
    println!("  Query:     {}", state.query);
    println!("  Keywords:  {}", state.keywords);
    println!("  Wikipedia:");
    for url in &state.wikipedia_urls {
        println!("    - {url}");
    }
    println!("  Medium:");
    for url in &state.medium_urls {
        println!("    - {url}");
    }
    println!("  Documents: {}", state.documents.len());
    let published = match (dry_run, report.published) {
        (true, _) => "skipped (dry run)",
        (false, true) => "yes",
        (false, false) => "FAILED (see log)",
    };
    println!("  Published: {published}");
    println!("  Time:      {:.1}s", report.elapsed.as_secs_f64());
    println!();
    println!("{}", state.summary.as_deref().unwrap_or_default());
    println!();
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn stage(&self, stage: Stage) {
        self.spinner.set_message(stage.to_string());
    }

    fn urls_found(&self, wikipedia: usize, medium: usize) {
        self.spinner
            .println(format!("  found {wikipedia} Wikipedia and {medium} Medium articles"));
    }

    fn documents_loaded(&self, count: usize) {
        self.spinner.println(format!("  loaded {count} documents"));
    }

    fn done(&self, _report: &RunReport) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

fn cmd_config_check(config_path: Option<&Path>) -> Result<()> {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => config_file_path()?,
    };
    let source = if path.exists() {
        path.display().to_string()
    } else {
        "built-in defaults".to_string()
    };
    println!("  Config:  {source}");

    let config = resolve_config(config_path)?;
    config.validate()?;
    println!("  Values:  ok");

    Secrets::from_env(&config)?;
    println!("  Secrets: ok");
    println!("  Model:   {} at {}", config.model.model, config.model.base_url);
    Ok(())
}
