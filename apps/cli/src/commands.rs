//! CLI command definitions, routing, and tracing setup.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use kbdocs_core::{BuildSummary, ProgressReporter, TargetReport, TargetStatus, build_corpus, plan};
use kbdocs_shared::{
    AppConfig, BuildConfig, FailurePolicy, Language, init_config, load_config, load_config_from,
    resolve_root,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// kbdocs: normalize raw language documentation into a retrieval corpus.
#[derive(Parser)]
#[command(
    name = "kbdocs",
    version,
    about = "Build commit-ready KB docs from raw downloads.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.kbdocs/kbdocs.toml.
    #[arg(long, global = true)]
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

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Rebuild the docs directories of the selected languages.
    Build {
        /// Corpus root holding `languages/` (defaults to the current directory).
        #[arg(long, env = "KBDOCS_ROOT")]
        root: Option<PathBuf>,

        /// Split the C++ PDF text into N pages per file.
        #[arg(long)]
        cpp_pages_per_file: Option<NonZeroUsize>,

        /// Languages to build (repeatable or comma-separated). Defaults to all.
        #[arg(long = "lang", value_delimiter = ',')]
        languages: Vec<Language>,

        /// Build the remaining languages after one fails.
        #[arg(long)]
        keep_going: bool,

        /// Print the build summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show each language's raw input and output paths and whether the
    /// raw input is present.
    Plan {
        /// Corpus root holding `languages/` (defaults to the current directory).
        #[arg(long, env = "KBDOCS_ROOT")]
        root: Option<PathBuf>,
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
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so summaries on
/// stdout stay machine-readable.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "kbdocs=info",
        1 => "kbdocs=debug",
        _ => "kbdocs=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
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
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Build {
            root,
            cpp_pages_per_file,
            languages,
            keep_going,
            json,
        } => {
            let app = load_app_config(config_path)?;
            let mut config = BuildConfig::from_app(&app, resolve_root(root.as_deref(), &app)?);
            if let Some(n) = cpp_pages_per_file {
                config.pages_per_file = n;
            }
            if !languages.is_empty() {
                config.languages = languages;
            }
            if keep_going {
                config.failure_policy = FailurePolicy::KeepGoing;
            }
            cmd_build(&config, json)
        }
        Command::Plan { root } => {
            let app = load_app_config(config_path)?;
            cmd_plan(&resolve_root(root.as_deref(), &app)?)
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

fn load_app_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_build(config: &BuildConfig, json: bool) -> Result<()> {
    info!(
        root = %config.root.display(),
        pages_per_file = config.pages_per_file.get(),
        policy = ?config.failure_policy,
        "building corpus"
    );

    let reporter = CliProgress::new();
    let summary = build_corpus(config, &reporter).inspect_err(|_| reporter.clear())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    let failed = summary.failed();
    if !failed.is_empty() {
        let names: Vec<&str> = failed.iter().map(|l| l.as_str()).collect();
        return Err(eyre!(
            "{} of {} targets failed: {}",
            failed.len(),
            summary.targets.len(),
            names.join(", ")
        ));
    }

    Ok(())
}

fn print_summary(summary: &BuildSummary) {
    println!();
    println!("  Corpus root: {}", summary.root.display());
    for target in &summary.targets {
        match &target.status {
            TargetStatus::Built { report } => {
                println!("  {:<11} {report}", target.language);
            }
            TargetStatus::Failed { error } => {
                println!("  {:<11} FAILED: {error}", target.language);
            }
        }
    }
    println!("  Time:        {:.1}s", summary.elapsed.as_secs_f64());
    println!();
}

fn cmd_plan(root: &Path) -> Result<()> {
    info!(root = %root.display(), "planning corpus build");

    println!("  Corpus root: {}", root.display());
    for planned in plan(root) {
        let marker = if planned.present { "present" } else { "missing" };
        println!(
            "  {:<11} {marker:<8} {} -> {}",
            planned.language,
            planned.raw.display(),
            planned.output.display()
        );
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = load_app_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
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
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn clear(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn target_started(&self, language: Language, action: &str) {
        self.spinner.set_message(format!("{language}: {action}"));
    }

    fn batch_written(&self, language: Language, path: &Path, current: usize, total: usize) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.spinner
            .set_message(format!("{language}: [{current}/{total}] {name}"));
    }

    fn target_finished(&self, report: &TargetReport) {
        self.spinner.set_message(format!("{}: finished", report.language));
    }

    fn done(&self, _summary: &BuildSummary) {
        self.clear();
    }
}
