//! tscat command line
//!
//! Inspect, validate, and query Qt Linguist translation catalogs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tscat::cli::{self, LookupRequest};
use tscat::config::Config;
use tscat::services::validate::Severity;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the `.ts` catalogs.
    #[arg(long, global = true)]
    translations_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate catalogs and report data-quality issues.
    Check {
        /// Catalog files to check.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Lowest severity to print.
        #[arg(long, value_enum, default_value = "warning")]
        level: Level,
    },

    /// Show translation coverage per context.
    Stats { file: PathBuf },

    /// Resolve a message the way the UI would.
    Lookup {
        /// Context (class) name.
        context: String,

        /// Source text.
        source: String,

        /// Catalog code, e.g. main_fr (default: TSCAT_DEFAULT_LANGUAGE).
        #[arg(long, short)]
        language: Option<String>,

        /// Disambiguation comment.
        #[arg(long)]
        comment: Option<String>,

        /// Count for plural selection and `%n`.
        #[arg(long, short = 'n', allow_hyphen_values = true)]
        count: Option<i64>,

        /// Values substituted for `%1`, `%2`, ...
        #[arg(long = "arg", short = 'a')]
        args: Vec<String>,
    },

    /// Rewrite a catalog in canonical lupdate layout.
    Normalize {
        file: PathBuf,

        /// Fail instead of rewriting when the file is not canonical.
        #[arg(long)]
        check: bool,
    },

    /// Print a catalog as JSON.
    Export { file: PathBuf },

    /// List languages from the manifest.
    Languages,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Level {
    Info,
    Warning,
    Error,
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::Info => Severity::Info,
            Level::Warning => Severity::Warning,
            Level::Error => Severity::Error,
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("failed to load configuration")?;
    if let Some(dir) = cli.translations_dir {
        config.translations_dir = dir;
    }
    debug!(dir = %config.translations_dir.display(), "configuration loaded");

    let mut out = std::io::stdout().lock();
    match cli.command {
        Command::Check { files, level } => cli::cmd_check(&mut out, &files, level.into()),
        Command::Stats { file } => cli::cmd_stats(&mut out, &file),
        Command::Lookup {
            context,
            source,
            language,
            comment,
            count,
            args,
        } => cli::cmd_lookup(
            &mut out,
            &config,
            &LookupRequest {
                language,
                context,
                source,
                comment,
                count,
                args,
            },
        ),
        Command::Normalize { file, check } => cli::cmd_normalize(&mut out, &file, check),
        Command::Export { file } => cli::cmd_export(&mut out, &file),
        Command::Languages => cli::cmd_languages(&mut out, &config),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
