//! pathfit CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "pathfit",
    version,
    about = "Career readiness self-assessment scoring"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a response file
    Score {
        /// Path to responses JSON
        #[arg(long)]
        responses: PathBuf,

        /// Catalog TOML (defaults to the built-in catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Save the report as JSON into this directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate catalog TOML files
    Validate {
        /// Path to catalog file or directory
        #[arg(long)]
        catalog: PathBuf,
    },

    /// List the questions of a catalog
    Questions {
        /// Catalog TOML (defaults to the built-in catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Only show one instrument: psychometric, technical, wiscar
        #[arg(long)]
        instrument: Option<String>,
    },

    /// Compare two assessment reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Change threshold in percentage points
        #[arg(long, default_value = "5")]
        threshold: f64,

        /// Exit code 1 if regressions found
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Score a directory of saved sessions
    Batch {
        /// Directory of session JSON files
        #[arg(long)]
        sessions: PathBuf,

        /// Max concurrent sessions (defaults to the configured value)
        #[arg(long)]
        parallelism: Option<usize>,

        /// Catalog TOML (defaults to the built-in catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config, example catalog and example responses
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pathfit=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            responses,
            catalog,
            format,
            output,
            config,
        } => commands::score::execute(responses, catalog, format, output, config),
        Commands::Validate { catalog } => commands::validate::execute(catalog),
        Commands::Questions {
            catalog,
            instrument,
        } => commands::questions::execute(catalog, instrument),
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_regression, format),
        Commands::Batch {
            sessions,
            parallelism,
            catalog,
            config,
        } => commands::batch::execute(sessions, parallelism, catalog, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
