//! storefront-search: fuzzy product search over exported catalogs
//!
//! Runs the same matcher the storefront search box uses against catalog
//! snapshots on disk, for checking relevance and latency.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use storefront_cli::output::{report_error, OutputFormat, Status};
use storefront_core::config::{Config, LogFormat};
use storefront_core::error::exit_codes;
use storefront_telemetry::TelemetryConfig;

mod commands;

use commands::{bench, interactive, search, Context, IndexArgs};

/// Fuzzy product search over exported storefront catalogs
#[derive(Parser)]
#[command(name = "storefront-search")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Configuration file (defaults to storefront-search.toml lookup)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a catalog snapshot
    Search {
        /// Query as typed into the search box
        query: String,

        #[command(flatten)]
        index: IndexArgs,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,

        /// Shorthand for --format json
        #[arg(long)]
        json: bool,
    },

    /// Measure per-keystroke search latency
    Bench {
        #[command(flatten)]
        index: IndexArgs,

        /// Queries to time (every prefix of each is replayed, like typing)
        #[arg(short, long = "query", required = true)]
        queries: Vec<String>,

        /// Repetitions per query prefix
        #[arg(short = 'n', long, default_value = "20")]
        iterations: usize,
    },

    /// Read queries from stdin, one per line; `:N` selects a result
    Interactive {
        #[command(flatten)]
        index: IndexArgs,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print the effective configuration
    Config,
}

fn telemetry_config(cli: &Cli, config: &Config) -> TelemetryConfig {
    let logging = &config.schema.logging;
    TelemetryConfig {
        log_level: if cli.verbose {
            "storefront_search=debug,storefront_core=debug".to_string()
        } else {
            logging.level.clone()
        },
        json: logging.format == LogFormat::Json,
        ..TelemetryConfig::default()
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            report_error(&e, cli.format);
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    if let Err(e) = storefront_telemetry::init_with_config(telemetry_config(&cli, &config)) {
        Status::warning(&format!("Logging disabled: {e}"));
    }

    let format = match cli.command {
        Commands::Search { json: true, .. } => OutputFormat::Json,
        _ => cli.format,
    };
    let ctx = Context { config, format };

    let result = match cli.command {
        Commands::Search {
            query,
            index,
            limit,
            ..
        } => search::run(&ctx, &query, &index, limit),
        Commands::Bench {
            index,
            queries,
            iterations,
        } => bench::run(&ctx, &index, &queries, iterations),
        Commands::Interactive { index, limit } => interactive::run(&ctx, &index, limit),
        Commands::Config => commands::config::run(&ctx),
    };

    match result {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => match e.downcast_ref::<storefront_core::Error>() {
            Some(err) => {
                report_error(err, format);
                ExitCode::from(err.exit_code() as u8)
            }
            None => {
                Status::error(&format!("{e:#}"));
                ExitCode::from(exit_codes::FAILURE as u8)
            }
        },
    }
}
