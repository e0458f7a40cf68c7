//! CLI command implementations

pub mod bench;
pub mod config;
pub mod interactive;
pub mod search;

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use storefront_cli::OutputFormat;
use storefront_core::catalog::load_pages;
use storefront_core::config::Config;
use storefront_core::{Error, ResultExt};
use storefront_search::{Field, FieldSpec, Index, MatcherOptions};
use storefront_telemetry::{metrics, names, timed_span};

/// State shared by every command
pub struct Context {
    pub config: Config,
    pub format: OutputFormat,
}

/// Where the catalog comes from and how to match against it
#[derive(Args, Debug, Clone)]
pub struct IndexArgs {
    /// Catalog JSON export; repeat for paged exports (default: [catalog] paths)
    #[arg(long = "catalog", value_name = "FILE")]
    pub catalogs: Vec<PathBuf>,

    /// Similarity cutoff, 0.0 (exact) to 1.0 (anything)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Fields to search, comma separated (name, category, description)
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,
}

impl Context {
    /// Matcher options from the config file with command-line overrides applied
    pub fn options(&self, args: &IndexArgs) -> Result<MatcherOptions> {
        let mut options = self.config.schema.search.to_options()?;

        if let Some(threshold) = args.threshold {
            options.threshold = threshold;
        }
        if !args.fields.is_empty() {
            let fields = args
                .fields
                .iter()
                .map(|name| name.parse::<Field>().map(FieldSpec::new))
                .collect::<storefront_search::Result<Vec<_>>>()
                .map_err(Error::from)?;
            options.fields = fields;
        }

        options
            .validate()
            .map_err(Error::from)
            .context("While applying command-line options")?;
        Ok(options)
    }

    /// Result limit from the flag or the config file
    pub fn limit(&self, flag: Option<usize>) -> usize {
        flag.unwrap_or(self.config.schema.search.limit)
    }

    /// Load the catalog pages and index them
    pub fn build_index(&self, args: &IndexArgs) -> Result<Index> {
        let options = self.options(args)?;

        let paths = if args.catalogs.is_empty() {
            &self.config.schema.catalog.paths
        } else {
            &args.catalogs
        };
        if paths.is_empty() {
            return Err(Error::config("No catalog to search")
                .with_suggestion("Pass --catalog <FILE> or set [catalog] paths in storefront-search.toml")
                .into());
        }

        let catalog = load_pages(paths)?;

        let index = {
            timed_span!(names::INDEX_BUILD_MS, pages = paths.len());
            Index::new(catalog, options).map_err(Error::from)?
        };

        metrics().gauge(names::INDEXED_PRODUCTS, index.len() as u64);
        tracing::info!(products = index.len(), "Index ready");
        Ok(index)
    }
}
