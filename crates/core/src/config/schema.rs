//! Configuration schema definitions
//!
//! Every section and key is optional; missing values fall back to the
//! matcher's defaults.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use storefront_search::{
    Field, FieldSpec, MatcherOptions, DEFAULT_DISTANCE, DEFAULT_LIMIT, DEFAULT_MIN_QUERY_CHARS,
    DEFAULT_THRESHOLD,
};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// A searched field, either bare (`"name"`) or weighted
/// (`{ name = "category", weight = 0.5 }`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldEntry {
    Name(String),
    Weighted { name: String, weight: f64 },
}

impl FieldEntry {
    fn to_spec(&self) -> Result<FieldSpec> {
        let (name, weight) = match self {
            Self::Name(name) => (name, 1.0),
            Self::Weighted { name, weight } => (name, *weight),
        };
        let field: Field = name.parse()?;
        Ok(FieldSpec::weighted(field, weight))
    }
}

/// Matching behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Fields to search, in order
    #[serde(default = "default_fields")]
    pub fields: Vec<FieldEntry>,

    /// Similarity cutoff in 0.0..=1.0
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Maximum results per query
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Queries shorter than this return nothing
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,

    /// Expected match position within a field
    #[serde(default)]
    pub location: usize,

    /// Drift from `location` that costs a full point of score
    #[serde(default = "default_distance")]
    pub distance: usize,

    #[serde(default)]
    pub ignore_location: bool,

    #[serde(default)]
    pub case_sensitive: bool,

    #[serde(default)]
    pub find_all_matches: bool,

    #[serde(default = "default_min_match_char_length")]
    pub min_match_char_length: usize,

    #[serde(default)]
    pub include_matches: bool,

    #[serde(default)]
    pub ignore_field_norm: bool,

    #[serde(default = "default_field_norm_weight")]
    pub field_norm_weight: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fields: default_fields(),
            threshold: default_threshold(),
            limit: default_limit(),
            min_query_chars: default_min_query_chars(),
            location: 0,
            distance: default_distance(),
            ignore_location: false,
            case_sensitive: false,
            find_all_matches: false,
            min_match_char_length: default_min_match_char_length(),
            include_matches: false,
            ignore_field_norm: false,
            field_norm_weight: default_field_norm_weight(),
        }
    }
}

impl SearchConfig {
    /// Convert to validated matcher options.
    pub fn to_options(&self) -> Result<MatcherOptions> {
        let fields = self
            .fields
            .iter()
            .map(FieldEntry::to_spec)
            .collect::<Result<Vec<_>>>()?;

        let options = MatcherOptions {
            fields,
            threshold: self.threshold,
            location: self.location,
            distance: self.distance,
            ignore_location: self.ignore_location,
            case_sensitive: self.case_sensitive,
            find_all_matches: self.find_all_matches,
            min_match_char_length: self.min_match_char_length,
            include_matches: self.include_matches,
            ignore_field_norm: self.ignore_field_norm,
            field_norm_weight: self.field_norm_weight,
            min_query_chars: self.min_query_chars,
            limit: self.limit,
        };
        options
            .validate()
            .map_err(|e| Error::from(e).with_context("While reading the [search] section"))?;
        Ok(options)
    }
}

fn default_fields() -> Vec<FieldEntry> {
    Field::DEFAULT
        .iter()
        .map(|f| FieldEntry::Name(f.as_str().to_string()))
        .collect()
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_min_query_chars() -> usize {
    DEFAULT_MIN_QUERY_CHARS
}

fn default_distance() -> usize {
    DEFAULT_DISTANCE
}

fn default_min_match_char_length() -> usize {
    1
}

fn default_field_norm_weight() -> f64 {
    1.0
}

/// Where the catalog snapshot comes from when not given on the command line
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// Catalog pages, loaded in order
    #[serde(default)]
    pub paths: Vec<PathBuf>,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
