//! Matcher configuration.

use crate::error::{Result, SearchError};
use crate::product::Field;
use serde::{Deserialize, Serialize};

/// Default similarity cutoff (0 = exact only, 1 = anything).
pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// Default number of results returned per query.
pub const DEFAULT_LIMIT: usize = 5;

/// Queries shorter than this many characters return nothing.
pub const DEFAULT_MIN_QUERY_CHARS: usize = 2;

/// Default distance over which a match location is penalized.
pub const DEFAULT_DISTANCE: usize = 100;

/// A searchable field and its relative weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Which product field to search
    pub field: Field,
    /// Relative weight; weights are normalized to sum to 1
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl FieldSpec {
    /// A field with weight 1.
    pub fn new(field: Field) -> Self {
        Self { field, weight: 1.0 }
    }

    /// A field with an explicit weight.
    pub fn weighted(field: Field, weight: f64) -> Self {
        Self { field, weight }
    }
}

impl From<Field> for FieldSpec {
    fn from(field: Field) -> Self {
        Self::new(field)
    }
}

fn default_weight() -> f64 {
    1.0
}

/// Tuning knobs for index construction and scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherOptions {
    /// Fields to search, in order
    pub fields: Vec<FieldSpec>,
    /// Similarity cutoff in `[0.0, 1.0]`
    pub threshold: f64,
    /// Character position where a match is expected to start
    pub location: usize,
    /// How far from `location` a match may drift before it scores 1.0
    pub distance: usize,
    /// Score on edit errors only, ignoring match position
    pub ignore_location: bool,
    /// Compare characters exactly instead of case-folding
    pub case_sensitive: bool,
    /// Keep scanning after a perfect match has been found
    pub find_all_matches: bool,
    /// Shortest run of matched characters that counts as a hit
    pub min_match_char_length: usize,
    /// Report matched character ranges per field
    pub include_matches: bool,
    /// Do not penalize matches in long fields
    pub ignore_field_norm: bool,
    /// Exponent applied to the field-length norm
    pub field_norm_weight: f64,
    /// Queries shorter than this (in characters) return nothing
    pub min_query_chars: usize,
    /// Default result cap
    pub limit: usize,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            fields: Field::DEFAULT.into_iter().map(FieldSpec::new).collect(),
            threshold: DEFAULT_THRESHOLD,
            location: 0,
            distance: DEFAULT_DISTANCE,
            ignore_location: false,
            case_sensitive: false,
            find_all_matches: false,
            min_match_char_length: 1,
            include_matches: false,
            ignore_field_norm: false,
            field_norm_weight: 1.0,
            min_query_chars: DEFAULT_MIN_QUERY_CHARS,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl MatcherOptions {
    /// Defaults with the given fields and threshold.
    pub fn new(fields: impl IntoIterator<Item = impl Into<FieldSpec>>, threshold: f64) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            threshold,
            ..Self::default()
        }
    }

    /// Replace the field list.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = impl Into<FieldSpec>>) -> Self {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the similarity cutoff.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the default result cap.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the expected match location and the drift distance.
    pub fn with_location(mut self, location: usize, distance: usize) -> Self {
        self.location = location;
        self.distance = distance;
        self
    }

    /// Score on edit errors only.
    pub fn ignoring_location(mut self) -> Self {
        self.ignore_location = true;
        self
    }

    /// Compare characters exactly.
    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    /// Report matched character ranges.
    pub fn with_matches(mut self) -> Self {
        self.include_matches = true;
        self
    }

    /// Require matched runs of at least `len` characters.
    pub fn with_min_match_char_length(mut self, len: usize) -> Self {
        self.min_match_char_length = len;
        self
    }

    /// Set the query trigger length.
    pub fn with_min_query_chars(mut self, chars: usize) -> Self {
        self.min_query_chars = chars;
        self
    }

    /// Check every option; called by index construction.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(SearchError::config(format!(
                "threshold must be within [0.0, 1.0], got {}",
                self.threshold
            )));
        }
        if self.fields.is_empty() {
            return Err(SearchError::config("at least one field must be searched"));
        }
        for (i, spec) in self.fields.iter().enumerate() {
            if !spec.weight.is_finite() || spec.weight <= 0.0 {
                return Err(SearchError::config(format!(
                    "weight for field `{}` must be a positive number, got {}",
                    spec.field, spec.weight
                )));
            }
            if self.fields[..i].iter().any(|other| other.field == spec.field) {
                return Err(SearchError::config(format!(
                    "field `{}` is listed more than once",
                    spec.field
                )));
            }
        }
        if !self.field_norm_weight.is_finite() || self.field_norm_weight < 0.0 {
            return Err(SearchError::config(format!(
                "field_norm_weight must be a non-negative number, got {}",
                self.field_norm_weight
            )));
        }
        if self.min_match_char_length == 0 {
            return Err(SearchError::config("min_match_char_length must be at least 1"));
        }
        Ok(())
    }

    /// Field weights scaled to sum to 1, in field order.
    pub(crate) fn normalized_weights(&self) -> Vec<f64> {
        let total: f64 = self.fields.iter().map(|f| f.weight).sum();
        self.fields.iter().map(|f| f.weight / total).collect()
    }
}
