//! Query scoring and ranking.

use crate::bitap::{BitapConfig, BitapSearcher};
use crate::index::{normalize, Index, IndexedRecord};
use crate::product::{Field, Product};
use serde::Serialize;
use std::cmp::Ordering;

/// Where and how well one field of a product matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMatch {
    /// The field that matched
    pub field: Field,
    /// Field score, 0 is exact
    pub score: f64,
    /// Inclusive character ranges of the matched text (only with `include_matches`)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub indices: Vec<(usize, usize)>,
}

/// A ranked result borrowing its product from the index.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit<'a> {
    /// The matched product, straight from the catalog
    pub product: &'a Product,
    /// Position of the product in the catalog
    pub position: usize,
    /// Combined score, lower is better
    pub score: f64,
    /// Per-field detail
    pub matches: Vec<FieldMatch>,
}

/// Owned form of a hit, for callers that keep results across index swaps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedPosition {
    /// Position of the product in the catalog
    pub position: usize,
    /// Combined score, lower is better
    pub score: f64,
}

impl From<&SearchHit<'_>> for RankedPosition {
    fn from(hit: &SearchHit<'_>) -> Self {
        Self {
            position: hit.position,
            score: hit.score,
        }
    }
}

struct Scored {
    position: usize,
    score: f64,
    matches: Vec<FieldMatch>,
}

impl Index {
    /// Best matches for `query`, at most `limit`, best first.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Product> {
        self.search_hits(query, limit)
            .into_iter()
            .map(|hit| hit.product)
            .collect()
    }

    /// Like [`Index::search`] but with scores and per-field detail.
    ///
    /// Queries shorter than `min_query_chars` characters return nothing. Every
    /// product is scored before truncating, and equal scores keep catalog order.
    pub fn search_hits(&self, query: &str, limit: usize) -> Vec<SearchHit<'_>> {
        let options = self.options();
        let query_chars = query.chars().count();
        if query_chars == 0 || query_chars < options.min_query_chars || limit == 0 {
            return Vec::new();
        }

        let searcher = BitapSearcher::new(
            normalize(query, options.case_sensitive),
            BitapConfig {
                location: options.location,
                distance: options.distance,
                threshold: options.threshold,
                find_all_matches: options.find_all_matches,
                min_match_char_length: options.min_match_char_length,
                include_matches: options.include_matches,
                ignore_location: options.ignore_location,
            },
        );

        let mut scored = self.score_records(&searcher);
        scored.sort_by(|a, b| match a.score.total_cmp(&b.score) {
            Ordering::Equal => a.position.cmp(&b.position),
            other => other,
        });

        let candidates = scored.len();
        scored.truncate(limit);

        tracing::trace!(
            query,
            candidates,
            returned = scored.len(),
            "Search completed"
        );

        scored
            .into_iter()
            .filter_map(|s| {
                let product = self.product(s.position)?;
                Some(SearchHit {
                    product,
                    position: s.position,
                    score: s.score,
                    matches: s.matches,
                })
            })
            .collect()
    }

    /// Default-limit search using the configured result cap.
    pub fn search_default(&self, query: &str) -> Vec<&Product> {
        self.search(query, self.options().limit)
    }

    #[cfg(feature = "parallel")]
    fn score_records(&self, searcher: &BitapSearcher) -> Vec<Scored> {
        use rayon::prelude::*;
        self.records()
            .par_iter()
            .filter_map(|record| self.score_record(searcher, record))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn score_records(&self, searcher: &BitapSearcher) -> Vec<Scored> {
        self.records()
            .iter()
            .filter_map(|record| self.score_record(searcher, record))
            .collect()
    }

    /// Product score: the product of `field_score ^ (weight * norm)` over the
    /// fields that matched. `None` when no field cleared the threshold.
    fn score_record(&self, searcher: &BitapSearcher, record: &IndexedRecord) -> Option<Scored> {
        let ignore_norm = self.options().ignore_field_norm;
        let mut total = 1.0;
        let mut matches = Vec::new();

        for field in &record.fields {
            let found = searcher.search_in(&field.text);
            if !found.is_match {
                continue;
            }

            let weight = self.weight_at(field.slot);
            let norm = if ignore_norm { 1.0 } else { field.norm };
            let base = if found.score == 0.0 { f64::EPSILON } else { found.score };
            total *= base.powf(weight * norm);

            matches.push(FieldMatch {
                field: self.field_at(field.slot),
                score: found.score,
                indices: found.indices,
            });
        }

        (!matches.is_empty()).then_some(Scored {
            position: record.position,
            score: total,
            matches,
        })
    }
}

/// Build an index over `fields` with the given threshold and default options.
pub fn build(
    catalog: impl Into<crate::Catalog>,
    fields: &[Field],
    threshold: f64,
) -> crate::Result<Index> {
    Index::new(
        catalog,
        crate::MatcherOptions::new(fields.iter().copied(), threshold),
    )
}

/// Best matches for `query` in `index`, at most `limit`.
pub fn search<'a>(index: &'a Index, query: &str, limit: usize) -> Vec<&'a Product> {
    index.search(query, limit)
}

/// Identifier to hand back when the user picks `product`.
pub fn select(product: &Product) -> crate::ProductId {
    product.id.clone()
}
