//! Caller-side state for a search box.
//!
//! The matcher is stateless; this type holds what a navigation-bar search box
//! keeps between keystrokes: the query text and the products currently shown.
//! It is optional glue, not part of the matcher itself.

use crate::index::Index;
use crate::matcher::RankedPosition;
use crate::product::{Product, ProductId};
use std::sync::Arc;

/// Query text plus the results currently on screen.
#[derive(Debug, Clone)]
pub struct SearchSession {
    index: Arc<Index>,
    limit: usize,
    query: String,
    results: Vec<RankedPosition>,
}

impl SearchSession {
    /// Start an empty session over `index`, capping results at the index's
    /// configured limit.
    pub fn new(index: Arc<Index>) -> Self {
        let limit = index.options().limit;
        Self::with_limit(index, limit)
    }

    /// Start an empty session with an explicit result cap.
    pub fn with_limit(index: Arc<Index>, limit: usize) -> Self {
        Self {
            index,
            limit,
            query: String::new(),
            results: Vec::new(),
        }
    }

    /// Current query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Index the results refer to.
    pub fn index(&self) -> &Arc<Index> {
        &self.index
    }

    /// Update the query and recompute results.
    ///
    /// Below the trigger length the result list is simply emptied.
    pub fn set_query(&mut self, query: impl Into<String>) -> &mut Self {
        self.query = query.into();
        self.refresh();
        self
    }

    /// Products currently shown, best first.
    pub fn results(&self) -> impl Iterator<Item = &Product> + '_ {
        self.results
            .iter()
            .filter_map(|r| self.index.product(r.position))
    }

    /// Ranked positions currently shown.
    pub fn ranked(&self) -> &[RankedPosition] {
        &self.results
    }

    /// Number of results currently shown.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True if nothing is shown.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Pick the result at `slot` (0 = top), returning its id and clearing
    /// the session. An out-of-range slot leaves the session untouched.
    pub fn select(&mut self, slot: usize) -> Option<ProductId> {
        let ranked = self.results.get(slot)?;
        let id = self.index.product(ranked.position).map(crate::select)?;
        self.clear();
        Some(id)
    }

    /// Drop the query and results.
    pub fn clear(&mut self) {
        self.query.clear();
        self.results.clear();
    }

    /// Swap in an index built from a newer catalog and re-run the current query
    /// against it, so results never point into a replaced snapshot.
    pub fn replace_index(&mut self, index: Arc<Index>) {
        self.index = index;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.results = self
            .index
            .search_hits(&self.query, self.limit)
            .iter()
            .map(RankedPosition::from)
            .collect();
    }
}
