//! Atomically replaceable index handle.

use crate::error::Result;
use crate::index::Index;
use crate::options::MatcherOptions;
use crate::product::Catalog;
use std::sync::{Arc, PoisonError, RwLock};

/// Holds the current [`Index`] and swaps in fresh builds.
///
/// Readers take an `Arc<Index>` snapshot and search it without holding any
/// lock. Rebuilds happen outside the lock; only the pointer swap is guarded,
/// so a reader sees either the old index or the new one, never a partial one.
#[derive(Debug)]
pub struct SharedIndex {
    current: RwLock<Arc<Index>>,
}

impl SharedIndex {
    /// Wrap an initial index.
    pub fn new(index: Index) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
        }
    }

    /// An index over an empty catalog with the given options.
    pub fn empty(options: MatcherOptions) -> Result<Self> {
        Ok(Self::new(Index::new(Catalog::default(), options)?))
    }

    /// Current snapshot.
    pub fn load(&self) -> Arc<Index> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Install `index`, returning the one it replaced.
    pub fn replace(&self, index: Index) -> Arc<Index> {
        let next = Arc::new(index);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }

    /// Index a new catalog snapshot with the current options and install it.
    ///
    /// On invalid options the current index stays in place.
    pub fn rebuild(&self, catalog: impl Into<Catalog>) -> Result<Arc<Index>> {
        let options = self.load().options().clone();
        self.rebuild_with(catalog, options)
    }

    /// Index a new catalog snapshot with new options and install it.
    pub fn rebuild_with(
        &self,
        catalog: impl Into<Catalog>,
        options: MatcherOptions,
    ) -> Result<Arc<Index>> {
        let index = Index::new(catalog, options)?;
        tracing::debug!(products = index.len(), "Replacing search index");
        Ok(self.replace(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Product;
    use std::thread;

    #[test]
    fn test_snapshot_survives_rebuild() {
        let shared = SharedIndex::empty(MatcherOptions::default()).unwrap();
        let before = shared.load();

        shared.rebuild(vec![Product::new(1, "Desk Lamp")]).unwrap();

        assert!(before.search("lamp", 5).is_empty());
        assert_eq!(shared.load().search("lamp", 5).len(), 1);
    }

    #[test]
    fn test_invalid_rebuild_keeps_current() {
        let shared = SharedIndex::new(
            Index::new(vec![Product::new(1, "Desk Lamp")], MatcherOptions::default()).unwrap(),
        );
        let result = shared.rebuild_with(
            Vec::<Product>::new(),
            MatcherOptions::default().with_threshold(2.0),
        );
        assert!(result.is_err());
        assert_eq!(shared.load().len(), 1);
    }

    #[test]
    fn test_concurrent_readers_see_whole_indexes() {
        let shared = Arc::new(SharedIndex::empty(MatcherOptions::default()).unwrap());

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let index = shared.load();
                        let hits = index.search("lamp", 5);
                        assert!(hits.len() == index.len().min(5));
                    }
                })
            })
            .collect();

        for n in 1..=20 {
            let catalog: Vec<Product> = (0..n).map(|i| Product::new(i, "Lamp")).collect();
            shared.rebuild(catalog).unwrap();
        }

        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(shared.load().len(), 20);
    }
}
