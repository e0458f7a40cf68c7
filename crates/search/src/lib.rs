//! Incremental fuzzy product search for the storefront search box.
//!
//! This crate provides:
//! - Typed product records with lenient ingestion of loosely typed catalog JSON
//! - An immutable index over selected text fields
//! - Bitap approximate matching with location and field-length weighting
//! - Atomic index replacement and a caller-side search session
//! - WASM bindings for browser usage
//!
//! # Example
//!
//! ```
//! use storefront_search::{build, search, Field, Product};
//!
//! let catalog = vec![
//!     Product::new(1, "Red Shoes"),
//!     Product::new(2, "Red Shorts"),
//!     Product::new(3, "Blue Hat"),
//! ];
//!
//! let index = build(catalog, &Field::DEFAULT, 0.4).unwrap();
//! let names: Vec<_> = search(&index, "red sho", 5).iter().map(|p| p.name.as_str()).collect();
//! assert_eq!(names, ["Red Shoes", "Red Shorts"]);
//! ```

mod bitap;
mod error;
mod index;
mod matcher;
mod options;
mod product;
mod session;
mod shared;

#[cfg(feature = "wasm")]
mod wasm;

pub use bitap::MAX_BITS;
pub use error::{Result, SearchError};
pub use index::Index;
pub use matcher::{build, search, select, FieldMatch, RankedPosition, SearchHit};
pub use options::{
    FieldSpec, MatcherOptions, DEFAULT_DISTANCE, DEFAULT_LIMIT, DEFAULT_MIN_QUERY_CHARS,
    DEFAULT_THRESHOLD,
};
pub use product::{Catalog, Field, Product, ProductId};
pub use session::SearchSession;
pub use shared::SharedIndex;
