//! Core utilities for the storefront search tools
//!
//! This crate provides the pieces shared by every front end that builds a
//! product index:
//!
//! - **Error handling**: Errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with environment overrides
//! - **Catalog loading**: Product snapshots read from exported JSON pages
//!
//! # Example
//!
//! ```rust,no_run
//! use storefront_core::{catalog, config::Config};
//! use storefront_search::Index;
//!
//! # fn main() -> storefront_core::Result<()> {
//! let config = Config::load(None)?;
//! let catalog = catalog::load_catalog("products.json")?;
//! let index = Index::new(catalog, config.schema.search.to_options()?)?;
//!
//! for product in index.search("red sho", config.schema.search.limit) {
//!     println!("{}", product.name);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod error;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{load_catalog, load_pages};
    pub use crate::config::{Config, ConfigSchema, SearchConfig};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
}
