//! Configuration loading and schema definitions
//!
//! Settings shared by the search CLI and anything else that builds an index
//! from a `storefront-search.toml`.

mod loader;
mod schema;

pub use loader::{Config, CONFIG_FILE_NAME, LIMIT_ENV, THRESHOLD_ENV};
pub use schema::*;
