//! Terminal output helpers for the storefront search tools
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Result rendering as text or JSON
//! - Error reports

#![warn(missing_docs)]

pub mod output;
pub mod render;

pub use output::{OutputFormat, Status};
