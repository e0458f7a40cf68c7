//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use owo_colors::OwoColorize;
use storefront_core::Error;

/// How command results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored when attached to a terminal
    #[default]
    Text,
    /// One JSON document per command
    Json,
}

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }
}

/// Write an error to stderr in the requested format
pub fn report_error(err: &Error, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string(&err.to_report()) {
            Ok(json) => eprintln!("{json}"),
            Err(_) => Status::error(&err.to_string()),
        },
        OutputFormat::Text => {
            Status::error(&format!("[{}] {}", err.code, err.message));
            if let Some(ctx) = &err.context {
                eprintln!("  {} {}", "context:".dimmed(), ctx);
            }
            if let Some(suggestion) = &err.suggestion {
                eprintln!("  {} {}", "hint:".cyan(), suggestion);
            }
        }
    }
}

/// Format a latency in milliseconds, keeping precision below one millisecond
pub fn format_millis(ms: f64) -> String {
    if ms < 1.0 {
        format!("{:.0}µs", ms * 1000.0)
    } else if ms < 1000.0 {
        format!("{:.2}ms", ms)
    } else {
        format!("{:.2}s", ms / 1000.0)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_millis_micros() {
        assert_eq!(format_millis(0.25), "250µs");
    }

    #[test]
    fn test_format_millis_ms() {
        assert_eq!(format_millis(12.5), "12.50ms");
    }

    #[test]
    fn test_format_millis_secs() {
        assert_eq!(format_millis(2500.0), "2.50s");
    }

    #[test]
    fn test_format_count_singular() {
        assert_eq!(format_count(1, "product", "products"), "1 product");
    }

    #[test]
    fn test_format_count_plural() {
        assert_eq!(format_count(0, "product", "products"), "0 products");
    }
}
