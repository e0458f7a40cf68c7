//! Search command - one query against a catalog snapshot

use super::{Context, IndexArgs};
use anyhow::Result;
use std::io::IsTerminal;
use storefront_cli::output::{format_count, format_millis, Status};
use storefront_cli::render::{text_lines, SearchReport};
use storefront_cli::OutputFormat;
use storefront_core::error::exit_codes;
use storefront_telemetry::{metrics, names, Timer};

/// Run one query and print the ranked products
pub fn run(ctx: &Context, query: &str, args: &IndexArgs, limit: Option<usize>) -> Result<i32> {
    let index = ctx.build_index(args)?;
    let limit = ctx.limit(limit);

    let timer = Timer::start(names::QUERY_MS);
    let hits = index.search_hits(query, limit);
    let elapsed = timer.stop();

    metrics().increment(names::QUERIES);
    if hits.is_empty() {
        metrics().increment(names::EMPTY_RESULTS);
    }
    tracing::debug!(query, results = hits.len(), "Search finished");

    match ctx.format {
        OutputFormat::Json => {
            let report = SearchReport::new(query, &hits);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            if hits.is_empty() {
                Status::warning(&format!("No products match {query:?}"));
            } else {
                let colored = std::io::stdout().is_terminal();
                for line in text_lines(&hits, colored) {
                    println!("{line}");
                }
                println!();
                Status::info(&format!(
                    "{} of {} in {}",
                    format_count(hits.len(), "match", "matches"),
                    format_count(index.len(), "product", "products"),
                    format_millis(elapsed.as_secs_f64() * 1000.0)
                ));
            }
        }
    }

    Ok(if hits.is_empty() {
        exit_codes::NO_RESULTS
    } else {
        exit_codes::SUCCESS
    })
}
