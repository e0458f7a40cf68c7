//! Bench command - keystroke latency against a catalog snapshot

use super::{Context, IndexArgs};
use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::time::Instant;
use storefront_cli::output::{format_count, format_millis, Status};
use storefront_cli::OutputFormat;
use storefront_core::error::exit_codes;
use storefront_telemetry::{metrics, names, HistogramStats};

/// Latency the search box must stay under per keystroke
pub const BUDGET_MS: f64 = 50.0;

/// JSON output for benchmark
#[derive(Debug, Serialize)]
struct JsonBenchOutput {
    products: usize,
    iterations: usize,
    budget_ms: f64,
    within_budget: bool,
    build_ms: HistogramStats,
    queries: Vec<QueryStats>,
    metrics: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct QueryStats {
    query: String,
    keystrokes: usize,
    results: usize,
    latency_ms: HistogramStats,
}

/// Every prefix of `query`, as a user would type it
fn keystrokes(query: &str) -> Vec<&str> {
    query
        .char_indices()
        .map(|(i, c)| &query[..i + c.len_utf8()])
        .collect()
}

/// Run benchmark
pub fn run(ctx: &Context, args: &IndexArgs, queries: &[String], iterations: usize) -> Result<i32> {
    let index = ctx.build_index(args)?;
    let limit = ctx.config.schema.search.limit;
    let iterations = iterations.max(1);

    let mut stats = Vec::with_capacity(queries.len());
    for query in queries {
        let prefixes = keystrokes(query);
        let mut samples = Vec::with_capacity(prefixes.len() * iterations);
        let mut results = 0;

        for _ in 0..iterations {
            for prefix in &prefixes {
                let start = Instant::now();
                let hits = index.search(prefix, limit);
                let ms = start.elapsed().as_secs_f64() * 1000.0;

                samples.push(ms);
                metrics().histogram(names::QUERY_MS, ms);
                metrics().increment(names::QUERIES);
                results = hits.len();
            }
        }

        stats.push(QueryStats {
            query: query.clone(),
            keystrokes: prefixes.len(),
            results,
            latency_ms: HistogramStats::from_values(&samples),
        });
    }

    let within_budget = stats.iter().all(|s| s.latency_ms.max <= BUDGET_MS);
    let build_ms = metrics().histogram_stats(names::INDEX_BUILD_MS);

    match ctx.format {
        OutputFormat::Json => {
            let output = JsonBenchOutput {
                products: index.len(),
                iterations,
                budget_ms: BUDGET_MS,
                within_budget,
                build_ms,
                queries: stats,
                metrics: metrics().export_json(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            Status::header(&format!(
                "Benchmark: {} x {}",
                format_count(index.len(), "product", "products"),
                format_count(iterations, "iteration", "iterations")
            ));
            println!("  index build  {}", format_millis(build_ms.max));
            println!();
            for s in &stats {
                print_stats(s);
            }
            println!();
            if within_budget {
                Status::success(&format!("Every keystroke under {}", format_millis(BUDGET_MS)));
            } else {
                Status::warning(&format!("Some keystrokes exceeded {}", format_millis(BUDGET_MS)));
            }
        }
    }

    Ok(if within_budget {
        exit_codes::SUCCESS
    } else {
        exit_codes::FAILURE
    })
}

fn print_stats(stats: &QueryStats) {
    let l = &stats.latency_ms;
    println!(
        "  {:<24} {}  p50 {}  p95 {}  p99 {}  max {}",
        stats.query.bold(),
        format_count(stats.results, "result", "results").dimmed(),
        format_millis(l.p50),
        format_millis(l.p95),
        format_millis(l.p99),
        format_millis(l.max),
    );
}
