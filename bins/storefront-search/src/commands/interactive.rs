//! Interactive command - drive a search session from stdin
//!
//! Each input line replaces the query, like a keystroke in the search box.
//! `:N` picks the N-th result, `:reload` re-reads the catalog, `:q` quits.

use super::{Context, IndexArgs};
use anyhow::Result;
use serde_json::json;
use std::io::{BufRead, IsTerminal, Write};
use storefront_cli::output::Status;
use storefront_cli::OutputFormat;
use storefront_core::error::exit_codes;
use storefront_search::{SearchSession, SharedIndex};
use storefront_telemetry::{metrics, names, Timer};

enum Input<'a> {
    Quit,
    Reload,
    Select(usize),
    Query(&'a str),
}

fn parse(line: &str) -> Input<'_> {
    match line.strip_prefix(':') {
        Some("q" | "quit") => Input::Quit,
        Some("reload") => Input::Reload,
        Some(n) => match n.trim().parse::<usize>() {
            Ok(n) if n > 0 => Input::Select(n - 1),
            _ => Input::Query(line),
        },
        None => Input::Query(line),
    }
}

/// Run the session loop until EOF or `:q`
pub fn run(ctx: &Context, args: &IndexArgs, limit: Option<usize>) -> Result<i32> {
    let shared = SharedIndex::new(ctx.build_index(args)?);
    let mut session = SearchSession::with_limit(shared.load(), ctx.limit(limit));

    let stdin = std::io::stdin();
    let prompt = stdin.is_terminal() && ctx.format == OutputFormat::Text;
    let mut stdout = std::io::stdout().lock();

    let mut lines = stdin.lock().lines();
    loop {
        if prompt {
            write!(stdout, "search> ")?;
            stdout.flush()?;
        }
        let Some(line) = lines.next() else { break };
        let line = line?;

        match parse(line.trim_end_matches(['\r', '\n'])) {
            Input::Quit => break,
            Input::Reload => {
                shared.replace(ctx.build_index(args)?);
                session.replace_index(shared.load());
                print_results(&mut stdout, ctx.format, &session)?;
            }
            Input::Select(slot) => match session.select(slot) {
                Some(id) => match ctx.format {
                    OutputFormat::Json => writeln!(stdout, "{}", json!({ "selected": id }))?,
                    OutputFormat::Text => writeln!(stdout, "→ product {id}")?,
                },
                None => Status::warning(&format!("No result #{}", slot + 1)),
            },
            Input::Query(query) => {
                let timer = Timer::start(names::QUERY_MS);
                session.set_query(query);
                timer.stop();
                metrics().increment(names::QUERIES);
                print_results(&mut stdout, ctx.format, &session)?;
            }
        }
    }

    tracing::debug!(
        queries = metrics().counter(names::QUERIES),
        "Interactive session ended"
    );
    Ok(exit_codes::SUCCESS)
}

fn print_results(out: &mut impl Write, format: OutputFormat, session: &SearchSession) -> Result<()> {
    let index = session.index();
    match format {
        OutputFormat::Json => {
            let results: Vec<_> = session
                .ranked()
                .iter()
                .filter_map(|r| {
                    index
                        .product(r.position)
                        .map(|p| json!({ "id": p.id, "name": p.name, "score": r.score }))
                })
                .collect();
            writeln!(out, "{}", json!({ "query": session.query(), "results": results }))?;
        }
        OutputFormat::Text => {
            for (i, product) in session.results().enumerate() {
                writeln!(out, "{:>2}. {}", i + 1, product.name)?;
            }
            if session.is_empty() && !session.query().is_empty() {
                writeln!(out, "   (no matches)")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert!(matches!(parse(":q"), Input::Quit));
        assert!(matches!(parse(":reload"), Input::Reload));
        assert!(matches!(parse(":2"), Input::Select(1)));
        assert!(matches!(parse(":0"), Input::Query(":0")));
        assert!(matches!(parse("red sho"), Input::Query("red sho")));
    }
}
