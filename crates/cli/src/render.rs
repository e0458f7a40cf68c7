//! Rendering of ranked search results

use owo_colors::OwoColorize;
use serde::Serialize;
use storefront_search::{Field, ProductId, SearchHit};

/// A result row as written by `--format json`
#[derive(Debug, Serialize)]
pub struct HitRow<'a> {
    /// 1-based rank
    pub rank: usize,
    /// Product id to hand to navigation
    pub id: &'a ProductId,
    /// Display name
    pub name: &'a str,
    /// Category, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'a str>,
    /// Listed price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Combined score, lower is better
    pub score: f64,
    /// Matched character ranges in the name
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<(usize, usize)>,
}

impl<'a> HitRow<'a> {
    /// Flatten a hit for output
    pub fn new(rank: usize, hit: &SearchHit<'a>) -> Self {
        Self {
            rank,
            id: &hit.product.id,
            name: &hit.product.name,
            category: hit.product.category.as_deref(),
            price: hit.product.price,
            score: hit.score,
            highlights: name_ranges(hit),
        }
    }
}

fn name_ranges(hit: &SearchHit<'_>) -> Vec<(usize, usize)> {
    hit.matches
        .iter()
        .find(|m| m.field == Field::Name)
        .map(|m| m.indices.clone())
        .unwrap_or_default()
}

/// Document written for `search --format json`
#[derive(Debug, Serialize)]
pub struct SearchReport<'a> {
    /// The query as typed
    pub query: &'a str,
    /// Ranked rows, best first
    pub results: Vec<HitRow<'a>>,
}

impl<'a> SearchReport<'a> {
    /// Collect hits into a report
    pub fn new(query: &'a str, hits: &[SearchHit<'a>]) -> Self {
        Self {
            query,
            results: hits
                .iter()
                .enumerate()
                .map(|(i, hit)| HitRow::new(i + 1, hit))
                .collect(),
        }
    }
}

/// Emphasize the characters covered by `ranges`, with ANSI styling or
/// square brackets.
///
/// Ranges are inclusive character positions; anything past the end of
/// `text` is ignored.
pub fn highlight(text: &str, ranges: &[(usize, usize)], colored: bool) -> String {
    if ranges.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + ranges.len() * 8);
    let mut run = String::new();
    let mut in_range = false;

    let flush = |out: &mut String, run: &mut String, in_range: bool| {
        if run.is_empty() {
            return;
        }
        if in_range && colored {
            out.push_str(&run.bold().underline().to_string());
        } else if in_range {
            out.push('[');
            out.push_str(run);
            out.push(']');
        } else {
            out.push_str(run);
        }
        run.clear();
    };

    for (i, c) in text.chars().enumerate() {
        let covered = ranges.iter().any(|&(start, end)| start <= i && i <= end);
        if covered != in_range {
            flush(&mut out, &mut run, in_range);
            in_range = covered;
        }
        run.push(c);
    }
    flush(&mut out, &mut run, in_range);
    out
}

/// One text line per hit
pub fn text_lines(hits: &[SearchHit<'_>], colored: bool) -> Vec<String> {
    hits.iter()
        .enumerate()
        .map(|(i, hit)| {
            let row = HitRow::new(i + 1, hit);
            let name = highlight(row.name, &row.highlights, colored);
            let mut line = format!("{:>2}. {}", row.rank, name);
            if let Some(category) = row.category {
                line.push_str(&format!(" ({category})"));
            }
            if let Some(price) = row.price {
                line.push_str(&format!(" ${price:.2}"));
            }
            let meta = format!("id={} score={:.3}", row.id, row.score);
            if colored {
                line.push_str(&format!("  {}", meta.dimmed()));
            } else {
                line.push_str(&format!("  {meta}"));
            }
            line
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_search::{Index, MatcherOptions, Product};

    fn index() -> Index {
        Index::new(
            vec![
                Product::new(1, "Sun Hat")
                    .with_category("Accessories")
                    .with_price(12.5),
                Product::new(2, "Blue Shoes"),
            ],
            MatcherOptions::default().with_matches(),
        )
        .unwrap()
    }

    #[test]
    fn test_highlight_plain() {
        assert_eq!(highlight("Red Shoes", &[(4, 6)], false), "Red [Sho]es");
        assert_eq!(highlight("Red Shoes", &[], false), "Red Shoes");
    }

    #[test]
    fn test_highlight_ignores_out_of_range() {
        assert_eq!(highlight("Hat", &[(1, 10)], false), "H[at]");
    }

    #[test]
    fn test_text_lines() {
        let index = index();
        let hits = index.search_hits("hat", 5);
        let lines = text_lines(&hits, false);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with(" 1. Sun [Hat] (Accessories) $12.50"));
        assert!(lines[0].contains("id=1"));
    }

    #[test]
    fn test_highlight_after_expanding_lowercase() {
        let index = Index::new(
            vec![Product::new(1, "İzmir Hat")],
            MatcherOptions::default().with_matches(),
        )
        .unwrap();
        let hits = index.search_hits("hat", 5);
        let lines = text_lines(&hits, false);
        assert!(lines[0].starts_with(" 1. İzmir [Hat]"));
    }

    #[test]
    fn test_json_report() {
        let index = index();
        let hits = index.search_hits("hat", 5);
        let report = SearchReport::new("hat", &hits);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["query"], "hat");
        assert_eq!(json["results"][0]["id"], 1);
        assert_eq!(json["results"][0]["rank"], 1);
        assert_eq!(json["results"][0]["highlights"][0], serde_json::json!([4, 6]));
    }
}
