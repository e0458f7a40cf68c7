//! End-to-end tests for the storefront-search binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CATALOG: &str = r#"[
    {"id": 1, "name": "Red Shoes", "category": "Footwear", "price": 49.5},
    {"id": 2, "name": "Red Shorts", "category": "Clothing"},
    {"id": 3, "name": "Blue Hat", "category": "Accessories"}
]"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let ws = Self {
            dir: TempDir::new().unwrap(),
        };
        ws.write("products.json", CATALOG);
        ws
    }

    fn write(&self, name: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The binary, isolated from any real config file or environment override
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("storefront-search").unwrap();
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join("xdg"))
            .env_remove("STOREFRONT_SEARCH_THRESHOLD")
            .env_remove("STOREFRONT_SEARCH_LIMIT")
            .env_remove("RUST_LOG");
        cmd
    }
}

fn result_names(stdout: &[u8]) -> Vec<String> {
    let report: serde_json::Value = serde_json::from_slice(stdout).unwrap();
    report["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn search_ranks_partial_query() {
    let ws = Workspace::new();
    let output = ws
        .cmd()
        .args(["search", "red sho", "--catalog", "products.json", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_eq!(result_names(&output), ["Red Shoes", "Red Shorts"]);
}

#[test]
fn search_text_output() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["search", "blue", "--catalog", "products.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Blue Hat"))
        .stdout(predicate::str::contains("Red Shoes").not());
}

#[test]
fn search_without_matches_exits_with_no_results() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["search", "zzzzzz", "--catalog", "products.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No products match"));
}

#[test]
fn single_character_query_returns_nothing() {
    let ws = Workspace::new();
    let output = ws
        .cmd()
        .args(["search", "r", "--catalog", "products.json", "--json"])
        .assert()
        .code(2)
        .get_output()
        .stdout
        .clone();

    assert!(result_names(&output).is_empty());
}

#[test]
fn threshold_out_of_range_is_a_config_error() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["search", "red", "--catalog", "products.json", "--threshold", "1.5"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("E5001"));
}

#[test]
fn unknown_field_is_a_config_error() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["search", "red", "--catalog", "products.json", "--fields", "name,sku"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("sku"));
}

#[test]
fn category_field_search() {
    let ws = Workspace::new();
    let output = ws
        .cmd()
        .args([
            "search",
            "footwear",
            "--catalog",
            "products.json",
            "--fields",
            "category",
            "--json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_eq!(result_names(&output), ["Red Shoes"]);
}

#[test]
fn missing_catalog_file() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["search", "red", "--catalog", "missing.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("E2001"));
}

#[test]
fn no_catalog_configured() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["search", "red"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("--catalog"));
}

#[test]
fn product_without_id_is_a_catalog_error() {
    let ws = Workspace::new();
    ws.write("bad.json", r#"[{"name": "Nameless"}]"#);
    ws.cmd()
        .args(["search", "name", "--catalog", "bad.json", "--format", "json"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("INVALID_PRODUCT"));
}

#[test]
fn paged_catalog_is_concatenated() {
    let ws = Workspace::new();
    ws.write(
        "page1.json",
        r#"{"products": [{"id": 10, "title": "Desk Lamp"}], "total": 2}"#,
    );
    ws.write(
        "page2.json",
        r#"{"products": [{"id": 11, "title": "Floor Lamp"}], "total": 2}"#,
    );

    let output = ws
        .cmd()
        .args([
            "search",
            "lamp",
            "--catalog",
            "page1.json",
            "--catalog",
            "page2.json",
            "--json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_eq!(result_names(&output), ["Desk Lamp", "Floor Lamp"]);
}

#[test]
fn config_file_supplies_catalog_and_limit() {
    let ws = Workspace::new();
    ws.write(
        "storefront-search.toml",
        "[search]\nlimit = 1\n\n[catalog]\npaths = [\"products.json\"]\n",
    );

    let output = ws
        .cmd()
        .args(["search", "red sho", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_eq!(result_names(&output), ["Red Shoes"]);
}

#[test]
fn limit_environment_override() {
    let ws = Workspace::new();
    let output = ws
        .cmd()
        .env("STOREFRONT_SEARCH_LIMIT", "1")
        .args(["search", "red sho", "--catalog", "products.json", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_eq!(result_names(&output).len(), 1);
}

#[test]
fn garbage_environment_override() {
    let ws = Workspace::new();
    ws.cmd()
        .env("STOREFRONT_SEARCH_THRESHOLD", "loose")
        .args(["search", "red", "--catalog", "products.json"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("STOREFRONT_SEARCH_THRESHOLD"));
}

#[test]
fn explicit_missing_config_file() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["--config", "nope.toml", "config"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("E3001"));
}

#[test]
fn config_command_prints_effective_values() {
    let ws = Workspace::new();
    ws.write("storefront-search.toml", "[search]\nthreshold = 0.25\n");

    ws.cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("threshold = 0.25"))
        .stdout(predicate::str::contains("limit = 5"));
}

#[test]
fn interactive_session_selects_result() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["interactive", "--catalog", "products.json"])
        .write_stdin("red sho\n:1\n:q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(" 1. Red Shoes"))
        .stdout(predicate::str::contains("→ product 1"));
}

#[test]
fn interactive_json_lines() {
    let ws = Workspace::new();
    let output = ws
        .cmd()
        .args(["--format", "json", "interactive", "--catalog", "products.json"])
        .write_stdin("blue\n:1\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let lines: Vec<serde_json::Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["results"][0]["name"], "Blue Hat");
    assert_eq!(lines[1]["selected"], 3);
}

#[test]
fn bench_reports_latency() {
    let ws = Workspace::new();
    let output = ws
        .cmd()
        .args([
            "--format",
            "json",
            "bench",
            "--catalog",
            "products.json",
            "--query",
            "red shoes",
            "-n",
            "3",
        ])
        .output()
        .unwrap();

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["products"], 3);
    assert_eq!(report["queries"][0]["keystrokes"], 9);
    assert_eq!(report["queries"][0]["latency_ms"]["count"], 27);
    assert_eq!(report["metrics"]["counters"]["search.queries"], 27);
    assert_eq!(report["metrics"]["histograms"]["index.build_ms"]["count"], 1);
    assert_eq!(report["metrics"]["gauges"]["index.products"], 3);
}
