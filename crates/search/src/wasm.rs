//! WASM bindings for the storefront search box.

use crate::{Catalog, Index, MatcherOptions};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct Hit<'a> {
    id: &'a crate::ProductId,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<f64>,
    score: f64,
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn render(index: &Index, query: &str, limit: usize) -> Result<String, JsValue> {
    let hits: Vec<Hit<'_>> = index
        .search_hits(query, limit)
        .into_iter()
        .map(|hit| Hit {
            id: &hit.product.id,
            name: &hit.product.name,
            price: hit.product.price,
            score: hit.score,
        })
        .collect();
    serde_json::to_string(&hits).map_err(to_js_error)
}

/// Index held on the JS side and queried on every keystroke.
#[wasm_bindgen]
pub struct ProductMatcher {
    index: Index,
}

#[wasm_bindgen]
impl ProductMatcher {
    /// Build from catalog JSON (array or `{ products: [...] }`) and optional
    /// options JSON. Throws on an invalid catalog or options.
    #[wasm_bindgen(constructor)]
    pub fn new(catalog_json: &str, options_json: Option<String>) -> Result<ProductMatcher, JsValue> {
        let catalog = Catalog::from_json(catalog_json).map_err(to_js_error)?;
        let options = match options_json {
            Some(json) => serde_json::from_str::<MatcherOptions>(&json).map_err(to_js_error)?,
            None => MatcherOptions::default(),
        };
        let index = Index::new(catalog, options).map_err(to_js_error)?;
        Ok(Self { index })
    }

    /// Ranked matches as a JSON array of `{ id, name, price, score }`.
    pub fn search(&self, query: &str, limit: usize) -> Result<String, JsValue> {
        render(&self.index, query, limit)
    }

    /// Number of products indexed.
    #[wasm_bindgen(getter)]
    pub fn size(&self) -> usize {
        self.index.len()
    }
}

/// One-shot search over a catalog with default options.
#[wasm_bindgen]
pub fn search_catalog(catalog_json: &str, query: &str, limit: usize) -> Result<String, JsValue> {
    let catalog = Catalog::from_json(catalog_json).map_err(to_js_error)?;
    let index = Index::new(catalog, MatcherOptions::default()).map_err(to_js_error)?;
    render(&index, query, limit)
}
