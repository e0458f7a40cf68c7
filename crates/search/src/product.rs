//! Product records and catalog snapshots.
//!
//! Product data comes from an external API whose records are loosely typed:
//! some endpoints send `title`, others `name`, and optional text fields may be
//! `null` or even numbers. All of that is resolved here, once, so the matcher
//! only ever sees a [`Product`] with plain strings.

use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Opaque product identifier, passed back to the caller on selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    /// Numeric database id
    Number(i64),
    /// String id (slugs, UUIDs, non-integral numbers)
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<i32> for ProductId {
    fn from(id: i32) -> Self {
        Self::Number(i64::from(id))
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

/// A text attribute of a product that can take part in matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// Display name (`title` in some payloads)
    #[serde(alias = "title")]
    Name,
    /// Short category label
    Category,
    /// Free-text description
    Description,
}

impl Field {
    /// The fields searched when nothing else is configured.
    pub const DEFAULT: [Field; 3] = [Field::Name, Field::Category, Field::Description];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Category => "category",
            Self::Description => "description",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" | "title" => Ok(Self::Name),
            "category" => Ok(Self::Category),
            "description" => Ok(Self::Description),
            other => Err(SearchError::config(format!("unknown field `{other}`"))),
        }
    }
}

/// A product record as the matcher sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawProduct", rename_all = "camelCase")]
pub struct Product {
    /// Identifier handed back on selection
    pub id: ProductId,
    /// Display name, resolved from `title` or `name`
    pub name: String,
    /// Category label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Description text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display price, never used for matching
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Display image, never used for matching
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Product {
    /// Create a product with just an id and a name.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: None,
            description: None,
            price: None,
            image_url: None,
        }
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the display price.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Text of a searchable field; missing fields read as empty.
    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Category => self.category.as_deref().unwrap_or_default(),
            Field::Description => self.description.as_deref().unwrap_or_default(),
        }
    }
}

/// Wire shape accepted from the catalog API before normalization.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProduct {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    title: Value,
    #[serde(default)]
    name: Value,
    #[serde(default)]
    category: Value,
    #[serde(default)]
    description: Value,
    #[serde(default)]
    price: Value,
    #[serde(default)]
    image_url: Value,
}

impl TryFrom<RawProduct> for Product {
    type Error = String;

    fn try_from(raw: RawProduct) -> std::result::Result<Self, Self::Error> {
        let id = match raw.id {
            Value::Number(n) => match n.as_i64() {
                Some(i) => ProductId::Number(i),
                None => ProductId::Text(n.to_string()),
            },
            Value::String(s) => ProductId::Text(s),
            Value::Null => return Err("product record without `id`".to_string()),
            other => return Err(format!("unsupported product id: {other}")),
        };

        let name = lenient_text(raw.title)
            .filter(|t| !t.trim().is_empty())
            .or_else(|| lenient_text(raw.name))
            .unwrap_or_default();

        let price = match raw.price {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };

        Ok(Self {
            id,
            name,
            category: lenient_text(raw.category),
            description: lenient_text(raw.description),
            price,
            image_url: lenient_text(raw.image_url),
        })
    }
}

/// Coerce a loosely typed JSON value into text; structures and null read as absent.
fn lenient_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// An immutable snapshot of the product catalog.
///
/// Cloning a `Catalog` shares its records instead of copying them.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Arc<[Product]>,
    reported_total: Option<u64>,
}

impl Catalog {
    /// Wrap a list of products.
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: products.into(),
            reported_total: None,
        }
    }

    /// Parse a catalog snapshot.
    ///
    /// Accepts either a bare array of products or a paged envelope
    /// `{ "products": [...], "total": N }`. An envelope without `products`
    /// is an empty page.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Build a catalog from an already-parsed JSON document.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(_) => {
                let products: Vec<Product> = serde_json::from_value(value)?;
                Ok(Self::new(products))
            }
            Value::Object(mut envelope) => {
                let reported_total = envelope.get("total").and_then(Value::as_u64);
                let products: Vec<Product> = match envelope.remove("products") {
                    Some(Value::Null) | None => Vec::new(),
                    Some(list) => serde_json::from_value(list)?,
                };
                Ok(Self {
                    products: products.into(),
                    reported_total,
                })
            }
            other => Err(SearchError::InvalidCatalog(format!(
                "expected an array or a paged object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Concatenate pages in order into one snapshot.
    ///
    /// The reported total is taken from the last page that carries one.
    pub fn from_pages(pages: impl IntoIterator<Item = Catalog>) -> Self {
        let mut products = Vec::new();
        let mut reported_total = None;
        for page in pages {
            products.extend(page.products.iter().cloned());
            reported_total = page.reported_total.or(reported_total);
        }
        Self {
            products: products.into(),
            reported_total,
        }
    }

    /// All products in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Product at a catalog position.
    pub fn get(&self, position: usize) -> Option<&Product> {
        self.products.get(position)
    }

    /// Number of products in this snapshot.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// True if the snapshot holds no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Total product count advertised by the API, if the snapshot was paged.
    pub fn reported_total(&self) -> Option<u64> {
        self.reported_total
    }
}

impl From<Vec<Product>> for Catalog {
    fn from(products: Vec<Product>) -> Self {
        Self::new(products)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_title_preferred_over_name() {
        let product: Product =
            serde_json::from_value(json!({"id": 1, "title": "Canvas Tote", "name": "tote"}))
                .unwrap();
        assert_eq!(product.name, "Canvas Tote");
    }

    #[test]
    fn test_blank_title_falls_back_to_name() {
        let product: Product =
            serde_json::from_value(json!({"id": 1, "title": "  ", "name": "Tote"})).unwrap();
        assert_eq!(product.name, "Tote");
    }

    #[test]
    fn test_malformed_fields_read_as_empty() {
        let product: Product = serde_json::from_value(json!({
            "id": "sku-9",
            "name": "Lamp",
            "category": null,
            "description": {"html": "<p>x</p>"},
            "price": "19.5"
        }))
        .unwrap();

        assert_eq!(product.id, ProductId::Text("sku-9".into()));
        assert_eq!(product.text(Field::Category), "");
        assert_eq!(product.text(Field::Description), "");
        assert_eq!(product.price, Some(19.5));
    }

    #[test]
    fn test_numeric_text_is_kept() {
        let product: Product =
            serde_json::from_value(json!({"id": 3, "name": 2024, "category": true})).unwrap();
        assert_eq!(product.name, "2024");
        assert_eq!(product.text(Field::Category), "true");
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let err = Catalog::from_json(r#"[{"name": "Ghost"}]"#).unwrap_err();
        assert!(matches!(err, SearchError::InvalidCatalog(msg) if msg.contains("id")));
    }

    #[test]
    fn test_paged_envelope() {
        let catalog = Catalog::from_json(
            r#"{"products": [{"id": 1, "title": "Mug"}, {"id": 2, "title": "Cup"}], "total": 40}"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.reported_total(), Some(40));
    }

    #[test]
    fn test_envelope_without_products_is_empty() {
        let catalog = Catalog::from_json(r#"{"total": 0}"#).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_scalar_document_is_rejected() {
        assert!(Catalog::from_json("42").is_err());
    }

    #[test]
    fn test_from_pages_keeps_order_and_last_total() {
        let first = Catalog::from_json(r#"{"products":[{"id":1,"name":"Mug"}],"total":3}"#).unwrap();
        let second = Catalog::new(vec![Product::new(2, "Cup")]);
        let third = Catalog::from_json(r#"{"products":[{"id":3,"name":"Jug"}],"total":4}"#).unwrap();

        let merged = Catalog::from_pages([first.clone(), second, third]);
        let names: Vec<_> = merged.products().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Mug", "Cup", "Jug"]);
        assert_eq!(merged.reported_total(), Some(4));
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn test_from_no_pages_is_empty() {
        let merged = Catalog::from_pages(Vec::new());
        assert!(merged.is_empty());
        assert_eq!(merged.reported_total(), None);
    }

    #[test]
    fn test_field_parsing() {
        assert_eq!("Title".parse::<Field>().unwrap(), Field::Name);
        assert_eq!(" category ".parse::<Field>().unwrap(), Field::Category);
        assert!("price".parse::<Field>().is_err());
    }

    #[test]
    fn test_serialize_uses_camel_case() {
        let mut product = Product::new(7, "Lamp");
        product.image_url = Some("/lamp.png".into());
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["imageUrl"], "/lamp.png");
        assert_eq!(json["id"], 7);
    }
}
