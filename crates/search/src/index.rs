//! Searchable index built from a catalog snapshot.

use crate::error::Result;
use crate::options::MatcherOptions;
use crate::product::{Catalog, Field, Product};
use std::collections::HashMap;

/// Rounding applied to field-length norms (three decimal places).
const NORM_MANTISSA: f64 = 1000.0;

/// Field-length normalization, cached per token count.
///
/// A match in a short field counts for more than the same match buried in a
/// long description.
pub(crate) struct FieldNorm {
    weight: f64,
    cache: HashMap<usize, f64>,
}

impl FieldNorm {
    pub fn new(weight: f64) -> Self {
        Self {
            weight,
            cache: HashMap::new(),
        }
    }

    /// `1 / tokens^(weight / 2)`, rounded; tokens are split on spaces only.
    pub fn get(&mut self, text: &str) -> f64 {
        let tokens = text.split(' ').filter(|t| !t.is_empty()).count().max(1);
        let weight = self.weight;
        *self.cache.entry(tokens).or_insert_with(|| {
            let norm = 1.0 / (tokens as f64).powf(0.5 * weight);
            (norm * NORM_MANTISSA).round() / NORM_MANTISSA
        })
    }
}

/// One indexed field value of one product.
#[derive(Debug, Clone)]
pub(crate) struct IndexedField {
    /// Position in [`MatcherOptions::fields`]
    pub slot: usize,
    /// Normalized characters
    pub text: Vec<char>,
    pub norm: f64,
}

/// All indexed fields of one product.
#[derive(Debug, Clone)]
pub(crate) struct IndexedRecord {
    /// Position in the catalog
    pub position: usize,
    pub fields: Vec<IndexedField>,
}

/// Immutable search index over a catalog snapshot.
///
/// To pick up catalog changes, build a new index and replace the old one;
/// see [`crate::SharedIndex`].
#[derive(Debug, Clone)]
pub struct Index {
    catalog: Catalog,
    options: MatcherOptions,
    weights: Vec<f64>,
    records: Vec<IndexedRecord>,
}

impl Index {
    /// Build an index, validating `options` first.
    ///
    /// Blank field values are skipped; a product with no searchable text is
    /// kept in the catalog but can never match.
    pub fn new(catalog: impl Into<Catalog>, options: MatcherOptions) -> Result<Self> {
        options.validate()?;
        let catalog = catalog.into();
        let mut norm = FieldNorm::new(options.field_norm_weight);

        let records: Vec<IndexedRecord> = catalog
            .products()
            .iter()
            .enumerate()
            .filter_map(|(position, product)| {
                let fields: Vec<IndexedField> = options
                    .fields
                    .iter()
                    .enumerate()
                    .filter_map(|(slot, spec)| {
                        let raw = product.text(spec.field);
                        if raw.trim().is_empty() {
                            return None;
                        }
                        Some(IndexedField {
                            slot,
                            text: normalize(raw, options.case_sensitive),
                            norm: norm.get(raw),
                        })
                    })
                    .collect();

                (!fields.is_empty()).then_some(IndexedRecord { position, fields })
            })
            .collect();

        tracing::debug!(
            products = catalog.len(),
            searchable = records.len(),
            fields = options.fields.len(),
            threshold = options.threshold,
            "Search index built"
        );

        Ok(Self {
            weights: options.normalized_weights(),
            catalog,
            options,
            records,
        })
    }

    /// The catalog snapshot this index was built from.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Options the index was built with.
    pub fn options(&self) -> &MatcherOptions {
        &self.options
    }

    /// Product at a catalog position.
    pub fn product(&self, position: usize) -> Option<&Product> {
        self.catalog.get(position)
    }

    /// Number of products in the underlying catalog.
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    /// True if the underlying catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    pub(crate) fn records(&self) -> &[IndexedRecord] {
        &self.records
    }

    pub(crate) fn field_at(&self, slot: usize) -> Field {
        self.options.fields[slot].field
    }

    pub(crate) fn weight_at(&self, slot: usize) -> f64 {
        self.weights[slot]
    }
}

/// Case-fold (unless case-sensitive) and split into characters.
///
/// Folding is one character in, one character out, so match positions index
/// the original text. A character whose lowercase form expands (`İ`) keeps
/// only the first character of it.
pub(crate) fn normalize(text: &str, case_sensitive: bool) -> Vec<char> {
    if case_sensitive {
        text.chars().collect()
    } else {
        text.chars()
            .map(|c| c.to_lowercase().next().unwrap_or(c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new(1, "Red Shoes").with_category("Footwear"),
            Product::new(2, "   "),
            Product::new(3, "Blue Hat").with_description("  "),
        ]
    }

    #[test]
    fn test_field_norm() {
        let mut norm = FieldNorm::new(1.0);
        assert_eq!(norm.get("shoes"), 1.0);
        assert_eq!(norm.get("red shoes"), 0.707);
        assert_eq!(norm.get("a  b   c d"), 0.5);
    }

    #[test]
    fn test_field_norm_weight_zero() {
        let mut norm = FieldNorm::new(0.0);
        assert_eq!(norm.get("one two three four"), 1.0);
    }

    #[test]
    fn test_blank_fields_skipped() {
        let index = Index::new(catalog(), MatcherOptions::default()).unwrap();
        assert_eq!(index.len(), 3);

        let records = index.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].position, 0);
        assert_eq!(records[0].fields.len(), 2);
        assert_eq!(records[1].position, 2);
        assert_eq!(records[1].fields.len(), 1);
    }

    #[test]
    fn test_text_is_case_folded() {
        let index = Index::new(catalog(), MatcherOptions::default()).unwrap();
        let text: String = index.records()[0].fields[0].text.iter().collect();
        assert_eq!(text, "red shoes");
    }

    #[test]
    fn test_folding_keeps_character_positions() {
        let text = "İzmir Hat";
        let folded = normalize(text, false);
        assert_eq!(folded.len(), text.chars().count());
        assert_eq!(folded.iter().collect::<String>(), "izmir hat");
    }

    #[test]
    fn test_case_sensitive_keeps_text() {
        let options = MatcherOptions::default().case_sensitive();
        let index = Index::new(catalog(), options).unwrap();
        let text: String = index.records()[0].fields[0].text.iter().collect();
        assert_eq!(text, "Red Shoes");
    }

    #[test]
    fn test_invalid_options_fail_build() {
        let options = MatcherOptions::default().with_threshold(1.5);
        let err = Index::new(catalog(), options).unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_empty_catalog() {
        let index = Index::new(Vec::<Product>::new(), MatcherOptions::default()).unwrap();
        assert!(index.is_empty());
        assert!(index.records().is_empty());
    }
}
