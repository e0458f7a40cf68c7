//! Catalog snapshot loading
//!
//! Reads product lists exported from the storefront API, either a bare JSON
//! array or a `{ "products": [...], "total": n }` page.

use crate::error::{Error, Result, ResultExt};
use std::path::Path;
use storefront_search::Catalog;

/// Load one catalog file.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::file_not_found(path).with_context("While loading the catalog"));
    }

    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("Failed to read catalog {}", path.display()))?;

    let catalog = Catalog::from_json(&content)
        .map_err(Error::from)
        .context(format!("Failed to parse catalog {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        products = catalog.len(),
        total = ?catalog.reported_total(),
        "Loaded catalog"
    );
    Ok(catalog)
}

/// Load several catalog pages and concatenate them in order.
///
/// No paths gives an empty catalog.
pub fn load_pages<P: AsRef<Path>>(paths: &[P]) -> Result<Catalog> {
    let pages = paths.iter().map(load_catalog).collect::<Result<Vec<_>>>()?;
    Ok(Catalog::from_pages(pages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_load_array() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "products.json", r#"[{"id":1,"name":"Red Shoes"}]"#);

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.products()[0].name, "Red Shoes");
    }

    #[test]
    fn test_load_pages_in_order() {
        let dir = TempDir::new().unwrap();
        let first = write(
            &dir,
            "page1.json",
            r#"{"products":[{"id":1,"title":"Desk Lamp"}],"total":2}"#,
        );
        let second = write(
            &dir,
            "page2.json",
            r#"{"products":[{"id":2,"title":"Floor Lamp"}],"total":2}"#,
        );

        let catalog = load_pages(&[first, second]).unwrap();
        let names: Vec<_> = catalog.products().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Desk Lamp", "Floor Lamp"]);
        assert_eq!(catalog.reported_total(), Some(2));
    }

    #[test]
    fn test_no_pages_is_empty() {
        let catalog = load_pages::<&Path>(&[]).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = load_catalog("/nonexistent/products.json").unwrap_err();
        assert_eq!(err.code, ErrorCode::FileNotFound);
        assert_eq!(err.exit_code(), crate::error::exit_codes::FAILURE);
    }

    #[test]
    fn test_product_without_id() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.json", r#"[{"name":"Nameless"}]"#);

        let err = load_catalog(&path).unwrap_err();
        assert_eq!(err.code.category(), "Catalog");
        assert!(err.context.is_some());
    }
}
