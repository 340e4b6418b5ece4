use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::catalog::types::CatalogEntry;
use crate::catalog::validate::{ValidatedCatalog, validate_catalog};
use crate::error::{EngineError, EngineResult};

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    products: Vec<CatalogEntry>,
}

/// Parses catalog JSON: either a top-level array of products or an object
/// with a `products` array. The parsed catalog is validated before use.
pub fn parse_catalog(content: &str, origin: &Path) -> EngineResult<ValidatedCatalog> {
    let value: Value = serde_json::from_str(content)
        .map_err(|error| EngineError::catalog_invalid_json(origin, &error.to_string()))?;

    let entries: Vec<CatalogEntry> = if value.is_array() {
        serde_json::from_value(value)
            .map_err(|error| EngineError::catalog_invalid_json(origin, &error.to_string()))?
    } else {
        let document: CatalogDocument = serde_json::from_value(value)
            .map_err(|error| EngineError::catalog_invalid_json(origin, &error.to_string()))?;
        document.products
    };

    validate_catalog(entries)
}

pub fn load_catalog_file(path: &Path) -> EngineResult<ValidatedCatalog> {
    let content = fs::read_to_string(path).map_err(|error| {
        if error.kind() == io::ErrorKind::NotFound {
            EngineError::catalog_file_not_found(path)
        } else {
            EngineError::catalog_invalid_json(path, &error.to_string())
        }
    })?;
    parse_catalog(&content, path)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::parse_catalog;

    const MINIMAL: &str = r#"
    {
      "products": [
        {
          "id": "prd_flat",
          "name": "Flat Card",
          "issuer": "Bank",
          "type": "cashback",
          "categories": ["dining"],
          "tiers": [
            {
              "base_rate": 1.5,
              "description": "Flat 1.5% on everything",
              "rates": [
                { "category": "dining", "rate": 5.0,
                  "cap": { "amount": 80.0, "kind": "earned" } }
              ]
            }
          ]
        }
      ]
    }
    "#;

    #[test]
    fn parses_object_document_with_products() {
        let parsed = parse_catalog(MINIMAL, Path::new("catalog.json"));
        assert!(parsed.is_ok());
        if let Ok(catalog) = parsed {
            assert_eq!(catalog.entries.len(), 1);
            assert_eq!(catalog.entries[0].id, "prd_flat");
        }
    }

    #[test]
    fn parses_bare_array_document() {
        let content = r#"[
          { "id": "prd_a", "name": "A", "issuer": "Bank", "type": "miles",
            "tiers": [ { "base_rate": 1.2, "description": "flat 1.2 mpd" } ] }
        ]"#;
        let parsed = parse_catalog(content, Path::new("catalog.json"));
        assert!(parsed.is_ok());
    }

    #[test]
    fn invalid_json_reports_catalog_error() {
        let parsed = parse_catalog("{ not json", Path::new("broken.json"));
        assert!(parsed.is_err());
        if let Err(error) = parsed {
            assert_eq!(error.code, "catalog_invalid_json");
        }
    }

    #[test]
    fn unknown_policy_kind_is_rejected() {
        let content = r#"[
          { "id": "prd_a", "name": "A", "issuer": "Bank", "type": "miles",
            "policy": { "kind": "mystery" },
            "tiers": [ { "base_rate": 1.2, "description": "flat" } ] }
        ]"#;
        let parsed = parse_catalog(content, Path::new("catalog.json"));
        assert!(parsed.is_err());
    }
}
