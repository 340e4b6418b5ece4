use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

use crate::contracts::types::CatalogIssue;
use crate::spending::Category;

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct EngineError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl EngineError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `cardwise {cmd} --help` for usage."),
            None => "Run `cardwise --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn invalid_miles_rate(value: f64) -> Self {
        Self::new(
            "invalid_miles_rate",
            &format!("Miles rate must be a positive number, got `{value}`."),
            vec![
                "Pass a positive currency-per-mile value, e.g. `--miles-rate 0.02`.".to_string(),
            ],
        )
    }

    pub fn invalid_spend_amount(category: &str, detail: &str) -> Self {
        Self::new(
            "invalid_spend_amount",
            &format!("Spending for `{category}` is invalid: {detail}"),
            vec![
                "Use non-negative numeric amounts for every category.".to_string(),
                "Fix the spending file and rerun the command.".to_string(),
            ],
        )
        .with_data(json!({
            "category": category,
        }))
    }

    pub fn unknown_category(raw: &str) -> Self {
        let known = Category::ALL
            .iter()
            .map(|category| category.as_str())
            .collect::<Vec<&str>>();
        Self::new(
            "unknown_category",
            &format!("`{raw}` is not a recognized spending category."),
            vec![
                "Use only the category names listed under `known_categories`.".to_string(),
                "Fold unlisted spending into the `other` category.".to_string(),
            ],
        )
        .with_data(json!({
            "received_category": raw,
            "known_categories": known,
        }))
    }

    pub fn invalid_spend_format(message: &str, received_format: &str) -> Self {
        Self::new(
            "invalid_spend_format",
            message,
            vec![
                "Provide spending as a JSON object of category to amount, or CSV with `category,amount` headers.".to_string(),
                "Run `cardwise rank --help` to review the spending file formats.".to_string(),
            ],
        )
        .with_data(json!({
            "received_format": received_format,
            "supported_formats": ["json_object", "csv"],
        }))
    }

    pub fn spend_file_not_found(path: &str) -> Self {
        Self::new(
            "spend_file_not_found",
            &format!("Spending file `{path}` was not found."),
            vec![
                "Check the path and rerun the command.".to_string(),
                "Use `-` to read spending data from stdin.".to_string(),
            ],
        )
    }

    pub fn catalog_file_not_found(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "catalog_file_not_found",
            &format!("Catalog file `{location}` was not found."),
            vec![
                "Check the `--catalog` path, or omit it to use the built-in catalog.".to_string(),
            ],
        )
    }

    pub fn catalog_invalid_json(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "catalog_invalid_json",
            &format!("Catalog file `{location}` is not valid catalog JSON: {detail}"),
            vec![
                "Fix the JSON syntax or field types reported in the details.".to_string(),
                "Run `cardwise catalog list` with no `--catalog` flag to see a working built-in catalog.".to_string(),
            ],
        )
    }

    pub fn catalog_validation_failed(issues: Vec<CatalogIssue>) -> Self {
        let issue_count = issues.len();
        Self::new(
            "catalog_validation_failed",
            &format!("Catalog failed validation: {issue_count} issues found. No products were loaded."),
            vec![
                "Fix the listed issues in the catalog file.".to_string(),
                "Rerun `cardwise catalog list` to confirm the catalog loads.".to_string(),
            ],
        )
        .with_data(json!({
            "issues": issues,
        }))
    }

    pub fn product_not_found(product_id: &str, known_ids: &[String]) -> Self {
        Self::new(
            "product_not_found",
            &format!("Product id `{product_id}` was not found in the catalog."),
            vec![
                "Run `cardwise catalog list` to find a valid product id.".to_string(),
            ],
        )
        .with_data(json!({
            "product_id": product_id,
            "known_ids": known_ids,
        }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
