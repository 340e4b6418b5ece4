use std::path::Path;

use crate::catalog::source::load_catalog;
use crate::commands::common::{
    now_timestamp, read_spend_input, reward_lines, reward_row, validate_miles_rate,
};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::BreakdownData;
use crate::engine::product::evaluate_product;
use crate::error::{EngineError, EngineResult};
use crate::spending::parse::parse_spending;

#[derive(Debug)]
pub struct BreakdownOptions<'a> {
    pub product_id: &'a str,
    pub spend_path: &'a str,
    pub catalog_override: Option<&'a Path>,
    pub miles_rate: f64,
}

/// One product's full per-category reward breakdown for a spending vector.
pub fn run(options: BreakdownOptions<'_>) -> EngineResult<SuccessEnvelope> {
    let miles_rate = validate_miles_rate(options.miles_rate)?;
    let catalog = load_catalog(options.catalog_override)?;
    let entry = catalog
        .entries
        .iter()
        .find(|entry| entry.id == options.product_id)
        .ok_or_else(|| {
            let known_ids: Vec<String> = catalog
                .entries
                .iter()
                .map(|entry| entry.id.clone())
                .collect();
            EngineError::product_not_found(options.product_id, &known_ids)
        })?;
    let content = read_spend_input(options.spend_path)?;
    let spending = parse_spending(&content)?;

    let result = evaluate_product(entry, &spending, miles_rate);
    let data = BreakdownData {
        catalog_source: catalog.source.label(),
        miles_rate,
        spend_total: spending.total(),
        row: reward_row(entry, &result),
        lines: reward_lines(&result),
        completed_at: now_timestamp(),
    };
    success("breakdown", data)
}
