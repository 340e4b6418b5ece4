use std::path::Path;

use crate::catalog::source::load_catalog;
use crate::catalog::types::ProductKind;
use crate::commands::common::{
    filter_by_kind, now_timestamp, read_spend_input, reward_row, validate_miles_rate,
};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{RankData, RewardRow};
use crate::engine::product::evaluate_product;
use crate::error::EngineResult;
use crate::spending::parse::parse_spending;

#[derive(Debug)]
pub struct RankOptions<'a> {
    pub spend_path: &'a str,
    pub catalog_override: Option<&'a Path>,
    pub miles_rate: f64,
    pub kind: Option<ProductKind>,
    pub top: Option<usize>,
}

/// Ranks every catalog product against the spending vector, best first.
pub fn run(options: RankOptions<'_>) -> EngineResult<SuccessEnvelope> {
    let miles_rate = validate_miles_rate(options.miles_rate)?;
    let catalog = load_catalog(options.catalog_override)?;
    let entries = filter_by_kind(catalog.entries, options.kind);
    let content = read_spend_input(options.spend_path)?;
    let spending = parse_spending(&content)?;

    let mut rows: Vec<RewardRow> = entries
        .iter()
        .map(|entry| reward_row(entry, &evaluate_product(entry, &spending, miles_rate)))
        .collect();
    rows.sort_by(|left, right| {
        right
            .monthly_reward
            .total_cmp(&left.monthly_reward)
            .then_with(|| left.product_id.cmp(&right.product_id))
    });
    let product_count = rows.len();
    if let Some(top) = options.top {
        rows.truncate(top);
    }

    let data = RankData {
        catalog_source: catalog.source.label(),
        product_count,
        miles_rate,
        spend_total: spending.total(),
        rows,
        warnings: catalog.warnings,
        completed_at: now_timestamp(),
    };
    success("rank", data)
}
