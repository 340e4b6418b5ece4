use std::path::Path;

use crate::catalog::source::load_catalog;
use crate::catalog::types::ProductKind;
use crate::commands::common::{
    filter_by_kind, now_timestamp, pair_side, read_spend_input, round2, validate_miles_rate,
};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{PairRow, PairsData};
use crate::engine::search::search_pairs;
use crate::error::EngineResult;
use crate::spending::parse::parse_spending;

#[derive(Debug)]
pub struct PairsOptions<'a> {
    pub spend_path: &'a str,
    pub catalog_override: Option<&'a Path>,
    pub miles_rate: f64,
    pub kind: Option<ProductKind>,
    pub top: Option<usize>,
}

/// Searches every unordered product pair for the best two-product split.
pub fn run(options: PairsOptions<'_>) -> EngineResult<SuccessEnvelope> {
    let miles_rate = validate_miles_rate(options.miles_rate)?;
    let catalog = load_catalog(options.catalog_override)?;
    let entries = filter_by_kind(catalog.entries, options.kind);
    let content = read_spend_input(options.spend_path)?;
    let spending = parse_spending(&content)?;

    let allocations = search_pairs(&entries, &spending, miles_rate);
    let pair_count = allocations.len();
    let shown = match options.top {
        Some(top) => top.min(pair_count),
        None => pair_count,
    };

    let rows: Vec<PairRow> = allocations
        .into_iter()
        .take(shown)
        .map(|allocation| PairRow {
            combined_reward: round2(allocation.combined_reward),
            first: pair_side(&allocation.first),
            second: pair_side(&allocation.second),
        })
        .collect();

    let data = PairsData {
        catalog_source: catalog.source.label(),
        product_count: entries.len(),
        pair_count,
        shown,
        miles_rate,
        spend_total: spending.total(),
        rows,
        warnings: catalog.warnings,
        completed_at: now_timestamp(),
    };
    success("pairs", data)
}
