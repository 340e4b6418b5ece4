use crate::catalog::builtin::{BUILTIN_SOURCE, builtin_catalog, sample_spending};
use crate::catalog::validate::validate_catalog;
use crate::commands::common::{now_timestamp, pair_side, reward_row, round2};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{PairRow, PairsData, RankData, RewardRow};
use crate::engine::product::evaluate_product;
use crate::engine::search::search_pairs;
use crate::error::EngineResult;

const DEMO_MILES_RATE: f64 = 0.02;
const DEMO_TOP: usize = 5;

/// Runs the built-in catalog against bundled sample spending, so a fresh
/// install can see real output with no inputs prepared.
pub fn run(topic: &str) -> EngineResult<SuccessEnvelope> {
    match topic {
        "pairs" => pairs(),
        _ => rank(),
    }
}

fn rank() -> EngineResult<SuccessEnvelope> {
    let validated = validate_catalog(builtin_catalog())?;
    let spending = sample_spending();

    let mut rows: Vec<RewardRow> = validated
        .entries
        .iter()
        .map(|entry| reward_row(entry, &evaluate_product(entry, &spending, DEMO_MILES_RATE)))
        .collect();
    rows.sort_by(|left, right| {
        right
            .monthly_reward
            .total_cmp(&left.monthly_reward)
            .then_with(|| left.product_id.cmp(&right.product_id))
    });
    let product_count = rows.len();

    let data = RankData {
        catalog_source: BUILTIN_SOURCE.to_string(),
        product_count,
        miles_rate: DEMO_MILES_RATE,
        spend_total: spending.total(),
        rows,
        warnings: validated.warnings,
        completed_at: now_timestamp(),
    };
    success("demo rank", data)
}

fn pairs() -> EngineResult<SuccessEnvelope> {
    let validated = validate_catalog(builtin_catalog())?;
    let spending = sample_spending();

    let allocations = search_pairs(&validated.entries, &spending, DEMO_MILES_RATE);
    let pair_count = allocations.len();
    let shown = DEMO_TOP.min(pair_count);
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
        catalog_source: BUILTIN_SOURCE.to_string(),
        product_count: validated.entries.len(),
        pair_count,
        shown,
        miles_rate: DEMO_MILES_RATE,
        spend_total: spending.total(),
        rows,
        warnings: validated.warnings,
        completed_at: now_timestamp(),
    };
    success("demo pairs", data)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn demo_rank_produces_ranked_rows() {
        let envelope = run("rank");
        assert!(envelope.is_ok());
        if let Ok(envelope) = envelope {
            assert_eq!(envelope.command, "demo rank");
            let rows = envelope.data.get("rows").and_then(|rows| rows.as_array());
            assert!(rows.is_some());
            if let Some(rows) = rows {
                assert_eq!(rows.len(), 10);
            }
        }
    }

    #[test]
    fn demo_pairs_shows_top_combinations() {
        let envelope = run("pairs");
        assert!(envelope.is_ok());
        if let Ok(envelope) = envelope {
            assert_eq!(envelope.command, "demo pairs");
            let pair_count = envelope
                .data
                .get("pair_count")
                .and_then(|count| count.as_u64());
            // 10 products -> 45 unordered pairs.
            assert_eq!(pair_count, Some(45));
        }
    }
}
