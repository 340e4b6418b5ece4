use std::fs;
use std::io::{self, Read};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::catalog::types::{CatalogEntry, ProductKind};
use crate::contracts::types::{
    CatalogProductRow, PairSideData, RewardLineData, RewardRow, SplitLineData,
};
use crate::engine::types::{ProductAllocation, RewardResult};
use crate::error::{EngineError, EngineResult};

/// Reads spending input from a file path, or from stdin when the path is `-`.
pub(crate) fn read_spend_input(path: &str) -> EngineResult<String> {
    if path == "-" {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .map_err(|error| EngineError::invalid_spend_format(
                &format!("Could not read spending data from stdin: {error}"),
                "stdin",
            ))?;
        return Ok(content);
    }
    fs::read_to_string(path).map_err(|error| {
        if error.kind() == io::ErrorKind::NotFound {
            EngineError::spend_file_not_found(path)
        } else {
            EngineError::invalid_spend_format(
                &format!("Could not read spending file `{path}`: {error}"),
                "file",
            )
        }
    })
}

pub(crate) fn validate_miles_rate(miles_rate: f64) -> EngineResult<f64> {
    if !miles_rate.is_finite() || miles_rate <= 0.0 {
        return Err(EngineError::invalid_miles_rate(miles_rate));
    }
    Ok(miles_rate)
}

pub(crate) fn filter_by_kind(
    entries: Vec<CatalogEntry>,
    kind: Option<ProductKind>,
) -> Vec<CatalogEntry> {
    match kind {
        Some(kind) => entries.into_iter().filter(|entry| entry.kind == kind).collect(),
        None => entries,
    }
}

pub(crate) fn now_timestamp() -> String {
    let now = SystemTime::now().duration_since(UNIX_EPOCH);
    match now {
        Ok(duration) => format!("{}", duration.as_secs()),
        Err(_) => "0".to_string(),
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn reward_row(entry: &CatalogEntry, result: &RewardResult) -> RewardRow {
    RewardRow {
        product_id: result.product_id.clone(),
        product_name: result.product_name.clone(),
        issuer: entry.issuer.clone(),
        kind: entry.kind.as_str().to_string(),
        tier: result.tier_description.clone(),
        monthly_reward: round2(result.monthly_reward),
        original_reward: round2(result.original_reward),
        cap_reached: result.cap_reached,
        cap_difference: result.cap_difference.map(round2),
        min_spend_met: result.min_spend_met,
        notes: result.notes.clone(),
    }
}

pub(crate) fn reward_lines(result: &RewardResult) -> Vec<RewardLineData> {
    result
        .breakdown
        .iter()
        .map(|line| RewardLineData {
            category: line.category.as_str().to_string(),
            amount: round2(line.amount),
            rate: line.rate,
            reward: round2(line.reward),
        })
        .collect()
}

pub(crate) fn split_lines(allocation: &ProductAllocation) -> Vec<SplitLineData> {
    allocation
        .split
        .entries()
        .map(|(category, amount)| SplitLineData {
            category: category.as_str().to_string(),
            amount: round2(amount),
        })
        .collect()
}

pub(crate) fn pair_side(allocation: &ProductAllocation) -> PairSideData {
    PairSideData {
        product_id: allocation.result.product_id.clone(),
        product_name: allocation.result.product_name.clone(),
        tier: allocation.result.tier_description.clone(),
        monthly_reward: round2(allocation.result.monthly_reward),
        split: split_lines(allocation),
    }
}

pub(crate) fn catalog_product_row(entry: &CatalogEntry) -> CatalogProductRow {
    CatalogProductRow {
        id: entry.id.clone(),
        name: entry.name.clone(),
        issuer: entry.issuer.clone(),
        kind: entry.kind.as_str().to_string(),
        policy: entry.policy.label().to_string(),
        categories: entry
            .categories
            .iter()
            .map(|category| category.as_str().to_string())
            .collect(),
        tier_count: entry.tiers.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::{round2, validate_miles_rate};

    #[test]
    fn miles_rate_must_be_positive_and_finite() {
        assert!(validate_miles_rate(0.02).is_ok());
        assert!(validate_miles_rate(0.0).is_err());
        assert!(validate_miles_rate(-1.0).is_err());
        assert!(validate_miles_rate(f64::NAN).is_err());
    }

    #[test]
    fn round2_rounds_to_cents() {
        assert_eq!(round2(1.005), 1.0);
        assert_eq!(round2(23.3333333), 23.33);
        assert_eq!(round2(80.0), 80.0);
    }
}
