use crate::catalog::types::{CatalogEntry, Tier};
use crate::engine::MONEY_EPSILON;
use crate::engine::category_reward::TierComputation;
use crate::engine::policy::tier_breakdown;
use crate::engine::tier::{fallback_tier, qualifying_tiers};
use crate::engine::types::RewardResult;
use crate::spending::SpendingVector;

/// Evaluates one product against a spending vector, producing its best
/// tier's result ready for ranking.
pub fn evaluate_product(
    entry: &CatalogEntry,
    spending: &SpendingVector,
    miles_rate: f64,
) -> RewardResult {
    evaluate_product_with(entry, spending, miles_rate, None)
}

/// Variant used by the two-product allocator to pin a `TopGroupBonus`
/// product to an enumerated group choice.
pub(crate) fn evaluate_product_with(
    entry: &CatalogEntry,
    spending: &SpendingVector,
    miles_rate: f64,
    claims: Option<&[usize]>,
) -> RewardResult {
    if entry.tiers.is_empty() {
        return RewardResult {
            product_id: entry.id.clone(),
            product_name: entry.name.clone(),
            tier_description: "No reward tiers".to_string(),
            monthly_reward: 0.0,
            original_reward: 0.0,
            cap_reached: false,
            cap_difference: None,
            min_spend_met: false,
            breakdown: Vec::new(),
            notes: vec!["product defines no reward tiers, treated as zero reward".to_string()],
        };
    }

    let candidates = qualifying_tiers(entry, spending);
    let min_spend_met = !candidates.is_empty();

    let mut best: Option<RewardResult> = None;
    if min_spend_met {
        for tier in candidates {
            let computation = tier_breakdown(entry, tier, spending, miles_rate, claims);
            let result = finalize(entry, tier, computation, true);
            let improves = best
                .as_ref()
                .is_none_or(|current| result.monthly_reward > current.monthly_reward + MONEY_EPSILON);
            if improves {
                best = Some(result);
            }
        }
    } else {
        // Synthetic base-rate tier keeps a non-qualifying user on a
        // non-bonus return instead of zero.
        let lowest = entry
            .tiers
            .iter()
            .min_by(|left, right| {
                left.min_spend
                    .unwrap_or(0.0)
                    .total_cmp(&right.min_spend.unwrap_or(0.0))
            })
            .map(fallback_tier);
        if let Some(tier) = lowest {
            let computation = tier_breakdown(entry, &tier, spending, miles_rate, claims);
            best = Some(finalize(entry, &tier, computation, false));
        }
    }

    best.unwrap_or_else(|| RewardResult {
        product_id: entry.id.clone(),
        product_name: entry.name.clone(),
        tier_description: "No suitable tier".to_string(),
        monthly_reward: 0.0,
        original_reward: 0.0,
        cap_reached: false,
        cap_difference: None,
        min_spend_met: false,
        breakdown: Vec::new(),
        notes: Vec::new(),
    })
}

fn finalize(
    entry: &CatalogEntry,
    tier: &Tier,
    computation: TierComputation,
    min_spend_met: bool,
) -> RewardResult {
    let original_reward = computation.original_reward();
    let pre_tier_total = computation.capped_total;
    let category_capped = original_reward - pre_tier_total > MONEY_EPSILON;

    let (monthly_reward, tier_capped, cap_difference) = match tier.cap {
        Some(cap) => (
            pre_tier_total.min(cap),
            pre_tier_total > cap,
            Some((pre_tier_total - cap).abs()),
        ),
        None if category_capped => (
            pre_tier_total,
            false,
            Some(original_reward - pre_tier_total),
        ),
        None => (pre_tier_total, false, None),
    };

    RewardResult {
        product_id: entry.id.clone(),
        product_name: entry.name.clone(),
        tier_description: tier.description.clone(),
        monthly_reward,
        original_reward,
        cap_reached: category_capped || tier_capped,
        cap_difference,
        min_spend_met,
        breakdown: computation.lines,
        notes: computation.notes,
    }
}

/// Evaluates every product in the catalog and ranks the results by monthly
/// reward, descending, product id breaking ties.
pub fn rank_products(
    catalog: &[CatalogEntry],
    spending: &SpendingVector,
    miles_rate: f64,
) -> Vec<RewardResult> {
    let mut results: Vec<RewardResult> = catalog
        .iter()
        .map(|entry| evaluate_product(entry, spending, miles_rate))
        .collect();
    results.sort_by(|left, right| {
        right
            .monthly_reward
            .total_cmp(&left.monthly_reward)
            .then_with(|| left.product_id.cmp(&right.product_id))
    });
    results
}

#[cfg(test)]
mod tests {
    use super::{evaluate_product, rank_products};
    use crate::catalog::types::{
        CapKind, CatalogEntry, ProductKind, RateCap, RateEntry, RewardPolicy, Tier,
    };
    use crate::spending::{Category, SpendingVector};

    fn spend(pairs: &[(Category, f64)]) -> SpendingVector {
        SpendingVector::from_pairs(pairs.iter().copied()).unwrap_or_default()
    }

    fn entry(id: &str, kind: ProductKind, tiers: Vec<Tier>) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            name: format!("Card {id}"),
            issuer: "Bank".to_string(),
            kind,
            categories: Vec::new(),
            tiers,
            policy: RewardPolicy::Standard,
        }
    }

    fn dining_tier(rate: f64, cap: Option<RateCap>, base_rate: f64) -> Tier {
        Tier {
            min_spend: None,
            cap: None,
            base_rate,
            rates: vec![RateEntry {
                category: Category::Dining,
                rate,
                cap,
                cap_group: None,
            }],
            description: "dining tier".to_string(),
        }
    }

    #[test]
    fn capped_dining_cashback_reports_cap_details() {
        // base 1%, dining 6% capped at $80 earned, $2000 dining spend
        let product = entry(
            "prd_a",
            ProductKind::Cashback,
            vec![dining_tier(
                6.0,
                Some(RateCap {
                    amount: 80.0,
                    kind: CapKind::Earned,
                }),
                1.0,
            )],
        );
        let result = evaluate_product(&product, &spend(&[(Category::Dining, 2000.0)]), 0.02);
        assert!((result.original_reward - 120.0).abs() < 1e-9);
        assert!((result.monthly_reward - 80.0).abs() < 1e-9);
        assert!(result.cap_reached);
        assert_eq!(result.cap_difference, Some(40.0));
        assert!(result.min_spend_met);
    }

    #[test]
    fn uncapped_miles_dining_reward() {
        // 4 mpd dining, cap $100 earned, milesRate 0.02, $50 dining spend
        let product = entry(
            "prd_b",
            ProductKind::Miles,
            vec![dining_tier(
                4.0,
                Some(RateCap {
                    amount: 100.0,
                    kind: CapKind::Earned,
                }),
                0.4,
            )],
        );
        let result = evaluate_product(&product, &spend(&[(Category::Dining, 50.0)]), 0.02);
        assert!((result.monthly_reward - 4.0).abs() < 1e-9);
        assert!(!result.cap_reached);
    }

    #[test]
    fn tier_cap_clips_total_and_reports_distance_both_ways() {
        let mut tier = dining_tier(6.0, None, 1.0);
        tier.cap = Some(100.0);
        let product = entry("prd_c", ProductKind::Cashback, vec![tier]);

        let over = evaluate_product(&product, &spend(&[(Category::Dining, 3000.0)]), 0.02);
        assert!((over.original_reward - 180.0).abs() < 1e-9);
        assert!((over.monthly_reward - 100.0).abs() < 1e-9);
        assert!(over.cap_reached);
        assert_eq!(over.cap_difference, Some(80.0));

        let under = evaluate_product(&product, &spend(&[(Category::Dining, 1000.0)]), 0.02);
        assert!((under.monthly_reward - 60.0).abs() < 1e-9);
        assert!(!under.cap_reached);
        assert_eq!(under.cap_difference, Some(40.0));
    }

    #[test]
    fn breakdown_lines_sum_to_original_reward() {
        let product = entry(
            "prd_d",
            ProductKind::Cashback,
            vec![dining_tier(
                6.0,
                Some(RateCap {
                    amount: 80.0,
                    kind: CapKind::Earned,
                }),
                1.0,
            )],
        );
        let result = evaluate_product(
            &product,
            &spend(&[(Category::Dining, 2000.0), (Category::Utilities, 500.0)]),
            0.02,
        );
        let line_sum: f64 = result.breakdown.iter().map(|line| line.reward).sum();
        assert!((line_sum - result.original_reward).abs() < 1e-9);
    }

    #[test]
    fn product_without_tiers_is_zero_reward_with_note() {
        let product = entry("prd_e", ProductKind::Cashback, Vec::new());
        let result = evaluate_product(&product, &spend(&[(Category::Dining, 100.0)]), 0.02);
        assert_eq!(result.monthly_reward, 0.0);
        assert!(!result.min_spend_met);
        assert!(!result.notes.is_empty());
    }

    #[test]
    fn unmet_minimum_earns_base_rate_via_synthetic_tier() {
        let mut tier = dining_tier(6.0, None, 1.0);
        tier.min_spend = Some(800.0);
        let product = entry("prd_f", ProductKind::Cashback, vec![tier]);
        let result = evaluate_product(&product, &spend(&[(Category::Dining, 500.0)]), 0.02);
        assert!(!result.min_spend_met);
        assert!((result.monthly_reward - 5.0).abs() < 1e-9);
        assert_eq!(result.tier_description, "Base rate (minimum spend not met)");
    }

    #[test]
    fn best_qualifying_tier_by_reward_wins() {
        let low = Tier {
            min_spend: None,
            cap: None,
            base_rate: 0.5,
            rates: Vec::new(),
            description: "low".to_string(),
        };
        let high = Tier {
            min_spend: Some(500.0),
            cap: None,
            base_rate: 2.0,
            rates: Vec::new(),
            description: "high".to_string(),
        };
        let product = entry("prd_g", ProductKind::Cashback, vec![low, high]);
        let result = evaluate_product(&product, &spend(&[(Category::Other, 1000.0)]), 0.02);
        assert_eq!(result.tier_description, "high");
        assert!((result.monthly_reward - 20.0).abs() < 1e-9);
    }

    #[test]
    fn rank_orders_by_monthly_reward_descending() {
        let strong = entry(
            "prd_strong",
            ProductKind::Cashback,
            vec![dining_tier(6.0, None, 1.0)],
        );
        let weak = entry(
            "prd_weak",
            ProductKind::Cashback,
            vec![dining_tier(2.0, None, 1.0)],
        );
        let ranked = rank_products(
            &[weak, strong],
            &spend(&[(Category::Dining, 1000.0)]),
            0.02,
        );
        assert_eq!(ranked[0].product_id, "prd_strong");
        assert_eq!(ranked[1].product_id, "prd_weak");
    }
}
