use std::collections::BTreeMap;

use crate::catalog::types::{CapKind, ProductKind, Tier};
use crate::engine::types::RewardLine;
use crate::spending::{Category, SpendingVector};

/// Per-tier computation output shared by every policy.
///
/// `lines` carry pre-earned-cap rewards so they always sum to the original
/// (uncapped) reward; `capped_total` is the total after per-category earned
/// caps and shared-group scale-down, but before the tier's overall cap.
#[derive(Debug, Clone, Default)]
pub(crate) struct TierComputation {
    pub(crate) lines: Vec<RewardLine>,
    pub(crate) capped_total: f64,
    pub(crate) notes: Vec<String>,
}

impl TierComputation {
    pub(crate) fn push_line(&mut self, category: Category, amount: f64, rate: f64, reward: f64) {
        self.lines.push(RewardLine {
            category,
            amount,
            rate,
            reward,
        });
    }

    pub(crate) fn original_reward(&self) -> f64 {
        self.lines.iter().map(|line| line.reward).sum()
    }
}

/// Reward for `amount` of spend at `rate`: percentage-of-spend for cashback,
/// miles-per-dollar times the caller's miles valuation for mileage products.
pub(crate) fn unit_reward(amount: f64, rate: f64, kind: ProductKind, miles_rate: f64) -> f64 {
    match kind {
        ProductKind::Cashback => amount * rate / 100.0,
        ProductKind::Miles => amount * rate * miles_rate,
    }
}

/// Scales a shared-cap group's rewards down to the group cap, preserving each
/// member's relative share exactly. Inputs at or under the cap pass through.
pub(crate) fn scale_group_to_cap(rewards: &[f64], cap: f64) -> Vec<f64> {
    let sum: f64 = rewards.iter().sum();
    if sum <= cap || sum <= 0.0 {
        return rewards.to_vec();
    }
    let ratio = cap / sum;
    rewards.iter().map(|reward| reward * ratio).collect()
}

#[derive(Debug, Default)]
struct GroupAccumulator {
    rewards: Vec<f64>,
    cap: Option<f64>,
}

/// The default policy path: apply each category's declared rate (base rate if
/// uncategorized), honoring per-category earned/spent caps and shared cap
/// groups.
pub(crate) fn standard_breakdown(
    tier: &Tier,
    kind: ProductKind,
    spending: &SpendingVector,
    miles_rate: f64,
) -> TierComputation {
    let mut computation = TierComputation::default();
    let mut groups: BTreeMap<String, GroupAccumulator> = BTreeMap::new();

    for (category, amount) in spending.entries() {
        let Some(entry) = tier.rate_for(category) else {
            let reward = unit_reward(amount, tier.base_rate, kind, miles_rate);
            computation.push_line(category, amount, tier.base_rate, reward);
            computation.capped_total += reward;
            continue;
        };

        if let Some(group_name) = entry.cap_group.as_deref() {
            let reward = unit_reward(amount, entry.rate, kind, miles_rate);
            computation.push_line(category, amount, entry.rate, reward);
            let accumulator = groups.entry(group_name.to_string()).or_default();
            accumulator.rewards.push(reward);
            if accumulator.cap.is_none() {
                accumulator.cap = entry.cap.map(|cap| cap.amount);
            }
            continue;
        }

        match entry.cap {
            Some(cap) if cap.kind == CapKind::Spent => {
                let eligible = amount.min(cap.amount);
                let bonus = unit_reward(eligible, entry.rate, kind, miles_rate);
                computation.push_line(category, eligible, entry.rate, bonus);
                computation.capped_total += bonus;
                let excess = amount - eligible;
                if excess > 0.0 {
                    let reverted = unit_reward(excess, tier.base_rate, kind, miles_rate);
                    computation.push_line(category, excess, tier.base_rate, reverted);
                    computation.capped_total += reverted;
                    computation.notes.push(format!(
                        "{category}: bonus spend cap of {:.2} reached, excess earns base rate",
                        cap.amount
                    ));
                }
            }
            Some(cap) => {
                let reward = unit_reward(amount, entry.rate, kind, miles_rate);
                computation.push_line(category, amount, entry.rate, reward);
                computation.capped_total += reward.min(cap.amount);
            }
            None => {
                let reward = unit_reward(amount, entry.rate, kind, miles_rate);
                computation.push_line(category, amount, entry.rate, reward);
                computation.capped_total += reward;
            }
        }
    }

    for (name, accumulator) in groups {
        let group_sum: f64 = accumulator.rewards.iter().sum();
        match accumulator.cap {
            Some(cap) => {
                let scaled: f64 = scale_group_to_cap(&accumulator.rewards, cap).iter().sum();
                computation.capped_total += scaled;
                if group_sum > cap {
                    computation
                        .notes
                        .push(format!("shared cap `{name}` of {cap:.2} reached"));
                }
            }
            // Cap group without a configured cap: degrade to uncapped.
            None => computation.capped_total += group_sum,
        }
    }

    computation
}

#[cfg(test)]
mod tests {
    use super::{scale_group_to_cap, standard_breakdown, unit_reward};
    use crate::catalog::types::{CapKind, ProductKind, RateCap, RateEntry, Tier};
    use crate::spending::{Category, SpendingVector};

    fn tier_with(rates: Vec<RateEntry>, base_rate: f64) -> Tier {
        Tier {
            min_spend: None,
            cap: None,
            base_rate,
            rates,
            description: "test tier".to_string(),
        }
    }

    fn spend(pairs: &[(Category, f64)]) -> SpendingVector {
        SpendingVector::from_pairs(pairs.iter().copied()).unwrap_or_default()
    }

    #[test]
    fn cashback_and_miles_unit_rewards() {
        assert!((unit_reward(100.0, 6.0, ProductKind::Cashback, 0.02) - 6.0).abs() < 1e-12);
        assert!((unit_reward(50.0, 4.0, ProductKind::Miles, 0.02) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn flat_rate_uncapped_is_linear() {
        let tier = tier_with(Vec::new(), 1.5);
        for amount in [0.0, 1.0, 250.0, 10_000.0] {
            let computation = standard_breakdown(
                &tier,
                ProductKind::Cashback,
                &spend(&[(Category::Other, amount)]),
                0.02,
            );
            let expected = amount * 1.5 / 100.0;
            assert!((computation.capped_total - expected).abs() < 1e-9);
            assert!((computation.original_reward() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn earned_cap_clips_capped_total_but_not_lines() {
        let tier = tier_with(
            vec![RateEntry {
                category: Category::Dining,
                rate: 6.0,
                cap: Some(RateCap {
                    amount: 80.0,
                    kind: CapKind::Earned,
                }),
                cap_group: None,
            }],
            1.0,
        );
        let computation = standard_breakdown(
            &tier,
            ProductKind::Cashback,
            &spend(&[(Category::Dining, 2000.0)]),
            0.02,
        );
        assert!((computation.original_reward() - 120.0).abs() < 1e-9);
        assert!((computation.capped_total - 80.0).abs() < 1e-9);
    }

    #[test]
    fn spent_cap_splits_into_bonus_and_base_lines() {
        let tier = tier_with(
            vec![RateEntry {
                category: Category::Online,
                rate: 4.0,
                cap: Some(RateCap {
                    amount: 1000.0,
                    kind: CapKind::Spent,
                }),
                cap_group: None,
            }],
            0.4,
        );
        let computation = standard_breakdown(
            &tier,
            ProductKind::Miles,
            &spend(&[(Category::Online, 1200.0)]),
            0.02,
        );
        assert_eq!(computation.lines.len(), 2);
        assert!((computation.lines[0].amount - 1000.0).abs() < 1e-9);
        assert!((computation.lines[0].reward - 80.0).abs() < 1e-9);
        assert!((computation.lines[1].amount - 200.0).abs() < 1e-9);
        assert!((computation.lines[1].reward - 1.6).abs() < 1e-9);
        // Spent caps change rates rather than clipping reward.
        assert!((computation.capped_total - computation.original_reward()).abs() < 1e-9);
    }

    #[test]
    fn shared_group_scale_down_preserves_ratio() {
        let scaled = scale_group_to_cap(&[60.0, 30.0], 60.0);
        assert!((scaled[0] + scaled[1] - 60.0).abs() < 1e-9);
        assert!((scaled[0] / scaled[1] - 2.0).abs() < 1e-9);

        let untouched = scale_group_to_cap(&[10.0, 5.0], 60.0);
        assert_eq!(untouched, vec![10.0, 5.0]);
    }

    #[test]
    fn cap_group_pools_rewards_under_one_cap() {
        let cap = Some(RateCap {
            amount: 60.0,
            kind: CapKind::Earned,
        });
        let tier = tier_with(
            vec![
                RateEntry {
                    category: Category::Dining,
                    rate: 5.0,
                    cap,
                    cap_group: Some("bonus".to_string()),
                },
                RateEntry {
                    category: Category::Groceries,
                    rate: 5.0,
                    cap,
                    cap_group: Some("bonus".to_string()),
                },
            ],
            0.3,
        );
        let computation = standard_breakdown(
            &tier,
            ProductKind::Cashback,
            &spend(&[(Category::Dining, 1200.0), (Category::Groceries, 600.0)]),
            0.02,
        );
        // 60 + 30 pre-cap, pooled down to the 60 group cap.
        assert!((computation.original_reward() - 90.0).abs() < 1e-9);
        assert!((computation.capped_total - 60.0).abs() < 1e-9);
    }

    #[test]
    fn cap_group_without_cap_degrades_to_uncapped() {
        let tier = tier_with(
            vec![RateEntry {
                category: Category::Dining,
                rate: 5.0,
                cap: None,
                cap_group: Some("orphan".to_string()),
            }],
            0.3,
        );
        let computation = standard_breakdown(
            &tier,
            ProductKind::Cashback,
            &spend(&[(Category::Dining, 1000.0)]),
            0.02,
        );
        assert!((computation.capped_total - 50.0).abs() < 1e-9);
    }
}
