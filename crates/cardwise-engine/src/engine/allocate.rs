use std::collections::BTreeMap;

use crate::catalog::types::{CatalogEntry, ProductKind, RewardPolicy};
use crate::engine::MONEY_EPSILON;
use crate::engine::category_reward::unit_reward;
use crate::engine::policy::top_group_claims;
use crate::engine::product::evaluate_product_with;
use crate::engine::tier::{SelectedTier, select_tier};
use crate::engine::types::{AllocationResult, ProductAllocation};
use crate::spending::{Category, SpendingVector};

/// Splits a spending vector between two products to maximize the combined
/// reward under both products' caps.
///
/// Per-category assignment is greedy by reward-per-dollar with cap-headroom
/// spill, a documented approximation: categories are processed independently
/// and no cross-category rebalancing is attempted. Bonus-group choices of a
/// `TopGroupBonus` product are enumerated exhaustively, and a `DualBucket`
/// product paired with a multi-tier partner triggers one bounded tier
/// re-derivation pass.
pub fn allocate_pair(
    first: &CatalogEntry,
    second: &CatalogEntry,
    spending: &SpendingVector,
    miles_rate: f64,
) -> AllocationResult {
    let first_claims = claim_options(first);
    let second_claims = claim_options(second);

    let mut best: Option<AllocationResult> = None;
    for claim_a in &first_claims {
        for claim_b in &second_claims {
            let candidate = allocate_with_claims(
                first,
                second,
                spending,
                miles_rate,
                claim_a.as_deref(),
                claim_b.as_deref(),
            );
            let improves = best
                .as_ref()
                .is_none_or(|current| candidate.combined_reward > current.combined_reward + MONEY_EPSILON);
            if improves {
                best = Some(candidate);
            }
        }
    }

    // claim_options always yields at least one option per side.
    best.unwrap_or_else(|| {
        allocate_with_claims(first, second, spending, miles_rate, None, None)
    })
}

/// The bonus-group choices a product brings to allocation: every size-K
/// subset of its group set for `TopGroupBonus`, a single unconstrained
/// option otherwise.
fn claim_options(entry: &CatalogEntry) -> Vec<Option<Vec<usize>>> {
    match &entry.policy {
        RewardPolicy::TopGroupBonus(policy) => {
            subsets_of_size(policy.groups.len(), policy.picks)
                .into_iter()
                .map(Some)
                .collect()
        }
        _ => vec![None],
    }
}

/// All size-`k` index subsets of `0..n` in lexicographic order. The group
/// sets involved are tiny (choose 1 or 2 of ~5), so exhaustive enumeration
/// is cheap and deliberate.
fn subsets_of_size(n: usize, k: usize) -> Vec<Vec<usize>> {
    if k == 0 || k > n {
        return vec![Vec::new()];
    }
    let mut subsets = Vec::new();
    let mut current: Vec<usize> = (0..k).collect();
    loop {
        subsets.push(current.clone());
        // Advance the rightmost index that can still move.
        let mut position = k;
        while position > 0 {
            position -= 1;
            if current[position] < n - k + position {
                current[position] += 1;
                for offset in position + 1..k {
                    current[offset] = current[offset - 1] + 1;
                }
                break;
            }
            if position == 0 {
                return subsets;
            }
        }
    }
}

fn needs_second_pass(first: &CatalogEntry, second: &CatalogEntry) -> bool {
    let first_dual = matches!(first.policy, RewardPolicy::DualBucket(_));
    let second_dual = matches!(second.policy, RewardPolicy::DualBucket(_));
    (first_dual && second.tiers.len() > 1) || (second_dual && first.tiers.len() > 1)
}

fn allocate_with_claims(
    first: &CatalogEntry,
    second: &CatalogEntry,
    spending: &SpendingVector,
    miles_rate: f64,
    first_claims: Option<&[usize]>,
    second_claims: Option<&[usize]>,
) -> AllocationResult {
    // Provisional tiers come from the full spending vector.
    let first_tier = select_tier(first, spending);
    let second_tier = select_tier(second, spending);
    let (mut first_split, mut second_split) = greedy_split(
        Side {
            entry: first,
            tier: first_tier.as_ref(),
            claims: first_claims,
        },
        Side {
            entry: second,
            tier: second_tier.as_ref(),
            claims: second_claims,
        },
        spending,
        miles_rate,
    );

    if needs_second_pass(first, second) {
        // One bounded re-derivation: each side's tier is re-selected from
        // what it actually received, then the split is redone once. Not
        // iterated to convergence.
        let first_tier = select_tier(first, &first_split);
        let second_tier = select_tier(second, &second_split);
        (first_split, second_split) = greedy_split(
            Side {
                entry: first,
                tier: first_tier.as_ref(),
                claims: first_claims,
            },
            Side {
                entry: second,
                tier: second_tier.as_ref(),
                claims: second_claims,
            },
            spending,
            miles_rate,
        );
    }

    let first_result = evaluate_product_with(first, &first_split, miles_rate, first_claims);
    let second_result = evaluate_product_with(second, &second_split, miles_rate, second_claims);
    let combined_reward = first_result.monthly_reward + second_result.monthly_reward;

    AllocationResult {
        first: ProductAllocation {
            split: first_split,
            result: first_result,
        },
        second: ProductAllocation {
            split: second_split,
            result: second_result,
        },
        combined_reward,
    }
}

/// One product's view of an allocation round.
struct Side<'a> {
    entry: &'a CatalogEntry,
    tier: Option<&'a SelectedTier>,
    claims: Option<&'a [usize]>,
}

fn greedy_split(
    first: Side<'_>,
    second: Side<'_>,
    spending: &SpendingVector,
    miles_rate: f64,
) -> (SpendingVector, SpendingVector) {
    let first_rates = effective_rates(first.entry, first.tier, spending, miles_rate, first.claims);
    let second_rates =
        effective_rates(second.entry, second.tier, spending, miles_rate, second.claims);

    // Remaining reward headroom under each side's tier-level cap.
    let mut first_headroom = first.tier.and_then(|selected| selected.tier.cap);
    let mut second_headroom = second.tier.and_then(|selected| selected.tier.cap);

    let mut first_amounts: BTreeMap<Category, f64> = BTreeMap::new();
    let mut second_amounts: BTreeMap<Category, f64> = BTreeMap::new();

    for (category, amount) in spending.entries() {
        let first_rpd = first_rates.get(&category).copied().unwrap_or(0.0);
        let second_rpd = second_rates.get(&category).copied().unwrap_or(0.0);

        let first_preferred = first_rpd > second_rpd;
        let (preferred_rpd, spill_rpd) = if first_preferred {
            (first_rpd, second_rpd)
        } else {
            (second_rpd, first_rpd)
        };
        let (preferred_headroom, spill_headroom) = if first_preferred {
            (&mut first_headroom, &mut second_headroom)
        } else {
            (&mut second_headroom, &mut first_headroom)
        };

        let taken = take_capacity(preferred_headroom, preferred_rpd, amount);
        let remainder = amount - taken;
        let spilled = take_capacity(spill_headroom, spill_rpd, remainder);
        // Spend beyond both caps earns nothing extra; park it with the
        // preferred product so the split still covers the full vector.
        let residue = remainder - spilled;

        let (preferred_amounts, spill_amounts) = if first_preferred {
            (&mut first_amounts, &mut second_amounts)
        } else {
            (&mut second_amounts, &mut first_amounts)
        };
        if taken + residue > 0.0 {
            *preferred_amounts.entry(category).or_insert(0.0) += taken + residue;
        }
        if spilled > 0.0 {
            *spill_amounts.entry(category).or_insert(0.0) += spilled;
        }
    }

    (
        SpendingVector::from_split(first_amounts),
        SpendingVector::from_split(second_amounts),
    )
}

/// Takes as much of `want` spend as the remaining reward headroom allows,
/// converting headroom from reward units back to spend units via the rate.
fn take_capacity(headroom: &mut Option<f64>, reward_per_dollar: f64, want: f64) -> f64 {
    if want <= 0.0 {
        return 0.0;
    }
    match headroom {
        None => want,
        Some(remaining) => {
            if reward_per_dollar <= 0.0 {
                // Zero-rate spend never consumes reward headroom.
                return want;
            }
            let max_spend = (*remaining / reward_per_dollar).max(0.0);
            let taken = want.min(max_spend);
            *remaining -= taken * reward_per_dollar;
            taken
        }
    }
}

/// Approximate reward-per-dollar by category for a product at its selected
/// tier, used only to rank products during allocation; the final payout is
/// always computed by the full single-product engine on the allocated split.
fn effective_rates(
    entry: &CatalogEntry,
    selected: Option<&SelectedTier>,
    spending: &SpendingVector,
    miles_rate: f64,
    claims: Option<&[usize]>,
) -> BTreeMap<Category, f64> {
    let Some(selected) = selected else {
        return BTreeMap::new();
    };
    let tier = &selected.tier;
    let base = per_dollar(tier.base_rate, entry.kind, miles_rate);
    let mut rates: BTreeMap<Category, f64> = Category::ALL
        .iter()
        .map(|category| (*category, base))
        .collect();

    match &entry.policy {
        RewardPolicy::Standard => {
            for rate_entry in &tier.rates {
                rates.insert(
                    rate_entry.category,
                    per_dollar(rate_entry.rate, entry.kind, miles_rate),
                );
            }
        }
        RewardPolicy::TopGroupBonus(policy) => {
            let claimed = match claims {
                Some(claimed) => claimed.to_vec(),
                None => top_group_claims(policy, spending),
            };
            let bonus = per_dollar(policy.bonus_rate, entry.kind, miles_rate);
            for index in claimed {
                if let Some(group) = policy.groups.get(index) {
                    for &category in &group.members {
                        rates.insert(category, bonus);
                    }
                }
            }
        }
        RewardPolicy::TopCategoryBonus(policy) => {
            let eligible_spend: f64 = policy
                .eligible
                .iter()
                .map(|category| spending.amount(*category))
                .sum();
            if eligible_spend >= policy.min_spend && eligible_spend > 0.0 {
                let mut chosen: Option<Category> = None;
                let mut best = 0.0;
                for &category in &policy.eligible {
                    let amount = spending.amount(category);
                    if amount > best {
                        best = amount;
                        chosen = Some(category);
                    }
                }
                if let Some(category) = chosen {
                    rates.insert(category, per_dollar(policy.bonus_rate, entry.kind, miles_rate));
                }
            }
        }
        RewardPolicy::DualBucket(policy) => {
            let bonus = per_dollar(policy.bonus_rate, entry.kind, miles_rate);
            for bucket in [&policy.first, &policy.second] {
                let bucket_spend: f64 = bucket
                    .members
                    .iter()
                    .map(|category| spending.amount(*category))
                    .sum();
                if bucket_spend >= policy.min_spend {
                    for &category in &bucket.members {
                        rates.insert(category, bonus);
                    }
                }
            }
        }
        RewardPolicy::SharedSpendCap(policy) => {
            let bonus_rate = policy
                .bonus
                .iter()
                .find_map(|category| tier.rate_for(*category))
                .map(|rate_entry| rate_entry.rate)
                .unwrap_or(tier.base_rate);
            let bonus = per_dollar(bonus_rate, entry.kind, miles_rate);
            for &category in &policy.bonus {
                rates.insert(category, bonus);
            }
        }
    }

    rates
}

fn per_dollar(rate: f64, kind: ProductKind, miles_rate: f64) -> f64 {
    unit_reward(1.0, rate, kind, miles_rate)
}
