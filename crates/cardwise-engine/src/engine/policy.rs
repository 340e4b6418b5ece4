use std::collections::BTreeSet;

use crate::catalog::types::{
    CatalogEntry, DualBucketPolicy, ProductKind, RewardPolicy, SharedSpendCapPolicy, SpendBucket,
    Tier, TopCategoryBonusPolicy, TopGroupBonusPolicy,
};
use crate::engine::category_reward::{TierComputation, standard_breakdown, unit_reward};
use crate::spending::{Category, SpendingVector};

/// Computes one tier's breakdown under the product's declared policy.
///
/// `claims` overrides the bonus-group choice of a `TopGroupBonus` product and
/// is ignored by every other policy; the two-product allocator uses it to
/// enumerate group choices.
pub(crate) fn tier_breakdown(
    entry: &CatalogEntry,
    tier: &Tier,
    spending: &SpendingVector,
    miles_rate: f64,
    claims: Option<&[usize]>,
) -> TierComputation {
    match &entry.policy {
        RewardPolicy::Standard => standard_breakdown(tier, entry.kind, spending, miles_rate),
        RewardPolicy::TopGroupBonus(policy) => {
            top_group_breakdown(policy, tier, entry.kind, spending, miles_rate, claims)
        }
        RewardPolicy::TopCategoryBonus(policy) => {
            top_category_breakdown(policy, tier, entry.kind, spending, miles_rate)
        }
        RewardPolicy::DualBucket(policy) => {
            dual_bucket_breakdown(policy, tier, entry.kind, spending, miles_rate)
        }
        RewardPolicy::SharedSpendCap(policy) => {
            shared_spend_cap_breakdown(policy, tier, entry.kind, spending, miles_rate)
        }
    }
}

/// The group indices a `TopGroupBonus` product claims on its own: the
/// `picks` groups with the highest member spend, earlier-listed groups
/// winning ties.
pub(crate) fn top_group_claims(
    policy: &TopGroupBonusPolicy,
    spending: &SpendingVector,
) -> Vec<usize> {
    let mut ranked: Vec<(usize, f64)> = policy
        .groups
        .iter()
        .enumerate()
        .map(|(index, group)| (index, group_spend(group.members.as_slice(), spending)))
        .collect();
    ranked.sort_by(|left, right| {
        right
            .1
            .total_cmp(&left.1)
            .then_with(|| left.0.cmp(&right.0))
    });
    let mut claimed: Vec<usize> = ranked
        .into_iter()
        .take(policy.picks)
        .map(|(index, _)| index)
        .collect();
    claimed.sort_unstable();
    claimed
}

fn group_spend(members: &[Category], spending: &SpendingVector) -> f64 {
    members
        .iter()
        .map(|category| spending.amount(*category))
        .sum()
}

fn top_group_breakdown(
    policy: &TopGroupBonusPolicy,
    tier: &Tier,
    kind: ProductKind,
    spending: &SpendingVector,
    miles_rate: f64,
    claims: Option<&[usize]>,
) -> TierComputation {
    let claimed = match claims {
        Some(claimed) => claimed.to_vec(),
        None => top_group_claims(policy, spending),
    };
    let mut computation = TierComputation::default();
    let grouped: BTreeSet<Category> = policy
        .groups
        .iter()
        .flat_map(|group| group.members.iter().copied())
        .collect();

    let mut claimed_names: Vec<&str> = Vec::new();
    for (index, group) in policy.groups.iter().enumerate() {
        let is_claimed = claimed.contains(&index);
        let spend = group_spend(group.members.as_slice(), spending);
        if is_claimed && spend > 0.0 {
            claimed_names.push(group.name.as_str());
        }
        let mut bonus_left = if is_claimed {
            policy.group_spend_cap
        } else {
            0.0
        };
        for &category in &group.members {
            let amount = spending.amount(category);
            if amount <= 0.0 {
                continue;
            }
            let bonus_amount = amount.min(bonus_left);
            if bonus_amount > 0.0 {
                let reward = unit_reward(bonus_amount, policy.bonus_rate, kind, miles_rate);
                computation.push_line(category, bonus_amount, policy.bonus_rate, reward);
                computation.capped_total += reward;
                bonus_left -= bonus_amount;
            }
            let rest = amount - bonus_amount;
            if rest > 0.0 {
                let reward = unit_reward(rest, tier.base_rate, kind, miles_rate);
                computation.push_line(category, rest, tier.base_rate, reward);
                computation.capped_total += reward;
            }
        }
        if is_claimed && spend > policy.group_spend_cap {
            computation.notes.push(format!(
                "group `{}`: bonus spend cap of {:.2} reached, excess earns base rate",
                group.name, policy.group_spend_cap
            ));
        }
    }

    for (category, amount) in spending.entries() {
        if grouped.contains(&category) {
            continue;
        }
        let reward = unit_reward(amount, tier.base_rate, kind, miles_rate);
        computation.push_line(category, amount, tier.base_rate, reward);
        computation.capped_total += reward;
    }

    if !claimed_names.is_empty() {
        computation.notes.insert(
            0,
            format!("bonus rate applied to group(s): {}", claimed_names.join(", ")),
        );
    }
    computation
}

fn top_category_breakdown(
    policy: &TopCategoryBonusPolicy,
    tier: &Tier,
    kind: ProductKind,
    spending: &SpendingVector,
    miles_rate: f64,
) -> TierComputation {
    let eligible_spend: f64 = policy
        .eligible
        .iter()
        .map(|category| spending.amount(*category))
        .sum();

    let mut chosen: Option<Category> = None;
    if eligible_spend >= policy.min_spend && eligible_spend > 0.0 {
        let mut best = 0.0;
        for &category in &policy.eligible {
            let amount = spending.amount(category);
            if amount > best {
                best = amount;
                chosen = Some(category);
            }
        }
    }

    let mut computation = TierComputation::default();
    for (category, amount) in spending.entries() {
        let rate = if chosen == Some(category) {
            policy.bonus_rate
        } else {
            tier.base_rate
        };
        let reward = unit_reward(amount, rate, kind, miles_rate);
        computation.push_line(category, amount, rate, reward);
        computation.capped_total += reward;
    }

    match chosen {
        Some(category) => computation
            .notes
            .push(format!("bonus rate applied to top category: {category}")),
        None => computation.notes.push(format!(
            "minimum eligible spend of {:.2} not met, all categories earn base rate",
            policy.min_spend
        )),
    }
    computation
}

fn dual_bucket_breakdown(
    policy: &DualBucketPolicy,
    tier: &Tier,
    kind: ProductKind,
    spending: &SpendingVector,
    miles_rate: f64,
) -> TierComputation {
    let mut computation = TierComputation::default();
    let bucketed: BTreeSet<Category> = policy
        .first
        .members
        .iter()
        .chain(policy.second.members.iter())
        .copied()
        .collect();

    for bucket in [&policy.first, &policy.second] {
        apply_bucket(policy, bucket, tier, kind, spending, miles_rate, &mut computation);
    }

    for (category, amount) in spending.entries() {
        if bucketed.contains(&category) {
            continue;
        }
        let reward = unit_reward(amount, tier.base_rate, kind, miles_rate);
        computation.push_line(category, amount, tier.base_rate, reward);
        computation.capped_total += reward;
    }
    computation
}

fn apply_bucket(
    policy: &DualBucketPolicy,
    bucket: &SpendBucket,
    tier: &Tier,
    kind: ProductKind,
    spending: &SpendingVector,
    miles_rate: f64,
    computation: &mut TierComputation,
) {
    let spend = group_spend(bucket.members.as_slice(), spending);
    let min_met = spend >= policy.min_spend;
    let mut bonus_left = if min_met { policy.spend_cap } else { 0.0 };

    for &category in &bucket.members {
        let amount = spending.amount(category);
        if amount <= 0.0 {
            continue;
        }
        let bonus_amount = amount.min(bonus_left);
        if bonus_amount > 0.0 {
            let reward = unit_reward(bonus_amount, policy.bonus_rate, kind, miles_rate);
            computation.push_line(category, bonus_amount, policy.bonus_rate, reward);
            computation.capped_total += reward;
            bonus_left -= bonus_amount;
        }
        let rest = amount - bonus_amount;
        if rest > 0.0 {
            let reward = unit_reward(rest, tier.base_rate, kind, miles_rate);
            computation.push_line(category, rest, tier.base_rate, reward);
            computation.capped_total += reward;
        }
    }

    if spend > 0.0 && !min_met {
        computation.notes.push(format!(
            "bucket `{}`: minimum spend of {:.2} not met, earns base rate",
            bucket.name, policy.min_spend
        ));
    }
    if min_met && spend > policy.spend_cap {
        computation.notes.push(format!(
            "bucket `{}`: bonus spend cap of {:.2} reached, excess earns base rate",
            bucket.name, policy.spend_cap
        ));
    }
}

fn shared_spend_cap_breakdown(
    policy: &SharedSpendCapPolicy,
    tier: &Tier,
    kind: ProductKind,
    spending: &SpendingVector,
    miles_rate: f64,
) -> TierComputation {
    // The bonus rate rides on the tier's rate table; the policy only shapes
    // which spend qualifies for it.
    let bonus_rate = policy
        .bonus
        .iter()
        .find_map(|category| tier.rate_for(*category))
        .map(|entry| entry.rate)
        .unwrap_or(tier.base_rate);

    let bonus_set: BTreeSet<Category> = policy.bonus.iter().copied().collect();
    let total_bonus_spend = group_spend(policy.bonus.as_slice(), spending);
    let within_cap = total_bonus_spend.min(policy.spend_cap);
    let non_bonus_spend: f64 = spending
        .entries()
        .filter(|(category, _)| !bonus_set.contains(category))
        .map(|(_, amount)| amount)
        .sum();

    // Non-bonus spend is notionally redirected to satisfy the minimum; it
    // still earns only the base rate itself.
    let min_met = within_cap + non_bonus_spend >= policy.min_spend;

    let mut computation = TierComputation::default();

    if !min_met {
        for (category, amount) in spending.entries() {
            let reward = unit_reward(amount, tier.base_rate, kind, miles_rate);
            computation.push_line(category, amount, tier.base_rate, reward);
            computation.capped_total += reward;
        }
        computation.notes.push(format!(
            "minimum qualifying spend of {:.2} not met, all categories earn base rate",
            policy.min_spend
        ));
        return computation;
    }

    let scale = if total_bonus_spend > 0.0 {
        within_cap / total_bonus_spend
    } else {
        0.0
    };
    for &category in &policy.bonus {
        let amount = spending.amount(category);
        if amount <= 0.0 {
            continue;
        }
        let bonus_amount = amount * scale;
        if bonus_amount > 0.0 {
            let reward = unit_reward(bonus_amount, bonus_rate, kind, miles_rate);
            computation.push_line(category, bonus_amount, bonus_rate, reward);
            computation.capped_total += reward;
        }
        let rest = amount - bonus_amount;
        if rest > 0.0 {
            let reward = unit_reward(rest, tier.base_rate, kind, miles_rate);
            computation.push_line(category, rest, tier.base_rate, reward);
            computation.capped_total += reward;
        }
    }

    for (category, amount) in spending.entries() {
        if bonus_set.contains(&category) {
            continue;
        }
        let reward = unit_reward(amount, tier.base_rate, kind, miles_rate);
        computation.push_line(category, amount, tier.base_rate, reward);
        computation.capped_total += reward;
    }

    if total_bonus_spend > policy.spend_cap {
        computation.notes.push(format!(
            "shared bonus spend cap of {:.2} reached, excess earns base rate",
            policy.spend_cap
        ));
    }
    if within_cap < policy.min_spend {
        computation.notes.push(
            "minimum qualifying spend met using non-bonus categories at base rate".to_string(),
        );
    }
    computation
}
