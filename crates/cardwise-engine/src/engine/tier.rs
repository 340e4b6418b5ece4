use crate::catalog::types::{CatalogEntry, ProductKind, Tier};
use crate::spending::SpendingVector;

/// The tier a product applies for a given spending vector.
///
/// `synthetic` marks the base-rate-only fallback used when no real tier's
/// minimum spend is met, so a non-qualifying user still earns a non-bonus
/// return.
#[derive(Debug, Clone)]
pub struct SelectedTier {
    pub tier: Tier,
    pub min_spend_met: bool,
    pub synthetic: bool,
}

/// The spend basis a tier's minimum is checked against: total spend for
/// cashback products, the sum of the tier's bonus-eligible categories for
/// mileage products.
pub(crate) fn tier_basis(tier: &Tier, kind: ProductKind, spending: &SpendingVector) -> f64 {
    match kind {
        ProductKind::Cashback => spending.total(),
        ProductKind::Miles => tier
            .bonus_categories()
            .map(|category| spending.amount(category))
            .sum(),
    }
}

fn min_spend_of(tier: &Tier) -> f64 {
    tier.min_spend.unwrap_or(0.0)
}

fn qualifies(tier: &Tier, kind: ProductKind, spending: &SpendingVector) -> bool {
    tier_basis(tier, kind, spending) >= min_spend_of(tier)
}

/// Tiers whose minimum spend is met, in catalog order.
pub(crate) fn qualifying_tiers<'a>(
    entry: &'a CatalogEntry,
    spending: &SpendingVector,
) -> Vec<&'a Tier> {
    entry
        .tiers
        .iter()
        .filter(|tier| qualifies(tier, entry.kind, spending))
        .collect()
}

/// Base-rate-only stand-in for a user who qualifies for no tier.
pub(crate) fn fallback_tier(lowest: &Tier) -> Tier {
    Tier {
        min_spend: None,
        cap: None,
        base_rate: lowest.base_rate,
        rates: Vec::new(),
        description: "Base rate (minimum spend not met)".to_string(),
    }
}

/// Selects the applying tier: the qualifying tier with the highest minimum
/// spend, evaluated ascending so equal minimums break toward the last
/// evaluated. Falls back to a synthetic base-rate tier when nothing
/// qualifies. Returns `None` only for a product with no tiers at all.
pub fn select_tier(entry: &CatalogEntry, spending: &SpendingVector) -> Option<SelectedTier> {
    if entry.tiers.is_empty() {
        return None;
    }

    let mut ascending: Vec<&Tier> = entry.tiers.iter().collect();
    ascending.sort_by(|left, right| min_spend_of(left).total_cmp(&min_spend_of(right)));

    let mut selected: Option<&Tier> = None;
    for tier in ascending.iter().copied() {
        if qualifies(tier, entry.kind, spending) {
            selected = Some(tier);
        }
    }

    match selected {
        Some(tier) => Some(SelectedTier {
            tier: tier.clone(),
            min_spend_met: true,
            synthetic: false,
        }),
        None => ascending.first().copied().map(|lowest| SelectedTier {
            tier: fallback_tier(lowest),
            min_spend_met: false,
            synthetic: true,
        }),
    }
}
