use crate::spending::{Category, SpendingVector};

/// One line of a reward breakdown: `amount` of spend in `category` earning
/// `rate`, producing `reward` before any earned-cap clipping.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardLine {
    pub category: Category,
    pub amount: f64,
    pub rate: f64,
    pub reward: f64,
}

/// The outcome of evaluating one product against one spending vector.
///
/// `original_reward` is the sum of the breakdown lines before any earned cap
/// is applied; `monthly_reward` is the payout after per-category, shared-group
/// and tier-level caps. `cap_reached` is true only when a cap actually
/// clipped reward; spent-type cap saturation is reported through `notes`.
#[derive(Debug, Clone)]
pub struct RewardResult {
    pub product_id: String,
    pub product_name: String,
    pub tier_description: String,
    pub monthly_reward: f64,
    pub original_reward: f64,
    pub cap_reached: bool,
    pub cap_difference: Option<f64>,
    pub min_spend_met: bool,
    pub breakdown: Vec<RewardLine>,
    pub notes: Vec<String>,
}

/// One product's share of a two-product split.
#[derive(Debug, Clone)]
pub struct ProductAllocation {
    pub split: SpendingVector,
    pub result: RewardResult,
}

/// A spending split across two products and its combined payout.
#[derive(Debug, Clone)]
pub struct AllocationResult {
    pub first: ProductAllocation,
    pub second: ProductAllocation,
    pub combined_reward: f64,
}
