use serde::{Deserialize, Serialize};

use crate::spending::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    Cashback,
    Miles,
}

impl ProductKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductKind::Cashback => "cashback",
            ProductKind::Miles => "miles",
        }
    }

    pub fn parse(raw: &str) -> Option<ProductKind> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cashback" => Some(ProductKind::Cashback),
            "miles" => Some(ProductKind::Miles),
            _ => None,
        }
    }
}

/// How a per-category cap limits the reward.
///
/// `Earned` caps the reward amount itself; `Spent` caps the spend eligible
/// for the bonus rate, with the excess reverting to the tier base rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapKind {
    Earned,
    Spent,
}

impl CapKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CapKind::Earned => "earned",
            CapKind::Spent => "spent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateCap {
    pub amount: f64,
    pub kind: CapKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    pub category: Category,
    pub rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap: Option<RateCap>,
    /// Categories sharing a tag pool their rewards under one earned cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_group: Option<String>,
}

/// One spend-threshold-gated rate table within a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_spend: Option<f64>,
    /// Overall earned cap on the tier's total reward, distinct from any
    /// per-category caps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap: Option<f64>,
    pub base_rate: f64,
    #[serde(default)]
    pub rates: Vec<RateEntry>,
    pub description: String,
}

impl Tier {
    pub fn rate_for(&self, category: Category) -> Option<&RateEntry> {
        self.rates.iter().find(|entry| entry.category == category)
    }

    /// Categories carrying an explicit rate entry in this tier.
    pub fn bonus_categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.rates.iter().map(|entry| entry.category)
    }
}

/// A named group of categories that compete together for a bonus slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusGroup {
    pub name: String,
    pub members: Vec<Category>,
}

/// One of the two disjoint spend buckets of a `DualBucket` product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendBucket {
    pub name: String,
    pub members: Vec<Category>,
}

/// Bonus goes to the `picks` groups with the highest spend, up to a per-group
/// spend cap; everything else earns the tier base rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopGroupBonusPolicy {
    pub groups: Vec<BonusGroup>,
    pub picks: usize,
    pub bonus_rate: f64,
    pub group_spend_cap: f64,
}

/// Only the single eligible category with the largest spend earns the bonus
/// rate, and only once aggregate eligible spend clears `min_spend`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCategoryBonusPolicy {
    pub eligible: Vec<Category>,
    pub min_spend: f64,
    pub bonus_rate: f64,
}

/// Two disjoint buckets, each independently gated by the same minimum spend
/// and capped by the same bonus spend ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualBucketPolicy {
    pub first: SpendBucket,
    pub second: SpendBucket,
    pub min_spend: f64,
    pub spend_cap: f64,
    pub bonus_rate: f64,
}

/// A fixed bonus-category set sharing one aggregate spend cap. Non-bonus
/// spend can top up the qualifying minimum without earning the bonus rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedSpendCapPolicy {
    pub bonus: Vec<Category>,
    pub spend_cap: f64,
    pub min_spend: f64,
}

/// Declared reward-allocation behavior, attached at catalog load time and
/// dispatched structurally, never inferred from a product's display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RewardPolicy {
    Standard,
    TopGroupBonus(TopGroupBonusPolicy),
    TopCategoryBonus(TopCategoryBonusPolicy),
    DualBucket(DualBucketPolicy),
    SharedSpendCap(SharedSpendCapPolicy),
}

impl Default for RewardPolicy {
    fn default() -> Self {
        RewardPolicy::Standard
    }
}

impl RewardPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            RewardPolicy::Standard => "standard",
            RewardPolicy::TopGroupBonus(_) => "top_group_bonus",
            RewardPolicy::TopCategoryBonus(_) => "top_category_bonus",
            RewardPolicy::DualBucket(_) => "dual_bucket",
            RewardPolicy::SharedSpendCap(_) => "shared_spend_cap",
        }
    }
}

/// Immutable reference data for one reward-earning product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub issuer: String,
    #[serde(rename = "type")]
    pub kind: ProductKind,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub tiers: Vec<Tier>,
    #[serde(default)]
    pub policy: RewardPolicy,
}
