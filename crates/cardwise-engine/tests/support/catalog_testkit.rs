use cardwise_engine::catalog::types::{
    CapKind, CatalogEntry, ProductKind, RateCap, RateEntry, RewardPolicy, Tier,
};
use cardwise_engine::spending::{Category, SpendingVector};

pub fn spend(pairs: &[(Category, f64)]) -> SpendingVector {
    SpendingVector::from_pairs(pairs.iter().copied()).unwrap_or_default()
}

pub fn product(id: &str, kind: ProductKind, tiers: Vec<Tier>) -> CatalogEntry {
    CatalogEntry {
        id: id.to_string(),
        name: format!("Card {id}"),
        issuer: "Test Bank".to_string(),
        kind,
        categories: Vec::new(),
        tiers,
        policy: RewardPolicy::Standard,
    }
}

pub fn policy_product(
    id: &str,
    kind: ProductKind,
    tiers: Vec<Tier>,
    policy: RewardPolicy,
) -> CatalogEntry {
    CatalogEntry {
        policy,
        ..product(id, kind, tiers)
    }
}

pub fn tier(description: &str, base_rate: f64, rates: Vec<RateEntry>) -> Tier {
    Tier {
        min_spend: None,
        cap: None,
        base_rate,
        rates,
        description: description.to_string(),
    }
}

pub fn rate(category: Category, value: f64) -> RateEntry {
    RateEntry {
        category,
        rate: value,
        cap: None,
        cap_group: None,
    }
}

pub fn earned_cap_rate(category: Category, value: f64, cap: f64) -> RateEntry {
    RateEntry {
        category,
        rate: value,
        cap: Some(RateCap {
            amount: cap,
            kind: CapKind::Earned,
        }),
        cap_group: None,
    }
}

pub fn spent_cap_rate(category: Category, value: f64, cap: f64) -> RateEntry {
    RateEntry {
        category,
        rate: value,
        cap: Some(RateCap {
            amount: cap,
            kind: CapKind::Spent,
        }),
        cap_group: None,
    }
}
