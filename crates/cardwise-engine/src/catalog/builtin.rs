//! Built-in product catalog and sample spending, used when no user catalog
//! exists and by the demo commands. Rates and caps are representative of
//! real cashback and mileage products rather than tied to any live offer.

use crate::catalog::types::{
    BonusGroup, CapKind, CatalogEntry, DualBucketPolicy, ProductKind, RateCap, RateEntry,
    RewardPolicy, SharedSpendCapPolicy, SpendBucket, Tier, TopCategoryBonusPolicy,
    TopGroupBonusPolicy,
};
use crate::spending::{Category, SpendingVector};

pub const BUILTIN_SOURCE: &str = "built-in";

pub fn builtin_catalog() -> Vec<CatalogEntry> {
    vec![
        everyday_cashback(),
        flat_cashback(),
        dining_cashback(),
        flat_miles(),
        online_miles(),
        choice_miles(),
        choice_miles_duo(),
        top_category_cashback(),
        dual_bucket_miles(),
        shared_cap_cashback(),
    ]
}

pub fn sample_spending() -> SpendingVector {
    SpendingVector::from_pairs([
        (Category::Dining, 650.0),
        (Category::Groceries, 480.0),
        (Category::Petrol, 120.0),
        (Category::Transport, 90.0),
        (Category::Streaming, 35.0),
        (Category::Entertainment, 140.0),
        (Category::Utilities, 210.0),
        (Category::Online, 380.0),
        (Category::Travel, 300.0),
        (Category::ForeignCurrency, 250.0),
        (Category::Other, 160.0),
    ])
    .unwrap_or_default()
}

fn rate(category: Category, value: f64) -> RateEntry {
    RateEntry {
        category,
        rate: value,
        cap: None,
        cap_group: None,
    }
}

fn capped_rate(category: Category, value: f64, amount: f64, kind: CapKind) -> RateEntry {
    RateEntry {
        category,
        rate: value,
        cap: Some(RateCap { amount, kind }),
        cap_group: None,
    }
}

fn grouped_rate(category: Category, value: f64, amount: f64, group: &str) -> RateEntry {
    RateEntry {
        category,
        rate: value,
        cap: Some(RateCap {
            amount,
            kind: CapKind::Earned,
        }),
        cap_group: Some(group.to_string()),
    }
}

/// Tiered cashback: bonus categories share one earned cap per tier, higher
/// spend unlocks a richer cap.
fn everyday_cashback() -> CatalogEntry {
    CatalogEntry {
        id: "prd_everyday_cashback".to_string(),
        name: "Everyday Cashback".to_string(),
        issuer: "Meridian Bank".to_string(),
        kind: ProductKind::Cashback,
        categories: vec![
            Category::Dining,
            Category::Groceries,
            Category::Transport,
            Category::Streaming,
        ],
        tiers: vec![
            Tier {
                min_spend: Some(800.0),
                cap: None,
                base_rate: 0.3,
                rates: vec![
                    grouped_rate(Category::Dining, 5.0, 50.0, "everyday"),
                    grouped_rate(Category::Groceries, 5.0, 50.0, "everyday"),
                    grouped_rate(Category::Transport, 5.0, 50.0, "everyday"),
                    grouped_rate(Category::Streaming, 5.0, 50.0, "everyday"),
                ],
                description: "5% everyday categories, $50 shared cap, min $800".to_string(),
            },
            Tier {
                min_spend: Some(2000.0),
                cap: None,
                base_rate: 0.3,
                rates: vec![
                    grouped_rate(Category::Dining, 8.0, 120.0, "everyday"),
                    grouped_rate(Category::Groceries, 8.0, 120.0, "everyday"),
                    grouped_rate(Category::Transport, 8.0, 120.0, "everyday"),
                    grouped_rate(Category::Streaming, 8.0, 120.0, "everyday"),
                ],
                description: "8% everyday categories, $120 shared cap, min $2000".to_string(),
            },
        ],
        policy: RewardPolicy::Standard,
    }
}

fn flat_cashback() -> CatalogEntry {
    CatalogEntry {
        id: "prd_flat_cashback".to_string(),
        name: "Unlimited 1.6%".to_string(),
        issuer: "Meridian Bank".to_string(),
        kind: ProductKind::Cashback,
        categories: Vec::new(),
        tiers: vec![Tier {
            min_spend: None,
            cap: None,
            base_rate: 1.6,
            rates: Vec::new(),
            description: "Flat 1.6% on all spend, no cap".to_string(),
        }],
        policy: RewardPolicy::Standard,
    }
}

fn dining_cashback() -> CatalogEntry {
    CatalogEntry {
        id: "prd_dining_cashback".to_string(),
        name: "Gourmet Card".to_string(),
        issuer: "Harbor Trust".to_string(),
        kind: ProductKind::Cashback,
        categories: vec![Category::Dining, Category::Entertainment],
        tiers: vec![Tier {
            min_spend: None,
            cap: None,
            base_rate: 1.0,
            rates: vec![
                capped_rate(Category::Dining, 6.0, 80.0, CapKind::Earned),
                rate(Category::Entertainment, 3.0),
            ],
            description: "6% dining capped at $80 earned, 3% entertainment".to_string(),
        }],
        policy: RewardPolicy::Standard,
    }
}

fn flat_miles() -> CatalogEntry {
    CatalogEntry {
        id: "prd_flat_miles".to_string(),
        name: "Voyager Classic".to_string(),
        issuer: "Atlas Air Bank".to_string(),
        kind: ProductKind::Miles,
        categories: vec![Category::Travel, Category::Overseas],
        tiers: vec![Tier {
            min_spend: None,
            cap: None,
            base_rate: 1.2,
            rates: vec![rate(Category::Travel, 2.0), rate(Category::Overseas, 2.0)],
            description: "1.2 mpd everywhere, 2 mpd travel and overseas".to_string(),
        }],
        policy: RewardPolicy::Standard,
    }
}

/// Multi-tier mileage product whose minimum spend is measured on the bonus
/// categories themselves.
fn online_miles() -> CatalogEntry {
    CatalogEntry {
        id: "prd_online_miles".to_string(),
        name: "Digital Miles".to_string(),
        issuer: "Atlas Air Bank".to_string(),
        kind: ProductKind::Miles,
        categories: vec![Category::Online, Category::Streaming],
        tiers: vec![
            Tier {
                min_spend: None,
                cap: None,
                base_rate: 0.4,
                rates: vec![rate(Category::Online, 1.8)],
                description: "1.8 mpd online, no minimum".to_string(),
            },
            Tier {
                min_spend: Some(500.0),
                cap: None,
                base_rate: 0.4,
                rates: vec![
                    capped_rate(Category::Online, 4.0, 1000.0, CapKind::Spent),
                    capped_rate(Category::Streaming, 4.0, 1000.0, CapKind::Spent),
                ],
                description: "4 mpd online and streaming on the first $1000, min $500 bonus spend"
                    .to_string(),
            },
        ],
        policy: RewardPolicy::Standard,
    }
}

fn choice_groups() -> Vec<BonusGroup> {
    vec![
        BonusGroup {
            name: "dining".to_string(),
            members: vec![Category::Dining],
        },
        BonusGroup {
            name: "entertainment".to_string(),
            members: vec![Category::Entertainment],
        },
        BonusGroup {
            name: "retail".to_string(),
            members: vec![Category::Retail, Category::Departmental],
        },
        BonusGroup {
            name: "transport".to_string(),
            members: vec![Category::Transport, Category::CommuterPass, Category::Petrol],
        },
        BonusGroup {
            name: "travel".to_string(),
            members: vec![Category::Travel],
        },
    ]
}

/// The bonus follows whichever group the holder spends most in.
fn choice_miles() -> CatalogEntry {
    CatalogEntry {
        id: "prd_choice_miles".to_string(),
        name: "Select Miles".to_string(),
        issuer: "Harbor Trust".to_string(),
        kind: ProductKind::Miles,
        categories: vec![
            Category::Dining,
            Category::Entertainment,
            Category::Retail,
            Category::Transport,
            Category::Travel,
        ],
        tiers: vec![Tier {
            min_spend: None,
            cap: None,
            base_rate: 0.4,
            rates: Vec::new(),
            description: "4 mpd on your top group up to $1000, 0.4 mpd elsewhere".to_string(),
        }],
        policy: RewardPolicy::TopGroupBonus(TopGroupBonusPolicy {
            groups: choice_groups(),
            picks: 1,
            bonus_rate: 4.0,
            group_spend_cap: 1000.0,
        }),
    }
}

fn choice_miles_duo() -> CatalogEntry {
    CatalogEntry {
        id: "prd_choice_miles_duo".to_string(),
        name: "Select Miles Duo".to_string(),
        issuer: "Harbor Trust".to_string(),
        kind: ProductKind::Miles,
        categories: vec![
            Category::Dining,
            Category::Entertainment,
            Category::Retail,
            Category::Transport,
            Category::Travel,
        ],
        tiers: vec![Tier {
            min_spend: None,
            cap: None,
            base_rate: 0.4,
            rates: Vec::new(),
            description: "4 mpd on your top two groups, each up to $1000".to_string(),
        }],
        policy: RewardPolicy::TopGroupBonus(TopGroupBonusPolicy {
            groups: choice_groups(),
            picks: 2,
            bonus_rate: 4.0,
            group_spend_cap: 1000.0,
        }),
    }
}

/// Only the single largest eligible category earns the high rate once the
/// aggregate eligible minimum is met.
fn top_category_cashback() -> CatalogEntry {
    CatalogEntry {
        id: "prd_top_category_cashback".to_string(),
        name: "Spotlight Cashback".to_string(),
        issuer: "Crescent Savings".to_string(),
        kind: ProductKind::Cashback,
        categories: vec![
            Category::Dining,
            Category::Groceries,
            Category::Transport,
            Category::Online,
        ],
        tiers: vec![Tier {
            min_spend: None,
            cap: Some(70.0),
            base_rate: 1.0,
            rates: Vec::new(),
            description: "5% on your biggest bonus category, 1% elsewhere, $70 monthly cap"
                .to_string(),
        }],
        policy: RewardPolicy::TopCategoryBonus(TopCategoryBonusPolicy {
            eligible: vec![
                Category::Dining,
                Category::Groceries,
                Category::Transport,
                Category::Online,
            ],
            min_spend: 350.0,
            bonus_rate: 5.0,
        }),
    }
}

/// Foreign and domestic spend unlock their bonuses independently, each with
/// the same minimum and bonus ceiling.
fn dual_bucket_miles() -> CatalogEntry {
    CatalogEntry {
        id: "prd_dual_bucket_miles".to_string(),
        name: "Globetrotter Signature".to_string(),
        issuer: "Atlas Air Bank".to_string(),
        kind: ProductKind::Miles,
        categories: vec![
            Category::ForeignCurrency,
            Category::Dining,
            Category::Groceries,
            Category::Petrol,
            Category::Entertainment,
            Category::Retail,
        ],
        tiers: vec![Tier {
            min_spend: None,
            cap: None,
            base_rate: 0.4,
            rates: Vec::new(),
            description: "4 mpd per bucket after $1000 in it, capped at $1200 each".to_string(),
        }],
        policy: RewardPolicy::DualBucket(DualBucketPolicy {
            first: SpendBucket {
                name: "foreign currency".to_string(),
                members: vec![Category::ForeignCurrency, Category::Overseas],
            },
            second: SpendBucket {
                name: "local retail".to_string(),
                members: vec![
                    Category::Dining,
                    Category::Groceries,
                    Category::Petrol,
                    Category::CommuterPass,
                    Category::Entertainment,
                    Category::Retail,
                ],
            },
            min_spend: 1000.0,
            spend_cap: 1200.0,
            bonus_rate: 4.0,
        }),
    }
}

/// Daily-essentials bonus sharing one aggregate spend cap, with non-bonus
/// spend able to top up the qualifying minimum.
fn shared_cap_cashback() -> CatalogEntry {
    CatalogEntry {
        id: "prd_shared_cap_cashback".to_string(),
        name: "Daily Essentials".to_string(),
        issuer: "Crescent Savings".to_string(),
        kind: ProductKind::Cashback,
        categories: vec![Category::Dining, Category::Groceries, Category::Transport],
        tiers: vec![Tier {
            min_spend: None,
            cap: None,
            base_rate: 0.3,
            rates: vec![
                rate(Category::Dining, 8.0),
                rate(Category::Groceries, 8.0),
                rate(Category::Transport, 8.0),
            ],
            description: "8% essentials on the first $600, min $600 across the card".to_string(),
        }],
        policy: RewardPolicy::SharedSpendCap(SharedSpendCapPolicy {
            bonus: vec![Category::Dining, Category::Groceries, Category::Transport],
            spend_cap: 600.0,
            min_spend: 600.0,
        }),
    }
}
