use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::types::{CapKind, CatalogEntry, RateCap, RewardPolicy};
use crate::contracts::types::{CatalogIssue, CatalogWarning};
use crate::error::{EngineError, EngineResult};
use crate::spending::Category;

/// A catalog that passed structural validation, possibly with degraded cap
/// configuration reported through warnings.
#[derive(Debug, Clone)]
pub struct ValidatedCatalog {
    pub entries: Vec<CatalogEntry>,
    pub warnings: Vec<CatalogWarning>,
}

/// Validates and normalizes a parsed catalog.
///
/// Structural problems (bad rates, duplicate ids, malformed policies) reject
/// the whole catalog with per-product issues. Cap misconfiguration degrades
/// instead: the cap is dropped, a warning recorded, and the product stays
/// loadable.
pub fn validate_catalog(entries: Vec<CatalogEntry>) -> EngineResult<ValidatedCatalog> {
    let mut issues: Vec<CatalogIssue> = Vec::new();
    let mut warnings: Vec<CatalogWarning> = Vec::new();
    let mut seen_ids: BTreeSet<String> = BTreeSet::new();
    let mut normalized = Vec::with_capacity(entries.len());

    for mut entry in entries {
        if entry.id.trim().is_empty() {
            issues.push(issue(&entry, None, "product id must be non-empty"));
        }
        if entry.name.trim().is_empty() {
            issues.push(issue(&entry, None, "product name must be non-empty"));
        }
        if !seen_ids.insert(entry.id.clone()) {
            issues.push(issue(&entry, None, "product id is duplicated in the catalog"));
        }
        if entry.tiers.is_empty() {
            // Legal but surprising; evaluation treats it as zero reward.
            warnings.push(warning(&entry, "product has no tiers and will earn zero"));
        }

        validate_tiers(&mut entry, &mut issues, &mut warnings);
        validate_policy(&entry, &mut issues);
        normalized.push(entry);
    }

    if !issues.is_empty() {
        return Err(EngineError::catalog_validation_failed(issues));
    }
    Ok(ValidatedCatalog {
        entries: normalized,
        warnings,
    })
}

fn validate_tiers(
    entry: &mut CatalogEntry,
    issues: &mut Vec<CatalogIssue>,
    warnings: &mut Vec<CatalogWarning>,
) {
    let id = entry.id.clone();
    let name = entry.name.clone();
    for tier in &mut entry.tiers {
        if !tier.base_rate.is_finite() || tier.base_rate < 0.0 {
            issues.push(CatalogIssue {
                product_id: id.clone(),
                category: None,
                detail: format!("tier `{}` has an invalid base rate", tier.description),
            });
        }
        if let Some(min_spend) = tier.min_spend
            && (!min_spend.is_finite() || min_spend < 0.0)
        {
            issues.push(CatalogIssue {
                product_id: id.clone(),
                category: None,
                detail: format!("tier `{}` has an invalid minimum spend", tier.description),
            });
        }
        if let Some(cap) = tier.cap
            && (!cap.is_finite() || cap <= 0.0)
        {
            // Cap misconfiguration degrades to no cap.
            tier.cap = None;
            warnings.push(CatalogWarning {
                product_id: id.clone(),
                detail: format!(
                    "tier `{}` cap was not a positive number and was ignored",
                    tier.description
                ),
            });
        }

        for rate in &mut tier.rates {
            if !rate.rate.is_finite() || rate.rate < 0.0 {
                issues.push(CatalogIssue {
                    product_id: id.clone(),
                    category: Some(rate.category.as_str().to_string()),
                    detail: format!("rate entry for `{name}` is missing a valid rate"),
                });
            }
            // Sanitize caps before any group resolution sees them.
            if let Some(cap) = rate.cap
                && (!cap.amount.is_finite() || cap.amount <= 0.0)
            {
                rate.cap = None;
                warnings.push(CatalogWarning {
                    product_id: id.clone(),
                    detail: format!(
                        "cap on `{}` was not a positive number and was ignored",
                        rate.category
                    ),
                });
            }
        }

        let mut group_members: BTreeMap<String, usize> = BTreeMap::new();
        let mut group_caps: BTreeMap<String, f64> = BTreeMap::new();
        for rate in &tier.rates {
            if let Some(group) = rate.cap_group.as_deref() {
                *group_members.entry(group.to_string()).or_insert(0) += 1;
                if let Some(cap) = rate.cap {
                    group_caps.entry(group.to_string()).or_insert(cap.amount);
                }
            }
        }
        for rate in &mut tier.rates {
            let Some(group) = rate.cap_group.clone() else {
                continue;
            };
            let members = group_members.get(&group).copied().unwrap_or(0);
            if members < 2 {
                // A cap group with a single row is a misconfiguration;
                // treat the grouping as absent.
                rate.cap_group = None;
                warnings.push(CatalogWarning {
                    product_id: id.clone(),
                    detail: format!("cap group `{group}` has no other members and was ignored"),
                });
            } else if let Some(cap_amount) = group_caps.get(&group).copied() {
                // Normalize so every member carries the group cap.
                match rate.cap.as_mut() {
                    Some(existing) => existing.amount = cap_amount,
                    None => {
                        rate.cap = Some(RateCap {
                            amount: cap_amount,
                            kind: CapKind::Earned,
                        });
                    }
                }
            }
        }
    }
}

fn validate_policy(entry: &CatalogEntry, issues: &mut Vec<CatalogIssue>) {
    match &entry.policy {
        RewardPolicy::Standard => {}
        RewardPolicy::TopGroupBonus(policy) => {
            if policy.groups.is_empty() {
                issues.push(issue(entry, None, "top_group_bonus policy has no groups"));
            }
            if policy.picks == 0 || policy.picks > policy.groups.len() {
                issues.push(issue(
                    entry,
                    None,
                    "top_group_bonus picks must be between 1 and the group count",
                ));
            }
            if policy.group_spend_cap <= 0.0 || !policy.group_spend_cap.is_finite() {
                issues.push(issue(entry, None, "top_group_bonus group cap must be positive"));
            }
            let mut seen: BTreeSet<Category> = BTreeSet::new();
            for group in &policy.groups {
                for member in &group.members {
                    if !seen.insert(*member) {
                        issues.push(issue(
                            entry,
                            Some(*member),
                            "category appears in more than one bonus group",
                        ));
                    }
                }
            }
        }
        RewardPolicy::TopCategoryBonus(policy) => {
            if policy.eligible.is_empty() {
                issues.push(issue(
                    entry,
                    None,
                    "top_category_bonus policy has no eligible categories",
                ));
            }
            if policy.bonus_rate < 0.0 || !policy.bonus_rate.is_finite() {
                issues.push(issue(entry, None, "top_category_bonus rate must be non-negative"));
            }
        }
        RewardPolicy::DualBucket(policy) => {
            let overlap: Vec<Category> = policy
                .first
                .members
                .iter()
                .filter(|member| policy.second.members.contains(member))
                .copied()
                .collect();
            for member in overlap {
                issues.push(issue(
                    entry,
                    Some(member),
                    "category appears in both dual-bucket buckets",
                ));
            }
            if policy.spend_cap <= 0.0 || !policy.spend_cap.is_finite() {
                issues.push(issue(entry, None, "dual_bucket spend cap must be positive"));
            }
        }
        RewardPolicy::SharedSpendCap(policy) => {
            if policy.bonus.is_empty() {
                issues.push(issue(
                    entry,
                    None,
                    "shared_spend_cap policy has no bonus categories",
                ));
            }
            if policy.spend_cap <= 0.0 || !policy.spend_cap.is_finite() {
                issues.push(issue(entry, None, "shared_spend_cap spend cap must be positive"));
            }
        }
    }
}

fn issue(entry: &CatalogEntry, category: Option<Category>, detail: &str) -> CatalogIssue {
    CatalogIssue {
        product_id: entry.id.clone(),
        category: category.map(|category| category.as_str().to_string()),
        detail: detail.to_string(),
    }
}

fn warning(entry: &CatalogEntry, detail: &str) -> CatalogWarning {
    CatalogWarning {
        product_id: entry.id.clone(),
        detail: detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::validate_catalog;
    use crate::catalog::types::{
        CapKind, CatalogEntry, ProductKind, RateCap, RateEntry, RewardPolicy, Tier,
    };
    use crate::spending::Category;

    fn entry(id: &str, tiers: Vec<Tier>) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            name: format!("Card {id}"),
            issuer: "Bank".to_string(),
            kind: ProductKind::Cashback,
            categories: Vec::new(),
            tiers,
            policy: RewardPolicy::Standard,
        }
    }

    fn plain_tier() -> Tier {
        Tier {
            min_spend: None,
            cap: None,
            base_rate: 1.0,
            rates: Vec::new(),
            description: "plain".to_string(),
        }
    }

    #[test]
    fn accepts_well_formed_catalog() {
        let validated = validate_catalog(vec![entry("prd_a", vec![plain_tier()])]);
        assert!(validated.is_ok());
        if let Ok(validated) = validated {
            assert_eq!(validated.entries.len(), 1);
            assert!(validated.warnings.is_empty());
        }
    }

    #[test]
    fn rejects_duplicate_product_ids() {
        let validated = validate_catalog(vec![
            entry("prd_a", vec![plain_tier()]),
            entry("prd_a", vec![plain_tier()]),
        ]);
        assert!(validated.is_err());
        if let Err(error) = validated {
            assert_eq!(error.code, "catalog_validation_failed");
        }
    }

    #[test]
    fn rejects_negative_rate_with_category_context() {
        let mut tier = plain_tier();
        tier.rates.push(RateEntry {
            category: Category::Dining,
            rate: -2.0,
            cap: None,
            cap_group: None,
        });
        let validated = validate_catalog(vec![entry("prd_a", vec![tier])]);
        assert!(validated.is_err());
    }

    #[test]
    fn non_positive_tier_cap_degrades_with_warning() {
        let mut tier = plain_tier();
        tier.cap = Some(0.0);
        let validated = validate_catalog(vec![entry("prd_a", vec![tier])]);
        assert!(validated.is_ok());
        if let Ok(validated) = validated {
            assert!(validated.entries[0].tiers[0].cap.is_none());
            assert_eq!(validated.warnings.len(), 1);
        }
    }

    #[test]
    fn singleton_cap_group_degrades_to_ungrouped() {
        let mut tier = plain_tier();
        tier.rates.push(RateEntry {
            category: Category::Dining,
            rate: 5.0,
            cap: Some(RateCap {
                amount: 50.0,
                kind: CapKind::Earned,
            }),
            cap_group: Some("solo".to_string()),
        });
        let validated = validate_catalog(vec![entry("prd_a", vec![tier])]);
        assert!(validated.is_ok());
        if let Ok(validated) = validated {
            assert!(validated.entries[0].tiers[0].rates[0].cap_group.is_none());
            assert!(!validated.warnings.is_empty());
        }
    }

    #[test]
    fn cap_group_members_inherit_the_group_cap() {
        let cap = Some(RateCap {
            amount: 70.0,
            kind: CapKind::Earned,
        });
        let mut tier = plain_tier();
        tier.rates.push(RateEntry {
            category: Category::Dining,
            rate: 5.0,
            cap,
            cap_group: Some("bonus".to_string()),
        });
        tier.rates.push(RateEntry {
            category: Category::Groceries,
            rate: 5.0,
            cap: None,
            cap_group: Some("bonus".to_string()),
        });
        let validated = validate_catalog(vec![entry("prd_a", vec![tier])]);
        assert!(validated.is_ok());
        if let Ok(validated) = validated {
            let rates = &validated.entries[0].tiers[0].rates;
            assert_eq!(rates[1].cap.map(|cap| cap.amount), Some(70.0));
        }
    }
}
