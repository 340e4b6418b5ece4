use crate::catalog::types::CatalogEntry;
use crate::engine::allocate::allocate_pair;
use crate::engine::types::AllocationResult;
use crate::spending::SpendingVector;

/// Evaluates every unordered product pair in the catalog and ranks the
/// allocations by combined reward, descending.
///
/// Pure in its inputs: identical (catalog, spending, miles rate) always
/// yields an identical, identically-ordered list of n(n-1)/2 results.
pub fn search_pairs(
    catalog: &[CatalogEntry],
    spending: &SpendingVector,
    miles_rate: f64,
) -> Vec<AllocationResult> {
    let mut results = Vec::with_capacity(catalog.len().saturating_mul(catalog.len()) / 2);
    for (index, first) in catalog.iter().enumerate() {
        for second in catalog.iter().skip(index + 1) {
            results.push(allocate_pair(first, second, spending, miles_rate));
        }
    }
    results.sort_by(|left, right| {
        right
            .combined_reward
            .total_cmp(&left.combined_reward)
            .then_with(|| {
                left.first
                    .result
                    .product_id
                    .cmp(&right.first.result.product_id)
            })
            .then_with(|| {
                left.second
                    .result
                    .product_id
                    .cmp(&right.second.result.product_id)
            })
    });
    results
}

#[cfg(test)]
mod tests {
    use super::search_pairs;
    use crate::catalog::types::{CatalogEntry, ProductKind, RateEntry, RewardPolicy, Tier};
    use crate::spending::{Category, SpendingVector};

    fn flat_cashback(id: &str, rate: f64) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            name: format!("Card {id}"),
            issuer: "Bank".to_string(),
            kind: ProductKind::Cashback,
            categories: Vec::new(),
            tiers: vec![Tier {
                min_spend: None,
                cap: None,
                base_rate: rate,
                rates: vec![RateEntry {
                    category: Category::Dining,
                    rate,
                    cap: None,
                    cap_group: None,
                }],
                description: format!("flat {rate}%"),
            }],
            policy: RewardPolicy::Standard,
        }
    }

    #[test]
    fn returns_all_unordered_pairs_sorted_descending() {
        let catalog = vec![
            flat_cashback("prd_a", 1.0),
            flat_cashback("prd_b", 2.0),
            flat_cashback("prd_c", 3.0),
            flat_cashback("prd_d", 0.5),
        ];
        let spending =
            SpendingVector::from_pairs([(Category::Dining, 1000.0)]).unwrap_or_default();

        let results = search_pairs(&catalog, &spending, 0.02);
        assert_eq!(results.len(), 6);
        for window in results.windows(2) {
            assert!(window[0].combined_reward >= window[1].combined_reward);
        }
        // The strongest pair routes everything through the 3% product.
        assert!((results[0].combined_reward - 30.0).abs() < 1e-9);
    }

    #[test]
    fn identical_inputs_yield_identical_ordering() {
        let catalog = vec![
            flat_cashback("prd_a", 2.0),
            flat_cashback("prd_b", 2.0),
            flat_cashback("prd_c", 2.0),
        ];
        let spending =
            SpendingVector::from_pairs([(Category::Dining, 500.0)]).unwrap_or_default();

        let first_run = search_pairs(&catalog, &spending, 0.02);
        let second_run = search_pairs(&catalog, &spending, 0.02);
        let ids = |results: &[crate::engine::types::AllocationResult]| {
            results
                .iter()
                .map(|result| {
                    format!(
                        "{}+{}",
                        result.first.result.product_id, result.second.result.product_id
                    )
                })
                .collect::<Vec<String>>()
        };
        assert_eq!(ids(&first_run), ids(&second_run));
    }

    #[test]
    fn single_product_catalog_yields_no_pairs() {
        let catalog = vec![flat_cashback("prd_a", 1.0)];
        let spending =
            SpendingVector::from_pairs([(Category::Dining, 500.0)]).unwrap_or_default();
        assert!(search_pairs(&catalog, &spending, 0.02).is_empty());
    }
}
