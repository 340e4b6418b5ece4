pub mod parse;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The closed set of spending categories the engine understands.
///
/// Catalog rate entries and spending vectors both index into this set, so an
/// unknown label is rejected at parse time rather than silently earning zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Dining,
    Groceries,
    Petrol,
    Transport,
    Streaming,
    Entertainment,
    Utilities,
    Online,
    Travel,
    Overseas,
    Retail,
    Departmental,
    ForeignCurrency,
    CommuterPass,
    Other,
}

impl Category {
    pub const ALL: [Category; 15] = [
        Category::Dining,
        Category::Groceries,
        Category::Petrol,
        Category::Transport,
        Category::Streaming,
        Category::Entertainment,
        Category::Utilities,
        Category::Online,
        Category::Travel,
        Category::Overseas,
        Category::Retail,
        Category::Departmental,
        Category::ForeignCurrency,
        Category::CommuterPass,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Dining => "dining",
            Category::Groceries => "groceries",
            Category::Petrol => "petrol",
            Category::Transport => "transport",
            Category::Streaming => "streaming",
            Category::Entertainment => "entertainment",
            Category::Utilities => "utilities",
            Category::Online => "online",
            Category::Travel => "travel",
            Category::Overseas => "overseas",
            Category::Retail => "retail",
            Category::Departmental => "departmental",
            Category::ForeignCurrency => "foreign_currency",
            Category::CommuterPass => "commuter_pass",
            Category::Other => "other",
        }
    }

    /// Parses a category label. Hyphenated spellings are accepted alongside
    /// the canonical snake_case names.
    pub fn parse(raw: &str) -> Option<Category> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        Category::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == normalized)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's categorized monthly spending. Immutable once constructed; amounts
/// are validated to be finite and non-negative at the boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpendingVector {
    amounts: BTreeMap<Category, f64>,
}

impl SpendingVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a spending vector from (category, amount) pairs, summing
    /// duplicate categories. Negative or non-finite amounts are rejected.
    pub fn from_pairs<I>(pairs: I) -> EngineResult<Self>
    where
        I: IntoIterator<Item = (Category, f64)>,
    {
        let mut amounts: BTreeMap<Category, f64> = BTreeMap::new();
        for (category, amount) in pairs {
            if !amount.is_finite() {
                return Err(EngineError::invalid_spend_amount(
                    category.as_str(),
                    "amount must be a finite number",
                ));
            }
            if amount < 0.0 {
                return Err(EngineError::invalid_spend_amount(
                    category.as_str(),
                    &format!("amount must not be negative, got {amount}"),
                ));
            }
            *amounts.entry(category).or_insert(0.0) += amount;
        }
        Ok(Self { amounts })
    }

    /// Internal constructor for allocation splits whose amounts are already
    /// derived from a validated vector.
    pub(crate) fn from_split(amounts: BTreeMap<Category, f64>) -> Self {
        Self { amounts }
    }

    pub fn amount(&self, category: Category) -> f64 {
        self.amounts.get(&category).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.amounts.values().sum()
    }

    /// Non-zero entries in fixed category order.
    pub fn entries(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.amounts
            .iter()
            .filter(|(_, amount)| **amount > 0.0)
            .map(|(category, amount)| (*category, *amount))
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.values().all(|amount| *amount <= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, SpendingVector};

    #[test]
    fn parse_accepts_canonical_and_hyphenated_labels() {
        assert_eq!(Category::parse("dining"), Some(Category::Dining));
        assert_eq!(
            Category::parse("foreign-currency"),
            Some(Category::ForeignCurrency)
        );
        assert_eq!(
            Category::parse("Commuter_Pass"),
            Some(Category::CommuterPass)
        );
        assert_eq!(Category::parse("cryptocurrency"), None);
    }

    #[test]
    fn from_pairs_sums_duplicates_and_totals() {
        let spending = SpendingVector::from_pairs([
            (Category::Dining, 100.0),
            (Category::Dining, 50.0),
            (Category::Travel, 200.0),
        ]);
        assert!(spending.is_ok());
        if let Ok(spending) = spending {
            assert_eq!(spending.amount(Category::Dining), 150.0);
            assert_eq!(spending.total(), 350.0);
        }
    }

    #[test]
    fn from_pairs_rejects_negative_amounts() {
        let spending = SpendingVector::from_pairs([(Category::Dining, -1.0)]);
        assert!(spending.is_err());
        if let Err(error) = spending {
            assert_eq!(error.code, "invalid_spend_amount");
        }
    }

    #[test]
    fn entries_skip_zero_amounts_in_category_order() {
        let spending = SpendingVector::from_pairs([
            (Category::Travel, 10.0),
            (Category::Dining, 20.0),
            (Category::Other, 0.0),
        ]);
        assert!(spending.is_ok());
        if let Ok(spending) = spending {
            let entries = spending.entries().collect::<Vec<(Category, f64)>>();
            assert_eq!(
                entries,
                vec![(Category::Dining, 20.0), (Category::Travel, 10.0)]
            );
        }
    }
}
