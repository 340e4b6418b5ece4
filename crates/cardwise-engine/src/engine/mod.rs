pub mod allocate;
pub mod category_reward;
pub mod policy;
pub mod product;
pub mod search;
pub mod tier;
pub mod types;

pub use allocate::allocate_pair;
pub use product::{evaluate_product, rank_products};
pub use search::search_pairs;
pub use types::{AllocationResult, ProductAllocation, RewardLine, RewardResult};

/// Tolerance for float comparisons on monetary values.
pub(crate) const MONEY_EPSILON: f64 = 1e-9;
