pub mod builtin;
pub mod parse;
pub mod source;
pub mod types;
pub mod validate;

pub use source::{CatalogSource, LoadedCatalog, load_catalog};
pub use types::{
    BonusGroup, CapKind, CatalogEntry, ProductKind, RateCap, RateEntry, RewardPolicy, SpendBucket,
    Tier,
};
