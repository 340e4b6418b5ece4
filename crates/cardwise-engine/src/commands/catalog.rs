use std::path::Path;

use crate::catalog::source::load_catalog;
use crate::commands::common::catalog_product_row;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{CatalogListData, CatalogShowData, RateEntryData, TierData};
use crate::error::{EngineError, EngineResult};

pub fn list(catalog_override: Option<&Path>) -> EngineResult<SuccessEnvelope> {
    let catalog = load_catalog(catalog_override)?;
    let data = CatalogListData {
        catalog_source: catalog.source.label(),
        products: catalog.entries.iter().map(catalog_product_row).collect(),
        warnings: catalog.warnings,
    };
    success("catalog list", data)
}

pub fn show(product_id: &str, catalog_override: Option<&Path>) -> EngineResult<SuccessEnvelope> {
    let catalog = load_catalog(catalog_override)?;
    let entry = catalog
        .entries
        .iter()
        .find(|entry| entry.id == product_id)
        .ok_or_else(|| {
            let known_ids: Vec<String> = catalog
                .entries
                .iter()
                .map(|entry| entry.id.clone())
                .collect();
            EngineError::product_not_found(product_id, &known_ids)
        })?;

    let tiers: Vec<TierData> = entry
        .tiers
        .iter()
        .map(|tier| TierData {
            description: tier.description.clone(),
            min_spend: tier.min_spend,
            cap: tier.cap,
            base_rate: tier.base_rate,
            rates: tier
                .rates
                .iter()
                .map(|rate| RateEntryData {
                    category: rate.category.as_str().to_string(),
                    rate: rate.rate,
                    cap_amount: rate.cap.map(|cap| cap.amount),
                    cap_kind: rate.cap.map(|cap| cap.kind.as_str().to_string()),
                    cap_group: rate.cap_group.clone(),
                })
                .collect(),
        })
        .collect();

    let data = CatalogShowData {
        catalog_source: catalog.source.label(),
        product: catalog_product_row(entry),
        tiers,
    };
    success("catalog show", data)
}
