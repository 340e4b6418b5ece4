use serde::Serialize;

/// A structural problem found while validating a catalog, with enough
/// context to point a caller at the offending product and category.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogIssue {
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub detail: String,
}

/// A degraded-but-loadable catalog condition, e.g. a cap dropped because it
/// was misconfigured.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogWarning {
    pub product_id: String,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RewardLineData {
    pub category: String,
    pub amount: f64,
    pub rate: f64,
    pub reward: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RewardRow {
    pub product_id: String,
    pub product_name: String,
    pub issuer: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub tier: String,
    pub monthly_reward: f64,
    pub original_reward: f64,
    pub cap_reached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap_difference: Option<f64>,
    pub min_spend_met: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankData {
    pub catalog_source: String,
    pub product_count: usize,
    pub miles_rate: f64,
    pub spend_total: f64,
    pub rows: Vec<RewardRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<CatalogWarning>,
    pub completed_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BreakdownData {
    pub catalog_source: String,
    pub miles_rate: f64,
    pub spend_total: f64,
    pub row: RewardRow,
    pub lines: Vec<RewardLineData>,
    pub completed_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SplitLineData {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PairSideData {
    pub product_id: String,
    pub product_name: String,
    pub tier: String,
    pub monthly_reward: f64,
    pub split: Vec<SplitLineData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PairRow {
    pub first: PairSideData,
    pub second: PairSideData,
    pub combined_reward: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PairsData {
    pub catalog_source: String,
    pub product_count: usize,
    pub pair_count: usize,
    pub shown: usize,
    pub miles_rate: f64,
    pub spend_total: f64,
    pub rows: Vec<PairRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<CatalogWarning>,
    pub completed_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogProductRow {
    pub id: String,
    pub name: String,
    pub issuer: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub policy: String,
    pub categories: Vec<String>,
    pub tier_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogListData {
    pub catalog_source: String,
    pub products: Vec<CatalogProductRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<CatalogWarning>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RateEntryData {
    pub category: String,
    pub rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap_group: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TierData {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_spend: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap: Option<f64>,
    pub base_rate: f64,
    pub rates: Vec<RateEntryData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogShowData {
    pub catalog_source: String,
    pub product: CatalogProductRow,
    pub tiers: Vec<TierData>,
}
