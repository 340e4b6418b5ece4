use serde_json::Value;

use crate::error::{EngineError, EngineResult};
use crate::spending::{Category, SpendingVector};

/// Parses spending input content into a validated vector.
///
/// Two formats are accepted: a JSON object mapping category names to amounts,
/// or CSV with a `category,amount` header row. The format is sniffed from the
/// first non-whitespace byte.
pub fn parse_spending(content: &str) -> EngineResult<SpendingVector> {
    let trimmed = content.trim_start();
    if trimmed.is_empty() {
        return Err(EngineError::invalid_spend_format(
            "Spending input is empty.",
            "empty",
        ));
    }
    if trimmed.starts_with('{') {
        return parse_json_spending(content);
    }
    if trimmed.starts_with('[') {
        return Err(EngineError::invalid_spend_format(
            "Spending JSON must be a single object of category to amount, not an array.",
            "json_array",
        ));
    }
    parse_csv_spending(content)
}

fn parse_json_spending(content: &str) -> EngineResult<SpendingVector> {
    let value: Value = serde_json::from_str(content).map_err(|error| {
        EngineError::invalid_spend_format(
            &format!("Spending JSON could not be parsed: {error}"),
            "json",
        )
    })?;
    let Some(object) = value.as_object() else {
        return Err(EngineError::invalid_spend_format(
            "Spending JSON must be a single object of category to amount.",
            "json",
        ));
    };

    let mut pairs = Vec::with_capacity(object.len());
    for (raw_category, raw_amount) in object {
        // A derived `total` key is tolerated on input and recomputed.
        if raw_category.eq_ignore_ascii_case("total") {
            continue;
        }
        let category =
            Category::parse(raw_category).ok_or_else(|| EngineError::unknown_category(raw_category))?;
        let amount = raw_amount.as_f64().ok_or_else(|| {
            EngineError::invalid_spend_amount(category.as_str(), "amount must be a JSON number")
        })?;
        pairs.push((category, amount));
    }
    SpendingVector::from_pairs(pairs)
}

fn parse_csv_spending(content: &str) -> EngineResult<SpendingVector> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers().map_err(|error| {
        EngineError::invalid_spend_format(
            &format!("Spending CSV header row could not be read: {error}"),
            "csv",
        )
    })?;
    let header_names = headers
        .iter()
        .map(str::to_ascii_lowercase)
        .collect::<Vec<String>>();
    if header_names != ["category", "amount"] {
        return Err(EngineError::invalid_spend_format(
            "Spending CSV must have exactly the headers `category,amount`.",
            "csv",
        ));
    }

    let mut pairs = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let row = index + 2;
        let record = record.map_err(|error| {
            EngineError::invalid_spend_format(
                &format!("Spending CSV row {row} could not be read: {error}"),
                "csv",
            )
        })?;
        let raw_category = record.get(0).unwrap_or("");
        let raw_amount = record.get(1).unwrap_or("");
        let category =
            Category::parse(raw_category).ok_or_else(|| EngineError::unknown_category(raw_category))?;
        let amount = raw_amount.parse::<f64>().map_err(|_| {
            EngineError::invalid_spend_amount(
                category.as_str(),
                &format!("row {row} amount `{raw_amount}` is not a number"),
            )
        })?;
        pairs.push((category, amount));
    }
    SpendingVector::from_pairs(pairs)
}
