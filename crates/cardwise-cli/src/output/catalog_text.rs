use std::io;

use serde_json::Value;

use super::rank_text::{append_warnings, f64_of, str_of};
use super::table::{Align, Column, key_value_rows, render_table};

pub fn render_catalog_list(data: &Value) -> io::Result<String> {
    let products = data
        .get("products")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("catalog list output requires products"))?;

    if products.is_empty() {
        return Ok([
            "The catalog is empty.",
            "",
            "Point `--catalog` at a catalog JSON file, or remove the flag to",
            "use the built-in catalog.",
        ]
        .join("\n"));
    }

    let mut lines = vec![
        format!(
            "{} products loaded from {}.",
            products.len(),
            str_of(data, "catalog_source")
        ),
        String::new(),
    ];

    let columns = [
        Column {
            name: "Id",
            align: Align::Left,
        },
        Column {
            name: "Name",
            align: Align::Left,
        },
        Column {
            name: "Issuer",
            align: Align::Left,
        },
        Column {
            name: "Type",
            align: Align::Left,
        },
        Column {
            name: "Policy",
            align: Align::Left,
        },
        Column {
            name: "Tiers",
            align: Align::Right,
        },
    ];
    let table_rows = products
        .iter()
        .map(|product| {
            vec![
                str_of(product, "id"),
                str_of(product, "name"),
                str_of(product, "issuer"),
                str_of(product, "type"),
                str_of(product, "policy"),
                product
                    .get("tier_count")
                    .and_then(Value::as_u64)
                    .unwrap_or(0)
                    .to_string(),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(render_table(&columns, &table_rows));

    append_warnings(&mut lines, data);
    Ok(lines.join("\n"))
}

pub fn render_catalog_show(data: &Value) -> io::Result<String> {
    let product = data
        .get("product")
        .ok_or_else(|| io::Error::other("catalog show output requires a product"))?;
    let empty = Vec::new();
    let tiers = data.get("tiers").and_then(Value::as_array).unwrap_or(&empty);

    let categories = product
        .get("categories")
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<&str>>()
                .join(", ")
        })
        .unwrap_or_default();

    let mut lines = vec![
        format!("{} ({})", str_of(product, "name"), str_of(product, "id")),
        String::new(),
    ];
    lines.extend(key_value_rows(&[
        ("Issuer:", str_of(product, "issuer")),
        ("Type:", str_of(product, "type")),
        ("Policy:", str_of(product, "policy")),
        (
            "Categories:",
            if categories.is_empty() {
                "-".to_string()
            } else {
                categories
            },
        ),
    ]));

    for (index, tier) in tiers.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("Tier {}: {}", index + 1, str_of(tier, "description")));
        let min_spend = tier
            .get("min_spend")
            .and_then(Value::as_f64)
            .map(|value| format!("${value:.2}"))
            .unwrap_or("-".to_string());
        let cap = tier
            .get("cap")
            .and_then(Value::as_f64)
            .map(|value| format!("${value:.2}"))
            .unwrap_or("-".to_string());
        lines.extend(key_value_rows(&[
            ("Min spend:", min_spend),
            ("Overall cap:", cap),
            ("Base rate:", format!("{}", f64_of(tier, "base_rate"))),
        ]));

        if let Some(rates) = tier.get("rates").and_then(Value::as_array)
            && !rates.is_empty()
        {
            let columns = [
                Column {
                    name: "Category",
                    align: Align::Left,
                },
                Column {
                    name: "Rate",
                    align: Align::Right,
                },
                Column {
                    name: "Cap",
                    align: Align::Left,
                },
                Column {
                    name: "Group",
                    align: Align::Left,
                },
            ];
            let table_rows = rates
                .iter()
                .map(|rate| {
                    let cap_cell = match (
                        rate.get("cap_amount").and_then(Value::as_f64),
                        rate.get("cap_kind").and_then(Value::as_str),
                    ) {
                        (Some(amount), Some(kind)) => format!("${amount:.2} {kind}"),
                        _ => "-".to_string(),
                    };
                    vec![
                        str_of(rate, "category"),
                        format!("{}", f64_of(rate, "rate")),
                        cap_cell,
                        rate.get("cap_group")
                            .and_then(Value::as_str)
                            .unwrap_or("-")
                            .to_string(),
                    ]
                })
                .collect::<Vec<Vec<String>>>();
            lines.extend(render_table(&columns, &table_rows));
        }
    }

    Ok(lines.join("\n"))
}
