use std::io;

use serde_json::Value;

use super::table::{Align, Column, key_value_rows, render_table};

pub fn render_rank(data: &Value) -> io::Result<String> {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("rank output requires rows"))?;

    if rows.is_empty() {
        return Ok([
            "No products to rank.",
            "",
            "The loaded catalog has no products matching your filters. Run",
            "`cardwise catalog list` to inspect what is loaded.",
        ]
        .join("\n"));
    }

    let mut lines = vec![
        format!("Top products for your spending ({} ranked).", rows.len()),
        String::new(),
    ];

    let columns = [
        Column {
            name: "#",
            align: Align::Right,
        },
        Column {
            name: "Product",
            align: Align::Left,
        },
        Column {
            name: "Type",
            align: Align::Left,
        },
        Column {
            name: "Monthly",
            align: Align::Right,
        },
        Column {
            name: "Cap",
            align: Align::Left,
        },
        Column {
            name: "Tier",
            align: Align::Left,
        },
    ];
    let table_rows = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            vec![
                format!("{}", index + 1),
                str_of(row, "product_name"),
                str_of(row, "type"),
                format!("${:.2}", f64_of(row, "monthly_reward")),
                cap_cell(row),
                str_of(row, "tier"),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(render_table(&columns, &table_rows));

    lines.push(String::new());
    lines.push("Summary:".to_string());
    lines.extend(key_value_rows(&[
        ("Spend total:", format!("${:.2}", f64_of(data, "spend_total"))),
        ("Miles rate:", format!("{}", f64_of(data, "miles_rate"))),
        ("Catalog:", str_of(data, "catalog_source")),
    ]));

    append_warnings(&mut lines, data);
    Ok(lines.join("\n"))
}

pub fn render_breakdown(data: &Value) -> io::Result<String> {
    let row = data
        .get("row")
        .ok_or_else(|| io::Error::other("breakdown output requires a row"))?;
    let empty = Vec::new();
    let breakdown_lines = data
        .get("lines")
        .and_then(Value::as_array)
        .unwrap_or(&empty);

    let mut lines = vec![
        format!(
            "{} — ${:.2} per month",
            str_of(row, "product_name"),
            f64_of(row, "monthly_reward")
        ),
        String::new(),
    ];
    lines.extend(key_value_rows(&[
        ("Tier:", str_of(row, "tier")),
        ("Issuer:", str_of(row, "issuer")),
        ("Type:", str_of(row, "type")),
        ("Pre-cap reward:", format!("${:.2}", f64_of(row, "original_reward"))),
        ("Cap:", cap_cell(row)),
        (
            "Min spend met:",
            if bool_of(row, "min_spend_met") { "yes" } else { "no" }.to_string(),
        ),
    ]));

    if !breakdown_lines.is_empty() {
        lines.push(String::new());
        lines.push("Breakdown:".to_string());
        let columns = [
            Column {
                name: "Category",
                align: Align::Left,
            },
            Column {
                name: "Amount",
                align: Align::Right,
            },
            Column {
                name: "Rate",
                align: Align::Right,
            },
            Column {
                name: "Reward",
                align: Align::Right,
            },
        ];
        let table_rows = breakdown_lines
            .iter()
            .map(|line| {
                vec![
                    str_of(line, "category"),
                    format!("${:.2}", f64_of(line, "amount")),
                    format!("{}", f64_of(line, "rate")),
                    format!("${:.2}", f64_of(line, "reward")),
                ]
            })
            .collect::<Vec<Vec<String>>>();
        lines.extend(render_table(&columns, &table_rows));
    }

    if let Some(notes) = row.get("notes").and_then(Value::as_array)
        && !notes.is_empty()
    {
        lines.push(String::new());
        lines.push("Notes:".to_string());
        for note in notes {
            if let Some(note) = note.as_str() {
                lines.push(format!("  - {note}"));
            }
        }
    }

    Ok(lines.join("\n"))
}

pub(crate) fn append_warnings(lines: &mut Vec<String>, data: &Value) {
    if let Some(warnings) = data.get("warnings").and_then(Value::as_array)
        && !warnings.is_empty()
    {
        lines.push(String::new());
        lines.push("Catalog warnings:".to_string());
        for warning in warnings {
            let product = warning
                .get("product_id")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            let detail = warning
                .get("detail")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            lines.push(format!("  - {product}: {detail}"));
        }
    }
}

pub(crate) fn str_of(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}

pub(crate) fn f64_of(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

pub(crate) fn bool_of(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

pub(crate) fn cap_cell(row: &Value) -> String {
    if !bool_of(row, "cap_reached") {
        return "-".to_string();
    }
    match row.get("cap_difference").and_then(Value::as_f64) {
        Some(difference) => format!("capped (-${difference:.2})"),
        None => "capped".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{render_breakdown, render_rank};

    #[test]
    fn rank_renders_table_and_summary() {
        let data = json!({
            "rows": [
                {
                    "product_id": "prd_a",
                    "product_name": "Gourmet Card",
                    "type": "cashback",
                    "tier": "6% dining",
                    "monthly_reward": 88.0,
                    "cap_reached": true,
                    "cap_difference": 40.0,
                    "min_spend_met": true
                }
            ],
            "spend_total": 2800.0,
            "miles_rate": 0.02,
            "catalog_source": "built-in"
        });

        let rendered = render_rank(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Top products for your spending (1 ranked)."));
            assert!(text.contains("Gourmet Card"));
            assert!(text.contains("$88.00"));
            assert!(text.contains("capped (-$40.00)"));
            assert!(text.contains("Catalog:      built-in"));
        }
    }

    #[test]
    fn empty_rank_uses_plaintext_no_data_message() {
        let rendered = render_rank(&json!({ "rows": [] }));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("No products to rank."));
        }
    }

    #[test]
    fn breakdown_renders_lines_and_notes() {
        let data = json!({
            "row": {
                "product_name": "Select Miles",
                "type": "miles",
                "issuer": "Harbor Trust",
                "tier": "select tier",
                "monthly_reward": 81.6,
                "original_reward": 81.6,
                "cap_reached": false,
                "min_spend_met": true,
                "notes": ["bonus rate applied to group(s): dining"]
            },
            "lines": [
                { "category": "dining", "amount": 1000.0, "rate": 4.0, "reward": 80.0 },
                { "category": "dining", "amount": 200.0, "rate": 0.4, "reward": 1.6 }
            ]
        });

        let rendered = render_breakdown(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Select Miles — $81.60 per month"));
            assert!(text.contains("Breakdown:"));
            assert!(text.contains("$1000.00"));
            assert!(text.contains("- bonus rate applied to group(s): dining"));
        }
    }
}
