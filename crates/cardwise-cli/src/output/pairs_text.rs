use std::io;

use serde_json::Value;

use super::rank_text::{append_warnings, f64_of, str_of};
use super::table::key_value_rows;

pub fn render_pairs(data: &Value) -> io::Result<String> {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("pairs output requires rows"))?;

    if rows.is_empty() {
        return Ok([
            "No product pairs to evaluate.",
            "",
            "Pair search needs at least two products in the catalog. Run",
            "`cardwise catalog list` to inspect what is loaded.",
        ]
        .join("\n"));
    }

    let pair_count = data
        .get("pair_count")
        .and_then(Value::as_u64)
        .unwrap_or(rows.len() as u64);
    let mut lines = vec![
        format!(
            "Best two-product combinations ({} of {pair_count} pairs shown).",
            rows.len()
        ),
    ];

    for (index, row) in rows.iter().enumerate() {
        lines.push(String::new());
        let first = row.get("first").cloned().unwrap_or(Value::Null);
        let second = row.get("second").cloned().unwrap_or(Value::Null);
        lines.push(format!(
            "{}. {} + {} — ${:.2} per month",
            index + 1,
            str_of(&first, "product_name"),
            str_of(&second, "product_name"),
            f64_of(row, "combined_reward"),
        ));
        lines.push(side_line(&first));
        lines.push(side_line(&second));
    }

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

fn side_line(side: &Value) -> String {
    let split = side
        .get("split")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .map(|entry| {
                    format!(
                        "{} ${:.2}",
                        str_of(entry, "category"),
                        f64_of(entry, "amount")
                    )
                })
                .collect::<Vec<String>>()
                .join(", ")
        })
        .unwrap_or_default();
    let split_suffix = if split.is_empty() {
        "no spend routed".to_string()
    } else {
        split
    };
    format!(
        "   {} earns ${:.2}: {}",
        str_of(side, "product_name"),
        f64_of(side, "monthly_reward"),
        split_suffix
    )
}
