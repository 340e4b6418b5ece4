use std::cmp;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub name: &'a str,
    pub align: Align,
}

const INDENT: &str = "  ";
const GAP: &str = "  ";

/// Renders a fixed-width table: each column is as wide as its widest cell,
/// header included, with two-space indent and gaps.
pub fn render_table(columns: &[Column<'_>], rows: &[Vec<String>]) -> Vec<String> {
    if columns.is_empty() {
        return Vec::new();
    }

    let mut widths: Vec<usize> = columns.iter().map(|column| column.name.len()).collect();
    for row in rows {
        for (index, value) in row.iter().enumerate() {
            if let Some(slot) = widths.get_mut(index) {
                *slot = cmp::max(*slot, value.len());
            }
        }
    }

    let header = columns
        .iter()
        .map(|column| column.name.to_string())
        .collect::<Vec<String>>();
    let mut output = vec![format_row(columns, &header, &widths)];
    for row in rows {
        output.push(format_row(columns, row, &widths));
    }
    output
}

fn format_row(columns: &[Column<'_>], cells: &[String], widths: &[usize]) -> String {
    let mut pieces = Vec::with_capacity(columns.len());
    for (index, column) in columns.iter().enumerate() {
        let width = widths.get(index).copied().unwrap_or(0);
        let value = cells.get(index).cloned().unwrap_or_default();
        let piece = match column.align {
            Align::Left => format!("{value:<width$}"),
            Align::Right => format!("{value:>width$}"),
        };
        pieces.push(piece);
    }
    let mut line = format!("{INDENT}{}", pieces.join(GAP));
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

/// Aligned `label  value` rows for summary sections.
pub fn key_value_rows(entries: &[(&str, String)]) -> Vec<String> {
    let label_width = entries
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);
    entries
        .iter()
        .map(|(label, value)| format!("{INDENT}{label:<label_width$}  {value}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{Align, Column, key_value_rows, render_table};

    #[test]
    fn table_aligns_columns_to_widest_cell() {
        let columns = [
            Column {
                name: "Product",
                align: Align::Left,
            },
            Column {
                name: "Reward",
                align: Align::Right,
            },
        ];
        let rows = vec![
            vec!["Gourmet Card".to_string(), "88.00".to_string()],
            vec!["Flat".to_string(), "4.80".to_string()],
        ];

        let rendered = render_table(&columns, &rows);
        assert_eq!(rendered[0], "  Product       Reward");
        assert_eq!(rendered[1], "  Gourmet Card   88.00");
        assert_eq!(rendered[2], "  Flat            4.80");
    }

    #[test]
    fn key_value_rows_align_labels() {
        let rows = key_value_rows(&[
            ("Spend total:", "$2800.00".to_string()),
            ("Catalog:", "built-in".to_string()),
        ]);
        assert_eq!(rows[0], "  Spend total:  $2800.00");
        assert_eq!(rows[1], "  Catalog:      built-in");
    }
}
