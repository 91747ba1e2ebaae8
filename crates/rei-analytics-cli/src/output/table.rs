use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::render_cell;

/// Keys holding per-period rows that read better as their own table than
/// as a cell in the summary.
const SEQUENCE_KEYS: [&str; 2] = ["yearly_projections", "monthly_breakdown"];

/// Format output as tables using the tabled crate: one summary table of
/// scalar fields, then one table per projection sequence, then warnings
/// and methodology from the envelope.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result);
                print_envelope_footer(map);
            } else {
                print_record(value);
            }
        }
        Value::Array(rows) => print_rows(rows),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value) {
    match result {
        Value::Object(_) => print_record(result),
        // A comparison run returns an array of ranked properties
        Value::Array(rows) => print_comparison(rows),
        _ => println!("{}", result),
    }
}

/// Scalar fields as a two-column table; sequences get their own table each.
fn print_record(value: &Value) {
    let Value::Object(map) = value else {
        println!("{}", value);
        return;
    };

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if SEQUENCE_KEYS.contains(&key.as_str()) {
            continue;
        }
        builder.push_record([key.as_str(), &render_cell(val)]);
    }
    println!("{}", Table::from(builder));

    for key in SEQUENCE_KEYS {
        if let Some(Value::Array(rows)) = map.get(key) {
            if !rows.is_empty() {
                println!("\n{key}:");
                print_rows(rows);
            }
        }
    }
}

/// Ranked comparison: one row per property with its metric ranks.
fn print_comparison(rows: &[Value]) {
    let mut builder = Builder::default();
    builder.push_record(["Rank", "Id", "Name", "Cap", "CoC", "IRR", "ROI", "Overall"]);

    for (position, row) in rows.iter().enumerate() {
        let rankings = &row["rankings"];
        builder.push_record([
            (position + 1).to_string(),
            render_cell(&row["property_id"]),
            render_cell(&row["name"]),
            render_cell(&rankings["cap_rate"]),
            render_cell(&rankings["cash_on_cash"]),
            render_cell(&rankings["irr"]),
            render_cell(&rankings["total_roi"]),
            render_cell(&rankings["overall"]),
        ]);
    }
    println!("{}", Table::from(builder));
}

/// Array of homogeneous objects: headers from the first row.
fn print_rows(rows: &[Value]) {
    if rows.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = rows.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for row in rows {
            if let Value::Object(map) = row {
                let cells: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(render_cell).unwrap_or_default())
                    .collect();
                builder.push_record(cells);
            }
        }
        println!("{}", Table::from(builder));
    } else {
        for row in rows {
            println!("{}", render_cell(row));
        }
    }
}

fn print_envelope_footer(envelope: &serde_json::Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(methodology)) = envelope.get("methodology") {
        println!("\nMethodology: {}", methodology);
    }
}
