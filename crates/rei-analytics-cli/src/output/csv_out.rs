use serde_json::Value;
use std::io;

use super::render_cell;

/// Write output as CSV to stdout. Scalar results become two-column
/// field/value rows; arrays of records become one CSV row per record with
/// headers taken from the first.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in map {
                // Per-period sequences do not flatten into field/value rows
                if val.is_array() {
                    continue;
                }
                let _ = wtr.write_record([key.as_str(), &render_cell(val)]);
            }
        }
        Value::Array(rows) => write_rows(&mut wtr, rows),
        _ => {
            let _ = wtr.write_record([&render_cell(result)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    if rows.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = rows.first() {
        let headers: Vec<&str> = first
            .keys()
            .map(|k| k.as_str())
            .filter(|k| !matches!(first.get(*k), Some(v) if v.is_array()))
            .collect();
        let _ = wtr.write_record(&headers);

        for row in rows {
            if let Value::Object(map) = row {
                let cells: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(render_cell).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&cells);
            }
        }
    } else {
        for row in rows {
            let _ = wtr.write_record([&render_cell(row)]);
        }
    }
}
