pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Render a leaf JSON value for table and CSV cells. The tagged
/// cash-on-cash sentinel prints as a word, not as a nested object.
pub(crate) fn render_cell(value: &Value) -> String {
    if let Value::Object(map) = value {
        if let Some(Value::String(kind)) = map.get("kind") {
            return match (kind.as_str(), map.get("percent")) {
                ("infinite_return", _) => "infinite".to_string(),
                ("finite", Some(Value::String(pct))) => format!("{pct}%"),
                _ => serde_json::to_string(value).unwrap_or_default(),
            };
        }
    }

    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
