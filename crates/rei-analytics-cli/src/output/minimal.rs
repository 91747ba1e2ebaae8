use serde_json::Value;

use super::render_cell;

/// Print just the headline number from the output.
///
/// Heuristic: walk a priority list of result fields and print the first one
/// present, falling back to the first field of the result object.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Order matters: deal-level scores and rates beat raw dollar figures
    let priority_keys = [
        "deal_score",
        "irr",
        "cap_rate",
        "cash_on_cash",
        "total_roi",
        "net_profit",
        "mao",
        "max_offer",
    ];

    if let Value::Object(map) = result {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", render_cell(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, render_cell(val));
            return;
        }
    }

    println!("{}", render_cell(result));
}
