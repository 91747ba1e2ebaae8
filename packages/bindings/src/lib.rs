use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_money(name: &str, raw: &str) -> NapiResult<Decimal> {
    Decimal::from_str(raw)
        .map_err(|e| napi::Error::from_reason(format!("Invalid decimal for {name}: {e}")))
}

// ---------------------------------------------------------------------------
// Buy-and-hold analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_property(input_json: String) -> NapiResult<String> {
    let input: rei_analytics_core::investment::PropertyInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        rei_analytics_core::investment::analyze_property(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_properties(input_json: String) -> NapiResult<String> {
    let batch: Vec<rei_analytics_core::investment::CandidateProperty> =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        rei_analytics_core::investment::compare_properties(&batch).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// BRRR analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_brrr(input_json: String) -> NapiResult<String> {
    let input: rei_analytics_core::brrr::BrrrInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rei_analytics_core::brrr::analyze_brrr(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn seventy_percent_rule(arv: String, repair_costs: String) -> NapiResult<String> {
    let arv = parse_money("arv", &arv)?;
    let repairs = parse_money("repair_costs", &repair_costs)?;
    Ok(rei_analytics_core::brrr::seventy_percent_rule(arv, repairs).to_string())
}

#[napi]
pub fn maximum_allowable_offer(
    arv: String,
    repair_costs: String,
    desired_profit: String,
    closing_costs: String,
) -> NapiResult<String> {
    let arv = parse_money("arv", &arv)?;
    let repairs = parse_money("repair_costs", &repair_costs)?;
    let profit = parse_money("desired_profit", &desired_profit)?;
    let closing = parse_money("closing_costs", &closing_costs)?;
    Ok(rei_analytics_core::brrr::maximum_allowable_offer(arv, repairs, profit, closing).to_string())
}

// ---------------------------------------------------------------------------
// Fix-and-flip analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_flip(input_json: String) -> NapiResult<String> {
    let input: rei_analytics_core::flip::FlipInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rei_analytics_core::flip::analyze_flip(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
