use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rei_analytics_core::brrr::{
    analyze_brrr, maximum_allowable_offer, seventy_percent_rule, BrrrInput,
};

use crate::input;

/// Arguments for BRRR deal analysis. The input record is wide enough that
/// it only comes from a file or piped JSON.
#[derive(Args)]
pub struct BrrrArgs {
    /// Path to JSON input file with the BRRR deal parameters
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the 70% rule screen
#[derive(Args)]
pub struct Rule70Args {
    /// After-repair value
    #[arg(long)]
    pub arv: Decimal,

    /// Estimated repair costs
    #[arg(long)]
    pub repairs: Decimal,
}

/// Arguments for a maximum allowable offer
#[derive(Args)]
pub struct MaoArgs {
    /// After-repair value
    #[arg(long)]
    pub arv: Decimal,

    /// Estimated repair costs
    #[arg(long)]
    pub repairs: Decimal,

    /// Target profit in currency, not percent
    #[arg(long)]
    pub profit: Decimal,

    /// Combined closing costs
    #[arg(long, default_value = "0")]
    pub closing: Decimal,
}

pub fn run_brrr(args: BrrrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal: BrrrInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input file is required for BRRR analysis".into());
    };

    let result = analyze_brrr(&deal)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_rule70(args: Rule70Args) -> Result<Value, Box<dyn std::error::Error>> {
    let max_offer = seventy_percent_rule(args.arv, args.repairs);
    Ok(serde_json::json!({
        "arv": args.arv.to_string(),
        "repairs": args.repairs.to_string(),
        "max_offer": max_offer.to_string(),
    }))
}

pub fn run_mao(args: MaoArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mao = maximum_allowable_offer(args.arv, args.repairs, args.profit, args.closing);
    Ok(serde_json::json!({
        "arv": args.arv.to_string(),
        "repairs": args.repairs.to_string(),
        "desired_profit": args.profit.to_string(),
        "closing_costs": args.closing.to_string(),
        "mao": mao.to_string(),
    }))
}
