use clap::Args;
use serde_json::Value;

use rei_analytics_core::flip::{analyze_flip, FlipInput};

use crate::input;

/// Arguments for fix-and-flip analysis
#[derive(Args)]
pub struct FlipArgs {
    /// Path to JSON input file with the flip deal parameters
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_flip(args: FlipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal: FlipInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input file is required for flip analysis".into());
    };

    let result = analyze_flip(&deal)?;
    Ok(serde_json::to_value(result)?)
}
