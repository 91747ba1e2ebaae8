use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rei_analytics_core::investment::{
    analyze_property, compare_properties, CandidateProperty, PropertyInput,
};

use crate::input;

/// Arguments for buy-and-hold analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Closing costs at purchase
    #[arg(long, default_value = "0")]
    pub closing_costs: Decimal,

    /// Renovation budget rolled into the initial investment
    #[arg(long, default_value = "0")]
    pub renovation_costs: Decimal,

    /// Down payment as whole percent (25 = 25%)
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Annual loan rate as whole percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, default_value = "30")]
    pub term: u32,

    /// Monthly rent
    #[arg(long)]
    pub rent: Option<Decimal>,

    /// Other monthly income (parking, laundry, storage)
    #[arg(long, default_value = "0")]
    pub other_income: Decimal,

    /// Vacancy as whole percent of gross income
    #[arg(long, default_value = "5")]
    pub vacancy: Decimal,

    /// Annual property tax
    #[arg(long, default_value = "0")]
    pub tax: Decimal,

    /// Annual insurance
    #[arg(long, default_value = "0")]
    pub insurance: Decimal,

    /// Monthly HOA dues
    #[arg(long, default_value = "0")]
    pub hoa: Decimal,

    /// Maintenance reserve as whole percent of rent
    #[arg(long, default_value = "5")]
    pub maintenance: Decimal,

    /// Property management fee as whole percent of rent
    #[arg(long, default_value = "8")]
    pub management: Decimal,

    /// Other monthly expenses
    #[arg(long, default_value = "0")]
    pub other_expenses: Decimal,

    /// Annual appreciation as whole percent
    #[arg(long, default_value = "3")]
    pub appreciation: Decimal,

    /// Annual rent increase as whole percent
    #[arg(long, default_value = "2")]
    pub rent_increase: Decimal,

    /// Holding period in years
    #[arg(long, default_value = "5")]
    pub hold: u32,
}

/// Arguments for multi-property comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON input file: an array of {id, name, input} records
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let property: PropertyInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        PropertyInput {
            purchase_price: args.price.ok_or("--price is required (or provide --input)")?,
            closing_costs: args.closing_costs,
            renovation_costs: args.renovation_costs,
            down_payment_percent: args
                .down_payment
                .ok_or("--down-payment is required (or provide --input)")?,
            interest_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            loan_term_years: args.term,
            monthly_rent: args.rent.ok_or("--rent is required (or provide --input)")?,
            other_monthly_income: args.other_income,
            vacancy_percent: args.vacancy,
            property_tax_annual: args.tax,
            insurance_annual: args.insurance,
            hoa_monthly: args.hoa,
            maintenance_percent: args.maintenance,
            management_percent: args.management,
            other_monthly_expenses: args.other_expenses,
            annual_appreciation_percent: args.appreciation,
            annual_rent_increase_percent: args.rent_increase,
            holding_period_years: args.hold,
        }
    };

    let result = analyze_property(&property)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let batch: Vec<CandidateProperty> = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input file is required for comparison (array of {id, name, input})".into());
    };

    let result = compare_properties(&batch)?;
    Ok(serde_json::to_value(result)?)
}
