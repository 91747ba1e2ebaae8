use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ReiAnalyticsError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::ReiAnalyticsResult;

// ---------------------------------------------------------------------------
// Deal-score weight table (flip variant)
// ---------------------------------------------------------------------------

const SCORE_FLOOR: Decimal = dec!(1);
const SCORE_CEILING: Decimal = dec!(5);

const WEIGHT_STRONG_MARGIN: Decimal = dec!(1.5);
const WEIGHT_GOOD_MARGIN: Decimal = dec!(1);
const WEIGHT_THIN_MARGIN: Decimal = dec!(0.5);
const WEIGHT_STRONG_ROI: Decimal = dec!(1.5);
const WEIGHT_GOOD_ROI: Decimal = dec!(1);
const WEIGHT_MODEST_ROI: Decimal = dec!(0.5);
const WEIGHT_MEETS_RULE_70: Decimal = dec!(0.5);
const WEIGHT_POSITIVE_PROFIT: Decimal = dec!(0.5);

const STRONG_MARGIN_PERCENT: Decimal = dec!(15);
const GOOD_MARGIN_PERCENT: Decimal = dec!(10);
const THIN_MARGIN_PERCENT: Decimal = dec!(5);
const STRONG_ROI_PERCENT: Decimal = dec!(30);
const GOOD_ROI_PERCENT: Decimal = dec!(20);
const MODEST_ROI_PERCENT: Decimal = dec!(10);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input assumptions for a fix-and-flip deal. Percentages are whole-number
/// percent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlipInput {
    // Purchase
    pub purchase_price: Money,
    pub purchase_closing_costs: Money,

    // Financing
    pub use_financing: bool,
    /// Acquisition loan LTV, percent of purchase price
    pub loan_to_value_percent: Percent,
    /// Annual rate on the acquisition loan
    pub loan_interest_rate: Percent,
    /// Upfront points (1 point = 1% of the loan)
    pub loan_points: Percent,

    // Renovation
    pub renovation_costs: Money,
    /// Overrun buffer on top of the rehab budget, typically 10-20
    pub contingency_percent: Percent,
    pub permits_costs: Money,
    pub staging_costs: Money,

    // Holding period
    pub holding_period_months: u32,
    pub property_tax_monthly: Money,
    pub insurance_monthly: Money,
    pub utilities_monthly: Money,
    pub other_holding_costs_monthly: Money,

    // Sale
    pub after_repair_value: Money,
    /// Agent fees and closing at sale, typically 8-10
    pub selling_costs_percent: Percent,
}

/// One month of capital at work during the hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlipMonthlyBreakdown {
    pub month: u32,
    pub interest_accrued: Money,
    pub holding_costs: Money,
    pub total_invested: Money,
}

/// Complete fix-and-flip analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlipAnalysis {
    // Purchase
    pub total_purchase_cost: Money,
    pub loan_amount: Money,
    pub cash_at_purchase: Money,
    pub loan_points_cost: Money,

    // Renovation
    /// Rehab budget + contingency + permits
    pub total_renovation_cost: Money,
    pub contingency_amount: Money,

    // Holding
    pub monthly_holding_costs: Money,
    pub total_holding_costs: Money,
    pub interest_costs_during_hold: Money,

    // All-in
    pub all_in_cost: Money,
    pub total_cash_required: Money,

    // Sale
    pub gross_sale_price: Money,
    pub selling_costs: Money,
    pub net_sale_proceeds: Money,

    // Profit
    pub gross_profit: Money,
    pub net_profit: Money,
    /// Net profit over sale price, whole percent
    pub profit_margin: Percent,

    // Returns
    pub roi_on_cash: Percent,
    pub roi_on_total_cost: Percent,
    pub annualized_roi: Percent,

    // 70% rule
    pub max_purchase_at_70: Money,
    pub meets_rule_70: bool,

    // Score and pace
    pub deal_score: Decimal,
    pub profit_per_month: Money,

    // Break-even
    /// Sale price at which the deal returns exactly zero
    pub break_even_sale_price: Money,
    /// Percent the sale price can slip below ARV before losing money
    pub safety_margin: Percent,

    pub monthly_breakdown: Vec<FlipMonthlyBreakdown>,
}

/// Qualitative read of a flip analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlipVerdict {
    Loss,
    HomeRun,
    SolidFlip,
    Acceptable,
    Marginal,
    Pass,
}

impl FlipVerdict {
    pub fn description(&self) -> &'static str {
        match self {
            FlipVerdict::Loss => "This deal loses money",
            FlipVerdict::HomeRun => "Exceptional profit potential with strong margins",
            FlipVerdict::SolidFlip => "Good profit margins, meets key criteria",
            FlipVerdict::Acceptable => "Moderate returns, proceed with caution",
            FlipVerdict::Marginal => "Thin margins, negotiate a better price",
            FlipVerdict::Pass => "Does not meet minimum flip criteria",
        }
    }
}

/// Itemized maximum allowable offer for a flip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlipOfferBreakdown {
    pub arv: Money,
    pub repair_costs: Money,
    pub desired_profit: Money,
    pub closing_buy: Money,
    pub closing_sell: Money,
    pub mao: Money,
}

/// Rehab intensity band for per-square-foot estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RehabLevel {
    Cosmetic,
    Moderate,
    Major,
    Gut,
}

/// Low/mid/high rehab cost bands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RehabEstimate {
    pub low: Money,
    pub mid: Money,
    pub high: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyze a fix-and-flip deal: financed or all-cash purchase, renovation
/// with contingency, interest-only carry through the hold, sale at ARV.
pub fn analyze_flip(input: &FlipInput) -> ReiAnalyticsResult<ComputationOutput<FlipAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input, &mut warnings)?;

    // --- Purchase ---
    let total_purchase_cost = input.purchase_price + input.purchase_closing_costs;

    let (loan_amount, loan_points_cost, cash_at_purchase) = if input.use_financing {
        let loan = input.purchase_price * input.loan_to_value_percent / dec!(100);
        let points = loan * input.loan_points / dec!(100);
        (loan, points, total_purchase_cost - loan + points)
    } else {
        (Decimal::ZERO, Decimal::ZERO, total_purchase_cost)
    };

    // --- Renovation ---
    let contingency_amount = input.renovation_costs * input.contingency_percent / dec!(100);
    let total_renovation_cost = input.renovation_costs + contingency_amount + input.permits_costs;

    // --- Holding ---
    let monthly_base_holding = input.property_tax_monthly
        + input.insurance_monthly
        + input.utilities_monthly
        + input.other_holding_costs_monthly;
    // Interest-only payments while the property is held
    let monthly_interest = loan_amount * input.loan_interest_rate / dec!(100) / dec!(12);
    let monthly_holding_costs = monthly_base_holding + monthly_interest;

    let months = Decimal::from(input.holding_period_months);
    let total_holding_costs = monthly_base_holding * months;
    let interest_costs_during_hold = monthly_interest * months;

    // --- All-in ---
    let all_in_cost = total_purchase_cost
        + total_renovation_cost
        + total_holding_costs
        + interest_costs_during_hold
        + loan_points_cost
        + input.staging_costs;
    let total_cash_required = cash_at_purchase
        + total_renovation_cost
        + total_holding_costs
        + interest_costs_during_hold
        + input.staging_costs;

    // --- Sale ---
    let gross_sale_price = input.after_repair_value;
    let selling_costs = gross_sale_price * input.selling_costs_percent / dec!(100);
    let net_sale_proceeds = gross_sale_price - selling_costs - loan_amount;

    // --- Profit ---
    let gross_profit = gross_sale_price - all_in_cost;
    let net_profit = net_sale_proceeds - total_cash_required;
    let profit_margin = net_profit / gross_sale_price * dec!(100);

    if net_profit < Decimal::ZERO {
        warnings.push("Net profit is negative at the stated ARV and costs".into());
    }

    // --- Returns ---
    let roi_on_cash = if total_cash_required > Decimal::ZERO {
        net_profit / total_cash_required * dec!(100)
    } else {
        Decimal::ZERO
    };
    let roi_on_total_cost = if all_in_cost > Decimal::ZERO {
        gross_profit / all_in_cost * dec!(100)
    } else {
        Decimal::ZERO
    };
    let annualized_roi = if input.holding_period_months > 0 {
        roi_on_cash * dec!(12) / months
    } else {
        roi_on_cash * dec!(12)
    };

    // --- 70% rule ---
    let max_purchase_at_70 = input.after_repair_value * dec!(0.70) - input.renovation_costs;
    let meets_rule_70 = input.purchase_price <= max_purchase_at_70;

    let deal_score = score_deal(profit_margin, roi_on_cash, meets_rule_70, net_profit);

    let profit_per_month = if input.holding_period_months > 0 {
        net_profit / months
    } else {
        net_profit
    };

    // --- Break-even ---
    let break_even_sale_price = all_in_cost + selling_costs + loan_amount;
    let safety_margin = (gross_sale_price - break_even_sale_price) / gross_sale_price * dec!(100);

    // --- Capital at work, month by month ---
    let mut monthly_breakdown = Vec::with_capacity(input.holding_period_months as usize);
    let mut cumulative =
        cash_at_purchase + total_renovation_cost + loan_points_cost + input.staging_costs;
    for month in 1..=input.holding_period_months {
        cumulative += monthly_interest + monthly_base_holding;
        monthly_breakdown.push(FlipMonthlyBreakdown {
            month,
            interest_accrued: monthly_interest,
            holding_costs: monthly_base_holding,
            total_invested: cumulative,
        });
    }

    let analysis = FlipAnalysis {
        total_purchase_cost,
        loan_amount,
        cash_at_purchase,
        loan_points_cost,
        total_renovation_cost,
        contingency_amount,
        monthly_holding_costs,
        total_holding_costs,
        interest_costs_during_hold,
        all_in_cost,
        total_cash_required,
        gross_sale_price,
        selling_costs,
        net_sale_proceeds,
        gross_profit,
        net_profit,
        profit_margin,
        roi_on_cash,
        roi_on_total_cost,
        annualized_roi,
        max_purchase_at_70,
        meets_rule_70,
        deal_score,
        profit_per_month,
        break_even_sale_price,
        safety_margin,
        monthly_breakdown,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Fix-and-Flip Deal Analysis",
        input,
        warnings,
        elapsed,
        analysis,
    ))
}

/// Classify an analysis into a verdict band.
pub fn flip_verdict(analysis: &FlipAnalysis) -> FlipVerdict {
    if analysis.net_profit < Decimal::ZERO {
        return FlipVerdict::Loss;
    }
    if analysis.deal_score >= dec!(4.5) {
        return FlipVerdict::HomeRun;
    }
    if analysis.deal_score >= dec!(3.5) {
        return FlipVerdict::SolidFlip;
    }
    if analysis.deal_score >= dec!(2.5) {
        return FlipVerdict::Acceptable;
    }
    if analysis.deal_score >= dec!(1.5) {
        return FlipVerdict::Marginal;
    }
    FlipVerdict::Pass
}

/// Maximum allowable offer for a flip, itemized. Percent arguments are
/// fractions of ARV.
pub fn flip_maximum_allowable_offer(
    arv: Money,
    repair_costs: Money,
    desired_profit_percent: Percent,
    closing_buy_percent: Percent,
    closing_sell_percent: Percent,
) -> FlipOfferBreakdown {
    let desired_profit = arv * desired_profit_percent / dec!(100);
    let closing_buy = arv * closing_buy_percent / dec!(100);
    let closing_sell = arv * closing_sell_percent / dec!(100);
    let mao = arv - repair_costs - desired_profit - closing_buy - closing_sell;

    FlipOfferBreakdown {
        arv,
        repair_costs,
        desired_profit,
        closing_buy,
        closing_sell,
        mao,
    }
}

/// Rough rehab budget from square footage and intensity.
pub fn estimate_rehab_costs(square_feet: Decimal, level: RehabLevel) -> RehabEstimate {
    let (low, mid, high) = match level {
        RehabLevel::Cosmetic => (dec!(15), dec!(25), dec!(35)),
        RehabLevel::Moderate => (dec!(30), dec!(45), dec!(60)),
        RehabLevel::Major => (dec!(50), dec!(75), dec!(100)),
        RehabLevel::Gut => (dec!(80), dec!(120), dec!(175)),
    };

    RehabEstimate {
        low: square_feet * low,
        mid: square_feet * mid,
        high: square_feet * high,
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

fn score_deal(
    profit_margin: Percent,
    roi_on_cash: Percent,
    meets_rule_70: bool,
    net_profit: Money,
) -> Decimal {
    let mut score = SCORE_FLOOR;

    if profit_margin >= STRONG_MARGIN_PERCENT {
        score += WEIGHT_STRONG_MARGIN;
    } else if profit_margin >= GOOD_MARGIN_PERCENT {
        score += WEIGHT_GOOD_MARGIN;
    } else if profit_margin >= THIN_MARGIN_PERCENT {
        score += WEIGHT_THIN_MARGIN;
    }

    if roi_on_cash >= STRONG_ROI_PERCENT {
        score += WEIGHT_STRONG_ROI;
    } else if roi_on_cash >= GOOD_ROI_PERCENT {
        score += WEIGHT_GOOD_ROI;
    } else if roi_on_cash >= MODEST_ROI_PERCENT {
        score += WEIGHT_MODEST_ROI;
    }

    if meets_rule_70 {
        score += WEIGHT_MEETS_RULE_70;
    }
    if net_profit > Decimal::ZERO {
        score += WEIGHT_POSITIVE_PROFIT;
    }

    score.clamp(SCORE_FLOOR, SCORE_CEILING)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &FlipInput, warnings: &mut Vec<String>) -> ReiAnalyticsResult<()> {
    if input.purchase_price <= Decimal::ZERO {
        return Err(ReiAnalyticsError::InvalidInput {
            field: "purchase_price".into(),
            reason: "Purchase price must be positive".into(),
        });
    }

    if input.after_repair_value <= Decimal::ZERO {
        return Err(ReiAnalyticsError::InvalidInput {
            field: "after_repair_value".into(),
            reason: "ARV must be positive; it is the sale and margin basis".into(),
        });
    }

    if input.use_financing
        && (input.loan_to_value_percent < Decimal::ZERO
            || input.loan_to_value_percent > dec!(100))
    {
        return Err(ReiAnalyticsError::InvalidInput {
            field: "loan_to_value_percent".into(),
            reason: "LTV must be between 0 and 100 percent".into(),
        });
    }

    if input.selling_costs_percent < Decimal::ZERO || input.selling_costs_percent >= dec!(100) {
        return Err(ReiAnalyticsError::InvalidInput {
            field: "selling_costs_percent".into(),
            reason: "Selling costs must be between 0 and 100 percent (exclusive upper)".into(),
        });
    }

    if input.holding_period_months > 24 {
        warnings.push(format!(
            "Holding period of {} months is unusually long for a flip",
            input.holding_period_months
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
