use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::LoanTerms;
use crate::error::ReiAnalyticsError;
use crate::projection::{project_holding_period, ProjectionSeed};
use crate::types::{
    with_metadata, Assumptions, CashOnCash, ComputationOutput, Money, Percent, YearlyProjection,
};
use crate::ReiAnalyticsResult;

// ---------------------------------------------------------------------------
// Deal-score weight table
// ---------------------------------------------------------------------------
// The score is a deterministic heuristic, not a model. These weights and
// thresholds are business policy; the companion tests pin them exactly.

const SCORE_FLOOR: Decimal = dec!(1);
const SCORE_CEILING: Decimal = dec!(5);

const WEIGHT_INFINITE_RETURN: Decimal = dec!(2);
const WEIGHT_STRONG_CASH_ON_CASH: Decimal = dec!(1.5);
const WEIGHT_GOOD_CASH_ON_CASH: Decimal = dec!(1);
const WEIGHT_STRONG_EQUITY_CAPTURE: Decimal = dec!(1);
const WEIGHT_MODERATE_EQUITY_CAPTURE: Decimal = dec!(0.5);
const WEIGHT_POSITIVE_CASH_FLOW: Decimal = dec!(0.5);
const WEIGHT_HEALTHY_CAP_RATE: Decimal = dec!(0.5);

const STRONG_CASH_ON_CASH_PERCENT: Decimal = dec!(15);
const GOOD_CASH_ON_CASH_PERCENT: Decimal = dec!(10);
const STRONG_EQUITY_CAPTURE_PERCENT: Decimal = dec!(25);
const MODERATE_EQUITY_CAPTURE_PERCENT: Decimal = dec!(15);
const HEALTHY_CAP_RATE_PERCENT: Decimal = dec!(8);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input assumptions for a buy-renovate-refinance-rent deal, one field
/// cluster per phase. Percentages are whole-number percent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrrrInput {
    // Purchase phase
    pub purchase_price: Money,
    pub purchase_closing_costs: Money,
    /// Short-term acquisition loan LTV, percent of purchase price
    pub initial_loan_percent: Percent,
    /// Acquisition loan annual rate. Hard-money rates run high.
    pub initial_interest_rate: Percent,

    // Renovation phase
    pub renovation_costs: Money,
    pub renovation_time_months: u32,
    /// Monthly utilities, insurance and taxes carried during the work
    pub holding_costs_monthly: Money,

    // After-repair value
    pub after_repair_value: Money,

    // Refinance phase
    /// Long-term loan as percent of ARV, usually 70-80
    pub refinance_ltv_percent: Percent,
    pub refinance_interest_rate: Percent,
    pub refinance_loan_term_years: u32,
    pub refinance_closing_costs: Money,

    // Stabilized rent phase
    /// Rent per unit per month
    pub monthly_rent: Money,
    pub other_monthly_income: Money,
    pub vacancy_percent: Percent,
    pub property_tax_annual: Money,
    pub insurance_annual: Money,
    pub maintenance_percent: Percent,
    pub management_percent: Percent,
    pub other_monthly_expenses: Money,
    /// Unit count; zero is treated as a single unit
    pub number_of_units: u32,

    // Long-term assumptions
    pub annual_appreciation_percent: Percent,
    pub annual_rent_increase_percent: Percent,
    pub holding_period_years: u32,
}

/// Complete BRRR analysis, one attribute cluster per phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrrrAnalysis {
    // Phase 1: purchase
    pub total_purchase_cost: Money,
    pub initial_loan_amount: Money,
    pub cash_at_purchase: Money,

    // Phase 2: renovation and holding
    /// Purchase + renovation + holding
    pub all_in_cost: Money,
    pub total_holding_costs: Money,
    pub total_cash_invested: Money,

    // Phase 3: refinance
    pub refinance_loan_amount: Money,
    /// May be negative: the owner brings cash instead of extracting it
    pub cash_out_at_refinance: Money,
    pub cash_left_in_deal: Money,
    pub equity_captured: Money,
    pub equity_captured_percent: Percent,

    // Phase 4: stabilized rental
    pub monthly_mortgage_after_refi: Money,
    pub gross_annual_income: Money,
    pub effective_gross_income: Money,
    pub annual_operating_expenses: Money,
    pub noi: Money,
    pub annual_debt_service: Money,
    pub annual_cash_flow: Money,
    pub monthly_cash_flow: Money,

    // Headline metrics
    pub total_roi_on_cash_invested: Percent,
    pub cash_on_cash: CashOnCash,
    /// Cap rate on ARV, the value basis once the work is done
    pub cap_rate: Percent,
    pub is_infinite_return: bool,
    /// Heuristic 1-5 rating
    pub deal_score: Decimal,

    // Multi-unit metrics
    pub price_per_unit: Money,
    pub rent_per_unit: Money,

    // Long-term projection and exit
    pub yearly_projections: Vec<YearlyProjection>,
    pub projected_sale_price: Money,
    pub total_profit: Money,
}

/// Qualitative read of a BRRR analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealVerdict {
    /// All cash recovered with positive cash flow
    ExcellentBrrr,
    GreatDeal,
    GoodDeal,
    Marginal,
    Pass,
}

impl DealVerdict {
    pub fn description(&self) -> &'static str {
        match self {
            DealVerdict::ExcellentBrrr => "All cash out with positive cash flow",
            DealVerdict::GreatDeal => "Strong equity capture and good cash flow",
            DealVerdict::GoodDeal => "Solid returns, meets BRRR criteria",
            DealVerdict::Marginal => "Consider negotiating better terms",
            DealVerdict::Pass => "Does not meet BRRR criteria",
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyze a BRRR deal under the default [`Assumptions`].
pub fn analyze_brrr(input: &BrrrInput) -> ReiAnalyticsResult<ComputationOutput<BrrrAnalysis>> {
    analyze_brrr_with(input, &Assumptions::default())
}

/// Analyze a BRRR deal under an explicit policy assumption set.
///
/// The four phases run in one pass: purchase, renovation carry, cash-out
/// refinance, stabilized rental. Long-term projections are seeded from the
/// refinance loan and the ARV rather than the purchase basis.
pub fn analyze_brrr_with(
    input: &BrrrInput,
    assumptions: &Assumptions,
) -> ReiAnalyticsResult<ComputationOutput<BrrrAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input, &mut warnings)?;

    let units = if input.number_of_units == 0 {
        1
    } else {
        input.number_of_units
    };
    let units_dec = Decimal::from(units);

    // --- Phase 1: purchase ---
    let total_purchase_cost = input.purchase_price + input.purchase_closing_costs;
    let initial_loan_amount = input.purchase_price * input.initial_loan_percent / dec!(100);
    let cash_at_purchase = total_purchase_cost - initial_loan_amount;

    // --- Phase 2: renovation and holding ---
    // Interest-only carry on the acquisition loan while the work runs
    let monthly_carry = initial_loan_amount * input.initial_interest_rate / dec!(100) / dec!(12);
    let total_holding_costs = (input.holding_costs_monthly + monthly_carry)
        * Decimal::from(input.renovation_time_months);
    let all_in_cost = total_purchase_cost + input.renovation_costs + total_holding_costs;
    let total_cash_invested = cash_at_purchase + input.renovation_costs + total_holding_costs;

    // --- Phase 3: refinance ---
    let refinance_loan_amount = input.after_repair_value * input.refinance_ltv_percent / dec!(100);
    let cash_out_at_refinance =
        refinance_loan_amount - initial_loan_amount - input.refinance_closing_costs;
    let cash_left_in_deal = (total_cash_invested - cash_out_at_refinance).max(Decimal::ZERO);
    let equity_captured = input.after_repair_value - refinance_loan_amount;
    let equity_captured_percent = equity_captured / input.after_repair_value * dec!(100);

    if cash_out_at_refinance < Decimal::ZERO {
        warnings.push(
            "Refinance proceeds do not cover the acquisition loan and closing costs; \
             the owner must bring cash to the table"
                .into(),
        );
    }

    // --- Phase 4: stabilized rental ---
    let refinance_loan = LoanTerms {
        principal: refinance_loan_amount,
        annual_rate_percent: input.refinance_interest_rate,
        term_years: input.refinance_loan_term_years,
    };
    let monthly_mortgage_after_refi = refinance_loan.monthly_payment();

    let total_monthly_rent = input.monthly_rent * units_dec;
    let gross_annual_income = (total_monthly_rent + input.other_monthly_income) * dec!(12);
    let effective_gross_income =
        gross_annual_income * (Decimal::ONE - input.vacancy_percent / dec!(100));

    let annual_rent = total_monthly_rent * dec!(12);
    let maintenance_annual = annual_rent * input.maintenance_percent / dec!(100);
    let management_annual = annual_rent * input.management_percent / dec!(100);
    let annual_operating_expenses = input.property_tax_annual
        + input.insurance_annual
        + maintenance_annual
        + management_annual
        + input.other_monthly_expenses * dec!(12);

    let noi = effective_gross_income - annual_operating_expenses;
    let annual_debt_service = monthly_mortgage_after_refi * dec!(12);
    let annual_cash_flow = noi - annual_debt_service;
    let monthly_cash_flow = annual_cash_flow / dec!(12);

    // --- Headline metrics ---
    // The BRRR goal: recover the whole invested basis at refinance
    let is_infinite_return = cash_left_in_deal <= Decimal::ZERO
        || cash_out_at_refinance >= total_cash_invested;
    let cash_on_cash = if is_infinite_return {
        CashOnCash::InfiniteReturn
    } else {
        CashOnCash::Finite(annual_cash_flow / cash_left_in_deal * dec!(100))
    };

    let cap_rate = noi / input.after_repair_value * dec!(100);
    let total_roi_on_cash_invested = if total_cash_invested > Decimal::ZERO {
        (annual_cash_flow + equity_captured) / total_cash_invested * dec!(100)
    } else {
        Decimal::ZERO
    };

    let price_per_unit = input.purchase_price / units_dec;
    let rent_per_unit = input.monthly_rent;

    let deal_score = score_deal(
        &cash_on_cash,
        is_infinite_return,
        equity_captured_percent,
        annual_cash_flow,
        cap_rate,
    );

    // --- Long-term projection, seeded from the refinance ---
    let seed = ProjectionSeed {
        gross_annual_income,
        vacancy_percent: input.vacancy_percent,
        base_operating_expenses: annual_operating_expenses,
        annual_debt_service,
        value_basis: input.after_repair_value,
        appreciation_percent: input.annual_appreciation_percent,
        rent_increase_percent: input.annual_rent_increase_percent,
        loan: refinance_loan,
        holding_period_years: input.holding_period_years,
    };
    let outcome = project_holding_period(&seed, assumptions);

    // The refinance cash-out already came back to the owner, so it counts
    // toward whole-deal profit alongside rental cash flow and sale proceeds.
    let total_profit = outcome.cumulative_cash_flow + outcome.net_sale_proceeds
        + cash_out_at_refinance
        - total_cash_invested;

    let analysis = BrrrAnalysis {
        total_purchase_cost,
        initial_loan_amount,
        cash_at_purchase,
        all_in_cost,
        total_holding_costs,
        total_cash_invested,
        refinance_loan_amount,
        cash_out_at_refinance,
        cash_left_in_deal,
        equity_captured,
        equity_captured_percent,
        monthly_mortgage_after_refi,
        gross_annual_income,
        effective_gross_income,
        annual_operating_expenses,
        noi,
        annual_debt_service,
        annual_cash_flow,
        monthly_cash_flow,
        total_roi_on_cash_invested,
        cash_on_cash,
        cap_rate,
        is_infinite_return,
        deal_score,
        price_per_unit,
        rent_per_unit,
        yearly_projections: outcome.years,
        projected_sale_price: outcome.projected_sale_price,
        total_profit,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "BRRR Four-Phase Deal Analysis",
        input,
        warnings,
        elapsed,
        analysis,
    ))
}

/// Classify an analysis into a verdict band.
pub fn deal_verdict(analysis: &BrrrAnalysis) -> DealVerdict {
    if analysis.is_infinite_return && analysis.annual_cash_flow > Decimal::ZERO {
        return DealVerdict::ExcellentBrrr;
    }
    if analysis.deal_score >= dec!(4) {
        return DealVerdict::GreatDeal;
    }
    if analysis.deal_score >= dec!(3) {
        return DealVerdict::GoodDeal;
    }
    if analysis.deal_score >= dec!(2) {
        return DealVerdict::Marginal;
    }
    DealVerdict::Pass
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

fn score_deal(
    cash_on_cash: &CashOnCash,
    is_infinite_return: bool,
    equity_captured_percent: Percent,
    annual_cash_flow: Money,
    cap_rate: Percent,
) -> Decimal {
    let mut score = SCORE_FLOOR;

    if is_infinite_return {
        score += WEIGHT_INFINITE_RETURN;
    } else if let CashOnCash::Finite(coc) = cash_on_cash {
        if *coc >= STRONG_CASH_ON_CASH_PERCENT {
            score += WEIGHT_STRONG_CASH_ON_CASH;
        } else if *coc >= GOOD_CASH_ON_CASH_PERCENT {
            score += WEIGHT_GOOD_CASH_ON_CASH;
        }
    }

    if equity_captured_percent >= STRONG_EQUITY_CAPTURE_PERCENT {
        score += WEIGHT_STRONG_EQUITY_CAPTURE;
    } else if equity_captured_percent >= MODERATE_EQUITY_CAPTURE_PERCENT {
        score += WEIGHT_MODERATE_EQUITY_CAPTURE;
    }

    if annual_cash_flow > Decimal::ZERO {
        score += WEIGHT_POSITIVE_CASH_FLOW;
    }
    if cap_rate >= HEALTHY_CAP_RATE_PERCENT {
        score += WEIGHT_HEALTHY_CAP_RATE;
    }

    score.clamp(SCORE_FLOOR, SCORE_CEILING)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &BrrrInput, warnings: &mut Vec<String>) -> ReiAnalyticsResult<()> {
    if input.purchase_price <= Decimal::ZERO {
        return Err(ReiAnalyticsError::InvalidInput {
            field: "purchase_price".into(),
            reason: "Purchase price must be positive".into(),
        });
    }

    if input.after_repair_value <= Decimal::ZERO {
        return Err(ReiAnalyticsError::InvalidInput {
            field: "after_repair_value".into(),
            reason: "ARV must be positive; it is the refinance and cap-rate basis".into(),
        });
    }

    if input.holding_period_years < 1 || input.holding_period_years > 50 {
        return Err(ReiAnalyticsError::InvalidInput {
            field: "holding_period_years".into(),
            reason: "Holding period must be between 1 and 50 years".into(),
        });
    }

    for (field, value) in [
        (
            "annual_appreciation_percent",
            input.annual_appreciation_percent,
        ),
        (
            "annual_rent_increase_percent",
            input.annual_rent_increase_percent,
        ),
    ] {
        if value < dec!(-100) || value > dec!(100) {
            return Err(ReiAnalyticsError::InvalidInput {
                field: field.into(),
                reason: "Annual growth must be between -100 and 100 percent".into(),
            });
        }
    }

    if input.vacancy_percent < Decimal::ZERO || input.vacancy_percent >= dec!(100) {
        return Err(ReiAnalyticsError::InvalidInput {
            field: "vacancy_percent".into(),
            reason: "Vacancy must be between 0 and 100 percent (exclusive upper)".into(),
        });
    }

    for (field, value) in [
        ("initial_loan_percent", input.initial_loan_percent),
        ("refinance_ltv_percent", input.refinance_ltv_percent),
    ] {
        if value < Decimal::ZERO || value > dec!(100) {
            return Err(ReiAnalyticsError::InvalidInput {
                field: field.into(),
                reason: "LTV must be between 0 and 100 percent".into(),
            });
        }
    }

    if input.refinance_ltv_percent > dec!(80) {
        warnings.push(format!(
            "Refinance LTV {}% exceeds 80% - few long-term lenders go this high",
            input.refinance_ltv_percent
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
