use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::LoanTerms;
use crate::error::ReiAnalyticsError;
use crate::projection::{project_holding_period, ProjectionSeed};
use crate::time_value;
use crate::types::{
    with_metadata, Assumptions, ComputationOutput, Money, Percent, YearlyProjection,
};
use crate::ReiAnalyticsResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input assumptions for a buy-and-hold rental acquisition.
///
/// All percentage fields are whole-number percent (25 = 25%).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyInput {
    // Purchase
    pub purchase_price: Money,
    pub closing_costs: Money,
    pub renovation_costs: Money,
    /// Down payment as percent of purchase price
    pub down_payment_percent: Percent,
    /// Annual loan rate
    pub interest_rate: Percent,
    pub loan_term_years: u32,

    // Income
    pub monthly_rent: Money,
    /// Parking, laundry, storage and similar
    pub other_monthly_income: Money,
    /// Vacancy and credit loss as percent of gross income
    pub vacancy_percent: Percent,

    // Expenses
    pub property_tax_annual: Money,
    pub insurance_annual: Money,
    pub hoa_monthly: Money,
    /// Maintenance reserve as percent of rent
    pub maintenance_percent: Percent,
    /// Property management fee as percent of rent
    pub management_percent: Percent,
    pub other_monthly_expenses: Money,

    // Growth
    pub annual_appreciation_percent: Percent,
    pub annual_rent_increase_percent: Percent,

    // Analysis
    pub holding_period_years: u32,
}

/// Complete buy-and-hold analysis. Produced once per call, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyAnalysis {
    // Initial investment
    pub total_investment: Money,
    pub down_payment: Money,
    pub loan_amount: Money,
    pub monthly_mortgage: Money,

    // Year-one income statement
    pub gross_annual_income: Money,
    /// Gross income after vacancy loss
    pub effective_gross_income: Money,
    pub annual_operating_expenses: Money,
    /// Net operating income. Excludes debt service by definition.
    pub noi: Money,
    pub annual_debt_service: Money,
    pub annual_cash_flow: Money,

    // Return ratios (whole percent)
    pub cap_rate: Percent,
    pub cash_on_cash: Percent,

    // Screening ratios
    /// NOI over annual debt service; zero when there is no loan payment
    pub dscr: Decimal,
    /// Purchase price over gross annual rent
    pub grm: Decimal,
    /// Operating expenses over effective gross income, whole percent
    pub operating_expense_ratio: Percent,

    // Holding-period projection and exit
    pub yearly_projections: Vec<YearlyProjection>,
    pub total_cash_flow: Money,
    pub projected_sale_price: Money,
    /// Net sale proceeds after loan payoff and selling costs
    pub projected_equity: Money,
    pub total_profit: Money,
    pub total_roi: Percent,
    pub irr: Percent,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyze a buy-and-hold purchase under the default [`Assumptions`].
pub fn analyze_property(
    input: &PropertyInput,
) -> ReiAnalyticsResult<ComputationOutput<PropertyAnalysis>> {
    analyze_property_with(input, &Assumptions::default())
}

/// Analyze a buy-and-hold purchase under an explicit policy assumption set.
pub fn analyze_property_with(
    input: &PropertyInput,
    assumptions: &Assumptions,
) -> ReiAnalyticsResult<ComputationOutput<PropertyAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input, &mut warnings)?;

    // --- Initial investment ---
    let down_payment = input.purchase_price * input.down_payment_percent / dec!(100);
    let loan_amount = input.purchase_price - down_payment;
    let total_investment = down_payment + input.closing_costs + input.renovation_costs;

    let loan = LoanTerms {
        principal: loan_amount,
        annual_rate_percent: input.interest_rate,
        term_years: input.loan_term_years,
    };
    let monthly_mortgage = loan.monthly_payment();

    // --- Year-one income ---
    let gross_annual_income = (input.monthly_rent + input.other_monthly_income) * dec!(12);
    let effective_gross_income =
        gross_annual_income * (Decimal::ONE - input.vacancy_percent / dec!(100));

    // --- Operating expenses. Debt service is excluded: NOI is a
    // pre-financing metric. ---
    let annual_rent = input.monthly_rent * dec!(12);
    let maintenance_annual = annual_rent * input.maintenance_percent / dec!(100);
    let management_annual = annual_rent * input.management_percent / dec!(100);
    let annual_operating_expenses = input.property_tax_annual
        + input.insurance_annual
        + input.hoa_monthly * dec!(12)
        + maintenance_annual
        + management_annual
        + input.other_monthly_expenses * dec!(12);

    let noi = effective_gross_income - annual_operating_expenses;
    let annual_debt_service = monthly_mortgage * dec!(12);
    let annual_cash_flow = noi - annual_debt_service;

    // --- Return ratios ---
    let cap_rate = if input.purchase_price > Decimal::ZERO {
        noi / input.purchase_price * dec!(100)
    } else {
        Decimal::ZERO
    };
    let cash_on_cash = if total_investment > Decimal::ZERO {
        annual_cash_flow / total_investment * dec!(100)
    } else {
        Decimal::ZERO
    };

    // --- Screening ratios ---
    let dscr = if annual_debt_service > Decimal::ZERO {
        noi / annual_debt_service
    } else {
        Decimal::ZERO
    };
    let grm = if annual_rent > Decimal::ZERO {
        input.purchase_price / annual_rent
    } else {
        Decimal::ZERO
    };
    let operating_expense_ratio = if effective_gross_income > Decimal::ZERO {
        annual_operating_expenses / effective_gross_income * dec!(100)
    } else {
        Decimal::ZERO
    };

    if annual_cash_flow < Decimal::ZERO {
        warnings.push("Year-one cash flow is negative at the stated rent and financing".into());
    }

    // --- Holding-period projection ---
    let seed = ProjectionSeed {
        gross_annual_income,
        vacancy_percent: input.vacancy_percent,
        base_operating_expenses: annual_operating_expenses,
        annual_debt_service,
        value_basis: input.purchase_price,
        appreciation_percent: input.annual_appreciation_percent,
        rent_increase_percent: input.annual_rent_increase_percent,
        loan,
        holding_period_years: input.holding_period_years,
    };
    let outcome = project_holding_period(&seed, assumptions);

    // --- Whole-deal returns ---
    let total_cash_flow = outcome.cumulative_cash_flow;
    let total_profit = total_cash_flow + outcome.net_sale_proceeds - total_investment;
    let total_roi = if total_investment > Decimal::ZERO {
        total_profit / total_investment * dec!(100)
    } else {
        Decimal::ZERO
    };

    // IRR over [-investment, cf_1, ..., cf_n + net sale proceeds]
    let mut cash_flows: Vec<Money> = Vec::with_capacity(outcome.years.len() + 1);
    cash_flows.push(-total_investment);
    for row in &outcome.years {
        cash_flows.push(row.cash_flow);
    }
    if let Some(last) = cash_flows.last_mut() {
        *last += outcome.net_sale_proceeds;
    }

    if !changes_sign(&cash_flows) {
        warnings
            .push("IRR cash flows never change sign; the reported IRR is unreliable".into());
    }
    let irr = time_value::internal_rate_of_return_with(
        &cash_flows,
        assumptions.irr_initial_guess,
        assumptions.irr_max_iterations,
    );

    let analysis = PropertyAnalysis {
        total_investment,
        down_payment,
        loan_amount,
        monthly_mortgage,
        gross_annual_income,
        effective_gross_income,
        annual_operating_expenses,
        noi,
        annual_debt_service,
        annual_cash_flow,
        cap_rate,
        cash_on_cash,
        dscr,
        grm,
        operating_expense_ratio,
        yearly_projections: outcome.years,
        total_cash_flow,
        projected_sale_price: outcome.projected_sale_price,
        projected_equity: outcome.net_sale_proceeds,
        total_profit,
        total_roi,
        irr,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Buy-and-Hold Investment Property Analysis",
        input,
        warnings,
        elapsed,
        analysis,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &PropertyInput, warnings: &mut Vec<String>) -> ReiAnalyticsResult<()> {
    if input.purchase_price <= Decimal::ZERO {
        return Err(ReiAnalyticsError::InvalidInput {
            field: "purchase_price".into(),
            reason: "Purchase price must be positive".into(),
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

    if input.monthly_rent < Decimal::ZERO {
        return Err(ReiAnalyticsError::InvalidInput {
            field: "monthly_rent".into(),
            reason: "Monthly rent cannot be negative".into(),
        });
    }

    if input.vacancy_percent < Decimal::ZERO || input.vacancy_percent >= dec!(100) {
        return Err(ReiAnalyticsError::InvalidInput {
            field: "vacancy_percent".into(),
            reason: "Vacancy must be between 0 and 100 percent (exclusive upper)".into(),
        });
    }

    if input.down_payment_percent < Decimal::ZERO || input.down_payment_percent > dec!(100) {
        return Err(ReiAnalyticsError::InvalidInput {
            field: "down_payment_percent".into(),
            reason: "Down payment must be between 0 and 100 percent".into(),
        });
    }

    if input.vacancy_percent > dec!(15) {
        warnings.push(format!(
            "Vacancy rate {}% exceeds 15% - above typical market norms",
            input.vacancy_percent
        ));
    }

    Ok(())
}

/// True when the sequence holds both positive and negative flows. Newton's
/// method has no root to find otherwise.
fn changes_sign(cash_flows: &[Money]) -> bool {
    let mut nonzero = cash_flows.iter().filter(|cf| !cf.is_zero());
    let first = match nonzero.next() {
        Some(cf) => cf.is_sign_positive(),
        None => return false,
    };
    nonzero.any(|cf| cf.is_sign_positive() != first)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Standard test property: $300k single-family rental
    fn sample_input() -> PropertyInput {
        PropertyInput {
            purchase_price: dec!(300000),
            closing_costs: dec!(6000),
            renovation_costs: dec!(0),
            down_payment_percent: dec!(25),
            interest_rate: dec!(7),
            loan_term_years: 30,
            monthly_rent: dec!(2200),
            other_monthly_income: dec!(0),
            vacancy_percent: dec!(5),
            property_tax_annual: dec!(3600),
            insurance_annual: dec!(1500),
            hoa_monthly: dec!(0),
            maintenance_percent: dec!(5),
            management_percent: dec!(8),
            other_monthly_expenses: dec!(0),
            annual_appreciation_percent: dec!(3),
            annual_rent_increase_percent: dec!(2),
            holding_period_years: 5,
        }
    }

    #[test]
    fn test_initial_investment_breakdown() {
        let out = analyze_property(&sample_input()).unwrap().result;

        // 25% of 300000
        assert_eq!(out.down_payment, dec!(75000));
        assert_eq!(out.loan_amount, dec!(225000));
        // down payment + closing costs + renovation
        assert_eq!(out.total_investment, dec!(81000));
    }

    #[test]
    fn test_monthly_mortgage_standard_30yr() {
        let out = analyze_property(&sample_input()).unwrap().result;
        // $225k at 7% over 30 years: ~$1,497/mo
        assert!(
            out.monthly_mortgage > dec!(1496) && out.monthly_mortgage < dec!(1498),
            "monthly mortgage {} outside expected range",
            out.monthly_mortgage
        );
    }

    #[test]
    fn test_income_statement() {
        let out = analyze_property(&sample_input()).unwrap().result;

        // (2200 + 0) * 12
        assert_eq!(out.gross_annual_income, dec!(26400));
        // 26400 * 0.95
        assert_eq!(out.effective_gross_income, dec!(25080));
        // 3600 + 1500 + 0 + 26400*0.05 + 26400*0.08 + 0 = 8532
        assert_eq!(out.annual_operating_expenses, dec!(8532));
        // 25080 - 8532
        assert_eq!(out.noi, dec!(16548));
    }

    #[test]
    fn test_cap_rate_is_noi_over_price() {
        let out = analyze_property(&sample_input()).unwrap().result;
        assert_eq!(out.cap_rate, out.noi / dec!(300000) * dec!(100));
    }

    #[test]
    fn test_noi_ignores_financing() {
        let base = analyze_property(&sample_input()).unwrap().result;

        let mut refinanced = sample_input();
        refinanced.interest_rate = dec!(11);
        refinanced.loan_term_years = 15;
        let out = analyze_property(&refinanced).unwrap().result;

        assert_eq!(out.noi, base.noi);
        assert_ne!(out.annual_debt_service, base.annual_debt_service);
    }

    #[test]
    fn test_cash_on_cash_guards_zero_investment() {
        let mut input = sample_input();
        input.down_payment_percent = dec!(0);
        input.closing_costs = dec!(0);
        input.renovation_costs = dec!(0);
        let out = analyze_property(&input).unwrap().result;
        assert_eq!(out.cash_on_cash, Decimal::ZERO);
    }

    #[test]
    fn test_projection_length_matches_holding_period() {
        let out = analyze_property(&sample_input()).unwrap().result;
        assert_eq!(out.yearly_projections.len(), 5);
        assert_eq!(out.yearly_projections[0].year, 1);
        assert_eq!(out.yearly_projections[4].year, 5);
    }

    #[test]
    fn test_exit_math_ties_out() {
        let out = analyze_property(&sample_input()).unwrap().result;
        let last = out.yearly_projections.last().unwrap();

        assert_eq!(out.projected_sale_price, last.property_value);
        assert_eq!(out.total_cash_flow, last.cumulative_cash_flow);

        // projected_equity = sale - balance - 6% selling costs
        let expected = out.projected_sale_price
            - last.loan_balance
            - out.projected_sale_price * dec!(0.06);
        assert_eq!(out.projected_equity, expected);

        assert_eq!(
            out.total_profit,
            out.total_cash_flow + out.projected_equity - out.total_investment
        );
    }

    #[test]
    fn test_irr_in_plausible_band() {
        let out = analyze_property(&sample_input()).unwrap().result;
        assert!(
            out.irr > dec!(-50) && out.irr < dec!(100),
            "IRR {} outside plausible band",
            out.irr
        );
    }

    #[test]
    fn test_screening_ratios() {
        let out = analyze_property(&sample_input()).unwrap().result;

        assert_eq!(out.dscr, out.noi / out.annual_debt_service);
        // 300000 / 26400
        assert_eq!(out.grm, dec!(300000) / dec!(26400));
        assert_eq!(
            out.operating_expense_ratio,
            out.annual_operating_expenses / out.effective_gross_income * dec!(100)
        );
    }

    #[test]
    fn test_negative_cash_flow_warning() {
        let mut input = sample_input();
        input.monthly_rent = dec!(900);
        let result = analyze_property(&input).unwrap();
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("cash flow is negative")));
    }

    #[test]
    fn test_zero_holding_period_rejected() {
        let mut input = sample_input();
        input.holding_period_years = 0;
        match analyze_property(&input) {
            Err(ReiAnalyticsError::InvalidInput { field, .. }) => {
                assert_eq!(field, "holding_period_years");
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut input = sample_input();
        input.purchase_price = dec!(-1);
        assert!(analyze_property(&input).is_err());
    }

    #[test]
    fn test_custom_selling_costs_flow_through() {
        let assumptions = Assumptions {
            selling_cost_rate: dec!(0.08),
            ..Assumptions::default()
        };
        let out = analyze_property_with(&sample_input(), &assumptions)
            .unwrap()
            .result;
        let last = out.yearly_projections.last().unwrap();
        let expected = out.projected_sale_price
            - last.loan_balance
            - out.projected_sale_price * dec!(0.08);
        assert_eq!(out.projected_equity, expected);
    }

    #[test]
    fn test_methodology_string() {
        let result = analyze_property(&sample_input()).unwrap();
        assert_eq!(
            result.methodology,
            "Buy-and-Hold Investment Property Analysis"
        );
    }
}
