use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::amortization::LoanTerms;
use crate::types::{Assumptions, Money, Percent, YearlyProjection};

/// Everything the holding-period loop needs, regardless of which analyzer
/// seeded it. A buy-and-hold analysis seeds from the purchase price and the
/// acquisition loan; a BRRR analysis seeds from the ARV and the refinance
/// loan. The loop itself is identical.
#[derive(Debug, Clone)]
pub struct ProjectionSeed {
    /// Year-one gross annual income (rent plus other income)
    pub gross_annual_income: Money,
    pub vacancy_percent: Percent,
    /// Year-one annual operating expenses, before inflation
    pub base_operating_expenses: Money,
    pub annual_debt_service: Money,
    /// The basis that appreciates: purchase price, or ARV after a refinance
    pub value_basis: Money,
    pub appreciation_percent: Percent,
    pub rent_increase_percent: Percent,
    pub loan: LoanTerms,
    pub holding_period_years: u32,
}

/// Projection rows plus the exit-sale summary.
#[derive(Debug, Clone)]
pub struct ProjectionOutcome {
    pub years: Vec<YearlyProjection>,
    pub cumulative_cash_flow: Money,
    /// Final projected value, used as the sale price
    pub projected_sale_price: Money,
    pub final_loan_balance: Money,
    pub selling_costs: Money,
    /// Sale price less loan payoff and selling costs
    pub net_sale_proceeds: Money,
}

/// Simulate the holding period year by year and the terminal sale.
///
/// Rent compounds at the rent-increase rate starting in year 2; operating
/// expenses inflate at the policy rate on the same schedule; the property
/// value appreciates from year 1. The loan balance comes from the
/// amortization schedule at `year * 12` elapsed months.
pub fn project_holding_period(seed: &ProjectionSeed, assumptions: &Assumptions) -> ProjectionOutcome {
    let vacancy = seed.vacancy_percent / dec!(100);
    let rent_growth = Decimal::ONE + seed.rent_increase_percent / dec!(100);
    let appreciation = Decimal::ONE + seed.appreciation_percent / dec!(100);
    let inflation = Decimal::ONE + assumptions.expense_inflation;

    let mut years = Vec::with_capacity(seed.holding_period_years as usize);
    let mut cumulative = Decimal::ZERO;

    for year in 1..=seed.holding_period_years {
        let growth_periods = (year - 1) as i64;
        let gross_income = seed.gross_annual_income * rent_growth.powi(growth_periods);
        let effective_income = gross_income * (Decimal::ONE - vacancy);
        let operating_expenses = seed.base_operating_expenses * inflation.powi(growth_periods);
        let noi = effective_income - operating_expenses;
        let cash_flow = noi - seed.annual_debt_service;

        let property_value = seed.value_basis * appreciation.powi(year as i64);
        let loan_balance = seed.loan.remaining_balance(year * 12);
        let equity = property_value - loan_balance;

        cumulative += cash_flow;

        years.push(YearlyProjection {
            year,
            gross_income,
            operating_expenses,
            noi,
            debt_service: seed.annual_debt_service,
            cash_flow,
            property_value,
            loan_balance,
            equity,
            cumulative_cash_flow: cumulative,
        });
    }

    // Sale at the end of the final year. An empty projection (zero holding
    // years) falls back to the unappreciated basis and untouched loan.
    let (projected_sale_price, final_loan_balance) = match years.last() {
        Some(last) => (last.property_value, last.loan_balance),
        None => (seed.value_basis, seed.loan.principal),
    };
    let selling_costs = projected_sale_price * assumptions.selling_cost_rate;
    let net_sale_proceeds = projected_sale_price - final_loan_balance - selling_costs;

    ProjectionOutcome {
        years,
        cumulative_cash_flow: cumulative,
        projected_sale_price,
        final_loan_balance,
        selling_costs,
        net_sale_proceeds,
    }
}
