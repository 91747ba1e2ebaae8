use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimal fractions (0.05 = 5%). Used for policy
/// assumptions and internal compounding.
pub type Rate = Decimal;

/// Rates expressed as whole-number percent (7 = 7%). Caller-facing input
/// fields and reported return metrics use this convention; the division by
/// 100 happens at point of use.
pub type Percent = Decimal;

/// One row of a holding-period projection, shared by every analyzer that
/// simulates a rental hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearlyProjection {
    /// 1-based holding year
    pub year: u32,
    /// Gross scheduled income before vacancy loss
    pub gross_income: Money,
    pub operating_expenses: Money,
    pub noi: Money,
    pub debt_service: Money,
    pub cash_flow: Money,
    pub property_value: Money,
    pub loan_balance: Money,
    pub equity: Money,
    pub cumulative_cash_flow: Money,
}

/// Cash-on-cash return for a deal where the invested basis can reach zero.
///
/// A cash-out refinance that recovers every invested dollar leaves no basis
/// to divide by; that outcome is a first-class business result, so it gets
/// its own variant instead of a floating-point infinity that would poison
/// sorts and serialization downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "percent", rename_all = "snake_case")]
pub enum CashOnCash {
    /// Annual cash flow over cash left in the deal, as whole percent.
    Finite(Percent),
    /// All invested capital was recovered at refinance.
    InfiniteReturn,
}

impl CashOnCash {
    pub fn is_infinite(&self) -> bool {
        matches!(self, CashOnCash::InfiniteReturn)
    }

    pub fn as_percent(&self) -> Option<Percent> {
        match self {
            CashOnCash::Finite(pct) => Some(*pct),
            CashOnCash::InfiniteReturn => None,
        }
    }

    /// Total ordering that places `InfiniteReturn` above every finite value.
    pub fn ranking_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CashOnCash::InfiniteReturn, CashOnCash::InfiniteReturn) => Ordering::Equal,
            (CashOnCash::InfiniteReturn, CashOnCash::Finite(_)) => Ordering::Greater,
            (CashOnCash::Finite(_), CashOnCash::InfiniteReturn) => Ordering::Less,
            (CashOnCash::Finite(a), CashOnCash::Finite(b)) => a.cmp(b),
        }
    }
}

/// Policy constants the projection and return calculations depend on.
///
/// These are business assumptions, not market data; the defaults match the
/// ones the reporting layer has always shipped with. Pass a custom set to
/// an `*_with` entry point to test alternative policies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assumptions {
    /// Annual operating-expense inflation applied from year 2 on (0.02 = 2%).
    pub expense_inflation: Rate,
    /// Selling costs at exit as a fraction of sale price (0.06 = 6%).
    pub selling_cost_rate: Rate,
    /// Newton-Raphson starting rate for the IRR solver (0.10 = 10%).
    pub irr_initial_guess: Rate,
    /// Iteration cap for the IRR solver.
    pub irr_max_iterations: u32,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            expense_inflation: dec!(0.02),
            selling_cost_rate: dec!(0.06),
            irr_initial_guess: dec!(0.10),
            irr_max_iterations: 100,
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cash_on_cash_ranking_order() {
        let inf = CashOnCash::InfiniteReturn;
        let high = CashOnCash::Finite(dec!(22.5));
        let low = CashOnCash::Finite(dec!(4.1));

        assert_eq!(inf.ranking_cmp(&high), Ordering::Greater);
        assert_eq!(low.ranking_cmp(&high), Ordering::Less);
        assert_eq!(inf.ranking_cmp(&inf), Ordering::Equal);
    }

    #[test]
    fn test_cash_on_cash_serializes_tagged() {
        let json = serde_json::to_value(CashOnCash::InfiniteReturn).unwrap();
        assert_eq!(json["kind"], "infinite_return");
        assert!(json.get("percent").is_none());

        let json = serde_json::to_value(CashOnCash::Finite(dec!(12.5))).unwrap();
        assert_eq!(json["kind"], "finite");
        // serde-with-str renders Decimal as a string
        assert_eq!(json["percent"], "12.5");
    }

    #[test]
    fn test_default_assumptions() {
        let a = Assumptions::default();
        assert_eq!(a.expense_inflation, dec!(0.02));
        assert_eq!(a.selling_cost_rate, dec!(0.06));
        assert_eq!(a.irr_initial_guess, dec!(0.10));
        assert_eq!(a.irr_max_iterations, 100);
    }
}
