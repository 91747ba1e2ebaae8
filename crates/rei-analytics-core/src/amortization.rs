use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent};

/// Fixed-payment loan terms.
///
/// A `term_years` of zero means the loan is absent: the payment is zero and
/// the balance retires immediately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Annual rate as whole percent (7 = 7%)
    pub annual_rate_percent: Percent,
    pub term_years: u32,
}

impl LoanTerms {
    pub fn monthly_payment(&self) -> Money {
        monthly_payment(self.principal, self.annual_rate_percent, self.term_years)
    }

    pub fn remaining_balance(&self, months_elapsed: u32) -> Money {
        remaining_balance(
            self.principal,
            self.annual_rate_percent,
            self.term_years,
            months_elapsed,
        )
    }
}

/// Monthly principal-and-interest payment for a fixed-rate loan.
///
/// Returns zero when there is no loan (`loan_amount <= 0` or a zero term).
/// A non-positive rate amortizes straight-line: `loan_amount / months`.
/// Total over its domain; finite non-negative inputs always produce a
/// finite non-negative payment.
pub fn monthly_payment(loan_amount: Money, annual_rate_percent: Percent, term_years: u32) -> Money {
    if loan_amount <= Decimal::ZERO || term_years == 0 {
        return Decimal::ZERO;
    }

    let total_months = term_years * 12;
    if annual_rate_percent <= Decimal::ZERO {
        return loan_amount / Decimal::from(total_months);
    }

    // P = L * r(1+r)^n / ((1+r)^n - 1)
    let monthly_rate = annual_rate_percent / dec!(100) / dec!(12);
    let compound = match (Decimal::ONE + monthly_rate).checked_powi(total_months as i64) {
        Some(c) => c,
        // (1+r)^n only overflows Decimal range when the annuity factor is
        // already ~1; the payment limit is pure interest on the principal
        None => return loan_amount * monthly_rate,
    };

    loan_amount * monthly_rate * compound / (compound - Decimal::ONE)
}

/// Outstanding principal after `months_elapsed` payments.
///
/// Month zero returns the original principal; at or past maturity the loan
/// is fully retired. Zero-rate loans decrease linearly. The closed-form
/// balance is clamped at zero against rounding drift.
pub fn remaining_balance(
    original_loan: Money,
    annual_rate_percent: Percent,
    term_years: u32,
    months_elapsed: u32,
) -> Money {
    if original_loan <= Decimal::ZERO || months_elapsed == 0 {
        return original_loan;
    }

    let total_months = term_years * 12;
    if months_elapsed >= total_months {
        return Decimal::ZERO;
    }

    if annual_rate_percent <= Decimal::ZERO {
        let paid_fraction = Decimal::from(months_elapsed) / Decimal::from(total_months);
        return original_loan * (Decimal::ONE - paid_fraction);
    }

    // B = L * ((1+r)^n - (1+r)^m) / ((1+r)^n - 1)
    let monthly_rate = annual_rate_percent / dec!(100) / dec!(12);
    let one_plus_r = Decimal::ONE + monthly_rate;
    let (Some(full_term), Some(elapsed)) = (
        one_plus_r.checked_powi(total_months as i64),
        one_plus_r.checked_powi(months_elapsed as i64),
    ) else {
        // At rates extreme enough to overflow the compounding factor the
        // payment is effectively interest-only and principal never moves
        return original_loan;
    };

    let balance = original_loan * (full_term - elapsed) / (full_term - Decimal::ONE);
    balance.max(Decimal::ZERO)
}
