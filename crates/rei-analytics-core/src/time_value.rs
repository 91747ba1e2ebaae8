use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::ReiAnalyticsError;
use crate::types::{Money, Percent, Rate};
use crate::ReiAnalyticsResult;

/// Successive-rate delta below which the solver counts as converged.
const CONVERGENCE_THRESHOLD: Decimal = dec!(0.0000001);
/// Derivative magnitude below which a Newton step stops being meaningful.
const DERIVATIVE_FLOOR: Decimal = dec!(0.000000001);
/// NPV is undefined at or below -100%; rates past 1000% only arise
/// mid-iteration on pathological inputs. Each step clamps into this band.
const RATE_FLOOR: Decimal = dec!(-0.99);
const RATE_CEILING: Decimal = dec!(10.0);

/// Default iteration cap for [`internal_rate_of_return`].
pub const DEFAULT_IRR_ITERATIONS: u32 = 100;
const DEFAULT_IRR_GUESS: Decimal = dec!(0.10);

/// Net Present Value of a series of cash flows at a fractional rate.
pub fn npv(rate: Rate, cash_flows: &[Money]) -> ReiAnalyticsResult<Money> {
    if rate <= dec!(-1) {
        return Err(ReiAnalyticsError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }

    let one_plus_r = Decimal::ONE + rate;
    let mut result = Decimal::ZERO;
    let mut discount = Decimal::ONE;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            // Once the factor overflows, every remaining term discounts to
            // nothing
            discount = match discount.checked_mul(one_plus_r) {
                Some(d) => d,
                None => break,
            };
        }
        if discount.is_zero() {
            return Err(ReiAnalyticsError::DivisionByZero {
                context: format!("NPV discount factor at period {t}"),
            });
        }
        result += cf / discount;
    }

    Ok(result)
}

/// Internal Rate of Return of an ordered cash-flow sequence, as a
/// whole-number percent, under the default guess and iteration cap.
///
/// Index 0 is the initial investment (expected negative); later indices are
/// sequential period flows, with the final entry expected to include
/// terminal proceeds.
///
/// Known limitation: this solver never fails. If Newton-Raphson exhausts
/// its iterations, or the NPV derivative flattens out, the best current
/// estimate is returned as-is. Sequences that never change sign (all
/// inflows or all outflows) have no root, and the number that comes back
/// for them is not meaningful.
pub fn internal_rate_of_return(cash_flows: &[Money]) -> Percent {
    internal_rate_of_return_with(cash_flows, DEFAULT_IRR_GUESS, DEFAULT_IRR_ITERATIONS)
}

/// [`internal_rate_of_return`] with an explicit starting guess (fractional
/// rate) and iteration cap.
pub fn internal_rate_of_return_with(
    cash_flows: &[Money],
    initial_guess: Rate,
    max_iterations: u32,
) -> Percent {
    let mut rate = clamp_rate(initial_guess);

    for _ in 0..max_iterations {
        // An overflow in the expansion means the rate is pinned at a bound
        // on a pathological sequence; the estimate will not improve
        let Some((npv_val, dnpv)) = npv_and_derivative(cash_flows, rate) else {
            break;
        };

        if dnpv.abs() < DERIVATIVE_FLOOR {
            break;
        }

        let next = clamp_rate(rate - npv_val / dnpv);
        if (next - rate).abs() < CONVERGENCE_THRESHOLD {
            return next * dec!(100);
        }
        rate = next;
    }

    rate * dec!(100)
}

/// NPV(r) and its first derivative with respect to r, in one pass.
///
/// Keeps a running discount factor instead of re-raising (1+r) each period:
/// at index t the factor holds (1+r)^-t, so the derivative term
/// -t * CF_t / (1+r)^(t+1) is one extra division away. Returns None if the
/// expansion overflows Decimal range (rates near the -99% floor over long
/// sequences).
fn npv_and_derivative(cash_flows: &[Money], rate: Rate) -> Option<(Decimal, Decimal)> {
    let one_plus_r = Decimal::ONE + rate;
    let mut npv_val = Decimal::ZERO;
    let mut dnpv = Decimal::ZERO;
    let mut discount = Decimal::ONE;

    for (t, cf) in cash_flows.iter().enumerate() {
        npv_val = npv_val.checked_add(cf.checked_mul(discount)?)?;
        if t > 0 {
            let term = Decimal::from(t as i64)
                .checked_mul(*cf)?
                .checked_mul(discount)?
                .checked_div(one_plus_r)?;
            dnpv = dnpv.checked_sub(term)?;
        }
        discount = discount.checked_div(one_plus_r)?;
    }

    Some((npv_val, dnpv))
}

fn clamp_rate(rate: Rate) -> Rate {
    rate.clamp(RATE_FLOOR, RATE_CEILING)
}
