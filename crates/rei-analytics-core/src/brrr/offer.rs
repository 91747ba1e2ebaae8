use rust_decimal_macros::dec;

use crate::types::Money;

/// Classic wholesaling screen: maximum offer = 70% of ARV less repairs.
pub fn seventy_percent_rule(arv: Money, repair_costs: Money) -> Money {
    arv * dec!(0.70) - repair_costs
}

/// Maximum allowable offer backing out repairs, the target profit, and
/// transaction costs from the ARV.
pub fn maximum_allowable_offer(
    arv: Money,
    repair_costs: Money,
    desired_profit: Money,
    closing_costs: Money,
) -> Money {
    arv - repair_costs - desired_profit - closing_costs
}
