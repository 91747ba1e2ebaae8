use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use rei_analytics_core::amortization::{monthly_payment, remaining_balance};
use rei_analytics_core::investment::{
    analyze_property, compare_properties, CandidateProperty, PropertyInput,
};
use rei_analytics_core::time_value::internal_rate_of_return;

// ===========================================================================
// Amortization properties
// ===========================================================================

#[test]
fn test_amortization_round_trip() {
    // Balance at month 0 is the principal; at maturity it is zero
    let loan = dec!(225000);
    assert_eq!(remaining_balance(loan, dec!(7), 30, 0), loan);
    assert_eq!(remaining_balance(loan, dec!(7), 30, 30 * 12), Decimal::ZERO);
}

#[test]
fn test_zero_rate_linearity() {
    // Interest-free payment is exactly L / (n * 12)
    assert_eq!(monthly_payment(dec!(180000), Decimal::ZERO, 15), dec!(1000));
    assert_eq!(
        monthly_payment(dec!(250000), Decimal::ZERO, 25),
        dec!(250000) / dec!(300)
    );
}

#[test]
fn test_balance_consistent_with_schedule() {
    // Walking the schedule by hand lands close to the closed form
    let loan = dec!(225000);
    let rate = dec!(7);
    let payment = monthly_payment(loan, rate, 30);
    let monthly_rate = rate / dec!(100) / dec!(12);

    let mut balance = loan;
    for _ in 0..60 {
        let interest = balance * monthly_rate;
        balance -= payment - interest;
    }

    let closed_form = remaining_balance(loan, rate, 30, 60);
    assert!(
        (balance - closed_form).abs() < dec!(0.01),
        "schedule {} vs closed form {}",
        balance,
        closed_form
    );
}

// ===========================================================================
// IRR properties
// ===========================================================================

#[test]
fn test_irr_single_period_ten_percent() {
    // [-100, 110] has the exact root r = 10%
    let irr = internal_rate_of_return(&[dec!(-100), dec!(110)]);
    assert!((irr - dec!(10)).abs() < dec!(0.0001), "IRR {} not ~10%", irr);
}

#[test]
fn test_irr_pathological_shapes_do_not_panic() {
    // All-positive and all-negative sequences have no root; the solver
    // still returns a bounded number
    for cfs in [
        vec![dec!(100), dec!(100), dec!(100)],
        vec![dec!(-100), dec!(-100), dec!(-100)],
        vec![],
    ] {
        let irr = internal_rate_of_return(&cfs);
        assert!(irr >= dec!(-99) && irr <= dec!(1000));
    }
}

// ===========================================================================
// Single-property analyzer: the worked scenario
// ===========================================================================

fn scenario_input() -> PropertyInput {
    PropertyInput {
        purchase_price: dec!(300000),
        closing_costs: dec!(0),
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
        maintenance_percent: dec!(0),
        management_percent: dec!(0),
        other_monthly_expenses: dec!(0),
        annual_appreciation_percent: dec!(3),
        annual_rent_increase_percent: dec!(2),
        holding_period_years: 1,
    }
}

#[test]
fn test_scenario_financing_breakdown() {
    let out = analyze_property(&scenario_input()).unwrap().result;

    assert_eq!(out.down_payment, dec!(75000));
    assert_eq!(out.loan_amount, dec!(225000));
    assert!(
        out.monthly_mortgage > dec!(1496) && out.monthly_mortgage < dec!(1498),
        "monthly mortgage {} outside 30-yr @ 7% band",
        out.monthly_mortgage
    );
}

#[test]
fn test_scenario_cap_rate_free_of_debt_service() {
    let out = analyze_property(&scenario_input()).unwrap().result;

    // NOI = 26400 * 0.95 - (3600 + 1500) = 19980
    assert_eq!(out.noi, dec!(19980));
    assert_eq!(out.cap_rate, dec!(19980) / dec!(300000) * dec!(100));

    // Same income and expenses under different financing: same NOI and cap
    let mut cash_deal = scenario_input();
    cash_deal.down_payment_percent = dec!(100);
    cash_deal.interest_rate = dec!(0);
    cash_deal.loan_term_years = 0;
    let cash_out = analyze_property(&cash_deal).unwrap().result;

    assert_eq!(cash_out.noi, out.noi);
    assert_eq!(cash_out.cap_rate, out.cap_rate);
}

#[test]
fn test_one_year_hold_sequences() {
    let out = analyze_property(&scenario_input()).unwrap().result;

    assert_eq!(out.yearly_projections.len(), 1);
    let y1 = &out.yearly_projections[0];
    assert_eq!(y1.year, 1);
    // Sale price is year 1's appreciated value
    assert_eq!(out.projected_sale_price, dec!(300000) * dec!(1.03));
}

// ===========================================================================
// Comparison and ranking
// ===========================================================================

fn candidate(id: &str, rent: Decimal, price: Decimal) -> CandidateProperty {
    CandidateProperty {
        id: id.into(),
        name: format!("{id} St"),
        input: PropertyInput {
            purchase_price: price,
            closing_costs: dec!(5000),
            renovation_costs: dec!(0),
            down_payment_percent: dec!(25),
            interest_rate: dec!(7),
            loan_term_years: 30,
            monthly_rent: rent,
            other_monthly_income: dec!(0),
            vacancy_percent: dec!(5),
            property_tax_annual: dec!(3000),
            insurance_annual: dec!(1200),
            hoa_monthly: dec!(0),
            maintenance_percent: dec!(5),
            management_percent: dec!(8),
            other_monthly_expenses: dec!(0),
            annual_appreciation_percent: dec!(3),
            annual_rent_increase_percent: dec!(2),
            holding_period_years: 5,
        },
    }
}

#[test]
fn test_ranking_mean_and_order_over_three_properties() {
    let batch = vec![
        candidate("maple", dec!(1900), dec!(310000)),
        candidate("oak", dec!(2500), dec!(305000)),
        candidate("pine", dec!(2100), dec!(290000)),
    ];
    let out = compare_properties(&batch).unwrap().result;

    assert_eq!(out.len(), 3);

    // Overall is the mean of the four metric ranks, every time
    for comparison in &out {
        let r = &comparison.rankings;
        let mean =
            Decimal::from(r.cap_rate + r.cash_on_cash + r.irr + r.total_roi) / dec!(4);
        assert_eq!(r.overall, mean);

        for rank in [r.cap_rate, r.cash_on_cash, r.irr, r.total_roi] {
            assert!((1..=3).contains(&rank));
        }
    }

    // Returned ascending by overall rank
    for pair in out.windows(2) {
        assert!(pair[0].rankings.overall <= pair[1].rankings.overall);
    }
}

#[test]
fn test_each_metric_rank_used_once_per_metric() {
    let batch = vec![
        candidate("a", dec!(1900), dec!(310000)),
        candidate("b", dec!(2500), dec!(305000)),
        candidate("c", dec!(2100), dec!(290000)),
    ];
    let out = compare_properties(&batch).unwrap().result;

    let mut cap_ranks: Vec<u32> = out.iter().map(|c| c.rankings.cap_rate).collect();
    cap_ranks.sort();
    assert_eq!(cap_ranks, vec![1, 2, 3]);
}
