#![cfg(feature = "flip")]

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use rei_analytics_core::flip::{
    analyze_flip, estimate_rehab_costs, flip_maximum_allowable_offer, flip_verdict, FlipInput,
    FlipVerdict, RehabLevel,
};

fn sample_input() -> FlipInput {
    FlipInput {
        purchase_price: dec!(150000),
        purchase_closing_costs: dec!(4500),
        use_financing: true,
        loan_to_value_percent: dec!(80),
        loan_interest_rate: dec!(12),
        loan_points: dec!(2),
        renovation_costs: dec!(45000),
        contingency_percent: dec!(15),
        permits_costs: dec!(1500),
        staging_costs: dec!(2500),
        holding_period_months: 5,
        property_tax_monthly: dec!(200),
        insurance_monthly: dec!(125),
        utilities_monthly: dec!(175),
        other_holding_costs_monthly: dec!(100),
        after_repair_value: dec!(285000),
        selling_costs_percent: dec!(8),
    }
}

// ===========================================================================
// Cost build-up
// ===========================================================================

#[test]
fn test_all_in_cost_composition() {
    let out = analyze_flip(&sample_input()).unwrap().result;

    // 150000 * 0.80
    assert_eq!(out.loan_amount, dec!(120000));
    // 120000 * 2%
    assert_eq!(out.loan_points_cost, dec!(2400));
    // 45000 * 15% contingency + 1500 permits
    assert_eq!(out.total_renovation_cost, dec!(53250));
    // Base holding (600/mo) and interest-only carry (1200/mo) for 5 months
    assert_eq!(out.total_holding_costs, dec!(3000));
    assert_eq!(out.interest_costs_during_hold, dec!(6000));

    let expected_all_in = dec!(154500) // purchase + closing
        + dec!(53250)
        + dec!(3000)
        + dec!(6000)
        + dec!(2400)
        + dec!(2500);
    assert_eq!(out.all_in_cost, expected_all_in);
}

#[test]
fn test_net_profit_and_returns() {
    let out = analyze_flip(&sample_input()).unwrap().result;

    // Sale: 285000 less 8% selling costs less loan payoff
    assert_eq!(out.selling_costs, dec!(22800));
    assert_eq!(out.net_sale_proceeds, dec!(142200));

    // Cash: 36900 at purchase + 53250 reno + 3000 + 6000 + 2500 staging
    assert_eq!(out.total_cash_required, dec!(101650));
    assert_eq!(out.net_profit, dec!(40550));

    assert_eq!(out.roi_on_cash, dec!(40550) / dec!(101650) * dec!(100));
    // 5-month hold annualizes by 12/5
    assert_eq!(out.annualized_roi, out.roi_on_cash * dec!(12) / dec!(5));
}

#[test]
fn test_rule_70_pass() {
    let out = analyze_flip(&sample_input()).unwrap().result;

    // 285000 * 0.70 - 45000 = 154500; 150000 purchase clears it
    assert_eq!(out.max_purchase_at_70, dec!(154500));
    assert!(out.meets_rule_70);
}

// ===========================================================================
// Verdicts and score
// ===========================================================================

#[test]
fn test_strong_flip_scores_high() {
    let out = analyze_flip(&sample_input()).unwrap().result;

    // Margin 40550/285000 ~= 14.2% (+1), ROI ~39.9% (+1.5),
    // rule 70 (+0.5), positive profit (+0.5), base 1 -> 4.5
    assert_eq!(out.deal_score, dec!(4.5));
    assert_eq!(flip_verdict(&out), FlipVerdict::HomeRun);
}

#[test]
fn test_loss_verdict_when_arv_collapses() {
    let mut input = sample_input();
    input.after_repair_value = dec!(200000);
    let out = analyze_flip(&input).unwrap().result;

    assert!(out.net_profit < Decimal::ZERO);
    assert_eq!(flip_verdict(&out), FlipVerdict::Loss);
}

#[test]
fn test_score_bounds() {
    for arv in [dec!(200000), dec!(240000), dec!(285000), dec!(400000)] {
        let mut input = sample_input();
        input.after_repair_value = arv;
        let out = analyze_flip(&input).unwrap().result;
        assert!(out.deal_score >= dec!(1) && out.deal_score <= dec!(5));
    }
}

// ===========================================================================
// Helpers
// ===========================================================================

#[test]
fn test_flip_mao() {
    let offer =
        flip_maximum_allowable_offer(dec!(285000), dec!(45000), dec!(15), dec!(3), dec!(8));
    // 285000 - 45000 - 42750 - 8550 - 22800
    assert_eq!(offer.mao, dec!(165900));
}

#[test]
fn test_rehab_bands_scale_with_area() {
    let small = estimate_rehab_costs(dec!(900), RehabLevel::Cosmetic);
    let large = estimate_rehab_costs(dec!(2700), RehabLevel::Cosmetic);
    assert_eq!(large.low, small.low * dec!(3));
    assert_eq!(large.high, small.high * dec!(3));
}
