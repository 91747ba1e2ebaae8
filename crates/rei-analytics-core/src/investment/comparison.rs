use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ReiAnalyticsError;
use crate::types::{with_metadata, Assumptions, ComputationOutput, Percent};
use crate::ReiAnalyticsResult;

use super::analysis::{analyze_property_with, PropertyAnalysis, PropertyInput};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One property in a comparison batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProperty {
    pub id: String,
    pub name: String,
    pub input: PropertyInput,
}

/// Per-metric 1-based ranks plus their arithmetic mean.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricRankings {
    pub cap_rate: u32,
    pub cash_on_cash: u32,
    pub irr: u32,
    pub total_roi: u32,
    pub overall: Decimal,
}

/// A ranked property within one comparison call. Rankings are relative to
/// that call's batch only; they are never cached or comparable across calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyComparison {
    pub property_id: String,
    pub name: String,
    pub analysis: PropertyAnalysis,
    pub rankings: MetricRankings,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Rank a batch of properties under the default [`Assumptions`].
pub fn compare_properties(
    batch: &[CandidateProperty],
) -> ReiAnalyticsResult<ComputationOutput<Vec<PropertyComparison>>> {
    compare_properties_with(batch, &Assumptions::default())
}

/// Analyze every property in the batch independently, rank the batch
/// descending on cap rate, cash-on-cash, IRR, and total ROI, and return it
/// sorted ascending by the mean of those four ranks (rank 1 = best).
///
/// Ties are not specially broken: every sort here is stable, so properties
/// with equal metrics keep the caller-supplied batch order.
pub fn compare_properties_with(
    batch: &[CandidateProperty],
    assumptions: &Assumptions,
) -> ReiAnalyticsResult<ComputationOutput<Vec<PropertyComparison>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if batch.is_empty() {
        return Err(ReiAnalyticsError::InsufficientData(
            "Comparison requires at least one property".into(),
        ));
    }
    if batch.len() == 1 {
        warnings.push("Ranking a single property is trivial; every rank is 1".into());
    }

    // Each analysis depends only on its own input; the batch is merged again
    // only for the rank step below.
    let mut analyzed: Vec<PropertyAnalysis> = Vec::with_capacity(batch.len());
    for candidate in batch {
        let output = analyze_property_with(&candidate.input, assumptions)?;
        for w in output.warnings {
            warnings.push(format!("{}: {}", candidate.name, w));
        }
        analyzed.push(output.result);
    }

    let cap_ranks = rank_descending(&analyzed, |a| a.cap_rate);
    let coc_ranks = rank_descending(&analyzed, |a| a.cash_on_cash);
    let irr_ranks = rank_descending(&analyzed, |a| a.irr);
    let roi_ranks = rank_descending(&analyzed, |a| a.total_roi);

    let mut comparisons: Vec<PropertyComparison> = batch
        .iter()
        .zip(analyzed)
        .enumerate()
        .map(|(i, (candidate, analysis))| {
            let rank_sum = cap_ranks[i] + coc_ranks[i] + irr_ranks[i] + roi_ranks[i];
            PropertyComparison {
                property_id: candidate.id.clone(),
                name: candidate.name.clone(),
                analysis,
                rankings: MetricRankings {
                    cap_rate: cap_ranks[i],
                    cash_on_cash: coc_ranks[i],
                    irr: irr_ranks[i],
                    total_roi: roi_ranks[i],
                    overall: Decimal::from(rank_sum) / dec!(4),
                },
            }
        })
        .collect();

    comparisons.sort_by(|a, b| a.rankings.overall.cmp(&b.rankings.overall));

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Multi-Property Rank Aggregation",
        &batch.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
        warnings,
        elapsed,
        comparisons,
    ))
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// 1-based rank of each batch element under a stable descending sort of
/// `metric`.
fn rank_descending<F>(analyzed: &[PropertyAnalysis], metric: F) -> Vec<u32>
where
    F: Fn(&PropertyAnalysis) -> Percent,
{
    let mut order: Vec<usize> = (0..analyzed.len()).collect();
    order.sort_by(|&a, &b| metric(&analyzed[b]).cmp(&metric(&analyzed[a])));

    let mut ranks = vec![0u32; analyzed.len()];
    for (position, &index) in order.iter().enumerate() {
        ranks[index] = position as u32 + 1;
    }
    ranks
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, rent: Decimal, price: Decimal) -> CandidateProperty {
        CandidateProperty {
            id: id.into(),
            name: format!("Property {id}"),
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
    fn test_overall_is_mean_of_metric_ranks() {
        let batch = vec![
            candidate("a", dec!(1800), dec!(300000)),
            candidate("b", dec!(2400), dec!(300000)),
            candidate("c", dec!(2100), dec!(280000)),
        ];
        let out = compare_properties(&batch).unwrap().result;

        for comparison in &out {
            let r = &comparison.rankings;
            let expected = Decimal::from(r.cap_rate + r.cash_on_cash + r.irr + r.total_roi)
                / dec!(4);
            assert_eq!(r.overall, expected);
        }
    }

    #[test]
    fn test_sorted_ascending_by_overall() {
        let batch = vec![
            candidate("a", dec!(1800), dec!(300000)),
            candidate("b", dec!(2400), dec!(300000)),
            candidate("c", dec!(2100), dec!(280000)),
        ];
        let out = compare_properties(&batch).unwrap().result;

        for pair in out.windows(2) {
            assert!(pair[0].rankings.overall <= pair[1].rankings.overall);
        }
    }

    #[test]
    fn test_dominant_property_ranks_first_everywhere() {
        // Same price, strictly better rent: better on all four metrics
        let batch = vec![
            candidate("weak", dec!(1800), dec!(300000)),
            candidate("strong", dec!(2600), dec!(300000)),
        ];
        let out = compare_properties(&batch).unwrap().result;

        assert_eq!(out[0].property_id, "strong");
        let r = &out[0].rankings;
        assert_eq!(
            (r.cap_rate, r.cash_on_cash, r.irr, r.total_roi),
            (1, 1, 1, 1)
        );
        assert_eq!(r.overall, dec!(1));
    }

    #[test]
    fn test_identical_properties_keep_batch_order() {
        let batch = vec![
            candidate("first", dec!(2200), dec!(300000)),
            candidate("second", dec!(2200), dec!(300000)),
        ];
        let out = compare_properties(&batch).unwrap().result;

        // Stable sorts: the earlier batch entry wins every tie
        assert_eq!(out[0].property_id, "first");
        assert_eq!(out[0].rankings.overall, dec!(1));
        assert_eq!(out[1].rankings.overall, dec!(2));
    }

    #[test]
    fn test_empty_batch_rejected() {
        assert!(compare_properties(&[]).is_err());
    }

    #[test]
    fn test_single_property_warns() {
        let batch = vec![candidate("only", dec!(2200), dec!(300000))];
        let result = compare_properties(&batch).unwrap();
        assert!(result.warnings.iter().any(|w| w.contains("single property")));
        assert_eq!(result.result[0].rankings.overall, dec!(1));
    }
}
