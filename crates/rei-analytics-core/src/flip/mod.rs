pub mod analysis;

pub use analysis::{
    analyze_flip, estimate_rehab_costs, flip_maximum_allowable_offer, flip_verdict, FlipAnalysis,
    FlipInput, FlipMonthlyBreakdown, FlipOfferBreakdown, FlipVerdict, RehabEstimate, RehabLevel,
};
