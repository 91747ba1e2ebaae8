pub mod analysis;
pub mod offer;

pub use analysis::{
    analyze_brrr, analyze_brrr_with, deal_verdict, BrrrAnalysis, BrrrInput, DealVerdict,
};
pub use offer::{maximum_allowable_offer, seventy_percent_rule};
