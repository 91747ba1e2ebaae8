pub mod analysis;
pub mod comparison;

pub use analysis::{analyze_property, analyze_property_with, PropertyAnalysis, PropertyInput};
pub use comparison::{
    compare_properties, compare_properties_with, CandidateProperty, MetricRankings,
    PropertyComparison,
};
