//! Derived drift analyses
//!
//! Thin compositions over the score combiner: subgroup drift over a
//! categorical partition and confidence drift over model-confidence
//! samples.

mod confidence;
mod subgroup;

pub use confidence::{ConfidenceAnalysis, ConfidenceAnalyzer, ConfidenceTrend};
pub use subgroup::{
    frequency_shift, FrequencyShift, SubgroupAnalysis, SubgroupAnalyzer, SubgroupResult,
    SubgroupSummary,
};
