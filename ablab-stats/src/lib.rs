#![warn(missing_docs)]
//! ablab Statistical Engine
//!
//! Closed-form experiment design and post-hoc evaluation for A/B tests:
//! - Per-group sample sizes for two-proportion and continuous-metric designs
//! - One-sided non-inferiority designs for rate metrics
//! - Calendar runtime estimation from traffic volume
//! - z / Student-t hypothesis evaluation with confidence intervals,
//!   practical-significance verdicts, and a ship/no-ship recommendation
//!
//! Every entry point is a pure function over numeric inputs. Out-of-domain
//! parameters are rejected before any arithmetic and reported with the
//! offending field; results that are defined but practically meaningless
//! carry a warning instead of failing.

mod analysis;
mod design;
mod dist;

pub use analysis::{
    AnalysisConfig, AnalysisError, AnalysisResult, Decision, ExperimentData, GroupCounts,
    GroupSummary, PracticalVerdict, Recommendation, TestKind, analyze,
};
pub use design::{
    DesignError, DesignParams, SampleSize, TrafficPeriod, continuous_sample_size,
    estimate_runtime, non_inferiority_sample_size, proportions_sample_size,
};
pub use dist::{t_cdf, t_quantile, z_cdf, z_quantile};

/// Default significance level (5% Type I error)
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Default statistical power (80% chance of detecting a true effect)
pub const DEFAULT_POWER: f64 = 0.80;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert!((DEFAULT_ALPHA - 0.05).abs() < f64::EPSILON);
        assert!((DEFAULT_POWER - 0.80).abs() < f64::EPSILON);
    }
}
