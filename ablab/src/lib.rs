#![warn(missing_docs)]
//! # ablab
//!
//! Experiment design and analysis toolkit for A/B tests:
//! - **Sample-Size Design**: closed-form per-group sizes for
//!   two-proportion and continuous-metric experiments, plus one-sided
//!   non-inferiority designs and calendar-runtime estimation
//! - **Post-Hoc Analysis**: z / Student-t evaluation of completed
//!   experiments with confidence intervals, practical-significance
//!   verdicts, and a ship/no-ship recommendation
//! - **Design Documents**: experiment plans rendered to Markdown or JSON
//! - **CLI**: the `ablab` binary for quick calculations and full design
//!   documents
//!
//! ## Quick Start
//!
//! ```
//! use ablab::{DesignParams, estimate_runtime, proportions_sample_size};
//!
//! let params = DesignParams::default(); // alpha 0.05, power 0.80
//! let size = proportions_sample_size(0.75, 0.762, &params).unwrap();
//! assert_eq!(size.per_group, 20_108);
//!
//! let days = estimate_runtime(size.total(), 12_000.0);
//! assert_eq!(days, 4);
//! ```
//!
//! ## Analyzing results
//!
//! ```
//! use ablab::{AnalysisConfig, ExperimentData, GroupCounts, Recommendation, TestKind, analyze};
//!
//! let data = ExperimentData::Rates {
//!     control: GroupCounts { sample_size: 1000, successes: 100 },
//!     treatment: GroupCounts { sample_size: 1000, successes: 110 },
//! };
//! let config = AnalysisConfig {
//!     alpha: 0.05,
//!     test: TestKind::Superiority { mde: 0.05 },
//! };
//! let result = analyze(&data, &config).unwrap();
//! assert_eq!(result.recommendation, Recommendation::DontImplement);
//! ```

// Re-export the calculation core
pub use ablab_stats::{
    AnalysisConfig, AnalysisError, AnalysisResult, Decision, DesignError, DesignParams,
    ExperimentData, GroupCounts, GroupSummary, PracticalVerdict, Recommendation, SampleSize,
    TestKind, TrafficPeriod, analyze, continuous_sample_size, estimate_runtime,
    non_inferiority_sample_size, proportions_sample_size,
};

// Re-export plans and reports
pub use ablab_report::{
    DesignReport, ExperimentPlan, OutputFormat, PlannedMetric, PlannedTest, ReportMeta,
    generate_json_report, generate_markdown_report,
};

// Re-export the design-report builder
pub use ablab_cli::build_design_report;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        AnalysisConfig, DesignParams, ExperimentData, GroupCounts, GroupSummary, TestKind,
        analyze, continuous_sample_size, estimate_runtime, non_inferiority_sample_size,
        proportions_sample_size,
    };
}

/// Run the ablab CLI harness.
///
/// Call this from a binary's `main()`:
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     ablab::run()
/// }
/// ```
pub use ablab_cli::run;
