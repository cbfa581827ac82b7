//! Output Formatting
//!
//! Human-readable terminal output for sample-size results, post-hoc
//! analyses, and design documents.

use ablab_report::{DesignReport, format_count};
use ablab_stats::{AnalysisConfig, AnalysisResult, Decision, PracticalVerdict, Recommendation,
    SampleSize, TestKind};

/// Sample sizes above this get a feasibility warning
const LARGE_SAMPLE: u64 = 50_000;

/// Runtimes longer than this get a duration warning
const LONG_RUNTIME_DAYS: u64 = 30;

/// Runtimes shorter than this get a "quick experiment" note
const QUICK_RUNTIME_DAYS: u64 = 7;

/// Runtime figures attached to a sample-size result
#[derive(Debug, Clone, Copy)]
pub struct RuntimeEstimate {
    /// Average users per day entering the experiment
    pub daily_rate: f64,
    /// Estimated days to fill both groups
    pub days: u64,
}

/// Format a sample-size result for terminal display
pub fn format_sample_size_output(
    test_label: &str,
    sample: &SampleSize,
    runtime: Option<RuntimeEstimate>,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("\nSample Size - {}\n", test_label));
    out.push_str(&"=".repeat(60));
    out.push('\n');
    out.push_str(&format!(
        "  per group: {} users\n",
        format_count(sample.per_group)
    ));
    out.push_str(&format!(
        "  total:     {} users\n",
        format_count(sample.total())
    ));

    if sample.per_group > LARGE_SAMPLE {
        out.push_str(
            "\n  Warning: large sample size required; consider a larger \
             expected lift or margin.\n",
        );
    }
    if let Some(warning) = &sample.warning {
        out.push_str(&format!("\n  Warning: {}\n", warning));
    }

    if let Some(runtime) = runtime {
        out.push_str("\nRuntime\n");
        out.push_str(&"-".repeat(60));
        out.push('\n');
        out.push_str(&format!("  traffic: {:.0} users/day\n", runtime.daily_rate));
        if runtime.days == 0 {
            out.push_str("  runtime: no traffic declared\n");
        } else {
            out.push_str(&format!("  runtime: {} days\n", runtime.days));
            if runtime.days > LONG_RUNTIME_DAYS {
                out.push_str(
                    "  Warning: long runtime (>30 days); consider more traffic \
                     or wider thresholds.\n",
                );
            } else if runtime.days < QUICK_RUNTIME_DAYS {
                out.push_str("  Quick experiment - completes in under a week.\n");
            }
        }
    }

    out
}

/// Format a post-hoc analysis result for terminal display
pub fn format_analysis_output(result: &AnalysisResult, config: &AnalysisConfig) -> String {
    let mut out = String::new();

    let (test_label, threshold_label) = match config.test {
        TestKind::Superiority { mde } => ("Superiority Test", format!("MDE {}", mde)),
        TestKind::NonInferiority { margin } => {
            ("Non-Inferiority Test", format!("margin {}", margin))
        }
    };

    out.push_str(&format!("\nAnalysis Results ({})\n", test_label));
    out.push_str(&"=".repeat(60));
    out.push('\n');
    out.push_str(&format!("  effect size: {:+.4}\n", result.effect_size));
    match result.df {
        Some(df) => out.push_str(&format!(
            "  t statistic: {:.4} (df {:.0})\n",
            result.statistic, df
        )),
        None => out.push_str(&format!("  z statistic: {:.4}\n", result.statistic)),
    }
    out.push_str(&format!(
        "  p-value:     {:.4} ({} at alpha={})\n",
        result.p_value, result.decision, config.alpha
    ));
    out.push_str(&format!(
        "  {:.0}% CI:      [{:+.4}, {:+.4}]\n",
        result.ci_level * 100.0,
        result.ci_lower,
        result.ci_upper
    ));
    out.push_str(&format!(
        "  practical:   {} ({})\n",
        result.practical, threshold_label
    ));

    if let Some(warning) = &result.warning {
        out.push_str(&format!("\n  Warning: {}\n", warning));
    }

    out.push_str(&format!(
        "\n  Recommendation: {}\n",
        recommendation_text(result, config)
    ));

    out
}

/// One-line call to action printed under every analysis
fn recommendation_text(result: &AnalysisResult, config: &AnalysisConfig) -> &'static str {
    match config.test {
        TestKind::Superiority { .. } => match result.recommendation {
            Recommendation::Implement => "IMPLEMENT - significant and meaningful effect",
            Recommendation::Consider => "CONSIDER - significant but may not be meaningful",
            Recommendation::DontImplement => "DON'T IMPLEMENT - no significant effect detected",
        },
        TestKind::NonInferiority { .. } => match result.recommendation {
            Recommendation::Implement => "IMPLEMENT - non-inferiority demonstrated",
            Recommendation::Consider => "CONSIDER - review the margin",
            Recommendation::DontImplement => {
                if result.decision == Decision::Significant
                    && result.practical == PracticalVerdict::DoesNotMeet
                {
                    "DON'T IMPLEMENT - treatment is inferior"
                } else {
                    "DON'T IMPLEMENT - non-inferiority not demonstrated"
                }
            }
        },
    }
}

/// Format a design report for terminal display
pub fn format_design_output(report: &DesignReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("\nExperiment Design - {}\n", report.plan.name));
    out.push_str(&"=".repeat(60));
    out.push('\n');

    let rows = report.key_values();
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in &rows {
        out.push_str(&format!("  {:<w$}  {}\n", key, value, w = width));
    }

    if let Some(warning) = &report.warning {
        out.push_str(&format!("\n  Warning: {}\n", warning));
    }

    out
}
