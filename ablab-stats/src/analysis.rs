//! Post-Hoc Analysis
//!
//! Evaluates a completed experiment: observed effect size, a one-tailed
//! test statistic and p-value (z for binary outcomes, Student-t for
//! continuous ones), a two-sided confidence interval, and a
//! practical-significance verdict against the threshold the experiment
//! was designed with.

use crate::dist::{t_cdf, t_quantile, z_cdf, z_quantile};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-group observations below this leave a small-sample warning on
/// rate results
const MIN_RATE_SAMPLES: u64 = 100;

/// Degrees of freedom below this leave a small-sample warning on mean
/// results
const MIN_MEAN_DF: f64 = 30.0;

/// Which hypothesis the experiment was designed to test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TestKind {
    /// Treatment should beat control by a meaningful amount
    Superiority {
        /// Smallest absolute effect considered practically meaningful
        mde: f64,
    },
    /// Treatment should not trail control by more than the margin
    NonInferiority {
        /// Largest acceptable absolute decrease
        margin: f64,
    },
}

/// Analysis configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Significance level for the decision and the confidence interval
    pub alpha: f64,
    /// Test the experiment was designed for
    pub test: TestKind,
}

/// Binary-outcome observations for one group
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GroupCounts {
    /// Users in the group
    pub sample_size: u64,
    /// Users who converted
    pub successes: u64,
}

impl GroupCounts {
    /// Observed conversion rate
    pub fn rate(&self) -> f64 {
        self.successes as f64 / self.sample_size as f64
    }
}

/// Continuous-outcome observations for one group
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Users in the group
    pub sample_size: u64,
    /// Observed mean of the metric
    pub mean: f64,
    /// Observed standard deviation of the metric
    pub std_dev: f64,
}

/// Observed experiment outcomes, tagged by metric kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "metric")]
pub enum ExperimentData {
    /// Binary outcome (conversion-style) metric
    Rates {
        /// Control group counts
        control: GroupCounts,
        /// Treatment group counts
        treatment: GroupCounts,
    },
    /// Continuous metric summarized per group
    Means {
        /// Control group summary
        control: GroupSummary,
        /// Treatment group summary
        treatment: GroupSummary,
    },
}

/// Statistical decision at the configured significance level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// p-value below alpha
    Significant,
    /// p-value at or above alpha
    NotSignificant,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Significant => write!(f, "significant"),
            Decision::NotSignificant => write!(f, "not significant"),
        }
    }
}

/// Practical-significance verdict against the design threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PracticalVerdict {
    /// Effect clears the MDE, or stays within the non-inferiority margin
    MeetsThreshold,
    /// Effect falls short of the MDE, or breaches the margin
    DoesNotMeet,
}

impl std::fmt::Display for PracticalVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PracticalVerdict::MeetsThreshold => write!(f, "meets threshold"),
            PracticalVerdict::DoesNotMeet => write!(f, "does not meet threshold"),
        }
    }
}

/// What to do with the treatment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    /// Significant and practically meaningful
    Implement,
    /// Significant but below the meaningful threshold
    Consider,
    /// No significant effect, or non-inferiority not demonstrated
    DontImplement,
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recommendation::Implement => write!(f, "implement"),
            Recommendation::Consider => write!(f, "consider"),
            Recommendation::DontImplement => write!(f, "don't implement"),
        }
    }
}

/// Result of a post-hoc analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Observed difference, treatment minus control
    pub effect_size: f64,
    /// z or t statistic depending on the metric branch
    pub statistic: f64,
    /// Degrees of freedom of the t reference distribution (means branch)
    pub df: Option<f64>,
    /// One-tailed p-value
    pub p_value: f64,
    /// Lower bound of the two-sided confidence interval
    pub ci_lower: f64,
    /// Upper bound of the two-sided confidence interval
    pub ci_upper: f64,
    /// Confidence level of the interval (1 - alpha)
    pub ci_level: f64,
    /// Statistical decision
    pub decision: Decision,
    /// Practical verdict against the MDE or margin
    pub practical: PracticalVerdict,
    /// Recommended action
    pub recommendation: Recommendation,
    /// Warning message if any
    pub warning: Option<String>,
}

/// Errors from post-hoc analysis
#[derive(Debug, Clone, Error)]
pub enum AnalysisError {
    /// A group reported zero users
    #[error("{group} sample size must be positive")]
    EmptyGroup {
        /// Which group violated the constraint
        group: &'static str,
    },

    /// A continuous group is too small for a pooled variance
    #[error("{group} needs at least 2 observations for a pooled variance, got {got}")]
    InsufficientSamples {
        /// Which group violated the constraint
        group: &'static str,
        /// Observations supplied
        got: u64,
    },

    /// A success count exceeds its group's size
    #[error("{group} successes ({successes}) exceed its sample size ({sample_size})")]
    CountExceedsSample {
        /// Which group violated the constraint
        group: &'static str,
        /// Successes supplied
        successes: u64,
        /// Group size supplied
        sample_size: u64,
    },

    /// A group's standard deviation was zero or negative
    #[error("{group} standard deviation must be positive, got {value}")]
    NonPositiveStd {
        /// Which group violated the constraint
        group: &'static str,
        /// Value supplied
        value: f64,
    },

    /// The design threshold was zero or negative
    #[error("{name} must be positive, got {value}")]
    NonPositiveThreshold {
        /// Name of the offending field
        name: &'static str,
        /// Value supplied
        value: f64,
    },

    /// Alpha outside the open unit interval
    #[error("alpha must be strictly between 0 and 1, got {0}")]
    InvalidAlpha(f64),

    /// Pooled outcome variance is zero, so no test statistic exists
    #[error("both groups have zero outcome variance; no test statistic can be formed")]
    NoVariance,
}

/// Analyze a completed experiment.
///
/// Dispatches once on the metric kind, then applies the shared decision
/// rules. All inputs are validated before any arithmetic; out-of-domain
/// values surface as an [`AnalysisError`] naming the offending field
/// rather than propagating NaN or infinity.
pub fn analyze(
    data: &ExperimentData,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    if !(config.alpha > 0.0 && config.alpha < 1.0) {
        return Err(AnalysisError::InvalidAlpha(config.alpha));
    }
    match config.test {
        TestKind::Superiority { mde } if mde <= 0.0 => {
            return Err(AnalysisError::NonPositiveThreshold {
                name: "mde",
                value: mde,
            });
        }
        TestKind::NonInferiority { margin } if margin <= 0.0 => {
            return Err(AnalysisError::NonPositiveThreshold {
                name: "margin",
                value: margin,
            });
        }
        _ => {}
    }

    match data {
        ExperimentData::Rates { control, treatment } => analyze_rates(*control, *treatment, config),
        ExperimentData::Means { control, treatment } => analyze_means(*control, *treatment, config),
    }
}

/// Binary-outcome branch: two-proportion z-test with pooled variance.
fn analyze_rates(
    control: GroupCounts,
    treatment: GroupCounts,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    validate_counts("control", control)?;
    validate_counts("treatment", treatment)?;

    let n_c = control.sample_size as f64;
    let n_t = treatment.sample_size as f64;

    // Pooled rate under the null of no difference
    let pooled = (control.successes + treatment.successes) as f64 / (n_c + n_t);
    let se = (pooled * (1.0 - pooled) * (1.0 / n_c + 1.0 / n_t)).sqrt();
    if se == 0.0 {
        return Err(AnalysisError::NoVariance);
    }

    let effect_size = treatment.rate() - control.rate();
    let statistic = (effect_size + margin_shift(config)) / se;
    let p_value = 1.0 - z_cdf(statistic);

    let half_width = z_quantile(1.0 - config.alpha / 2.0) * se;

    let warning = (control.sample_size < MIN_RATE_SAMPLES
        || treatment.sample_size < MIN_RATE_SAMPLES)
        .then(|| {
            format!(
                "fewer than {} users in a group; the normal approximation may be unreliable",
                MIN_RATE_SAMPLES
            )
        });

    let (decision, practical, recommendation) = decide(p_value, effect_size, config);
    Ok(AnalysisResult {
        effect_size,
        statistic,
        df: None,
        p_value,
        ci_lower: effect_size - half_width,
        ci_upper: effect_size + half_width,
        ci_level: 1.0 - config.alpha,
        decision,
        practical,
        recommendation,
        warning,
    })
}

/// Continuous-outcome branch: two-sample t-test with pooled variance.
fn analyze_means(
    control: GroupSummary,
    treatment: GroupSummary,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    validate_summary("control", control)?;
    validate_summary("treatment", treatment)?;

    let n_c = control.sample_size as f64;
    let n_t = treatment.sample_size as f64;
    let df = n_c + n_t - 2.0;

    let pooled_var = ((n_c - 1.0) * control.std_dev.powi(2)
        + (n_t - 1.0) * treatment.std_dev.powi(2))
        / df;
    let se = pooled_var.sqrt() * (1.0 / n_c + 1.0 / n_t).sqrt();

    let effect_size = treatment.mean - control.mean;
    let statistic = (effect_size + margin_shift(config)) / se;
    let p_value = 1.0 - t_cdf(statistic, df);

    let half_width = t_quantile(1.0 - config.alpha / 2.0, df) * se;

    let warning = (df < MIN_MEAN_DF).then(|| {
        format!(
            "only {:.0} degrees of freedom; variance estimates may be unstable",
            df
        )
    });

    let (decision, practical, recommendation) = decide(p_value, effect_size, config);
    Ok(AnalysisResult {
        effect_size,
        statistic,
        df: Some(df),
        p_value,
        ci_lower: effect_size - half_width,
        ci_upper: effect_size + half_width,
        ci_level: 1.0 - config.alpha,
        decision,
        practical,
        recommendation,
        warning,
    })
}

/// Offset applied to the effect before forming the statistic: zero for
/// superiority, the margin for non-inferiority (the null sits at
/// `-margin` rather than zero).
fn margin_shift(config: &AnalysisConfig) -> f64 {
    match config.test {
        TestKind::Superiority { .. } => 0.0,
        TestKind::NonInferiority { margin } => margin,
    }
}

/// Shared decision rules applied to both metric branches.
fn decide(
    p_value: f64,
    effect_size: f64,
    config: &AnalysisConfig,
) -> (Decision, PracticalVerdict, Recommendation) {
    let significant = p_value < config.alpha;
    let decision = if significant {
        Decision::Significant
    } else {
        Decision::NotSignificant
    };

    match config.test {
        TestKind::Superiority { mde } => {
            let meets = effect_size.abs() >= mde;
            let practical = if meets {
                PracticalVerdict::MeetsThreshold
            } else {
                PracticalVerdict::DoesNotMeet
            };
            let recommendation = match (significant, meets) {
                (true, true) => Recommendation::Implement,
                (true, false) => Recommendation::Consider,
                (false, _) => Recommendation::DontImplement,
            };
            (decision, practical, recommendation)
        }
        TestKind::NonInferiority { margin } => {
            let within = effect_size > -margin;
            let practical = if within {
                PracticalVerdict::MeetsThreshold
            } else {
                PracticalVerdict::DoesNotMeet
            };
            // Inferior (outside the margin) and not-demonstrated collapse
            // to the same action
            let recommendation = if significant && within {
                Recommendation::Implement
            } else {
                Recommendation::DontImplement
            };
            (decision, practical, recommendation)
        }
    }
}

fn validate_counts(group: &'static str, counts: GroupCounts) -> Result<(), AnalysisError> {
    if counts.sample_size == 0 {
        return Err(AnalysisError::EmptyGroup { group });
    }
    if counts.successes > counts.sample_size {
        return Err(AnalysisError::CountExceedsSample {
            group,
            successes: counts.successes,
            sample_size: counts.sample_size,
        });
    }
    Ok(())
}

fn validate_summary(group: &'static str, summary: GroupSummary) -> Result<(), AnalysisError> {
    if summary.sample_size < 2 {
        return Err(AnalysisError::InsufficientSamples {
            group,
            got: summary.sample_size,
        });
    }
    if summary.std_dev <= 0.0 {
        return Err(AnalysisError::NonPositiveStd {
            group,
            value: summary.std_dev,
        });
    }
    Ok(())
}
