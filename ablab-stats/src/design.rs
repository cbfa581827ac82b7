//! Sample-Size Design
//!
//! Closed-form per-group sample sizes for two-proportion and
//! continuous-metric experiments, a one-sided non-inferiority variant for
//! rate metrics, and a calendar-runtime estimate from traffic volume.
//!
//! All formulas use normal critical values, including the continuous
//! design. The post-hoc path switches to Student-t once group sizes are
//! known; the design-stage normal approximation is deliberate and changes
//! results only for very small groups.

use crate::dist::z_quantile;
use crate::{DEFAULT_ALPHA, DEFAULT_POWER};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Significance and power settings shared by all design formulas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignParams {
    /// Type I error rate; two-sided for superiority designs
    pub alpha: f64,
    /// Probability of detecting a true effect (1 - Type II error rate)
    pub power: f64,
}

impl Default for DesignParams {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            power: DEFAULT_POWER,
        }
    }
}

/// Required per-group sample size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleSize {
    /// Users required in each group
    pub per_group: u64,
    /// Warning message if any
    pub warning: Option<String>,
}

impl SampleSize {
    /// Users required across both groups combined
    pub fn total(&self) -> u64 {
        self.per_group * 2
    }
}

/// Time period a traffic volume figure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficPeriod {
    /// Volume is users per day
    #[default]
    Daily,
    /// Volume is users per week
    Weekly,
    /// Volume is users per 30-day month
    Monthly,
}

impl TrafficPeriod {
    /// Convert a volume over this period into an average daily rate.
    pub fn daily_rate(self, volume: f64) -> f64 {
        match self {
            TrafficPeriod::Daily => volume,
            TrafficPeriod::Weekly => volume / 7.0,
            TrafficPeriod::Monthly => volume / 30.0,
        }
    }
}

impl std::fmt::Display for TrafficPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrafficPeriod::Daily => write!(f, "daily"),
            TrafficPeriod::Weekly => write!(f, "weekly"),
            TrafficPeriod::Monthly => write!(f, "monthly"),
        }
    }
}

impl std::str::FromStr for TrafficPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" | "day" => Ok(TrafficPeriod::Daily),
            "weekly" | "week" => Ok(TrafficPeriod::Weekly),
            "monthly" | "month" => Ok(TrafficPeriod::Monthly),
            other => Err(format!("Unknown traffic period: {}", other)),
        }
    }
}

/// Errors from sample-size calculations
#[derive(Debug, Clone, Error)]
pub enum DesignError {
    /// A probability-valued input fell outside the open unit interval
    #[error("{name} must be strictly between 0 and 1, got {value}")]
    OutOfRange {
        /// Name of the offending field
        name: &'static str,
        /// Value supplied by the caller
        value: f64,
    },

    /// A strictly positive input was zero or negative
    #[error("{name} must be positive, got {value}")]
    NonPositive {
        /// Name of the offending field
        name: &'static str,
        /// Value supplied by the caller
        value: f64,
    },

    /// Baseline and treatment values coincide, so the detectable
    /// difference is zero and the formula divides by zero
    #[error("baseline and treatment values are equal ({0}); there is no difference to detect")]
    ZeroDifference(f64),

    /// A non-inferiority margin at or above the baseline rate would push
    /// the worst-acceptable rate out of (0, 1)
    #[error("margin {margin} must be smaller than the baseline rate {baseline}")]
    MarginTooWide {
        /// Baseline conversion rate
        baseline: f64,
        /// Requested non-inferiority margin
        margin: f64,
    },
}

/// Per-group sample size for a two-proportion z-test.
///
/// Uses a two-sided critical value and the pooled proportion under the
/// null of no difference. The requirement grows without bound as the two
/// rates approach each other, so equal rates are rejected up front rather
/// than silently producing an infinite result.
pub fn proportions_sample_size(
    p1: f64,
    p2: f64,
    params: &DesignParams,
) -> Result<SampleSize, DesignError> {
    validate_params(params)?;
    validate_unit_interval("baseline rate", p1)?;
    validate_unit_interval("treatment rate", p2)?;
    if p1 == p2 {
        return Err(DesignError::ZeroDifference(p1));
    }

    let z_alpha = z_quantile(1.0 - params.alpha / 2.0);
    let z_beta = z_quantile(params.power);

    Ok(pooled_rate_size(p1, p2, p1 - p2, z_alpha, z_beta))
}

/// Per-group sample size for a continuous metric.
///
/// Standardizes the expected difference by the metric's standard
/// deviation and applies the normal approximation `2((z_a + z_b)/d)^2`.
pub fn continuous_sample_size(
    mean1: f64,
    mean2: f64,
    std_dev: f64,
    params: &DesignParams,
) -> Result<SampleSize, DesignError> {
    validate_params(params)?;
    if std_dev <= 0.0 {
        return Err(DesignError::NonPositive {
            name: "std_dev",
            value: std_dev,
        });
    }
    if mean1 == mean2 {
        return Err(DesignError::ZeroDifference(mean1));
    }

    let z_alpha = z_quantile(1.0 - params.alpha / 2.0);
    let z_beta = z_quantile(params.power);

    let effect_size = (mean1 - mean2).abs() / std_dev;
    let n = 2.0 * ((z_alpha + z_beta) / effect_size).powi(2);
    Ok(finish(n, degenerate_power_warning(z_alpha, z_beta, params)))
}

/// Per-group sample size for a one-sided non-inferiority test on rates.
///
/// The hypothesis is directional, so the critical value is one-tailed.
/// The treatment is designed against the worst acceptable rate
/// `baseline - margin`, and the margin itself is the detectable gap.
pub fn non_inferiority_sample_size(
    baseline: f64,
    margin: f64,
    params: &DesignParams,
) -> Result<SampleSize, DesignError> {
    validate_params(params)?;
    validate_unit_interval("baseline rate", baseline)?;
    if margin <= 0.0 {
        return Err(DesignError::NonPositive {
            name: "margin",
            value: margin,
        });
    }
    if margin >= baseline {
        return Err(DesignError::MarginTooWide { baseline, margin });
    }

    let z_alpha = z_quantile(1.0 - params.alpha);
    let z_beta = z_quantile(params.power);

    let worst_acceptable = baseline - margin;
    Ok(pooled_rate_size(
        baseline,
        worst_acceptable,
        margin,
        z_alpha,
        z_beta,
    ))
}

/// Estimated calendar runtime in days for a total sample requirement.
///
/// A non-positive daily rate yields 0 days: "no traffic" is an answer the
/// caller can display, not an error.
pub fn estimate_runtime(total_sample_size: u64, daily_rate: f64) -> u64 {
    if daily_rate > 0.0 {
        (total_sample_size as f64 / daily_rate).ceil() as u64
    } else {
        0
    }
}

/// Shared pooled-variance rate formula with an explicit detectable gap
/// in the denominator.
fn pooled_rate_size(p1: f64, p2: f64, gap: f64, z_alpha: f64, z_beta: f64) -> SampleSize {
    let pooled = (p1 + p2) / 2.0;
    let base = z_alpha * (2.0 * pooled * (1.0 - pooled)).sqrt()
        + z_beta * (p1 * (1.0 - p1) + p2 * (1.0 - p2)).sqrt();
    let n = base.powi(2) / (gap * gap);

    let warning = if base <= 0.0 {
        Some(
            "requested power is so low that the size formula loses meaning; \
             increase power above the rejection probability"
                .to_string(),
        )
    } else {
        None
    };
    finish(n, warning)
}

fn finish(n: f64, warning: Option<String>) -> SampleSize {
    let per_group = n.ceil() as u64;
    let warning = warning.or_else(|| {
        (per_group == 0).then(|| "computed sample size is zero; check alpha and power".to_string())
    });
    SampleSize { per_group, warning }
}

/// Warning for parameter combinations where the power term cancels the
/// critical value and the squared formula stops being monotone.
fn degenerate_power_warning(z_alpha: f64, z_beta: f64, params: &DesignParams) -> Option<String> {
    (z_alpha + z_beta <= 0.0).then(|| {
        format!(
            "power {} is at or below the null rejection probability; \
             the computed size is not meaningful",
            params.power
        )
    })
}

fn validate_params(params: &DesignParams) -> Result<(), DesignError> {
    validate_unit_interval("alpha", params.alpha)?;
    validate_unit_interval("power", params.power)
}

fn validate_unit_interval(name: &'static str, value: f64) -> Result<(), DesignError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(DesignError::OutOfRange { name, value })
    }
}
