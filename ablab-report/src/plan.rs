//! Experiment Plan
//!
//! The immutable description of an experiment a team writes down once per
//! submission: what is being tested, the hypothesis, the metrics, the
//! test configuration, and the rollout metadata that goes into the design
//! document. Deserializable from a TOML plan file.

use ablab_stats::{DEFAULT_ALPHA, DEFAULT_POWER, TrafficPeriod};
use serde::{Deserialize, Serialize};

/// Primary-metric description with the numbers the design formulas need
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PlannedMetric {
    /// Binary outcome; baseline is a conversion rate in (0, 1)
    Rate {
        /// Current conversion rate
        baseline: f64,
    },
    /// Continuous outcome; baseline is the current mean
    Continuous {
        /// Current mean of the metric
        baseline: f64,
        /// Standard deviation of the metric
        std_dev: f64,
    },
}

/// Test choice with its design threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PlannedTest {
    /// Treatment should beat control by the expected lift
    Superiority {
        /// Expected absolute improvement over the baseline
        expected_lift: f64,
    },
    /// Treatment should not trail control by more than the margin
    NonInferiority {
        /// Largest acceptable absolute decrease
        margin: f64,
    },
}

impl PlannedTest {
    /// Human-readable test name for documents
    pub fn label(&self) -> &'static str {
        match self {
            PlannedTest::Superiority { .. } => "Superiority Test",
            PlannedTest::NonInferiority { .. } => "Non-Inferiority Test",
        }
    }
}

/// Expected traffic feeding the experiment
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrafficSpec {
    /// Users over the period
    pub volume: f64,
    /// Period the volume refers to
    #[serde(default)]
    pub period: TrafficPeriod,
}

impl TrafficSpec {
    /// Average daily rate implied by this spec
    pub fn daily_rate(&self) -> f64 {
        self.period.daily_rate(self.volume)
    }
}

/// Campaign routing metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignInfo {
    /// Campaign the experiment runs in
    #[serde(default)]
    pub campaign: Option<String>,
    /// Traffic type (e.g. paid search, organic)
    #[serde(default)]
    pub traffic_type: Option<String>,
    /// Control variant identifier
    #[serde(default)]
    pub control_variant: Option<String>,
    /// Treatment variant identifier
    #[serde(default)]
    pub treatment_variant: Option<String>,
}

/// Audience targeting metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Audience {
    /// User segment the experiment targets
    #[serde(default)]
    pub segment: Option<String>,
    /// Device type restriction, if any
    #[serde(default)]
    pub device: Option<String>,
}

/// Experiment priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Run as soon as possible
    High,
    /// Default scheduling
    Medium,
    /// Run when capacity allows
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

/// Complete experiment plan, built once per submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentPlan {
    /// Experiment name
    pub name: String,
    /// Feature or change under test
    #[serde(default)]
    pub feature: String,
    /// Hypothesis being tested
    #[serde(default)]
    pub hypothesis: String,
    /// Experiment owner
    #[serde(default)]
    pub owner: Option<String>,
    /// Stakeholders to keep informed
    #[serde(default)]
    pub stakeholders: Vec<String>,
    /// Display name of the primary metric
    pub primary_metric: String,
    /// Secondary metrics monitored for unexpected effects
    #[serde(default)]
    pub secondary_metrics: Vec<String>,
    /// Primary-metric numbers for the design formulas
    pub metric: PlannedMetric,
    /// Test choice and threshold
    pub test: PlannedTest,
    /// Significance level
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Statistical power
    #[serde(default = "default_power")]
    pub power: f64,
    /// Expected traffic, if known
    #[serde(default)]
    pub traffic: Option<TrafficSpec>,
    /// Campaign routing
    #[serde(default)]
    pub campaign: CampaignInfo,
    /// Audience targeting
    #[serde(default)]
    pub audience: Audience,
    /// Scheduling priority
    #[serde(default)]
    pub priority: Option<Priority>,
    /// Business goal the experiment serves
    #[serde(default)]
    pub business_goal: Option<String>,
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

fn default_power() -> f64 {
    DEFAULT_POWER
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN_TOML: &str = r#"
        name = "Dynamic CTA text"
        feature = "CTA text change from 'Apply Now' to 'Get Approved Fast'"
        hypothesis = "Changing the CTA will increase App Rate by 1.2 points"
        owner = "growth"
        primary_metric = "App Rate"
        secondary_metrics = ["Revenue"]

        [metric]
        kind = "rate"
        baseline = 0.75

        [test]
        kind = "superiority"
        expected_lift = 0.012

        [traffic]
        volume = 84000
        period = "weekly"

        [campaign]
        campaign = "search-brand"
        control_variant = "A"
        treatment_variant = "B"
    "#;

    #[test]
    fn test_plan_parses_from_toml() {
        let plan: ExperimentPlan = toml::from_str(PLAN_TOML).unwrap();
        assert_eq!(plan.name, "Dynamic CTA text");
        assert_eq!(plan.metric, PlannedMetric::Rate { baseline: 0.75 });
        assert_eq!(
            plan.test,
            PlannedTest::Superiority {
                expected_lift: 0.012
            }
        );
        // Defaults apply when the plan is silent
        assert!((plan.alpha - 0.05).abs() < f64::EPSILON);
        assert!((plan.power - 0.80).abs() < f64::EPSILON);

        let traffic = plan.traffic.unwrap();
        assert!((traffic.daily_rate() - 12_000.0).abs() < 1e-9);
        assert_eq!(plan.campaign.campaign.as_deref(), Some("search-brand"));
        assert!(plan.priority.is_none());
    }

    #[test]
    fn test_non_inferiority_plan_parses() {
        let plan: ExperimentPlan = toml::from_str(
            r#"
            name = "Checkout rewrite"
            primary_metric = "Conversion"

            [metric]
            kind = "rate"
            baseline = 0.42

            [test]
            kind = "non_inferiority"
            margin = 0.01
            "#,
        )
        .unwrap();
        assert_eq!(plan.test, PlannedTest::NonInferiority { margin: 0.01 });
        assert_eq!(plan.test.label(), "Non-Inferiority Test");
        assert!(plan.traffic.is_none());
    }

    #[test]
    fn test_continuous_metric_plan_parses() {
        let plan: ExperimentPlan = toml::from_str(
            r#"
            name = "Pricing page"
            primary_metric = "Revenue"

            [metric]
            kind = "continuous"
            baseline = 50.0
            std_dev = 10.0

            [test]
            kind = "superiority"
            expected_lift = 5.0
            "#,
        )
        .unwrap();
        assert_eq!(
            plan.metric,
            PlannedMetric::Continuous {
                baseline: 50.0,
                std_dev: 10.0
            }
        );
    }
}
