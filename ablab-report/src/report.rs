//! Report Data Structures

use crate::plan::{ExperimentPlan, PlannedMetric, PlannedTest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Tool version that produced the report
    pub version: String,
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
}

impl ReportMeta {
    /// Metadata stamped with the current time
    pub fn now() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now(),
        }
    }
}

/// Complete experiment design document: the plan plus every number the
/// design formulas produced for it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignReport {
    /// Report metadata
    pub meta: ReportMeta,
    /// The plan the numbers were computed from
    pub plan: ExperimentPlan,
    /// Required users per group
    pub sample_size_per_group: u64,
    /// Required users across both groups
    pub total_sample_size: u64,
    /// Average daily traffic, when the plan declared traffic
    pub daily_rate: Option<f64>,
    /// Estimated calendar runtime in days, when traffic is known
    pub estimated_runtime_days: Option<u64>,
    /// Warning attached by the design formulas, if any
    pub warning: Option<String>,
}

impl DesignReport {
    /// Flat key/value view of the document, in display order.
    ///
    /// This is the interface renderers consume; keys are stable labels,
    /// values are already formatted for display.
    pub fn key_values(&self) -> Vec<(&'static str, String)> {
        let plan = &self.plan;
        let mut rows = vec![("Experiment", plan.name.clone())];

        if !plan.feature.is_empty() {
            rows.push(("Feature Being Tested", plan.feature.clone()));
        }
        if !plan.hypothesis.is_empty() {
            rows.push(("Hypothesis", plan.hypothesis.clone()));
        }
        if let Some(owner) = &plan.owner {
            rows.push(("Owner", owner.clone()));
        }
        if !plan.stakeholders.is_empty() {
            rows.push(("Stakeholders", plan.stakeholders.join(", ")));
        }

        rows.push(("Test Type", plan.test.label().to_string()));
        let baseline = match plan.metric {
            PlannedMetric::Rate { baseline } => format!("{:.1}%", baseline * 100.0),
            PlannedMetric::Continuous { baseline, .. } => format!("{}", baseline),
        };
        rows.push((
            "Target Metric",
            format!("{} (baseline {})", plan.primary_metric, baseline),
        ));
        match (plan.metric, plan.test) {
            (PlannedMetric::Rate { .. }, PlannedTest::Superiority { expected_lift }) => {
                rows.push(("Expected Lift", format!("{:.2} pts", expected_lift * 100.0)));
            }
            (PlannedMetric::Continuous { .. }, PlannedTest::Superiority { expected_lift }) => {
                rows.push(("Expected Lift", format!("{}", expected_lift)));
            }
            (_, PlannedTest::NonInferiority { margin }) => {
                rows.push(("Non-Inferiority Margin", format!("{:.2} pts", margin * 100.0)));
            }
        }
        if !plan.secondary_metrics.is_empty() {
            rows.push(("Secondary Metrics", plan.secondary_metrics.join(", ")));
        }

        rows.push((
            "Significance / Power",
            format!("alpha {} / power {}", plan.alpha, plan.power),
        ));
        rows.push((
            "Sample Size Per Variation",
            format!("{} users", crate::format_count(self.sample_size_per_group)),
        ));
        rows.push((
            "Total Sample Size",
            format!("{} users", crate::format_count(self.total_sample_size)),
        ));
        if let (Some(days), Some(rate)) = (self.estimated_runtime_days, self.daily_rate) {
            rows.push((
                "Estimated Runtime",
                format!("{} days at {:.0} users/day", days, rate),
            ));
        }

        if let Some(campaign) = &plan.campaign.campaign {
            rows.push(("Campaign", campaign.clone()));
        }
        if let Some(traffic_type) = &plan.campaign.traffic_type {
            rows.push(("Traffic Type", traffic_type.clone()));
        }
        if let Some(control) = &plan.campaign.control_variant {
            rows.push(("Control", control.clone()));
        }
        if let Some(treatment) = &plan.campaign.treatment_variant {
            rows.push(("Treatment", treatment.clone()));
        }
        if let Some(segment) = &plan.audience.segment {
            rows.push(("User Segment", segment.clone()));
        }
        if let Some(device) = &plan.audience.device {
            rows.push(("Device Type", device.clone()));
        }
        if let Some(priority) = plan.priority {
            rows.push(("Priority", priority.to_string()));
        }
        if let Some(goal) = &plan.business_goal {
            rows.push(("Business Goal", goal.clone()));
        }

        rows
    }
}
