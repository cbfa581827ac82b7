//! Design-Report Assembly
//!
//! Turns an experiment plan into a complete design report by running the
//! appropriate sample-size formula and, when traffic is declared,
//! estimating the calendar runtime.

use ablab_report::{DesignReport, ExperimentPlan, PlannedMetric, PlannedTest, ReportMeta};
use ablab_stats::{
    DesignParams, SampleSize, continuous_sample_size, estimate_runtime,
    non_inferiority_sample_size, proportions_sample_size,
};

/// Build a design report from a plan.
///
/// The metric kind and test kind select one of the design formulas; the
/// runtime estimate is only attached when the sample size computed
/// cleanly and the plan declares traffic.
pub fn build_design_report(plan: &ExperimentPlan) -> anyhow::Result<DesignReport> {
    let params = DesignParams {
        alpha: plan.alpha,
        power: plan.power,
    };

    let sample: SampleSize = match (plan.metric, plan.test) {
        (PlannedMetric::Rate { baseline }, PlannedTest::Superiority { expected_lift }) => {
            proportions_sample_size(baseline, baseline + expected_lift, &params)?
        }
        (PlannedMetric::Rate { baseline }, PlannedTest::NonInferiority { margin }) => {
            non_inferiority_sample_size(baseline, margin, &params)?
        }
        (
            PlannedMetric::Continuous { baseline, std_dev },
            PlannedTest::Superiority { expected_lift },
        ) => continuous_sample_size(baseline, baseline + expected_lift, std_dev, &params)?,
        (PlannedMetric::Continuous { .. }, PlannedTest::NonInferiority { .. }) => {
            anyhow::bail!(
                "non-inferiority designs are only defined for rate metrics; \
                 use a rate metric or a superiority test"
            );
        }
    };

    let total = sample.total();
    let daily_rate = plan.traffic.map(|t| t.daily_rate());
    let estimated_runtime_days = daily_rate.map(|rate| estimate_runtime(total, rate));

    tracing::debug!(
        per_group = sample.per_group,
        total,
        ?estimated_runtime_days,
        "design computed"
    );

    Ok(DesignReport {
        meta: ReportMeta::now(),
        plan: plan.clone(),
        sample_size_per_group: sample.per_group,
        total_sample_size: total,
        daily_rate,
        estimated_runtime_days,
        warning: sample.warning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ablab_report::{Audience, CampaignInfo, TrafficSpec};
    use ablab_stats::TrafficPeriod;

    fn rate_plan() -> ExperimentPlan {
        ExperimentPlan {
            name: "Dynamic CTA text".to_string(),
            feature: String::new(),
            hypothesis: String::new(),
            owner: None,
            stakeholders: vec![],
            primary_metric: "App Rate".to_string(),
            secondary_metrics: vec![],
            metric: PlannedMetric::Rate { baseline: 0.75 },
            test: PlannedTest::Superiority {
                expected_lift: 0.012,
            },
            alpha: 0.05,
            power: 0.80,
            traffic: Some(TrafficSpec {
                volume: 12_000.0,
                period: TrafficPeriod::Daily,
            }),
            campaign: CampaignInfo::default(),
            audience: Audience::default(),
            priority: None,
            business_goal: None,
        }
    }

    #[test]
    fn test_rate_superiority_report() {
        let report = build_design_report(&rate_plan()).unwrap();
        assert_eq!(report.sample_size_per_group, 20108);
        assert_eq!(report.total_sample_size, 40216);
        // 40,216 users at 12,000/day
        assert_eq!(report.estimated_runtime_days, Some(4));
    }

    #[test]
    fn test_runtime_withheld_without_traffic() {
        let mut plan = rate_plan();
        plan.traffic = None;
        let report = build_design_report(&plan).unwrap();
        assert!(report.daily_rate.is_none());
        assert!(report.estimated_runtime_days.is_none());
    }

    #[test]
    fn test_non_inferiority_report() {
        let mut plan = rate_plan();
        plan.test = PlannedTest::NonInferiority { margin: 0.01 };
        let report = build_design_report(&plan).unwrap();
        assert_eq!(report.sample_size_per_group, 23490);
    }

    #[test]
    fn test_continuous_superiority_report() {
        let mut plan = rate_plan();
        plan.metric = PlannedMetric::Continuous {
            baseline: 50.0,
            std_dev: 10.0,
        };
        plan.test = PlannedTest::Superiority { expected_lift: 5.0 };
        let report = build_design_report(&plan).unwrap();
        assert_eq!(report.sample_size_per_group, 63);
    }

    #[test]
    fn test_continuous_non_inferiority_unsupported() {
        let mut plan = rate_plan();
        plan.metric = PlannedMetric::Continuous {
            baseline: 50.0,
            std_dev: 10.0,
        };
        plan.test = PlannedTest::NonInferiority { margin: 1.0 };
        assert!(build_design_report(&plan).is_err());
    }

    #[test]
    fn test_invalid_plan_propagates_design_error() {
        let mut plan = rate_plan();
        plan.test = PlannedTest::Superiority { expected_lift: 0.0 };
        // Equal rates: the design formula rejects a zero difference
        assert!(build_design_report(&plan).is_err());
    }
}
