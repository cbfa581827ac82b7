//! JSON Output

use crate::report::DesignReport;

/// Generate a prettified JSON design report.
pub fn generate_json_report(report: &DesignReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{Audience, CampaignInfo, ExperimentPlan, PlannedMetric, PlannedTest};
    use crate::report::ReportMeta;

    #[test]
    fn test_json_report_round_trips() {
        let report = DesignReport {
            meta: ReportMeta::now(),
            plan: ExperimentPlan {
                name: "Checkout rewrite".to_string(),
                feature: String::new(),
                hypothesis: String::new(),
                owner: None,
                stakeholders: vec![],
                primary_metric: "Conversion".to_string(),
                secondary_metrics: vec![],
                metric: PlannedMetric::Rate { baseline: 0.42 },
                test: PlannedTest::NonInferiority { margin: 0.01 },
                alpha: 0.05,
                power: 0.80,
                traffic: None,
                campaign: CampaignInfo::default(),
                audience: Audience::default(),
                priority: None,
                business_goal: None,
            },
            sample_size_per_group: 1000,
            total_sample_size: 2000,
            daily_rate: None,
            estimated_runtime_days: None,
            warning: None,
        };

        let json = generate_json_report(&report).unwrap();
        let parsed: DesignReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.plan.name, "Checkout rewrite");
        assert_eq!(parsed.sample_size_per_group, 1000);
    }
}
