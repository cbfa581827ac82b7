//! Markdown Output
//!
//! Renders the static design document teams attach to an experiment
//! ticket: title, team, configuration, traffic allocation, and priority.

use crate::report::DesignReport;

/// Format a count with thousands separators (12345 -> "12,345")
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Generate a Markdown design document
pub fn generate_markdown_report(report: &DesignReport) -> String {
    let mut out = String::new();
    let plan = &report.plan;

    out.push_str(&format!("# Experiment: {}\n\n", plan.name));
    out.push_str(&format!(
        "_Generated {} by ablab {}_\n\n",
        report.meta.generated_at.format("%Y-%m-%d %H:%M UTC"),
        report.meta.version
    ));

    if plan.owner.is_some() || !plan.stakeholders.is_empty() {
        out.push_str("## Experiment Team\n\n");
        if let Some(owner) = &plan.owner {
            out.push_str(&format!("- **Owner:** {}\n", owner));
        }
        if !plan.stakeholders.is_empty() {
            out.push_str(&format!(
                "- **Stakeholders:** {}\n",
                plan.stakeholders.join(", ")
            ));
        }
        out.push('\n');
    }

    out.push_str("## Configuration\n\n");
    out.push_str("| | |\n|---|---|\n");
    for (key, value) in report.key_values() {
        out.push_str(&format!("| **{}** | {} |\n", key, value));
    }
    out.push('\n');

    if let (Some(days), Some(rate)) = (report.estimated_runtime_days, report.daily_rate) {
        out.push_str("## Traffic Allocation\n\n");
        out.push_str("| Group | Daily Users | Users Needed | Days |\n");
        out.push_str("|---|---|---|---|\n");
        let per_group_daily = rate / 2.0;
        out.push_str(&format!(
            "| Control | {:.0} | {} | {} |\n",
            per_group_daily,
            format_count(report.sample_size_per_group),
            days
        ));
        out.push_str(&format!(
            "| Treatment | {:.0} | {} | {} |\n",
            per_group_daily,
            format_count(report.sample_size_per_group),
            days
        ));
        out.push_str(&format!(
            "| Total | {:.0} | {} | {} |\n\n",
            rate,
            format_count(report.total_sample_size),
            days
        ));
    }

    if let Some(warning) = &report.warning {
        out.push_str(&format!("> **Warning:** {}\n\n", warning));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{Audience, CampaignInfo, ExperimentPlan, PlannedMetric, PlannedTest};
    use crate::report::ReportMeta;

    fn sample_report() -> DesignReport {
        DesignReport {
            meta: ReportMeta::now(),
            plan: ExperimentPlan {
                name: "Dynamic CTA text".to_string(),
                feature: "New CTA copy".to_string(),
                hypothesis: "Lift of 1.2 points".to_string(),
                owner: Some("growth".to_string()),
                stakeholders: vec!["pm".to_string()],
                primary_metric: "App Rate".to_string(),
                secondary_metrics: vec![],
                metric: PlannedMetric::Rate { baseline: 0.75 },
                test: PlannedTest::Superiority {
                    expected_lift: 0.012,
                },
                alpha: 0.05,
                power: 0.80,
                traffic: None,
                campaign: CampaignInfo::default(),
                audience: Audience::default(),
                priority: None,
                business_goal: None,
            },
            sample_size_per_group: 20108,
            total_sample_size: 40216,
            daily_rate: Some(12_000.0),
            estimated_runtime_days: Some(4),
            warning: None,
        }
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(20_108), "20,108");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_markdown_contains_sections() {
        let md = generate_markdown_report(&sample_report());
        assert!(md.contains("# Experiment: Dynamic CTA text"));
        assert!(md.contains("## Experiment Team"));
        assert!(md.contains("## Configuration"));
        assert!(md.contains("## Traffic Allocation"));
        assert!(md.contains("20,108"));
        assert!(md.contains("| Control | 6000 |"));
    }

    #[test]
    fn test_markdown_skips_traffic_without_rate() {
        let mut report = sample_report();
        report.daily_rate = None;
        report.estimated_runtime_days = None;
        let md = generate_markdown_report(&report);
        assert!(!md.contains("## Traffic Allocation"));
    }

    #[test]
    fn test_markdown_surfaces_warning() {
        let mut report = sample_report();
        report.warning = Some("sample size is enormous".to_string());
        let md = generate_markdown_report(&report);
        assert!(md.contains("> **Warning:** sample size is enormous"));
    }
}
