#![warn(missing_docs)]
//! ablab Report - experiment plans and design documents
//!
//! Holds the serializable experiment plan, the assembled design report,
//! and the renderers that turn a report into an output document:
//! - JSON (machine-readable)
//! - Markdown (static design document)
//! - a flat key/value view for terminal display

mod json;
mod markdown;
mod plan;
mod report;

pub use json::generate_json_report;
pub use markdown::{format_count, generate_markdown_report};
pub use plan::{
    Audience, CampaignInfo, ExperimentPlan, PlannedMetric, PlannedTest, Priority, TrafficSpec,
};
pub use report::{DesignReport, ReportMeta};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON with the full report structure
    Json,
    /// Markdown design document
    Markdown,
    /// Human-readable terminal output
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parses() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Human);
        assert!("pdf".parse::<OutputFormat>().is_err());
    }
}
