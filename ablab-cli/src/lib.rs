#![warn(missing_docs)]
//! ablab CLI Library
//!
//! Command-line surface over the ablab calculation core: quick
//! sample-size calculations, post-hoc analysis of completed experiments,
//! and full design-document generation from a plan file.

mod config;
mod designer;
mod formatting;

pub use config::*;
pub use designer::build_design_report;
pub use formatting::{
    RuntimeEstimate, format_analysis_output, format_design_output, format_sample_size_output,
};

use ablab_report::{
    ExperimentPlan, OutputFormat, generate_json_report, generate_markdown_report,
};
use ablab_stats::{
    AnalysisConfig, DesignParams, ExperimentData, GroupCounts, GroupSummary, SampleSize, TestKind,
    TrafficPeriod, continuous_sample_size, estimate_runtime, non_inferiority_sample_size,
    proportions_sample_size,
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// ablab CLI arguments
#[derive(Parser, Debug)]
#[command(name = "ablab")]
#[command(author, version, about = "ablab - A/B experiment design and analysis")]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: human, markdown, json
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute required per-group sample size
    SampleSize {
        /// Which design formula to run
        #[command(subcommand)]
        test: SampleSizeCommand,
    },
    /// Evaluate completed experiment results
    Analyze {
        /// Which metric branch to evaluate
        #[command(subcommand)]
        metric: AnalyzeCommand,
    },
    /// Render a full experiment design document from a plan file
    Design {
        /// Path to the experiment plan TOML
        plan: PathBuf,
    },
    /// Print a starter ablab.toml
    InitConfig,
}

/// Shared design flags (alpha/power fall back to ablab.toml, then to the
/// built-in defaults)
#[derive(Args, Debug)]
pub struct DesignFlags {
    /// Significance level
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Statistical power
    #[arg(long)]
    pub power: Option<f64>,

    /// Traffic volume for runtime estimation
    #[arg(long)]
    pub traffic: Option<f64>,

    /// Period the traffic volume refers to: daily, weekly, monthly
    #[arg(long)]
    pub period: Option<String>,
}

/// Sample-size subcommands
#[derive(Subcommand, Debug)]
pub enum SampleSizeCommand {
    /// Two-proportion z-test design
    Proportions {
        /// Baseline conversion rate, e.g. 0.75
        #[arg(long)]
        baseline: f64,

        /// Expected absolute lift, e.g. 0.012
        #[arg(long)]
        lift: f64,

        #[command(flatten)]
        flags: DesignFlags,
    },
    /// Continuous-metric design (normal approximation)
    Continuous {
        /// Baseline mean of the metric
        #[arg(long)]
        baseline: f64,

        /// Expected absolute lift in metric units
        #[arg(long)]
        lift: f64,

        /// Standard deviation of the metric
        #[arg(long)]
        std_dev: f64,

        #[command(flatten)]
        flags: DesignFlags,
    },
    /// One-sided non-inferiority design for rates
    NonInferiority {
        /// Baseline conversion rate, e.g. 0.75
        #[arg(long)]
        baseline: f64,

        /// Largest acceptable absolute decrease, e.g. 0.01
        #[arg(long)]
        margin: f64,

        #[command(flatten)]
        flags: DesignFlags,
    },
}

/// Analysis subcommands
#[derive(Subcommand, Debug)]
pub enum AnalyzeCommand {
    /// Binary-outcome groups (successes out of sample size)
    Rates {
        /// Control group size
        #[arg(long)]
        control_n: u64,

        /// Control group successes
        #[arg(long)]
        control_successes: u64,

        /// Treatment group size
        #[arg(long)]
        treatment_n: u64,

        /// Treatment group successes
        #[arg(long)]
        treatment_successes: u64,

        #[command(flatten)]
        flags: AnalyzeFlags,
    },
    /// Continuous-outcome groups (mean and std-dev per group)
    Means {
        /// Control group size
        #[arg(long)]
        control_n: u64,

        /// Control group mean
        #[arg(long)]
        control_mean: f64,

        /// Control group standard deviation
        #[arg(long)]
        control_std: f64,

        /// Treatment group size
        #[arg(long)]
        treatment_n: u64,

        /// Treatment group mean
        #[arg(long)]
        treatment_mean: f64,

        /// Treatment group standard deviation
        #[arg(long)]
        treatment_std: f64,

        #[command(flatten)]
        flags: AnalyzeFlags,
    },
}

/// Shared analysis flags
#[derive(Args, Debug)]
pub struct AnalyzeFlags {
    /// Significance level
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Minimum detectable effect (selects a superiority test)
    #[arg(long, conflicts_with = "margin")]
    pub mde: Option<f64>,

    /// Non-inferiority margin (selects a one-sided non-inferiority test)
    #[arg(long)]
    pub margin: Option<f64>,
}

/// Run the ablab CLI. This is the main entry point for the binary.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the ablab CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("ablab=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("ablab=info")
            .init();
    }

    let config = AbConfig::discover().unwrap_or_default();

    // CLI flag wins, then ablab.toml, then human
    let format: OutputFormat = cli
        .format
        .as_deref()
        .unwrap_or(&config.output.format)
        .parse()
        .unwrap_or(OutputFormat::Human);

    let output = match &cli.command {
        Commands::SampleSize { test } => run_sample_size(test, &config, format)?,
        Commands::Analyze { metric } => run_analyze(metric, &config, format)?,
        Commands::Design { plan } => run_design(plan, format)?,
        Commands::InitConfig => AbConfig::default_toml(),
    };

    write_output(cli.output.as_deref(), &output)
}

/// Machine-readable sample-size outcome
#[derive(Debug, Serialize)]
struct SampleSizeOutcome<'a> {
    test: &'a str,
    per_group: u64,
    total: u64,
    daily_rate: Option<f64>,
    estimated_runtime_days: Option<u64>,
    warning: &'a Option<String>,
}

fn run_sample_size(
    command: &SampleSizeCommand,
    config: &AbConfig,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let (label, sample, flags): (&str, SampleSize, &DesignFlags) = match command {
        SampleSizeCommand::Proportions {
            baseline,
            lift,
            flags,
        } => {
            let params = design_params(flags, config);
            (
                "Two-Proportion Z-Test",
                proportions_sample_size(*baseline, baseline + lift, &params)?,
                flags,
            )
        }
        SampleSizeCommand::Continuous {
            baseline,
            lift,
            std_dev,
            flags,
        } => {
            let params = design_params(flags, config);
            (
                "Continuous Metric T-Test",
                continuous_sample_size(*baseline, baseline + lift, *std_dev, &params)?,
                flags,
            )
        }
        SampleSizeCommand::NonInferiority {
            baseline,
            margin,
            flags,
        } => {
            let params = design_params(flags, config);
            (
                "Non-Inferiority Test",
                non_inferiority_sample_size(*baseline, *margin, &params)?,
                flags,
            )
        }
    };

    // The runtime estimate is only reached once the sample size computed
    // cleanly; failures above withhold it entirely.
    let runtime = resolve_daily_rate(flags, config)?.map(|daily_rate| RuntimeEstimate {
        daily_rate,
        days: estimate_runtime(sample.total(), daily_rate),
    });

    match format {
        OutputFormat::Json => {
            let outcome = SampleSizeOutcome {
                test: label,
                per_group: sample.per_group,
                total: sample.total(),
                daily_rate: runtime.map(|r| r.daily_rate),
                estimated_runtime_days: runtime.map(|r| r.days),
                warning: &sample.warning,
            };
            Ok(serde_json::to_string_pretty(&outcome)?)
        }
        _ => Ok(format_sample_size_output(label, &sample, runtime)),
    }
}

fn run_analyze(
    command: &AnalyzeCommand,
    config: &AbConfig,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let (data, flags) = match command {
        AnalyzeCommand::Rates {
            control_n,
            control_successes,
            treatment_n,
            treatment_successes,
            flags,
        } => (
            ExperimentData::Rates {
                control: GroupCounts {
                    sample_size: *control_n,
                    successes: *control_successes,
                },
                treatment: GroupCounts {
                    sample_size: *treatment_n,
                    successes: *treatment_successes,
                },
            },
            flags,
        ),
        AnalyzeCommand::Means {
            control_n,
            control_mean,
            control_std,
            treatment_n,
            treatment_mean,
            treatment_std,
            flags,
        } => (
            ExperimentData::Means {
                control: GroupSummary {
                    sample_size: *control_n,
                    mean: *control_mean,
                    std_dev: *control_std,
                },
                treatment: GroupSummary {
                    sample_size: *treatment_n,
                    mean: *treatment_mean,
                    std_dev: *treatment_std,
                },
            },
            flags,
        ),
    };

    let test = match (flags.mde, flags.margin) {
        (Some(mde), None) => TestKind::Superiority { mde },
        (None, Some(margin)) => TestKind::NonInferiority { margin },
        (None, None) => {
            anyhow::bail!("pass --mde for a superiority test or --margin for a non-inferiority test")
        }
        (Some(_), Some(_)) => anyhow::bail!("--mde and --margin are mutually exclusive"),
    };
    let analysis_config = AnalysisConfig {
        alpha: flags.alpha.unwrap_or(config.design.alpha),
        test,
    };

    let result = ablab_stats::analyze(&data, &analysis_config)?;

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&result)?),
        _ => Ok(format_analysis_output(&result, &analysis_config)),
    }
}

fn run_design(plan_path: &std::path::Path, format: OutputFormat) -> anyhow::Result<String> {
    let content = std::fs::read_to_string(plan_path)
        .map_err(|e| anyhow::anyhow!("failed to read plan {}: {}", plan_path.display(), e))?;
    let plan: ExperimentPlan = toml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("invalid plan {}: {}", plan_path.display(), e))?;

    tracing::debug!(name = %plan.name, "plan loaded");
    let report = build_design_report(&plan)?;

    match format {
        OutputFormat::Json => Ok(generate_json_report(&report)?),
        OutputFormat::Markdown => Ok(generate_markdown_report(&report)),
        OutputFormat::Human => Ok(format_design_output(&report)),
    }
}

/// Layer alpha/power: CLI flag wins, then ablab.toml, then defaults.
fn design_params(flags: &DesignFlags, config: &AbConfig) -> DesignParams {
    DesignParams {
        alpha: flags.alpha.unwrap_or(config.design.alpha),
        power: flags.power.unwrap_or(config.design.power),
    }
}

/// Resolve the daily traffic rate from flags or config, if declared.
fn resolve_daily_rate(flags: &DesignFlags, config: &AbConfig) -> anyhow::Result<Option<f64>> {
    let period = match &flags.period {
        Some(s) => s
            .parse::<TrafficPeriod>()
            .map_err(|e| anyhow::anyhow!(e))?,
        None => config.traffic.period,
    };
    Ok(flags
        .traffic
        .or(config.traffic.volume)
        .map(|volume| period.daily_rate(volume)))
}

fn write_output(path: Option<&std::path::Path>, output: &str) -> anyhow::Result<()> {
    if let Some(path) = path {
        let mut file = std::fs::File::create(path)?;
        file.write_all(output.as_bytes())?;
        println!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_sample_size() {
        let cli = Cli::parse_from([
            "ablab",
            "sample-size",
            "proportions",
            "--baseline",
            "0.75",
            "--lift",
            "0.012",
            "--traffic",
            "12000",
        ]);
        match cli.command {
            Commands::SampleSize {
                test:
                    SampleSizeCommand::Proportions {
                        baseline,
                        lift,
                        flags,
                    },
            } => {
                assert!((baseline - 0.75).abs() < f64::EPSILON);
                assert!((lift - 0.012).abs() < f64::EPSILON);
                assert_eq!(flags.traffic, Some(12_000.0));
                assert!(flags.alpha.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_mde_with_margin() {
        let result = Cli::try_parse_from([
            "ablab",
            "analyze",
            "rates",
            "--control-n",
            "1000",
            "--control-successes",
            "100",
            "--treatment-n",
            "1000",
            "--treatment-successes",
            "110",
            "--mde",
            "0.05",
            "--margin",
            "0.03",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_sample_size_human_output() {
        let cmd = SampleSizeCommand::Proportions {
            baseline: 0.75,
            lift: 0.012,
            flags: DesignFlags {
                alpha: None,
                power: None,
                traffic: Some(12_000.0),
                period: None,
            },
        };
        let text = run_sample_size(&cmd, &AbConfig::default(), OutputFormat::Human).unwrap();
        assert!(text.contains("20,108 users"));
        assert!(text.contains("4 days"));
    }

    #[test]
    fn test_run_sample_size_json_output() {
        let cmd = SampleSizeCommand::NonInferiority {
            baseline: 0.75,
            margin: 0.01,
            flags: DesignFlags {
                alpha: None,
                power: None,
                traffic: None,
                period: None,
            },
        };
        let json = run_sample_size(&cmd, &AbConfig::default(), OutputFormat::Json).unwrap();
        assert!(json.contains("\"per_group\": 23490"));
        assert!(json.contains("\"estimated_runtime_days\": null"));
    }

    #[test]
    fn test_run_sample_size_invalid_input_fails() {
        let cmd = SampleSizeCommand::Proportions {
            baseline: 0.5,
            lift: 0.0,
            flags: DesignFlags {
                alpha: None,
                power: None,
                traffic: Some(12_000.0),
                period: None,
            },
        };
        // Equal rates fail before any runtime estimation happens
        assert!(run_sample_size(&cmd, &AbConfig::default(), OutputFormat::Human).is_err());
    }

    #[test]
    fn test_run_analyze_requires_threshold() {
        let cmd = AnalyzeCommand::Rates {
            control_n: 1000,
            control_successes: 100,
            treatment_n: 1000,
            treatment_successes: 110,
            flags: AnalyzeFlags {
                alpha: None,
                mde: None,
                margin: None,
            },
        };
        assert!(run_analyze(&cmd, &AbConfig::default(), OutputFormat::Human).is_err());
    }

    #[test]
    fn test_run_analyze_rates() {
        let cmd = AnalyzeCommand::Rates {
            control_n: 1000,
            control_successes: 100,
            treatment_n: 1000,
            treatment_successes: 110,
            flags: AnalyzeFlags {
                alpha: None,
                mde: Some(0.05),
                margin: None,
            },
        };
        let text = run_analyze(&cmd, &AbConfig::default(), OutputFormat::Human).unwrap();
        assert!(text.contains("not significant"));
        assert!(text.contains("DON'T IMPLEMENT"));
    }

    #[test]
    fn test_config_traffic_feeds_runtime() {
        let config: AbConfig = toml::from_str(
            r#"
            [traffic]
            period = "weekly"
            volume = 84000
            "#,
        )
        .unwrap();
        let cmd = SampleSizeCommand::Proportions {
            baseline: 0.75,
            lift: 0.012,
            flags: DesignFlags {
                alpha: None,
                power: None,
                traffic: None,
                period: None,
            },
        };
        let text = run_sample_size(&cmd, &config, OutputFormat::Human).unwrap();
        // 84,000/week normalizes to 12,000/day
        assert!(text.contains("12000 users/day"));
    }
}
