//! Configuration loading from ablab.toml
//!
//! Defaults can be specified in an `ablab.toml` file in the project root.
//! The file is discovered by walking up from the current directory; CLI
//! flags override anything it sets.

use ablab_stats::{DEFAULT_ALPHA, DEFAULT_POWER, TrafficPeriod};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// ablab configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AbConfig {
    /// Design defaults (alpha, power)
    #[serde(default)]
    pub design: DesignDefaults,
    /// Traffic defaults for runtime estimation
    #[serde(default)]
    pub traffic: TrafficDefaults,
    /// Output configuration
    #[serde(default)]
    pub output: OutputDefaults,
}

/// Default significance and power applied when flags are absent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignDefaults {
    /// Significance level
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Statistical power
    #[serde(default = "default_power")]
    pub power: f64,
}

impl Default for DesignDefaults {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            power: default_power(),
        }
    }
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

fn default_power() -> f64 {
    DEFAULT_POWER
}

/// Default traffic expectation for runtime estimation
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrafficDefaults {
    /// Period traffic volumes refer to
    #[serde(default)]
    pub period: TrafficPeriod,
    /// Volume of users over the period
    #[serde(default)]
    pub volume: Option<f64>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputDefaults {
    /// Default output format: "human", "markdown", or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputDefaults {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl AbConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from the
    /// current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("ablab.toml");
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as a TOML string
    pub fn default_toml() -> String {
        r#"# ablab Configuration

[design]
# Significance level (Type I error rate)
alpha = 0.05
# Statistical power (1 - Type II error rate)
power = 0.80

[traffic]
# Period traffic volumes refer to: "daily", "weekly", or "monthly"
period = "daily"
# Users entering the experiment per period (uncomment to enable)
# volume = 12000

[output]
# Default output format: human, markdown, json
format = "human"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AbConfig::default();
        assert!((config.design.alpha - 0.05).abs() < f64::EPSILON);
        assert!((config.design.power - 0.80).abs() < f64::EPSILON);
        assert_eq!(config.traffic.period, TrafficPeriod::Daily);
        assert!(config.traffic.volume.is_none());
        assert_eq!(config.output.format, "human");
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [design]
            alpha = 0.01

            [traffic]
            period = "weekly"
            volume = 84000
        "#;

        let config: AbConfig = toml::from_str(toml_str).unwrap();
        assert!((config.design.alpha - 0.01).abs() < f64::EPSILON);
        // Defaults still apply for unset keys
        assert!((config.design.power - 0.80).abs() < f64::EPSILON);
        assert_eq!(config.traffic.period, TrafficPeriod::Weekly);
        assert_eq!(config.traffic.volume, Some(84_000.0));
        assert_eq!(config.output.format, "human");
    }

    #[test]
    fn test_default_toml_parses() {
        let config: AbConfig = toml::from_str(&AbConfig::default_toml()).unwrap();
        assert!((config.design.power - 0.80).abs() < f64::EPSILON);
    }
}
