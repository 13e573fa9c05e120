use crate::allocator::ExhaustionPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Run configuration. Every section is optional in the YAML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub allocation: AllocationConfig,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.input.requests.as_os_str().is_empty() {
            return Err(ValidationError::InvalidInput(
                "requests path cannot be empty".to_string()
            ));
        }
        if self.input.vlans.as_os_str().is_empty() {
            return Err(ValidationError::InvalidInput(
                "vlans path cannot be empty".to_string()
            ));
        }
        if self.input.requests == self.input.vlans {
            return Err(ValidationError::InvalidInput(format!(
                "requests and vlans point at the same file '{}'",
                self.input.requests.display()
            )));
        }

        if self.output.results.as_os_str().is_empty() {
            return Err(ValidationError::InvalidOutput(
                "results path cannot be empty".to_string()
            ));
        }
        if let Some(report) = &self.output.report {
            if report.as_os_str().is_empty() {
                return Err(ValidationError::InvalidOutput(
                    "report path cannot be empty when given".to_string()
                ));
            }
            if *report == self.output.results {
                return Err(ValidationError::InvalidOutput(format!(
                    "report and results cannot share the path '{}'",
                    report.display()
                )));
            }
        }

        // Never overwrite an input with results
        for input in [&self.input.requests, &self.input.vlans] {
            if *input == self.output.results {
                return Err(ValidationError::InvalidOutput(format!(
                    "results path '{}' is also an input file",
                    input.display()
                )));
            }
        }

        Ok(())
    }
}

/// Input file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub requests: PathBuf,
    pub vlans: PathBuf,
}

/// Output file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub results: PathBuf,
    /// JSON run report, written only when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    pub on_exhausted: ExhaustionPolicy,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid input configuration: {0}")]
    InvalidInput(String),
    #[error("Invalid output configuration: {0}")]
    InvalidOutput(String),
}

/// Default implementations
impl Default for InputConfig {
    fn default() -> Self {
        Self {
            requests: PathBuf::from("requests.csv"),
            vlans: PathBuf::from("vlans.csv"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results: PathBuf::from("output.csv"),
            report: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.allocation.on_exhausted, ExhaustionPolicy::Abort);
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
allocation:
  on_exhausted: skip
output:
  report: "run.json"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.allocation.on_exhausted, ExhaustionPolicy::Skip);
        assert_eq!(config.output.results, PathBuf::from("output.csv"));
        assert_eq!(config.output.report, Some(PathBuf::from("run.json")));
        assert_eq!(config.input.vlans, PathBuf::from("vlans.csv"));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let yaml = "allocation:\n  on_exhausted: retry\n";
        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_report_cannot_replace_results() {
        let mut config = Config::default();
        config.output.report = Some(PathBuf::from("output.csv"));
        assert!(matches!(config.validate(), Err(ValidationError::InvalidOutput(_))));
    }

    #[test]
    fn test_results_cannot_overwrite_input() {
        let mut config = Config::default();
        config.output.results = PathBuf::from("vlans.csv");
        assert!(matches!(config.validate(), Err(ValidationError::InvalidOutput(_))));
    }

    #[test]
    fn test_empty_requests_path() {
        let mut config = Config::default();
        config.input.requests = PathBuf::new();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidInput(_))));
    }
}
