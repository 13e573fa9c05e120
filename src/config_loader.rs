use crate::allocator::ExhaustionPolicy;
use crate::config::Config;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Load and parse a run configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration '{}'", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration '{}'", config_path.display()))?;

    config.validate()?;

    Ok(config)
}

/// CLI arguments that override configuration file settings
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub requests: Option<PathBuf>,
    pub vlans: Option<PathBuf>,
    pub results: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub on_exhausted: Option<ExhaustionPolicy>,
}

/// Apply CLI overrides to a configuration
pub fn apply_cli_overrides(config: &mut Config, overrides: &CliOverrides) -> Result<()> {
    if let Some(requests) = &overrides.requests {
        config.input.requests = requests.clone();
    }
    if let Some(vlans) = &overrides.vlans {
        config.input.vlans = vlans.clone();
    }
    if let Some(results) = &overrides.results {
        config.output.results = results.clone();
    }
    if let Some(report) = &overrides.report {
        config.output.report = Some(report.clone());
    }
    if let Some(policy) = overrides.on_exhausted {
        info!("Exhaustion policy overridden on the command line: {}", policy);
        config.allocation.on_exhausted = policy;
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}

/// Resolve the effective configuration: defaults, then file, then CLI
pub fn resolve_config(config_path: Option<&Path>, overrides: &CliOverrides) -> Result<Config> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    apply_cli_overrides(&mut config, overrides)?;
    Ok(config)
}
