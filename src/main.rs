use clap::Parser;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use vlan_router::allocator::ExhaustionPolicy;
use vlan_router::config_loader::{self, CliOverrides};
use vlan_router::orchestrator;

/// Assign VLANs on device ports to normal and redundant requests
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Request file (request_id,redundant) [default: requests.csv]
    requests: Option<PathBuf>,

    /// VLAN inventory file (device_id,primary_port,vlan_id) [default: vlans.csv]
    vlans: Option<PathBuf>,

    /// Result file [default: output.csv]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// YAML run configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// What to do when a request cannot be satisfied [default: abort]
    #[arg(long, value_enum)]
    on_exhausted: Option<ExhaustionPolicy>,

    /// Also write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            requests: self.requests.clone(),
            vlans: self.vlans.clone(),
            results: self.output.clone(),
            report: self.report.clone(),
            on_exhausted: self.on_exhausted,
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    let config = config_loader::resolve_config(args.config.as_deref(), &args.overrides())?;
    info!("Requests: {:?}", config.input.requests);
    info!("VLAN inventory: {:?}", config.input.vlans);
    info!("Results: {:?}", config.output.results);

    orchestrator::run(&config)?;

    info!("Routing completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let args = Args::parse_from(["vlan-router"]);

        assert_eq!(args.requests, None);
        assert_eq!(args.vlans, None);
        assert_eq!(args.log_level, "info");
        assert!(args.on_exhausted.is_none());
    }

    #[test]
    fn test_positional_inputs() {
        let args = Args::parse_from(["vlan-router", "test_requests.csv", "test_vlans.csv"]);

        assert_eq!(args.requests, Some(PathBuf::from("test_requests.csv")));
        assert_eq!(args.vlans, Some(PathBuf::from("test_vlans.csv")));
    }

    #[test]
    fn test_policy_and_output_args() {
        let args = Args::parse_from([
            "vlan-router",
            "--on-exhausted", "skip",
            "--output", "out.csv",
            "--report", "run.json",
        ]);

        let overrides = args.overrides();
        assert_eq!(overrides.on_exhausted, Some(ExhaustionPolicy::Skip));
        assert_eq!(overrides.results, Some(PathBuf::from("out.csv")));
        assert_eq!(overrides.report, Some(PathBuf::from("run.json")));
    }

    #[test]
    fn test_invalid_policy_rejected() {
        assert!(Args::try_parse_from(["vlan-router", "--on-exhausted", "retry"]).is_err());
    }
}
