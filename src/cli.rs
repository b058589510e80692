//! CLI argument parsing for bwpairs

use crate::config::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the merged report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// CSV export (default)
    Csv,
    /// JSON format for machine parsing
    Json,
    /// Aligned table for terminals
    Text,
}

#[derive(Parser, Debug)]
#[command(name = "bwpairs")]
#[command(version)]
#[command(about = "Attribute per-flow bandwidth exports to service-to-service pairs", long_about = None)]
pub struct Cli {
    /// Bandwidth export files (CSV with Direction and Bandwidth(Kbps) columns)
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Management host address; its report gets the vc_others bucket
    #[arg(long = "vxm-ip", value_name = "IP")]
    pub vxm_ip: Option<String>,

    /// VC-role host address; used for column suppression
    #[arg(long = "vc-ip", value_name = "IP")]
    pub vc_ip: Option<String>,

    /// TOML batch configuration (flags override its values)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "csv")]
    pub format: OutputFormat,

    /// Write the report to FILE instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Process files on N worker threads
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,

    /// Marker for pairs a file never observed (default: N/A)
    #[arg(long = "na-marker", value_name = "TEXT")]
    pub na_marker: Option<String>,

    /// Unit suffix for bandwidth cells (default: Kbps)
    #[arg(long = "unit", value_name = "TEXT")]
    pub unit: Option<String>,

    /// Enable debug tracing on stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Layer command-line values over `config`
    pub fn apply_to(&self, mut config: BatchConfig) -> BatchConfig {
        if let Some(ip) = &self.vxm_ip {
            config.vxm_ip = Some(ip.clone());
        }
        if let Some(ip) = &self.vc_ip {
            config.vc_ip = Some(ip.clone());
        }
        if let Some(jobs) = self.jobs {
            config.jobs = jobs;
        }
        if let Some(marker) = &self.na_marker {
            config.na_marker = marker.clone();
        }
        if let Some(unit) = &self.unit {
            config.unit_suffix = unit.clone();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_files_and_ips() {
        let cli = Cli::parse_from([
            "bwpairs", "--vxm-ip", "10.0.0.5", "--vc-ip", "10.0.0.6", "a.csv", "b.csv",
        ]);
        assert_eq!(cli.files.len(), 2);
        assert_eq!(cli.vxm_ip.as_deref(), Some("10.0.0.5"));
        assert_eq!(cli.vc_ip.as_deref(), Some("10.0.0.6"));
    }

    #[test]
    fn test_cli_requires_files() {
        assert!(Cli::try_parse_from(["bwpairs", "--vxm-ip", "1.1.1.1"]).is_err());
    }

    #[test]
    fn test_cli_format_default_csv() {
        let cli = Cli::parse_from(["bwpairs", "a.csv"]);
        assert_eq!(cli.format, OutputFormat::Csv);
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_format_json() {
        let cli = Cli::parse_from(["bwpairs", "--format", "json", "a.csv"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from(["bwpairs", "--vc-ip", "9.9.9.9", "-j", "4", "--unit", "kb/s", "a.csv"]);
        let config = cli.apply_to(BatchConfig {
            vxm_ip: Some("1.1.1.1".to_string()),
            vc_ip: Some("2.2.2.2".to_string()),
            ..BatchConfig::default()
        });
        assert_eq!(config.vxm_ip.as_deref(), Some("1.1.1.1"));
        assert_eq!(config.vc_ip.as_deref(), Some("9.9.9.9"));
        assert_eq!(config.jobs, 4);
        assert_eq!(config.unit_suffix, "kb/s");
        assert_eq!(config.na_marker, "N/A");
    }
}
