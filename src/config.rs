//! Batch configuration
//!
//! Host identities and report options, loaded from a TOML file and/or CLI
//! flags. The identities are plain strings: they are only ever matched
//! against file names, never parsed as addresses.
//!
//! # Example TOML
//! ```toml
//! vxm_ip = "10.0.0.5"
//! vc_ip = "10.0.0.6"
//! na_marker = "N/A"
//! unit_suffix = "Kbps"
//! jobs = 4
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Rejected batch preconditions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required (management host and VC host addresses must both be supplied)")]
    MissingIdentity(&'static str),

    #[error("na_marker must not be empty")]
    EmptyMarker,

    #[error("jobs must be >= 1, got {0}")]
    InvalidJobs(usize),
}

/// The two host addresses a batch is evaluated against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    /// Management host (its self-report gets the residual bucket)
    pub vxm_ip: String,
    /// VC-role host (drives column suppression)
    pub vc_ip: String,
}

impl HostIdentity {
    /// Build an identity, rejecting empty addresses
    pub fn new(vxm_ip: impl Into<String>, vc_ip: impl Into<String>) -> Result<Self, ConfigError> {
        let vxm_ip = vxm_ip.into();
        let vc_ip = vc_ip.into();
        if vxm_ip.trim().is_empty() {
            return Err(ConfigError::MissingIdentity("vxm_ip"));
        }
        if vc_ip.trim().is_empty() {
            return Err(ConfigError::MissingIdentity("vc_ip"));
        }
        Ok(Self { vxm_ip, vc_ip })
    }

    /// File names carry addresses with dots replaced by underscores
    fn file_form(ip: &str) -> String {
        ip.replace('.', "_")
    }

    /// Whether `file_name` is the management host's own report
    pub fn is_management_file(&self, file_name: &str) -> bool {
        file_name.contains(&Self::file_form(&self.vxm_ip))
    }

    /// Whether `file_name` is the VC-role host's report
    ///
    /// Accepts the address verbatim or in its underscore form.
    pub fn is_vc_file(&self, file_name: &str) -> bool {
        file_name.starts_with(&self.vc_ip) || file_name.starts_with(&Self::file_form(&self.vc_ip))
    }
}

/// Everything a batch run needs besides the input files
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub vxm_ip: Option<String>,
    pub vc_ip: Option<String>,

    /// Rendered in place of a pair a file never observed
    #[serde(default = "default_na_marker")]
    pub na_marker: String,

    /// Unit appended to every bandwidth cell
    #[serde(default = "default_unit_suffix")]
    pub unit_suffix: String,

    /// Worker threads for per-file processing
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

fn default_na_marker() -> String {
    "N/A".to_string()
}

fn default_unit_suffix() -> String {
    "Kbps".to_string()
}

fn default_jobs() -> usize {
    1
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            vxm_ip: None,
            vc_ip: None,
            na_marker: default_na_marker(),
            unit_suffix: default_unit_suffix(),
            jobs: default_jobs(),
        }
    }
}

impl BatchConfig {
    /// Load configuration from a TOML file
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML batch configuration")
    }

    /// Host identities, or the first missing one
    pub fn identity(&self) -> Result<HostIdentity, ConfigError> {
        HostIdentity::new(
            self.vxm_ip.clone().unwrap_or_default(),
            self.vc_ip.clone().unwrap_or_default(),
        )
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<HostIdentity, ConfigError> {
        if self.na_marker.is_empty() {
            return Err(ConfigError::EmptyMarker);
        }
        if self.jobs < 1 {
            return Err(ConfigError::InvalidJobs(self.jobs));
        }
        self.identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn identity() -> HostIdentity {
        HostIdentity::new("10.0.0.5", "10.0.0.6").unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = BatchConfig::default();
        assert_eq!(config.na_marker, "N/A");
        assert_eq!(config.unit_suffix, "Kbps");
        assert_eq!(config.jobs, 1);
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingIdentity("vxm_ip"))
        );
    }

    #[test]
    fn test_missing_vc_ip() {
        let err = HostIdentity::new("10.0.0.5", "  ").unwrap_err();
        assert_eq!(err, ConfigError::MissingIdentity("vc_ip"));
    }

    #[test]
    fn test_management_file_uses_underscore_form() {
        let id = identity();
        assert!(id.is_management_file("esx_10_0_0_5_bandwidth.csv"));
        assert!(!id.is_management_file("10.0.0.5.csv"));
    }

    #[test]
    fn test_vc_file_is_a_prefix_match() {
        let id = identity();
        assert!(id.is_vc_file("10.0.0.6-flows.csv"));
        assert!(id.is_vc_file("10_0_0_6_flows.csv"));
        assert!(!id.is_vc_file("host_10_0_0_6.csv"));
    }

    #[test]
    fn test_parse_toml() {
        let config = BatchConfig::from_toml_str(
            r#"
            vxm_ip = "192.168.1.10"
            vc_ip = "192.168.1.11"
            jobs = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.jobs, 3);
        assert_eq!(config.na_marker, "N/A");
        let id = config.validate().unwrap();
        assert_eq!(id.vxm_ip, "192.168.1.10");
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "vxm_ip = \"1.1.1.1\"\nvc_ip = \"2.2.2.2\"\nunit_suffix = \"kb/s\"").unwrap();
        let config = BatchConfig::from_toml(file.path()).unwrap();
        assert_eq!(config.unit_suffix, "kb/s");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(BatchConfig::from_toml_str("jobs = \"many\"").is_err());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_jobs() {
        let mut config = BatchConfig::default();
        config.vxm_ip = Some("1.1.1.1".into());
        config.vc_ip = Some("2.2.2.2".into());
        config.jobs = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidJobs(0)));
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_empty_marker() {
        let mut config = BatchConfig::default();
        config.na_marker = String::new();
        assert_eq!(config.validate(), Err(ConfigError::EmptyMarker));
    }
}
