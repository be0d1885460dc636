//! Run configuration — YAML file format, defaults, and validation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::error::ConfigError;
use crate::domain::health::Expectation;

/// Default terraform output that carries the deployed endpoint URL.
pub const DEFAULT_OUTPUT_KEY: &str = "healthcheck_url";

/// Retry policy for the health probe: fixed delay, bounded attempts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryPolicy {
    /// Maximum number of GET attempts.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Seconds to wait between attempts.
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
}

fn default_max_attempts() -> u32 {
    60
}

fn default_delay_secs() -> u64 {
    10
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_secs: default_delay_secs(),
        }
    }
}

impl RetryPolicy {
    /// Inter-attempt delay as a [`Duration`].
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

/// Smoke run descriptor, loadable from a YAML file.
///
/// Everything except `dir` has a default, so a minimal file is just
/// `dir: envs/production`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmokeConfig {
    /// Terraform configuration directory.
    pub dir: PathBuf,
    /// Terraform binary name or path.
    #[serde(default = "default_terraform_bin")]
    pub terraform_bin: String,
    /// Output key holding the health endpoint URL.
    #[serde(default = "default_output_key")]
    pub output_key: String,
    /// Probe retry policy.
    #[serde(default)]
    pub retry: RetryPolicy,
    /// Response the endpoint must produce to count as healthy.
    #[serde(default)]
    pub expect: Expectation,
}

fn default_terraform_bin() -> String {
    "terraform".to_string()
}

fn default_output_key() -> String {
    DEFAULT_OUTPUT_KEY.to_string()
}

impl SmokeConfig {
    /// Build a config for a directory with everything else defaulted.
    #[must_use]
    pub fn for_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            terraform_bin: default_terraform_bin(),
            output_key: default_output_key(),
            retry: RetryPolicy::default(),
            expect: Expectation::default(),
        }
    }

    /// Load a config from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Validate the descriptor before any provisioning starts.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for a missing directory, a zero attempt
    /// budget, or an empty output key.
    pub fn validate(&self) -> Result<()> {
        if !self.dir.is_dir() {
            return Err(ConfigError::DirNotFound(self.dir.display().to_string()).into());
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts.into());
        }
        if self.output_key.is_empty() {
            return Err(ConfigError::EmptyOutputKey.into());
        }
        Ok(())
    }
}
