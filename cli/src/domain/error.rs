//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Provisioning errors ───────────────────────────────────────────────────────

/// Errors reported by the provisioning engine driver.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("terraform not found on PATH. Install it or pass --terraform-bin.")]
    BinaryNotFound,

    #[error("terraform {found} is too old (need >= {min}).")]
    UnsupportedVersion { found: String, min: String },

    #[error("terraform init failed:\n{stderr}")]
    Init { stderr: String },

    #[error("terraform apply failed:\n{stderr}")]
    Apply { stderr: String },

    #[error("terraform destroy failed:\n{stderr}")]
    Destroy { stderr: String },

    #[error("output '{key}' not found. Does the configuration declare it?")]
    OutputMissing { key: String },

    #[error("output '{key}' is not a string value.")]
    OutputNotString { key: String },
}

// ── Probe errors ──────────────────────────────────────────────────────────────

/// Errors reported by the retrying health probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("health probe gave up after {attempts} attempts; last response: {}", describe_last(.last))]
    Exhausted {
        /// Attempts issued before giving up.
        attempts: u32,
        /// Last observed (status, body), if any attempt got a response at all.
        last: Option<(u16, String)>,
    },
}

fn describe_last(last: &Option<(u16, String)>) -> String {
    match last {
        Some((status, body)) => format!("HTTP {status}, body {body:?}"),
        None => "none (transport errors only)".to_string(),
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to run configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("terraform directory '{0}' does not exist.")]
    DirNotFound(String),

    #[error("max_attempts must be at least 1.")]
    ZeroAttempts,

    #[error("output key must not be empty.")]
    EmptyOutputKey,
}
