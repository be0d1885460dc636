//! Health validation — the pure decision over an observed HTTP response.
//!
//! This module is intentionally free of I/O. The probe loop observes
//! (status, body) pairs; this module decides whether one counts as healthy.
//! Diagnostic logging of response bodies happens in the probe, never here.

use serde::Deserialize;

/// Expected response for a healthy endpoint.
///
/// Matching is exact: the status must be equal and the body byte-for-byte
/// identical. No trimming, no case folding — a trailing newline fails.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Expectation {
    /// Expected HTTP status code.
    #[serde(default = "default_status")]
    pub status: u16,
    /// Expected response body.
    #[serde(default = "default_body")]
    pub body: String,
}

fn default_status() -> u16 {
    200
}

fn default_body() -> String {
    "ok".to_string()
}

impl Default for Expectation {
    fn default() -> Self {
        Self {
            status: default_status(),
            body: default_body(),
        }
    }
}

impl Expectation {
    /// Decide whether an observed response counts as healthy.
    #[must_use]
    pub fn matches(&self, status: u16, body: &str) -> bool {
        status == self.status && body == self.body
    }
}

/// Default health policy: HTTP 200 with a body of exactly `"ok"`.
#[must_use]
pub fn is_healthy(status: u16, body: &str) -> bool {
    Expectation::default().matches(status, body)
}

// ── Unit tests ────────────────────────────────────────────────────────────────
