//! `tfsmoke probe` — probe a URL without provisioning anything.
//!
//! Operator loop for a stack that is already up: same retry policy and
//! validation as the full cycle, no terraform involved.

use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::domain::health::Expectation;
use crate::output::OutputContext;
use crate::probe::{self, TransportConfig};

/// Arguments for the probe command.
#[derive(Args)]
pub struct ProbeArgs {
    /// URL to probe
    pub url: String,

    /// Maximum number of attempts
    #[arg(long, default_value_t = 60)]
    pub max_attempts: u32,

    /// Seconds between attempts
    #[arg(long, default_value_t = 10)]
    pub delay: u64,

    /// Expected HTTP status
    #[arg(long, default_value_t = 200)]
    pub status: u16,

    /// Expected response body, compared exactly
    #[arg(long, default_value = "ok")]
    pub body: String,
}

/// Run `tfsmoke probe <url>`.
///
/// # Errors
///
/// Returns an error when the attempt budget runs out without a response
/// matching the expectation.
pub fn run(ctx: &OutputContext, args: &ProbeArgs) -> Result<()> {
    let expect = Expectation {
        status: args.status,
        body: args.body.clone(),
    };
    let report = probe::get_with_retry(
        ctx,
        &args.url,
        &TransportConfig::default(),
        args.max_attempts,
        Duration::from_secs(args.delay),
        |status, body| expect.matches(status, body),
    )?;
    ctx.success(&format!(
        "endpoint healthy: HTTP {} after {} attempt(s)",
        report.status, report.attempts
    ));
    Ok(())
}
