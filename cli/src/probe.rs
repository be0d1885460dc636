//! Retrying HTTP health probe.
//!
//! A fixed-delay, attempt-bounded GET loop: an explicit counter and a
//! blocking sleep, no backoff, no jitter, no background scheduling.
//! Transport failures and rejected responses each consume one attempt;
//! the first response the validation predicate accepts wins.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::domain::error::ProbeError;
use crate::output::OutputContext;

/// Transport parameters for probe requests, passed opaquely to
/// [`get_with_retry`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// TCP connect timeout per attempt.
    pub connect_timeout: Duration,
    /// Overall timeout per attempt (connect + transfer).
    pub timeout: Duration,
    /// User-Agent header sent with each request.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(30),
            user_agent: concat!("tfsmoke/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl TransportConfig {
    fn agent(&self) -> ureq::Agent {
        ureq::AgentBuilder::new()
            .timeout_connect(self.connect_timeout)
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()
    }
}

/// The attempt that passed validation.
#[derive(Debug)]
pub struct ProbeReport {
    /// 1-based attempt number that succeeded.
    pub attempts: u32,
    /// Status of the accepted response.
    pub status: u16,
    /// Body of the accepted response.
    pub body: String,
}

/// GET `url` until `validate` accepts a response or `max_attempts` runs out.
///
/// Waits `delay` between attempts (never after the last one), so the worst
/// case lasts `max_attempts` requests and `max_attempts - 1` sleeps. At
/// least one request is always issued. Each observed body is logged through
/// `ctx` for diagnosis; logging never affects the verdict.
///
/// # Errors
///
/// Returns [`ProbeError::Exhausted`] carrying the last observed response
/// when no attempt passes validation.
pub fn get_with_retry<F>(
    ctx: &OutputContext,
    url: &str,
    transport: &TransportConfig,
    max_attempts: u32,
    delay: Duration,
    validate: F,
) -> Result<ProbeReport>
where
    F: Fn(u16, &str) -> bool,
{
    let max_attempts = max_attempts.max(1);
    let agent = transport.agent();
    let mut last: Option<(u16, String)> = None;

    for attempt in 1..=max_attempts {
        match fetch(&agent, url) {
            Ok((status, body)) => {
                ctx.info(&format!(
                    "attempt {attempt}/{max_attempts}: HTTP {status}, body {body:?}"
                ));
                if validate(status, &body) {
                    return Ok(ProbeReport {
                        attempts: attempt,
                        status,
                        body,
                    });
                }
                last = Some((status, body));
            }
            Err(e) => {
                ctx.warn(&format!("attempt {attempt}/{max_attempts}: {e:#}"));
            }
        }
        if attempt < max_attempts {
            std::thread::sleep(delay);
        }
    }

    Err(ProbeError::Exhausted {
        attempts: max_attempts,
        last,
    }
    .into())
}

/// Single GET. Non-2xx statuses are observations for the predicate, not
/// errors; only transport-level failures (refused, timeout, DNS) are `Err`.
fn fetch(agent: &ureq::Agent, url: &str) -> Result<(u16, String)> {
    match agent.get(url).call() {
        Ok(resp) => {
            let status = resp.status();
            let body = resp.into_string().context("reading response body")?;
            Ok((status, body))
        }
        Err(ureq::Error::Status(status, resp)) => {
            Ok((status, resp.into_string().unwrap_or_default()))
        }
        Err(e) => Err(anyhow::Error::from(e).context("request failed")),
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
