//! `tfsmoke run` — the full provision → probe → destroy cycle.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::config::SmokeConfig;
use crate::output::{OutputContext, progress};
use crate::probe::{self, TransportConfig};
use crate::stack::{self, Stack};
use crate::terraform::{Terraform, TerraformCli, TerraformOptions};

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Terraform configuration directory
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Load run settings from a YAML file
    #[arg(short, long, conflicts_with = "dir")]
    pub config: Option<PathBuf>,

    /// Terraform output holding the health endpoint URL
    #[arg(long)]
    pub output_key: Option<String>,

    /// Maximum number of probe attempts
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Seconds between probe attempts
    #[arg(long)]
    pub delay: Option<u64>,

    /// Terraform binary to invoke
    #[arg(long, env = "TFSMOKE_TERRAFORM_BIN")]
    pub terraform_bin: Option<String>,
}

/// Run `tfsmoke run`.
///
/// Provisions the configuration, probes the health endpoint, and destroys
/// the infrastructure. Destroy always runs, whichever earlier step failed;
/// the cycle passes only when apply, output lookup, probe, and destroy all
/// succeed.
///
/// # Errors
///
/// Returns an error naming the step that failed: provisioning, output
/// lookup, probe exhaustion, or teardown.
pub fn run(ctx: &OutputContext, args: &RunArgs) -> Result<()> {
    let cfg = resolve_config(args)?;
    cfg.validate()?;

    let tf = TerraformCli::new(
        TerraformOptions::new(cfg.dir.clone()).with_bin(cfg.terraform_bin.clone()),
    );
    stack::check_prerequisites(&tf)?;

    // The teardown obligation is taken before the first provisioning step
    // so destroy runs even when apply fails.
    let stack = Stack::new(&tf);
    let cycle_result = cycle(ctx, &cfg, &stack);

    let pb = ctx
        .show_progress()
        .then(|| progress::spinner("destroying infrastructure..."));
    let destroy_result = stack.destroy();
    if let Some(pb) = pb {
        match &destroy_result {
            Ok(()) => progress::finish_ok(&pb, "destroying infrastructure..."),
            Err(_) => pb.finish_and_clear(),
        }
    }

    match (cycle_result, destroy_result) {
        (Ok(()), Ok(())) => {
            ctx.success("smoke test passed");
            Ok(())
        }
        (Ok(()), Err(e)) => Err(e).context("teardown failed"),
        (Err(e), Ok(())) => Err(e),
        (Err(cycle_err), Err(destroy_err)) => {
            // Both failed; the cycle error is primary, but the teardown
            // failure must not be lost.
            ctx.error(&format!("teardown also failed: {destroy_err:#}"));
            Err(cycle_err)
        }
    }
}

fn cycle<T: Terraform>(
    ctx: &OutputContext,
    cfg: &SmokeConfig,
    stack: &Stack<'_, T>,
) -> Result<()> {
    let pb = ctx
        .show_progress()
        .then(|| progress::spinner("applying configuration..."));
    let applied = stack.apply();
    if let Some(pb) = pb {
        match &applied {
            Ok(()) => progress::finish_ok(&pb, "applying configuration..."),
            Err(_) => pb.finish_and_clear(),
        }
    }
    applied.context("provisioning failed")?;
    ctx.success("infrastructure applied");

    let url = stack
        .output(&cfg.output_key)
        .context("reading terraform output")?;
    ctx.info(&format!("health check URL: {url}"));

    let expect = cfg.expect.clone();
    let report = probe::get_with_retry(
        ctx,
        &url,
        &TransportConfig::default(),
        cfg.retry.max_attempts,
        cfg.retry.delay(),
        |status, body| expect.matches(status, body),
    )
    .context("probing deployed endpoint")?;
    ctx.success(&format!(
        "endpoint healthy after {} attempt(s)",
        report.attempts
    ));
    Ok(())
}

fn resolve_config(args: &RunArgs) -> Result<SmokeConfig> {
    let mut cfg = match (&args.config, &args.dir) {
        (Some(path), _) => SmokeConfig::load(path)?,
        (None, Some(dir)) => SmokeConfig::for_dir(dir.clone()),
        (None, None) => anyhow::bail!("pass --dir <path> or --config <file>"),
    };
    if let Some(key) = &args.output_key {
        cfg.output_key = key.clone();
    }
    if let Some(n) = args.max_attempts {
        cfg.retry.max_attempts = n;
    }
    if let Some(secs) = args.delay {
        cfg.retry.delay_secs = secs;
    }
    if let Some(bin) = &args.terraform_bin {
        cfg.terraform_bin = bin.clone();
    }
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_args() -> RunArgs {
        RunArgs {
            dir: Some(PathBuf::from("envs/production")),
            config: None,
            output_key: None,
            max_attempts: None,
            delay: None,
            terraform_bin: None,
        }
    }

    #[test]
    fn test_resolve_config_dir_only_uses_defaults() {
        let cfg = resolve_config(&bare_args()).expect("resolve");
        assert_eq!(cfg.dir, PathBuf::from("envs/production"));
        assert_eq!(cfg.output_key, "healthcheck_url");
        assert_eq!(cfg.retry.max_attempts, 60);
        assert_eq!(cfg.retry.delay_secs, 10);
    }

    #[test]
    fn test_resolve_config_flags_override_defaults() {
        let args = RunArgs {
            output_key: Some("api_url".to_string()),
            max_attempts: Some(3),
            delay: Some(1),
            terraform_bin: Some("tofu".to_string()),
            ..bare_args()
        };
        let cfg = resolve_config(&args).expect("resolve");
        assert_eq!(cfg.output_key, "api_url");
        assert_eq!(cfg.retry.max_attempts, 3);
        assert_eq!(cfg.retry.delay_secs, 1);
        assert_eq!(cfg.terraform_bin, "tofu");
    }

    #[test]
    fn test_resolve_config_requires_dir_or_config() {
        let args = RunArgs {
            dir: None,
            ..bare_args()
        };
        let err = resolve_config(&args).expect_err("no source");
        assert!(err.to_string().contains("--dir"));
    }
}
