//! Terraform CLI abstraction — enables test doubles for all `terraform` commands.

use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use anyhow::{Context, Result};

/// Descriptor for the configuration under test. Struct-based to avoid
/// breaking test doubles on future parameter additions.
#[derive(Debug, Clone)]
pub struct TerraformOptions {
    /// Directory containing the declarative infrastructure definitions.
    pub dir: PathBuf,
    /// Binary to invoke. Overridable so tests can substitute a stub.
    pub bin: String,
}

impl TerraformOptions {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            bin: "terraform".to_string(),
        }
    }

    #[must_use]
    pub fn with_bin(mut self, bin: impl Into<String>) -> Self {
        self.bin = bin.into();
        self
    }
}

/// Abstraction over the terraform CLI, enabling test doubles.
///
/// All methods target the configured directory. The production
/// implementation delegates to the `terraform` binary via
/// [`std::process::Command`].
pub trait Terraform {
    /// Run `terraform version -json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned (i.e. terraform not on PATH).
    fn version(&self) -> Result<Output>;

    /// Run `terraform -chdir=<dir> init -input=false -no-color`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned.
    fn init(&self) -> Result<Output>;

    /// Run `terraform -chdir=<dir> apply -input=false -no-color -auto-approve`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned.
    fn apply(&self) -> Result<Output>;

    /// Run `terraform -chdir=<dir> destroy -input=false -no-color -auto-approve`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned.
    fn destroy(&self) -> Result<Output>;

    /// Run `terraform -chdir=<dir> output -no-color -json <key>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned.
    fn output(&self, key: &str) -> Result<Output>;
}

/// Production implementation — shells out to the `terraform` binary.
pub struct TerraformCli {
    opts: TerraformOptions,
}

impl TerraformCli {
    #[must_use]
    pub fn new(opts: TerraformOptions) -> Self {
        Self { opts }
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        Command::new(&self.opts.bin)
            .arg(format!("-chdir={}", self.opts.dir.display()))
            .args(args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| {
                format!(
                    "failed to run {} {}",
                    self.opts.bin,
                    args.first().copied().unwrap_or_default()
                )
            })
    }
}

impl Terraform for TerraformCli {
    fn version(&self) -> Result<Output> {
        Command::new(&self.opts.bin)
            .args(["version", "-json"])
            .stdin(Stdio::null())
            .output()
            .context("failed to run terraform version")
    }

    fn init(&self) -> Result<Output> {
        self.run(&["init", "-input=false", "-no-color"])
    }

    fn apply(&self) -> Result<Output> {
        self.run(&["apply", "-input=false", "-no-color", "-auto-approve"])
    }

    fn destroy(&self) -> Result<Output> {
        self.run(&["destroy", "-input=false", "-no-color", "-auto-approve"])
    }

    fn output(&self, key: &str) -> Result<Output> {
        self.run(&["output", "-no-color", "-json", key])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default_bin_is_terraform() {
        let opts = TerraformOptions::new("envs/production");
        assert_eq!(opts.bin, "terraform");
        assert_eq!(opts.dir, PathBuf::from("envs/production"));
    }

    #[test]
    fn test_options_with_bin_overrides() {
        let opts = TerraformOptions::new(".").with_bin("tofu");
        assert_eq!(opts.bin, "tofu");
    }

    #[test]
    fn test_cli_spawn_error_when_binary_missing() {
        let opts = TerraformOptions::new(".").with_bin("definitely-not-terraform-xyz");
        let tf = TerraformCli::new(opts);
        let err = tf.init().expect_err("spawn should fail");
        assert!(err.to_string().contains("failed to run"));
    }
}
