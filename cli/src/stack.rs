//! Provisioned stack lifecycle — apply, output extraction, guaranteed destroy.
//!
//! `Stack` owns the teardown obligation: take it BEFORE the first
//! provisioning step, so destroy runs on every exit path, including when
//! apply itself fails. Teardown executes exactly once per lifecycle.

use anyhow::{Context, Result};

use crate::domain::error::ProvisionError;
use crate::terraform::Terraform;

/// Minimum supported terraform version.
const TERRAFORM_MIN_VERSION: semver::Version = semver::Version::new(1, 0, 0);

/// Preflight: terraform present on PATH and recent enough.
///
/// # Errors
///
/// Returns [`ProvisionError::BinaryNotFound`] when the binary cannot be
/// spawned, [`ProvisionError::UnsupportedVersion`] when it is too old.
pub fn check_prerequisites(tf: &impl Terraform) -> Result<()> {
    let output = tf.version().map_err(|_| ProvisionError::BinaryNotFound)?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    if let Ok(info) = serde_json::from_str::<serde_json::Value>(&stdout)
        && let Some(ver_str) = info.get("terraform_version").and_then(|v| v.as_str())
        && let Ok(v) = semver::Version::parse(ver_str)
        && v < TERRAFORM_MIN_VERSION
    {
        return Err(ProvisionError::UnsupportedVersion {
            found: v.to_string(),
            min: TERRAFORM_MIN_VERSION.to_string(),
        }
        .into());
    }
    Ok(())
}

/// A provisioned (or about-to-be-provisioned) configuration with a
/// guaranteed destroy.
///
/// Dropping the guard destroys the infrastructure unless [`Stack::destroy`]
/// already ran. Destroy failures inside `Drop` are reported to stderr and
/// never panic, so the process can always exit.
pub struct Stack<'a, T: Terraform> {
    tf: &'a T,
    destroyed: bool,
}

impl<'a, T: Terraform> Stack<'a, T> {
    /// Take ownership of the teardown obligation.
    #[must_use]
    pub fn new(tf: &'a T) -> Self {
        Self {
            tf,
            destroyed: false,
        }
    }

    /// Run `init` then `apply`, creating or updating the described resources.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Init`] or [`ProvisionError::Apply`] carrying
    /// the engine's stderr when either step reports failure.
    pub fn apply(&self) -> Result<()> {
        let output = self.tf.init()?;
        if !output.status.success() {
            return Err(ProvisionError::Init {
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
            .into());
        }
        let output = self.tf.apply()?;
        if !output.status.success() {
            return Err(ProvisionError::Apply {
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
            .into());
        }
        Ok(())
    }

    /// Read a named string output from the applied configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::OutputMissing`] when the key is absent or
    /// the state has no outputs, [`ProvisionError::OutputNotString`] when the
    /// value is not a JSON string.
    pub fn output(&self, key: &str) -> Result<String> {
        let output = self.tf.output(key)?;
        if !output.status.success() {
            return Err(ProvisionError::OutputMissing {
                key: key.to_string(),
            }
            .into());
        }
        let value: serde_json::Value =
            serde_json::from_slice(&output.stdout).context("parsing terraform output")?;
        match value {
            serde_json::Value::String(s) => Ok(s),
            _ => Err(ProvisionError::OutputNotString {
                key: key.to_string(),
            }
            .into()),
        }
    }

    /// Destroy the stack now, surfacing failures to the caller.
    ///
    /// Consumes the guard; `Drop` will not destroy again.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Destroy`] when the engine reports failure.
    pub fn destroy(mut self) -> Result<()> {
        self.destroyed = true;
        destroy_now(self.tf)
    }
}

impl<T: Terraform> Drop for Stack<'_, T> {
    fn drop(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        // Errors cannot propagate out of Drop; report them and keep going
        // so the process exit is never blocked.
        if let Err(e) = destroy_now(self.tf) {
            eprintln!("warning: cleanup destroy failed: {e:#}");
        }
    }
}

fn destroy_now(tf: &impl Terraform) -> Result<()> {
    let output = tf.destroy()?;
    if !output.status.success() {
        return Err(ProvisionError::Destroy {
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
        .into());
    }
    Ok(())
}
