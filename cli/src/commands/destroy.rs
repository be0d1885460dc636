//! `tfsmoke destroy` — teardown only.
//!
//! Recovery path for a cycle that was interrupted before its own destroy
//! could run (killed process, lost network).

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::output::{OutputContext, progress};
use crate::stack::Stack;
use crate::terraform::{TerraformCli, TerraformOptions};

/// Arguments for the destroy command.
#[derive(Args)]
pub struct DestroyArgs {
    /// Terraform configuration directory
    #[arg(short, long)]
    pub dir: PathBuf,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Terraform binary to invoke
    #[arg(long, env = "TFSMOKE_TERRAFORM_BIN")]
    pub terraform_bin: Option<String>,
}

/// Run `tfsmoke destroy`.
///
/// # Errors
///
/// Returns an error if the destroy fails or the confirmation cannot be read.
pub fn run(ctx: &OutputContext, args: &DestroyArgs) -> Result<()> {
    if !args.yes && !confirm("Destroy the provisioned infrastructure?")? {
        println!("Cancelled.");
        return Ok(());
    }

    let mut opts = TerraformOptions::new(args.dir.clone());
    if let Some(bin) = &args.terraform_bin {
        opts = opts.with_bin(bin.clone());
    }
    let tf = TerraformCli::new(opts);

    let pb = ctx
        .show_progress()
        .then(|| progress::spinner("destroying infrastructure..."));
    let result = Stack::new(&tf).destroy();
    if let Some(pb) = pb {
        match &result {
            Ok(()) => progress::finish_ok(&pb, "destroying infrastructure..."),
            Err(_) => pb.finish_and_clear(),
        }
    }
    result?;
    ctx.success("infrastructure destroyed");
    Ok(())
}

// --- Helpers ---

fn confirm(prompt: &str) -> Result<bool> {
    use std::io::{BufRead, Write};
    print!("{prompt} [y/N]: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    let n = std::io::stdin().lock().read_line(&mut line)?;
    anyhow::ensure!(n > 0, "no input provided");
    Ok(line.trim().eq_ignore_ascii_case("y"))
}
