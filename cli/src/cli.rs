//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use crate::output::OutputContext;

/// Terraform smoke tests: provision, probe the health endpoint, destroy
#[derive(Parser)]
#[command(
    name = "tfsmoke",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Provision, probe the health endpoint, destroy — one full cycle
    Run(commands::run::RunArgs),

    /// Probe a URL without provisioning anything
    Probe(commands::probe::ProbeArgs),

    /// Destroy a provisioned configuration
    Destroy(commands::destroy::DestroyArgs),

    /// Show version
    Version {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub fn run(self) -> Result<()> {
        let Cli {
            no_color,
            quiet,
            command,
        } = self;
        let ctx = OutputContext::new(no_color, quiet);
        match command {
            Command::Run(args) => commands::run::run(&ctx, &args),
            Command::Probe(args) => commands::probe::run(&ctx, &args),
            Command::Destroy(args) => commands::destroy::run(&ctx, &args),
            Command::Version { json } => {
                commands::version::run(json);
                Ok(())
            }
        }
    }
}
