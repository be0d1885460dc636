//! tfsmoke - provision a Terraform stack, probe its health endpoint, destroy it

use clap::Parser;

use tfsmoke_cli::cli::Cli;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
