mod commands;
mod export;
mod hcl;
mod interpolate;
mod output;
mod provider;
mod schema;
mod traits;
mod writer;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{ExportCommand, TypesCommand};

#[derive(Parser)]
#[command(name = "tfreap")]
#[command(about = "Reverse Terraform - export existing cloud resources as configuration and state", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export discovered resources to configuration and state files
    Export(ExportCommand),

    /// List resource types supported by a provider dump
    Types(TypesCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Export(cmd) => cmd.execute()?,
        Commands::Types(cmd) => cmd.execute()?,
    }

    Ok(())
}
