use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::provider::{FileProvider, ResourceProvider};

/// List resource types supported by a provider dump
#[derive(Debug, Args)]
pub struct TypesCommand {
    /// Path to the provider scan dump (JSON)
    #[arg(short, long)]
    input: PathBuf,
}

impl TypesCommand {
    pub fn execute(&self) -> Result<()> {
        let provider = FileProvider::load(&self.input)?;

        for resource_type in provider.supported_types() {
            println!("{}", resource_type);
        }

        Ok(())
    }
}
