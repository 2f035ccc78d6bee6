use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::export::{ExportOptions, ExportWorkflow};
use crate::provider::{FileProvider, TagFilter};
use crate::traits::{Output, TerminalOutput};

/// Export discovered resources as configuration and state files
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Path to the provider scan dump (JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Resource types to export (defaults to all supported types)
    #[arg(short = 't', long = "type")]
    types: Vec<String>,

    /// Resource types to exclude (ignored when --type is given)
    #[arg(long = "exclude")]
    excludes: Vec<String>,

    /// Only export resources carrying this tag (key=value)
    #[arg(long)]
    tag: Option<String>,

    /// Where to write the generated configuration
    #[arg(long, default_value = "resources.tf")]
    config_out: PathBuf,

    /// Where to write the state snapshot
    #[arg(long, default_value = "terraform.tfstate")]
    state_out: PathBuf,

    /// Skip generating the configuration artifact
    #[arg(long)]
    no_config: bool,

    /// Skip generating the state snapshot
    #[arg(long)]
    no_state: bool,
}

impl ExportCommand {
    pub fn execute(&self) -> Result<()> {
        let provider = FileProvider::load(&self.input)?;

        let tag_filter = self
            .tag
            .as_deref()
            .map(TagFilter::parse)
            .transpose()
            .context("Invalid --tag value")?;

        let options = ExportOptions {
            include: self.types.clone(),
            exclude: self.excludes.clone(),
            tag_filter,
            emit_config: !self.no_config,
            emit_state: !self.no_state,
        };

        let output = TerminalOutput;
        let workflow = ExportWorkflow::new(&provider, options, &output);
        let report = workflow.execute().context("Export run failed")?;

        if let Some(text) = &report.config {
            fs::write(&self.config_out, text)
                .with_context(|| format!("Failed to write {}", self.config_out.display()))?;
            output.key_value("Configuration", &self.config_out.display().to_string());
        }

        if let Some(document) = &report.state {
            fs::write(&self.state_out, document)
                .with_context(|| format!("Failed to write {}", self.state_out.display()))?;
            output.key_value("State", &self.state_out.display().to_string());
        }

        Ok(())
    }
}
