//! Init Command - write a default configuration file

use std::path::PathBuf;

use clap::Args;

use crate::config::{CharmixConfig, DEFAULT_CONFIG_FILE};

/// Write a configuration file with default settings
#[derive(Args)]
pub struct InitCommand {
    /// Destination path
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

impl InitCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        if self.path.exists() && !self.force {
            anyhow::bail!("{} already exists (use --force to overwrite)", self.path.display());
        }
        CharmixConfig::default().save(&self.path)?;
        tracing::info!(path = %self.path.display(), "config written");
        println!("Wrote {}", self.path.display());
        Ok(())
    }
}
