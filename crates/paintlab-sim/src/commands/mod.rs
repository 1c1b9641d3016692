pub mod doctor;
pub mod report;
pub mod sweep;

use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use paintlab_core::{SweepConfig, SweepVariant};

/// Flags shared by every subcommand. Without flags the reference layout is used.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Sweep variant: `plain` (greedy only) or `tabu` (greedy + tabu search).
    #[arg(long, default_value = "plain")]
    pub variant: SweepVariant,
    /// YAML file overriding the variant's default grid and paths.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<SweepConfig, Box<dyn Error>> {
        let config = match &self.config {
            Some(path) => SweepConfig::load(path, self.variant)?,
            None => SweepConfig::defaults(self.variant),
        };
        Ok(config)
    }
}
