use std::error::Error;

use clap::Args;
use paintlab_exp::{run_sweep, ProcessEngine};

use super::ConfigArgs;

#[derive(Args, Debug)]
pub struct SweepArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn run(args: &SweepArgs) -> Result<(), Box<dyn Error>> {
    let config = args.config.load()?;
    let summary = run_sweep(&config, &ProcessEngine)?;
    println!(
        "Experiments finished: {} runs. Results in {}",
        summary.runs,
        summary.store_path.display()
    );
    Ok(())
}
