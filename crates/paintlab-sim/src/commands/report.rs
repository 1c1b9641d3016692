use std::error::Error;

use clap::Args;
use paintlab_exp::generate_report;

use super::ConfigArgs;

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn run(args: &ReportArgs) -> Result<(), Box<dyn Error>> {
    let config = args.config.load()?;
    let summary = generate_report(&config)?;
    println!(
        "Markdown tables generated in {} ({} rows)",
        summary.path.display(),
        summary.rows
    );
    Ok(())
}
