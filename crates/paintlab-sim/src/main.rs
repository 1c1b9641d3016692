use std::error::Error;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use commands::{
    doctor::{self, DoctorArgs},
    report::{self, ReportArgs},
    sweep::{self, SweepArgs},
};
use tracing_subscriber::EnvFilter;

mod commands;

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "PAINTLAB_LOG";

#[derive(Parser, Debug)]
#[command(name = "paintlab", about = "Parameter sweeps and reports for the stroke-painting engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every grid cell through the engine and append rows to the result store.
    Sweep(SweepArgs),
    /// Render the Markdown tables from a completed result store.
    Report(ReportArgs),
    /// Check engine, instances and store before a sweep.
    Doctor(DoctorArgs),
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    let outcome: Result<(), Box<dyn Error>> = match cli.command {
        Command::Sweep(args) => sweep::run(&args),
        Command::Report(args) => report::run(&args),
        Command::Doctor(args) => doctor::run(&args),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
