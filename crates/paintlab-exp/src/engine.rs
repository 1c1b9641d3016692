use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use paintlab_core::errors::{ErrorInfo, LabError};
use paintlab_core::{ParameterSet, SweepConfig};

/// Fully resolved engine command line for one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    /// Image path handed to `--output`.
    pub output_path: PathBuf,
}

impl EngineCommand {
    /// Builds the fixed-flag command line for `params`.
    ///
    /// Flag order: instance, strokes, greedy candidates, seed, the optional
    /// tabu triple, output.
    pub fn build(config: &SweepConfig, params: &ParameterSet) -> Self {
        let output_path = config.output_dir.join(params.output_file_name());
        let instance_path = config.instances_dir.join(&params.instance);
        let mut args: Vec<OsString> = vec![
            "--instance".into(),
            instance_path.into_os_string(),
            "--strokes".into(),
            params.strokes.to_string().into(),
            "--greedy-candidates".into(),
            params.candidates.to_string().into(),
            "--seed".into(),
            params.seed.to_string().into(),
        ];
        if let Some(tabu) = &params.tabu {
            let tabu_args: [OsString; 6] = [
                "--tabu-iters".into(),
                tabu.iterations.to_string().into(),
                "--tabu-tenure".into(),
                tabu.tenure.to_string().into(),
                "--tabu-neigh".into(),
                tabu.neighborhood.to_string().into(),
            ];
            args.extend(tabu_args);
        }
        args.push("--output".into());
        args.push(output_path.clone().into_os_string());
        Self {
            program: config.engine.clone(),
            args,
            output_path,
        }
    }

    /// Shell-like rendering for logs and diagnostics.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().map(|arg| arg.to_string_lossy().into_owned()));
        parts.join(" ")
    }
}

/// Captured result of one engine process.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code; `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Wall-clock time around the process, measured by the harness.
    pub elapsed: Duration,
}

impl EngineOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs one engine command to completion.
///
/// Implementations only report what happened; [`execute`] decides whether
/// the exit status is fatal.
pub trait Engine {
    fn run(&self, command: &EngineCommand) -> Result<EngineOutput, LabError>;
}

/// Spawns the configured executable as a blocking child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEngine;

impl Engine for ProcessEngine {
    fn run(&self, command: &EngineCommand) -> Result<EngineOutput, LabError> {
        let start = Instant::now();
        let output = Command::new(&command.program)
            .args(&command.args)
            .output()
            .map_err(|err| spawn_error(&command.program, err))?;
        let elapsed = start.elapsed();
        Ok(EngineOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
            elapsed,
        })
    }
}

/// Runs `command` and turns a non-zero exit into
/// [`LabError::EngineExecutionFailed`] carrying the captured stderr.
pub fn execute<E: Engine + ?Sized>(
    engine: &E,
    command: &EngineCommand,
) -> Result<EngineOutput, LabError> {
    tracing::debug!(command = %command.display(), "launching engine");
    let output = engine.run(command)?;
    if !output.success() {
        let status = output
            .exit_code
            .map(|code| code.to_string())
            .unwrap_or_else(|| "signal".to_string());
        return Err(LabError::EngineExecutionFailed(
            ErrorInfo::new("engine.exit_status", "engine exited unsuccessfully")
                .with_context("command", command.display())
                .with_context("status", status)
                .with_context("stderr", output.stderr.trim_end().to_string()),
        ));
    }
    Ok(output)
}

fn spawn_error(program: &Path, err: std::io::Error) -> LabError {
    LabError::EngineExecutionFailed(
        ErrorInfo::new("engine.spawn", err.to_string())
            .with_context("program", program.display().to_string())
            .with_hint("build the engine and point `engine` at the executable"),
    )
}
