#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::time::Duration;

use paintlab_core::{LabError, SweepConfig, SweepVariant};
use paintlab_exp::{Engine, EngineCommand, EngineOutput};

/// In-process engine answering every command through a closure.
pub struct StubEngine<F> {
    respond: F,
    pub calls: RefCell<Vec<EngineCommand>>,
}

impl<F> StubEngine<F>
where
    F: Fn(usize, &EngineCommand) -> EngineOutput,
{
    pub fn new(respond: F) -> Self {
        Self {
            respond,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl<F> Engine for StubEngine<F>
where
    F: Fn(usize, &EngineCommand) -> EngineOutput,
{
    fn run(&self, command: &EngineCommand) -> Result<EngineOutput, LabError> {
        let idx = self.calls.borrow().len();
        self.calls.borrow_mut().push(command.clone());
        Ok((self.respond)(idx, command))
    }
}

pub fn ok(stdout: &str, elapsed_ms: u64) -> EngineOutput {
    EngineOutput {
        stdout: stdout.to_string(),
        stderr: String::new(),
        exit_code: Some(0),
        elapsed: Duration::from_millis(elapsed_ms),
    }
}

pub fn failed(stderr: &str) -> EngineOutput {
    EngineOutput {
        stdout: String::new(),
        stderr: stderr.to_string(),
        exit_code: Some(1),
        elapsed: Duration::from_millis(1),
    }
}

pub fn tabu_stdout(greedy: f64, tabu: f64) -> String {
    format!(
        "MSE Greedy: {greedy}\nMSE Tabu final: {tabu}\nTiempo Greedy (s): 0.5\nTiempo Tabu (s): 1.25\nTiempo Total (s): 1.75\n"
    )
}

/// Config rooted in `root` with the given instance files created.
pub fn config_in(root: &Path, variant: SweepVariant, instances: &[&str]) -> SweepConfig {
    let mut config = SweepConfig::defaults(variant);
    config.instances_dir = root.join("instancias");
    config.output_dir = root.join("out");
    fs::create_dir_all(&config.instances_dir).expect("instances dir");
    for name in instances {
        fs::write(config.instances_dir.join(name), b"not really an image").expect("instance");
    }
    config
}
