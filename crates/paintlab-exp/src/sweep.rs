use std::fs;
use std::path::PathBuf;

use paintlab_core::errors::LabError;
use paintlab_core::{ParameterSet, RunMetrics, RunResult, SweepConfig, SweepVariant};

use crate::discovery::collect_instances;
use crate::engine::{execute, Engine, EngineCommand};
use crate::manifest::SweepManifest;
use crate::parse::{MetricLabel, OutputParser};
use crate::store::{PlainRecord, ResultStore, StoreRecord, TabuRecord};

/// Outcome of a completed sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepSummary {
    pub variant: SweepVariant,
    pub runs: usize,
    pub store_path: PathBuf,
    pub manifest_path: PathBuf,
    pub plan_hash: String,
}

/// Expands the grid in its fixed nested order: instance, then stroke and
/// candidate values (or scenario, then tabu configuration), then seed.
pub fn plan_runs(config: &SweepConfig, instances: &[String]) -> Vec<ParameterSet> {
    let mut runs = Vec::with_capacity(instances.len() * config.runs_per_instance());
    for instance in instances {
        match config.variant {
            SweepVariant::Plain => {
                for &strokes in &config.strokes {
                    for &candidates in &config.candidates {
                        for &seed in &config.seeds {
                            runs.push(ParameterSet::plain(instance, strokes, candidates, seed));
                        }
                    }
                }
            }
            SweepVariant::Tabu => {
                for scenario in &config.scenarios {
                    for tabu in &config.tabu_configs {
                        for &seed in &config.seeds {
                            runs.push(ParameterSet::tabu(instance, scenario, tabu, seed));
                        }
                    }
                }
            }
        }
    }
    runs
}

/// Runs the whole sweep described by `config`, one engine process at a time.
///
/// The first engine or parser failure aborts the sweep; rows already
/// appended stay in the store.
pub fn run_sweep<E: Engine + ?Sized>(
    config: &SweepConfig,
    engine: &E,
) -> Result<SweepSummary, LabError> {
    config.validate()?;
    let instances = collect_instances(&config.instances_dir)?;
    fs::create_dir_all(&config.output_dir)
        .map_err(|err| LabError::io("sweep.output_dir", &config.output_dir, err))?;
    match config.variant {
        SweepVariant::Plain => drive::<PlainRecord, E>(config, engine, &instances),
        SweepVariant::Tabu => drive::<TabuRecord, E>(config, engine, &instances),
    }
}

fn drive<R: StoreRecord, E: Engine + ?Sized>(
    config: &SweepConfig,
    engine: &E,
    instances: &[String],
) -> Result<SweepSummary, LabError> {
    let parser = OutputParser::new()?;
    let plan = plan_runs(config, instances);
    let mut store = ResultStore::<R>::open(&config.store_path())?;
    let manifest = SweepManifest::new(config, instances, plan.len())?;
    let manifest_path = manifest.write(&config.output_dir)?;
    tracing::info!(
        variant = %config.variant,
        instances = instances.len(),
        runs = plan.len(),
        plan_hash = %manifest.plan_hash,
        "starting sweep"
    );

    let total = plan.len();
    for (idx, params) in plan.iter().enumerate() {
        tracing::info!("[{}/{}] running {}", idx + 1, total, params);
        let result = run_cell(config, engine, &parser, params)
            .and_then(|result| store.append_result(&result).map(|_| result))
            .map_err(|err| {
                tracing::error!(run = %params, error = %err, "sweep aborted");
                err.with_context("run", params.to_string())
            })?;
        tracing::debug!(
            mse_greedy = result.mse_greedy(),
            total_secs = result.total_secs(),
            "recorded run"
        );
    }

    tracing::info!(store = %store.path().display(), runs = store.appended(), "sweep finished");
    Ok(SweepSummary {
        variant: config.variant,
        runs: store.appended(),
        store_path: store.path().to_path_buf(),
        manifest_path,
        plan_hash: manifest.plan_hash,
    })
}

/// Invokes the engine for one cell and turns its output into a [`RunResult`].
pub fn run_cell<E: Engine + ?Sized>(
    config: &SweepConfig,
    engine: &E,
    parser: &OutputParser,
    params: &ParameterSet,
) -> Result<RunResult, LabError> {
    let command = EngineCommand::build(config, params);
    let output = execute(engine, &command)?;
    let variant = params.variant();
    let parsed = parser.parse(&output.stdout, MetricLabel::required_for(variant))?;
    let metrics = match variant {
        SweepVariant::Plain => RunMetrics::Greedy {
            mse: parsed.require(MetricLabel::MseGreedy)?,
            elapsed_secs: output.elapsed.as_secs_f64(),
        },
        SweepVariant::Tabu => RunMetrics::Tabu {
            mse_greedy: parsed.require(MetricLabel::MseGreedy)?,
            mse_tabu: parsed.require(MetricLabel::MseTabu)?,
            time_greedy: parsed.require(MetricLabel::TimeGreedy)?,
            time_tabu: parsed.require(MetricLabel::TimeTabu)?,
            time_total: parsed.require(MetricLabel::TimeTotal)?,
        },
    };
    Ok(RunResult::new(
        params.clone(),
        metrics,
        params.output_file_name(),
    ))
}
