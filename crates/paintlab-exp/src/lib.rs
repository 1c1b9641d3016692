//! Sweep orchestration and result aggregation for the stroke-painting engine.
//!
//! Control flow: [`run_sweep`] discovers instances, expands the grid, invokes
//! the engine once per cell, parses its stdout and appends one row per run to
//! the result store. [`generate_report`] later reads the store and renders
//! the Markdown tables.

pub mod aggregate;
mod discovery;
mod engine;
mod hash;
mod manifest;
pub mod markdown;
mod parse;
mod report;
mod serde;
mod stat;
mod store;
mod sweep;

pub use aggregate::{
    instance_pivots, summarize_plain, summarize_tabu, tabu_groups, InstancePivots, Pivot,
    PlainGroup, TabuGroup, TabuSummary,
};
pub use discovery::{collect_instances, is_instance_name, INSTANCE_EXTENSIONS};
pub use engine::{execute, Engine, EngineCommand, EngineOutput, ProcessEngine};
pub use hash::stable_hash_string;
pub use manifest::{SweepManifest, MANIFEST_FILE};
pub use parse::{MetricLabel, OutputParser, ParsedMetrics};
pub use report::{generate_report, render_plain_report, render_tabu_report, ReportSummary, NO_DATA};
pub use stat::{mean, sample_std, Summary};
pub use store::{check_header, read_records, PlainRecord, ResultStore, StoreRecord, TabuRecord};
pub use sweep::{plan_runs, run_cell, run_sweep, SweepSummary};

pub use crate::serde::{from_json_slice, to_canonical_json_bytes};
