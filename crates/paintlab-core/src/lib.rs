#![deny(missing_docs)]
#![doc = "Core types, structured errors and sweep configuration for the paintlab experiment harness."]

pub mod config;
pub mod errors;
pub mod params;
pub mod result;

pub use config::SweepConfig;
pub use errors::{ErrorInfo, LabError};
pub use params::{ParameterSet, Scenario, SweepVariant, TabuConfig};
pub use result::{improvement_pct, RunMetrics, RunResult};
