//! Outcome records produced once per completed engine invocation.

use serde::{Deserialize, Serialize};

use crate::params::{ParameterSet, SweepVariant};

/// Metrics reported for one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RunMetrics {
    /// Greedy-only run timed by the harness.
    Greedy {
        /// Final greedy MSE.
        mse: f64,
        /// Wall-clock seconds measured around the engine process.
        elapsed_secs: f64,
    },
    /// Greedy run refined by tabu search, timed by the engine itself.
    Tabu {
        /// MSE after the greedy phase.
        mse_greedy: f64,
        /// MSE after tabu refinement.
        mse_tabu: f64,
        /// Seconds spent in the greedy phase.
        time_greedy: f64,
        /// Seconds spent in the tabu phase.
        time_tabu: f64,
        /// Total seconds reported by the engine.
        time_total: f64,
    },
}

/// One immutable outcome record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Cell that produced the result.
    pub params: ParameterSet,
    /// Parsed or measured metrics.
    pub metrics: RunMetrics,
    /// Output image file name written by the engine.
    pub output_file: String,
}

impl RunResult {
    /// Creates a result record.
    pub fn new(params: ParameterSet, metrics: RunMetrics, output_file: impl Into<String>) -> Self {
        Self {
            params,
            metrics,
            output_file: output_file.into(),
        }
    }

    /// Variant implied by the metrics payload.
    pub fn variant(&self) -> SweepVariant {
        match self.metrics {
            RunMetrics::Greedy { .. } => SweepVariant::Plain,
            RunMetrics::Tabu { .. } => SweepVariant::Tabu,
        }
    }

    /// Greedy MSE, present for every variant.
    pub fn mse_greedy(&self) -> f64 {
        match self.metrics {
            RunMetrics::Greedy { mse, .. } => mse,
            RunMetrics::Tabu { mse_greedy, .. } => mse_greedy,
        }
    }

    /// Total wall time of the run.
    pub fn total_secs(&self) -> f64 {
        match self.metrics {
            RunMetrics::Greedy { elapsed_secs, .. } => elapsed_secs,
            RunMetrics::Tabu { time_total, .. } => time_total,
        }
    }

    /// Tabu improvement over greedy in percent; `None` for greedy-only runs.
    pub fn improvement_pct(&self) -> Option<f64> {
        match self.metrics {
            RunMetrics::Greedy { .. } => None,
            RunMetrics::Tabu {
                mse_greedy,
                mse_tabu,
                ..
            } => Some(improvement_pct(mse_greedy, mse_tabu)),
        }
    }
}

/// Relative MSE reduction `(greedy - tabu) / greedy * 100`.
///
/// Defined as `0.0` whenever the greedy MSE is not positive.
pub fn improvement_pct(mse_greedy: f64, mse_tabu: f64) -> f64 {
    if mse_greedy > 0.0 {
        (mse_greedy - mse_tabu) / mse_greedy * 100.0
    } else {
        0.0
    }
}
