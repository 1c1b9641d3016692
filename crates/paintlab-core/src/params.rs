//! Experiment cell descriptors produced by the sweep driver.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, LabError};

/// Selects which grid is swept and which metrics the engine must report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepVariant {
    /// Greedy placement only; elapsed time is measured by the harness.
    Plain,
    /// Greedy placement followed by tabu refinement; timings come from the engine.
    Tabu,
}

impl SweepVariant {
    /// Stable lowercase name used on the command line and in manifests.
    pub fn as_str(&self) -> &'static str {
        match self {
            SweepVariant::Plain => "plain",
            SweepVariant::Tabu => "tabu",
        }
    }
}

impl fmt::Display for SweepVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SweepVariant {
    type Err = LabError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(SweepVariant::Plain),
            "tabu" => Ok(SweepVariant::Tabu),
            other => Err(LabError::Config(
                ErrorInfo::new("config.variant", "unknown sweep variant")
                    .with_context("value", other)
                    .with_hint("expected `plain` or `tabu`"),
            )),
        }
    }
}

/// Named (stroke count, candidate pool size) pair representing an
/// initial-solution quality tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Machine label stored in the result store.
    pub label: String,
    /// Heading used in reports; falls back to the label when empty.
    #[serde(default)]
    pub title: String,
    /// Number of strokes placed by the greedy phase.
    pub strokes: u32,
    /// Candidates evaluated per placement decision.
    pub candidates: u32,
}

impl Scenario {
    /// Creates a scenario descriptor.
    pub fn new(label: impl Into<String>, title: impl Into<String>, strokes: u32, candidates: u32) -> Self {
        Self {
            label: label.into(),
            title: title.into(),
            strokes,
            candidates,
        }
    }

    /// Report heading for the scenario.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.label
        } else {
            &self.title
        }
    }
}

/// Named bundle of tabu-search parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabuConfig {
    /// Machine label stored in the result store and used in column headers.
    pub label: String,
    /// Heading used in reports; falls back to the label when empty.
    #[serde(default)]
    pub title: String,
    /// Maximum tabu iterations.
    pub iterations: u32,
    /// Number of iterations a move stays tabu.
    pub tenure: u32,
    /// Neighbours sampled per iteration.
    pub neighborhood: u32,
}

impl TabuConfig {
    /// Creates a tabu configuration descriptor.
    pub fn new(
        label: impl Into<String>,
        title: impl Into<String>,
        iterations: u32,
        tenure: u32,
        neighborhood: u32,
    ) -> Self {
        Self {
            label: label.into(),
            title: title.into(),
            iterations,
            tenure,
            neighborhood,
        }
    }

    /// Report heading for the configuration.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.label
        } else {
            &self.title
        }
    }
}

/// One experiment cell. Built by the sweep driver and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Instance file name relative to the instance directory.
    pub instance: String,
    /// Number of strokes to place.
    pub strokes: u32,
    /// Greedy candidate pool size.
    pub candidates: u32,
    /// Engine random seed.
    pub seed: u64,
    /// Scenario label, present for tabu sweeps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
    /// Tabu configuration, present for tabu sweeps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tabu: Option<TabuConfig>,
}

impl ParameterSet {
    /// Cell for a plain greedy sweep.
    pub fn plain(instance: impl Into<String>, strokes: u32, candidates: u32, seed: u64) -> Self {
        Self {
            instance: instance.into(),
            strokes,
            candidates,
            seed,
            scenario: None,
            tabu: None,
        }
    }

    /// Cell for a greedy + tabu sweep.
    pub fn tabu(instance: impl Into<String>, scenario: &Scenario, tabu: &TabuConfig, seed: u64) -> Self {
        Self {
            instance: instance.into(),
            strokes: scenario.strokes,
            candidates: scenario.candidates,
            seed,
            scenario: Some(scenario.label.clone()),
            tabu: Some(tabu.clone()),
        }
    }

    /// Variant implied by the presence of a tabu configuration.
    pub fn variant(&self) -> SweepVariant {
        if self.tabu.is_some() {
            SweepVariant::Tabu
        } else {
            SweepVariant::Plain
        }
    }

    /// Scenario label, or an empty string for plain cells.
    pub fn scenario_label(&self) -> &str {
        self.scenario.as_deref().unwrap_or_default()
    }

    /// Deterministic output image name. Two cells collide only when every
    /// parameter that reaches the engine is identical.
    pub fn output_file_name(&self) -> String {
        let stem = Path::new(&self.instance)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.instance.clone());
        match &self.tabu {
            Some(tabu) => format!(
                "{stem}_s{}_c{}_tabu_{}_seed{}.png",
                self.strokes, self.candidates, tabu.label, self.seed
            ),
            None => format!(
                "{stem}_s{}_c{}_seed{}.png",
                self.strokes, self.candidates, self.seed
            ),
        }
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.instance)?;
        if let Some(scenario) = &self.scenario {
            write!(f, " | scenario={scenario}")?;
        }
        write!(f, " | strokes={} | cand={}", self.strokes, self.candidates)?;
        if let Some(tabu) = &self.tabu {
            write!(f, " | tabu={}", tabu.label)?;
        }
        write!(f, " | seed={}", self.seed)
    }
}
