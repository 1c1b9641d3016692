//! Immutable sweep configuration.
//!
//! The grid is passed explicitly into the sweep driver and the reporter; there
//! is no process-wide state. Defaults reproduce the reference experiment
//! layout (`instancias/` in, `resultados*/` out, `./painter.exe` engine).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, LabError};
use crate::params::{Scenario, SweepVariant, TabuConfig};

/// Full description of one sweep and of where its artefacts live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Which grid to sweep.
    pub variant: SweepVariant,
    /// Directory scanned for instance images.
    pub instances_dir: PathBuf,
    /// Directory receiving the store, report, manifest and rendered images.
    pub output_dir: PathBuf,
    /// Engine executable.
    pub engine: PathBuf,
    /// Store file name inside `output_dir`.
    pub store_file: String,
    /// Report file name inside `output_dir`.
    pub report_file: String,
    /// Seeds repeated for every cell, innermost loop.
    pub seeds: Vec<u64>,
    /// Stroke counts (plain variant).
    #[serde(default)]
    pub strokes: Vec<u32>,
    /// Candidate pool sizes (plain variant).
    #[serde(default)]
    pub candidates: Vec<u32>,
    /// Scenarios (tabu variant).
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
    /// Tabu configurations (tabu variant).
    #[serde(default)]
    pub tabu_configs: Vec<TabuConfig>,
}

impl SweepConfig {
    /// Default greedy-only grid: strokes {200, 400, 600} x candidates {50, 100, 150}.
    pub fn plain_defaults() -> Self {
        Self {
            variant: SweepVariant::Plain,
            instances_dir: PathBuf::from("instancias"),
            output_dir: PathBuf::from("resultados"),
            engine: PathBuf::from("./painter.exe"),
            store_file: "experimentos.csv".into(),
            report_file: "tables.md".into(),
            seeds: vec![42],
            strokes: vec![200, 400, 600],
            candidates: vec![50, 100, 150],
            scenarios: Vec::new(),
            tabu_configs: Vec::new(),
        }
    }

    /// Default tabu comparison: three scenarios x two tabu configurations.
    pub fn tabu_defaults() -> Self {
        Self {
            variant: SweepVariant::Tabu,
            instances_dir: PathBuf::from("instancias"),
            output_dir: PathBuf::from("resultados_tabu"),
            engine: PathBuf::from("./painter.exe"),
            store_file: "experimentos_tabu.csv".into(),
            report_file: "tablas.md".into(),
            seeds: vec![42],
            strokes: Vec::new(),
            candidates: Vec::new(),
            scenarios: vec![
                Scenario::new(
                    "mala_solucion_inicial",
                    "Scenario 1: Poor Initial Solution",
                    200,
                    50,
                ),
                Scenario::new(
                    "solucion_inicial_moderada",
                    "Scenario 2: Moderate Initial Solution",
                    400,
                    100,
                ),
                Scenario::new(
                    "buena_solucion_inicial",
                    "Scenario 3: Good Initial Solution",
                    600,
                    150,
                ),
            ],
            tabu_configs: vec![
                TabuConfig::new("moderado", "Moderate", 300, 15, 25),
                TabuConfig::new("intensivo", "Intensive", 1000, 30, 50),
            ],
        }
    }

    /// Defaults for the requested variant.
    pub fn defaults(variant: SweepVariant) -> Self {
        match variant {
            SweepVariant::Plain => Self::plain_defaults(),
            SweepVariant::Tabu => Self::tabu_defaults(),
        }
    }

    /// Loads a YAML override file on top of the variant defaults.
    pub fn load(path: &Path, variant: SweepVariant) -> Result<Self, LabError> {
        let raw = fs::read_to_string(path).map_err(|err| LabError::io("config.read", path, err))?;
        Self::from_yaml_str(&raw, variant).map_err(|err| match err {
            LabError::Config(info) => {
                LabError::Config(info.with_context("path", path.display().to_string()))
            }
            other => other,
        })
    }

    /// Parses a YAML override document on top of the variant defaults.
    pub fn from_yaml_str(raw: &str, variant: SweepVariant) -> Result<Self, LabError> {
        let overrides: ConfigOverrides = if raw.trim().is_empty() {
            ConfigOverrides::default()
        } else {
            serde_yaml::from_str(raw).map_err(|err| {
                LabError::Config(ErrorInfo::new("config.parse", err.to_string()))
            })?
        };
        let config = overrides.apply(Self::defaults(variant));
        config.validate()?;
        Ok(config)
    }

    /// Checks the grid is non-empty and every count is positive.
    pub fn validate(&self) -> Result<(), LabError> {
        require_non_empty("seeds", self.seeds.len())?;
        match self.variant {
            SweepVariant::Plain => {
                require_non_empty("strokes", self.strokes.len())?;
                require_non_empty("candidates", self.candidates.len())?;
                require_positive("strokes", self.strokes.iter().copied())?;
                require_positive("candidates", self.candidates.iter().copied())?;
            }
            SweepVariant::Tabu => {
                require_non_empty("scenarios", self.scenarios.len())?;
                require_non_empty("tabu_configs", self.tabu_configs.len())?;
                require_positive(
                    "scenarios.strokes",
                    self.scenarios.iter().map(|s| s.strokes),
                )?;
                require_positive(
                    "scenarios.candidates",
                    self.scenarios.iter().map(|s| s.candidates),
                )?;
                for tabu in &self.tabu_configs {
                    if tabu.label.trim().is_empty() {
                        return Err(LabError::Config(ErrorInfo::new(
                            "config.tabu_label",
                            "tabu configuration label cannot be empty",
                        )));
                    }
                    require_file_safe("tabu_configs.label", &tabu.label)?;
                }
                for scenario in &self.scenarios {
                    require_file_safe("scenarios.label", &scenario.label)?;
                }
            }
        }
        if self.store_file.trim().is_empty() || self.report_file.trim().is_empty() {
            return Err(LabError::Config(ErrorInfo::new(
                "config.file_name",
                "store and report file names cannot be empty",
            )));
        }
        Ok(())
    }

    /// Path of the result store.
    pub fn store_path(&self) -> PathBuf {
        self.output_dir.join(&self.store_file)
    }

    /// Path of the Markdown report.
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_file)
    }

    /// Number of runs the grid expands to for `instances` inputs.
    pub fn runs_per_instance(&self) -> usize {
        let cells = match self.variant {
            SweepVariant::Plain => self.strokes.len() * self.candidates.len(),
            SweepVariant::Tabu => self.scenarios.len() * self.tabu_configs.len(),
        };
        cells * self.seeds.len()
    }

    /// Report title for a scenario label, falling back to the label itself.
    pub fn scenario_title<'a>(&'a self, label: &'a str) -> &'a str {
        self.scenarios
            .iter()
            .find(|scenario| scenario.label == label)
            .map(Scenario::display_title)
            .unwrap_or(label)
    }

    /// Report title for a tabu configuration label, falling back to the label.
    pub fn tabu_title<'a>(&'a self, label: &'a str) -> &'a str {
        self.tabu_configs
            .iter()
            .find(|tabu| tabu.label == label)
            .map(TabuConfig::display_title)
            .unwrap_or(label)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigOverrides {
    instances_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    engine: Option<PathBuf>,
    store_file: Option<String>,
    report_file: Option<String>,
    seeds: Option<Vec<u64>>,
    strokes: Option<Vec<u32>>,
    candidates: Option<Vec<u32>>,
    scenarios: Option<Vec<Scenario>>,
    tabu_configs: Option<Vec<TabuConfig>>,
}

impl ConfigOverrides {
    fn apply(self, mut base: SweepConfig) -> SweepConfig {
        if let Some(value) = self.instances_dir {
            base.instances_dir = value;
        }
        if let Some(value) = self.output_dir {
            base.output_dir = value;
        }
        if let Some(value) = self.engine {
            base.engine = value;
        }
        if let Some(value) = self.store_file {
            base.store_file = value;
        }
        if let Some(value) = self.report_file {
            base.report_file = value;
        }
        if let Some(value) = self.seeds {
            base.seeds = value;
        }
        if let Some(value) = self.strokes {
            base.strokes = value;
        }
        if let Some(value) = self.candidates {
            base.candidates = value;
        }
        if let Some(value) = self.scenarios {
            base.scenarios = value;
        }
        if let Some(value) = self.tabu_configs {
            base.tabu_configs = value;
        }
        base
    }
}

fn require_non_empty(field: &str, len: usize) -> Result<(), LabError> {
    if len == 0 {
        return Err(LabError::Config(
            ErrorInfo::new("config.empty_list", "parameter list cannot be empty")
                .with_context("field", field),
        ));
    }
    Ok(())
}

fn require_positive(field: &str, mut values: impl Iterator<Item = u32>) -> Result<(), LabError> {
    if values.any(|value| value == 0) {
        return Err(LabError::Config(
            ErrorInfo::new("config.zero_count", "counts must be positive")
                .with_context("field", field),
        ));
    }
    Ok(())
}

/// Labels end up inside output image file names.
fn require_file_safe(field: &str, label: &str) -> Result<(), LabError> {
    if label.contains(['/', '\\']) || label.contains("..") {
        return Err(LabError::Config(
            ErrorInfo::new("config.label", "label must not contain path separators or `..`")
                .with_context("field", field)
                .with_context("label", label),
        ));
    }
    Ok(())
}
