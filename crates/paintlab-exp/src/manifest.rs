use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use paintlab_core::errors::LabError;
use paintlab_core::{SweepConfig, SweepVariant};
use serde::{Deserialize, Serialize};

use crate::hash::stable_hash_string;
use crate::serde::{from_json_slice, to_canonical_json_bytes};

/// File name of the manifest inside the output directory.
pub const MANIFEST_FILE: &str = "sweep_manifest.json";

/// Informational record of what a sweep was asked to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepManifest {
    pub variant: SweepVariant,
    /// SHA-256 over (variant, config, instances); equal for equal plans.
    pub plan_hash: String,
    pub planned_runs: usize,
    pub instances: Vec<String>,
    pub config: SweepConfig,
    pub created_at: String,
}

impl SweepManifest {
    pub fn new(config: &SweepConfig, instances: &[String], planned_runs: usize) -> Result<Self, LabError> {
        let plan_hash = stable_hash_string(&(config.variant, config, instances))?;
        Ok(Self {
            variant: config.variant,
            plan_hash,
            planned_runs,
            instances: instances.to_vec(),
            config: config.clone(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        })
    }

    /// Writes the manifest to `dir`, replacing any previous one.
    pub fn write(&self, dir: &Path) -> Result<PathBuf, LabError> {
        let path = dir.join(MANIFEST_FILE);
        let bytes = to_canonical_json_bytes(self)?;
        fs::write(&path, bytes).map_err(|err| LabError::io("manifest.write", &path, err))?;
        Ok(path)
    }

    pub fn load(path: &Path) -> Result<Self, LabError> {
        let bytes = fs::read(path).map_err(|err| LabError::io("manifest.read", path, err))?;
        from_json_slice(&bytes)
    }
}
