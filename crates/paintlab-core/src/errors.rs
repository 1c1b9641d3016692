//! Structured error types shared across paintlab crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`LabError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (paths, parameters, captured output).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the operator resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the experiment harness.
///
/// Every variant is fatal at the point of detection; nothing in the harness
/// retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum LabError {
    /// The instance directory holds no recognised image files.
    #[error("no instances found: {0}")]
    NoInstancesFound(ErrorInfo),
    /// The engine could not be spawned or exited with a non-zero status.
    #[error("engine execution failed: {0}")]
    EngineExecutionFailed(ErrorInfo),
    /// The engine output lacks a required labelled value.
    #[error("missing metric: {0}")]
    MissingMetric(ErrorInfo),
    /// Report generation was requested before any sweep produced a store.
    #[error("missing result store: {0}")]
    MissingResultStore(ErrorInfo),
    /// An existing store carries a header that differs from the variant's.
    #[error("store schema mismatch: {0}")]
    StoreSchemaMismatch(ErrorInfo),
    /// Reading or writing store rows failed.
    #[error("store error: {0}")]
    Store(ErrorInfo),
    /// Filesystem errors outside the store.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Invalid sweep configuration.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl LabError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            LabError::NoInstancesFound(info)
            | LabError::EngineExecutionFailed(info)
            | LabError::MissingMetric(info)
            | LabError::MissingResultStore(info)
            | LabError::StoreSchemaMismatch(info)
            | LabError::Store(info)
            | LabError::Io(info)
            | LabError::Config(info)
            | LabError::Serde(info) => info,
        }
    }

    /// Adds a context entry to the payload, keeping the variant.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let info = match &mut self {
            LabError::NoInstancesFound(info)
            | LabError::EngineExecutionFailed(info)
            | LabError::MissingMetric(info)
            | LabError::MissingResultStore(info)
            | LabError::StoreSchemaMismatch(info)
            | LabError::Store(info)
            | LabError::Io(info)
            | LabError::Config(info)
            | LabError::Serde(info) => info,
        };
        info.context.insert(key.into(), value.into());
        self
    }

    /// Wraps an [`std::io::Error`] raised while touching `path`.
    pub fn io(code: &str, path: &std::path::Path, err: std::io::Error) -> Self {
        LabError::Io(
            ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
        )
    }
}
