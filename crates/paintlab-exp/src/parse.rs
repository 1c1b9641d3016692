//! Labelled-line extraction of metrics from the engine's stdout.

use std::collections::BTreeMap;
use std::fmt;

use paintlab_core::errors::{ErrorInfo, LabError};
use paintlab_core::SweepVariant;
use regex::Regex;

/// Metric labels the engine prints, one per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetricLabel {
    MseGreedy,
    MseTabu,
    TimeGreedy,
    TimeTabu,
    TimeTotal,
}

impl MetricLabel {
    pub const ALL: [MetricLabel; 5] = [
        MetricLabel::MseGreedy,
        MetricLabel::MseTabu,
        MetricLabel::TimeGreedy,
        MetricLabel::TimeTabu,
        MetricLabel::TimeTotal,
    ];

    /// Literal prefix printed by the engine, colon included.
    pub fn label(&self) -> &'static str {
        match self {
            MetricLabel::MseGreedy => "MSE Greedy:",
            MetricLabel::MseTabu => "MSE Tabu final:",
            MetricLabel::TimeGreedy => "Tiempo Greedy (s):",
            MetricLabel::TimeTabu => "Tiempo Tabu (s):",
            MetricLabel::TimeTotal => "Tiempo Total (s):",
        }
    }

    /// Labels a run of `variant` must report.
    pub fn required_for(variant: SweepVariant) -> &'static [MetricLabel] {
        match variant {
            SweepVariant::Plain => &[MetricLabel::MseGreedy],
            SweepVariant::Tabu => &Self::ALL,
        }
    }
}

impl fmt::Display for MetricLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().trim_end_matches(':'))
    }
}

/// Values extracted from one engine output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedMetrics {
    values: BTreeMap<MetricLabel, f64>,
}

impl ParsedMetrics {
    pub fn get(&self, label: MetricLabel) -> Option<f64> {
        self.values.get(&label).copied()
    }

    /// Value for a label that [`OutputParser::parse`] already checked.
    pub fn require(&self, label: MetricLabel) -> Result<f64, LabError> {
        self.get(label).ok_or_else(|| {
            LabError::MissingMetric(
                ErrorInfo::new("parse.missing", "metric was not extracted")
                    .with_context("labels", label.to_string()),
            )
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Compiled label patterns. Build once per sweep.
#[derive(Debug, Clone)]
pub struct OutputParser {
    patterns: Vec<(MetricLabel, Regex)>,
}

impl OutputParser {
    pub fn new() -> Result<Self, LabError> {
        let mut patterns = Vec::with_capacity(MetricLabel::ALL.len());
        for label in MetricLabel::ALL {
            let source = format!(
                r"{}\s*([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)",
                regex::escape(label.label())
            );
            let regex = Regex::new(&source).map_err(|err| {
                LabError::Config(
                    ErrorInfo::new("parse.pattern", err.to_string())
                        .with_context("label", label.to_string()),
                )
            })?;
            patterns.push((label, regex));
        }
        Ok(Self { patterns })
    }

    /// Scans `stdout` line by line. The first line carrying a label decides
    /// that label's value; every label in `required` must end up with one.
    pub fn parse(&self, stdout: &str, required: &[MetricLabel]) -> Result<ParsedMetrics, LabError> {
        let mut values = BTreeMap::new();
        let mut malformed = Vec::new();
        for line in stdout.lines() {
            for (label, regex) in &self.patterns {
                if values.contains_key(label) || malformed.contains(label) {
                    continue;
                }
                if !line.contains(label.label()) {
                    continue;
                }
                match regex
                    .captures(line)
                    .and_then(|caps| caps.get(1))
                    .and_then(|value| value.as_str().parse::<f64>().ok())
                {
                    Some(value) => {
                        values.insert(*label, value);
                    }
                    None => malformed.push(*label),
                }
            }
        }

        let missing: Vec<MetricLabel> = required
            .iter()
            .copied()
            .filter(|label| !values.contains_key(label))
            .collect();
        if !missing.is_empty() {
            let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
            let mut info = ErrorInfo::new(
                "parse.missing",
                "engine output lacks required metric lines",
            )
            .with_context("labels", names.join(", "))
            .with_context("output", stdout.trim_end().to_string());
            let unparseable: Vec<String> = missing
                .iter()
                .filter(|label| malformed.contains(label))
                .map(ToString::to_string)
                .collect();
            if !unparseable.is_empty() {
                info = info.with_context("malformed", unparseable.join(", "));
            }
            return Err(LabError::MissingMetric(info));
        }
        Ok(ParsedMetrics { values })
    }
}
