use serde::{Deserialize, Serialize};

/// Mean and sample standard deviation of one metric within a group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator); `None` below two values.
    pub std: Option<f64>,
}

impl Summary {
    /// Summarises `values`; `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mean = mean(values)?;
        Some(Self {
            count: values.len(),
            mean,
            std: sample_std(values),
        })
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}
