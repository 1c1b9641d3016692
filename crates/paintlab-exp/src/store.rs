use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use paintlab_core::errors::{ErrorInfo, LabError};
use paintlab_core::{ParameterSet, RunMetrics, RunResult, SweepVariant};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Row type of a result store with a fixed header.
pub trait StoreRecord: Serialize + DeserializeOwned {
    /// Column names, in write order.
    const HEADER: &'static [&'static str];
    const VARIANT: SweepVariant;

    /// Projects a run result onto the row layout.
    fn from_result(result: &RunResult) -> Result<Self, LabError>;
}

/// Row of the greedy-only store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlainRecord {
    #[serde(rename = "instancia")]
    pub instance: String,
    pub strokes: u32,
    #[serde(rename = "candidatos")]
    pub candidates: u32,
    pub seed: u64,
    #[serde(rename = "tiempo_seg")]
    pub elapsed_secs: f64,
    pub mse: f64,
}

impl StoreRecord for PlainRecord {
    const HEADER: &'static [&'static str] =
        &["instancia", "strokes", "candidatos", "seed", "tiempo_seg", "mse"];
    const VARIANT: SweepVariant = SweepVariant::Plain;

    fn from_result(result: &RunResult) -> Result<Self, LabError> {
        match result.metrics {
            RunMetrics::Greedy { mse, elapsed_secs } => Ok(Self {
                instance: result.params.instance.clone(),
                strokes: result.params.strokes,
                candidates: result.params.candidates,
                seed: result.params.seed,
                elapsed_secs,
                mse,
            }),
            RunMetrics::Tabu { .. } => Err(variant_mismatch(Self::VARIANT, &result.params)),
        }
    }
}

/// Row of the greedy + tabu comparison store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabuRecord {
    #[serde(rename = "instancia")]
    pub instance: String,
    #[serde(rename = "escenario")]
    pub scenario: String,
    #[serde(rename = "config_tabu")]
    pub tabu_config: String,
    pub strokes: u32,
    #[serde(rename = "candidatos")]
    pub candidates: u32,
    pub seed: u64,
    pub tabu_iters: u32,
    pub tabu_tenure: u32,
    pub tabu_neigh: u32,
    pub mse_greedy: f64,
    pub mse_tabu: f64,
    #[serde(rename = "mejora_pct")]
    pub improvement_pct: f64,
    #[serde(rename = "tiempo_greedy")]
    pub time_greedy: f64,
    #[serde(rename = "tiempo_tabu")]
    pub time_tabu: f64,
    #[serde(rename = "tiempo_total")]
    pub time_total: f64,
    pub output_file: String,
}

impl StoreRecord for TabuRecord {
    const HEADER: &'static [&'static str] = &[
        "instancia",
        "escenario",
        "config_tabu",
        "strokes",
        "candidatos",
        "seed",
        "tabu_iters",
        "tabu_tenure",
        "tabu_neigh",
        "mse_greedy",
        "mse_tabu",
        "mejora_pct",
        "tiempo_greedy",
        "tiempo_tabu",
        "tiempo_total",
        "output_file",
    ];
    const VARIANT: SweepVariant = SweepVariant::Tabu;

    fn from_result(result: &RunResult) -> Result<Self, LabError> {
        let params = &result.params;
        let (mse_greedy, mse_tabu, time_greedy, time_tabu, time_total, tabu) =
            match (result.metrics, params.tabu.as_ref()) {
                (
                    RunMetrics::Tabu {
                        mse_greedy,
                        mse_tabu,
                        time_greedy,
                        time_tabu,
                        time_total,
                    },
                    Some(tabu),
                ) => (mse_greedy, mse_tabu, time_greedy, time_tabu, time_total, tabu),
                _ => return Err(variant_mismatch(Self::VARIANT, params)),
            };
        Ok(Self {
            instance: params.instance.clone(),
            scenario: params.scenario_label().to_string(),
            tabu_config: tabu.label.clone(),
            strokes: params.strokes,
            candidates: params.candidates,
            seed: params.seed,
            tabu_iters: tabu.iterations,
            tabu_tenure: tabu.tenure,
            tabu_neigh: tabu.neighborhood,
            mse_greedy,
            mse_tabu,
            improvement_pct: paintlab_core::improvement_pct(mse_greedy, mse_tabu),
            time_greedy,
            time_tabu,
            time_total,
            output_file: result.output_file.clone(),
        })
    }
}

/// Append-only CSV store. Every append is flushed before returning so an
/// interrupted sweep leaves exactly the completed rows behind.
pub struct ResultStore<R: StoreRecord> {
    path: PathBuf,
    writer: csv::Writer<File>,
    existing_rows: bool,
    appended: usize,
    _record: PhantomData<R>,
}

impl<R: StoreRecord> ResultStore<R> {
    /// Opens `path` for appending, writing the header when the file is new
    /// or empty and checking it otherwise.
    pub fn open(path: &Path) -> Result<Self, LabError> {
        ensure_parent(path)?;
        let has_content = fs::metadata(path)
            .map(|meta| meta.len() > 0)
            .unwrap_or(false);
        let mut existing_rows = false;
        let mut open_tail = false;
        if has_content {
            existing_rows = check_header::<R>(path)?;
            open_tail = !ends_with_newline(path)?;
            if open_tail && existing_rows {
                return Err(LabError::Store(
                    ErrorInfo::new("store.truncated_tail", "last store row is incomplete")
                        .with_context("path", path.display().to_string())
                        .with_hint("remove the partial last line before appending"),
                ));
            }
        }
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(|err| LabError::io("store.open", path, err))?;
        if open_tail {
            file.write_all(b"\n")
                .map_err(|err| LabError::io("store.write_header", path, err))?;
        }
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if !has_content {
            writer
                .write_record(R::HEADER)
                .map_err(|err| wrap_csv("store.write_header", path, err))?;
            flush(&mut writer, path)?;
        } else if existing_rows {
            tracing::warn!(path = %path.display(), "appending to a store that already holds rows");
        }
        Ok(Self {
            path: path.to_path_buf(),
            writer,
            existing_rows,
            appended: 0,
            _record: PhantomData,
        })
    }

    /// Serializes and flushes one row.
    pub fn append(&mut self, record: &R) -> Result<(), LabError> {
        self.writer
            .serialize(record)
            .map_err(|err| wrap_csv("store.write_row", &self.path, err))?;
        flush(&mut self.writer, &self.path)?;
        self.appended += 1;
        Ok(())
    }

    /// Projects and appends a run result.
    pub fn append_result(&mut self, result: &RunResult) -> Result<(), LabError> {
        let record = R::from_result(result)?;
        self.append(&record)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows appended through this handle.
    pub fn appended(&self) -> usize {
        self.appended
    }

    /// Whether the file already held data rows when it was opened.
    pub fn had_existing_rows(&self) -> bool {
        self.existing_rows
    }
}

/// Reads every row of the store at `path`.
///
/// A missing file is [`LabError::MissingResultStore`].
pub fn read_records<R: StoreRecord>(path: &Path) -> Result<Vec<R>, LabError> {
    if !path.is_file() {
        return Err(LabError::MissingResultStore(
            ErrorInfo::new("store.missing", "result store not found")
                .with_context("path", path.display().to_string())
                .with_hint(format!("run `paintlab sweep --variant {}` first", R::VARIANT)),
        ));
    }
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|err| wrap_csv("store.read", path, err))?;
    let headers = reader
        .headers()
        .map_err(|err| wrap_csv("store.read_header", path, err))?
        .clone();
    ensure_header::<R>(&headers, path)?;
    let mut rows = Vec::new();
    for (idx, row) in reader.deserialize::<R>().enumerate() {
        let record = row.map_err(|err| {
            LabError::Store(
                ErrorInfo::new("store.read_row", err.to_string())
                    .with_context("path", path.display().to_string())
                    .with_context("row", (idx + 1).to_string()),
            )
        })?;
        rows.push(record);
    }
    Ok(rows)
}

/// Validates the header of an existing store; returns whether data rows follow.
pub fn check_header<R: StoreRecord>(path: &Path) -> Result<bool, LabError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|err| wrap_csv("store.read", path, err))?;
    let headers = reader
        .headers()
        .map_err(|err| wrap_csv("store.read_header", path, err))?
        .clone();
    ensure_header::<R>(&headers, path)?;
    let mut probe = StringRecord::new();
    reader
        .read_record(&mut probe)
        .map_err(|err| wrap_csv("store.read_row", path, err))
}

fn ensure_header<R: StoreRecord>(headers: &StringRecord, path: &Path) -> Result<(), LabError> {
    if headers.iter().eq(R::HEADER.iter().copied()) {
        return Ok(());
    }
    Err(LabError::StoreSchemaMismatch(
        ErrorInfo::new("store.header", "store header does not match the sweep variant")
            .with_context("path", path.display().to_string())
            .with_context("variant", R::VARIANT.to_string())
            .with_context("expected", R::HEADER.join(","))
            .with_context("found", headers.iter().collect::<Vec<_>>().join(","))
            .with_hint("use a different store_file or remove the stale store"),
    ))
}

fn flush(writer: &mut csv::Writer<File>, path: &Path) -> Result<(), LabError> {
    writer
        .flush()
        .map_err(|err| LabError::io("store.flush", path, err))
}

fn ends_with_newline(path: &Path) -> Result<bool, LabError> {
    let mut file = File::open(path).map_err(|err| LabError::io("store.read", path, err))?;
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))
        .and_then(|_| file.read_exact(&mut last))
        .map_err(|err| LabError::io("store.read", path, err))?;
    Ok(last[0] == b'\n')
}

fn ensure_parent(path: &Path) -> Result<(), LabError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| LabError::io("store.create_dir", parent, err))?;
        }
    }
    Ok(())
}

fn variant_mismatch(expected: SweepVariant, params: &ParameterSet) -> LabError {
    LabError::Store(
        ErrorInfo::new("store.variant", "run result does not match the store variant")
            .with_context("expected", expected.to_string())
            .with_context("params", params.to_string()),
    )
}

fn wrap_csv(code: &str, path: &Path, err: csv::Error) -> LabError {
    LabError::Store(
        ErrorInfo::new(code, "CSV store failure")
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string()),
    )
}
