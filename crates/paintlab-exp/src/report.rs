use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use paintlab_core::errors::{ErrorInfo, LabError};
use paintlab_core::{SweepConfig, SweepVariant};

use crate::aggregate::{instance_pivots, summarize_plain, summarize_tabu, tabu_groups, TabuGroup};
use crate::markdown::{fixed, fixed_or_na, MarkdownTable};
use crate::store::{read_records, PlainRecord, StoreRecord, TabuRecord};

const PLAIN_DECIMALS: usize = 4;
const TABU_MSE_DECIMALS: usize = 2;
const TABU_TIME_DECIMALS: usize = 3;

/// Placeholder for a (scenario, configuration) pair without rows.
pub const NO_DATA: &str = "*No data available.*";

/// Where a report was written and how many rows fed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub variant: SweepVariant,
    pub path: PathBuf,
    pub rows: usize,
}

/// Reads the store named by `config`, renders the variant's report and
/// writes it in one shot.
pub fn generate_report(config: &SweepConfig) -> Result<ReportSummary, LabError> {
    let store_path = config.store_path();
    let (document, rows) = match config.variant {
        SweepVariant::Plain => {
            let records = load_non_empty::<PlainRecord>(config)?;
            (render_plain_report(&records), records.len())
        }
        SweepVariant::Tabu => {
            let records = load_non_empty::<TabuRecord>(config)?;
            (render_tabu_report(&records, config), records.len())
        }
    };
    let path = config.report_path();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| LabError::io("report.create_dir", parent, err))?;
        }
    }
    fs::write(&path, document).map_err(|err| LabError::io("report.write", &path, err))?;
    tracing::info!(
        store = %store_path.display(),
        report = %path.display(),
        rows,
        "report written"
    );
    Ok(ReportSummary {
        variant: config.variant,
        path,
        rows,
    })
}

fn load_non_empty<R: StoreRecord>(config: &SweepConfig) -> Result<Vec<R>, LabError> {
    let path = config.store_path();
    let records = read_records::<R>(&path)?;
    if records.is_empty() {
        return Err(LabError::MissingResultStore(
            ErrorInfo::new("report.empty_store", "result store holds no rows")
                .with_context("path", path.display().to_string())
                .with_hint(format!("run `paintlab sweep --variant {}` first", config.variant)),
        ));
    }
    Ok(records)
}

/// Per-instance MSE and time pivots followed by the global summary.
pub fn render_plain_report(records: &[PlainRecord]) -> String {
    let mut out = String::from("# Experiment Results (MSE and Time)\n\n");
    for pivots in instance_pivots(records) {
        let _ = write!(out, "## {}\n\n", pivots.instance);
        push_section(&mut out, "### MSE", &pivots.mse.to_table(PLAIN_DECIMALS));
        push_section(&mut out, "### Time (s)", &pivots.time.to_table(PLAIN_DECIMALS));
    }

    let mut summary = MarkdownTable::new([
        "strokes",
        "candidatos",
        "mse_mean",
        "mse_std",
        "time_mean",
        "time_std",
    ]);
    for group in summarize_plain(records) {
        summary.push_row(vec![
            group.strokes.to_string(),
            group.candidates.to_string(),
            fixed(group.mse.mean, PLAIN_DECIMALS),
            fixed_or_na(group.mse.std, PLAIN_DECIMALS),
            fixed(group.time.mean, PLAIN_DECIMALS),
            fixed_or_na(group.time.std, PLAIN_DECIMALS),
        ]);
    }
    push_section(&mut out, "## Global Summary", &summary);
    out
}

/// One table per (scenario, configuration) pair, then the global summary.
pub fn render_tabu_report(records: &[TabuRecord], config: &SweepConfig) -> String {
    let mut out = String::from("# Results Tables - Greedy + Tabu Search\n\n");
    out.push_str(
        "This document contains the result tables for each scenario and tabu search configuration.\n\n",
    );
    for group in tabu_groups(records) {
        let _ = write!(
            out,
            "## {} - Tabu {}\n\n",
            config.scenario_title(&group.scenario),
            config.tabu_title(&group.tabu_config)
        );
        if group.rows.is_empty() {
            out.push_str(NO_DATA);
        } else {
            out.push_str(&tabu_group_table(&group).render());
        }
        out.push_str("\n\n---\n\n");
    }

    let mut summary = MarkdownTable::new([
        "escenario",
        "config_tabu",
        "runs",
        "mse_greedy_mean",
        "mse_greedy_std",
        "mse_tabu_mean",
        "mse_tabu_std",
        "mejora_pct_mean",
        "mejora_pct_std",
        "tiempo_total_mean",
        "tiempo_total_std",
    ]);
    for row in summarize_tabu(records) {
        summary.push_row(vec![
            row.scenario,
            row.tabu_config,
            row.mse_greedy.count.to_string(),
            fixed(row.mse_greedy.mean, TABU_MSE_DECIMALS),
            fixed_or_na(row.mse_greedy.std, TABU_MSE_DECIMALS),
            fixed(row.mse_tabu.mean, TABU_MSE_DECIMALS),
            fixed_or_na(row.mse_tabu.std, TABU_MSE_DECIMALS),
            fixed(row.improvement_pct.mean, TABU_MSE_DECIMALS),
            fixed_or_na(row.improvement_pct.std, TABU_MSE_DECIMALS),
            fixed(row.time_total.mean, TABU_TIME_DECIMALS),
            fixed_or_na(row.time_total.std, TABU_TIME_DECIMALS),
        ]);
    }
    push_section(&mut out, "## Global Summary", &summary);
    out
}

/// Column headers carry the configuration label so tables for different
/// configurations stay distinguishable.
fn tabu_group_table(group: &TabuGroup) -> MarkdownTable {
    let cfg = &group.tabu_config;
    let mut table = MarkdownTable::new([
        "instancia".to_string(),
        "mse_greedy".to_string(),
        format!("mse_greedy+tabu_{cfg}"),
        format!("mejora_%_{cfg}"),
        "tiempo_greedy (s)".to_string(),
        format!("tiempo_tabu_{cfg} (s)"),
        format!("tiempo_total_{cfg} (s)"),
    ]);
    for row in &group.rows {
        table.push_row(vec![
            row.instance.clone(),
            fixed(row.mse_greedy, TABU_MSE_DECIMALS),
            fixed(row.mse_tabu, TABU_MSE_DECIMALS),
            format!("{}%", fixed(row.improvement_pct, TABU_MSE_DECIMALS)),
            fixed(row.time_greedy, TABU_TIME_DECIMALS),
            fixed(row.time_tabu, TABU_TIME_DECIMALS),
            fixed(row.time_total, TABU_TIME_DECIMALS),
        ]);
    }
    table
}

fn push_section(out: &mut String, heading: &str, table: &MarkdownTable) {
    out.push_str(heading);
    out.push_str("\n\n");
    out.push_str(&table.render());
    out.push_str("\n\n");
}
