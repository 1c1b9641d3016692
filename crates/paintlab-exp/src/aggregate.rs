//! Read-only views derived from a completed store. Recomputed on every
//! report and never persisted.

use std::collections::{BTreeMap, BTreeSet};

use crate::markdown::{fixed_or_blank, MarkdownTable};
use crate::stat::Summary;
use crate::store::{PlainRecord, TabuRecord};

/// Cross-tabulation of one metric: rows are stroke counts, columns are
/// candidate pool sizes, cells are the mean over repeated seeds.
#[derive(Debug, Clone, PartialEq)]
pub struct Pivot {
    pub rows: Vec<u32>,
    pub columns: Vec<u32>,
    cells: BTreeMap<(u32, u32), f64>,
}

impl Pivot {
    /// Builds a pivot over `records` with the given column universe.
    pub fn build<'a, I, F>(records: I, columns: &[u32], value: F) -> Self
    where
        I: IntoIterator<Item = &'a PlainRecord>,
        F: Fn(&PlainRecord) -> f64,
    {
        let mut samples: BTreeMap<(u32, u32), Vec<f64>> = BTreeMap::new();
        let mut rows = BTreeSet::new();
        for record in records {
            rows.insert(record.strokes);
            samples
                .entry((record.strokes, record.candidates))
                .or_default()
                .push(value(record));
        }
        let cells = samples
            .into_iter()
            .filter_map(|(key, values)| Summary::from_values(&values).map(|s| (key, s.mean)))
            .collect();
        let mut columns = columns.to_vec();
        columns.sort_unstable();
        columns.dedup();
        Self {
            rows: rows.into_iter().collect(),
            columns,
            cells,
        }
    }

    pub fn get(&self, strokes: u32, candidates: u32) -> Option<f64> {
        self.cells.get(&(strokes, candidates)).copied()
    }

    /// Table with a leading `strokes` column; unobserved cells stay blank.
    pub fn to_table(&self, decimals: usize) -> MarkdownTable {
        let mut headers = vec!["strokes".to_string()];
        headers.extend(self.columns.iter().map(ToString::to_string));
        let mut table = MarkdownTable::new(headers);
        for &strokes in &self.rows {
            let mut row = vec![strokes.to_string()];
            row.extend(
                self.columns
                    .iter()
                    .map(|&candidates| fixed_or_blank(self.get(strokes, candidates), decimals)),
            );
            table.push_row(row);
        }
        table
    }
}

/// MSE and time pivots for one instance.
#[derive(Debug, Clone, PartialEq)]
pub struct InstancePivots {
    pub instance: String,
    pub mse: Pivot,
    pub time: Pivot,
}

/// One pivot pair per instance, in order of first appearance in the store.
/// Columns span every candidate value present anywhere in the store.
pub fn instance_pivots(records: &[PlainRecord]) -> Vec<InstancePivots> {
    let columns: Vec<u32> = records
        .iter()
        .map(|r| r.candidates)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let mut order: Vec<&str> = Vec::new();
    for record in records {
        if !order.contains(&record.instance.as_str()) {
            order.push(&record.instance);
        }
    }
    order
        .into_iter()
        .map(|instance| {
            let subset: Vec<&PlainRecord> =
                records.iter().filter(|r| r.instance == instance).collect();
            InstancePivots {
                instance: instance.to_string(),
                mse: Pivot::build(subset.iter().copied(), &columns, |r| r.mse),
                time: Pivot::build(subset.iter().copied(), &columns, |r| r.elapsed_secs),
            }
        })
        .collect()
}

/// Global summary row for one (strokes, candidates) group.
#[derive(Debug, Clone, PartialEq)]
pub struct PlainGroup {
    pub strokes: u32,
    pub candidates: u32,
    pub mse: Summary,
    pub time: Summary,
}

/// Groups by (strokes, candidates), ascending.
pub fn summarize_plain(records: &[PlainRecord]) -> Vec<PlainGroup> {
    let mut groups: BTreeMap<(u32, u32), (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for record in records {
        let entry = groups.entry((record.strokes, record.candidates)).or_default();
        entry.0.push(record.mse);
        entry.1.push(record.elapsed_secs);
    }
    groups
        .into_iter()
        .filter_map(|((strokes, candidates), (mse, time))| {
            Some(PlainGroup {
                strokes,
                candidates,
                mse: Summary::from_values(&mse)?,
                time: Summary::from_values(&time)?,
            })
        })
        .collect()
}

/// Rows for one (scenario, tabu configuration) pair, sorted by instance.
#[derive(Debug, Clone, PartialEq)]
pub struct TabuGroup {
    pub scenario: String,
    pub tabu_config: String,
    pub rows: Vec<TabuRecord>,
}

/// Every combination of observed scenario and configuration labels, both
/// ascending. Combinations without rows are kept with an empty `rows`.
pub fn tabu_groups(records: &[TabuRecord]) -> Vec<TabuGroup> {
    let scenarios: BTreeSet<&str> = records.iter().map(|r| r.scenario.as_str()).collect();
    let configs: BTreeSet<&str> = records.iter().map(|r| r.tabu_config.as_str()).collect();
    let mut groups = Vec::with_capacity(scenarios.len() * configs.len());
    for scenario in &scenarios {
        for config in &configs {
            let mut rows: Vec<TabuRecord> = records
                .iter()
                .filter(|r| r.scenario == *scenario && r.tabu_config == *config)
                .cloned()
                .collect();
            rows.sort_by(|a, b| a.instance.cmp(&b.instance));
            groups.push(TabuGroup {
                scenario: scenario.to_string(),
                tabu_config: config.to_string(),
                rows,
            });
        }
    }
    groups
}

/// Global summary row for one (scenario, configuration) group.
#[derive(Debug, Clone, PartialEq)]
pub struct TabuSummary {
    pub scenario: String,
    pub tabu_config: String,
    pub mse_greedy: Summary,
    pub mse_tabu: Summary,
    pub improvement_pct: Summary,
    pub time_total: Summary,
}

pub fn summarize_tabu(records: &[TabuRecord]) -> Vec<TabuSummary> {
    tabu_groups(records)
        .into_iter()
        .filter_map(|group| {
            let column = |f: fn(&TabuRecord) -> f64| -> Vec<f64> { group.rows.iter().map(f).collect() };
            Some(TabuSummary {
                mse_greedy: Summary::from_values(&column(|r| r.mse_greedy))?,
                mse_tabu: Summary::from_values(&column(|r| r.mse_tabu))?,
                improvement_pct: Summary::from_values(&column(|r| r.improvement_pct))?,
                time_total: Summary::from_values(&column(|r| r.time_total))?,
                scenario: group.scenario,
                tabu_config: group.tabu_config,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(instance: &str, strokes: u32, candidates: u32, seed: u64, mse: f64) -> PlainRecord {
        PlainRecord {
            instance: instance.into(),
            strokes,
            candidates,
            seed,
            elapsed_secs: 1.0,
            mse,
        }
    }

    #[test]
    fn pivot_has_one_row_per_stroke_value() {
        let records = vec![plain("a.png", 200, 50, 42, 10.0), plain("a.png", 400, 50, 42, 8.0)];
        let pivots = instance_pivots(&records);
        assert_eq!(pivots.len(), 1);
        let table = pivots[0].mse.to_table(4);
        assert_eq!(table.headers(), ["strokes", "50"]);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[1], vec!["400", "8.0000"]);
    }

    #[test]
    fn pivot_cells_average_seeds_and_leave_gaps_blank() {
        let records = vec![
            plain("a.png", 200, 50, 1, 10.0),
            plain("a.png", 200, 50, 2, 20.0),
            plain("b.png", 200, 100, 1, 5.0),
        ];
        let pivots = instance_pivots(&records);
        assert_eq!(pivots[0].mse.get(200, 50), Some(15.0));
        let rows = pivots[0].mse.to_table(4).rows().to_vec();
        assert_eq!(rows, vec![vec!["200", "15.0000", ""]]);
        assert_eq!(pivots[1].instance, "b.png");
    }

    #[test]
    fn instance_order_follows_first_appearance() {
        let records = vec![
            plain("z.png", 200, 50, 1, 1.0),
            plain("a.png", 200, 50, 1, 1.0),
            plain("z.png", 400, 50, 1, 1.0),
        ];
        let order: Vec<String> = instance_pivots(&records).into_iter().map(|p| p.instance).collect();
        assert_eq!(order, vec!["z.png", "a.png"]);
    }

    #[test]
    fn summary_groups_sorted_by_strokes_then_candidates() {
        let records = vec![
            plain("a.png", 400, 50, 1, 4.0),
            plain("a.png", 200, 100, 1, 2.0),
            plain("b.png", 200, 100, 1, 6.0),
        ];
        let groups = summarize_plain(&records);
        assert_eq!((groups[0].strokes, groups[0].candidates), (200, 100));
        assert_eq!(groups[0].mse.mean, 4.0);
        assert_eq!(groups[0].mse.count, 2);
        assert!(groups[1].mse.std.is_none());
    }

    fn tabu(instance: &str, scenario: &str, config: &str, greedy: f64, tabu: f64) -> TabuRecord {
        TabuRecord {
            instance: instance.into(),
            scenario: scenario.into(),
            tabu_config: config.into(),
            strokes: 200,
            candidates: 50,
            seed: 42,
            tabu_iters: 300,
            tabu_tenure: 15,
            tabu_neigh: 25,
            mse_greedy: greedy,
            mse_tabu: tabu,
            improvement_pct: paintlab_core::improvement_pct(greedy, tabu),
            time_greedy: 1.0,
            time_tabu: 2.0,
            time_total: 3.0,
            output_file: format!("{instance}.png"),
        }
    }

    #[test]
    fn tabu_groups_cover_every_label_pair() {
        let records = vec![
            tabu("b.png", "s1", "moderado", 10.0, 8.0),
            tabu("a.png", "s1", "moderado", 10.0, 9.0),
            tabu("a.png", "s2", "intensivo", 10.0, 5.0),
        ];
        let groups = tabu_groups(&records);
        let keys: Vec<(&str, &str, usize)> = groups
            .iter()
            .map(|g| (g.scenario.as_str(), g.tabu_config.as_str(), g.rows.len()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("s1", "intensivo", 0),
                ("s1", "moderado", 2),
                ("s2", "intensivo", 1),
                ("s2", "moderado", 0),
            ]
        );
        assert_eq!(groups[1].rows[0].instance, "a.png");
        assert_eq!(summarize_tabu(&records).len(), 2);
    }
}
