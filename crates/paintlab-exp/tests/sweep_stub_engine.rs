mod common;

use std::fs;

use common::{config_in, failed, ok, tabu_stdout, StubEngine};
use paintlab_core::{LabError, SweepVariant};
use paintlab_exp::{
    generate_report, read_records, run_sweep, PlainRecord, SweepManifest, TabuRecord, NO_DATA,
};
use tempfile::tempdir;

#[test]
fn single_cell_sweep_and_report() {
    let dir = tempdir().expect("tempdir");
    let mut config = config_in(dir.path(), SweepVariant::Plain, &["a.png"]);
    config.strokes = vec![200];
    config.candidates = vec![50];
    config.seeds = vec![42];
    let engine = StubEngine::new(|_, _| ok("Instancia: x\nMSE Greedy: 10.0000\n", 250));

    let summary = run_sweep(&config, &engine).expect("sweep");
    assert_eq!(summary.runs, 1);
    let rows = read_records::<PlainRecord>(&config.store_path()).expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].mse, 10.0);
    assert_eq!(rows[0].elapsed_secs, 0.25);
    assert_eq!(rows[0].instance, "a.png");

    let report = generate_report(&config).expect("report");
    assert_eq!(report.rows, 1);
    let text = fs::read_to_string(&report.path).expect("report text");
    assert!(text.starts_with("# Experiment Results (MSE and Time)\n"));
    assert!(text.contains("## a.png\n\n### MSE\n\n| strokes | 50 |\n| --- | --- |\n| 200 | 10.0000 |\n"));
    assert!(text.contains("### Time (s)\n\n| strokes | 50 |\n| --- | --- |\n| 200 | 0.2500 |\n"));
    assert!(text.contains("| 200 | 50 | 10.0000 | NA | 0.2500 | NA |"));
}

#[test]
fn every_cell_is_invoked_once_in_order() {
    let dir = tempdir().expect("tempdir");
    let config = config_in(dir.path(), SweepVariant::Plain, &["b.png", "a.jpg", "notes.txt"]);
    let engine = StubEngine::new(|idx, _| ok(&format!("MSE Greedy: {idx}.5\n"), 1));

    let summary = run_sweep(&config, &engine).expect("sweep");
    assert_eq!(summary.runs, 18);
    assert_eq!(engine.call_count(), 18);
    let rows = read_records::<PlainRecord>(&summary.store_path).expect("rows");
    assert_eq!(rows.len(), 18);
    assert_eq!(rows[0].instance, "a.jpg");
    assert_eq!((rows[0].strokes, rows[0].candidates), (200, 50));
    assert_eq!((rows[1].strokes, rows[1].candidates), (200, 100));
    assert_eq!((rows[3].strokes, rows[3].candidates), (400, 50));
    assert_eq!(rows[9].instance, "b.png");
    for (idx, row) in rows.iter().enumerate() {
        assert_eq!(row.mse, idx as f64 + 0.5);
    }

    let manifest = SweepManifest::load(&summary.manifest_path).expect("manifest");
    assert_eq!(manifest.planned_runs, 18);
    assert_eq!(manifest.instances, vec!["a.jpg", "b.png"]);
    assert_eq!(manifest.plan_hash, summary.plan_hash);
}

#[test]
fn engine_failure_aborts_and_keeps_completed_prefix() {
    let dir = tempdir().expect("tempdir");
    let config = config_in(dir.path(), SweepVariant::Plain, &["a.png"]);
    let engine = StubEngine::new(|idx, _| {
        if idx == 3 {
            failed("[Error] No se pudo cargar el brush: brushes/1.jpg\n")
        } else {
            ok("MSE Greedy: 1.0\n", 1)
        }
    });

    let err = run_sweep(&config, &engine).unwrap_err();
    match &err {
        LabError::EngineExecutionFailed(info) => {
            assert!(info.context["stderr"].contains("brushes/1.jpg"));
            assert!(info.context["run"].contains("strokes=400"));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(engine.call_count(), 4);
    let rows = read_records::<PlainRecord>(&config.store_path()).expect("rows");
    assert_eq!(rows.len(), 3);
}

#[test]
fn missing_metric_aborts_without_partial_row() {
    let dir = tempdir().expect("tempdir");
    let config = config_in(dir.path(), SweepVariant::Plain, &["a.png"]);
    let engine = StubEngine::new(|idx, _| {
        if idx == 0 {
            ok("MSE Greedy: 2.0\n", 1)
        } else {
            ok("Guardado resultado en: x.png\n", 1)
        }
    });

    let err = run_sweep(&config, &engine).unwrap_err();
    assert!(matches!(err, LabError::MissingMetric(_)));
    assert_eq!(err.info().context["output"], "Guardado resultado en: x.png");
    assert_eq!(engine.call_count(), 2);
    let text = fs::read_to_string(config.store_path()).expect("store");
    assert_eq!(text.lines().count(), 2);
}

#[test]
fn empty_instance_dir_is_fatal_before_any_run() {
    let dir = tempdir().expect("tempdir");
    let config = config_in(dir.path(), SweepVariant::Plain, &["readme.md"]);
    let engine = StubEngine::new(|_, _| ok("MSE Greedy: 1\n", 1));
    let err = run_sweep(&config, &engine).unwrap_err();
    assert!(matches!(err, LabError::NoInstancesFound(_)));
    assert_eq!(engine.call_count(), 0);
    assert!(!config.store_path().exists());
}

#[test]
fn rerun_appends_to_existing_store() {
    let dir = tempdir().expect("tempdir");
    let mut config = config_in(dir.path(), SweepVariant::Plain, &["a.png"]);
    config.strokes = vec![200];
    config.candidates = vec![50];
    let engine = StubEngine::new(|_, _| ok("MSE Greedy: 3\n", 1));
    run_sweep(&config, &engine).expect("first");
    run_sweep(&config, &engine).expect("second");
    let text = fs::read_to_string(config.store_path()).expect("store");
    assert_eq!(text.lines().filter(|l| l.starts_with("instancia")).count(), 1);
    assert_eq!(read_records::<PlainRecord>(&config.store_path()).expect("rows").len(), 2);
}

#[test]
fn tabu_sweep_uses_engine_timings() {
    let dir = tempdir().expect("tempdir");
    let config = config_in(dir.path(), SweepVariant::Tabu, &["a.png"]);
    let engine = StubEngine::new(|_, command| {
        let args: Vec<String> = command
            .args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert!(args.contains(&"--tabu-tenure".to_string()));
        ok(&tabu_stdout(100.0, 80.0), 9_999)
    });

    let summary = run_sweep(&config, &engine).expect("sweep");
    assert_eq!(summary.runs, 6);
    let rows = read_records::<TabuRecord>(&summary.store_path).expect("rows");
    assert_eq!(rows.len(), 6);
    let first = &rows[0];
    assert_eq!(first.scenario, "mala_solucion_inicial");
    assert_eq!(first.tabu_config, "moderado");
    assert_eq!((first.tabu_iters, first.tabu_tenure, first.tabu_neigh), (300, 15, 25));
    assert!((first.improvement_pct - 20.0).abs() < 1e-9);
    assert_eq!(first.time_total, 1.75);
    assert_eq!(first.output_file, "a_s200_c50_tabu_moderado_seed42.png");

    let report = generate_report(&config).expect("report");
    let text = fs::read_to_string(report.path).expect("text");
    assert!(text.contains("## Scenario 1: Poor Initial Solution - Tabu Moderate"));
    assert!(text.contains("| a.png | 100.00 | 80.00 | 20.00% | 0.500 | 1.250 | 1.750 |"));
    assert!(!text.contains(NO_DATA));
}

#[test]
fn tabu_sweep_requires_all_labels() {
    let dir = tempdir().expect("tempdir");
    let config = config_in(dir.path(), SweepVariant::Tabu, &["a.png"]);
    let engine = StubEngine::new(|_, _| ok("MSE Greedy: 5\nMSE Tabu final: 4\n", 1));
    let err = run_sweep(&config, &engine).unwrap_err();
    assert!(matches!(err, LabError::MissingMetric(_)));
    assert!(err.info().context["labels"].contains("Tiempo Total (s)"));
}

#[test]
fn report_without_store_is_missing_result_store() {
    let dir = tempdir().expect("tempdir");
    let config = config_in(dir.path(), SweepVariant::Plain, &[]);
    let err = generate_report(&config).unwrap_err();
    assert!(matches!(err, LabError::MissingResultStore(_)));
    assert!(!config.report_path().exists());
}
