use std::fs;
use std::path::PathBuf;

use paintlab_core::{LabError, SweepConfig, SweepVariant};
use tempfile::tempdir;

#[test]
fn empty_document_yields_defaults() {
    let config = SweepConfig::from_yaml_str("", SweepVariant::Tabu).expect("config");
    assert_eq!(config, SweepConfig::tabu_defaults());
}

#[test]
fn overrides_replace_only_named_fields() {
    let yaml = r#"
engine: /opt/painter/bin/painter
seeds: [1, 2, 3]
strokes: [100]
"#;
    let config = SweepConfig::from_yaml_str(yaml, SweepVariant::Plain).expect("config");
    assert_eq!(config.engine, PathBuf::from("/opt/painter/bin/painter"));
    assert_eq!(config.seeds, vec![1, 2, 3]);
    assert_eq!(config.strokes, vec![100]);
    assert_eq!(config.candidates, vec![50, 100, 150]);
    assert_eq!(config.runs_per_instance(), 9);
}

#[test]
fn tabu_overrides_parse_nested_configs() {
    let yaml = r#"
scenarios:
  - { label: tiny, strokes: 10, candidates: 5 }
tabu_configs:
  - { label: quick, title: Quick, iterations: 10, tenure: 2, neighborhood: 3 }
"#;
    let config = SweepConfig::from_yaml_str(yaml, SweepVariant::Tabu).expect("config");
    assert_eq!(config.scenarios.len(), 1);
    assert_eq!(config.scenario_title("tiny"), "tiny");
    assert_eq!(config.tabu_title("quick"), "Quick");
}

#[test]
fn empty_lists_are_rejected() {
    let err = SweepConfig::from_yaml_str("seeds: []", SweepVariant::Plain).unwrap_err();
    match err {
        LabError::Config(info) => {
            assert_eq!(info.code, "config.empty_list");
            assert_eq!(info.context["field"], "seeds");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn zero_counts_are_rejected() {
    let err = SweepConfig::from_yaml_str("candidates: [0, 50]", SweepVariant::Plain).unwrap_err();
    assert_eq!(err.info().code, "config.zero_count");
}

#[test]
fn unknown_fields_are_rejected() {
    let err = SweepConfig::from_yaml_str("strokez: [1]", SweepVariant::Plain).unwrap_err();
    assert_eq!(err.info().code, "config.parse");
}

#[test]
fn load_reads_file_and_tags_path() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("sweep.yaml");
    fs::write(&path, "output_dir: out\nreport_file: r.md\n").expect("write");
    let config = SweepConfig::load(&path, SweepVariant::Plain).expect("load");
    assert_eq!(config.report_path(), PathBuf::from("out").join("r.md"));

    fs::write(&path, "seeds: []\n").expect("write");
    let err = SweepConfig::load(&path, SweepVariant::Plain).unwrap_err();
    assert!(err.info().context.contains_key("path"));
}
