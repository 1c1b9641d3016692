use paintlab_core::errors::{ErrorInfo, LabError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("instance", "a.png")
        .with_context("seed", "42")
}

#[test]
fn no_instances_surface() {
    let err = LabError::NoInstancesFound(sample_info("discovery.empty", "nothing to run"));
    assert_eq!(err.info().code, "discovery.empty");
    assert!(err.to_string().starts_with("no instances found"));
}

#[test]
fn engine_failure_surface_keeps_stderr() {
    let err = LabError::EngineExecutionFailed(
        ErrorInfo::new("engine.exit", "engine exited with status 1")
            .with_context("stderr", "[Error] boom"),
    );
    assert_eq!(err.info().context["stderr"], "[Error] boom");
    assert!(err.to_string().contains("stderr=[Error] boom"));
}

#[test]
fn missing_metric_surface() {
    let err = LabError::MissingMetric(sample_info("parse.missing", "label absent"));
    assert_eq!(err.info().code, "parse.missing");
    assert!(err.info().context.contains_key("instance"));
}

#[test]
fn missing_store_surface_renders_hint() {
    let err = LabError::MissingResultStore(
        ErrorInfo::new("report.store", "store not found").with_hint("run a sweep first"),
    );
    assert!(err.to_string().ends_with("| hint: run a sweep first"));
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = LabError::Config(ErrorInfo::new("config.empty_list", "empty"));
    let json = serde_json::to_value(&err).expect("json");
    assert_eq!(json["family"], "Config");
    assert_eq!(json["detail"]["code"], "config.empty_list");
}
