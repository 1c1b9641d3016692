use std::error::Error;
use std::path::Path;

use clap::Args;
use paintlab_core::{SweepConfig, SweepVariant};
use paintlab_exp::{check_header, collect_instances, to_canonical_json_bytes, PlainRecord, TabuRecord};
use serde::Serialize;

use super::ConfigArgs;

#[derive(Args, Debug)]
pub struct DoctorArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
    /// Emit only JSON without additional context.
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: String,
    ok: bool,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    status: String,
    variant: SweepVariant,
    checks: Vec<DoctorCheck>,
}

pub fn run(args: &DoctorArgs) -> Result<(), Box<dyn Error>> {
    let config = args.config.load()?;
    let report = diagnose(&config);
    let json = to_canonical_json_bytes(&report).map_err(|err| Box::new(err) as Box<dyn Error>)?;
    let rendered = String::from_utf8(json)?;
    if args.quiet {
        println!("{}", rendered);
    } else {
        println!("paintlab doctor status: {}", report.status);
        println!("{}", rendered);
    }
    if report.status != "ok" {
        return Err("one or more checks failed".into());
    }
    Ok(())
}

fn diagnose(config: &SweepConfig) -> DoctorReport {
    let checks = vec![
        check_config(config),
        check_engine(&config.engine),
        check_instances(&config.instances_dir),
        check_store(config),
    ];
    let status = if checks.iter().all(|check| check.ok) {
        "ok"
    } else {
        "failed"
    };
    DoctorReport {
        status: status.to_string(),
        variant: config.variant,
        checks,
    }
}

fn check_config(config: &SweepConfig) -> DoctorCheck {
    match config.validate() {
        Ok(()) => DoctorCheck {
            name: "config".to_string(),
            ok: true,
            detail: format!("{} runs per instance", config.runs_per_instance()),
        },
        Err(err) => DoctorCheck {
            name: "config".to_string(),
            ok: false,
            detail: err.to_string(),
        },
    }
}

fn check_engine(engine: &Path) -> DoctorCheck {
    let ok = engine.is_file();
    DoctorCheck {
        name: "engine".to_string(),
        ok,
        detail: if ok {
            format!("found {}", engine.display())
        } else {
            format!("missing {}", engine.display())
        },
    }
}

fn check_instances(dir: &Path) -> DoctorCheck {
    match collect_instances(dir) {
        Ok(instances) => DoctorCheck {
            name: "instances".to_string(),
            ok: true,
            detail: format!("{} instance(s) in {}", instances.len(), dir.display()),
        },
        Err(err) => DoctorCheck {
            name: "instances".to_string(),
            ok: false,
            detail: err.to_string(),
        },
    }
}

/// A missing store is fine; an existing one must carry the variant's header.
fn check_store(config: &SweepConfig) -> DoctorCheck {
    let path = config.store_path();
    let name = "store".to_string();
    let has_content = path.metadata().map(|meta| meta.len() > 0).unwrap_or(false);
    if !has_content {
        return DoctorCheck {
            name,
            ok: true,
            detail: format!("{} will be created", path.display()),
        };
    }
    let checked = match config.variant {
        SweepVariant::Plain => check_header::<PlainRecord>(&path),
        SweepVariant::Tabu => check_header::<TabuRecord>(&path),
    };
    match checked {
        Ok(has_rows) => DoctorCheck {
            name,
            ok: true,
            detail: if has_rows {
                format!("{} holds rows; a sweep appends to them", path.display())
            } else {
                format!("{} has a header and no rows", path.display())
            },
        },
        Err(err) => DoctorCheck {
            name,
            ok: false,
            detail: err.to_string(),
        },
    }
}
