use std::path::Path;

use paintlab_core::errors::{ErrorInfo, LabError};
use walkdir::WalkDir;

/// Image extensions the engine can load, compared case-insensitively.
pub const INSTANCE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Lists the instance file names directly inside `dir`, sorted.
///
/// Fails with [`LabError::NoInstancesFound`] when the directory is missing or
/// holds no recognised image, since a sweep would have nothing to run.
pub fn collect_instances(dir: &Path) -> Result<Vec<String>, LabError> {
    if !dir.is_dir() {
        return Err(LabError::NoInstancesFound(
            ErrorInfo::new("discovery.missing_dir", "instance directory does not exist")
                .with_context("dir", dir.display().to_string())
                .with_hint("create the directory and add .png/.jpg/.jpeg images"),
        ));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(|err| {
            LabError::Io(
                ErrorInfo::new("discovery.read_dir", err.to_string())
                    .with_context("dir", dir.display().to_string()),
            )
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_instance_name(&name) {
            files.push(name);
        }
    }
    if files.is_empty() {
        return Err(LabError::NoInstancesFound(
            ErrorInfo::new("discovery.empty", "no instance images found")
                .with_context("dir", dir.display().to_string())
                .with_context("extensions", INSTANCE_EXTENSIONS.join(",")),
        ));
    }
    files.sort();
    Ok(files)
}

/// Whether `name` carries one of [`INSTANCE_EXTENSIONS`].
pub fn is_instance_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            INSTANCE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}
