//! Provenance sidecars: `<run>.provenance.json` next to every run record,
//! so a result file can always be traced back to code and parameters.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Run parameters recorded in the sidecar.
pub struct Payload {
    pub params: Value,
}

impl Payload {
    pub fn new(params: Value) -> Self {
        Self { params }
    }
}

/// Write the sidecar for `record` and return its path. The directory is
/// expected to exist already (the run checked it before solving).
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(record: P, payload: Payload) -> Result<PathBuf> {
    let record = record.as_ref();
    let path = sidecar_path(record);
    let callsite = Location::caller();
    let doc = json!({
        "code_rev": current_git_rev(),
        "version": projection::VERSION,
        "callsite": { "file": callsite.file(), "line": callsite.line() },
        "params": payload.params,
        "outputs": [record.to_string_lossy()]
    });
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), "provenance sidecar written");
    Ok(path)
}

fn sidecar_path(record: &Path) -> PathBuf {
    let mut name = record
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("run"));
    name.push(".provenance.json");
    record.with_file_name(name)
}

/// Commit hash from `GIT_COMMIT` (build time, then run time), else `git rev-parse`.
pub fn current_git_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|s| !s.is_empty());
    if let Some(rev) = from_env {
        return rev;
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sidecar_sits_next_to_the_record() {
        let derived = sidecar_path(Path::new("/tmp/runs/lens_1700000000.json"));
        assert_eq!(derived, Path::new("/tmp/runs/lens_1700000000.provenance.json"));
    }

    #[test]
    fn sidecar_lists_params_and_output() {
        let dir = tempdir().unwrap();
        let record = dir.path().join("axes_7.json");
        fs::write(&record, "{}").unwrap();
        let path = write_sidecar(&record, Payload::new(json!({"solver": "qp"}))).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], record.to_string_lossy().as_ref());
        assert_eq!(parsed["params"]["solver"], "qp");
        assert_eq!(parsed["version"], projection::VERSION);
        assert!(!parsed["code_rev"].as_str().unwrap().is_empty());
    }
}
