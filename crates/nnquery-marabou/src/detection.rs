//! Marabou binary detection.

use crate::config::MarabouConfig;
use nnquery_solver::SolverError;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Environment variable naming the Marabou binary.
pub const MARABOU_PATH_ENV: &str = "MARABOU_PATH";

const BINARY_NAMES: [&str; 2] = ["Marabou", "marabou"];

/// Locate the Marabou binary.
///
/// Lookup order: the configured path, then `MARABOU_PATH`, then `Marabou`
/// and `marabou` on `PATH`. A configured path that does not exist is an
/// error rather than a fall-through.
pub fn detect_marabou(config: &MarabouConfig) -> Result<PathBuf, SolverError> {
    if let Some(path) = &config.binary_path {
        if path.is_file() {
            return Ok(path.clone());
        }
        return Err(SolverError::NotAvailable(format!(
            "configured Marabou binary {} does not exist",
            path.display()
        )));
    }

    if let Some(path) = std::env::var_os(MARABOU_PATH_ENV).map(PathBuf::from) {
        if path.is_file() {
            return Ok(path);
        }
        tracing::warn!(
            component = "marabou",
            operation = "detect",
            status = "warn",
            path = %path.display(),
            "MARABOU_PATH does not point to a file; searching PATH"
        );
    }

    if let Some(path) = search_path() {
        return Ok(path);
    }

    Err(SolverError::NotAvailable(format!(
        "Marabou not found; set {MARABOU_PATH_ENV} or add the binary to PATH"
    )))
}

fn search_path() -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    let cwd = std::env::current_dir().ok()?;
    search_in(&paths, &cwd)
}

/// First executable `Marabou` or `marabou` in a `PATH`-style list.
fn search_in(paths: &OsStr, cwd: &Path) -> Option<PathBuf> {
    BINARY_NAMES
        .iter()
        .find_map(|name| which::which_in(name, Some(paths), cwd).ok())
}

/// Version string reported by `--version`, if the binary prints one.
pub fn marabou_version(binary: &Path) -> Option<String> {
    let output = Command::new(binary).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!version.is_empty()).then_some(version)
}
