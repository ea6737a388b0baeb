//! Process plumbing checked against shell scripts standing in for Marabou.
#![cfg(unix)]
#![allow(clippy::float_cmp)]

use nnquery_core::{EquationScope, Network, Solver, VarArray};
use nnquery_marabou::{MarabouConfig, MarabouSolver};
use nnquery_solver::{ExitCode, SolverOptions};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

// A script must not be open for writing while another test forks, or exec
// fails with ETXTBSY.
static SPAWN_LOCK: Mutex<()> = Mutex::new(());

fn spawn_lock() -> MutexGuard<'static, ()> {
    SPAWN_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("Marabou");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn identity_network() -> Network {
    let mut network = Network::new();
    let x = network.new_variable();
    let y = network.new_variable();
    network
        .add_equality(&[x, y], &[1.0, -1.0], 0.0, EquationScope::Network)
        .unwrap();
    network.set_input_variables(vec![VarArray::vector(vec![x])]);
    network.set_output_variables(vec![VarArray::vector(vec![y])]);
    network
}

#[test]
fn sat_output_maps_back_to_variables() {
    let _guard = spawn_lock();
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(
        dir.path(),
        r#"test "$1" = "--input-query" && test -f "$2" || exit 3
printf 'sat\nInput assignment:\n\tx0 = 0.5\n\nOutput:\n\ty0 = 0.5\n'"#,
    );
    let mut solver = MarabouSolver::new(MarabouConfig::new().with_binary_path(&script)).unwrap();
    let network = identity_network();

    let log_path = dir.path().join("solve.log");
    let result = network
        .solve(&mut solver, &SolverOptions::new(), Some(&log_path))
        .unwrap();

    assert_eq!(result.exit_code, ExitCode::Sat);
    assert_eq!(result.values.len(), 2);
    assert!(result.values.values().all(|v| *v == 0.5));
    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.starts_with("sat\n"));
}

#[test]
fn evaluate_returns_none_on_unsat() {
    let _guard = spawn_lock();
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "echo unsat");
    let mut solver = MarabouSolver::new(MarabouConfig::new().with_binary_path(&script)).unwrap();

    let outputs = identity_network()
        .evaluate_with_solver(
            &[nnquery_core::ValueArray::vector(vec![1.0])],
            &mut solver,
            &SolverOptions::new().with_timeout(5),
            None,
        )
        .unwrap();
    assert!(outputs.is_none());
}

#[test]
fn timeout_is_reported_in_statistics() {
    let _guard = spawn_lock();
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "echo Timeout");
    let mut solver = MarabouSolver::new(MarabouConfig::new().with_binary_path(&script)).unwrap();

    let query = identity_network().input_query().unwrap();
    let result = solver
        .solve(&query, &SolverOptions::new().with_timeout(1), None)
        .unwrap();
    assert_eq!(result.exit_code, ExitCode::Timeout);
    assert!(result.statistics.has_timed_out());
    assert!(result.values.is_empty());
}

#[test]
fn crash_without_status_is_a_process_error() {
    let _guard = spawn_lock();
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "echo 'bad query file' >&2\nexit 1");
    let mut solver = MarabouSolver::new(MarabouConfig::new().with_binary_path(&script)).unwrap();

    let query = identity_network().input_query().unwrap();
    let err = solver
        .solve(&query, &SolverOptions::new(), None)
        .unwrap_err();
    assert_eq!(err.code(), "SOLVER_PROCESS");
    assert!(err.to_string().contains("bad query file"));
}

#[test]
fn query_files_land_in_work_dir_and_are_removed() {
    let _guard = spawn_lock();
    let dir = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    // Copy the query out so the test can inspect it after the temp file is gone.
    let script = write_script(
        dir.path(),
        &format!(
            "cp \"$2\" '{}'\necho unsat",
            dir.path().join("seen.ipq").display()
        ),
    );
    let config = MarabouConfig::new()
        .with_binary_path(&script)
        .with_work_dir(work.path());
    let mut solver = MarabouSolver::new(config).unwrap();

    let query = identity_network().input_query().unwrap();
    solver.solve(&query, &SolverOptions::new(), None).unwrap();

    let seen = std::fs::read_to_string(dir.path().join("seen.ipq")).unwrap();
    assert_eq!(seen, query.to_text());
    assert_eq!(std::fs::read_dir(work.path()).unwrap().count(), 0);
}
