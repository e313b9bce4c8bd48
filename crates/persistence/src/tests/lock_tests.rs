// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{PersistenceError, StateLock};
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_lock_file_sits_next_to_state() {
    let dir: TempDir = TempDir::new().unwrap();
    let lock: StateLock = StateLock::acquire(&dir.path().join("epc_state.json")).unwrap();

    assert_eq!(lock.path(), dir.path().join("epc_state.json.lock"));
    assert!(lock.path().exists());
}

#[test]
fn test_lock_is_released_on_drop() {
    let dir: TempDir = TempDir::new().unwrap();
    let state: PathBuf = dir.path().join("epc_state.json");
    let lock: StateLock = StateLock::acquire(&state).unwrap();
    let lock_path: PathBuf = lock.path().to_path_buf();

    drop(lock);

    assert!(!lock_path.exists());
    assert!(StateLock::acquire(&state).is_ok());
}

#[test]
fn test_lock_held_by_live_process_blocks() {
    let dir: TempDir = TempDir::new().unwrap();
    let state: PathBuf = dir.path().join("epc_state.json");
    std::fs::write(
        dir.path().join("epc_state.json.lock"),
        format!("{}\n", std::process::id()),
    )
    .unwrap();

    let result: Result<StateLock, PersistenceError> = StateLock::acquire(&state);

    let Err(err) = result else {
        panic!("expected the lock to be held");
    };
    assert!(err.to_string().contains("epc_state.json.lock"));
}

#[test]
fn test_lock_without_readable_pid_blocks() {
    let dir: TempDir = TempDir::new().unwrap();
    let state: PathBuf = dir.path().join("epc_state.json");
    std::fs::write(dir.path().join("epc_state.json.lock"), "not a pid\n").unwrap();

    let result: Result<StateLock, PersistenceError> = StateLock::acquire(&state);

    assert!(matches!(result, Err(PersistenceError::Locked { .. })));
}

#[cfg(target_os = "linux")]
#[test]
fn test_lock_of_exited_process_is_reclaimed() {
    let dir: TempDir = TempDir::new().unwrap();
    let state: PathBuf = dir.path().join("epc_state.json");
    let lock_path: PathBuf = dir.path().join("epc_state.json.lock");
    std::fs::write(&lock_path, format!("{}\n", u32::MAX)).unwrap();

    let lock: StateLock = StateLock::acquire(&state).unwrap();

    let recorded: String = std::fs::read_to_string(&lock_path).unwrap();
    assert_eq!(recorded.trim(), std::process::id().to_string());
    drop(lock);
    assert!(!lock_path.exists());
}
