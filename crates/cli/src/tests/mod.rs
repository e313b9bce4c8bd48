// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod app_tests;
mod args_tests;

use std::fs;
use std::path::{Path, PathBuf};

/// Writes `contents` to `name` under `dir` and returns the path.
pub fn create_test_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path: PathBuf = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}
