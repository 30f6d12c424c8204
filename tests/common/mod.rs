#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use assert_cmd::prelude::*;

/// Checks if git is available on the system.
pub fn is_git_available() -> bool {
  Command::new("git").arg("--version").status().is_ok()
}

/// Runs a git command in the given directory, returning an error with stderr on
/// failure.
pub fn run_git(dir: &Path, args: &[&str]) -> Result<()> {
  let output = Command::new("git")
    .args(args)
    .current_dir(dir)
    .output()
    .with_context(|| format!("Failed to execute git {:?}", args))?;

  if !output.status.success() {
    anyhow::bail!("git {:?} failed: {}", args, String::from_utf8_lossy(&output.stderr));
  }
  Ok(())
}

/// Writes `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> Result<PathBuf> {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)?;
  }
  fs::write(&path, content)?;
  Ok(path)
}

pub fn read_file(root: &Path, relative: &str) -> Result<String> {
  fs::read_to_string(root.join(relative)).with_context(|| format!("Failed to read {}", relative))
}

/// Builds a bare `edheader` invocation run from `dir`, with a fixed year and
/// no inherited config or log filter.
pub fn edheader_in(dir: &Path) -> Result<Command> {
  let mut cmd = Command::cargo_bin("edheader")?;
  cmd
    .current_dir(dir)
    .env_remove("EDHEADER_CONFIG")
    .env_remove("RUST_LOG")
    .arg("--year")
    .arg("2025");
  Ok(cmd)
}

/// Builds an `edheader` invocation rooted at `root` with colors off.
pub fn edheader(root: &Path) -> Result<Command> {
  let mut cmd = edheader_in(root)?;
  cmd.arg("--root").arg(root).arg("--colors=never");
  Ok(cmd)
}
