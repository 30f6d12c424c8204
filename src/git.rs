//! # Git Module
//!
//! Locates the repository that contains the working directory, so `File:`
//! lines and rule prefixes are relative to the repository root by default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use git2::{ErrorCode, Repository};

use crate::verbose_log;

/// Returns the working-tree root of the repository containing `start`.
///
/// Returns `Ok(None)` when `start` is not inside a repository, or when the
/// repository is bare.
///
/// # Errors
///
/// Returns an error if a repository is found but cannot be opened.
pub fn discover_repo_root(start: &Path) -> Result<Option<PathBuf>> {
  let repo = match Repository::discover(start) {
    Ok(repo) => repo,
    Err(e) if e.code() == ErrorCode::NotFound => {
      verbose_log!("No git repository found above {}", start.display());
      return Ok(None);
    }
    Err(e) => {
      return Err(e).with_context(|| format!("Failed to open git repository above {}", start.display()));
    }
  };

  let Some(workdir) = repo.workdir() else {
    verbose_log!("Git repository at {} is bare", repo.path().display());
    return Ok(None);
  };

  let root = workdir.canonicalize().unwrap_or_else(|_| workdir.to_path_buf());
  verbose_log!("Git repository root: {}", root.display());
  Ok(Some(root))
}
