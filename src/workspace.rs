//! # Workspace Module
//!
//! This module decides the project root that relative paths are computed
//! against.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::git;

/// Workspace root selection.
#[derive(Debug)]
pub enum Workspace {
  /// Root given on the command line.
  Explicit { root: PathBuf },
  /// Workspace rooted at a git repository.
  Git { root: PathBuf },
  /// Workspace rooted at the current directory.
  Directory { root: PathBuf },
}

impl Workspace {
  pub fn root(&self) -> &Path {
    match self {
      Self::Explicit { root } | Self::Git { root } | Self::Directory { root } => root.as_path(),
    }
  }

  pub const fn is_git(&self) -> bool {
    matches!(self, Self::Git { .. })
  }
}

/// Resolve the workspace root.
///
/// An explicit root wins; otherwise the enclosing git repository is used, and
/// failing that the current directory.
///
/// # Errors
///
/// Returns an error if the explicit root is not a directory or the current
/// directory cannot be determined.
pub fn resolve_workspace(explicit_root: Option<&Path>) -> Result<Workspace> {
  let current_dir = std::env::current_dir().with_context(|| "Failed to get current directory")?;

  if let Some(root) = explicit_root {
    let root = abs_path_or_current(root, &current_dir);
    if !root.is_dir() {
      anyhow::bail!("Root is not a directory: {}", root.display());
    }
    return Ok(Workspace::Explicit { root });
  }

  resolve_from(&current_dir)
}

fn resolve_from(current_dir: &Path) -> Result<Workspace> {
  if let Some(root) = git::discover_repo_root(current_dir)? {
    return Ok(Workspace::Git { root });
  }

  Ok(Workspace::Directory {
    root: current_dir.to_path_buf(),
  })
}

fn abs_path_or_current(path: &Path, current_dir: &Path) -> PathBuf {
  if path.is_absolute() {
    path.to_path_buf()
  } else {
    current_dir.join(path)
  }
}
