//! # File Collector Module
//!
//! This module turns user-provided patterns (files, directories or globs) into
//! the list of candidate files, and computes the project-relative paths that
//! rules are resolved against.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::rules::slash_path;

/// Ignore patterns applied to every run.
pub const BUILTIN_IGNORES: &[&str] = &["**/vendor/**"];

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &[".git", ".hg", ".svn"];

/// File collector for pattern expansion and directory traversal.
///
/// The `FileCollector` handles:
/// - Expanding file, directory and glob patterns
/// - Filtering by extension and ignore globs
/// - Path normalization relative to the project root
pub struct FileCollector {
  /// Root that relative paths are computed against
  root: PathBuf,
  /// Lowercased extensions to accept. Empty accepts every file.
  extensions: Vec<String>,
  ignore_patterns: Vec<glob::Pattern>,
}

impl FileCollector {
  /// Creates a new FileCollector.
  ///
  /// # Errors
  ///
  /// Returns an error if any ignore pattern is not a valid glob.
  pub fn new(root: PathBuf, extensions: &[String], ignore: &[String]) -> Result<Self> {
    let ignore_patterns = BUILTIN_IGNORES
      .iter()
      .map(|p| p.to_string())
      .chain(ignore.iter().cloned())
      .map(|pattern| glob::Pattern::new(&pattern).with_context(|| format!("Invalid ignore pattern: {}", pattern)))
      .collect::<Result<Vec<_>>>()?;

    let extensions = extensions
      .iter()
      .map(|ext| ext.trim_start_matches('.').to_lowercase())
      .collect();

    Ok(Self {
      root,
      extensions,
      ignore_patterns,
    })
  }

  /// Expands patterns into a sorted, deduplicated list of candidate files.
  ///
  /// # Errors
  ///
  /// Returns an error if a pattern is neither an existing path nor a valid
  /// glob.
  pub fn collect(&self, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut all_files = Vec::new();

    for pattern in patterns {
      let maybe_path = PathBuf::from(pattern);
      if maybe_path.is_file() {
        all_files.push(maybe_path);
      } else if maybe_path.is_dir() {
        all_files.extend(self.traverse_directory(&maybe_path));
      } else {
        let entries = glob::glob(pattern).with_context(|| format!("Invalid glob pattern: {}", pattern))?;
        for entry in entries {
          match entry {
            Ok(path) if path.is_file() => all_files.push(path),
            Ok(path) if path.is_dir() => all_files.extend(self.traverse_directory(&path)),
            Ok(_) => {}
            Err(e) => warn!("Error with glob pattern {}: {}", pattern, e),
          }
        }
      }
    }

    let mut files: Vec<PathBuf> = all_files.into_iter().filter(|path| self.is_candidate(path)).collect();
    files.sort();
    files.dedup();

    debug!("Collected {} candidate files", files.len());
    Ok(files)
  }

  /// Walks a directory recursively and returns every regular file.
  ///
  /// Symlinks are not followed. Unreadable entries are logged and skipped.
  pub fn traverse_directory(&self, dir: &Path) -> Vec<PathBuf> {
    debug!("Scanning directory: {}", dir.display());
    let start_time = std::time::Instant::now();

    let mut all_files = Vec::new();
    let walker = WalkDir::new(dir).follow_links(false).into_iter().filter_entry(|entry| {
      !(entry.file_type().is_dir()
        && entry.depth() > 0
        && SKIPPED_DIRS.contains(&entry.file_name().to_string_lossy().as_ref()))
    });

    for entry in walker {
      match entry {
        Ok(entry) if entry.file_type().is_file() => all_files.push(entry.into_path()),
        Ok(_) => {}
        Err(e) => warn!("Error reading directory entry under {}: {}", dir.display(), e),
      }
    }

    debug!(
      "Found {} files in {}ms",
      all_files.len(),
      start_time.elapsed().as_millis()
    );

    all_files
  }

  /// Checks the extension and ignore filters.
  pub fn is_candidate(&self, path: &Path) -> bool {
    if !self.extensions.is_empty() {
      let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
      if !self.extensions.contains(&ext) {
        trace!("Skipping: {} (extension not selected)", path.display());
        return false;
      }
    }

    let relative = self.relative_path(path);
    let full = path.to_string_lossy().replace('\\', "/");
    if self
      .ignore_patterns
      .iter()
      .any(|pattern| pattern.matches(&relative) || pattern.matches(&full))
    {
      trace!("Skipping: {} (matches ignore pattern)", path.display());
      return false;
    }

    true
  }

  /// Returns the `/`-separated path of `path` relative to the root.
  pub fn relative_path(&self, path: &Path) -> String {
    relative_slash_path(path, &self.root)
  }
}

/// Returns the `/`-separated path of `path` relative to `root`.
///
/// Directory symlinks on either side are resolved when the paths exist, so a
/// canonical root still matches files reached through a linked directory.
pub fn relative_slash_path(path: &Path, root: &Path) -> String {
  let absolute = absolutize_path(path).unwrap_or_else(|_| path.to_path_buf());
  let absolute = match (absolute.parent(), absolute.file_name()) {
    (Some(parent), Some(name)) => parent
      .canonicalize()
      .map(|parent| parent.join(name))
      .unwrap_or_else(|_| absolute.clone()),
    _ => absolute,
  };
  let root = absolutize_path(root).unwrap_or_else(|_| root.to_path_buf());
  let root = root.canonicalize().unwrap_or(root);
  slash_path(&normalize_relative_path(&absolute, &root))
}

/// Converts a potentially relative path to an absolute path.
pub fn absolutize_path(path: &Path) -> Result<PathBuf> {
  if path.is_absolute() {
    Ok(path.to_path_buf())
  } else {
    let current_dir = std::env::current_dir().with_context(|| "Failed to get current directory")?;
    Ok(current_dir.join(path))
  }
}

/// Normalizes a path to be relative to a given directory.
///
/// # Parameters
///
/// * `path` - The path to normalize
/// * `base` - The directory to make the path relative to
pub fn normalize_relative_path(path: &Path, base: &Path) -> PathBuf {
  if path.is_absolute() {
    if let Ok(stripped) = path.strip_prefix(base) {
      return stripped.to_path_buf();
    }

    if let Some(rel_path) = pathdiff::diff_paths(path, base) {
      return rel_path;
    }
  }

  let mut normalized = PathBuf::new();
  for component in path.components() {
    if matches!(component, std::path::Component::CurDir) {
      continue;
    }
    normalized.push(component.as_os_str());
  }

  if normalized.as_os_str().is_empty() {
    PathBuf::from(".")
  } else {
    normalized
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::tempdir;

  use super::*;

  fn write(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
    fs::write(&path, "package x\n").expect("write");
    path
  }

  #[test]
  fn test_collect_directory_filters_extension() {
    let dir = tempdir().expect("create temp dir");
    let root = dir.path().to_path_buf();
    let go = write(&root, "protocol/codec.go");
    write(&root, "protocol/README.md");

    let collector = FileCollector::new(root.clone(), &["go".to_string()], &[]).expect("collector");
    let files = collector.collect(&[root.to_string_lossy().to_string()]).expect("collect");

    assert_eq!(files, vec![go]);
  }

  #[test]
  fn test_collect_skips_vendor_and_git() {
    let dir = tempdir().expect("create temp dir");
    let root = dir.path().to_path_buf();
    let kept = write(&root, "texel/pane.go");
    write(&root, "third_party/vendor/lib.go");
    write(&root, ".git/hooks/hook.go");

    let collector = FileCollector::new(root.clone(), &["go".to_string()], &[]).expect("collector");
    let files = collector.collect(&[root.to_string_lossy().to_string()]).expect("collect");

    assert_eq!(files, vec![kept]);
  }

  #[test]
  fn test_collect_custom_ignore() {
    let dir = tempdir().expect("create temp dir");
    let root = dir.path().to_path_buf();
    let kept = write(&root, "apps/clock/clock.go");
    write(&root, "apps/clock/clock_gen.go");

    let collector =
      FileCollector::new(root.clone(), &["go".to_string()], &["**/*_gen.go".to_string()]).expect("collector");
    let files = collector.collect(&[root.to_string_lossy().to_string()]).expect("collect");

    assert_eq!(files, vec![kept]);
  }

  #[test]
  fn test_collect_deduplicates_overlapping_patterns() {
    let dir = tempdir().expect("create temp dir");
    let root = dir.path().to_path_buf();
    let file = write(&root, "cmd/texel-server/main.go");

    let collector = FileCollector::new(root.clone(), &["go".to_string()], &[]).expect("collector");
    let files = collector
      .collect(&[
        root.join("cmd").to_string_lossy().to_string(),
        file.to_string_lossy().to_string(),
      ])
      .expect("collect");

    assert_eq!(files, vec![file]);
  }

  #[test]
  fn test_invalid_ignore_pattern() {
    let result = FileCollector::new(PathBuf::from("/tmp"), &[], &["[".to_string()]);
    assert!(result.is_err());
  }

  #[test]
  fn test_relative_path() {
    let collector = FileCollector::new(PathBuf::from("/work/texelation"), &[], &[]).expect("collector");
    assert_eq!(
      collector.relative_path(Path::new("/work/texelation/protocol/codec.go")),
      "protocol/codec.go"
    );
  }

  #[test]
  fn test_extension_match_is_case_insensitive() {
    let collector = FileCollector::new(PathBuf::from("/work"), &[".GO".to_string()], &[]).expect("collector");
    assert!(collector.is_candidate(Path::new("/work/a/Main.Go")));
    assert!(!collector.is_candidate(Path::new("/work/a/main.rs")));
  }

  #[test]
  fn test_absolutize_path_already_absolute() {
    let path = PathBuf::from("/absolute/path");
    assert_eq!(absolutize_path(&path).expect("absolute"), path);
  }

  #[test]
  fn test_normalize_relative_path_drops_current_dir() {
    assert_eq!(
      normalize_relative_path(Path::new("./a/./b.go"), Path::new("/unused")),
      PathBuf::from("a/b.go")
    );
  }
}
