//! # Processor Module
//!
//! This module drives header insertion over a list of files.
//!
//! The module is organized into several submodules:
//! - [`file_io`] - File reading and writing operations
//! - [`content_transformer`] - Header placement and idempotent insertion
//! - [`file_collector`] - Pattern expansion and directory traversal
//!
//! For each file the [`Processor`] resolves the owning rule, synthesizes the
//! header, and hands both to the content transformer. Files are handled one
//! at a time and independently; a failure on one file is recorded and the run
//! moves on.

mod content_transformer;
mod file_collector;
mod file_io;

use std::path::{Path, PathBuf};

use anyhow::Result;
pub use content_transformer::{ContentTransformer, Insertion, LineEnding};
pub use file_collector::{BUILTIN_IGNORES, FileCollector, absolutize_path, normalize_relative_path, relative_slash_path};
pub use file_io::FileIO;
use tracing::{debug, error, trace, warn};

use crate::config::{Config, ConfigError};
use crate::diff::DiffManager;
use crate::header_detection::{HeaderDetector, SpdxMarkerDetector};
use crate::info_log;
use crate::report::{FileAction, FileReport};
use crate::rules::RuleTable;
use crate::templates::{HeaderSettings, HeaderSynthesizer};

/// Configuration for creating a Processor instance.
pub struct ProcessorConfig {
  pub rules: RuleTable,
  pub settings: HeaderSettings,
  /// Root that `File:` lines and rule prefixes are relative to.
  pub root: PathBuf,

  pub directive_prefix: String,
  pub alt_directive_prefix: String,

  /// Only report missing headers, never write.
  pub check_only: bool,

  pub diff_manager: Option<DiffManager>,
  pub header_detector: Option<Box<dyn HeaderDetector>>,
}

impl ProcessorConfig {
  /// Builds a processor configuration from a loaded [`Config`].
  ///
  /// Use struct update syntax to override specific fields:
  /// ```ignore
  /// ProcessorConfig {
  ///     check_only: true,
  ///     ..ProcessorConfig::from_config(&config, year, root)?
  /// }
  /// ```
  ///
  /// # Errors
  ///
  /// Returns an error if the rule table is ambiguous or otherwise invalid.
  pub fn from_config(config: &Config, year: String, root: PathBuf) -> Result<Self, ConfigError> {
    Ok(Self {
      rules: RuleTable::from_config(config)?,
      settings: HeaderSettings::from_config(config, year),
      root,
      directive_prefix: config.markers.directive.clone(),
      alt_directive_prefix: config.markers.alt_directive.clone(),
      check_only: false,
      diff_manager: None,
      header_detector: Some(Box::new(SpdxMarkerDetector::new(config.markers.spdx.clone()))),
    })
  }
}

/// Outcome of annotating one file's content.
pub struct Annotation<'a> {
  pub insertion: Insertion<'a>,
  /// Component of the rule that applied
  pub component: String,
}

/// Processor for adding headers to files.
pub struct Processor {
  rules: RuleTable,
  synthesizer: HeaderSynthesizer,
  transformer: ContentTransformer,
  detector: Box<dyn HeaderDetector>,
  root: PathBuf,
  check_only: bool,
  diff_manager: DiffManager,
}

impl Processor {
  /// Creates a new processor with the specified configuration.
  pub fn new(config: ProcessorConfig) -> Self {
    let detector = config
      .header_detector
      .unwrap_or_else(|| Box::new(SpdxMarkerDetector::new(config.settings.spdx_marker.clone())));

    Self {
      rules: config.rules,
      transformer: ContentTransformer::new(config.directive_prefix, config.alt_directive_prefix),
      synthesizer: HeaderSynthesizer::new(config.settings),
      detector,
      root: config.root,
      check_only: config.check_only,
      diff_manager: config.diff_manager.unwrap_or_else(|| DiffManager::new(false, None)),
    }
  }

  /// Computes the annotated content of one file without touching storage.
  ///
  /// # Parameters
  ///
  /// * `relative_path` - `/`-separated path relative to the root
  /// * `content` - Current file content
  pub fn annotate<'a>(&self, relative_path: &str, content: &'a str) -> Annotation<'a> {
    let metadata = self.rules.resolve(relative_path);
    trace!(
      "Resolved {} to rule {}",
      relative_path,
      metadata.prefix.unwrap_or("<default>")
    );

    let base_name = Path::new(relative_path)
      .file_stem()
      .map(|stem| stem.to_string_lossy().into_owned())
      .unwrap_or_default();

    let header = self.synthesizer.synthesize(relative_path, &base_name, &metadata);
    let insertion = self.transformer.insert(content, &header, self.detector.as_ref());

    Annotation {
      insertion,
      component: metadata.component.to_string(),
    }
  }

  /// Processes every file in order and returns one report per file.
  ///
  /// Failures are recorded in the reports and never stop the run.
  pub fn process_files(&self, files: &[PathBuf]) -> Vec<FileReport> {
    debug!("Processing {} files", files.len());

    files
      .iter()
      .map(|path| {
        let relative = relative_slash_path(path, &self.root);
        self.process_file(path, &relative).unwrap_or_else(|e| {
          error!("Error processing {}: {:#}", path.display(), e);
          FileReport::failed(path, relative, &e)
        })
      })
      .collect()
  }

  /// Reads, annotates and (outside check mode) rewrites one file.
  pub fn process_file(&self, path: &Path, relative_path: &str) -> Result<FileReport> {
    let content = FileIO::read_text(path)?;
    let Annotation { insertion, component } = self.annotate(relative_path, &content);

    let action = if !insertion.changed {
      trace!("Skipping: {} (header already present)", path.display());
      FileAction::AlreadyAnnotated
    } else if self.check_only {
      if self.diff_manager.is_enabled()
        && let Err(e) = self
          .diff_manager
          .display_diff(path, relative_path, &content, &insertion.content)
      {
        warn!("Failed to display diff for {}: {:#}", path.display(), e);
      }
      FileAction::Missing
    } else {
      FileIO::write_file(path, &insertion.content)?;
      info_log!("Added header to: {}", relative_path);
      FileAction::Added
    };

    Ok(FileReport {
      path: path.to_path_buf(),
      relative_path: relative_path.to_string(),
      component: Some(component),
      action,
      error: None,
    })
  }

  pub const fn check_only(&self) -> bool {
    self.check_only
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn processor(check_only: bool, root: PathBuf) -> Processor {
    let config = ProcessorConfig {
      check_only,
      ..ProcessorConfig::from_config(&Config::default(), "2025".to_string(), root).expect("config")
    };
    Processor::new(config)
  }

  #[test]
  fn test_annotate_protocol_scenario() {
    let processor = processor(false, PathBuf::from("/work"));

    let Annotation { insertion, component } = processor.annotate("protocol/codec.go", "package protocol\n");

    assert!(insertion.changed);
    assert_eq!(component, "protocol definitions");
    assert!(
      insertion
        .content
        .contains("// Summary: Implements codec capabilities for the protocol definitions.\n")
    );
    assert!(
      insertion
        .content
        .contains("// Usage: Shared by clients and servers to encode codec messages over the wire.\n")
    );
    assert!(insertion.content.contains("// File: protocol/codec.go\n"));
  }

  #[test]
  fn test_annotate_already_annotated() {
    let processor = processor(false, PathBuf::from("/work"));
    let content = "// SPDX-License-Identifier: MIT\npackage x\n";

    let insertion = processor.annotate("x/x.go", content).insertion;
    assert!(!insertion.changed);
    assert_eq!(insertion.content, content);
  }

  #[test]
  fn test_process_file_writes_once() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("main.go");
    std::fs::write(&path, "package main\n").expect("write");
    let processor = processor(false, dir.path().to_path_buf());

    let first = processor.process_file(&path, "main.go").expect("first");
    let after_first = std::fs::read_to_string(&path).expect("read");
    let second = processor.process_file(&path, "main.go").expect("second");

    assert_eq!(first.action, FileAction::Added);
    assert_eq!(second.action, FileAction::AlreadyAnnotated);
    assert_eq!(std::fs::read_to_string(&path).expect("read"), after_first);
  }

  #[test]
  fn test_check_only_does_not_write() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("main.go");
    std::fs::write(&path, "package main\n").expect("write");
    let processor = processor(true, dir.path().to_path_buf());

    let report = processor.process_file(&path, "main.go").expect("check");

    assert_eq!(report.action, FileAction::Missing);
    assert_eq!(std::fs::read_to_string(&path).expect("read"), "package main\n");
  }

  #[test]
  fn test_process_files_continues_after_failure() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let bad = dir.path().join("bad.go");
    let good = dir.path().join("good.go");
    std::fs::write(&bad, b"\xff\xfe\0\0").expect("write");
    std::fs::write(&good, "package good\n").expect("write");
    let processor = processor(false, dir.path().to_path_buf());

    let reports = processor.process_files(&[bad, good.clone()]);

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].action, FileAction::Failed);
    assert!(reports[0].error.is_some());
    assert_eq!(reports[1].action, FileAction::Added);
    assert_eq!(reports[1].relative_path, "good.go");
    assert!(
      std::fs::read_to_string(&good)
        .expect("read")
        .contains("SPDX-License-Identifier")
    );
  }
}
