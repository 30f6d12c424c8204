//! # Report Module
//!
//! This module records what happened to each file and can write the results
//! as JSON or CSV.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Information about a processed file for reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
  /// Path to the file
  #[serde(with = "path_serialization")]
  pub path: PathBuf,
  /// Path relative to the project root, as printed on the `File:` line
  pub relative_path: String,
  /// Component of the rule that matched, if the file got that far
  pub component: Option<String>,
  pub action: FileAction,
  /// Error message for failed files
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl FileReport {
  pub fn failed(path: &Path, relative_path: String, error: &anyhow::Error) -> Self {
    Self {
      path: path.to_path_buf(),
      relative_path,
      component: None,
      action: FileAction::Failed,
      error: Some(format!("{error:#}")),
    }
  }
}

/// Possible outcomes for a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileAction {
  /// Header was written to the file
  Added,
  /// Header is missing and would be added (check mode)
  Missing,
  /// A header was already present; the file was left alone
  AlreadyAnnotated,
  /// The file could not be read or written
  Failed,
}

impl FileAction {
  pub const fn label(self) -> &'static str {
    match self {
      FileAction::Added => "Added",
      FileAction::Missing => "Missing",
      FileAction::AlreadyAnnotated => "Already annotated",
      FileAction::Failed => "Failed",
    }
  }
}

/// Helper module for serializing/deserializing PathBuf
mod path_serialization {
  use std::path::PathBuf;

  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S>(path: &std::path::Path, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(&path.to_string_lossy())
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    Ok(PathBuf::from(s))
  }
}

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
  /// JSON format for machine readability
  Json,
  /// CSV format for spreadsheet compatibility
  Csv,
}

impl std::fmt::Display for ReportFormat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ReportFormat::Json => write!(f, "JSON"),
      ReportFormat::Csv => write!(f, "CSV"),
    }
  }
}

/// Report Generator for writing run reports
pub struct ReportGenerator<'a> {
  format: ReportFormat,
  output_path: &'a Path,
}

impl<'a> ReportGenerator<'a> {
  pub const fn new(format: ReportFormat, output_path: &'a Path) -> Self {
    Self { format, output_path }
  }

  /// Writes the report for `files` to the output path.
  pub fn generate(&self, files: &[FileReport], summary: &ProcessingSummary) -> Result<()> {
    let content = self.render(files, summary)?;

    fs::write(self.output_path, content)
      .with_context(|| format!("Failed to write {} report to {}", self.format, self.output_path.display()))
  }

  /// Renders the report without writing it.
  pub fn render(&self, files: &[FileReport], summary: &ProcessingSummary) -> Result<String> {
    match self.format {
      ReportFormat::Json => generate_json(files, summary),
      ReportFormat::Csv => Ok(generate_csv(files, summary)),
    }
  }
}

fn generate_json(files: &[FileReport], summary: &ProcessingSummary) -> Result<String> {
  let report = serde_json::json!({
      "summary": summary,
      "files": files,
  });

  Ok(serde_json::to_string_pretty(&report)?)
}

fn generate_csv(files: &[FileReport], summary: &ProcessingSummary) -> String {
  let mut csv = String::new();

  csv.push_str("file_path,component,action,error\n");

  for file in files {
    csv.push_str(&format!(
      "{},{},{},{}\n",
      escape_csv(&file.relative_path),
      escape_csv(file.component.as_deref().unwrap_or("")),
      file.action.label(),
      escape_csv(file.error.as_deref().unwrap_or("")),
    ));
  }

  csv.push_str("\n# Summary\n");
  csv.push_str(&format!("Total files processed,{}\n", summary.total_files));
  csv.push_str(&format!("Headers added,{}\n", summary.headers_added));
  csv.push_str(&format!("Headers missing,{}\n", summary.headers_missing));
  csv.push_str(&format!("Already annotated,{}\n", summary.already_annotated));
  csv.push_str(&format!("Failed,{}\n", summary.failed));
  csv.push_str(&format!("Processing time (seconds),{:.2}\n", summary.processing_time_secs));
  csv.push_str(&format!("Generated on,{}\n", Local::now().format("%Y-%m-%d %H:%M:%S")));

  csv
}

fn escape_csv(field: &str) -> String {
  field.replace(',', "%2C").replace('\n', " ")
}

/// Summary of the processing results
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingSummary {
  pub total_files: usize,
  pub headers_added: usize,
  /// Files that would receive a header in check mode
  pub headers_missing: usize,
  pub already_annotated: usize,
  pub failed: usize,
  #[serde(rename = "processing_time_seconds")]
  pub processing_time_secs: f64,
  /// Timestamp when the summary was built
  pub timestamp: i64,
}

impl ProcessingSummary {
  /// Create a ProcessingSummary from a collection of FileReports
  pub fn from_reports(files: &[FileReport], processing_time: std::time::Duration) -> Self {
    let count = |action: FileAction| files.iter().filter(|f| f.action == action).count();

    Self {
      total_files: files.len(),
      headers_added: count(FileAction::Added),
      headers_missing: count(FileAction::Missing),
      already_annotated: count(FileAction::AlreadyAnnotated),
      failed: count(FileAction::Failed),
      processing_time_secs: processing_time.as_secs_f64(),
      timestamp: Local::now().timestamp(),
    }
  }
}
