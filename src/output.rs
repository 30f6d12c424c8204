//! # Output Module
//!
//! This module centralizes all user-facing output for edheader.
//! It provides consistent formatting, colors, and symbols for terminal output.
//!
//! Everything here goes to stdout and is silenced by `-q`, except the plain
//! path list of missing files, which stays available for scripting. Failed
//! files are listed on stderr, in quiet mode too.

use owo_colors::{OwoColorize, Stream};

use crate::logging::{is_quiet, is_verbose};
use crate::report::{FileAction, FileReport, ProcessingSummary};

/// Symbols used in output
pub mod symbols {
  /// Header present or added
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Header missing
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// File could not be processed
  pub const ERROR: &str = "!";
}

/// Maximum number of files to show in the default output before truncating
const DEFAULT_FILE_LIST_LIMIT: usize = 20;

/// Print the initial "Checking N files..." or "Annotating N files..." message.
pub fn print_start_message(file_count: usize, check_only: bool) {
  if is_quiet() {
    return;
  }

  let verb = if check_only { "Checking" } else { "Annotating" };
  println!("{} {} {}...", verb, file_count, plural(file_count));
}

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// Print the list of files missing headers (check mode).
///
/// In quiet mode only the bare paths are printed, one per line.
pub fn print_missing_files(files: &[&FileReport]) {
  if files.is_empty() {
    return;
  }

  if is_quiet() {
    for file in files {
      println!("{}", file.relative_path);
    }
    return;
  }

  let header = format!(
    "{} {} {} missing headers:",
    symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
    files.len(),
    plural(files.len())
  );
  print_file_list(&header, files);
}

/// Print the list of files that received a header.
pub fn print_added_files(files: &[&FileReport]) {
  if is_quiet() || files.is_empty() {
    return;
  }

  let header = format!(
    "{} Added header to {} {}:",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    files.len(),
    plural(files.len())
  );
  print_file_list(&header, files);
}

/// Print the list of files that could not be processed, with their errors.
///
/// Goes to stderr and is not silenced by quiet mode.
pub fn print_failed_files(files: &[&FileReport]) {
  if files.is_empty() {
    return;
  }

  if is_quiet() {
    for file in files {
      eprintln!("{}: {}", file.relative_path, file.error.as_deref().unwrap_or("unknown error"));
    }
    return;
  }

  eprintln!(
    "{} Could not process {} {}:",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    files.len(),
    plural(files.len())
  );
  for file in files {
    eprintln!(
      "  {} ({})",
      file.relative_path,
      file
        .error
        .as_deref()
        .unwrap_or("unknown error")
        .if_supports_color(Stream::Stderr, |s| s.dimmed())
    );
  }
}

fn print_file_list(header: &str, files: &[&FileReport]) {
  println!("{}", header);

  let count = files.len();
  let show_all = is_verbose();
  let limit = if show_all { count } else { DEFAULT_FILE_LIST_LIMIT };

  for file in files.iter().take(limit) {
    println!("  {}", file.relative_path);
  }

  if !show_all && count > limit {
    println!(
      "  {} more (use -v to see all)",
      format!("... and {}", count - limit).if_supports_color(Stream::Stdout, |s| s.dimmed())
    );
  }
}

/// Print the success message when every file already carries a header.
pub fn print_all_files_ok() {
  if is_quiet() {
    return;
  }

  println!(
    "{} All files already have headers.",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green())
  );
}

/// Print the processing summary followed by the final `Updated N files` line.
///
/// Timing is included in verbose mode.
pub fn print_summary(summary: &ProcessingSummary, check_only: bool) {
  if is_quiet() {
    return;
  }

  let pending = if check_only {
    summary.headers_missing
  } else {
    summary.headers_added
  };
  let pending_str = if check_only && pending > 0 {
    pending.if_supports_color(Stream::Stdout, |s| s.red()).to_string()
  } else {
    pending.if_supports_color(Stream::Stdout, |s| s.cyan()).to_string()
  };
  let failed_str = if summary.failed > 0 {
    summary.failed.if_supports_color(Stream::Stdout, |s| s.red()).to_string()
  } else {
    summary.failed.if_supports_color(Stream::Stdout, |s| s.cyan()).to_string()
  };

  let mut summary_line = format!(
    "Summary: {} {}, {} already annotated, {} failed",
    pending_str,
    if check_only { "missing" } else { "added" },
    summary.already_annotated.if_supports_color(Stream::Stdout, |s| s.cyan()),
    failed_str
  );

  if is_verbose() {
    summary_line.push_str(&format!(" ({:.2}s)", summary.processing_time_secs));
  }

  println!("{}", summary_line);
  println!("{}", updated_line(summary.headers_added));
}

/// The line that ends every run.
pub fn updated_line(count: usize) -> String {
  format!("Updated {count} files")
}

/// Print a hint for the user about what to do next.
pub fn print_hint(message: &str) {
  if is_quiet() {
    return;
  }

  println!("{}", message.if_supports_color(Stream::Stdout, |s| s.yellow()));
}

/// File reports grouped by outcome, in processing order.
#[derive(Default)]
pub struct CategorizedReports<'a> {
  pub added: Vec<&'a FileReport>,
  pub missing: Vec<&'a FileReport>,
  pub annotated: Vec<&'a FileReport>,
  pub failed: Vec<&'a FileReport>,
}

impl<'a> CategorizedReports<'a> {
  /// Categorize a slice of file reports.
  pub fn from_reports(reports: &'a [FileReport]) -> Self {
    let mut categorized = Self::default();

    for report in reports {
      match report.action {
        FileAction::Added => categorized.added.push(report),
        FileAction::Missing => categorized.missing.push(report),
        FileAction::AlreadyAnnotated => categorized.annotated.push(report),
        FileAction::Failed => categorized.failed.push(report),
      }
    }

    categorized
  }
}

const fn plural(count: usize) -> &'static str {
  if count == 1 { "file" } else { "files" }
}
