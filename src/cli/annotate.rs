//! # Annotate Command
//!
//! This module implements the header insertion run: resolve the workspace,
//! load the rule table, collect files, annotate them and report.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::Args;
use tracing::debug;

use crate::config::load_config;
use crate::diff::DiffManager;
use crate::info_log;
use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use crate::output::{
  CategorizedReports, print_added_files, print_all_files_ok, print_blank_line, print_failed_files, print_hint,
  print_missing_files, print_start_message, print_summary,
};
use crate::processor::{FileCollector, Processor, ProcessorConfig};
use crate::report::{FileReport, ProcessingSummary, ReportFormat, ReportGenerator};
use crate::workspace::resolve_workspace;

/// Arguments for the annotate command
#[derive(Args, Debug, Default)]
pub struct AnnotateArgs {
  /// File, directory or glob patterns to process. Directories are processed
  /// recursively.
  #[arg(default_value = ".")]
  pub patterns: Vec<String>,

  /// Project root that `File:` lines and rule prefixes are relative to
  /// (default: the enclosing git repository, else the current directory)
  #[arg(long, value_name = "DIR")]
  pub root: Option<PathBuf>,

  /// Path to config file (default: $EDHEADER_CONFIG, then .edheader.toml in
  /// the root)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config files and use the built-in rule table
  #[arg(long, conflicts_with = "config")]
  pub no_config: bool,

  /// Only process files with these extensions (repeatable, case-insensitive;
  /// overrides the config)
  #[arg(long, value_name = "EXT")]
  pub ext: Vec<String>,

  /// File patterns to ignore (supports glob patterns; **/vendor/** is always
  /// ignored)
  #[arg(long, short = 'i', value_name = "GLOB")]
  pub ignore: Vec<String>,

  /// Check mode: report files missing headers without modifying them
  #[arg(long)]
  pub check: bool,

  /// Show diff of changes in check mode
  #[arg(long, requires = "check")]
  pub show_diff: bool,

  /// Save diff of changes to a file in check mode
  #[arg(long, value_name = "FILE", requires = "check")]
  pub save_diff: Option<PathBuf>,

  /// Copyright year (default: config, then the current year)
  #[arg(long)]
  pub year: Option<String>,

  /// Generate a JSON report and save it to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_json: Option<PathBuf>,

  /// Generate a CSV report and save it to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_csv: Option<PathBuf>,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,
}

/// Run the annotate command with the given arguments.
///
/// Returns a failure exit code when check mode finds missing headers or when
/// any file could not be processed. Configuration problems are errors.
pub fn run_annotate(args: AnnotateArgs) -> Result<ExitCode> {
  init_tracing(args.quiet, args.verbose);

  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  let workspace = resolve_workspace(args.root.as_deref())?;
  let root = workspace.root().to_path_buf();
  debug!("Using workspace root: {}", root.display());
  if workspace.is_git() {
    info_log!("Git repository detected, paths are relative to {}", root.display());
  }

  let config = load_config(args.config.as_deref(), &root, args.no_config)?;

  let year = args
    .year
    .or_else(|| config.header.year.clone())
    .unwrap_or_else(|| chrono::Local::now().year().to_string());
  debug!("Using copyright year {}", year);

  let extensions = if args.ext.is_empty() {
    config.header.extensions.clone()
  } else {
    args.ext
  };
  let collector = FileCollector::new(root.clone(), &extensions, &args.ignore)?;

  let diff_manager = DiffManager::new(args.show_diff, args.save_diff);
  diff_manager.init()?;

  let processor = Processor::new(ProcessorConfig {
    check_only: args.check,
    diff_manager: Some(diff_manager),
    ..ProcessorConfig::from_config(&config, year, root).context("Invalid rule table")?
  });

  let files = collector.collect(&args.patterns)?;
  print_start_message(files.len(), processor.check_only());

  let start_time = Instant::now();
  let file_reports = processor.process_files(&files);
  let summary = ProcessingSummary::from_reports(&file_reports, start_time.elapsed());

  let categorized = CategorizedReports::from_reports(&file_reports);
  print_results(&categorized, processor.check_only());

  print_blank_line();
  print_summary(&summary, processor.check_only());

  if processor.check_only() && !categorized.missing.is_empty() {
    print_blank_line();
    print_hint("Run without --check to add the missing headers.");
  }

  write_reports(args.report_json.as_deref(), args.report_csv.as_deref(), &file_reports, &summary);

  let missing = processor.check_only() && !categorized.missing.is_empty();
  if missing || !categorized.failed.is_empty() {
    return Ok(ExitCode::FAILURE);
  }

  Ok(ExitCode::SUCCESS)
}

fn print_results(categorized: &CategorizedReports<'_>, check_only: bool) {
  print_blank_line();

  let changes = if check_only {
    &categorized.missing
  } else {
    &categorized.added
  };

  if check_only {
    print_missing_files(changes);
  } else {
    print_added_files(changes);
  }

  print_failed_files(&categorized.failed);

  if changes.is_empty() && categorized.failed.is_empty() {
    print_all_files_ok();
  }
}

fn write_reports(json_path: Option<&Path>, csv_path: Option<&Path>, files: &[FileReport], summary: &ProcessingSummary) {
  let requested = [(ReportFormat::Json, json_path), (ReportFormat::Csv, csv_path)];

  for (format, path) in requested {
    let Some(output_path) = path else {
      continue;
    };

    let report_generator = ReportGenerator::new(format, output_path);
    if let Err(e) = report_generator.generate(files, summary) {
      eprintln!("Error generating {} report: {:#}", format, e);
    } else {
      info_log!("Generated {} report at {}", format, output_path.display());
    }
  }
}
