mod common;

use std::path::Path;

use anyhow::Result;
use common::{read_file, write_file};
use edheader::config::{Config, RuleConfig};
use edheader::processor::{FileCollector, Processor, ProcessorConfig};
use edheader::report::{FileAction, ProcessingSummary};
use edheader::rules::{DirectoryRule, RuleTable};
use tempfile::tempdir;

fn processor_for(config: &Config, root: &Path, check_only: bool) -> Result<Processor> {
  Ok(Processor::new(ProcessorConfig {
    check_only,
    ..ProcessorConfig::from_config(config, "2025".to_string(), root.to_path_buf())?
  }))
}

#[test]
fn test_longest_prefix_wins_over_shorter_rules() -> Result<()> {
  let table = RuleTable::from_config(&Config::default())?;

  assert_eq!(table.resolve("client/cmd/texel-client/main.go").component, "remote client binary");
  assert_eq!(table.resolve("client/buffercache.go").component, "client runtime support library");
  assert_eq!(table.resolve("texel/theme/defaults.go").component, "theme subsystem");
  assert_eq!(table.resolve("texelation.go").component, "Texelation module");
  assert!(table.resolve("texelation.go").prefix.is_none());

  Ok(())
}

#[test]
fn test_custom_rule_table() -> Result<()> {
  let table = RuleTable::new(
    [
      DirectoryRule::new("a", "outer", "outer {feature}", "outer notes"),
      DirectoryRule::new("a/b", "inner", "inner {feature}", "inner notes"),
    ],
    DirectoryRule::fallback("fallback", "fallback {feature}", "fallback notes"),
  )?;

  assert_eq!(table.len(), 2);
  assert_eq!(table.resolve("a/b/c.go").component, "inner");
  assert_eq!(table.resolve("a/bc/d.go").component, "outer");
  assert_eq!(table.resolve("ab/c.go").component, "fallback");

  Ok(())
}

#[test]
fn test_collect_and_process_tree() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  write_file(root, "protocol/codec.go", "package protocol\n")?;
  write_file(root, "protocol/frame_bench_test.go", "package protocol\n")?;
  write_file(root, "apps/texelterm/parser/page_store_test.go", "package parser\n")?;
  write_file(
    root,
    "texel/pane.go",
    "// Copyright 2024 Someone\n// SPDX-License-Identifier: MIT\n\npackage texel\n",
  )?;

  let config = Config::default();
  let collector = FileCollector::new(root.to_path_buf(), &config.header.extensions, &[])?;
  let files = collector.collect(&[root.to_string_lossy().to_string()])?;
  assert_eq!(files.len(), 4);

  let processor = processor_for(&config, root, false)?;
  let reports = processor.process_files(&files);
  let summary = ProcessingSummary::from_reports(&reports, std::time::Duration::ZERO);

  assert_eq!(summary.headers_added, 3);
  assert_eq!(summary.already_annotated, 1);
  assert_eq!(summary.failed, 0);

  let bench = read_file(root, "protocol/frame_bench_test.go")?;
  assert!(bench.contains("// Summary: Benchmarks frame performance within the protocol definitions.\n"));
  assert!(bench.contains("// Usage: Run via `go test -bench` to observe hot-path behaviour under load.\n"));

  let test = read_file(root, "apps/texelterm/parser/page_store_test.go")?;
  assert!(test.contains("// File: apps/texelterm/parser/page_store_test.go\n"));
  assert!(test.contains(
    "// Summary: Exercises page store behaviour to ensure the terminal parser module remains reliable.\n"
  ));
  assert!(test.contains("// Usage: Executed during `go test` to guard against regressions.\n"));

  assert_eq!(
    read_file(root, "texel/pane.go")?,
    "// Copyright 2024 Someone\n// SPDX-License-Identifier: MIT\n\npackage texel\n"
  );

  Ok(())
}

#[test]
fn test_check_mode_reports_missing() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  let path = write_file(root, "cmd/texel-stress/main.go", "package main\n")?;

  let processor = processor_for(&Config::default(), root, true)?;
  let reports = processor.process_files(&[path]);

  assert_eq!(reports.len(), 1);
  assert_eq!(reports[0].action, FileAction::Missing);
  assert_eq!(reports[0].component.as_deref(), Some("stress harness"));
  assert_eq!(read_file(root, "cmd/texel-stress/main.go")?, "package main\n");

  Ok(())
}

#[test]
fn test_rule_without_notes_inherits_default_notes() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  let path = write_file(root, "tools/lint/run.go", "package lint\n")?;

  let mut config = Config::default();
  config.rules.insert(
    "tools".to_string(),
    RuleConfig {
      component: "developer tooling".to_string(),
      usage: "Run by {component} users to {feature} checks.".to_string(),
      notes: None,
    },
  );

  let processor = processor_for(&config, root, false)?;
  processor.process_files(&[path]);

  let content = read_file(root, "tools/lint/run.go")?;
  assert!(content.contains("// Usage: Run by developer tooling users to run checks.\n"));
  assert!(content.contains("// Notes: Part of the Texelation AGPLv3 codebase.\n"));

  Ok(())
}

#[test]
fn test_empty_file_gets_header_only() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  let path = write_file(root, "doc.go", "")?;

  let processor = processor_for(&Config::default(), root, false)?;
  processor.process_files(&[path]);

  let content = read_file(root, "doc.go")?;
  assert!(content.ends_with("// Notes: Part of the Texelation AGPLv3 codebase.\n"));
  assert_eq!(content.lines().count(), 7);

  Ok(())
}
