//! # Diff Module
//!
//! Renders the change a header insertion would make, for `--show-diff` and
//! `--save-diff` in check mode.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use similar::{ChangeTag, TextDiff};

/// Number of unchanged lines shown around each insertion.
const CONTEXT_RADIUS: usize = 3;

/// Manages diff creation and rendering for header insertions.
pub struct DiffManager {
  /// Whether to print diffs to stderr
  pub show_diff: bool,

  /// File collecting every diff of the run
  pub save_diff_path: Option<PathBuf>,
}

impl DiffManager {
  pub const fn new(show_diff: bool, save_diff_path: Option<PathBuf>) -> Self {
    Self {
      show_diff,
      save_diff_path,
    }
  }

  /// Truncates the diff file so a run never appends to a stale one.
  pub fn init(&self) -> Result<()> {
    if let Some(ref path) = self.save_diff_path {
      File::create(path).with_context(|| format!("Failed to create diff file: {}", path.display()))?;
    }
    Ok(())
  }

  pub const fn is_enabled(&self) -> bool {
    self.show_diff || self.save_diff_path.is_some()
  }

  /// Renders a unified diff between `original` and `new` for `label`.
  pub fn render(label: &str, original: &str, new: &str) -> String {
    TextDiff::from_lines(original, new)
      .unified_diff()
      .context_radius(CONTEXT_RADIUS)
      .header(&format!("a/{label}"), &format!("b/{label}"))
      .to_string()
  }

  /// Prints and/or saves the diff for one file.
  pub fn display_diff(&self, path: &Path, label: &str, original: &str, new: &str) -> Result<()> {
    if self.show_diff {
      let diff = TextDiff::from_lines(original, new);
      eprintln!("{}", format!("Diff for {}:", path.display()).if_supports_color(Stream::Stderr, |s| s.bold()));
      for change in diff.iter_all_changes() {
        let line = format!("{}{}", sign(change.tag()), change);
        match change.tag() {
          ChangeTag::Insert => eprint!("{}", line.if_supports_color(Stream::Stderr, |s| s.green())),
          ChangeTag::Delete => eprint!("{}", line.if_supports_color(Stream::Stderr, |s| s.red())),
          ChangeTag::Equal => eprint!("{}", line),
        }
      }
      eprintln!();
    }

    if let Some(ref diff_path) = self.save_diff_path {
      let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(diff_path)
        .with_context(|| format!("Failed to open diff file: {}", diff_path.display()))?;
      file
        .write_all(Self::render(label, original, new).as_bytes())
        .with_context(|| format!("Failed to write diff file: {}", diff_path.display()))?;
    }

    Ok(())
  }
}

const fn sign(tag: ChangeTag) -> &'static str {
  match tag {
    ChangeTag::Delete => "-",
    ChangeTag::Insert => "+",
    ChangeTag::Equal => " ",
  }
}
