//! # Content Transformer Module
//!
//! This module splices a header block into file content. Build directives
//! that the toolchain requires on the first lines stay above the header, and a
//! file that already carries a header is returned untouched.

use std::borrow::Cow;

use crate::header_detection::HeaderDetector;
use crate::templates::HeaderBlock;

/// Line terminator used when re-joining content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
  Lf,
  CrLf,
}

impl LineEnding {
  /// The platform's native terminator.
  pub const fn native() -> Self {
    if cfg!(windows) { LineEnding::CrLf } else { LineEnding::Lf }
  }

  pub const fn as_str(self) -> &'static str {
    match self {
      LineEnding::Lf => "\n",
      LineEnding::CrLf => "\r\n",
    }
  }
}

/// Result of an insertion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion<'a> {
  /// New content, borrowed from the input when nothing changed.
  pub content: Cow<'a, str>,
  /// Whether the content differs from the input.
  pub changed: bool,
}

/// Header insertion for file content.
///
/// The `ContentTransformer` handles:
/// - Locating the first line of real content below build directives
/// - Skipping files that already carry a header
/// - Re-joining lines with a single trailing terminator
pub struct ContentTransformer {
  /// Prefix of build directive lines, any number of which may lead the file
  directive_prefix: String,
  /// Prefix of the legacy directive allowed once after the directives
  alt_directive_prefix: String,
  line_ending: LineEnding,
}

impl ContentTransformer {
  pub fn new(directive_prefix: impl Into<String>, alt_directive_prefix: impl Into<String>) -> Self {
    Self {
      directive_prefix: directive_prefix.into(),
      alt_directive_prefix: alt_directive_prefix.into(),
      line_ending: LineEnding::native(),
    }
  }

  #[must_use]
  pub const fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
    self.line_ending = line_ending;
    self
  }

  /// Finds the index of the first content line.
  ///
  /// Skips leading directive lines, at most one alternate directive line, and
  /// then any blank lines.
  pub fn insertion_index(&self, lines: &[&str]) -> usize {
    let mut index = 0;

    if !self.directive_prefix.is_empty() {
      while index < lines.len() && lines[index].starts_with(self.directive_prefix.as_str()) {
        index += 1;
      }
    }

    if !self.alt_directive_prefix.is_empty()
      && index < lines.len()
      && lines[index].starts_with(self.alt_directive_prefix.as_str())
    {
      index += 1;
    }

    while index < lines.len() && lines[index].trim().is_empty() {
      index += 1;
    }

    index
  }

  /// Inserts `header` into `content` unless a header is already present.
  ///
  /// The detector sees both the first lines of the file and the lines at the
  /// insertion point, so a header placed below a long directive preamble is
  /// still recognized on the next run.
  pub fn insert<'a>(&self, content: &'a str, header: &HeaderBlock, detector: &dyn HeaderDetector) -> Insertion<'a> {
    let lines: Vec<&str> = content.lines().collect();
    let index = self.insertion_index(&lines);

    if detector.has_header(&lines) || detector.has_header(&lines[index..]) {
      return Insertion {
        content: Cow::Borrowed(content),
        changed: false,
      };
    }

    let mut new_lines: Vec<&str> = Vec::with_capacity(lines.len() + header.len() + 1);
    new_lines.extend_from_slice(&lines[..index]);
    new_lines.extend(header.lines().iter().map(String::as_str));
    // No separator when nothing follows the header
    if index < lines.len() {
      new_lines.push("");
    }
    new_lines.extend_from_slice(&lines[index..]);

    let newline = self.line_ending.as_str();
    let mut new_content = new_lines.join(newline);
    new_content.push_str(newline);

    Insertion {
      changed: new_content != content,
      content: Cow::Owned(new_content),
    }
  }
}
