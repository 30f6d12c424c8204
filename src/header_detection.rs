//! # Header Detection Module
//!
//! This module contains the interfaces and implementations for deciding
//! whether a file already carries a header. It allows the detection rule to be
//! swapped without touching the processor.

/// Number of lines scanned for the marker.
pub const DEFAULT_SCAN_LINES: usize = 5;

/// Trait for header detectors.
///
/// Implementations receive a window of lines and report whether a header is
/// already present in it.
pub trait HeaderDetector: Send + Sync {
  /// Checks whether `lines` (the start of a file, or the start of the region
  /// a header would be inserted into) already contain a header.
  fn has_header(&self, lines: &[&str]) -> bool;
}

/// Default detector: a plain substring search for the SPDX marker in the first
/// few lines.
///
/// The scan is not comment-aware; a marker inside a string literal near the
/// top of a file also counts.
pub struct SpdxMarkerDetector {
  marker: String,
  scan_lines: usize,
}

impl SpdxMarkerDetector {
  pub fn new(marker: impl Into<String>) -> Self {
    Self {
      marker: marker.into(),
      scan_lines: DEFAULT_SCAN_LINES,
    }
  }

  #[must_use]
  pub const fn with_scan_lines(mut self, scan_lines: usize) -> Self {
    self.scan_lines = scan_lines;
    self
  }
}

impl Default for SpdxMarkerDetector {
  fn default() -> Self {
    Self::new("SPDX-License-Identifier")
  }
}

impl HeaderDetector for SpdxMarkerDetector {
  fn has_header(&self, lines: &[&str]) -> bool {
    lines
      .iter()
      .take(self.scan_lines)
      .any(|line| line.contains(self.marker.as_str()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_marker_in_first_lines() {
    let detector = SpdxMarkerDetector::default();

    let lines = ["// Copyright © 2025 Texelation contributors", "// SPDX-License-Identifier: AGPL-3.0-or-later"];
    assert!(detector.has_header(&lines));

    let lines = ["package main", "", "func main() {}"];
    assert!(!detector.has_header(&lines));
  }

  #[test]
  fn test_marker_after_scan_window_ignored() {
    let detector = SpdxMarkerDetector::default();
    let lines = ["a", "b", "c", "d", "e", "// SPDX-License-Identifier: MIT"];
    assert!(!detector.has_header(&lines));

    let detector = SpdxMarkerDetector::default().with_scan_lines(6);
    assert!(detector.has_header(&lines));
  }

  #[test]
  fn test_marker_in_string_literal_counts() {
    let detector = SpdxMarkerDetector::default();
    let lines = ["package spdx", "", "const Key = \"SPDX-License-Identifier\""];
    assert!(detector.has_header(&lines));
  }

  #[test]
  fn test_custom_marker() {
    let detector = SpdxMarkerDetector::new("@license");
    assert!(detector.has_header(&["/* @license MIT */"]));
    assert!(!detector.has_header(&["// SPDX-License-Identifier: MIT"]));
  }
}
