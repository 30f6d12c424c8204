//! # File I/O Module
//!
//! This module provides file reading and writing utilities for the processor.
//! Files are only ever handled as UTF-8 text; anything else is reported as an
//! error for that file.

use std::path::Path;

use anyhow::{Context, Result};

/// Number of leading bytes checked for NUL when sniffing binary content.
pub const BINARY_SNIFF_LIMIT: usize = 8 * 1024;

/// File I/O operations for the processor.
pub struct FileIO;

impl FileIO {
  /// Reads a file as UTF-8 text.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read, looks binary (contains a NUL
  /// byte near the start), or is not valid UTF-8.
  pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;

    let sniff_len = bytes.len().min(BINARY_SNIFF_LIMIT);
    if bytes[..sniff_len].contains(&0) {
      anyhow::bail!("Refusing to annotate binary file: {}", path.display());
    }

    String::from_utf8(bytes).with_context(|| format!("File is not valid UTF-8 text: {}", path.display()))
  }

  /// Write file content.
  pub fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
  }
}
