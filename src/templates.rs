//! # Templates Module
//!
//! This module builds the header block written at the top of each file.
//!
//! The module includes:
//! - [`HeaderSettings`] for the fixed parts of every header (holder, license,
//!   year, test and benchmark wording)
//! - [`FileKind`] for classifying files as production, test or benchmark code
//! - [`HeaderSynthesizer`] for turning a file name and its resolved rule into
//!   a [`HeaderBlock`]
//!
//! ## Example
//!
//! ```rust
//! use edheader::rules::ResolvedMetadata;
//! use edheader::templates::{HeaderSettings, HeaderSynthesizer};
//!
//! let synthesizer = HeaderSynthesizer::new(HeaderSettings::default());
//! let metadata = ResolvedMetadata {
//!   prefix: Some("protocol"),
//!   component: "protocol definitions",
//!   usage_template: "Shared by clients and servers to encode {feature} messages over the wire.",
//!   notes: "Keep changes backward-compatible.",
//! };
//!
//! let header = synthesizer.synthesize("protocol/codec.go", "codec", &metadata);
//! assert_eq!(
//!   header.lines()[4],
//!   "// Summary: Implements codec capabilities for the protocol definitions."
//! );
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::Config;
use crate::rules::ResolvedMetadata;
use crate::verbose_log;

/// Feature label used when a file name has nothing left after stripping.
pub const FALLBACK_FEATURE: &str = "main";

/// Fixed data shared by every header in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSettings {
  /// Line comment prefix. Headers are always line-comment based.
  pub comment_prefix: String,
  pub holder: String,
  pub license: String,
  pub year: String,
  /// Marker written before the license expression.
  pub spdx_marker: String,
  pub bench_suffix: String,
  pub test_suffixes: Vec<String>,
  pub bench_usage: String,
  pub test_usage: String,
}

impl HeaderSettings {
  /// Builds settings from configuration and the copyright year to stamp.
  pub fn from_config(config: &Config, year: String) -> Self {
    Self {
      comment_prefix: "//".to_string(),
      holder: config.header.holder.clone(),
      license: config.header.license.clone(),
      year,
      spdx_marker: config.markers.spdx.clone(),
      bench_suffix: config.markers.bench_suffix.clone(),
      test_suffixes: config.markers.test_suffixes.clone(),
      bench_usage: config.markers.bench_usage.clone(),
      test_usage: config.markers.test_usage.clone(),
    }
  }
}

impl Default for HeaderSettings {
  fn default() -> Self {
    Self::from_config(&Config::default(), "2025".to_string())
  }
}

/// Classification of a file by its base-name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
  Benchmark,
  Test,
  Production,
}

impl fmt::Display for FileKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FileKind::Benchmark => write!(f, "benchmark"),
      FileKind::Test => write!(f, "test"),
      FileKind::Production => write!(f, "production"),
    }
  }
}

/// Ordered comment lines of one header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderBlock {
  lines: Vec<String>,
}

impl HeaderBlock {
  pub fn lines(&self) -> &[String] {
    &self.lines
  }

  pub fn len(&self) -> usize {
    self.lines.len()
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }
}

impl fmt::Display for HeaderBlock {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for line in &self.lines {
      writeln!(f, "{line}")?;
    }
    Ok(())
  }
}

/// Builds header blocks from file names and resolved rules.
pub struct HeaderSynthesizer {
  settings: HeaderSettings,
}

impl HeaderSynthesizer {
  pub const fn new(settings: HeaderSettings) -> Self {
    Self { settings }
  }

  /// Classifies a base name (without extension).
  ///
  /// The benchmark suffix is checked first since it usually ends with a test
  /// suffix as well.
  pub fn classify<'a>(&self, base_name: &'a str) -> (FileKind, &'a str) {
    let bench = self.settings.bench_suffix.as_str();
    if !bench.is_empty()
      && let Some(stem) = base_name.strip_suffix(bench)
    {
      return (FileKind::Benchmark, stem);
    }

    for suffix in self.settings.test_suffixes.iter().filter(|s| !s.is_empty()) {
      if let Some(stem) = base_name.strip_suffix(suffix.as_str()) {
        return (FileKind::Test, stem);
      }
    }

    (FileKind::Production, base_name)
  }

  /// Builds the header for one file.
  ///
  /// # Parameters
  ///
  /// * `relative_path` - `/`-separated path printed on the `File:` line
  /// * `base_name` - File name without extension, used for classification
  /// * `metadata` - The rule resolved for the file
  pub fn synthesize(&self, relative_path: &str, base_name: &str, metadata: &ResolvedMetadata<'_>) -> HeaderBlock {
    let (kind, stem) = self.classify(base_name);
    let feature = feature_label(stem);
    let component = metadata.component;

    verbose_log!("Classified {} as {} (feature: {})", relative_path, kind, feature);

    let (summary, usage) = match kind {
      FileKind::Benchmark => (
        format!("Benchmarks {feature} performance within the {component}."),
        self.settings.bench_usage.clone(),
      ),
      FileKind::Test => (
        format!("Exercises {feature} behaviour to ensure the {component} remains reliable."),
        self.settings.test_usage.clone(),
      ),
      FileKind::Production => (
        format!("Implements {feature} capabilities for the {component}."),
        render_usage(metadata.usage_template, &feature, component),
      ),
    };

    let prefix = &self.settings.comment_prefix;
    let lines = vec![
      format!("{prefix} Copyright © {} {}", self.settings.year, self.settings.holder),
      format!("{prefix} {}: {}", self.settings.spdx_marker, self.settings.license),
      prefix.clone(),
      format!("{prefix} File: {relative_path}"),
      format!("{prefix} Summary: {summary}"),
      format!("{prefix} Usage: {usage}"),
      format!("{prefix} Notes: {}", metadata.notes),
    ];

    HeaderBlock { lines }
  }
}

/// Turns a stripped base name into a readable phrase.
///
/// Underscores, hyphens and whitespace runs collapse to single spaces. A name
/// with no alphanumeric content becomes [`FALLBACK_FEATURE`].
pub fn feature_label(stem: &str) -> String {
  static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_\-\s]+").expect("separator regex must compile"));

  let label = SEPARATORS.replace_all(stem, " ");
  let label = label.trim();

  if label.chars().any(char::is_alphanumeric) {
    label.to_string()
  } else {
    FALLBACK_FEATURE.to_string()
  }
}

/// Substitutes `{feature}` and `{component}` in a usage template.
///
/// Both placeholders are replaced in one pass, so placeholder text inside a
/// substituted value is left as is.
pub fn render_usage(template: &str, feature: &str, component: &str) -> String {
  static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(feature|component)\}").expect("placeholder regex must compile"));

  PLACEHOLDER
    .replace_all(template, |caps: &Captures<'_>| match &caps[1] {
      "feature" => feature,
      _ => component,
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn protocol_metadata() -> ResolvedMetadata<'static> {
    ResolvedMetadata {
      prefix: Some("protocol"),
      component: "protocol definitions",
      usage_template: "Shared by clients and servers to encode {feature} messages over the wire.",
      notes: "Keep changes backward-compatible; any additions require coordinated version bumps.",
    }
  }

  #[test]
  fn test_classify() {
    let synthesizer = HeaderSynthesizer::new(HeaderSettings::default());

    assert_eq!(synthesizer.classify("foo_bar_test"), (FileKind::Test, "foo_bar"));
    assert_eq!(synthesizer.classify("foo_bench_test"), (FileKind::Benchmark, "foo"));
    assert_eq!(synthesizer.classify("foo_tests"), (FileKind::Test, "foo"));
    assert_eq!(synthesizer.classify("codec"), (FileKind::Production, "codec"));
    assert_eq!(synthesizer.classify("test"), (FileKind::Production, "test"));
  }

  #[test]
  fn test_classify_stem_outlives_synthesizer() {
    let base_name = String::from("frame_bench_test");
    let stem = {
      let synthesizer = HeaderSynthesizer::new(HeaderSettings::default());
      synthesizer.classify(&base_name).1
    };

    assert_eq!(stem, "frame");
  }

  #[test]
  fn test_feature_label() {
    assert_eq!(feature_label("foo_bar"), "foo bar");
    assert_eq!(feature_label("desktop-engine_zoom"), "desktop engine zoom");
    assert_eq!(feature_label("__a__b__"), "a b");
    assert_eq!(feature_label(""), FALLBACK_FEATURE);
    assert_eq!(feature_label("_-_"), FALLBACK_FEATURE);
  }

  #[test]
  fn test_synthesize_production_scenario() {
    let synthesizer = HeaderSynthesizer::new(HeaderSettings::default());
    let header = synthesizer.synthesize("protocol/codec.go", "codec", &protocol_metadata());

    assert_eq!(
      header.lines(),
      &[
        "// Copyright © 2025 Texelation contributors",
        "// SPDX-License-Identifier: AGPL-3.0-or-later",
        "//",
        "// File: protocol/codec.go",
        "// Summary: Implements codec capabilities for the protocol definitions.",
        "// Usage: Shared by clients and servers to encode codec messages over the wire.",
        "// Notes: Keep changes backward-compatible; any additions require coordinated version bumps.",
      ]
    );
  }

  #[test]
  fn test_synthesize_test_file() {
    let synthesizer = HeaderSynthesizer::new(HeaderSettings::default());
    let header = synthesizer.synthesize("protocol/messages_test.go", "messages_test", &protocol_metadata());

    assert_eq!(
      header.lines()[4],
      "// Summary: Exercises messages behaviour to ensure the protocol definitions remains reliable."
    );
    assert_eq!(
      header.lines()[5],
      "// Usage: Executed during `go test` to guard against regressions."
    );
  }

  #[test]
  fn test_synthesize_benchmark_file() {
    let synthesizer = HeaderSynthesizer::new(HeaderSettings::default());
    let header = synthesizer.synthesize("protocol/frame_bench_test.go", "frame_bench_test", &protocol_metadata());

    assert_eq!(
      header.lines()[4],
      "// Summary: Benchmarks frame performance within the protocol definitions."
    );
    assert!(header.lines()[5].contains("go test -bench"));
  }

  #[test]
  fn test_synthesize_empty_feature_uses_main() {
    let synthesizer = HeaderSynthesizer::new(HeaderSettings::default());
    let header = synthesizer.synthesize("protocol/_test.go", "_test", &protocol_metadata());

    assert_eq!(
      header.lines()[4],
      "// Summary: Exercises main behaviour to ensure the protocol definitions remains reliable."
    );
  }

  #[test]
  fn test_render_usage_substitutes_component() {
    assert_eq!(
      render_usage("Serves {feature} for the {component}.", "zoom effect", "client runtime"),
      "Serves zoom effect for the client runtime."
    );
    assert_eq!(render_usage("No placeholders.", "x", "y"), "No placeholders.");
  }

  #[test]
  fn test_render_usage_does_not_expand_substituted_text() {
    assert_eq!(
      render_usage("Handles {feature} for the {component}.", "{component}", "server runtime"),
      "Handles {component} for the server runtime."
    );
    assert_eq!(
      render_usage("{component} uses {feature}.", "zoom", "{feature} host"),
      "{feature} host uses zoom."
    );
  }

  #[test]
  fn test_custom_settings() {
    let settings = HeaderSettings {
      holder: "Example Corp".to_string(),
      license: "MIT".to_string(),
      year: "2031".to_string(),
      ..HeaderSettings::default()
    };
    let synthesizer = HeaderSynthesizer::new(settings);
    let header = synthesizer.synthesize("main.go", "main", &protocol_metadata());

    assert_eq!(header.lines()[0], "// Copyright © 2031 Example Corp");
    assert_eq!(header.lines()[1], "// SPDX-License-Identifier: MIT");
    assert_eq!(header.len(), 7);
  }

  #[test]
  fn test_header_block_display() {
    let synthesizer = HeaderSynthesizer::new(HeaderSettings::default());
    let header = synthesizer.synthesize("main.go", "main", &protocol_metadata());
    let rendered = header.to_string();

    assert_eq!(rendered.lines().count(), 7);
    assert!(rendered.ends_with('\n'));
  }
}
