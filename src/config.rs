//! # Configuration Module
//!
//! This module holds the directory rule table and the fixed parts of every
//! header. The built-in defaults describe the Texelation tree; a project can
//! replace any section by checking in a `.edheader.toml` file (or pointing the
//! `EDHEADER_CONFIG` environment variable at one).
//!
//! Configuration is read once at startup and never changes afterwards.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".edheader.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "EDHEADER_CONFIG";

/// Built-in directory rules: `(prefix, component, usage template, notes)`.
const BUILTIN_RULES: &[(&str, &str, &str, &str)] = &[
  (
    "client/cmd/texel-client",
    "remote client binary",
    "Invoked by end users to render the server-hosted desktop locally; other tooling wraps this runtime via internal/runtime/client.Run.",
    "Depends on the client runtime packages; keep it thin so alternate front-ends can reuse the same code.",
  ),
  (
    "client/cmd/texel-headless",
    "headless client harness",
    "Used in CI and automated tests to validate protocol flows without opening a tcell screen.",
    "Provides a minimal client for scripted scenarios.",
  ),
  (
    "client",
    "client runtime support library",
    "Imported by the remote renderer to manage {feature} during live sessions.",
    "Shared across multiple client binaries and tests.",
  ),
  (
    "apps/clock",
    "clock status widget",
    "Loaded into the desktop chrome to display time information.",
    "Uses shared texel primitives for drawing.",
  ),
  (
    "apps/statusbar",
    "status bar application",
    "Added to desktops to render workspace and mode metadata.",
    "Works in both local and remote deployments.",
  ),
  (
    "apps/texelterm/parser",
    "terminal parser module",
    "Consumed by the terminal app when decoding VT sequences.",
    "Keeps parsing concerns isolated from rendering.",
  ),
  (
    "apps/texelterm",
    "terminal application",
    "Spawned by desktop factories to provide shell access.",
    "Wraps PTY management and integrates with the parser package.",
  ),
  (
    "apps/welcome",
    "welcome application",
    "Presented on new sessions to guide users through the interface.",
    "Displays static content; simple example app.",
  ),
  (
    "internal/effects",
    "client effect subsystem",
    "Used by the client runtime to orchestrate {feature} visuals before rendering.",
    "Centralises every pane and workspace overlay so they can be configured via themes.",
  ),
  (
    "internal/runtime/client",
    "remote client runtime",
    "Embedded by client binaries to handle {feature} as part of the render/event loop.",
    "Owns session management, rendering, and protocol interaction for remote front-ends.",
  ),
  (
    "internal/runtime/server/testutil",
    "server runtime test utilities",
    "Imported by server tests when they need {feature} helpers.",
    "Not shipped with production binaries; only used in test code.",
  ),
  (
    "internal/runtime/server",
    "server runtime",
    "Used by texel-server to coordinate {feature} when hosting apps and sessions.",
    "This package bridges the legacy desktop code with the client/server protocol implementation.",
  ),
  (
    "protocol",
    "protocol definitions",
    "Shared by clients and servers to encode {feature} messages over the wire.",
    "Keep changes backward-compatible; any additions require coordinated version bumps.",
  ),
  (
    "texel/theme",
    "theme subsystem",
    "Accessed by both server and client when reading {feature} from theme configurations.",
    "Ensures user theme files always contain required defaults.",
  ),
  (
    "texel",
    "core desktop engine",
    "Used throughout the project to implement {feature} inside the desktop and panes.",
    "Legacy desktop logic migrated from the monolithic application.",
  ),
  (
    "cmd/texel-server",
    "server CLI harness",
    "Executed by operators to start the production server that manages sessions.",
    "Focuses on wiring flags and lifecycle around the internal runtime.",
  ),
  (
    "cmd/texel-stress",
    "stress harness",
    "Run in integration environments to pressure-test server throughput and protocol stability.",
    "Spawns multiple client connections to simulate load.",
  ),
];

/// Metadata for one directory, or for the fallback rule.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
  /// Display name of the owning component.
  pub component: String,

  /// Usage line template. `{feature}` and `{component}` are substituted.
  pub usage: String,

  /// Free-form notes. Directory rules without notes inherit the fallback
  /// rule's notes.
  #[serde(default)]
  pub notes: Option<String>,
}

impl RuleConfig {
  pub fn new(component: &str, usage: &str, notes: &str) -> Self {
    Self {
      component: component.to_string(),
      usage: usage.to_string(),
      notes: Some(notes.to_string()),
    }
  }
}

/// The fixed parts of every header and the set of files it applies to.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct HeaderConfig {
  /// Copyright holder printed after the year.
  pub holder: String,

  /// SPDX license expression.
  pub license: String,

  /// Copyright year. Defaults to the current year when unset.
  pub year: Option<String>,

  /// File extensions (without the leading dot) that receive headers.
  pub extensions: Vec<String>,
}

impl Default for HeaderConfig {
  fn default() -> Self {
    Self {
      holder: "Texelation contributors".to_string(),
      license: "AGPL-3.0-or-later".to_string(),
      year: None,
      extensions: vec!["go".to_string()],
    }
  }
}

/// Toolchain-specific markers: directive prefixes, file-name suffixes, and the
/// fixed usage lines for tests and benchmarks.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct MarkerConfig {
  /// Marker written on the license line and searched for on later runs.
  pub spdx: String,

  /// Build directive lines that must stay above the header.
  pub directive: String,

  /// Legacy build directive allowed once after the main directives.
  pub alt_directive: String,

  pub bench_suffix: String,

  pub test_suffixes: Vec<String>,

  pub bench_usage: String,

  pub test_usage: String,
}

impl Default for MarkerConfig {
  fn default() -> Self {
    Self {
      spdx: "SPDX-License-Identifier".to_string(),
      directive: "//go:build".to_string(),
      alt_directive: "// +build".to_string(),
      bench_suffix: "_bench_test".to_string(),
      test_suffixes: vec!["_test".to_string(), "_tests".to_string()],
      bench_usage: "Run via `go test -bench` to observe hot-path behaviour under load.".to_string(),
      test_usage: "Executed during `go test` to guard against regressions.".to_string(),
    }
  }
}

/// Main configuration struct for edheader.
///
/// Sections missing from a config file keep their built-in values, so a file
/// containing only `[header]` still uses the built-in rule table.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  pub header: HeaderConfig,

  pub markers: MarkerConfig,

  /// Rule used when no directory prefix matches.
  pub default: RuleConfig,

  /// Directory rules keyed by path prefix.
  pub rules: BTreeMap<String, RuleConfig>,
}

impl Default for Config {
  fn default() -> Self {
    let rules = BUILTIN_RULES
      .iter()
      .map(|(prefix, component, usage, notes)| (prefix.to_string(), RuleConfig::new(component, usage, notes)))
      .collect();

    Self {
      header: HeaderConfig::default(),
      markers: MarkerConfig::default(),
      default: RuleConfig::new(
        "Texelation module",
        "Referenced within the project wherever {feature} support is required.",
        "Part of the Texelation AGPLv3 codebase.",
      ),
      rules,
    }
  }
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// Two rules normalize to the same prefix, so a longest-prefix match
  /// between them could not be decided.
  #[error("Ambiguous directory rules: '{first}' and '{second}' both resolve to prefix '{prefix}'")]
  AmbiguousPrefix {
    prefix: String,
    first: String,
    second: String,
  },

  /// A directory rule is unusable.
  #[error("Invalid rule for '{prefix}': {message}")]
  InvalidRule { prefix: String, message: String },

  /// A header or marker setting is unusable.
  #[error("Invalid setting '{key}': {message}")]
  InvalidSetting { key: String, message: String },
}

impl Config {
  /// Load configuration from a file.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if it fails
  /// validation.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    config.validate()?;

    verbose_log!("Loaded {} directory rules", config.rules.len());

    Ok(config)
  }

  /// Validate the configuration.
  ///
  /// Checks that:
  /// - The SPDX marker, holder and license are non-empty
  /// - Extensions don't include the leading dot
  /// - Every rule has a non-empty component
  ///
  /// Prefix ambiguity is checked when the rule table is built.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let required = [
      ("markers.spdx", &self.markers.spdx),
      ("header.holder", &self.header.holder),
      ("header.license", &self.header.license),
    ];
    for (key, value) in required {
      if value.trim().is_empty() {
        return Err(ConfigError::InvalidSetting {
          key: key.to_string(),
          message: "value cannot be empty".to_string(),
        });
      }
    }

    for ext in &self.header.extensions {
      if ext.starts_with('.') {
        return Err(ConfigError::InvalidSetting {
          key: "header.extensions".to_string(),
          message: format!("extension '{ext}' should not include leading dot"),
        });
      }
    }

    if self.default.component.trim().is_empty() {
      return Err(ConfigError::InvalidRule {
        prefix: "<default>".to_string(),
        message: "component cannot be empty".to_string(),
      });
    }

    for (prefix, rule) in &self.rules {
      if rule.component.trim().is_empty() {
        return Err(ConfigError::InvalidRule {
          prefix: prefix.clone(),
          message: "component cannot be empty".to_string(),
        });
      }
    }

    Ok(())
  }
}

/// Discover the configuration file path.
///
/// The configuration file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`)
/// 2. Path specified via `EDHEADER_CONFIG` environment variable
/// 3. `.edheader.toml` in the project root
pub fn discover_config_path(explicit_path: Option<&Path>, root: &Path) -> Option<PathBuf> {
  if let Some(path) = explicit_path {
    if path.exists() {
      verbose_log!("Using explicit config path: {}", path.display());
      return Some(path.to_path_buf());
    }
    verbose_log!("Explicit config path does not exist: {}", path.display());
    return None;
  }

  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(&env_path);
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  let root_config = root.join(DEFAULT_CONFIG_FILENAME);
  if root_config.exists() {
    verbose_log!("Using project config: {}", root_config.display());
    return Some(root_config);
  }

  verbose_log!("No config file found, using built-in rules");
  None
}

/// Load configuration from the discovered path, falling back to the built-in
/// defaults.
///
/// An explicit path that does not exist is an error rather than a silent
/// fallback.
pub fn load_config(explicit_path: Option<&Path>, root: &Path, no_config: bool) -> Result<Config> {
  if no_config {
    verbose_log!("Config file discovery disabled (--no-config)");
    return Ok(Config::default());
  }

  if let Some(path) = explicit_path
    && !path.exists()
  {
    anyhow::bail!("Config file not found: {}", path.display());
  }

  match discover_config_path(explicit_path, root) {
    Some(path) => Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display())),
    None => Ok(Config::default()),
  }
}
