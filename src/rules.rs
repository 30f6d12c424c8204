//! # Rules Module
//!
//! Maps a file's project-relative path to the metadata of the component that
//! owns it.
//!
//! A rule matches a path when the path equals the rule's prefix or lies under
//! it (`prefix + "/"`). The longest matching prefix wins, so a rule for
//! `apps/texelterm/parser` takes precedence over one for `apps/texelterm`.
//! Paths no rule matches fall back to the default rule.
//!
//! ```rust
//! use edheader::rules::{DirectoryRule, RuleTable};
//!
//! # fn main() -> anyhow::Result<()> {
//! let table = RuleTable::new(
//!   vec![
//!     DirectoryRule::new("a", "outer", "Uses {feature}.", "outer notes"),
//!     DirectoryRule::new("a/b", "inner", "Uses {feature}.", "inner notes"),
//!   ],
//!   DirectoryRule::fallback("module", "Uses {feature}.", "default notes"),
//! )?;
//!
//! assert_eq!(table.resolve("a/b/c.go").component, "inner");
//! assert_eq!(table.resolve("a/x.go").component, "outer");
//! assert_eq!(table.resolve("zzz/y.go").component, "module");
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::path::{Component, Path};

use crate::config::{Config, ConfigError};

/// One entry of the rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRule {
  /// Normalized `/`-separated prefix. Empty for the fallback rule.
  prefix: String,
  component: String,
  usage_template: String,
  notes: String,
}

impl DirectoryRule {
  pub fn new(prefix: &str, component: &str, usage_template: &str, notes: &str) -> Self {
    Self {
      prefix: prefix.to_string(),
      component: component.to_string(),
      usage_template: usage_template.to_string(),
      notes: notes.to_string(),
    }
  }

  /// Creates the rule applied when no prefix matches.
  pub fn fallback(component: &str, usage_template: &str, notes: &str) -> Self {
    Self::new("", component, usage_template, notes)
  }

  fn matches(&self, path: &str) -> bool {
    path
      .strip_prefix(self.prefix.as_str())
      .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
  }

  fn metadata(&self) -> ResolvedMetadata<'_> {
    ResolvedMetadata {
      prefix: (!self.prefix.is_empty()).then_some(self.prefix.as_str()),
      component: self.component.as_str(),
      usage_template: self.usage_template.as_str(),
      notes: self.notes.as_str(),
    }
  }
}

/// The metadata chosen for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMetadata<'a> {
  /// Prefix of the matching rule, `None` when the default rule applied.
  pub prefix: Option<&'a str>,
  pub component: &'a str,
  pub usage_template: &'a str,
  pub notes: &'a str,
}

/// Immutable rule table built once at startup.
#[derive(Debug, Clone)]
pub struct RuleTable {
  rules: Vec<DirectoryRule>,
  default: DirectoryRule,
}

impl RuleTable {
  /// Builds a rule table, normalizing every prefix.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::InvalidRule`] for a prefix that is empty after
  /// normalization and [`ConfigError::AmbiguousPrefix`] when two rules
  /// normalize to the same prefix.
  pub fn new(rules: impl IntoIterator<Item = DirectoryRule>, default: DirectoryRule) -> Result<Self, ConfigError> {
    let mut seen: HashMap<String, String> = HashMap::new();
    let mut normalized_rules = Vec::new();

    for mut rule in rules {
      let normalized = normalize_prefix(&rule.prefix);
      if normalized.is_empty() {
        return Err(ConfigError::InvalidRule {
          prefix: rule.prefix,
          message: "prefix cannot be empty".to_string(),
        });
      }

      if let Some(first) = seen.get(&normalized) {
        return Err(ConfigError::AmbiguousPrefix {
          prefix: normalized,
          first: first.clone(),
          second: rule.prefix,
        });
      }

      seen.insert(normalized.clone(), rule.prefix.clone());
      rule.prefix = normalized;
      normalized_rules.push(rule);
    }

    Ok(Self {
      rules: normalized_rules,
      default: DirectoryRule { prefix: String::new(), ..default },
    })
  }

  /// Builds the rule table described by a configuration.
  ///
  /// Rules without notes inherit the default rule's notes.
  pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
    let default_notes = config.default.notes.clone().unwrap_or_default();

    let rules = config.rules.iter().map(|(prefix, rule)| {
      DirectoryRule::new(
        prefix,
        &rule.component,
        &rule.usage,
        rule.notes.as_deref().unwrap_or(&default_notes),
      )
    });

    let default = DirectoryRule::fallback(&config.default.component, &config.default.usage, &default_notes);

    Self::new(rules, default)
  }

  /// Resolves the metadata for a `/`-separated, project-relative path.
  ///
  /// Ties cannot happen: [`RuleTable::new`] rejects duplicate prefixes, and
  /// distinct prefixes of equal length cannot both match the same path.
  pub fn resolve(&self, relative_path: &str) -> ResolvedMetadata<'_> {
    let path = relative_path.trim_start_matches("./");

    self
      .rules
      .iter()
      .filter(|rule| rule.matches(path))
      .max_by_key(|rule| rule.prefix.len())
      .unwrap_or(&self.default)
      .metadata()
  }

  pub fn len(&self) -> usize {
    self.rules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }
}

fn normalize_prefix(prefix: &str) -> String {
  let trimmed = prefix.trim().replace('\\', "/");
  let trimmed = trimmed.trim_start_matches("./").trim_matches('/');
  trimmed.to_string()
}

/// Renders a relative path with `/` separators, dropping `.` components.
pub fn slash_path(path: &Path) -> String {
  path
    .components()
    .filter_map(|component| match component {
      Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
      Component::ParentDir => Some("..".to_string()),
      _ => None,
    })
    .collect::<Vec<_>>()
    .join("/")
}
