//! # Ignore Module
//!
//! This module contains functionality for excluding files from license
//! processing based on user-supplied glob patterns.
//!
//! Patterns support `*`, `**`, `?`, character classes/ranges/negation, and
//! brace alternatives. Every pattern is compiled exactly once, before the
//! traversal begins; an invalid pattern is a fatal configuration error rather
//! than a per-file one.

use std::path::Path;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::verbose_log;

/// Manager for the set of ignore patterns supplied on the command line.
///
/// # Examples
///
/// ```rust
/// use std::path::Path;
///
/// use headlight::ignore::IgnoreManager;
///
/// # fn main() -> anyhow::Result<()> {
/// let manager = IgnoreManager::new(vec!["**/*.json".to_string()])?;
/// assert!(manager.is_ignored(Path::new("src/config.json")));
/// assert!(!manager.is_ignored(Path::new("src/config.rs")));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct IgnoreManager {
  /// Pre-compiled glob set for zero-allocation matching
  glob_set: GlobSet,
}

impl IgnoreManager {
  /// Creates a new ignore manager from the specified glob patterns.
  ///
  /// Patterns are normalized so that bare directory names and
  /// `dir/`-suffixed patterns match the directory's whole subtree, and
  /// unanchored patterns match at any depth of the walked paths.
  ///
  /// # Errors
  ///
  /// Returns an error if any of the patterns are invalid.
  pub fn new(patterns: Vec<String>) -> Result<Self> {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
      // Normalize pattern: convert backslashes to forward slashes
      let pattern = pattern.replace('\\', "/");

      // Helper to add a pattern to the builder
      let add_pattern = |b: &mut GlobSetBuilder, p: &str| -> Result<()> {
        b.add(Glob::new(p).with_context(|| format!("Invalid glob pattern: {}", p))?);
        Ok(())
      };

      // Handle directory patterns (ending with /)
      if let Some(dir_pattern) = pattern.strip_suffix('/') {
        // Add both the exact directory match and recursive match
        add_pattern(&mut builder, dir_pattern)?;
        add_pattern(&mut builder, &format!("{}/**", dir_pattern))?;
        add_pattern(&mut builder, &format!("**/{}/**", dir_pattern))?;
        add_pattern(&mut builder, &format!("**/{}", dir_pattern))?;
      } else if !pattern.contains('*') && !pattern.contains('?') {
        // Plain name without wildcards - treat as potential directory or file match
        add_pattern(&mut builder, &pattern)?;
        add_pattern(&mut builder, &format!("**/{}", pattern))?;
        add_pattern(&mut builder, &format!("{}/**", pattern))?;
        add_pattern(&mut builder, &format!("**/{}/**", pattern))?;
      } else {
        // Regular glob pattern with wildcards
        add_pattern(&mut builder, &pattern)?;

        // Also add **/ prefix to match pattern anywhere in path (for absolute paths)
        if !pattern.starts_with("**/") {
          add_pattern(&mut builder, &format!("**/{}", pattern))?;
        }
      }
    }

    let glob_set = builder.build().with_context(|| "Failed to build glob set")?;

    Ok(Self { glob_set })
  }

  /// Checks if a path matches any of the ignore patterns.
  ///
  /// # Parameters
  ///
  /// * `path` - Path to the file to check
  ///
  /// # Returns
  ///
  /// `true` if the file should be excluded from processing.
  pub fn is_ignored(&self, path: &Path) -> bool {
    if self.glob_set.is_match(path) {
      verbose_log!("Skipping: {} (matches ignore pattern)", path.display());
      return true;
    }
    false
  }
}
