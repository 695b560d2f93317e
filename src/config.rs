//! # Configuration Module
//!
//! This module provides configuration support for headlight, allowing users
//! to customize comment styles for file extensions and filenames beyond the
//! built-in table.
//!
//! Configuration can be specified in a `.headlight.toml` file in the current
//! directory, a file passed via `--config`, or inline with repeated
//! `--comment-style EXT:STYLE` arguments.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".headlight.toml";

/// User-defined comment style configuration.
///
/// This struct represents a custom comment style that can be specified in the
/// configuration file. It defines how license comments should be formatted for
/// a specific file extension or filename.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CommentStyleConfig {
  /// The string to use at the top of a comment block (e.g., "/*").
  /// Optional for line-style comments.
  #[serde(default)]
  pub top: String,

  /// The string to use at the beginning of each line in the comment block
  /// (e.g., " * " or "// ").
  pub middle: String,

  /// The string to use at the bottom of a comment block (e.g., " */").
  /// Optional for line-style comments.
  #[serde(default)]
  pub bottom: String,
}

impl CommentStyleConfig {
  /// Create a new line-comment style (no top/bottom markers).
  pub fn line(prefix: &str) -> Self {
    Self {
      top: String::new(),
      middle: prefix.to_string(),
      bottom: String::new(),
    }
  }

  /// Create a new block-comment style.
  #[allow(dead_code)]
  pub fn block(top: &str, middle: &str, bottom: &str) -> Self {
    Self {
      top: top.to_string(),
      middle: middle.to_string(),
      bottom: bottom.to_string(),
    }
  }
}

/// Main configuration struct for headlight.
///
/// Loaded from a `.headlight.toml` file; contains the user-configurable
/// comment style overrides.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
  /// Custom comment styles for file extensions.
  /// Keys are file extensions without the leading dot (e.g., "java", "xyz").
  #[serde(default, rename = "comment-styles")]
  pub comment_styles: HashMap<String, CommentStyleConfig>,

  /// Filename-specific comment style overrides.
  /// Keys are exact filenames or glob patterns (e.g., "Justfile",
  /// "*.tmpl.html").
  #[serde(default)]
  pub filenames: HashMap<String, CommentStyleConfig>,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  Read { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  Parse { path: PathBuf, source: toml::de::Error },

  /// A comment style configuration is invalid.
  #[error("Invalid comment style for '{extension}': {message}")]
  InvalidCommentStyle { extension: String, message: String },
}

impl Config {
  /// Load configuration from a file.
  ///
  /// # Arguments
  ///
  /// * `path` - Path to the configuration file
  ///
  /// # Returns
  ///
  /// The loaded configuration, or an error if the file cannot be read or
  /// parsed.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
      path: path.to_path_buf(),
      source: e,
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
      path: path.to_path_buf(),
      source: e,
    })?;

    config.validate()?;

    // Normalize keys to lowercase for case-insensitive matching
    let config = config.normalize();

    verbose_log!(
      "Loaded {} comment style overrides",
      config.comment_styles.len() + config.filenames.len()
    );

    Ok(config)
  }

  /// Validate the configuration.
  ///
  /// Checks that:
  /// - All `middle` fields are non-empty
  /// - Extension names don't include the leading dot
  fn validate(&self) -> Result<(), ConfigError> {
    for (ext, style) in &self.comment_styles {
      if style.middle.is_empty() {
        return Err(ConfigError::InvalidCommentStyle {
          extension: ext.clone(),
          message: "middle field cannot be empty".to_string(),
        });
      }

      if ext.starts_with('.') {
        return Err(ConfigError::InvalidCommentStyle {
          extension: ext.clone(),
          message: "extension should not include leading dot".to_string(),
        });
      }
    }

    for (filename, style) in &self.filenames {
      if style.middle.is_empty() {
        return Err(ConfigError::InvalidCommentStyle {
          extension: filename.clone(),
          message: "middle field cannot be empty".to_string(),
        });
      }
    }

    Ok(())
  }

  /// Normalize configuration keys to lowercase for case-insensitive matching.
  ///
  /// This ensures that config keys like "Justfile" or "CMakeLists.txt" will
  /// match the lowercased filenames used during lookup.
  fn normalize(self) -> Self {
    Self {
      comment_styles: self
        .comment_styles
        .into_iter()
        .map(|(k, v)| (k.to_lowercase(), v))
        .collect(),
      filenames: self.filenames.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect(),
    }
  }

  /// Merge CLI comment style overrides into this config.
  ///
  /// CLI overrides take precedence over values from the config file.
  pub fn merge_cli_overrides(&mut self, overrides: CliOverrides) {
    for (ext, style) in overrides.comment_styles {
      self.comment_styles.insert(ext, style);
    }
  }
}

/// Comment style overrides supplied on the command line.
#[derive(Debug, Default)]
pub struct CliOverrides {
  /// Extension overrides parsed from `--comment-style EXT:STYLE` arguments.
  pub comment_styles: HashMap<String, CommentStyleConfig>,
}

impl CliOverrides {
  /// Parse `--comment-style` arguments of the form `EXT:STYLE`, where STYLE
  /// is the line prefix to use (e.g. `java:// ` or `xyz:# `).
  ///
  /// # Errors
  ///
  /// Returns an error when an argument is missing the `:` separator or has an
  /// empty extension or style.
  pub fn from_cli_args(args: &[String]) -> Result<Self, ConfigError> {
    let mut comment_styles = HashMap::new();

    for arg in args {
      let Some((ext, style)) = arg.split_once(':') else {
        return Err(ConfigError::InvalidCommentStyle {
          extension: arg.clone(),
          message: "expected EXT:STYLE format".to_string(),
        });
      };

      if ext.is_empty() || style.is_empty() {
        return Err(ConfigError::InvalidCommentStyle {
          extension: arg.clone(),
          message: "extension and style must both be non-empty".to_string(),
        });
      }

      comment_styles.insert(ext.to_lowercase(), CommentStyleConfig::line(style));
    }

    Ok(Self { comment_styles })
  }
}

/// Load the effective configuration for a run.
///
/// An explicit `--config` path must exist; otherwise `.headlight.toml` in the
/// current directory is used when present. `--no-config` suppresses both.
///
/// # Returns
///
/// `Some(Config)` when a config file was loaded, `None` otherwise.
pub fn load_config(explicit_path: Option<&Path>, no_config: bool) -> Result<Option<Config>> {
  if no_config {
    return Ok(None);
  }

  if let Some(path) = explicit_path {
    return Ok(Some(Config::load(path)?));
  }

  let default_path = Path::new(DEFAULT_CONFIG_FILENAME);
  if default_path.exists() {
    return Ok(Some(Config::load(default_path)?));
  }

  Ok(None)
}
