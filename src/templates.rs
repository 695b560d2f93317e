//! # Templates Module
//!
//! This module provides functionality for assembling license templates,
//! rendering them with copyright data, and formatting the result with the
//! comment style appropriate for a file type.
//!
//! The module includes:
//! - [`fetch_template`] for resolving a license identifier (or custom
//!   template file) plus an SPDX mode into final template text
//! - [`LicenseData`] for providing data to fill in templates
//! - [`TemplateManager`] for rendering and comment-wrapping templates
//! - [`CommentStyle`] and [`CommentStyleResolver`] for defining how comments
//!   should be formatted in different file types
//!
//! ## Example
//!
//! ```rust
//! use std::path::Path;
//!
//! use headlight::templates::{LicenseData, SpdxMode, TemplateManager, fetch_template};
//!
//! # fn main() -> anyhow::Result<()> {
//! let template = fetch_template("mit", None, SpdxMode::Off)?;
//! let manager = TemplateManager::new(template);
//!
//! let data = LicenseData {
//!   year: "2026".to_string(),
//!   holder: "Example Corp".to_string(),
//!   spdx_id: "MIT".to_string(),
//! };
//!
//! let license_text = manager.render(&data);
//! let header = manager.format_for_file_type(&license_text, Path::new("main.rs"));
//! assert!(header.is_some());
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::config::{CommentStyleConfig, Config};
use crate::verbose_log;

/// Data used to fill out a license template.
///
/// Supplied once per run and reused for every rendered header.
pub struct LicenseData {
  /// The copyright year(s) to use in the license
  pub year: String,

  /// The copyright holder to use in the license
  pub holder: String,

  /// The SPDX identifier of the selected license
  pub spdx_id: String,
}

/// Controls whether an SPDX identifier line is included in rendered headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SpdxMode {
  /// No SPDX identifier line
  Off,
  /// Append an SPDX identifier line after the license template body
  On,
  /// Render only the SPDX identifier stub, discarding the template body
  Only,
}

impl std::fmt::Display for SpdxMode {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      SpdxMode::Off => "off",
      SpdxMode::On => "on",
      SpdxMode::Only => "only",
    };
    f.write_str(name)
  }
}

/// Template text appended to a built-in license when SPDX mode is `On`.
const SPDX_SUFFIX: &str = "\nSPDX-License-Identifier: {{SPDXID}}";

/// Template used when the SPDX identifier should be the whole header.
const TMPL_SPDX: &str = "Copyright {{Year}} {{Holder}}\nSPDX-License-Identifier: {{SPDXID}}";

const TMPL_APACHE: &str = r#"Copyright {{Year}} {{Holder}}

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

     http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License."#;

const TMPL_BSD: &str = r#"Copyright (c) {{Year}} {{Holder}} All rights reserved.
Use of this source code is governed by a BSD-style
license that can be found in the LICENSE file."#;

const TMPL_MIT: &str = r#"Copyright (c) {{Year}} {{Holder}}

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in
all copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
THE SOFTWARE."#;

const TMPL_MPL: &str = r#"This Source Code Form is subject to the terms of the Mozilla Public
License, v. 2.0. If a copy of the MPL was not distributed with this
file, You can obtain one at http://mozilla.org/MPL/2.0/."#;

/// Error type for template assembly.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
  /// The requested license has no built-in template.
  #[error("unknown license: \"{0}\". Pass --spdx=only to emit an SPDX-style header for this license")]
  UnknownLicense(String),

  /// The custom template file could not be read.
  #[error("Failed to read license template file '{path}': {source}")]
  TemplateFile { path: PathBuf, source: std::io::Error },
}

/// Normalize a license identifier, mapping the legacy short names to their
/// SPDX identifiers. Unrecognized identifiers are returned unchanged.
pub fn canonical_license_id(license: &str) -> String {
  match license.to_lowercase().as_str() {
    "apache" | "apache-2.0" => "Apache-2.0".to_string(),
    "mit" => "MIT".to_string(),
    "bsd" | "bsd-3-clause" => "BSD-3-Clause".to_string(),
    "mpl" | "mpl-2.0" => "MPL-2.0".to_string(),
    _ => license.to_string(),
  }
}

/// Look up the built-in template for a license identifier
/// (case-insensitive, legacy aliases included).
fn builtin_template(license: &str) -> Option<&'static str> {
  match license.to_lowercase().as_str() {
    "apache" | "apache-2.0" => Some(TMPL_APACHE),
    "mit" => Some(TMPL_MIT),
    "bsd" | "bsd-3-clause" => Some(TMPL_BSD),
    "mpl" | "mpl-2.0" => Some(TMPL_MPL),
    _ => None,
  }
}

/// Resolves a license identifier (or custom template file) plus an SPDX mode
/// into the final template text to render.
///
/// - A non-empty `template_file` wins over `license`: its contents are read
///   and returned verbatim, and a read failure is an error.
/// - Otherwise `license` selects one of the built-in templates. `SpdxMode::On`
///   appends the SPDX identifier line; `SpdxMode::Only` replaces the body
///   with the SPDX stub.
/// - An unknown `license` is an error unless the mode is `SpdxMode::Only`, in
///   which case the stub is returned regardless.
///
/// # Errors
///
/// Returns [`TemplateError::TemplateFile`] when the custom template file
/// cannot be read, and [`TemplateError::UnknownLicense`] when `license`
/// matches no built-in template and the SPDX stub cannot stand in for it.
pub fn fetch_template(license: &str, template_file: Option<&Path>, spdx: SpdxMode) -> Result<String, TemplateError> {
  if let Some(path) = template_file {
    verbose_log!("Loading template from: {}", path.display());
    return fs::read_to_string(path).map_err(|source| TemplateError::TemplateFile {
      path: path.to_path_buf(),
      source,
    });
  }

  match builtin_template(license) {
    Some(body) => Ok(match spdx {
      SpdxMode::Off => body.to_string(),
      SpdxMode::On => format!("{body}{SPDX_SUFFIX}"),
      SpdxMode::Only => TMPL_SPDX.to_string(),
    }),
    None if spdx == SpdxMode::Only => Ok(TMPL_SPDX.to_string()),
    None => Err(TemplateError::UnknownLicense(license.to_string())),
  }
}

/// Manager for rendering and formatting a resolved license template.
///
/// The `TemplateManager` holds the final template text produced by
/// [`fetch_template`] and is responsible for:
/// - Rendering the template with specific data (year, holder, SPDX id)
/// - Formatting rendered text with the appropriate comment style for a file
pub struct TemplateManager {
  /// The resolved license template text
  template: String,

  /// The comment style resolver to use
  resolver: Box<dyn CommentStyleResolver>,
}

impl TemplateManager {
  /// Creates a template manager with the default builtin resolver.
  pub fn new(template: String) -> Self {
    Self {
      template,
      resolver: Box::new(BuiltinResolver),
    }
  }

  /// Creates a template manager with a custom comment style resolver.
  pub fn with_resolver(template: String, resolver: Box<dyn CommentStyleResolver>) -> Self {
    Self { template, resolver }
  }

  /// Renders the license template with the given data.
  ///
  /// Replaces the `{{Year}}`, `{{Holder}}`, and `{{SPDXID}}` placeholders
  /// with the corresponding [`LicenseData`] fields. The substitution is plain
  /// string replacement: no escaping is applied, so the output is exactly the
  /// template text with values spliced in.
  pub fn render(&self, data: &LicenseData) -> String {
    self
      .template
      .replace("{{Year}}", &data.year)
      .replace("{{Holder}}", &data.holder)
      .replace("{{SPDXID}}", &data.spdx_id)
  }

  /// Formats rendered license text as a comment block for the given file.
  ///
  /// # Returns
  ///
  /// The comment-wrapped header, or `None` when no comment style is defined
  /// for the file's type - meaning the file should be left untouched.
  pub fn format_for_file_type(&self, license_text: &str, file_path: &Path) -> Option<String> {
    let comment_style = self.resolver.resolve(file_path)?;
    Some(format_with_comment_style(license_text, &comment_style))
  }

  /// Whether a comment style is defined for the given file's type.
  pub fn can_handle_file_type(&self, file_path: &Path) -> bool {
    self.resolver.resolve(file_path).is_some()
  }
}

/// Defines the comment style for different file types.
///
/// # Fields
///
/// * `top` - The string to use at the top of a comment block (e.g., "/*")
/// * `middle` - The string to use at the beginning of each line in the comment
///   block (e.g., " * ")
/// * `bottom` - The string to use at the bottom of a comment block (e.g., "
///   */")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentStyle {
  /// The string to use at the top of a comment block
  pub top: String,

  /// The string to use at the beginning of each line in the comment block
  pub middle: String,

  /// The string to use at the bottom of a comment block
  pub bottom: String,
}

impl CommentStyle {
  /// Create a line-comment style (no top/bottom markers).
  ///
  /// # Arguments
  ///
  /// * `prefix` - The prefix to use for each line (e.g., "// " or "# ")
  pub fn line(prefix: &str) -> Self {
    Self {
      top: String::new(),
      middle: prefix.to_string(),
      bottom: String::new(),
    }
  }

  /// Create a block-comment style.
  ///
  /// # Arguments
  ///
  /// * `top` - The string to start the comment block (e.g., "/*")
  /// * `middle` - The prefix for each line (e.g., " * ")
  /// * `bottom` - The string to end the comment block (e.g., " */")
  pub fn block(top: &str, middle: &str, bottom: &str) -> Self {
    Self {
      top: top.to_string(),
      middle: middle.to_string(),
      bottom: bottom.to_string(),
    }
  }
}

impl From<&CommentStyleConfig> for CommentStyle {
  fn from(config: &CommentStyleConfig) -> Self {
    Self {
      top: config.top.clone(),
      middle: config.middle.clone(),
      bottom: config.bottom.clone(),
    }
  }
}

/// Trait for resolving comment styles for file paths.
///
/// This trait allows different strategies for determining the appropriate
/// comment style for a given file path. Implementations can use built-in
/// mappings, user configuration, or both. Resolving to `None` means the file
/// type is unsupported and the file must be left untouched.
pub trait CommentStyleResolver: Send + Sync {
  /// Resolve the comment style for the given file path.
  fn resolve(&self, path: &Path) -> Option<CommentStyle>;
}

/// Default resolver using the built-in extension table.
#[derive(Debug, Default)]
pub struct BuiltinResolver;

impl CommentStyleResolver for BuiltinResolver {
  fn resolve(&self, path: &Path) -> Option<CommentStyle> {
    comment_style_for_file(path)
  }
}

/// Resolver that checks user config first, then falls back to the builtin
/// table.
///
/// Lookup order: exact filename override, filename glob override, extension
/// override, builtin mapping.
pub struct ConfigurableResolver {
  config: Config,
}

impl ConfigurableResolver {
  /// Create a new configurable resolver with the given config.
  pub const fn new(config: Config) -> Self {
    Self { config }
  }
}

impl CommentStyleResolver for ConfigurableResolver {
  fn resolve(&self, path: &Path) -> Option<CommentStyle> {
    let file_name = path
      .file_name()
      .and_then(|name| name.to_str())
      .unwrap_or("")
      .to_lowercase();

    // 1. Check filename overrides in config (exact match first)
    if let Some(style) = self.config.filenames.get(&file_name) {
      verbose_log!("Using config filename override for: {}", file_name);
      return Some(CommentStyle::from(style));
    }

    // 2. Check filename overrides with glob matching
    for (pattern, style) in &self.config.filenames {
      if pattern.contains('*')
        && let Ok(glob_pattern) = glob::Pattern::new(&pattern.to_lowercase())
        && glob_pattern.matches(&file_name)
      {
        verbose_log!("Using config filename glob override '{}' for: {}", pattern, file_name);
        return Some(CommentStyle::from(style));
      }
    }

    // 3. Check extension overrides in config
    let extension = path
      .extension()
      .and_then(|ext| ext.to_str())
      .unwrap_or("")
      .to_lowercase();

    if let Some(style) = self.config.comment_styles.get(&extension) {
      verbose_log!("Using config extension override for: .{}", extension);
      return Some(CommentStyle::from(style));
    }

    // 4. Fall back to the builtin table
    comment_style_for_file(path)
  }
}

/// Create a comment style resolver based on the provided configuration.
///
/// If a configuration is provided, returns a [`ConfigurableResolver`] that
/// checks user overrides first. Otherwise, returns a [`BuiltinResolver`].
pub fn create_resolver(config: Option<Config>) -> Box<dyn CommentStyleResolver> {
  match config {
    Some(cfg) => Box::new(ConfigurableResolver::new(cfg)),
    None => Box::new(BuiltinResolver),
  }
}

/// Determines the comment style for a file from its extension.
///
/// Matching is case-insensitive against the lowercased file name: the
/// extension when one exists, otherwise the bare name (so `Dockerfile` and
/// `Gemfile` resolve without an extension). Files whose type is not in the
/// table yield `None` and are left untouched.
pub fn comment_style_for_file(path: &Path) -> Option<CommentStyle> {
  let base = path
    .file_name()
    .and_then(|name| name.to_str())
    .unwrap_or("")
    .to_lowercase();

  let key = match base.rsplit_once('.') {
    Some((stem, extension)) if !stem.is_empty() => extension,
    _ => base.as_str(),
  };

  match key {
    "c" | "h" | "gv" | "java" | "scala" | "kt" | "kts" => Some(CommentStyle::block("/*", " * ", " */")),
    "js" | "mjs" | "cjs" | "jsx" | "tsx" | "css" | "scss" | "sass" | "tf" | "ts" => {
      Some(CommentStyle::block("/**", " * ", " */"))
    }
    "cc" | "cpp" | "cs" | "go" | "hcl" | "hh" | "hpp" | "m" | "mm" | "proto" | "rs" | "swift" | "dart" | "groovy"
    | "v" | "sv" | "php" => Some(CommentStyle::line("// ")),
    "py" | "sh" | "yaml" | "yml" | "dockerfile" | "rb" | "gemfile" | "tcl" | "bzl" | "pl" => {
      Some(CommentStyle::line("# "))
    }
    "el" | "lisp" => Some(CommentStyle::line(";; ")),
    "erl" => Some(CommentStyle::line("% ")),
    "hs" | "sql" | "sdl" => Some(CommentStyle::line("-- ")),
    "html" | "xml" | "vue" | "wxi" | "wxl" | "wxs" => Some(CommentStyle::block("<!--", " ", "-->")),
    "ml" | "mli" | "mll" | "mly" => Some(CommentStyle::block("(**", "   ", "*)")),
    _ => {
      // Handle the various cmake file names
      if base == "cmakelists.txt" || base.ends_with(".cmake.in") || base.ends_with(".cmake") {
        Some(CommentStyle::line("# "))
      } else {
        None
      }
    }
  }
}

/// Formats license text with the given comment style.
///
/// Emits the top marker (when non-empty) on its own line, each line of the
/// license text prefixed with the middle marker, the bottom marker (when
/// non-empty) on its own line, and finally a blank separator line. Prefixed
/// lines are right-trimmed so blank template lines do not leave trailing
/// comment markers. Identical inputs always produce byte-identical output.
pub fn format_with_comment_style(license_text: &str, style: &CommentStyle) -> String {
  let mut result = String::new();

  if !style.top.is_empty() {
    result.push_str(&style.top);
    result.push('\n');
  }

  for line in license_text.lines() {
    let prefixed = format!("{}{}", style.middle, line);
    result.push_str(prefixed.trim_end());
    result.push('\n');
  }

  if !style.bottom.is_empty() {
    result.push_str(&style.bottom);
    result.push('\n');
  }

  // Blank separator line between the header and the file content
  result.push('\n');

  result
}
