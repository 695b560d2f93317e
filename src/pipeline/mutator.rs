//! # Mutator Module
//!
//! Per-file decision logic: whether a file needs a header, and the byte-exact
//! rewrite that inserts one. The mutator combines the header renderer with
//! the content classifier; it owns no I/O policy beyond reading and rewriting
//! the single file it is handed.

use std::path::Path;

use anyhow::Result;
use tracing::trace;

use super::FileTask;
use super::file_io::FileIO;
use crate::detection::{LicenseDetector, extract_declaration, is_generated};
use crate::templates::{LicenseData, TemplateManager};

/// Verdict of a check-only inspection of a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckVerdict {
  /// The file has a license header (or is generated, which counts as
  /// implicitly licensed)
  Compliant,
  /// The file's type is supported but it lacks a license header
  MissingHeader,
  /// The file's type has no comment style; it is outside the check's scope
  Unsupported,
}

/// Applies (or checks for) a license header on individual files.
///
/// The license template is rendered once at construction - the copyright data
/// is fixed for the whole run - and only the comment wrapping varies per
/// file.
pub struct Mutator {
  /// Template manager used for comment-style resolution and wrapping
  template_manager: TemplateManager,

  /// The license text rendered against the run's copyright data
  license_text: String,

  /// License detector for recognizing existing headers
  detector: Box<dyn LicenseDetector>,
}

impl Mutator {
  /// Creates a new mutator.
  ///
  /// # Parameters
  ///
  /// * `template_manager` - The resolved template plus comment style resolver
  /// * `data` - Copyright data rendered into every header
  /// * `detector` - Detector used to recognize existing license headers
  pub fn new(template_manager: TemplateManager, data: &LicenseData, detector: Box<dyn LicenseDetector>) -> Self {
    let license_text = template_manager.render(data);
    Self {
      template_manager,
      license_text,
      detector,
    }
  }

  /// Adds a license header to the file if it is missing one.
  ///
  /// The file is left untouched when its extension has no comment style, when
  /// it already carries a license header, or when it is machine-generated. A
  /// leading declaration line (shebang, XML declaration, ...) stays first;
  /// the header is inserted directly after it.
  ///
  /// # Returns
  ///
  /// `true` if the file was rewritten, `false` if it was left untouched.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or written. Unsupported
  /// extensions are not an error.
  pub fn apply(&self, task: &FileTask) -> Result<bool> {
    let Some(header) = self.template_manager.format_for_file_type(&self.license_text, &task.path) else {
      trace!("skipping {}: no comment style for extension", task.path.display());
      return Ok(false);
    };

    let content = FileIO::read(&task.path)?;

    if self.detector.has_license(&content) || is_generated(&content) {
      trace!("skipping {}: already licensed or generated", task.path.display());
      return Ok(false);
    }

    let mut rewritten = Vec::with_capacity(header.len() + content.len() + 1);
    let body = match extract_declaration(&content) {
      Some(line) => {
        rewritten.extend_from_slice(line);
        if !line.ends_with(b"\n") {
          rewritten.push(b'\n');
        }
        &content[line.len()..]
      }
      None => &content[..],
    };
    rewritten.extend_from_slice(header.as_bytes());
    rewritten.extend_from_slice(body);

    FileIO::write(&task.path, &rewritten, &task.permissions)?;

    Ok(true)
  }

  /// Inspects a file without modifying it.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read.
  pub fn check(&self, path: &Path) -> Result<CheckVerdict> {
    if !self.template_manager.can_handle_file_type(path) {
      return Ok(CheckVerdict::Unsupported);
    }

    let content = FileIO::read(path)?;

    // Generated files count as implicitly licensed: they are skipped during
    // mutation, so requiring a header here would make check mode fail runs
    // that mutation cannot fix.
    if self.detector.has_license(&content) || is_generated(&content) {
      Ok(CheckVerdict::Compliant)
    } else {
      Ok(CheckVerdict::MissingHeader)
    }
  }
}
