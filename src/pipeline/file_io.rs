//! # File I/O Module
//!
//! This module provides file reading and writing utilities for the pipeline.
//! Files are handled as raw bytes: scanned content is not required to be
//! valid UTF-8, and rewrites must be byte-exact around the inserted header.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// File I/O operations for the pipeline.
///
/// This struct provides static methods for reading and writing files.
pub struct FileIO;

impl FileIO {
  /// Read the full file content as raw bytes.
  ///
  /// # Parameters
  ///
  /// * `path` - Path to the file to read
  pub fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
  }

  /// Write file content in place, restoring the permission bits captured
  /// when the file was discovered.
  ///
  /// # Parameters
  ///
  /// * `path` - Path to the file to write
  /// * `content` - Content to write to the file
  /// * `permissions` - Permission bits to restore after the write
  pub fn write(path: &Path, content: &[u8], permissions: &fs::Permissions) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))?;
    fs::set_permissions(path, permissions.clone())
      .with_context(|| format!("Failed to restore permissions on: {}", path.display()))
  }
}
