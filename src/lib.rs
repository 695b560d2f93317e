//! # headlight
//!
//! A tool that ensures source code files have copyright license headers by scanning directory trees recursively.
//!
//! `headlight` modifies source files in place and avoids adding a license header to any file that already has one
//! or that was machine-generated. It follows the Unix philosophy of tooling where possible and is designed with
//! modern Rust best practices for high-performance CLI tools.
//!
//! ## Features
//!
//! * Recursively scan directories and add license headers to source files
//! * Automatic detection of file types and appropriate comment formatting
//! * Built-in Apache-2.0, BSD-3-Clause, MIT, and MPL-2.0 templates, custom template files, and SPDX identifier
//!   headers
//! * Check-only mode to verify license headers without modifying files
//! * Ignore patterns to exclude specific files or directories
//! * Preservation of shebang lines, XML declarations, and other leading declarations
//!
//! ## Usage as a Library
//!
//! This crate can be used as a library in your Rust projects:
//!
//! ```rust,no_run
//! use headlight::pipeline::{Pipeline, PipelineConfig};
//! use headlight::templates::{LicenseData, SpdxMode, TemplateManager, fetch_template};
//!
//! fn main() -> anyhow::Result<()> {
//!     // Resolve the license template to render
//!     let template = fetch_template("apache", None, SpdxMode::Off)?;
//!
//!     let license_data = LicenseData {
//!         year: "2026".to_string(),
//!         holder: "Example Corp".to_string(),
//!         spdx_id: "Apache-2.0".to_string(),
//!     };
//!
//!     // Create a pipeline with default settings
//!     let pipeline = Pipeline::new(PipelineConfig::new(
//!         TemplateManager::new(template),
//!         license_data,
//!     ))?;
//!
//!     // Process files in the src directory
//!     let summary = pipeline.run(&["src".to_string()])?;
//!
//!     if !summary.is_success() {
//!         println!("Some files could not be processed");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`pipeline`] - Core functionality for walking paths and processing files
//! * [`templates`] - License template assembly, rendering, and comment formatting
//! * [`detection`] - Existing-license, generated-file, and declaration-line classification
//! * [`logging`] - Logging utilities for verbose output
//!
//! [`pipeline`]: crate::pipeline
//! [`templates`]: crate::templates
//! [`detection`]: crate::detection
//! [`logging`]: crate::logging

// Re-export modules for public API
pub mod cli;
pub mod config;
pub mod detection;
pub mod ignore;
pub mod logging;
pub mod pipeline;
pub mod templates;

// Note: the verbose_log!/info_log! macros are defined in the logging module
// and exported at the crate root via #[macro_export]
