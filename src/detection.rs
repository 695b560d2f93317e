//! # Detection Module
//!
//! Content classification for license processing. Three independent checks
//! run against a file's raw bytes:
//!
//! - [`LicenseDetector`] implementations decide whether a file already carries
//!   a license header
//! - [`is_generated`] recognizes machine-generated files that should never be
//!   touched
//! - [`extract_declaration`] finds a leading interpreter/declaration line
//!   (shebang, XML declaration, ...) that must stay first when a header is
//!   inserted
//!
//! All checks operate on `&[u8]` rather than `&str`: scanned files are not
//! required to be valid UTF-8.

use std::sync::LazyLock;

use regex::bytes::Regex;

/// Maximum number of bytes inspected when checking for an existing license.
///
/// License headers sit at the top of a file, so bounding the scan window
/// keeps the check O(1) per file regardless of size.
pub const LICENSE_SCAN_LIMIT: usize = 1000;

/// Substrings whose presence in the scan window marks a file as licensed.
const LICENSE_NEEDLES: [&[u8]; 3] = [b"copyright", b"mozilla public", b"spdx-license-identifier"];

/// Trait for license detectors.
///
/// Implementations of this trait are responsible for determining whether a
/// file already contains a license header based on its content.
pub trait LicenseDetector: Send + Sync {
  /// Checks if the content already has a license header.
  ///
  /// # Parameters
  ///
  /// * `content` - The raw file content to check
  ///
  /// # Returns
  ///
  /// `true` if the content appears to have a license header, `false`
  /// otherwise.
  fn has_license(&self, content: &[u8]) -> bool;
}

/// Default implementation of license detection.
///
/// This detector performs a case-insensitive search for `copyright`,
/// `mozilla public`, or `spdx-license-identifier` within the first
/// [`LICENSE_SCAN_LIMIT`] bytes of the file (or the whole file if shorter).
pub struct SimpleLicenseDetector;

impl SimpleLicenseDetector {
  pub const fn new() -> Self {
    SimpleLicenseDetector
  }
}

impl Default for SimpleLicenseDetector {
  fn default() -> Self {
    Self::new()
  }
}

impl LicenseDetector for SimpleLicenseDetector {
  fn has_license(&self, content: &[u8]) -> bool {
    let window = &content[..content.len().min(LICENSE_SCAN_LIMIT)];
    let lowered = window.to_ascii_lowercase();

    LICENSE_NEEDLES.iter().any(|needle| contains(&lowered, needle))
  }
}

/// Byte-slice substring search; the haystack is at most
/// [`LICENSE_SCAN_LIMIT`] bytes so a naive scan is fine.
fn contains(haystack: &[u8], needle: &[u8]) -> bool {
  haystack.windows(needle.len()).any(|window| window == needle)
}

/// Patterns identifying machine-generated files, matched anywhere in the
/// content. The first tolerates a 1-2 character comment prefix ahead of the
/// conventional generated-code marker line; the second is the exact marker
/// cargo-raze leaves in the files it rewrites.
static GENERATED_MARKERS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
  [
    Regex::new(r"(?m)^.{1,2} Code generated .* DO NOT EDIT\.$").expect("generated-code regex must compile"),
    Regex::new(r"(?m)^DO NOT EDIT! Replaced on runs of cargo-raze$").expect("cargo-raze regex must compile"),
  ]
});

/// Returns `true` if the content contains a marker implying the file was
/// machine-generated.
///
/// Unlike license detection, this scans the full content: generated-file
/// markers are not required to sit at the top of the file.
pub fn is_generated(content: &[u8]) -> bool {
  GENERATED_MARKERS.iter().any(|marker| marker.is_match(content))
}

/// Declaration prefixes whose line must remain the first line of the file.
const DECLARATION_PREFIXES: [&str; 8] = [
  "#!",                       // shebang
  "<?xml",                    // XML declaration
  "<!doctype",                // HTML doctype
  "# encoding:",              // Ruby encoding
  "# frozen_string_literal:", // Ruby interpreter instruction
  "<?php",                    // PHP opening tag
  "# escape",                 // Dockerfile directive
  "# syntax",                 // Dockerfile directive
];

/// Extracts a leading declaration line that must be preserved ahead of an
/// inserted header.
///
/// Scans from byte 0 up to and including the first newline (or the end of the
/// content if there is none). If that line, lower-cased, starts with a known
/// declaration prefix, the line is returned verbatim - including its trailing
/// newline when present.
///
/// # Parameters
///
/// * `content` - The raw file content
///
/// # Returns
///
/// The declaration line as a sub-slice of `content`, or `None` if the first
/// line is ordinary content.
pub fn extract_declaration(content: &[u8]) -> Option<&[u8]> {
  let line_end = content
    .iter()
    .position(|&byte| byte == b'\n')
    .map(|index| index + 1)
    .unwrap_or(content.len());
  let line = &content[..line_end];
  let lowered = line.to_ascii_lowercase();

  DECLARATION_PREFIXES
    .iter()
    .any(|prefix| lowered.starts_with(prefix.as_bytes()))
    .then_some(line)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_simple_license_detector() {
    let detector = SimpleLicenseDetector::new();

    assert!(detector.has_license(b"// Copyright (c) 2024 Test Company\n\nfn main() {}"));
    assert!(detector.has_license(b"/* Copyright (C) 2024 Test Company */\n\nfn main() {}"));
    assert!(detector.has_license(b"CoPyRiGhT 2018"));
    assert!(detector.has_license(b"Subject to the terms of the Mozilla Public License"));
    assert!(detector.has_license(b"SPDX-License-Identifier: MIT"));
    assert!(detector.has_license(b"spdx-license-identifier: MIT"));

    assert!(!detector.has_license(b""));
    assert!(!detector.has_license(b"This is my license"));
    assert!(!detector.has_license(b"This code is released into the public domain."));
    assert!(!detector.has_license(b"SPDX: MIT"));
  }

  #[test]
  fn test_license_detection_bounded_to_scan_window() {
    let detector = SimpleLicenseDetector::new();

    // A match past the first 1000 bytes must not count
    let mut content = vec![b'x'; LICENSE_SCAN_LIMIT];
    content.extend_from_slice(b"\n// Copyright 2024");
    assert!(!detector.has_license(&content));

    // A match straddling byte 0 counts
    let mut content = b"Copyright 2024\n".to_vec();
    content.extend(vec![b'x'; 4096]);
    assert!(detector.has_license(&content));
  }

  #[test]
  fn test_is_generated() {
    assert!(is_generated(b"// Code generated by protoc-gen-go; DO NOT EDIT."));
    assert!(is_generated(b"/*\n* Code generated by mockgen; DO NOT EDIT.\n*/\n"));
    assert!(is_generated(b"DO NOT EDIT! Replaced on runs of cargo-raze"));

    assert!(!is_generated(b""));
    assert!(!is_generated(b"Generated"));
    // Marker must be its own line
    assert!(!is_generated(b"prefix DO NOT EDIT! Replaced on runs of cargo-raze"));
  }

  #[test]
  fn test_extract_declaration_shebang() {
    let content = b"#!/bin/bash\necho hello";
    assert_eq!(extract_declaration(content), Some(&b"#!/bin/bash\n"[..]));
  }

  #[test]
  fn test_extract_declaration_known_prefixes() {
    let cases: &[&[u8]] = &[
      b"#!/usr/bin/env python3\ncontent",
      b"<?xml version=\"1.0\"?>\ncontent",
      b"<!DOCTYPE html>\ncontent",
      b"<!doctype html>\ncontent",
      b"# encoding: UTF-8\ncontent",
      b"# frozen_string_literal: true\ncontent",
      b"<?php\ncontent",
      b"# escape: `\ncontent",
      b"# syntax: docker/dockerfile:1.3\ncontent",
    ];

    for content in cases {
      let line = extract_declaration(content).unwrap_or_else(|| panic!("no declaration in {:?}", content));
      assert!(line.ends_with(b"\n"));
      assert!(content.starts_with(line));
    }
  }

  #[test]
  fn test_extract_declaration_without_trailing_newline() {
    // A file consisting of just the declaration line must still be recognized
    assert_eq!(extract_declaration(b"#!/bin/bash"), Some(&b"#!/bin/bash"[..]));
    assert_eq!(extract_declaration(b"<?php"), Some(&b"<?php"[..]));
  }

  #[test]
  fn test_extract_declaration_none() {
    assert_eq!(extract_declaration(b"// Some code\nfn main() {}"), None);
    assert_eq!(extract_declaration(b""), None);
    // Declaration prefixes only count on the first line
    assert_eq!(extract_declaration(b"fn main() {}\n#!/bin/bash"), None);
  }
}
