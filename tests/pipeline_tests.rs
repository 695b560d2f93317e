use std::fs;
use std::path::Path;

use anyhow::Result;
use headlight::pipeline::{Pipeline, PipelineConfig, RunSummary};
use headlight::templates::{LicenseData, TemplateManager};
use tempfile::tempdir;

fn test_license_data() -> LicenseData {
  LicenseData {
    year: "2025".to_string(),
    holder: "Test Company".to_string(),
    spdx_id: "MIT".to_string(),
  }
}

fn create_test_pipeline(template: &str, ignore_patterns: Vec<String>, check_only: bool) -> Result<Pipeline> {
  let template_manager = TemplateManager::new(template.to_string());

  Pipeline::new(PipelineConfig {
    ignore_patterns,
    check_only,
    workers: Some(2),
    ..PipelineConfig::new(template_manager, test_license_data())
  })
}

fn run_over(pipeline: &Pipeline, root: &Path) -> Result<RunSummary> {
  pipeline.run(&[root.to_string_lossy().to_string()])
}

#[test]
fn test_adds_headers_and_is_idempotent() -> Result<()> {
  let temp_dir = tempdir()?;
  fs::write(temp_dir.path().join("main.rs"), "fn main() {}\n")?;
  fs::write(temp_dir.path().join("script.py"), "print('hi')\n")?;

  let pipeline = create_test_pipeline("Copyright (c) {{Year}} {{Holder}}", vec![], false)?;

  let summary = run_over(&pipeline, temp_dir.path())?;
  assert!(summary.is_success());
  assert_eq!(summary.headers_added, 2);

  let rs_content = fs::read_to_string(temp_dir.path().join("main.rs"))?;
  assert_eq!(rs_content, "// Copyright (c) 2025 Test Company\n\nfn main() {}\n");

  let py_content = fs::read_to_string(temp_dir.path().join("script.py"))?;
  assert_eq!(py_content, "# Copyright (c) 2025 Test Company\n\nprint('hi')\n");

  // A second run must be a no-op
  let summary = run_over(&pipeline, temp_dir.path())?;
  assert!(summary.is_success());
  assert_eq!(summary.headers_added, 0);

  assert_eq!(fs::read_to_string(temp_dir.path().join("main.rs"))?, rs_content);
  assert_eq!(fs::read_to_string(temp_dir.path().join("script.py"))?, py_content);

  Ok(())
}

#[test]
fn test_preserves_shebang_line() -> Result<()> {
  let temp_dir = tempdir()?;
  fs::write(temp_dir.path().join("run.sh"), "#!/bin/bash\necho hello\n")?;

  let pipeline = create_test_pipeline("Copyright (c) {{Year}} {{Holder}}", vec![], false)?;
  let summary = run_over(&pipeline, temp_dir.path())?;
  assert!(summary.is_success());

  let content = fs::read_to_string(temp_dir.path().join("run.sh"))?;
  assert_eq!(content, "#!/bin/bash\n# Copyright (c) 2025 Test Company\n\necho hello\n");

  Ok(())
}

#[test]
fn test_preserves_xml_declaration() -> Result<()> {
  let temp_dir = tempdir()?;
  fs::write(temp_dir.path().join("config.xml"), "<?xml version=\"1.0\"?>\n<root></root>\n")?;

  let pipeline = create_test_pipeline("Copyright (c) {{Year}} {{Holder}}", vec![], false)?;
  let summary = run_over(&pipeline, temp_dir.path())?;
  assert!(summary.is_success());

  let content = fs::read_to_string(temp_dir.path().join("config.xml"))?;
  assert_eq!(
    content,
    "<?xml version=\"1.0\"?>\n<!--\n Copyright (c) 2025 Test Company\n-->\n\n<root></root>\n"
  );

  Ok(())
}

#[test]
fn test_declaration_only_file_without_trailing_newline() -> Result<()> {
  let temp_dir = tempdir()?;
  fs::write(temp_dir.path().join("run.sh"), "#!/bin/bash")?;

  let pipeline = create_test_pipeline("Copyright (c) {{Year}} {{Holder}}", vec![], false)?;
  let summary = run_over(&pipeline, temp_dir.path())?;
  assert!(summary.is_success());

  let content = fs::read_to_string(temp_dir.path().join("run.sh"))?;
  assert_eq!(content, "#!/bin/bash\n# Copyright (c) 2025 Test Company\n\n");

  Ok(())
}

#[test]
fn test_empty_file_gets_header() -> Result<()> {
  let temp_dir = tempdir()?;
  fs::write(temp_dir.path().join("empty.go"), "")?;

  let pipeline = create_test_pipeline("Copyright (c) {{Year}} {{Holder}}", vec![], false)?;
  let summary = run_over(&pipeline, temp_dir.path())?;
  assert!(summary.is_success());
  assert_eq!(summary.headers_added, 1);

  let content = fs::read_to_string(temp_dir.path().join("empty.go"))?;
  assert_eq!(content, "// Copyright (c) 2025 Test Company\n\n");

  Ok(())
}

#[test]
fn test_skips_licensed_and_generated_files() -> Result<()> {
  let temp_dir = tempdir()?;
  let licensed = "// Copyright 2020 Someone Else\n\nfn a() {}\n";
  let generated = "// Code generated by protoc-gen-go; DO NOT EDIT.\n\nfn b() {}\n";
  let raze = "DO NOT EDIT! Replaced on runs of cargo-raze\nfn c() {}\n";
  fs::write(temp_dir.path().join("licensed.rs"), licensed)?;
  fs::write(temp_dir.path().join("generated.rs"), generated)?;
  fs::write(temp_dir.path().join("raze.rs"), raze)?;

  let pipeline = create_test_pipeline("Copyright (c) {{Year}} {{Holder}}", vec![], false)?;
  let summary = run_over(&pipeline, temp_dir.path())?;
  assert!(summary.is_success());
  assert_eq!(summary.headers_added, 0);

  assert_eq!(fs::read_to_string(temp_dir.path().join("licensed.rs"))?, licensed);
  assert_eq!(fs::read_to_string(temp_dir.path().join("generated.rs"))?, generated);
  assert_eq!(fs::read_to_string(temp_dir.path().join("raze.rs"))?, raze);

  Ok(())
}

#[test]
fn test_unknown_extension_left_untouched() -> Result<()> {
  let temp_dir = tempdir()?;
  let content = "some opaque data\n";
  fs::write(temp_dir.path().join("data.unknown"), content)?;
  fs::write(temp_dir.path().join("README"), content)?;

  let pipeline = create_test_pipeline("Copyright (c) {{Year}} {{Holder}}", vec![], false)?;
  let summary = run_over(&pipeline, temp_dir.path())?;

  // Not an error - a silent skip
  assert!(summary.is_success());
  assert_eq!(summary.headers_added, 0);
  assert_eq!(fs::read_to_string(temp_dir.path().join("data.unknown"))?, content);
  assert_eq!(fs::read_to_string(temp_dir.path().join("README"))?, content);

  Ok(())
}

#[test]
fn test_ignore_patterns_exclude_files() -> Result<()> {
  let temp_dir = tempdir()?;
  let src_dir = temp_dir.path().join("src");
  let vendor_dir = temp_dir.path().join("vendor");
  fs::create_dir_all(&src_dir)?;
  fs::create_dir_all(&vendor_dir)?;
  fs::write(src_dir.join("main.rs"), "fn main() {}\n")?;
  fs::write(vendor_dir.join("external.rs"), "fn external() {}\n")?;

  let pipeline = create_test_pipeline(
    "Copyright (c) {{Year}} {{Holder}}",
    vec!["vendor/**".to_string()],
    false,
  )?;
  let summary = run_over(&pipeline, temp_dir.path())?;
  assert!(summary.is_success());
  assert_eq!(summary.headers_added, 1);

  assert!(fs::read_to_string(src_dir.join("main.rs"))?.contains("Copyright"));
  assert_eq!(fs::read_to_string(vendor_dir.join("external.rs"))?, "fn external() {}\n");

  Ok(())
}

#[test]
fn test_invalid_ignore_pattern_is_fatal() {
  let result = create_test_pipeline("Copyright (c) {{Year}} {{Holder}}", vec!["a[".to_string()], false);
  assert!(result.is_err());
}

#[test]
fn test_single_file_root() -> Result<()> {
  let temp_dir = tempdir()?;
  let file = temp_dir.path().join("lone.go");
  fs::write(&file, "package main\n")?;

  let pipeline = create_test_pipeline("Copyright (c) {{Year}} {{Holder}}", vec![], false)?;
  let summary = pipeline.run(&[file.to_string_lossy().to_string()])?;
  assert!(summary.is_success());
  assert_eq!(summary.headers_added, 1);
  assert_eq!(
    fs::read_to_string(&file)?,
    "// Copyright (c) 2025 Test Company\n\npackage main\n"
  );

  Ok(())
}

#[test]
fn test_nonexistent_root_is_logged_not_fatal() -> Result<()> {
  let temp_dir = tempdir()?;
  let missing = temp_dir.path().join("does-not-exist");

  let pipeline = create_test_pipeline("Copyright (c) {{Year}} {{Holder}}", vec![], false)?;
  let summary = pipeline.run(&[missing.to_string_lossy().to_string()])?;

  // Traversal errors are walked past, not turned into run failures
  assert!(summary.is_success());
  assert_eq!(summary.files_scanned, 0);

  Ok(())
}

#[test]
fn test_check_only_reports_missing_headers() -> Result<()> {
  let temp_dir = tempdir()?;
  fs::write(
    temp_dir.path().join("licensed.rs"),
    "// Copyright 2020 Someone Else\n\nfn a() {}\n",
  )?;
  fs::write(
    temp_dir.path().join("generated.rs"),
    "// Code generated by protoc-gen-go; DO NOT EDIT.\nfn b() {}\n",
  )?;
  fs::write(temp_dir.path().join("missing.rs"), "fn missing() {}\n")?;
  fs::write(temp_dir.path().join("data.unknown"), "opaque\n")?;

  let pipeline = create_test_pipeline("Copyright (c) {{Year}} {{Holder}}", vec![], true)?;
  let summary = run_over(&pipeline, temp_dir.path())?;

  assert!(!summary.is_success());
  assert_eq!(summary.headers_added, 0);
  assert_eq!(summary.missing.len(), 1);
  assert!(summary.missing[0].ends_with("missing.rs"));

  // Check mode must not modify anything
  assert_eq!(fs::read_to_string(temp_dir.path().join("missing.rs"))?, "fn missing() {}\n");

  Ok(())
}

#[test]
fn test_check_only_succeeds_when_compliant() -> Result<()> {
  let temp_dir = tempdir()?;
  fs::write(
    temp_dir.path().join("licensed.rs"),
    "// Copyright 2020 Someone Else\n\nfn a() {}\n",
  )?;

  let pipeline = create_test_pipeline("Copyright (c) {{Year}} {{Holder}}", vec![], true)?;
  let summary = run_over(&pipeline, temp_dir.path())?;

  assert!(summary.is_success());
  assert!(summary.missing.is_empty());

  Ok(())
}

#[test]
fn test_mutate_then_check_is_compliant() -> Result<()> {
  let temp_dir = tempdir()?;
  fs::write(temp_dir.path().join("a.rs"), "fn a() {}\n")?;
  fs::write(temp_dir.path().join("b.py"), "pass\n")?;
  fs::write(temp_dir.path().join("c.html"), "<html></html>\n")?;

  let mutate = create_test_pipeline("Copyright (c) {{Year}} {{Holder}}", vec![], false)?;
  assert!(run_over(&mutate, temp_dir.path())?.is_success());

  let check = create_test_pipeline("Copyright (c) {{Year}} {{Holder}}", vec![], true)?;
  let summary = run_over(&check, temp_dir.path())?;
  assert!(summary.is_success(), "mutated files must pass the check: {:?}", summary.missing);

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_partial_failure_is_aggregated() -> Result<()> {
  use std::os::unix::fs::PermissionsExt;

  let temp_dir = tempdir()?;
  let one = temp_dir.path().join("one.rs");
  let two = temp_dir.path().join("two.rs");
  let three = temp_dir.path().join("three.rs");
  fs::write(&one, "fn one() {}\n")?;
  fs::write(&two, "fn two() {}\n")?;
  fs::write(&three, "fn three() {}\n")?;

  let mut permissions = fs::metadata(&two)?.permissions();
  permissions.set_mode(0o444);
  fs::set_permissions(&two, permissions)?;

  // Privileged users can write through read-only modes; nothing to observe
  // in that case
  if fs::OpenOptions::new().write(true).open(&two).is_ok() {
    return Ok(());
  }

  let pipeline = create_test_pipeline("Copyright (c) {{Year}} {{Holder}}", vec![], false)?;
  let summary = run_over(&pipeline, temp_dir.path())?;

  // The unwritable file is the only failure; the others are still processed
  assert!(!summary.is_success());
  assert_eq!(summary.failures.len(), 1);
  assert!(summary.failures[0].path.ends_with("two.rs"));
  assert_eq!(summary.headers_added, 2);
  assert!(fs::read_to_string(&one)?.contains("Copyright"));
  assert!(fs::read_to_string(&three)?.contains("Copyright"));
  assert_eq!(fs::read_to_string(&two)?, "fn two() {}\n");

  Ok(())
}

#[test]
fn test_rewrite_preserves_permission_bits() -> Result<()> {
  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = tempdir()?;
    let script = temp_dir.path().join("run.sh");
    fs::write(&script, "#!/bin/sh\necho hi\n")?;
    let mut permissions = fs::metadata(&script)?.permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&script, permissions)?;

    let pipeline = create_test_pipeline("Copyright (c) {{Year}} {{Holder}}", vec![], false)?;
    assert!(run_over(&pipeline, temp_dir.path())?.is_success());

    let mode = fs::metadata(&script)?.permissions().mode() & 0o777;
    assert_eq!(mode, 0o755);
  }

  Ok(())
}

#[test]
fn test_large_tree_is_fully_processed() -> Result<()> {
  let temp_dir = tempdir()?;
  for i in 0..200 {
    let sub = temp_dir.path().join(format!("mod{:02}", i % 10));
    fs::create_dir_all(&sub)?;
    fs::write(sub.join(format!("file{i}.rs")), format!("fn f{i}() {{}}\n"))?;
  }

  let pipeline = create_test_pipeline("Copyright (c) {{Year}} {{Holder}}", vec![], false)?;
  let summary = run_over(&pipeline, temp_dir.path())?;

  assert!(summary.is_success());
  assert_eq!(summary.headers_added, 200);

  Ok(())
}
