//! # headlight
//!
//! A tool that ensures source code files have copyright license headers.

use std::process;

use anyhow::Result;
use headlight::cli::{self, Cli};

fn main() -> Result<()> {
  let args = Cli::parse_args();

  let summary = cli::run(args)?;

  // Per-file failures and missing headers were already reported with their
  // paths; only the exit status is left to surface here.
  if !summary.is_success() {
    process::exit(1);
  }

  Ok(())
}
