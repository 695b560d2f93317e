//! # CLI Module
//!
//! Command-line interface implementation. Parses and validates the run
//! configuration, assembles the template and ignore set, and hands an
//! explicit configuration to the pipeline - no component reads flags
//! ambiently.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{ArgAction, Parser};
use tracing::debug;

use crate::config::{CliOverrides, Config, load_config};
use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use crate::pipeline::{Pipeline, PipelineConfig, RunSummary};
use crate::templates::{LicenseData, SpdxMode, TemplateManager, canonical_license_id, create_resolver, fetch_template};
use crate::verbose_log;

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  version,
  about,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Add Apache-2.0 headers to everything under src/
  headlight -c \"Example Corp\" src/

  # Check for missing headers without modifying anything
  headlight --check -c \"Example Corp\" src/ include/

  # MIT headers with an SPDX identifier line appended
  headlight -c \"Example Corp\" -l mit -s src/

  # Only the SPDX identifier, for licenses without a built-in template
  headlight -c \"Example Corp\" -l BSL-1.0 -s=only src/

  # A custom template file and a fixed year
  headlight -c \"Example Corp\" -f header.tpl -y 2020 src/

  # Ignore vendored and generated trees
  headlight -c \"Example Corp\" -i \"vendor/**\" -i \"**/*.pb.go\" .
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  /// File or directory paths to process. Directories are processed
  /// recursively.
  #[arg(required = true, value_name = "PATH")]
  pub paths: Vec<String>,

  /// Copyright holder
  #[arg(short = 'c', long, value_name = "HOLDER")]
  pub holder: String,

  /// License type: apache, bsd, mit, mpl, or their SPDX identifiers
  #[arg(short = 'l', long, default_value = "apache", value_name = "ID")]
  pub license: String,

  /// Custom license template file (overrides --license)
  #[arg(short = 'f', long, value_name = "FILE")]
  pub license_file: Option<PathBuf>,

  /// Copyright year(s) [default: the current year]
  #[arg(short = 'y', long, value_name = "YEAR")]
  pub year: Option<String>,

  /// Include an SPDX identifier line in the header; `--spdx=only` renders
  /// just the identifier
  #[arg(
    short = 's',
    long,
    value_enum,
    value_name = "MODE",
    num_args = 0..=1,
    require_equals = true,
    default_value_t = SpdxMode::Off,
    default_missing_value = "on"
  )]
  pub spdx: SpdxMode,

  /// File patterns to ignore (supports glob patterns, validated before the
  /// scan starts)
  #[arg(short = 'i', long, value_name = "PATTERN")]
  pub ignore: Vec<String>,

  /// File extensions to skip [deprecated: use --ignore '**/*.EXT']
  #[arg(long, value_name = "EXT")]
  pub skip: Vec<String>,

  /// Check mode: report files missing a header and exit non-zero without
  /// modifying anything
  #[arg(long)]
  pub check: bool,

  /// Path to config file (default: .headlight.toml in the current directory)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long)]
  pub no_config: bool,

  /// Override comment style for an extension (repeatable, format: EXT:STYLE)
  /// Example: --comment-style "java:// " --comment-style "xyz:# "
  #[arg(long, value_name = "EXT:STYLE")]
  pub comment_style: Vec<String>,

  /// Number of worker threads [default: the number of CPUs]
  #[arg(short = 'j', long, value_name = "N")]
  pub jobs: Option<usize>,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    require_equals = true,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

/// Run a scan with the given arguments.
///
/// Assembles the template, copyright data, ignore set, and optional config
/// into a [`Pipeline`] and runs it over the requested paths. Any error
/// returned from here is a configuration error raised before a single file
/// was touched; per-file failures are reported through the returned
/// [`RunSummary`] instead.
pub fn run(args: Cli) -> Result<RunSummary> {
  // Initialize tracing subscriber for structured logging
  init_tracing(args.quiet, args.verbose);

  // Set verbose mode for output formatting and the info_log!/verbose_log!
  // macros
  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  let year = args.year.unwrap_or_else(|| chrono::Local::now().year().to_string());

  // Fold the deprecated --skip extensions into ignore patterns
  let mut ignore_patterns = args.ignore;
  for extension in &args.skip {
    ignore_patterns.push(format!("**/*.{extension}"));
  }

  let license_id = canonical_license_id(&args.license);

  let template = fetch_template(&license_id, args.license_file.as_deref(), args.spdx)?;

  let license_data = LicenseData {
    year,
    holder: args.holder,
    spdx_id: license_id,
  };

  // Load configuration file if present
  let mut config = load_config(args.config.as_deref(), args.no_config)?;

  if config.is_some() {
    debug!("Using configuration file for comment style overrides");
  }

  // Parse and merge CLI comment style overrides (CLI takes precedence)
  if !args.comment_style.is_empty() {
    let overrides = CliOverrides::from_cli_args(&args.comment_style)?;
    config.get_or_insert_with(Config::default).merge_cli_overrides(overrides);
  }

  let resolver = create_resolver(config);
  let template_manager = TemplateManager::with_resolver(template, resolver);

  let pipeline = Pipeline::new(PipelineConfig {
    ignore_patterns,
    check_only: args.check,
    workers: args.jobs,
    ..PipelineConfig::new(template_manager, license_data)
  })
  .with_context(|| "Failed to initialize the processing pipeline")?;

  let summary = pipeline.run(&args.paths)?;

  verbose_log!(
    "{} files scanned, {} headers added, {} failures",
    summary.files_scanned,
    summary.headers_added,
    summary.failures.len()
  );

  if args.check && !summary.missing.is_empty() {
    eprintln!("Error: {} file(s) are missing license headers", summary.missing.len());
  }

  Ok(summary)
}
