//! # Pipeline Module
//!
//! The traversal/dispatch pipeline: walks the input paths, filters out
//! ignored files, and fans the remaining files out to a bounded pool of
//! worker threads that add (or check for) license headers.
//!
//! The module is organized into submodules:
//! - [`file_io`] - Byte-level file reading and writing
//! - [`mutator`] - Per-file header insertion and check logic
//!
//! One producer walks the directory trees and feeds a bounded channel; a
//! fixed pool of workers drains it. The bounded channel provides natural
//! backpressure - traversal blocks once the queue is full - so memory use is
//! bounded independent of repository size. A failure in one file never
//! cancels the others: every discovered file is attempted exactly once and
//! failures are aggregated into the final [`RunSummary`].

mod file_io;
mod mutator;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;

use anyhow::Result;
use crossbeam::channel::{Sender, bounded};
pub use file_io::FileIO;
pub use mutator::{CheckVerdict, Mutator};
use tracing::debug;
use walkdir::WalkDir;

use crate::detection::{LicenseDetector, SimpleLicenseDetector};
use crate::ignore::IgnoreManager;
use crate::info_log;
use crate::templates::{LicenseData, TemplateManager};

/// Maximum number of outstanding tasks between the traversal and the worker
/// pool. Traversal blocks once this many tasks are queued.
pub const QUEUE_CAPACITY: usize = 1000;

/// A single file discovered by traversal, consumed by exactly one worker.
pub struct FileTask {
  /// Path to the file
  pub path: PathBuf,

  /// Permission bits captured at discovery, restored after a rewrite
  pub permissions: fs::Permissions,
}

/// A per-file failure recorded during a run.
#[derive(Debug)]
pub struct FileFailure {
  /// Path of the file that failed
  pub path: PathBuf,

  /// Human-readable description of the failure
  pub message: String,
}

/// Aggregate outcome of a pipeline run.
///
/// Created empty before dispatch, accumulated by workers under a mutex, and
/// finalized once all workers have drained the queue.
#[derive(Debug, Default)]
pub struct RunSummary {
  /// Number of files pulled from the queue (including skipped ones)
  pub files_scanned: usize,

  /// Number of files that received a header
  pub headers_added: usize,

  /// Per-file I/O failures
  pub failures: Vec<FileFailure>,

  /// Check mode: supported files that lack a license header
  pub missing: Vec<PathBuf>,
}

impl RunSummary {
  /// Whether the run completed without per-file failures or (in check mode)
  /// missing headers.
  pub fn is_success(&self) -> bool {
    self.failures.is_empty() && self.missing.is_empty()
  }
}

/// Configuration for creating a [`Pipeline`].
pub struct PipelineConfig {
  pub template_manager: TemplateManager,
  pub license_data: LicenseData,

  /// Glob patterns excluding files from processing; validated up front
  pub ignore_patterns: Vec<String>,

  /// Check-only mode: report missing headers without modifying anything
  pub check_only: bool,

  /// Worker pool size; defaults to the number of CPUs
  pub workers: Option<usize>,

  /// Custom license detector; defaults to [`SimpleLicenseDetector`]
  pub license_detector: Option<Box<dyn LicenseDetector>>,
}

impl PipelineConfig {
  /// Creates a config with required fields and defaults for the rest.
  ///
  /// Use struct update syntax to override specific fields:
  /// ```ignore
  /// PipelineConfig {
  ///     check_only: true,
  ///     ..PipelineConfig::new(template_manager, license_data)
  /// }
  /// ```
  pub fn new(template_manager: TemplateManager, license_data: LicenseData) -> Self {
    Self {
      template_manager,
      license_data,
      ignore_patterns: vec![],
      check_only: false,
      workers: None,
      license_detector: None,
    }
  }
}

/// The concurrent file-processing pipeline.
pub struct Pipeline {
  /// Per-file header insertion and check logic
  mutator: Mutator,

  /// Compiled ignore pattern set
  ignore: IgnoreManager,

  /// Whether to only check for licenses without modifying files
  check_only: bool,

  /// Fixed size of the worker pool
  workers: usize,
}

impl Pipeline {
  /// Creates a new pipeline from the given configuration.
  ///
  /// # Errors
  ///
  /// Returns an error if any ignore pattern is invalid. This is a
  /// configuration error: it aborts before any file is touched.
  pub fn new(config: PipelineConfig) -> Result<Self> {
    let ignore = IgnoreManager::new(config.ignore_patterns)?;

    let detector = config
      .license_detector
      .unwrap_or_else(|| Box::new(SimpleLicenseDetector::new()));

    let mutator = Mutator::new(config.template_manager, &config.license_data, detector);

    let workers = config.workers.unwrap_or_else(num_cpus::get).max(1);

    Ok(Self {
      mutator,
      ignore,
      check_only: config.check_only,
      workers,
    })
  }

  /// Runs the pipeline over the given root paths.
  ///
  /// Every regular file reachable by recursive descent from each root - and
  /// not matching the ignore set - is dispatched to the worker pool exactly
  /// once. Traversal errors are logged and walked past; per-file failures are
  /// recorded in the summary without cancelling other work.
  ///
  /// # Returns
  ///
  /// The aggregated [`RunSummary`] once traversal has finished and all
  /// workers have drained the queue.
  pub fn run(&self, roots: &[String]) -> Result<RunSummary> {
    let (task_tx, task_rx) = bounded::<FileTask>(QUEUE_CAPACITY);
    let summary = Mutex::new(RunSummary::default());

    debug!("Dispatching to {} workers (queue capacity {})", self.workers, QUEUE_CAPACITY);

    thread::scope(|scope| {
      for _ in 0..self.workers {
        let task_rx = task_rx.clone();
        let summary = &summary;
        scope.spawn(move || {
          // Pull tasks until the channel is closed and drained
          while let Ok(task) = task_rx.recv() {
            self.run_task(task, summary);
          }
        });
      }
      drop(task_rx);

      for root in roots {
        self.walk_root(Path::new(root), &task_tx);
      }
      // Closing the channel lets the workers drain and terminate
      drop(task_tx);
    });

    Ok(summary.into_inner().expect("mutex poisoned"))
  }

  /// Walks one root path and submits every eligible file to the queue.
  ///
  /// Submission blocks while the queue is full, throttling the walk to the
  /// pace of the workers.
  fn walk_root(&self, root: &Path, task_tx: &Sender<FileTask>) {
    debug!("Scanning: {}", root.display());

    for entry in WalkDir::new(root).follow_links(false) {
      let entry = match entry {
        Ok(entry) => entry,
        Err(err) => {
          // Unreadable entries do not abort the walk
          eprintln!("Error traversing {}: {}", err.path().unwrap_or(root).display(), err);
          continue;
        }
      };

      if !entry.file_type().is_file() {
        continue;
      }

      if self.ignore.is_ignored(entry.path()) {
        continue;
      }

      let metadata = match entry.metadata() {
        Ok(metadata) => metadata,
        Err(err) => {
          eprintln!("Error reading metadata for {}: {}", entry.path().display(), err);
          continue;
        }
      };

      let task = FileTask {
        path: entry.into_path(),
        permissions: metadata.permissions(),
      };

      // Fails only if the workers are gone, which means the scope is
      // unwinding anyway
      if task_tx.send(task).is_err() {
        break;
      }
    }
  }

  /// Processes one task and records its outcome in the shared summary.
  ///
  /// Errors are converted into recorded failures here, at the worker
  /// boundary; they never propagate past the pipeline.
  fn run_task(&self, task: FileTask, summary: &Mutex<RunSummary>) {
    if self.check_only {
      match self.mutator.check(&task.path) {
        Ok(CheckVerdict::Compliant | CheckVerdict::Unsupported) => {
          let mut summary = summary.lock().expect("mutex poisoned");
          summary.files_scanned += 1;
        }
        Ok(CheckVerdict::MissingHeader) => {
          // Non-compliant paths go to stdout, one per line
          println!("{}", task.path.display());
          let mut summary = summary.lock().expect("mutex poisoned");
          summary.files_scanned += 1;
          summary.missing.push(task.path);
        }
        Err(error) => self.record_failure(task.path, &error, summary),
      }
    } else {
      match self.mutator.apply(&task) {
        Ok(modified) => {
          if modified {
            info_log!("Added license to: {}", task.path.display());
          }
          let mut summary = summary.lock().expect("mutex poisoned");
          summary.files_scanned += 1;
          if modified {
            summary.headers_added += 1;
          }
        }
        Err(error) => self.record_failure(task.path, &error, summary),
      }
    }
  }

  fn record_failure(&self, path: PathBuf, error: &anyhow::Error, summary: &Mutex<RunSummary>) {
    eprintln!("Error processing {}: {:#}", path.display(), error);

    let mut summary = summary.lock().expect("mutex poisoned");
    summary.files_scanned += 1;
    summary.failures.push(FileFailure {
      path,
      message: format!("{error:#}"),
    });
  }
}
