//! Batch sequencing across source archives.
//!
//! One coordinator owns the whole run: the job list, the output policy, the
//! failure ledger and the progress counters. Jobs run strictly sequentially;
//! a failing job is recorded and the loop moves on, so one bad archive never
//! halts the batch.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::BatchConfig;
use crate::ExtractError;
use crate::Result;
use crate::extract::ExtractionEngine;
use crate::extract::ExtractionTask;
use crate::formats::ArchiveKind;
use crate::harvest;
use crate::ledger::FailureLedger;
use crate::ledger::FailureRecord;
use crate::ledger::FailureStatus;
use crate::ledger::RecoveryDecision;
use crate::ledger::RecoveryHandler;
use crate::unpack::RecursiveUnpacker;

/// Prefix of every job workspace directory; the residual sweep keys on it.
const WORKSPACE_PREFIX: &str = "exhume_tmp_";

/// Where harvested payloads end up.
#[derive(Debug, Clone)]
pub enum OutputPolicy {
    /// Every job's payloads go into one directory.
    Unified {
        /// The shared destination.
        dir: PathBuf,
    },
    /// Each job gets its own subdirectory, named after the source stem.
    PerSource {
        /// Base directory for per-source subdirectories.
        dir: PathBuf,
        /// Per-file overrides replacing the base for specific sources.
        overrides: HashMap<PathBuf, PathBuf>,
    },
}

impl OutputPolicy {
    /// The configured base directory; workspaces are created under it.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        match self {
            Self::Unified { dir } | Self::PerSource { dir, .. } => dir,
        }
    }

    /// Resolves the payload destination for one source archive.
    fn resolve(&self, source: &Path) -> PathBuf {
        match self {
            Self::Unified { dir } => dir.clone(),
            Self::PerSource { dir, overrides } => {
                let base = overrides.get(source).cloned().unwrap_or_else(|| dir.clone());
                let stem = source.file_stem().map_or_else(
                    || "source".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                );
                base.join(stem)
            }
        }
    }
}

/// Receives batch progress: a running percentage plus a status line.
pub trait ProgressSink {
    /// Reports overall progress, 0–100.
    fn on_progress(&mut self, percent: u8, status: &str);

    /// Announces the start of one job.
    fn on_job_started(&mut self, index: usize, total: usize, source: &Path) {
        let _ = (index, total, source);
    }
}

/// Sink that swallows all progress updates.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn on_progress(&mut self, _percent: u8, _status: &str) {}
}

/// Outcome of a whole batch run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Number of jobs attempted.
    pub total_jobs: usize,

    /// Jobs whose pipeline completed (nested failures inside a job do not
    /// make the job unsuccessful; they live in `failures`).
    pub successful_jobs: usize,

    /// Destination paths of every harvested payload file.
    pub payload_files: Vec<PathBuf>,

    /// Final state of every failure record.
    pub failures: Vec<FailureRecord>,
}

/// Job-private scratch directory; all recursive extraction happens inside.
#[derive(Debug)]
struct Workspace {
    root: PathBuf,
}

impl Workspace {
    fn create(base: &Path, index: usize, source: &Path) -> Result<Self> {
        let stem = source.file_stem().map_or_else(
            || "archive".to_string(),
            |s| s.to_string_lossy().into_owned(),
        );
        let root = base.join(format!("{WORKSPACE_PREFIX}{index}_{stem}"));
        fs::create_dir_all(&root)?;
        debug!("created workspace {}", root.display());
        Ok(Self { root })
    }
}

/// Everything the coordinator remembers about one job after it ran.
#[derive(Debug)]
struct JobContext {
    workspace_root: PathBuf,
    output_dir: PathBuf,
    succeeded: bool,
    had_failures: bool,
    cleanup: Vec<PathBuf>,
    cleaned: bool,
}

/// Sequences jobs, owns the failure ledger and triggers cleanup.
pub struct BatchCoordinator {
    config: BatchConfig,
    policy: OutputPolicy,
    ledger: FailureLedger,
}

impl BatchCoordinator {
    /// Creates a coordinator for one batch run.
    #[must_use]
    pub fn new(config: BatchConfig, policy: OutputPolicy) -> Self {
        Self {
            config,
            policy,
            ledger: FailureLedger::new(),
        }
    }

    /// The failure ledger, e.g. for writing the failure report after a run.
    #[must_use]
    pub fn ledger(&self) -> &FailureLedger {
        &self.ledger
    }

    /// Processes every source archive in order.
    ///
    /// Per job: workspace creation, top-level extraction, recursive
    /// unpacking (flag-gated), payload harvest, cleanup. After all jobs the
    /// recovery protocol runs once over the ledger when interactive handling
    /// is enabled, then a final pass removes deferred and residual
    /// workspaces.
    ///
    /// # Errors
    ///
    /// Only setup-level problems abort the run: an empty or partially
    /// missing source list, or an unusable output base directory. Everything
    /// at job or file granularity is recorded and skipped.
    pub fn process(
        &mut self,
        sources: &[PathBuf],
        progress: &mut dyn ProgressSink,
        recovery: &mut dyn RecoveryHandler,
    ) -> Result<BatchReport> {
        validate_sources(sources)?;

        info!("starting batch of {} job(s)", sources.len());
        progress.on_progress(0, "initializing");

        fs::create_dir_all(self.policy.base_dir())?;
        progress.on_progress(5, "output directory ready");

        let total = sources.len();
        let mut successful = 0usize;
        let mut payloads: Vec<PathBuf> = Vec::new();
        let mut jobs: Vec<JobContext> = Vec::new();

        for (index, source) in sources.iter().enumerate() {
            progress.on_job_started(index, total, source);
            info!("processing job {}/{total}: {}", index + 1, source.display());

            if let Some(mut job) = self.run_job(index, source, &mut payloads) {
                if job.succeeded {
                    successful += 1;
                }
                // Jobs holding failures keep their workspace until the
                // operator had a chance to resolve them.
                let defer = job.had_failures && self.config.interactive_recovery;
                if self.config.auto_cleanup && !defer {
                    cleanup_job(&job);
                    job.cleaned = true;
                }
                jobs.push(job);
            }

            let percent = u8::try_from(10 + (index + 1) * 80 / total).unwrap_or(90);
            progress.on_progress(percent, &format!("processed {}/{total} job(s)", index + 1));
        }

        if self.config.interactive_recovery && self.ledger.active().next().is_some() {
            progress.on_progress(90, "recovering failures");
            self.run_recovery(recovery, &jobs, &mut payloads);
        }

        if self.config.auto_cleanup {
            progress.on_progress(95, "cleaning up");
            for job in jobs.iter().filter(|j| !j.cleaned) {
                cleanup_job(job);
            }
            sweep_residual_workspaces(self.policy.base_dir());
        }

        progress.on_progress(100, "batch complete");
        info!(
            "batch complete: {successful}/{total} job(s) succeeded, {} payload file(s), {} failure record(s)",
            payloads.len(),
            self.ledger.len()
        );

        Ok(BatchReport {
            total_jobs: total,
            successful_jobs: successful,
            payload_files: payloads,
            failures: self.ledger.records().to_vec(),
        })
    }

    /// Runs one job to completion. Returns `None` only when setup failed
    /// before a workspace existed; the failure is recorded either way.
    fn run_job(
        &mut self,
        index: usize,
        source: &Path,
        payloads: &mut Vec<PathBuf>,
    ) -> Option<JobContext> {
        let output_dir = self.policy.resolve(source);

        let workspace = match prepare_job(&output_dir, self.policy.base_dir(), index, source) {
            Ok(workspace) => workspace,
            Err(err) => {
                error!("job setup failed for {}: {err}", source.display());
                self.ledger
                    .push(FailureRecord::new(source.to_path_buf(), output_dir, &err));
                return None;
            }
        };

        let failures_before = self.ledger.len();
        let mut succeeded = false;
        let mut cleanup = Vec::new();

        let engine = ExtractionEngine::new(&self.config);
        let task = ExtractionTask {
            file_path: source.to_path_buf(),
            detected_kind: None,
            destination: workspace.root.clone(),
        };

        match engine.run(&task) {
            Ok(()) => {
                if self.config.recursive_extract {
                    let unpacker = RecursiveUnpacker::new(&self.config);
                    let first = unpacker.unpack(&workspace.root);
                    let expanded = first.extracted;
                    cleanup.extend(first.cleanup);
                    self.ledger.extend(first.failures);

                    // One fixed additional pass for archives the first pass
                    // revealed; never unbounded.
                    if expanded > 0 {
                        let second = unpacker.unpack(&workspace.root);
                        cleanup.extend(second.cleanup);
                        self.ledger.extend(second.failures);
                    }
                }

                match harvest::harvest(&workspace.root, &output_dir, &self.config.payload_extension)
                {
                    Ok(copied) => {
                        payloads.extend(copied);
                        succeeded = true;
                    }
                    Err(err) => {
                        error!("harvest failed for {}: {err}", source.display());
                        self.ledger.push(FailureRecord::new(
                            source.to_path_buf(),
                            workspace.root.clone(),
                            &err,
                        ));
                    }
                }
            }
            Err(err) => {
                warn!("top-level extraction failed for {}: {err}", source.display());
                self.ledger.push(FailureRecord::new(
                    source.to_path_buf(),
                    workspace.root.clone(),
                    &err,
                ));
            }
        }

        Some(JobContext {
            workspace_root: workspace.root,
            output_dir,
            succeeded,
            had_failures: self.ledger.len() > failures_before,
            cleanup,
            cleaned: false,
        })
    }

    /// Runs the recovery protocol once over every still-failed record.
    ///
    /// Blocking by design: the batch pipeline is suspended until the handler
    /// returns each decision.
    fn run_recovery(
        &mut self,
        handler: &mut dyn RecoveryHandler,
        jobs: &[JobContext],
        payloads: &mut Vec<PathBuf>,
    ) {
        let engine = ExtractionEngine::new(&self.config);

        for record in self.ledger.records_mut() {
            if record.status != FailureStatus::Failed {
                continue;
            }

            match handler.decide(record) {
                RecoveryDecision::RetryWithPassword(password) if record.password_exhausted => {
                    let task = ExtractionTask {
                        file_path: record.archive_path.clone(),
                        detected_kind: Some(ArchiveKind::SevenZ),
                        destination: record.destination.clone(),
                    };
                    match engine.retry_with_password(&task, &password) {
                        Ok(()) => {
                            record.status = FailureStatus::Resolved;
                            // Harvesting for this archive's contents was
                            // blocked; it proceeds now.
                            let owner = jobs
                                .iter()
                                .find(|job| record.destination.starts_with(&job.workspace_root));
                            if let Some(job) = owner {
                                match harvest::harvest(
                                    &record.destination,
                                    &job.output_dir,
                                    &self.config.payload_extension,
                                ) {
                                    Ok(copied) => payloads.extend(copied),
                                    Err(err) => warn!(
                                        "post-recovery harvest failed for {}: {err}",
                                        record.archive_path.display()
                                    ),
                                }
                            }
                        }
                        Err(err) => {
                            warn!(
                                "manual password retry failed for {}: {err}",
                                record.archive_path.display()
                            );
                            handler.on_retry_failed(record, &err);
                        }
                    }
                }
                RecoveryDecision::RetryWithPassword(_) => {
                    // A password cannot fix a non-password failure.
                    warn!(
                        "manual password cannot help {}; deferring",
                        record.file_name()
                    );
                    record.status = FailureStatus::Deferred;
                }
                RecoveryDecision::Defer => {
                    info!("deferred {}", record.file_name());
                    record.status = FailureStatus::Deferred;
                }
                RecoveryDecision::Discard => {
                    info!("discarded {}", record.file_name());
                    record.status = FailureStatus::Discarded;
                }
            }
        }
    }
}

fn validate_sources(sources: &[PathBuf]) -> Result<()> {
    if sources.is_empty() {
        return Err(ExtractError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "no source archives provided",
        )));
    }

    let missing: Vec<String> = sources
        .iter()
        .filter(|path| !path.exists())
        .map(|path| path.display().to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ExtractError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("source archives not found: {}", missing.join(", ")),
        )))
    }
}

fn prepare_job(
    output_dir: &Path,
    workspace_base: &Path,
    index: usize,
    source: &Path,
) -> Result<Workspace> {
    fs::create_dir_all(output_dir)?;
    Workspace::create(workspace_base, index, source)
}

/// Deletes a job's extracted-archive leftovers, then its workspace.
fn cleanup_job(job: &JobContext) {
    for file in &job.cleanup {
        if file.exists()
            && let Err(err) = fs::remove_file(file)
        {
            debug!("cannot remove intermediate {}: {err}", file.display());
        }
    }
    if let Err(err) = fs::remove_dir_all(&job.workspace_root) {
        warn!(
            "cannot remove workspace {}: {err}",
            job.workspace_root.display()
        );
    } else {
        debug!("removed workspace {}", job.workspace_root.display());
    }
}

/// Removes workspaces left behind by jobs that died before their own
/// cleanup step. Top level of the base directory only.
fn sweep_residual_workspaces(base: &Path) {
    let entries = match fs::read_dir(base) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("cannot sweep {}: {err}", base.display());
            return;
        }
    };
    for entry in entries.filter_map(std::result::Result::ok) {
        let is_workspace = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(WORKSPACE_PREFIX));
        if is_workspace && entry.path().is_dir() {
            if let Err(err) = fs::remove_dir_all(entry.path()) {
                warn!("cannot remove residual {}: {err}", entry.path().display());
            } else {
                info!("removed residual workspace {}", entry.path().display());
            }
        }
    }
}
