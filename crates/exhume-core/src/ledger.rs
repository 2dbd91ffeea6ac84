//! Failure tracking and the operator recovery protocol.
//!
//! Every archive the pipeline gives up on becomes a [`FailureRecord`].
//! Processing never stops for a failure; at the end of the batch the
//! operator gets one chance per record to retry with a manual password,
//! defer, or discard.

use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::ExtractError;

/// Lifecycle of a failure record.
///
/// `Failed` is the only non-terminal state; the recovery protocol moves a
/// record into exactly one of the other three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStatus {
    /// Automatic processing gave up on this archive.
    Failed,
    /// An operator-supplied password succeeded; treated as if originally
    /// successful.
    Resolved,
    /// The operator chose to handle this later; processing moved on.
    Deferred,
    /// The operator skipped this archive permanently.
    Discarded,
}

/// One archive (or operation) that could not complete.
#[derive(Debug, Clone)]
pub struct FailureRecord {
    /// The archive that failed.
    pub archive_path: PathBuf,

    /// The directory the extraction was targeting; reused by the recovery
    /// retry and the post-recovery harvest.
    pub destination: PathBuf,

    /// Human-readable failure reason.
    pub reason: String,

    /// Whether a manual password retry can possibly help.
    pub password_exhausted: bool,

    /// Current lifecycle state.
    pub status: FailureStatus,
}

impl FailureRecord {
    /// Creates a record in the `Failed` state from a classified error.
    #[must_use]
    pub fn new(archive_path: PathBuf, destination: PathBuf, error: &ExtractError) -> Self {
        Self {
            archive_path,
            destination,
            reason: error.to_string(),
            password_exhausted: error.is_password_exhaustion(),
            status: FailureStatus::Failed,
        }
    }

    /// Returns the archive's file name for display.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.archive_path
            .file_name()
            .map_or_else(
                || self.archive_path.display().to_string(),
                |name| name.to_string_lossy().into_owned(),
            )
    }
}

/// Operator decision for one failed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryDecision {
    /// Retry the extraction once with this password.
    RetryWithPassword(String),
    /// Leave the record failed and move on ("handle later").
    Defer,
    /// Skip this archive permanently.
    Discard,
}

/// Collaborator interface for recovery decisions.
///
/// The concrete implementation may be a CLI prompt, an RPC bridge or a GUI
/// dialog; the core blocks on [`RecoveryHandler::decide`] exactly once per
/// unresolved failure, only when interactive handling is enabled.
pub trait RecoveryHandler {
    /// Asks the operator what to do with a failed record. Blocking.
    fn decide(&mut self, record: &FailureRecord) -> RecoveryDecision;

    /// Informs the operator that the manual-password retry also failed.
    fn on_retry_failed(&mut self, record: &FailureRecord, error: &ExtractError) {
        let _ = (record, error);
    }
}

/// Non-interactive handler that defers every failure.
#[derive(Debug, Default)]
pub struct AutoDefer;

impl RecoveryHandler for AutoDefer {
    fn decide(&mut self, _record: &FailureRecord) -> RecoveryDecision {
        RecoveryDecision::Defer
    }
}

/// Aggregate store for a batch run's failure records.
#[derive(Debug, Default)]
pub struct FailureLedger {
    records: Vec<FailureRecord>,
}

impl FailureLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record.
    pub fn push(&mut self, record: FailureRecord) {
        debug!(
            "ledger: {} failed ({})",
            record.archive_path.display(),
            record.reason
        );
        self.records.push(record);
    }

    /// Adds a batch of records.
    pub fn extend(&mut self, records: Vec<FailureRecord>) {
        for record in records {
            self.push(record);
        }
    }

    /// All records, in insertion order.
    #[must_use]
    pub fn records(&self) -> &[FailureRecord] {
        &self.records
    }

    /// Mutable access for the recovery protocol.
    pub fn records_mut(&mut self) -> &mut [FailureRecord] {
        &mut self.records
    }

    /// Returns `true` if no record was ever added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Records still awaiting an operator decision.
    pub fn active(&self) -> impl Iterator<Item = &FailureRecord> {
        self.records
            .iter()
            .filter(|r| r.status == FailureStatus::Failed)
    }

    /// Returns `true` if any record is not `Resolved`.
    #[must_use]
    pub fn has_unresolved(&self) -> bool {
        self.records
            .iter()
            .any(|r| r.status != FailureStatus::Resolved)
    }

    /// Serializes non-resolved records to a human-readable report file.
    ///
    /// One block per record: index, file name, absolute path, reason.
    /// Written only on explicit request, never automatically.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from creating or writing the file.
    pub fn write_report(&self, path: &Path) -> std::io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "failed archive report")?;
        writeln!(out, "=====================")?;
        writeln!(out)?;

        for (index, record) in self
            .records
            .iter()
            .filter(|r| r.status != FailureStatus::Resolved)
            .enumerate()
        {
            writeln!(out, "{}. {}", index + 1, record.file_name())?;
            writeln!(out, "   path: {}", record.archive_path.display())?;
            writeln!(out, "   reason: {}", record.reason)?;
            writeln!(out)?;
        }
        out.flush()
    }
}
