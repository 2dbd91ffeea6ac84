//! Single-archive extraction dispatch and password retry.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::info;

use crate::BatchConfig;
use crate::ExtractError;
use crate::Result;
use crate::formats::ArchiveKind;
use crate::formats::CompressionCodec;
use crate::formats::rar;
use crate::formats::sevenz;
use crate::formats::sniffer;
use crate::formats::tar;
use crate::formats::zip;
use crate::passwords;

/// One archive to extract into one destination directory.
///
/// Produced by the recursive unpacker (and the coordinator for top-level
/// archives), consumed once by the engine.
#[derive(Debug, Clone)]
pub struct ExtractionTask {
    /// The archive file.
    pub file_path: PathBuf,

    /// Kind determined during discovery; the engine sniffs when absent.
    pub detected_kind: Option<ArchiveKind>,

    /// Directory receiving the archive's contents; created on demand.
    pub destination: PathBuf,
}

/// Dispatches extraction tasks to the codec backend for their kind.
///
/// For password-capable kinds the engine walks the configured candidate
/// list: it stops at the first success, continues past wrong-password
/// rejections, and aborts immediately on any other failure since no
/// password can fix a corrupt file.
pub struct ExtractionEngine<'a> {
    config: &'a BatchConfig,
}

impl<'a> ExtractionEngine<'a> {
    /// Creates an engine borrowing the batch configuration.
    #[must_use]
    pub fn new(config: &'a BatchConfig) -> Self {
        Self { config }
    }

    /// Runs one extraction task to completion or classified failure.
    ///
    /// # Errors
    ///
    /// `UnsupportedFormat` when the kind cannot be determined;
    /// otherwise whatever the selected backend reports, with
    /// `AllPasswordsExhausted` standing in for a password-capable archive
    /// that rejected every candidate.
    pub fn run(&self, task: &ExtractionTask) -> Result<()> {
        let kind = task
            .detected_kind
            .or_else(|| sniffer::identify(&task.file_path))
            .ok_or_else(|| ExtractError::UnsupportedFormat {
                path: task.file_path.clone(),
            })?;

        debug!("extracting {} as {}", task.file_path.display(), kind.name());
        fs::create_dir_all(&task.destination)?;

        match kind {
            ArchiveKind::Zip => zip::extract(&task.file_path, &task.destination),
            ArchiveKind::TarGz => {
                tar::extract(&task.file_path, &task.destination, CompressionCodec::Gzip)
            }
            ArchiveKind::TarBz2 => {
                tar::extract(&task.file_path, &task.destination, CompressionCodec::Bzip2)
            }
            ArchiveKind::TarXz => {
                tar::extract(&task.file_path, &task.destination, CompressionCodec::Xz)
            }
            ArchiveKind::TarZst => {
                tar::extract(&task.file_path, &task.destination, CompressionCodec::Zstd)
            }
            ArchiveKind::Rar => rar::extract(&task.file_path, &task.destination),
            ArchiveKind::SevenZ => self.extract_sevenz(task),
        }
    }

    /// Retries a password-capable archive exactly once with an
    /// operator-supplied password (recovery protocol).
    ///
    /// # Errors
    ///
    /// Returns the backend failure unchanged; the caller decides whether the
    /// record stays failed.
    pub fn retry_with_password(&self, task: &ExtractionTask, password: &str) -> Result<()> {
        reset_destination(&task.destination)?;
        sevenz::extract(&task.file_path, &task.destination, Some(password))?;
        info!(
            "recovered {} with operator-supplied password",
            task.file_path.display()
        );
        Ok(())
    }

    fn extract_sevenz(&self, task: &ExtractionTask) -> Result<()> {
        let candidates = passwords::candidate_list(self.config);
        try_passwords(&candidates, |password| {
            reset_destination(&task.destination)?;
            sevenz::extract(&task.file_path, &task.destination, password)
        })
    }
}

/// Walks the candidate list until one password succeeds.
///
/// The empty candidate is passed through as `None` (no-password attempt).
/// Wrong-password rejections are remembered and skipped; any other failure
/// aborts the loop immediately. An exhausted list yields
/// `AllPasswordsExhausted` carrying the final rejection.
fn try_passwords<F>(candidates: &[String], mut attempt: F) -> Result<()>
where
    F: FnMut(Option<&str>) -> Result<()>,
{
    let mut last_error = String::new();

    for candidate in candidates {
        let password = (!candidate.is_empty()).then_some(candidate.as_str());
        match attempt(password) {
            Ok(()) => return Ok(()),
            Err(err) if err.is_wrong_password() => {
                debug!("password candidate rejected");
                last_error = err.to_string();
            }
            Err(err) => return Err(err),
        }
    }

    Err(ExtractError::AllPasswordsExhausted {
        attempts: candidates.len(),
        last_error,
    })
}

/// Clears a destination so a retry starts from a clean slate.
///
/// A failed attempt may leave partial writes behind; they are safe to
/// delete.
fn reset_destination(dest: &Path) -> Result<()> {
    match fs::remove_dir_all(dest) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(ExtractError::Io(err)),
    }
    fs::create_dir_all(dest)?;
    Ok(())
}
