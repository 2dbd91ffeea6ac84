//! Recursive workspace unpacking.
//!
//! Walks an extraction tree, corrects misnamed archives, and extracts every
//! nested archive it finds. Discovery is a single full-tree snapshot: one
//! invocation expands exactly one nesting level, so the caller controls how
//! deep the pipeline goes and an archive bomb cannot trigger unbounded
//! recursion.

use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::info;
use tracing::warn;
use walkdir::WalkDir;

use crate::BatchConfig;
use crate::extract::ExtractionEngine;
use crate::extract::ExtractionTask;
use crate::formats::ArchiveKind;
use crate::formats::sniffer;
use crate::ledger::FailureRecord;

/// Suffix appended to an archive's stem to form its extraction directory.
const EXTRACTED_SUFFIX: &str = "_extracted";

/// Result of one unpacking pass over a workspace.
#[derive(Debug, Default)]
pub struct UnpackReport {
    /// Nested archives successfully extracted.
    pub extracted: usize,

    /// Original archive files whose bytes are no longer needed.
    pub cleanup: Vec<PathBuf>,

    /// Archives that could not be extracted; the batch continues past them.
    pub failures: Vec<FailureRecord>,
}

/// Finds and extracts nested archives under a workspace.
pub struct RecursiveUnpacker<'a> {
    config: &'a BatchConfig,
    engine: ExtractionEngine<'a>,
}

impl<'a> RecursiveUnpacker<'a> {
    /// Creates an unpacker borrowing the batch configuration.
    #[must_use]
    pub fn new(config: &'a BatchConfig) -> Self {
        Self {
            config,
            engine: ExtractionEngine::new(config),
        }
    }

    /// Runs one normalization-and-extract pass over the workspace.
    ///
    /// Pass 1 corrects file names tree-wide so that suffix-based discovery
    /// is reliable; pass 2 snapshots the tree and extracts each discovered
    /// archive into a sibling `<stem>_extracted` directory. A single failed
    /// archive never aborts the pass.
    ///
    /// Archives whose extraction directory already exists are skipped, which
    /// makes repeated invocations expand one further nesting level each
    /// without redoing (or re-failing) earlier work.
    pub fn unpack(&self, workspace: &Path) -> UnpackReport {
        if self.config.smart_format_detection {
            self.normalize_names(workspace);
        }

        let worklist = discover_archives(workspace);
        info!(
            "discovered {} nested archive(s) under {}",
            worklist.len(),
            workspace.display()
        );

        let mut report = UnpackReport::default();
        for archive in worklist {
            let destination = extraction_dir(&archive);
            if destination.exists() {
                debug!("already expanded, skipping {}", archive.display());
                continue;
            }

            let task = ExtractionTask {
                detected_kind: archive
                    .file_name()
                    .and_then(|n| n.to_str())
                    .and_then(ArchiveKind::matches_name),
                file_path: archive.clone(),
                destination: destination.clone(),
            };

            match self.engine.run(&task) {
                Ok(()) => {
                    info!("extracted nested archive {}", archive.display());
                    report.extracted += 1;
                    report.cleanup.push(archive);
                }
                Err(err) => {
                    warn!("nested archive {} failed: {err}", archive.display());
                    report
                        .failures
                        .push(FailureRecord::new(archive, destination, &err));
                }
            }
        }
        report
    }

    /// Walks the whole tree once, correcting every regular file's name.
    ///
    /// Must complete before discovery so suffix matching sees corrected
    /// names.
    fn normalize_names(&self, workspace: &Path) {
        for entry in WalkDir::new(workspace).sort_by_file_name() {
            match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    sniffer::correct_name(entry.path());
                }
                Ok(_) => {}
                Err(err) => warn!("walk error during normalization: {err}"),
            }
        }
    }
}

/// Snapshots every file whose (corrected) name matches a supported kind, in
/// directory-traversal order.
fn discover_archives(workspace: &Path) -> Vec<PathBuf> {
    WalkDir::new(workspace)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("walk error during discovery: {err}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .and_then(ArchiveKind::matches_name)
                .is_some()
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Sibling directory receiving one archive's contents.
fn extraction_dir(archive: &Path) -> PathBuf {
    let stem = archive
        .file_stem()
        .map_or_else(|| "archive".to_string(), |s| s.to_string_lossy().into_owned());
    archive.with_file_name(format!("{stem}{EXTRACTED_SUFFIX}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_extraction_dir_naming() {
        assert_eq!(
            extraction_dir(Path::new("/ws/inner.zip")),
            PathBuf::from("/ws/inner_extracted")
        );
        // Single-extension stem: a.tar.gz keeps its .tar part.
        assert_eq!(
            extraction_dir(Path::new("/ws/a.tar.gz")),
            PathBuf::from("/ws/a.tar_extracted")
        );
    }

    #[test]
    fn test_unpack_extracts_nested_archive() {
        let temp = TempDir::new().unwrap();
        let workspace = temp.path();
        fs::write(
            workspace.join("inner.zip"),
            test_utils::create_test_zip(vec![("video.mp4", b"fake video")]),
        )
        .unwrap();

        let config = BatchConfig::default();
        let unpacker = RecursiveUnpacker::new(&config);
        let report = unpacker.unpack(workspace);

        assert_eq!(report.extracted, 1);
        assert_eq!(report.cleanup, vec![workspace.join("inner.zip")]);
        assert!(report.failures.is_empty());
        assert!(workspace.join("inner_extracted/video.mp4").exists());
    }

    #[test]
    fn test_unpack_corrects_misnamed_archive_first() {
        let temp = TempDir::new().unwrap();
        let workspace = temp.path();
        // ZIP bytes behind a meaningless extension.
        fs::write(
            workspace.join("download.dat"),
            test_utils::create_test_zip(vec![("video.mp4", b"fake video")]),
        )
        .unwrap();

        let config = BatchConfig::default();
        let unpacker = RecursiveUnpacker::new(&config);
        let report = unpacker.unpack(workspace);

        assert_eq!(report.extracted, 1);
        assert!(workspace.join("download.zip").exists());
        assert!(workspace.join("download_extracted/video.mp4").exists());
    }

    #[test]
    fn test_unpack_skips_normalization_when_disabled() {
        let temp = TempDir::new().unwrap();
        let workspace = temp.path();
        fs::write(
            workspace.join("download.dat"),
            test_utils::create_test_zip(vec![("video.mp4", b"fake video")]),
        )
        .unwrap();

        let config = BatchConfig {
            smart_format_detection: false,
            ..Default::default()
        };
        let unpacker = RecursiveUnpacker::new(&config);
        let report = unpacker.unpack(workspace);

        assert_eq!(report.extracted, 0);
        assert!(workspace.join("download.dat").exists());
    }

    #[test]
    fn test_unpack_continues_past_failures() {
        let temp = TempDir::new().unwrap();
        let workspace = temp.path();
        fs::write(workspace.join("a_broken.zip"), b"PK\x03\x04 garbage").unwrap();
        fs::write(
            workspace.join("b_good.zip"),
            test_utils::create_test_zip(vec![("video.mp4", b"fake video")]),
        )
        .unwrap();

        let config = BatchConfig::default();
        let unpacker = RecursiveUnpacker::new(&config);
        let report = unpacker.unpack(workspace);

        assert_eq!(report.extracted, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].file_name(), "a_broken.zip");
        assert!(workspace.join("b_good_extracted/video.mp4").exists());
    }

    #[test]
    fn test_unpack_is_one_level_per_invocation() {
        let temp = TempDir::new().unwrap();
        let workspace = temp.path();
        // outer.zip contains inner.zip which contains the payload.
        let inner = test_utils::create_test_zip(vec![("video.mp4", b"fake video")]);
        let outer = test_utils::create_test_zip(vec![("inner.zip", inner.as_slice())]);
        fs::write(workspace.join("outer.zip"), outer).unwrap();

        let config = BatchConfig::default();
        let unpacker = RecursiveUnpacker::new(&config);

        let first = unpacker.unpack(workspace);
        assert_eq!(first.extracted, 1);
        assert!(workspace.join("outer_extracted/inner.zip").exists());
        assert!(!workspace.join("outer_extracted/inner_extracted").exists());

        // The second pass expands the next level without redoing the first.
        let second = unpacker.unpack(workspace);
        assert_eq!(second.extracted, 1);
        assert!(
            workspace
                .join("outer_extracted/inner_extracted/video.mp4")
                .exists()
        );
    }

    #[test]
    fn test_unpack_does_not_retry_failed_archives() {
        let temp = TempDir::new().unwrap();
        let workspace = temp.path();
        fs::write(workspace.join("broken.zip"), b"PK\x03\x04 garbage").unwrap();

        let config = BatchConfig::default();
        let unpacker = RecursiveUnpacker::new(&config);

        let first = unpacker.unpack(workspace);
        assert_eq!(first.failures.len(), 1);

        // The failed archive's extraction dir marks it as already visited.
        let second = unpacker.unpack(workspace);
        assert!(second.failures.is_empty());
        assert_eq!(second.extracted, 0);
    }
}
