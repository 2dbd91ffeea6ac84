//! Batch archive unpacking and video payload harvesting.
//!
//! `exhume-core` processes a set of source archives: each one is extracted
//! into a private workspace, nested archives (including misnamed and
//! password-protected ones) are recursively unpacked, and every video
//! payload found is copied into the configured output tree with
//! collision-safe names. Archives that defeat automatic processing land in
//! a failure ledger the operator can work through afterwards.
//!
//! # Examples
//!
//! ```no_run
//! use exhume_core::{AutoDefer, BatchConfig, BatchCoordinator, NoopProgress, OutputPolicy};
//! use std::path::PathBuf;
//!
//! # fn main() -> exhume_core::Result<()> {
//! let config = BatchConfig {
//!     default_password: "letmein".to_string(),
//!     ..Default::default()
//! };
//! let policy = OutputPolicy::Unified {
//!     dir: PathBuf::from("/data/harvested"),
//! };
//!
//! let mut coordinator = BatchCoordinator::new(config, policy);
//! let report = coordinator.process(
//!     &[PathBuf::from("/data/drop/bundle.tar.gz")],
//!     &mut NoopProgress,
//!     &mut AutoDefer,
//! )?;
//! println!(
//!     "{}/{} jobs succeeded, {} payloads",
//!     report.successful_jobs,
//!     report.total_jobs,
//!     report.payload_files.len()
//! );
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod batch;
pub mod config;
pub mod error;
pub mod extract;
pub mod formats;
pub mod harvest;
pub mod ledger;
pub mod passwords;
pub mod test_utils;
pub mod unpack;

// Re-export main API types
pub use batch::BatchCoordinator;
pub use batch::BatchReport;
pub use batch::NoopProgress;
pub use batch::OutputPolicy;
pub use batch::ProgressSink;
pub use config::BatchConfig;
pub use error::ExtractError;
pub use error::Result;
pub use extract::ExtractionEngine;
pub use extract::ExtractionTask;
pub use formats::ArchiveKind;
pub use ledger::AutoDefer;
pub use ledger::FailureLedger;
pub use ledger::FailureRecord;
pub use ledger::FailureStatus;
pub use ledger::RecoveryDecision;
pub use ledger::RecoveryHandler;
