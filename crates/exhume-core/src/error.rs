//! Error types for archive extraction and batch processing.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ExtractError`.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur while extracting archives or sequencing a batch.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not a recognized archive format.
    #[error("unsupported archive format: {path}")]
    UnsupportedFormat {
        /// The file whose format could not be determined.
        path: PathBuf,
    },

    /// A password-capable archive rejected the supplied password.
    #[error("wrong password")]
    WrongPassword,

    /// Archive data is corrupt or malformed.
    #[error("corrupt archive data: {0}")]
    CorruptData(String),

    /// Every password candidate was rejected.
    #[error("all {attempts} password candidates exhausted (last error: {last_error})")]
    AllPasswordsExhausted {
        /// Number of candidates tried.
        attempts: usize,
        /// Display text of the final rejection.
        last_error: String,
    },

    /// The codec backend for this format is not linked into the build.
    #[error("no backend support for {format} archives")]
    MissingBackendSupport {
        /// Human-readable format name.
        format: &'static str,
    },
}

impl ExtractError {
    /// Returns `true` if trying another password candidate could change the
    /// outcome.
    ///
    /// The password retry loop continues past these failures and aborts on
    /// everything else: a corrupt archive stays corrupt no matter which
    /// password is supplied.
    #[must_use]
    pub const fn is_wrong_password(&self) -> bool {
        matches!(self, Self::WrongPassword)
    }

    /// Returns `true` if this failure can be resolved by an operator-supplied
    /// manual password through the recovery protocol.
    #[must_use]
    pub const fn is_password_exhaustion(&self) -> bool {
        matches!(self, Self::AllPasswordsExhausted { .. })
    }
}
