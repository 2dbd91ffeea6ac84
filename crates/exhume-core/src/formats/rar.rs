//! RAR archive handling.
//!
//! RAR is recognized by signature and alias suffix so that misnamed files
//! are corrected and failures are reported accurately, but no pure-Rust RAR
//! decoder is linked into this build. Extraction always reports
//! `MissingBackendSupport`; the failure ledger carries the file to the
//! operator instead of silently dropping it.

use std::path::Path;

use tracing::warn;

use crate::ExtractError;
use crate::Result;

/// Reports the absence of a RAR extraction backend.
///
/// # Errors
///
/// Always returns `MissingBackendSupport`.
pub fn extract(path: &Path, _dest: &Path) -> Result<()> {
    warn!("no RAR backend available for {}", path.display());
    Err(ExtractError::MissingBackendSupport { format: "rar" })
}
