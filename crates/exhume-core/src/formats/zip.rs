//! ZIP archive extraction.

use std::fs::File;
use std::path::Path;

use tracing::debug;

use crate::ExtractError;
use crate::Result;

/// Extracts a ZIP archive into `dest`.
///
/// # Errors
///
/// Returns `CorruptData` for malformed archives or entries the zip crate
/// cannot represent, `Io` for filesystem failures.
pub fn extract(path: &Path, dest: &Path) -> Result<()> {
    debug!("extracting zip {}", path.display());
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    archive.extract(dest)?;
    Ok(())
}

impl From<zip::result::ZipError> for ExtractError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io_err) => Self::Io(io_err),
            other => Self::CorruptData(other.to_string()),
        }
    }
}
