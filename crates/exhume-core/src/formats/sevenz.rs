//! 7z archive extraction with password support.
//!
//! The only password-capable backend. A wrong password must be
//! distinguishable from corrupt data so the retry loop knows whether trying
//! another candidate is worthwhile; sevenz-rust2 reports both through one
//! error type, so classification goes by the error text (the same approach
//! the library's own callers use).

use std::path::Path;

use sevenz_rust2::Password;
use tracing::debug;

use crate::ExtractError;
use crate::Result;

/// Extracts a 7z archive into `dest`.
///
/// `None` (or an empty string) means "attempt without a password". Supplying
/// a password for an unencrypted archive is harmless; it is simply unused.
///
/// # Errors
///
/// Returns `WrongPassword` when the archive rejects the candidate,
/// `CorruptData` for malformed archives, `Io` for filesystem failures.
pub fn extract(path: &Path, dest: &Path, password: Option<&str>) -> Result<()> {
    debug!(
        "extracting 7z {} ({})",
        path.display(),
        if password.is_some() { "with password" } else { "no password" },
    );
    std::fs::create_dir_all(dest)?;
    match password.filter(|p| !p.is_empty()) {
        Some(password) => {
            sevenz_rust2::decompress_file_with_password(path, dest, Password::from(password))
        }
        None => sevenz_rust2::decompress_file(path, dest),
    }
    .map_err(ExtractError::from)
}

impl From<sevenz_rust2::Error> for ExtractError {
    fn from(err: sevenz_rust2::Error) -> Self {
        // The debug form carries the variant name, which is the reliable
        // place to spot password rejections across library versions.
        let debug_text = format!("{err:?}").to_lowercase();
        if debug_text.contains("password") || debug_text.contains("encrypt") {
            return Self::WrongPassword;
        }

        let display_text = err.to_string();
        let lower = display_text.to_lowercase();
        if lower.contains("i/o") || lower.contains("read") || lower.contains("write") {
            return Self::Io(std::io::Error::other(display_text));
        }
        Self::CorruptData(format!("7z error: {display_text}"))
    }
}
