//! Smart format detection and file-name correction.
//!
//! Archives in the wild frequently carry the wrong extension, either as a
//! deliberate obfuscation (`.666z` for 7z) or as an upload artifact. The
//! sniffer answers what a file really is, and the normalization entry point
//! renames misnamed files so that suffix-based discovery stays reliable.
//!
//! Detection failures are never fatal: an unreadable or unrecognizable file
//! is simply not an archive.

use std::fs;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use tracing::info;
use tracing::warn;

use super::ArchiveKind;

/// Suffixes known to be misnamed archives, mapped to their real kind.
///
/// `.001` is the first volume of a split archive, conventionally 7z.
const ALIAS_SUFFIXES: &[(&str, ArchiveKind)] = &[
    (".666z", ArchiveKind::SevenZ),
    (".001", ArchiveKind::SevenZ),
    (".part1.rar", ArchiveKind::Rar),
];

/// 7z signature: "7z" followed by format version bytes.
const SEVENZ_MAGIC: [u8; 6] = [0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C];
/// RAR signature: "Rar!".
const RAR_MAGIC: [u8; 4] = [0x52, 0x61, 0x72, 0x21];
/// ZIP local-file / central-directory signature prefix: "PK".
const ZIP_MAGIC: [u8; 2] = [0x50, 0x4B];
/// Gzip signature.
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Number of leading bytes inspected for signatures.
const HEADER_LEN: usize = 16;

/// Determines a file's archive kind, independent of its extension.
///
/// Resolution order: alias-suffix table (no content read), conventional
/// suffix match, then magic-byte signatures. Returns `None` when the file is
/// not a recognizable archive; read failures are logged and treated the same
/// way, never raised.
#[must_use]
pub fn identify(path: &Path) -> Option<ArchiveKind> {
    let name = path.file_name()?.to_str()?;
    let lower = name.to_ascii_lowercase();

    for (alias, kind) in ALIAS_SUFFIXES {
        if lower.ends_with(alias) {
            return Some(*kind);
        }
    }

    if let Some(kind) = ArchiveKind::matches_name(name) {
        return Some(kind);
    }

    match read_header(path) {
        Ok(header) => sniff_magic(&header),
        Err(err) => {
            warn!("cannot read header of {}: {err}", path.display());
            None
        }
    }
}

/// Renames a misnamed archive to carry its conventional suffix.
///
/// Alias suffixes are replaced without reading content; otherwise the file's
/// leading bytes decide. Returns the new path when a rename happened, `None`
/// when the name was already correct, the file is not an archive, or the
/// rename could not be performed (logged, non-fatal).
///
/// Idempotent: calling this on an already-corrected file does nothing.
pub fn correct_name(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let lower = name.to_ascii_lowercase();

    for (alias, kind) in ALIAS_SUFFIXES {
        if lower.ends_with(alias) {
            // Alias suffixes are ASCII, so byte slicing at the boundary is safe.
            let stem = &name[..name.len() - alias.len()];
            let new_name = format!("{stem}.{}", sniffed_extension(*kind));
            return rename_to(path, &new_name);
        }
    }

    if ArchiveKind::matches_name(name).is_some() {
        return None;
    }

    let kind = match read_header(path) {
        Ok(header) => sniff_magic(&header)?,
        Err(err) => {
            warn!("cannot read header of {}: {err}", path.display());
            return None;
        }
    };

    let stem = path.file_stem()?.to_str()?;
    let new_name = format!("{stem}.{}", sniffed_extension(kind));
    rename_to(path, &new_name)
}

/// Matches leading bytes against the known archive signatures.
fn sniff_magic(header: &[u8]) -> Option<ArchiveKind> {
    if header.starts_with(&SEVENZ_MAGIC) {
        Some(ArchiveKind::SevenZ)
    } else if header.starts_with(&RAR_MAGIC) {
        Some(ArchiveKind::Rar)
    } else if header.starts_with(&ZIP_MAGIC) {
        Some(ArchiveKind::Zip)
    } else if header.starts_with(&GZIP_MAGIC) {
        Some(ArchiveKind::TarGz)
    } else {
        None
    }
}

/// Extension written when the signature decides the kind.
///
/// Single-suffix form: a sniffed gzip stream becomes `.gz`, matching how the
/// suffix table classifies it.
const fn sniffed_extension(kind: ArchiveKind) -> &'static str {
    match kind {
        ArchiveKind::TarGz => "gz",
        other => other.extension(),
    }
}

fn read_header(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut buf = [0u8; HEADER_LEN];
    let n = file.read(&mut buf)?;
    Ok(buf[..n].to_vec())
}

fn rename_to(path: &Path, new_name: &str) -> Option<PathBuf> {
    let new_path = path.with_file_name(new_name);
    if new_path == path {
        return None;
    }
    match fs::rename(path, &new_path) {
        Ok(()) => {
            info!("corrected archive name: {} -> {new_name}", path.display());
            Some(new_path)
        }
        Err(err) => {
            warn!("cannot rename {} to {new_name}: {err}", path.display());
            None
        }
    }
}
