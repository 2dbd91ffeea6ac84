//! Archive format taxonomy and codec backends.

pub mod compression;
pub mod rar;
pub mod sevenz;
pub mod sniffer;
pub mod tar;
pub mod zip;

pub use compression::CompressionCodec;

/// Supported archive kinds.
///
/// A file whose kind cannot be determined is simply not an archive from the
/// pipeline's point of view; that case is expressed as `Option::None` at the
/// detection boundary rather than as a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveKind {
    /// ZIP archive.
    Zip,
    /// Gzip-compressed tar archive.
    TarGz,
    /// Bzip2-compressed tar archive.
    TarBz2,
    /// XZ-compressed tar archive.
    TarXz,
    /// Zstd-compressed tar archive.
    TarZst,
    /// RAR archive (recognized, extraction backend not linked).
    Rar,
    /// 7z archive, optionally password-protected.
    SevenZ,
}

impl ArchiveKind {
    /// Returns the conventional file extension for this kind.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
            Self::TarBz2 => "tar.bz2",
            Self::TarXz => "tar.xz",
            Self::TarZst => "tar.zst",
            Self::Rar => "rar",
            Self::SevenZ => "7z",
        }
    }

    /// Returns a human-readable format name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
            Self::TarBz2 => "tar.bz2",
            Self::TarXz => "tar.xz",
            Self::TarZst => "tar.zst",
            Self::Rar => "rar",
            Self::SevenZ => "7z",
        }
    }

    /// Returns `true` if this kind accepts a password on extraction.
    #[must_use]
    pub const fn is_password_capable(self) -> bool {
        matches!(self, Self::SevenZ)
    }

    /// Matches a file name against the conventional suffixes of every
    /// supported kind, case-insensitively.
    ///
    /// Multi-part suffixes win over their tails (`.tar.gz` before `.gz`).
    /// Alias suffixes such as `.666z` are the sniffer's concern, not this
    /// function's.
    #[must_use]
    pub fn matches_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") || lower.ends_with(".gz") {
            Some(Self::TarGz)
        } else if lower.ends_with(".tar.bz2") || lower.ends_with(".tbz") || lower.ends_with(".tbz2")
        {
            Some(Self::TarBz2)
        } else if lower.ends_with(".tar.xz") || lower.ends_with(".txz") {
            Some(Self::TarXz)
        } else if lower.ends_with(".tar.zst") || lower.ends_with(".tzst") {
            Some(Self::TarZst)
        } else if lower.ends_with(".zip") {
            Some(Self::Zip)
        } else if lower.ends_with(".rar") {
            Some(Self::Rar)
        } else if lower.ends_with(".7z") {
            Some(Self::SevenZ)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_name_basic() {
        assert_eq!(ArchiveKind::matches_name("a.zip"), Some(ArchiveKind::Zip));
        assert_eq!(ArchiveKind::matches_name("a.tar.gz"), Some(ArchiveKind::TarGz));
        assert_eq!(ArchiveKind::matches_name("a.tgz"), Some(ArchiveKind::TarGz));
        assert_eq!(ArchiveKind::matches_name("a.tar.bz2"), Some(ArchiveKind::TarBz2));
        assert_eq!(ArchiveKind::matches_name("a.tar.xz"), Some(ArchiveKind::TarXz));
        assert_eq!(ArchiveKind::matches_name("a.tar.zst"), Some(ArchiveKind::TarZst));
        assert_eq!(ArchiveKind::matches_name("a.rar"), Some(ArchiveKind::Rar));
        assert_eq!(ArchiveKind::matches_name("a.7z"), Some(ArchiveKind::SevenZ));
    }

    #[test]
    fn test_matches_name_case_insensitive() {
        assert_eq!(ArchiveKind::matches_name("A.ZIP"), Some(ArchiveKind::Zip));
        assert_eq!(ArchiveKind::matches_name("A.TAR.GZ"), Some(ArchiveKind::TarGz));
        assert_eq!(ArchiveKind::matches_name("A.7Z"), Some(ArchiveKind::SevenZ));
    }

    #[test]
    fn test_matches_name_unknown() {
        assert_eq!(ArchiveKind::matches_name("notes.txt"), None);
        assert_eq!(ArchiveKind::matches_name("video.mp4"), None);
        // Alias suffixes are handled by the sniffer, not by name matching.
        assert_eq!(ArchiveKind::matches_name("inner.666z"), None);
    }

    #[test]
    fn test_password_capable() {
        assert!(ArchiveKind::SevenZ.is_password_capable());
        assert!(!ArchiveKind::Zip.is_password_capable());
        assert!(!ArchiveKind::TarGz.is_password_capable());
    }

    #[test]
    fn test_extension_round_trip() {
        for kind in [
            ArchiveKind::Zip,
            ArchiveKind::TarGz,
            ArchiveKind::TarBz2,
            ArchiveKind::TarXz,
            ArchiveKind::TarZst,
            ArchiveKind::Rar,
            ArchiveKind::SevenZ,
        ] {
            let name = format!("file.{}", kind.extension());
            assert_eq!(ArchiveKind::matches_name(&name), Some(kind));
        }
    }
}
