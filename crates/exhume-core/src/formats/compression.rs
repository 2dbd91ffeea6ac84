//! Compression codecs used with tar archives.

/// Compression codec wrapping a tar stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionCodec {
    /// Gzip (deflate). Fast with widespread support.
    Gzip,
    /// Bzip2 (Burrows-Wheeler). Better ratio, slower.
    Bzip2,
    /// Xz (LZMA2). Best ratio, slowest.
    Xz,
    /// Zstd. Modern speed/ratio balance.
    Zstd,
}

impl CompressionCodec {
    /// Returns the typical file extension for this codec when used with tar.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Gzip => "tar.gz",
            Self::Bzip2 => "tar.bz2",
            Self::Xz => "tar.xz",
            Self::Zstd => "tar.zst",
        }
    }

    /// Returns a human-readable name for this codec.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        }
    }
}
