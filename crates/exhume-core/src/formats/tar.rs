//! Tar archive extraction across compression codecs.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use tracing::debug;
use xz2::read::XzDecoder;

use crate::ExtractError;
use crate::Result;

use super::CompressionCodec;

/// Extracts a compressed tar archive into `dest`.
///
/// Extraction is unconditional; tar has no password concept. On failure the
/// destination may hold partial writes which the caller is free to delete
/// and retry.
///
/// # Errors
///
/// Returns `CorruptData` for malformed streams or unsupported internal
/// entries, `Io` for filesystem failures.
pub fn extract(path: &Path, dest: &Path, codec: CompressionCodec) -> Result<()> {
    debug!("extracting {} tar {}", codec.name(), path.display());
    let reader = BufReader::new(File::open(path)?);
    match codec {
        CompressionCodec::Gzip => unpack(GzDecoder::new(reader), dest),
        CompressionCodec::Bzip2 => unpack(BzDecoder::new(reader), dest),
        CompressionCodec::Xz => unpack(XzDecoder::new(reader), dest),
        CompressionCodec::Zstd => {
            let decoder = zstd::stream::read::Decoder::new(reader)
                .map_err(|e| ExtractError::CorruptData(format!("zstd stream: {e}")))?;
            unpack(decoder, dest)
        }
    }
}

fn unpack<R: Read>(reader: R, dest: &Path) -> Result<()> {
    let mut archive = tar::Archive::new(reader);
    archive.unpack(dest).map_err(classify)
}

/// Decoder and tar errors surface as `io::Error`; data-shaped failures are
/// corruption, the rest are real I/O problems.
fn classify(err: std::io::Error) -> ExtractError {
    use std::io::ErrorKind;
    match err.kind() {
        ErrorKind::InvalidData | ErrorKind::InvalidInput | ErrorKind::UnexpectedEof => {
            ExtractError::CorruptData(err.to_string())
        }
        _ => ExtractError::Io(err),
    }
}
