//! Test utilities for building archives in memory.
//!
//! Reusable helpers for the format, unpacker and pipeline tests. All
//! functions may panic on I/O errors since they are for test use only.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;

/// Creates an in-memory tar archive from (path, content) entries.
///
/// Files are created with mode 0o644.
#[must_use]
pub fn create_test_tar(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    let mut ar = tar::Builder::new(Vec::new());
    for (path, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        ar.append_data(&mut header, path, data).unwrap();
    }
    ar.into_inner().unwrap()
}

/// Creates an in-memory gzip-compressed tar archive.
#[must_use]
pub fn create_test_tar_gz(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    let tar_data = create_test_tar(entries);
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&tar_data).unwrap();
    encoder.finish().unwrap()
}

/// Creates an in-memory bzip2-compressed tar archive.
#[must_use]
pub fn create_test_tar_bz2(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    let tar_data = create_test_tar(entries);
    let mut encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
    encoder.write_all(&tar_data).unwrap();
    encoder.finish().unwrap()
}

/// Creates an in-memory xz-compressed tar archive.
#[must_use]
pub fn create_test_tar_xz(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    let tar_data = create_test_tar(entries);
    let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
    encoder.write_all(&tar_data).unwrap();
    encoder.finish().unwrap()
}

/// Creates an in-memory ZIP archive from (path, content) entries.
///
/// Files are stored uncompressed with mode 0o644.
#[must_use]
pub fn create_test_zip(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    use zip::write::SimpleFileOptions;
    use zip::write::ZipWriter;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored)
        .unix_permissions(0o644);

    for (path, data) in entries {
        writer.start_file(path, options).unwrap();
        writer.write_all(data).unwrap();
    }

    writer.finish().unwrap().into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_tar() {
        let data = create_test_tar(vec![("file.txt", b"hello")]);
        assert!(!data.is_empty());
    }

    #[test]
    fn test_create_test_tar_gz_has_gzip_magic() {
        let data = create_test_tar_gz(vec![("file.txt", b"hello")]);
        assert_eq!(&data[..2], &[0x1F, 0x8B]);
    }

    #[test]
    fn test_create_test_zip_has_zip_magic() {
        let data = create_test_zip(vec![("file.txt", b"hello")]);
        assert_eq!(&data[..2], b"PK");
    }
}
