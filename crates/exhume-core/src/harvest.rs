//! Payload harvesting from extraction trees.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use tracing::info;
use tracing::warn;
use walkdir::WalkDir;

use crate::Result;

/// Walks an extraction tree and copies every payload file into `dest`.
///
/// Payloads are matched by extension, case-insensitively. Files are copied,
/// never moved; name collisions get `_1`, `_2`, … appended to the stem until
/// a free name is found, so nothing in `dest` is ever overwritten. A copy
/// failure for one file is logged and skipped; the harvest of the remaining
/// files continues.
///
/// Returns the destination paths of all copied payloads.
///
/// # Errors
///
/// Only the failure to create `dest` itself aborts the harvest.
pub fn harvest(root: &Path, dest: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dest)?;

    let mut copied = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("walk error during harvest: {err}");
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_payload(entry.path(), extension) {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        let target = collision_free_path(dest, &file_name);
        match fs::copy(entry.path(), &target) {
            Ok(_) => {
                info!("harvested {}", target.display());
                copied.push(target);
            }
            Err(err) => {
                warn!("cannot copy {}: {err}", entry.path().display());
            }
        }
    }
    Ok(copied)
}

fn is_payload(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// First non-existing path in `dir` for `file_name`, trying `name`,
/// `name_1`, `name_2`, …
fn collision_free_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (file_name, None),
    };

    let mut counter = 1usize;
    loop {
        let renamed = match ext {
            Some(ext) => format!("{stem}_{counter}.{ext}"),
            None => format!("{stem}_{counter}"),
        };
        let candidate = dir.join(renamed);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_harvest_collects_payloads_recursively() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("ws");
        fs::create_dir_all(root.join("deep/nested")).unwrap();
        fs::write(root.join("clip.mp4"), b"one").unwrap();
        fs::write(root.join("deep/nested/other.mp4"), b"two").unwrap();
        fs::write(root.join("deep/readme.txt"), b"not a payload").unwrap();

        let dest = temp.path().join("out");
        let copied = harvest(&root, &dest, "mp4").unwrap();

        assert_eq!(copied.len(), 2);
        assert!(dest.join("clip.mp4").exists());
        assert!(dest.join("other.mp4").exists());
        assert!(!dest.join("readme.txt").exists());
    }

    #[test]
    fn test_harvest_matches_extension_case_insensitively() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("ws");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("LOUD.MP4"), b"shouting").unwrap();

        let dest = temp.path().join("out");
        let copied = harvest(&root, &dest, "mp4").unwrap();
        assert_eq!(copied.len(), 1);
    }

    #[test]
    fn test_harvest_copies_never_moves() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("ws");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("clip.mp4"), b"content").unwrap();

        let dest = temp.path().join("out");
        harvest(&root, &dest, "mp4").unwrap();

        assert!(root.join("clip.mp4").exists());
        assert!(dest.join("clip.mp4").exists());
    }

    #[test]
    fn test_collision_safe_copy() {
        let temp = TempDir::new().unwrap();
        let ws_a = temp.path().join("a");
        let ws_b = temp.path().join("b");
        fs::create_dir_all(&ws_a).unwrap();
        fs::create_dir_all(&ws_b).unwrap();
        fs::write(ws_a.join("x.mp4"), b"first").unwrap();
        fs::write(ws_b.join("x.mp4"), b"second").unwrap();

        let dest = temp.path().join("out");
        harvest(&ws_a, &dest, "mp4").unwrap();
        harvest(&ws_b, &dest, "mp4").unwrap();

        // Two distinct files, each byte-identical to its source.
        assert_eq!(fs::read(dest.join("x.mp4")).unwrap(), b"first");
        assert_eq!(fs::read(dest.join("x_1.mp4")).unwrap(), b"second");
    }

    #[test]
    fn test_collision_free_path_increments() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("x.mp4"), b"0").unwrap();
        fs::write(temp.path().join("x_1.mp4"), b"1").unwrap();

        let free = collision_free_path(temp.path(), "x.mp4");
        assert_eq!(free, temp.path().join("x_2.mp4"));
    }

    #[test]
    fn test_collision_free_path_without_extension() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("payload"), b"0").unwrap();

        let free = collision_free_path(temp.path(), "payload");
        assert_eq!(free, temp.path().join("payload_1"));
    }

    #[test]
    fn test_harvest_empty_tree() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("ws");
        fs::create_dir_all(&root).unwrap();

        let dest = temp.path().join("out");
        let copied = harvest(&root, &dest, "mp4").unwrap();
        assert!(copied.is_empty());
        assert!(dest.exists());
    }
}
