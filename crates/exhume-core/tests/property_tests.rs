//! Property tests for candidate ordering and collision-safe naming.

#![allow(clippy::unwrap_used)]

use std::fs;

use exhume_core::BatchConfig;
use exhume_core::harvest;
use exhume_core::passwords;
use proptest::prelude::*;
use tempfile::TempDir;

proptest! {
    /// The candidate list never contains duplicates, regardless of how the
    /// user overlaps default, backups and the fixed fallbacks.
    #[test]
    fn candidate_list_has_no_duplicates(
        default in "[a-z0-9]{0,8}",
        backups in prop::collection::vec("[a-z0-9]{0,8}", 0..6),
    ) {
        let config = BatchConfig {
            default_password: default,
            backup_passwords: backups,
            ..Default::default()
        };
        let candidates = passwords::candidate_list(&config);

        for (i, a) in candidates.iter().enumerate() {
            for b in &candidates[i + 1..] {
                prop_assert_ne!(a, b);
            }
        }
        // The no-password attempt is always present, exactly once.
        prop_assert_eq!(candidates.iter().filter(|c| c.is_empty()).count(), 1);
    }

    /// A non-empty default password is always the first candidate.
    #[test]
    fn default_password_tried_first(default in "[a-z0-9]{1,8}") {
        let config = BatchConfig {
            default_password: default.clone(),
            ..Default::default()
        };
        let candidates = passwords::candidate_list(&config);
        prop_assert_eq!(&candidates[0], &default);
    }

    /// Harvesting the same file name repeatedly yields distinct outputs,
    /// one per copy, and never overwrites.
    #[test]
    fn collision_naming_never_overwrites(copies in 1usize..6) {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("out");

        for round in 0..copies {
            let ws = temp.path().join(format!("ws{round}"));
            fs::create_dir_all(&ws).unwrap();
            fs::write(ws.join("clip.mp4"), round.to_le_bytes()).unwrap();
            harvest::harvest(&ws, &dest, "mp4").unwrap();
        }

        let produced = fs::read_dir(&dest).unwrap().count();
        prop_assert_eq!(produced, copies);

        // Each copy is byte-identical to its source round.
        prop_assert_eq!(
            fs::read(dest.join("clip.mp4")).unwrap(),
            0usize.to_le_bytes().to_vec()
        );
        if copies > 1 {
            prop_assert_eq!(
                fs::read(dest.join("clip_1.mp4")).unwrap(),
                1usize.to_le_bytes().to_vec()
            );
        }
    }
}
