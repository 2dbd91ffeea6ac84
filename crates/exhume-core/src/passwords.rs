//! Password candidate assembly for password-capable archives.

use crate::BatchConfig;

/// Fixed fallback passwords tried after every user-supplied candidate.
///
/// The empty string is the no-password attempt. Order is part of the
/// engine's observable behaviour and must stay stable.
const COMMON_FALLBACKS: &[&str] = &["", "123456", "password", "admin", "123", "000000"];

/// Builds the ordered, deduplicated candidate list for one extraction task.
///
/// Order: user default password (if set), user backup passwords in input
/// order, then the fixed fallback set including the empty password. A
/// password that appears in more than one tier is tried only at its first
/// position, so no candidate is attempted twice for the same task.
#[must_use]
pub fn candidate_list(config: &BatchConfig) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();

    let default = config.default_password.trim();
    if !default.is_empty() {
        candidates.push(default.to_string());
    }

    for backup in &config.backup_passwords {
        let backup = backup.trim();
        if !backup.is_empty() && !candidates.iter().any(|c| c == backup) {
            candidates.push(backup.to_string());
        }
    }

    for fallback in COMMON_FALLBACKS {
        if !candidates.iter().any(|c| c == fallback) {
            candidates.push((*fallback).to_string());
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_order() {
        let config = BatchConfig {
            default_password: "secret".to_string(),
            backup_passwords: vec!["alpha".to_string(), "beta".to_string()],
            ..Default::default()
        };
        let candidates = candidate_list(&config);
        assert_eq!(
            candidates,
            vec!["secret", "alpha", "beta", "", "123456", "password", "admin", "123", "000000"]
        );
    }

    #[test]
    fn test_no_candidate_tried_twice() {
        let config = BatchConfig {
            default_password: "password".to_string(),
            backup_passwords: vec!["password".to_string(), "123456".to_string()],
            ..Default::default()
        };
        let candidates = candidate_list(&config);
        // "password" keeps its first position, "123456" its backup position.
        assert_eq!(
            candidates,
            vec!["password", "123456", "", "admin", "123", "000000"]
        );
    }

    #[test]
    fn test_empty_config_yields_only_fallbacks() {
        let candidates = candidate_list(&BatchConfig::default());
        assert_eq!(candidates, COMMON_FALLBACKS);
    }

    #[test]
    fn test_whitespace_passwords_ignored() {
        let config = BatchConfig {
            default_password: "   ".to_string(),
            backup_passwords: vec![" ".to_string(), "real".to_string()],
            ..Default::default()
        };
        let candidates = candidate_list(&config);
        assert_eq!(candidates[0], "real");
        // The no-password attempt comes from the fallback tier, not from
        // blank user input.
        assert_eq!(candidates.iter().filter(|c| c.is_empty()).count(), 1);
    }

    #[test]
    fn test_deterministic_for_same_config() {
        let config = BatchConfig {
            default_password: "x".to_string(),
            backup_passwords: vec!["y".to_string()],
            ..Default::default()
        };
        assert_eq!(candidate_list(&config), candidate_list(&config));
    }
}
