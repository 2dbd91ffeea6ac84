//! Batch processing configuration.

/// Configuration for a batch run.
///
/// Collected once from the front-end and passed by reference into every
/// pipeline stage; no stage mutates it.
///
/// # Examples
///
/// ```
/// use exhume_core::BatchConfig;
///
/// let config = BatchConfig {
///     default_password: "hunter2".to_string(),
///     backup_passwords: BatchConfig::parse_backup_passwords("alpha, beta,alpha"),
///     ..Default::default()
/// };
/// assert_eq!(config.backup_passwords, vec!["alpha", "beta", "alpha"]);
/// ```
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Password tried first against password-capable archives.
    pub default_password: String,

    /// User-supplied backup passwords, tried after the default in order.
    pub backup_passwords: Vec<String>,

    /// Payload file extension to harvest, matched case-insensitively.
    pub payload_extension: String,

    /// Delete workspaces and intermediate archives when a job finishes.
    pub auto_cleanup: bool,

    /// Unpack archives discovered inside an extracted tree.
    pub recursive_extract: bool,

    /// Correct misnamed archives by alias suffix and magic bytes before
    /// discovery.
    pub smart_format_detection: bool,

    /// Run the operator recovery protocol over unresolved failures at the
    /// end of the batch.
    pub interactive_recovery: bool,
}

impl Default for BatchConfig {
    /// Creates a configuration with every processing feature enabled, no
    /// passwords configured, and `mp4` as the payload extension.
    fn default() -> Self {
        Self {
            default_password: String::new(),
            backup_passwords: Vec::new(),
            payload_extension: "mp4".to_string(),
            auto_cleanup: true,
            recursive_extract: true,
            smart_format_detection: true,
            interactive_recovery: true,
        }
    }
}

impl BatchConfig {
    /// Splits a comma-separated backup-password string into entries.
    ///
    /// Whitespace around entries is trimmed and empty entries dropped.
    /// Duplicates are kept here; the candidate list deduplicates while
    /// preserving first-seen order.
    #[must_use]
    pub fn parse_backup_passwords(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(ToString::to_string)
            .collect()
    }
}
