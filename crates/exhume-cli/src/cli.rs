//! CLI argument parsing using clap.

use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;

use exhume_core::BatchConfig;
use exhume_core::OutputPolicy;

/// Argument surface for a batch run.
#[derive(Parser)]
#[command(name = "exhume")]
#[command(author, version)]
#[command(about = "Batch-unpack nested archives and harvest video payloads")]
pub struct Cli {
    /// Source archive files to process
    #[arg(value_name = "ARCHIVE", required = true)]
    pub sources: Vec<PathBuf>,

    /// Directory receiving harvested payload files
    #[arg(short, long, value_name = "DIR")]
    pub output: PathBuf,

    /// Give each source archive its own subdirectory under the output dir
    #[arg(long)]
    pub per_source: bool,

    /// Password tried first against password-protected archives
    #[arg(short = 'p', long, value_name = "PASSWORD", default_value = "")]
    pub password: String,

    /// Comma-separated backup passwords tried after the default
    #[arg(long, value_name = "LIST", default_value = "")]
    pub backup_passwords: String,

    /// Payload file extension to harvest (case-insensitive)
    #[arg(long, value_name = "EXT", default_value = "mp4")]
    pub payload_extension: String,

    /// Keep workspaces and intermediate archives on disk
    #[arg(long)]
    pub keep_intermediate: bool,

    /// Do not unpack archives nested inside the extracted tree
    #[arg(long)]
    pub no_recursive: bool,

    /// Disable alias- and signature-based name correction
    #[arg(long)]
    pub no_smart_detection: bool,

    /// Never prompt for failed archives; defer them all
    #[arg(long)]
    pub non_interactive: bool,

    /// Write a failure report to this file when failures remain
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Maps the argument surface onto the core configuration.
    pub fn to_config(&self) -> BatchConfig {
        BatchConfig {
            default_password: self.password.clone(),
            backup_passwords: BatchConfig::parse_backup_passwords(&self.backup_passwords),
            payload_extension: self.payload_extension.clone(),
            auto_cleanup: !self.keep_intermediate,
            recursive_extract: !self.no_recursive,
            smart_format_detection: !self.no_smart_detection,
            interactive_recovery: !self.non_interactive,
        }
    }

    /// Builds the output policy from the mode flag.
    pub fn to_policy(&self) -> OutputPolicy {
        if self.per_source {
            OutputPolicy::PerSource {
                dir: self.output.clone(),
                overrides: HashMap::new(),
            }
        } else {
            OutputPolicy::Unified {
                dir: self.output.clone(),
            }
        }
    }
}
