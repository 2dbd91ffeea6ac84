//! Interactive recovery prompts on the terminal.

use console::Term;
use console::style;
use exhume_core::ExtractError;
use exhume_core::FailureRecord;
use exhume_core::RecoveryDecision;
use exhume_core::RecoveryHandler;

/// Terminal prompt implementing the operator recovery protocol.
///
/// Blocks the pipeline until the operator answers, which is the intended
/// contract: no other work proceeds while a decision is outstanding.
pub struct PromptRecovery {
    term: Term,
}

impl PromptRecovery {
    /// Creates a prompt bound to stderr.
    #[must_use]
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    fn ask(&self, record: &FailureRecord) -> std::io::Result<RecoveryDecision> {
        self.term.write_line(&format!(
            "\n{} {}",
            style("extraction failed:").red().bold(),
            record.file_name()
        ))?;
        self.term
            .write_line(&format!("  path:   {}", record.archive_path.display()))?;
        self.term
            .write_line(&format!("  reason: {}", record.reason))?;

        let options = if record.password_exhausted {
            "[p] retry with password  [d] defer  [s] skip permanently"
        } else {
            "[d] defer  [s] skip permanently"
        };

        loop {
            self.term.write_line(options)?;
            let answer = self.term.read_line()?;
            match answer.trim() {
                "p" if record.password_exhausted => {
                    self.term.write_str("password: ")?;
                    let password = self.term.read_secure_line()?;
                    return Ok(RecoveryDecision::RetryWithPassword(password));
                }
                "d" | "" => return Ok(RecoveryDecision::Defer),
                "s" => return Ok(RecoveryDecision::Discard),
                other => {
                    self.term
                        .write_line(&format!("unrecognized choice: {other}"))?;
                }
            }
        }
    }
}

impl Default for PromptRecovery {
    fn default() -> Self {
        Self::new()
    }
}

impl RecoveryHandler for PromptRecovery {
    fn decide(&mut self, record: &FailureRecord) -> RecoveryDecision {
        // An unusable terminal cannot decide anything: defer.
        self.ask(record).unwrap_or(RecoveryDecision::Defer)
    }

    fn on_retry_failed(&mut self, record: &FailureRecord, error: &ExtractError) {
        let _ = self.term.write_line(&format!(
            "{} {}: {error}",
            style("manual password also failed for").red(),
            record.file_name()
        ));
    }
}
