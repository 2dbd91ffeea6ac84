//! Exhume CLI - batch archive unpacking and video payload harvesting.

mod cli;
mod progress;
mod recovery;
mod summary;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use exhume_core::AutoDefer;
use exhume_core::BatchCoordinator;
use exhume_core::NoopProgress;
use exhume_core::ProgressSink;
use exhume_core::RecoveryHandler;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.to_config();
    let policy = cli.to_policy();
    let mut coordinator = BatchCoordinator::new(config, policy);

    let mut progress: Box<dyn ProgressSink> = if progress::CliProgress::should_show() && !cli.quiet
    {
        Box::new(progress::CliProgress::new())
    } else {
        Box::new(NoopProgress)
    };
    let mut handler: Box<dyn RecoveryHandler> = if cli.non_interactive {
        Box::new(AutoDefer)
    } else {
        Box::new(recovery::PromptRecovery::new())
    };

    let report = coordinator
        .process(&cli.sources, progress.as_mut(), handler.as_mut())
        .context("batch processing failed")?;
    drop(progress);

    if let Some(report_path) = &cli.report
        && coordinator.ledger().has_unresolved()
    {
        coordinator
            .ledger()
            .write_report(report_path)
            .with_context(|| format!("cannot write failure report to {}", report_path.display()))?;
        if !cli.quiet {
            println!("failure report written to {}", report_path.display());
        }
    }

    if !cli.quiet {
        summary::print_summary(&report);
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
