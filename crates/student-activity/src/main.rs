mod bootstrap;

use std::io::Write;

use activity_core::settings::Settings;
use activity_data::analysis::{process_logs, RunSummary};
use activity_data::report::write_console;
use anyhow::{Context, Result};

fn main() -> Result<()> {
    let settings = Settings::load();

    start_logging(&settings)?;

    tracing::info!("Student Activity v{} starting", env!("CARGO_PKG_VERSION"));

    let stdout = std::io::stdout();
    let mut console = stdout.lock();
    run(&settings, &mut console)?;

    Ok(())
}

/// Check the paths, then install logging.
///
/// Validation runs first: a log file that aliases the input or the report
/// must be refused before anything is appended to it.
fn start_logging(settings: &Settings) -> Result<()> {
    settings.validate()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())
}

/// Execute one run: persist the report, echo it to `console` unless quiet,
/// then write the optional JSON summary.
fn run<W: Write>(settings: &Settings, console: &mut W) -> Result<RunSummary> {
    settings.validate()?;

    let outcome = process_logs(&settings.input, &settings.output).with_context(|| {
        format!(
            "failed to build the report from {}",
            settings.input.display()
        )
    })?;

    if !settings.quiet {
        write_console(console, &outcome.report)?;
    }

    if let Some(path) = &settings.summary {
        outcome
            .summary
            .save_to(path)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
        tracing::debug!("Summary written to {}", path.display());
    }

    Ok(outcome.summary)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
