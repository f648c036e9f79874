//! Run driver for the student activity pipeline.
//!
//! Opens the input and the report sink, streams accepted records through the
//! [`ActivityAggregator`], then renders and persists the [`ActivityReport`].

use std::io::BufRead;
use std::path::Path;

use activity_core::error::{ActivityError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aggregator::ActivityAggregator;
use crate::reader::{open_log, LogRecords};
use crate::report::{ActivityReport, ReportFile};

// ── Public types ──────────────────────────────────────────────────────────────

/// Counters describing one run, independent of the text report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// RFC 3339 timestamp when this summary was produced.
    pub generated_at: String,
    /// Where the records were read from.
    pub source: String,
    /// Every line pulled from the source, accepted or not.
    pub lines_read: usize,
    pub records_accepted: usize,
    pub lines_rejected: usize,
    pub students: usize,
    pub dates: usize,
    /// Students listed in the abnormal behaviour section.
    pub flagged_students: usize,
}

impl RunSummary {
    fn collect<R: BufRead>(
        source: &str,
        records: &LogRecords<R>,
        aggregator: &ActivityAggregator,
        report: &ActivityReport,
    ) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            source: source.to_string(),
            lines_read: records.lines_read(),
            records_accepted: aggregator.records_applied(),
            lines_rejected: records.rejected(),
            students: aggregator.store().len(),
            dates: aggregator.daily().len(),
            flagged_students: report.flagged(),
        }
    }

    /// Write the summary as pretty JSON, replacing any existing file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        // Write to a temp file then rename so readers never see a partial file.
        let tmp = path.with_extension("json.tmp");
        let to_error = |source: std::io::Error| ActivityError::FileWrite {
            path: path.to_path_buf(),
            source,
        };
        std::fs::write(&tmp, &json).map_err(to_error)?;
        if let Err(source) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(to_error(source));
        }
        Ok(())
    }
}

/// Everything a caller needs after a successful run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: ActivityReport,
    pub summary: RunSummary,
    pub aggregator: ActivityAggregator,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Aggregate an in-memory or already-open line source and build the report.
///
/// Nothing is written anywhere; use [`process_logs`] for the file-backed run.
pub fn analyze_reader<R: BufRead>(source: &str, reader: R) -> Result<RunOutcome> {
    let mut records = LogRecords::new(reader);
    let mut aggregator = ActivityAggregator::new();
    aggregator.consume(records.by_ref())?;

    let report = ActivityReport::from_aggregator(&aggregator);
    let summary = RunSummary::collect(source, &records, &aggregator, &report);
    Ok(RunOutcome {
        report,
        summary,
        aggregator,
    })
}

/// Run the full pipeline from `input` to the persisted report at `output`.
///
/// 1. Open the input log; a missing or unreadable file fails immediately.
/// 2. Create the report file; an unwritable destination also fails before
///    any record is aggregated.
/// 3. Stream every line once, skipping rejected ones.
/// 4. Render the report and write it to `output`.
///
/// The console copy is left to the caller so it is only shown once the
/// persisted copy exists.
pub fn process_logs(input: &Path, output: &Path) -> Result<RunOutcome> {
    let mut records = open_log(input)?;
    let report_file = ReportFile::create(output)?;
    debug!("Report sink ready at {}", report_file.path().display());

    let mut aggregator = ActivityAggregator::new();
    aggregator.consume(records.by_ref())?;

    let report = ActivityReport::from_aggregator(&aggregator);
    report_file.write(&report)?;

    let summary = RunSummary::collect(
        &input.display().to_string(),
        &records,
        &aggregator,
        &report,
    );
    info!(
        "Processed {} lines: {} accepted, {} rejected, {} students over {} dates, {} flagged",
        summary.lines_read,
        summary.records_accepted,
        summary.lines_rejected,
        summary.students,
        summary.dates,
        summary.flagged_students
    );

    Ok(RunOutcome {
        report,
        summary,
        aggregator,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
