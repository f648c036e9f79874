//! Text report rendering and output sinks.
//!
//! The report has a fixed layout: header, one row per student, the abnormal
//! behaviour section, then one row per date. Rows follow first-seen order so
//! the same input always produces the same bytes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use activity_core::error::{ActivityError, Result};
use tracing::debug;

use crate::aggregator::{ActivityAggregator, AnomalyCounters, DailyStatsTable};
use crate::store::ActivityStore;

pub const REPORT_HEADER: &str = "STUDENT ACTIVITY REPORT";
pub const ANOMALY_HEADER: &str = "ABNORMAL BEHAVIOR (Multiple logins without logout):";
pub const DAILY_HEADER: &str = "DAILY ACTIVITY STATISTICS:";

/// A student is flagged only when its open-login count is above this value.
pub const ANOMALY_THRESHOLD: u64 = 1;

// ── ActivityReport ────────────────────────────────────────────────────────────

/// The rendered report as an ordered list of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityReport {
    lines: Vec<String>,
    flagged: usize,
}

impl ActivityReport {
    /// Build the report from the final state of a run.
    pub fn from_aggregator(aggregator: &ActivityAggregator) -> Self {
        build_report(
            aggregator.store(),
            aggregator.daily(),
            aggregator.anomalies(),
        )
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of students listed in the abnormal behaviour section.
    pub fn flagged(&self) -> usize {
        self.flagged
    }

    /// Lines joined with `\n`, without a trailing newline.
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

/// Assemble the report lines. Section headers are preceded by a blank line.
pub fn build_report(
    store: &ActivityStore,
    daily: &DailyStatsTable,
    anomalies: &AnomalyCounters,
) -> ActivityReport {
    let mut lines = vec![REPORT_HEADER.to_string(), String::new()];

    for student in store.iter() {
        let summary = student.activity_summary();
        lines.push(format!(
            "{} | {} | Logins: {} | Submissions: {}",
            student.student_id, student.name, summary.logins, summary.submissions
        ));
    }

    lines.push(String::new());
    lines.push(ANOMALY_HEADER.to_string());
    let mut flagged = 0;
    for (student_id, count) in anomalies.above(ANOMALY_THRESHOLD) {
        lines.push(format!("{student_id} has {count} active logins"));
        flagged += 1;
    }

    lines.push(String::new());
    lines.push(DAILY_HEADER.to_string());
    for (date, stats) in daily.iter() {
        lines.push(format!(
            "{} -> Logins: {}, Submissions: {}",
            date, stats.login_count, stats.submit_count
        ));
    }

    ActivityReport { lines, flagged }
}

// ── Sinks ─────────────────────────────────────────────────────────────────────

/// The persisted copy of the report.
///
/// Created (and truncated) up front so an unwritable destination fails the
/// run before any input is processed.
#[derive(Debug)]
pub struct ReportFile {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl ReportFile {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|source| ActivityError::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the rendered report exactly, flush, and close the file.
    pub fn write(mut self, report: &ActivityReport) -> Result<()> {
        let rendered = report.render();
        self.writer
            .write_all(rendered.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(|source| ActivityError::FileWrite {
                path: self.path.clone(),
                source,
            })?;
        debug!("Report written to {}", self.path.display());
        Ok(())
    }
}

/// Write the console copy: the rendered report followed by one newline.
pub fn write_console<W: Write>(out: &mut W, report: &ActivityReport) -> Result<()> {
    writeln!(out, "{}", report.render())?;
    out.flush()?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
