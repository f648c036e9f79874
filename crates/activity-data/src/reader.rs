//! Line parsing and file loading for student activity logs.
//!
//! Each line has the shape `student_id | name | activity | date | time`.
//! Malformed lines are rejected with a reason, logged, and skipped; they never
//! stop the stream. Only I/O failures end a read early.
//!
//! Line breaks may be `\n`, `\r\n` or a lone `\r`.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use activity_core::error::{ActivityError, Result};
use activity_core::models::{is_valid_student_id, ActivityRecord, ActivityType};
use thiserror::Error;
use tracing::{debug, warn};

/// Number of `|`-separated fields on a well-formed line.
pub const FIELD_COUNT: usize = 5;

// ── Parse results ─────────────────────────────────────────────────────────────

/// Why a line was not turned into a record.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    #[error("Incorrect number of fields")]
    FieldCount { found: usize },
    #[error("Invalid student ID")]
    StudentId,
    #[error("Invalid activity type")]
    ActivityType,
}

/// The result of parsing one raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Valid(ActivityRecord),
    Rejected(RejectReason),
}

/// A parse outcome tagged with its 1-based position in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub line_number: usize,
    pub outcome: ParseOutcome,
}

/// Parse one raw line into a record, or explain why it was rejected.
///
/// Checks run in a fixed order (field count, then id, then activity) and the
/// first failure wins.
pub fn parse_line(line: &str) -> ParseOutcome {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();

    let [student_id, name, activity, date, time] = fields.as_slice() else {
        return ParseOutcome::Rejected(RejectReason::FieldCount {
            found: fields.len(),
        });
    };

    if !is_valid_student_id(student_id) {
        return ParseOutcome::Rejected(RejectReason::StudentId);
    }

    let Ok(activity) = activity.parse::<ActivityType>() else {
        return ParseOutcome::Rejected(RejectReason::ActivityType);
    };

    ParseOutcome::Valid(ActivityRecord {
        student_id: (*student_id).to_string(),
        student_name: (*name).to_string(),
        activity,
        date: (*date).to_string(),
        time: (*time).to_string(),
    })
}

// ── LogLines ──────────────────────────────────────────────────────────────────

/// Pull-based iterator producing one [`ParsedLine`] per source line.
///
/// Lazy, finite and not restartable: it owns the reader and consumes it.
/// After the first I/O error it yields that error once and then ends.
pub struct LogLines<R> {
    reader: R,
    pending: VecDeque<String>,
    line_number: usize,
    failed: bool,
}

impl<R: BufRead> LogLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
            line_number: 0,
            failed: false,
        }
    }

    /// Number of lines pulled so far, including rejected ones.
    pub fn lines_read(&self) -> usize {
        self.line_number
    }

    /// Read up to the next `\n` and queue the lines it contains.
    ///
    /// Returns `false` at end of input.
    fn fill(&mut self) -> std::io::Result<bool> {
        let mut chunk = Vec::new();
        if self.reader.read_until(b'\n', &mut chunk)? == 0 {
            return Ok(false);
        }
        if chunk.last() == Some(&b'\n') {
            chunk.pop();
        }

        let text = String::from_utf8(chunk)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        if text.is_empty() {
            self.pending.push_back(text);
        } else {
            // A trailing `\r` closes the last line rather than opening a new one.
            self.pending
                .extend(text.split_terminator('\r').map(str::to_string));
        }
        Ok(true)
    }
}

impl<R: BufRead> Iterator for LogLines<R> {
    type Item = Result<ParsedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            if let Some(text) = self.pending.pop_front() {
                self.line_number += 1;
                return Some(Ok(ParsedLine {
                    line_number: self.line_number,
                    outcome: parse_line(&text),
                }));
            }

            match self.fill() {
                Ok(true) => continue,
                Ok(false) => return None,
                Err(source) => {
                    self.failed = true;
                    self.line_number += 1;
                    return Some(Err(ActivityError::LineRead {
                        line: self.line_number,
                        source,
                    }));
                }
            }
        }
    }
}

// ── LogRecords ────────────────────────────────────────────────────────────────

/// Iterator over the accepted records of a log.
///
/// Rejected lines are reported through `tracing` and counted, then skipped.
pub struct LogRecords<R> {
    inner: LogLines<R>,
    rejected: usize,
}

impl<R: BufRead> LogRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: LogLines::new(reader),
            rejected: 0,
        }
    }

    pub fn lines_read(&self) -> usize {
        self.inner.lines_read()
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }
}

impl<R: BufRead> Iterator for LogRecords<R> {
    type Item = Result<ActivityRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let parsed = match self.inner.next()? {
                Ok(parsed) => parsed,
                Err(e) => return Some(Err(e)),
            };

            match parsed.outcome {
                ParseOutcome::Valid(record) => return Some(Ok(record)),
                ParseOutcome::Rejected(reason) => {
                    self.rejected += 1;
                    warn!("Skipping invalid line {}: {}", parsed.line_number, reason);
                }
            }
        }
    }
}

/// Open `path` and return a record iterator over its lines.
///
/// The file handle lives inside the iterator and is closed when it is dropped,
/// whether the stream was exhausted or abandoned on an error.
pub fn open_log(path: &Path) -> Result<LogRecords<BufReader<File>>> {
    let file = File::open(path).map_err(|source| ActivityError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Reading activity log from {}", path.display());
    Ok(LogRecords::new(BufReader::new(file)))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
