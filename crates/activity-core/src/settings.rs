use clap::Parser;
use std::path::{Path, PathBuf};

use crate::error::{ActivityError, Result};

/// Default input log, read from the working directory.
pub const DEFAULT_INPUT_FILE: &str = "student_log.txt";

/// Default report destination, overwritten on every run.
pub const DEFAULT_OUTPUT_FILE: &str = "student_report.txt";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Student activity log analyzer
#[derive(Parser, Debug, Clone)]
#[command(
    name = "student-activity",
    about = "Summarise a pipe-delimited student activity log into a report",
    version
)]
pub struct Settings {
    /// Activity log to read (`id | name | activity | date | time` per line)
    #[arg(long, default_value = DEFAULT_INPUT_FILE)]
    pub input: PathBuf,

    /// Report file to write (overwritten)
    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Also write a JSON run summary to this path
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Do not print the report to stdout
    #[arg(long)]
    pub quiet: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path (logs go to stderr when unset)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list,
    /// enabling unit-testing without spawning subprocesses.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Reject combinations that would destroy data before it is read.
    ///
    /// The report sink is truncated before the input is consumed, and the log
    /// file is appended to throughout the run, so the input, report, summary
    /// and log paths must all differ.
    pub fn validate(&self) -> Result<()> {
        if same_path(&self.input, &self.output) {
            return Err(ActivityError::Config(format!(
                "input and output both point to {}",
                self.input.display()
            )));
        }
        if let Some(summary) = &self.summary {
            if same_path(summary, &self.input) || same_path(summary, &self.output) {
                return Err(ActivityError::Config(format!(
                    "summary path {} collides with the input or report path",
                    summary.display()
                )));
            }
        }
        if let Some(log_file) = &self.log_file {
            let taken = [Some(&self.input), Some(&self.output), self.summary.as_ref()];
            if taken.into_iter().flatten().any(|p| same_path(log_file, p)) {
                return Err(ActivityError::Config(format!(
                    "log file {} collides with the input, report or summary path",
                    log_file.display()
                )));
            }
        }
        Ok(())
    }
}

/// Compare two paths, resolving them on disk when both exist.
fn same_path(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["student-activity"]);

        assert_eq!(settings.input, PathBuf::from("student_log.txt"));
        assert_eq!(settings.output, PathBuf::from("student_report.txt"));
        assert!(settings.summary.is_none());
        assert!(!settings.quiet);
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
    }

    #[test]
    fn test_settings_cli_paths() {
        let settings = Settings::parse_from([
            "student-activity",
            "--input",
            "/data/log.txt",
            "--output",
            "/data/report.txt",
            "--summary",
            "/data/summary.json",
        ]);
        assert_eq!(settings.input, PathBuf::from("/data/log.txt"));
        assert_eq!(settings.output, PathBuf::from("/data/report.txt"));
        assert_eq!(settings.summary, Some(PathBuf::from("/data/summary.json")));
    }

    #[test]
    fn test_settings_rejects_unknown_log_level() {
        let result = Settings::try_parse_from(["student-activity", "--log-level", "TRACE"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_args_debug_overrides_log_level() {
        let settings =
            Settings::load_from_args(["student-activity", "--log-level", "ERROR", "--debug"]);
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_from_args_keeps_log_level_without_debug() {
        let settings = Settings::load_from_args(["student-activity", "--log-level", "WARNING"]);
        assert_eq!(settings.log_level, "WARNING");
    }

    // ── validate ──────────────────────────────────────────────────────────────

    #[test]
    fn test_validate_accepts_distinct_paths() {
        let settings = Settings::parse_from(["student-activity"]);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_same_input_and_output() {
        let settings = Settings::parse_from([
            "student-activity",
            "--input",
            "log.txt",
            "--output",
            "log.txt",
        ]);
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, ActivityError::Config(_)));
    }

    #[test]
    fn test_validate_resolves_equivalent_paths() {
        let tmp = TempDir::new().expect("tempdir");
        let log = tmp.path().join("log.txt");
        std::fs::write(&log, "").expect("write log");
        let aliased = tmp.path().join(".").join("log.txt");

        let settings = Settings {
            input: log,
            output: aliased,
            summary: None,
            quiet: false,
            log_level: "INFO".to_string(),
            log_file: None,
            debug: false,
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_summary_over_report() {
        let settings = Settings::parse_from([
            "student-activity",
            "--summary",
            "student_report.txt",
        ]);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_log_file_over_input() {
        let settings = Settings::parse_from([
            "student-activity",
            "--log-file",
            "student_log.txt",
        ]);
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("log file student_log.txt collides"));
    }

    #[test]
    fn test_validate_rejects_log_file_over_report() {
        let settings = Settings::parse_from([
            "student-activity",
            "--output",
            "out/report.txt",
            "--log-file",
            "out/report.txt",
        ]);
        assert!(matches!(
            settings.validate(),
            Err(ActivityError::Config(_))
        ));
    }

    #[test]
    fn test_validate_rejects_log_file_over_summary() {
        let settings = Settings::parse_from([
            "student-activity",
            "--summary",
            "run.json",
            "--log-file",
            "run.json",
        ]);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_separate_log_file() {
        let settings = Settings::parse_from(["student-activity", "--log-file", "run.log"]);
        assert!(settings.validate().is_ok());
    }
}
