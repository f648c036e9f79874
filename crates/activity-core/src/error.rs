use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the student activity pipeline.
///
/// Malformed input lines are not errors: they are reported as rejections by
/// the reader and skipped. Everything here is fatal to a run.
#[derive(Error, Debug)]
pub enum ActivityError {
    /// The input log could not be opened.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output sink could not be created or written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading a specific line from the input failed (including non-UTF-8 content).
    #[error("Failed to read line {line}: {source}")]
    LineRead {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    /// The run summary could not be serialised.
    #[error("Failed to serialize JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the activity crates.
pub type Result<T> = std::result::Result<T, ActivityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = ActivityError::FileRead {
            path: PathBuf::from("/some/student_log.txt"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/some/student_log.txt"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_file_write() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ActivityError::FileWrite {
            path: PathBuf::from("/readonly/report.txt"),
            source: io_err,
        };
        assert_eq!(
            err.to_string(),
            "Failed to write file /readonly/report.txt: denied"
        );
    }

    #[test]
    fn test_error_display_line_read() {
        let io_err = std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "stream did not contain valid UTF-8",
        );
        let err = ActivityError::LineRead {
            line: 7,
            source: io_err,
        };
        assert!(err.to_string().starts_with("Failed to read line 7:"));
    }

    #[test]
    fn test_error_display_config() {
        let err = ActivityError::Config("input and output are the same file".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: input and output are the same file"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ActivityError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_source_is_preserved() {
        use std::error::Error as _;

        let err = ActivityError::FileRead {
            path: PathBuf::from("missing.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.source().is_some());
    }
}
