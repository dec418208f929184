//! Centralized error handling for sweeper.
//!
//! Every failure the pipeline can produce is a variant of [`SweeperError`].
//! Errors are always scoped to a single file and a single action: the
//! orchestrator records them as notices and keeps processing the rest of
//! the batch.
//!
//! ```
//! use sweeper::error::SweeperError;
//!
//! fn describe(err: &SweeperError) -> &'static str {
//!     match err {
//!         SweeperError::UnsupportedFormat { .. } => "pick a .csv or .xlsx file",
//!         SweeperError::Parse(_) => "the file could not be read",
//!         SweeperError::ColumnNotFound(_) => "check the column selection",
//!         _ => "something else went wrong",
//!     }
//! }
//! ```
//!
//! The [`ResultExt`] trait adds `.context()` to any `Result` whose error
//! converts into [`SweeperError`]:
//!
//! ```no_run
//! use sweeper::error::ResultExt as _;
//!
//! fn read(path: &str) -> sweeper::error::Result<Vec<u8>> {
//!     std::fs::read(path).context("Failed to read upload")
//! }
//! ```
//!
//! Note that a table without numeric columns is not an error: the chart
//! adapter reports it as [`crate::logic::Visualization::NoNumericData`].

use std::fmt;

/// Main error type for sweeper operations.
#[derive(Debug)]
pub enum SweeperError {
    /// The file extension is neither `.csv` nor `.xlsx`.
    UnsupportedFormat { extension: String },

    /// Malformed input bytes (unparseable CSV, corrupt workbook)
    Parse(String),

    /// A requested column is absent from the table
    ColumnNotFound(String),

    /// A column was requested more than once in a selection
    DuplicateColumn(String),

    /// The table cannot be written in the target format
    Serialization(String),

    /// No file with this handle exists in the session
    UnknownFile(String),

    /// I/O errors (reading uploads, writing converted files)
    Io(std::io::Error),

    /// Settings file errors
    Config(String),
}

impl fmt::Display for SweeperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat { extension } => {
                let shown = if extension.is_empty() {
                    "(none)"
                } else {
                    extension.as_str()
                };
                write!(
                    f,
                    "Unsupported file type. Please upload a CSV or Excel file: {shown}"
                )
            }
            Self::Parse(msg) => write!(f, "Parse error: {msg}"),
            Self::ColumnNotFound(name) => write!(f, "Column not found: {name}"),
            Self::DuplicateColumn(name) => write!(f, "Column selected more than once: {name}"),
            Self::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            Self::UnknownFile(id) => write!(f, "Unknown file: {id}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for SweeperError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl Clone for SweeperError {
    fn clone(&self) -> Self {
        match self {
            Self::UnsupportedFormat { extension } => Self::UnsupportedFormat {
                extension: extension.clone(),
            },
            Self::Parse(msg) => Self::Parse(msg.clone()),
            Self::ColumnNotFound(name) => Self::ColumnNotFound(name.clone()),
            Self::DuplicateColumn(name) => Self::DuplicateColumn(name.clone()),
            Self::Serialization(msg) => Self::Serialization(msg.clone()),
            Self::UnknownFile(id) => Self::UnknownFile(id.clone()),
            Self::Io(e) => Self::Io(std::io::Error::new(e.kind(), e.to_string())),
            Self::Config(msg) => Self::Config(msg.clone()),
        }
    }
}

impl From<std::io::Error> for SweeperError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SweeperError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

// Polars failures surface while decoding input far more often than anywhere
// else; the encoder maps its own failures to `Serialization` explicitly.
impl From<polars::error::PolarsError> for SweeperError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<calamine::XlsxError> for SweeperError {
    fn from(err: calamine::XlsxError) -> Self {
        Self::Parse(format!("invalid workbook: {err}"))
    }
}

impl From<rust_xlsxwriter::XlsxError> for SweeperError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<SweeperError> for String {
    fn from(err: SweeperError) -> Self {
        err.to_string()
    }
}

/// Result type alias for sweeper operations.
pub type Result<T> = std::result::Result<T, SweeperError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error, keeping its category.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<SweeperError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| prefix(e.into(), &msg.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| prefix(e.into(), &f()))
    }
}

fn prefix(err: SweeperError, ctx: &str) -> SweeperError {
    match err {
        SweeperError::Parse(msg) => SweeperError::Parse(format!("{ctx}: {msg}")),
        SweeperError::Serialization(msg) => SweeperError::Serialization(format!("{ctx}: {msg}")),
        SweeperError::Config(msg) => SweeperError::Config(format!("{ctx}: {msg}")),
        SweeperError::Io(e) => SweeperError::Io(std::io::Error::new(e.kind(), format!("{ctx}: {e}"))),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_names_extension() {
        let err = SweeperError::UnsupportedFormat {
            extension: ".txt".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported file type. Please upload a CSV or Excel file: .txt"
        );
    }

    #[test]
    fn test_unsupported_format_without_extension() {
        let err = SweeperError::UnsupportedFormat {
            extension: String::new(),
        };
        assert!(err.to_string().ends_with("(none)"));
    }

    #[test]
    fn test_error_conversion_to_string() {
        let err = SweeperError::ColumnNotFound("age".to_owned());
        let s: String = err.into();
        assert_eq!(s, "Column not found: age");
    }

    #[test]
    fn test_result_context_keeps_category() {
        let result: std::result::Result<(), SweeperError> =
            Err(SweeperError::Parse("bad row".to_owned()));

        let result = result.context("Failed to read a.csv");
        match result {
            Err(SweeperError::Parse(msg)) => {
                assert_eq!(msg, "Failed to read a.csv: bad row");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_io_context() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file.csv",
        ));

        let err = result
            .with_context(|| "Failed to read upload".to_owned())
            .unwrap_err();
        assert!(matches!(err, SweeperError::Io(_)));
        assert!(err.to_string().contains("Failed to read upload"));
    }

    #[test]
    fn test_clone_preserves_message() {
        let err = SweeperError::Serialization("column 'tags' is a list".to_owned());
        assert_eq!(err.clone().to_string(), err.to_string());
    }
}
