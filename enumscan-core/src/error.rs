//! Typed error handling for enumscan.
//!
//! Every variant is fatal for a run: discovery, classification and report
//! assembly stop at the first error and no partial report is produced.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for enumscan operations.
#[derive(Error, Debug)]
pub enum EnumscanError {
    /// I/O error when reading directories or files, or writing the report
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Malformed package clause or Go syntax error
    #[error("Parse error in {path}{}: {message}", location_suffix(.line, .column))]
    Parse {
        path: PathBuf,
        message: String,
        /// Line number (1-indexed) if available
        line: Option<usize>,
        /// Column number (1-indexed) if available
        column: Option<usize>,
    },

    /// A candidate directory yields zero or several packages, or a redirect
    /// leaves the scanned root
    #[error("Discovery error at {path}: {message}")]
    Discovery { path: PathBuf, message: String },

    /// The package has no exported top-level declarations
    #[error("Package '{package}' in {path} does not contain any exports")]
    NoExports { package: String, path: PathBuf },

    /// A constant whose value matches none of the recognized shapes
    #[error("Unrecognized constant '{name}' at {path}:{line}:{column}: {reason}")]
    UnrecognizedConstant {
        name: String,
        path: PathBuf,
        line: usize,
        column: usize,
        reason: String,
    },

    /// Invalid argument provided (bad ignore pattern, empty marker name)
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn location_suffix(line: &Option<usize>, column: &Option<usize>) -> String {
    match (line, column) {
        (Some(l), Some(c)) => format!(":{}:{}", l, c),
        (Some(l), None) => format!(":{}", l),
        _ => String::new(),
    }
}

impl EnumscanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a parse error without location.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line: None,
            column: None,
        }
    }

    /// Create a parse error with line/column info.
    pub fn parse_at(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    /// Create a discovery error.
    pub fn discovery(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Discovery {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Parse { path, .. } => Some(path),
            Self::Discovery { path, .. } => Some(path),
            Self::NoExports { path, .. } => Some(path),
            Self::UnrecognizedConstant { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for enumscan results.
pub type EnumscanResult<T> = Result<T, EnumscanError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> EnumscanResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> EnumscanResult<T> {
        self.map_err(|e| EnumscanError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error() {
        let err = EnumscanError::io(
            PathBuf::from("/svc/compute/enums.go"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        assert!(matches!(err, EnumscanError::Io { .. }));
        assert_eq!(err.path(), Some(&PathBuf::from("/svc/compute/enums.go")));
        assert!(err.to_string().contains("/svc/compute/enums.go"));
    }

    #[test]
    fn test_parse_error_with_location() {
        let err = EnumscanError::parse_at("/svc/models.go", "unexpected token", 10, 5);
        if let EnumscanError::Parse { line, column, .. } = &err {
            assert_eq!(*line, Some(10));
            assert_eq!(*column, Some(5));
        } else {
            panic!("Expected Parse error");
        }
        assert!(err.to_string().contains("/svc/models.go:10:5"));
    }

    #[test]
    fn test_parse_error_without_location() {
        let err = EnumscanError::parse("/svc/models.go", "expected 'package'");
        assert_eq!(
            err.to_string(),
            "Parse error in /svc/models.go: expected 'package'"
        );
    }

    #[test]
    fn test_unrecognized_constant_message() {
        let err = EnumscanError::UnrecognizedConstant {
            name: "Second".to_string(),
            path: PathBuf::from("/svc/enums.go"),
            line: 7,
            column: 2,
            reason: "constant has no value".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'Second'"));
        assert!(msg.contains("/svc/enums.go:7:2"));
        assert!(msg.contains("constant has no value"));
    }

    #[test]
    fn test_path_absent_for_argument_errors() {
        assert!(EnumscanError::invalid_argument("bad pattern").path().is_none());
        assert!(EnumscanError::internal("oops").path().is_none());
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let mapped = result.with_path("/missing/dir");
        assert!(matches!(mapped, Err(EnumscanError::Io { .. })));
    }
}
