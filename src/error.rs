//! Record store error types

use std::path::PathBuf;
use thiserror::Error;

/// Structural failure reading the record file. Row-level problems are not errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record file at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_names_path() {
        let error = StoreError::Read {
            path: PathBuf::from("/tmp/records.csv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied"),
        };
        let display = error.to_string();
        assert!(display.contains("/tmp/records.csv"));
        assert!(display.contains("access denied"));
    }

    #[test]
    fn malformed_error_display() {
        let error = StoreError::Malformed {
            line: 4,
            reason: "unterminated quoted field".into(),
        };
        assert_eq!(
            error.to_string(),
            "malformed record file at line 4: unterminated quoted field"
        );
    }
}
