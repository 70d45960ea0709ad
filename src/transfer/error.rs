//! Error types for transfers after hand-off.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while a sink consumes a transfer.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The body stream failed mid-transfer.
    #[error("network error receiving {url}: {source}")]
    Network {
        /// Address the body was read from (query removed).
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The body stream ended with a non-network failure.
    #[error("transfer of {url} interrupted: {reason}")]
    Interrupted {
        /// Address or label of the transfer.
        url: String,
        /// Why the stream stopped.
        reason: String,
    },

    /// File system error while writing the transfer.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Fewer or more bytes arrived than the server announced.
    #[error("incomplete transfer to {path}: expected {expected_bytes} bytes, got {actual_bytes}")]
    Incomplete {
        /// Path the transfer was written to (removed afterwards).
        path: PathBuf,
        /// Announced size in bytes.
        expected_bytes: u64,
        /// Received size in bytes.
        actual_bytes: u64,
    },

    /// The background task writing the transfer panicked or was cancelled.
    #[error("transfer task failed: {reason}")]
    Task {
        /// Join failure description.
        reason: String,
    },
}

impl TransferError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an interrupted-stream error.
    pub fn interrupted(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Interrupted {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a size mismatch error.
    pub fn incomplete(path: impl Into<PathBuf>, expected_bytes: u64, actual_bytes: u64) -> Self {
        Self::Incomplete {
            path: path.into(),
            expected_bytes,
            actual_bytes,
        }
    }

    /// Creates a task failure error.
    pub fn task(reason: impl Into<String>) -> Self {
        Self::Task {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_error_io_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error = TransferError::io(PathBuf::from("/tmp/report.pdf"), io_error);
        let msg = error.to_string();
        assert!(msg.contains("/tmp/report.pdf"), "Expected path in: {msg}");
    }

    #[test]
    fn test_transfer_error_incomplete_display() {
        let error = TransferError::incomplete("/tmp/report.pdf", 2048, 1024);
        let msg = error.to_string();
        assert!(msg.contains("2048"), "Expected expected size in: {msg}");
        assert!(msg.contains("1024"), "Expected actual size in: {msg}");
    }

    #[test]
    fn test_transfer_error_interrupted_display() {
        let error = TransferError::interrupted("abc123", "connection reset");
        let msg = error.to_string();
        assert!(msg.contains("abc123"));
        assert!(msg.contains("connection reset"));
    }
}
