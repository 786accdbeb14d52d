use crate::error::{FetchError, MailError, StorageError};
use std::io;
use std::path::Path;

/// Helper functions for standardizing error conversions across the codebase.
/// Convert reqwest errors to FetchError with URL context
pub fn convert_request_error(error: reqwest::Error, url: &str, timeout_secs: u64) -> FetchError {
    if error.is_timeout() {
        return convert_timeout_error(url, timeout_secs);
    }
    FetchError::Http {
        status: error.status().map(|s| s.as_u16()).unwrap_or(0),
        url: url.to_string(),
        message: error.to_string(),
    }
}

/// Convert timeout errors to FetchError with URL context
pub fn convert_timeout_error(url: &str, timeout_secs: u64) -> FetchError {
    FetchError::Timeout {
        timeout_secs,
        url: url.to_string(),
    }
}

/// Convert IO errors to StorageError with path context
pub fn convert_io_to_storage_error(error: io::Error, path: &Path) -> StorageError {
    StorageError::FileIo {
        path: path.to_string_lossy().to_string(),
        source: error,
    }
}

/// Convert any transport failure to MailError for the named backend
pub fn convert_transport_error<E: std::fmt::Display>(error: E, backend: &str) -> MailError {
    MailError::Transport {
        backend: backend.to_string(),
        message: error.to_string(),
    }
}

/// Helper macro for standardizing map_err patterns on HTTP requests
#[macro_export]
macro_rules! map_fetch_error {
    ($result:expr, $url:expr, $timeout_secs:expr) => {
        $result.map_err(|e| {
            $crate::utils::error_helpers::convert_request_error(e, $url, $timeout_secs)
        })
    };
}

/// Helper macro for mail transport errors
#[macro_export]
macro_rules! map_transport_error {
    ($result:expr, $backend:expr) => {
        $result.map_err(|e| $crate::utils::error_helpers::convert_transport_error(e, $backend))
    };
}
