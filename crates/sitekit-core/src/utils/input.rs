//! Environment and platform inputs
//!
//! This module reads the `SITEKIT_*` environment variables that override
//! configuration values, and answers platform questions.

/// Environment variable configuration reader
pub struct EnvConfigReader;

impl EnvConfigReader {
    fn read_non_empty(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|s| !s.is_empty())
    }

    /// Read SITEKIT_SERVER_ADMIN environment variable
    pub fn read_server_admin() -> Option<String> {
        Self::read_non_empty("SITEKIT_SERVER_ADMIN")
    }

    /// Read SITEKIT_HTTP_HOST environment variable
    pub fn read_http_host() -> Option<String> {
        Self::read_non_empty("SITEKIT_HTTP_HOST")
    }

    /// Read SITEKIT_LOCALE environment variable
    pub fn read_locale() -> Option<String> {
        Self::read_non_empty("SITEKIT_LOCALE")
    }

    /// Read SITEKIT_HTTP_TIMEOUT environment variable (seconds)
    pub fn read_http_timeout() -> Option<u64> {
        std::env::var("SITEKIT_HTTP_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
    }
}

/// True when running on Windows
pub fn is_windows() -> bool {
    cfg!(windows)
}
