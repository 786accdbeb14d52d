//! SMTP credential management
//!
//! The SMTP password is read from the SITEKIT_SMTP_PASSWORD environment
//! variable and is never written to the configuration file.

use std::env;

/// Get the SMTP password from environment variable
///
/// Returns the value of SITEKIT_SMTP_PASSWORD if set and non-empty, otherwise None.
pub fn get_smtp_password() -> Option<String> {
    env::var("SITEKIT_SMTP_PASSWORD").ok().filter(|k| !k.is_empty())
}

/// Check if an SMTP password is configured
pub fn has_smtp_password() -> bool {
    get_smtp_password().is_some()
}
