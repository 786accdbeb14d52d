//! Configuration service for the `config` subcommands

use crate::AppError;
use crate::storage::config::Config;
use crate::storage::credentials::has_smtp_password;
use std::path::PathBuf;

/// One displayable configuration entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub key: &'static str,
    pub value: Option<String>,
}

pub struct ConfigService {
    config: Config,
}

impl ConfigService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Effective values, environment fallbacks applied
    pub fn entries(&self) -> Vec<ConfigEntry> {
        let c = &self.config;
        let path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());
        vec![
            ConfigEntry {
                key: "site.server_admin",
                value: c.get_server_admin(),
            },
            ConfigEntry {
                key: "site.http_host",
                value: c.get_http_host(),
            },
            ConfigEntry {
                key: "site.locale",
                value: c.get_locale(),
            },
            ConfigEntry {
                key: "site.locale_dir",
                value: path(&c.site.locale_dir),
            },
            ConfigEntry {
                key: "mail.backend",
                value: Some(c.mail.backend.to_string()),
            },
            ConfigEntry {
                key: "mail.smtp_host",
                value: c.mail.smtp_host.clone(),
            },
            ConfigEntry {
                key: "mail.smtp_port",
                value: c.mail.smtp_port.map(|p| p.to_string()),
            },
            ConfigEntry {
                key: "mail.smtp_username",
                value: c.mail.smtp_username.clone(),
            },
            ConfigEntry {
                key: "mail.smtp_password",
                value: has_smtp_password().then(|| "(set via SITEKIT_SMTP_PASSWORD)".to_string()),
            },
            ConfigEntry {
                key: "mail.file_dir",
                value: path(&c.mail.file_dir),
            },
            ConfigEntry {
                key: "mail.timeout_secs",
                value: Some(c.mail.timeout_secs.to_string()),
            },
            ConfigEntry {
                key: "http.timeout_secs",
                value: Some(c.get_http_timeout_secs().to_string()),
            },
            ConfigEntry {
                key: "http.max_retries",
                value: Some(c.http.max_retries.to_string()),
            },
        ]
    }

    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        self.config.set_field(key, value)?;
        log::debug!("Configuration '{}' set to '{}'", key, value);
        Ok(())
    }

    pub fn save_config(&self, path: Option<PathBuf>) -> Result<(), AppError> {
        self.config.save(path).map_err(|e| e.into())
    }
}
