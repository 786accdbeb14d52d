//! Configuration management
//!
//! TOML configuration stored at `~/.config/sitekit/config.toml`.
//! Priority for site identity values: config file > SITEKIT_* environment variable.

use super::Result;
use crate::error::{ConfigError, StorageError};
use crate::utils::error_helpers::convert_io_to_storage_error;
use crate::utils::input::EnvConfigReader;
use crate::utils::validation::{FieldValidator, LengthBounds};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Application configuration
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub mail: MailConfig,
    pub validation: ValidationConfig,
    pub http: HttpConfig,
}

/// Identity of the site the helpers run for
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Administrative address, used as sender and as fallback reply-to
    pub server_admin: Option<String>,
    /// Host name shown as the sender display name
    pub http_host: Option<String>,
    pub locale: Option<String>,
    /// Directory holding `<locale>/LC_MESSAGES/messages.po`
    pub locale_dir: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MailBackend {
    #[default]
    Sendmail,
    Smtp,
    File,
    Memory,
}

impl MailBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            MailBackend::Sendmail => "sendmail",
            MailBackend::Smtp => "smtp",
            MailBackend::File => "file",
            MailBackend::Memory => "memory",
        }
    }
}

impl fmt::Display for MailBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MailBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sendmail" => Ok(MailBackend::Sendmail),
            "smtp" => Ok(MailBackend::Smtp),
            "file" => Ok(MailBackend::File),
            "memory" => Ok(MailBackend::Memory),
            _ => Err(ConfigError::InvalidValue {
                field: "mail.backend".to_string(),
                value: s.to_string(),
                reason: "expected sendmail, smtp, file or memory".to_string(),
            }),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MailConfig {
    pub backend: MailBackend,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_username: Option<String>,
    /// Output directory of the `file` backend
    pub file_dir: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            backend: MailBackend::default(),
            smtp_host: None,
            smtp_port: None,
            smtp_username: None,
            file_dir: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Optional overrides of the validator length bounds
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ValidationConfig {
    pub username: Option<LengthBounds>,
    pub password: Option<LengthBounds>,
    pub name: Option<LengthBounds>,
}

impl ValidationConfig {
    pub fn field_validator(&self) -> FieldValidator {
        let defaults = FieldValidator::default();
        FieldValidator {
            username: self.username.unwrap_or(defaults.username),
            password: self.password.unwrap_or(defaults.password),
            name: self.name.unwrap_or(defaults.name),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if !config_path.exists() {
            log::debug!(
                "No configuration at {}, using defaults",
                config_path.display()
            );
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| convert_io_to_storage_error(e, &config_path))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
                message: format!("Failed to parse config file: {}", e),
            })?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| convert_io_to_storage_error(e, parent))?;
        }

        let toml_content = toml::to_string(self).map_err(|e| StorageError::ConfigParseError {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&config_path, toml_content)
            .map_err(|e| convert_io_to_storage_error(e, &config_path))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().ok_or(StorageError::ConfigDirNotFound)?;

        let app_config_dir = home_dir.join(".config").join("sitekit");
        let config_file = app_config_dir.join("config.toml");

        Ok(config_file)
    }

    /// Get the administrative address with fallback to environment variable
    pub fn get_server_admin(&self) -> Option<String> {
        self.site
            .server_admin
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(EnvConfigReader::read_server_admin)
    }

    /// Get the site host name with fallback to environment variable
    pub fn get_http_host(&self) -> Option<String> {
        self.site
            .http_host
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(EnvConfigReader::read_http_host)
    }

    /// Get the locale with fallback to environment variable
    pub fn get_locale(&self) -> Option<String> {
        self.site
            .locale
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(EnvConfigReader::read_locale)
    }

    /// HTTP timeout, overridable by SITEKIT_HTTP_TIMEOUT
    pub fn get_http_timeout_secs(&self) -> u64 {
        EnvConfigReader::read_http_timeout().unwrap_or(self.http.timeout_secs)
    }

    /// Set a value addressed by its dotted key, e.g. `mail.smtp_port`
    pub fn set_field(&mut self, key: &str, value: &str) -> std::result::Result<(), ConfigError> {
        let some = || Some(value.to_string());
        match key {
            "site.server_admin" => self.site.server_admin = some(),
            "site.http_host" => self.site.http_host = some(),
            "site.locale" => self.site.locale = some(),
            "site.locale_dir" => self.site.locale_dir = Some(PathBuf::from(value)),
            "mail.backend" => self.mail.backend = value.parse()?,
            "mail.smtp_host" => self.mail.smtp_host = some(),
            "mail.smtp_port" => self.mail.smtp_port = Some(parse_number(key, value)?),
            "mail.smtp_username" => self.mail.smtp_username = some(),
            "mail.file_dir" => self.mail.file_dir = Some(PathBuf::from(value)),
            "mail.timeout_secs" => self.mail.timeout_secs = parse_number(key, value)?,
            "http.timeout_secs" => self.http.timeout_secs = parse_number(key, value)?,
            "http.max_retries" => self.http.max_retries = parse_number(key, value)?,
            _ => {
                return Err(ConfigError::InvalidValue {
                    field: key.to_string(),
                    value: value.to_string(),
                    reason: "unknown configuration key".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> std::result::Result<T, ConfigError> {
    value.parse::<T>().map_err(|_| ConfigError::InvalidValue {
        field: key.to_string(),
        value: value.to_string(),
        reason: "expected a positive number".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.site.server_admin.is_none());
        assert_eq!(config.mail.backend, MailBackend::Sendmail);
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.http.max_retries, 3);
    }

    #[test]
    fn test_config_load_save() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config
            .set_field("site.server_admin", "admin@example.test")
            .expect("set admin");
        config.set_field("mail.backend", "smtp").expect("set backend");
        config.set_field("mail.smtp_port", "2525").expect("set port");
        config.validation.username = Some(LengthBounds::new(3, 20));

        config
            .save(Some(config_path.clone()))
            .expect("Failed to save config");

        let loaded_config = Config::load(Some(config_path)).expect("Failed to load config");
        assert_eq!(loaded_config, config);
        assert_eq!(loaded_config.mail.smtp_port, Some(2525));
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(
            &config_path,
            "[site]\nhttp_host = \"example.test\"\n\n[validation]\npassword = { min = 8, max = 64 }\n",
        )
        .expect("write config");

        let config = Config::load(Some(config_path)).expect("Failed to load config");
        assert_eq!(config.site.http_host.as_deref(), Some("example.test"));
        assert_eq!(config.mail.timeout_secs, 30);

        let validator = config.validation.field_validator();
        assert_eq!(validator.password, LengthBounds::new(8, 64));
        assert_eq!(validator.username, LengthBounds::USERNAME);
    }

    #[test]
    fn test_load_rejects_inverted_length_bounds() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[validation]\nusername = { min = 12, max = 4 }\n")
            .expect("write config");

        match Config::load(Some(config_path)) {
            Err(StorageError::ConfigParseError { message }) => {
                assert!(message.contains("must not exceed max"), "{message}");
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let nonexistent_path = temp_dir.path().join("nonexistent.toml");

        let config = Config::load(Some(nonexistent_path)).expect("Failed to load default config");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[site\nbroken").expect("write config");

        let result = Config::load(Some(config_path));
        assert!(matches!(result, Err(StorageError::ConfigParseError { .. })));
    }

    #[test]
    fn test_set_field_rejects_bad_values() {
        let mut config = Config::default();
        assert!(matches!(
            config.set_field("mail.backend", "pigeon"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(config.set_field("http.timeout_secs", "soon").is_err());
        assert!(config.set_field("nope.key", "x").is_err());
    }

    #[test]
    fn test_mail_backend_round_trips_through_str() {
        for backend in [
            MailBackend::Sendmail,
            MailBackend::Smtp,
            MailBackend::File,
            MailBackend::Memory,
        ] {
            assert_eq!(backend.as_str().parse::<MailBackend>().unwrap(), backend);
        }
    }
}
