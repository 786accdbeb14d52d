use crate::utils::validation::Rejection;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("CliError: {0}")]
    Cli(#[from] CliError),
    #[error("ValidationError: {0}")]
    Validation(#[from] ValidationError),
    #[error("FileError: {0}")]
    File(#[from] FileError),
    #[error("ArchiveError: {0}")]
    Archive(#[from] ArchiveError),
    #[error("FetchError: {0}")]
    Fetch(#[from] FetchError),
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
    #[error("MailError: {0}")]
    Mail(#[from] MailError),
    #[error("WebError: {0}")]
    Web(#[from] WebError),
    #[error("I18nError: {0}")]
    I18n(#[from] I18nError),
    #[error("SqlError: {0}")]
    Sql(#[from] SqlError),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field '{field}' rejected: {rejection}")]
    Rejected { field: String, rejection: Rejection },
}

#[derive(Error, Debug)]
pub enum FileError {
    #[error("Path not found: {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("File I/O error at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Could not delete {} ({} entries left behind)", .path.display(), .failed.len())]
    PartialDelete { path: PathBuf, failed: Vec<PathBuf> },
    #[error("The file format is not supported: '{extension}'")]
    UnsupportedFormat { extension: String },
}

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Cannot open archive {path}: {source}")]
    Open {
        path: String,
        source: zip::result::ZipError,
    },
    #[error("Cannot extract {path} into {destination}: {source}")]
    Extract {
        path: String,
        destination: String,
        source: zip::result::ZipError,
    },
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64, url: String },
    #[error("HTTP error: {status} {message}")]
    Http {
        status: u16,
        url: String,
        message: String,
    },
    #[error("HTTP client initialization failed: {message}")]
    ClientInit { message: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value for '{field}': {value}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
}

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid mail address: '{address}'")]
    InvalidAddress { address: String },
    #[error("No sender available: set [site].server_admin or SITEKIT_SERVER_ADMIN")]
    MissingServerAdmin,
    #[error("Line break in mail header '{field}'")]
    HeaderInjection { field: String },
    #[error("Mail transport '{backend}' rejected the message: {message}")]
    Transport { backend: String, message: String },
}

#[derive(Error, Debug)]
pub enum WebError {
    #[error("Authentication required for realm '{realm}'")]
    Unauthorized { realm: String, message: String },
    #[error("Invalid header value for '{name}'")]
    InvalidHeader { name: String },
}

#[derive(Error, Debug)]
pub enum I18nError {
    #[error("Cannot read catalog {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Catalog parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

#[derive(Error, Debug)]
pub enum SqlError {
    #[error("The \"{}\" file is not found", .path.display())]
    FileNotFound { path: PathBuf },
    #[error("Cannot read SQL file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("SQL script {path} failed: {message}")]
    Execution { path: String, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl ErrorSeverity {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "critical",
            ErrorSeverity::High => "error",
            ErrorSeverity::Medium => "warning",
            ErrorSeverity::Low => "notice",
        }
    }
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Cli(_) => ErrorSeverity::Medium,
            AppError::Validation(_) => ErrorSeverity::Low,
            AppError::File(file_error) => match file_error {
                FileError::PartialDelete { .. } => ErrorSeverity::High,
                _ => ErrorSeverity::Medium,
            },
            AppError::Archive(_) => ErrorSeverity::Medium,
            AppError::Fetch(fetch_error) => match fetch_error {
                FetchError::Timeout { .. } => ErrorSeverity::Medium,
                FetchError::Http { status, .. } if *status >= 500 => ErrorSeverity::High,
                FetchError::ClientInit { .. } => ErrorSeverity::Critical,
                _ => ErrorSeverity::Medium,
            },
            AppError::Config(_) => ErrorSeverity::High,
            AppError::Storage(_) => ErrorSeverity::Medium,
            AppError::Mail(_) => ErrorSeverity::High,
            AppError::Web(_) => ErrorSeverity::Medium,
            AppError::I18n(_) => ErrorSeverity::Low,
            AppError::Sql(_) => ErrorSeverity::High,
        }
    }

    pub fn display_friendly(&self) -> String {
        match self {
            AppError::Validation(ValidationError::Rejected { field, rejection }) => {
                format!("{} is invalid ({})", field, rejection.tag())
            }
            AppError::File(FileError::NotFound { path }) => {
                format!("{} does not exist", path.display())
            }
            AppError::Mail(MailError::MissingServerAdmin) => {
                "No administrative mail address configured".to_string()
            }
            _ => format!("{}", self),
        }
    }

    pub fn troubleshooting_hint(&self) -> Option<String> {
        match self {
            AppError::Mail(MailError::MissingServerAdmin) => Some(
                "'sitekit config set site.server_admin admin@example.com' to set one".to_string(),
            ),
            AppError::Mail(MailError::Transport { backend, .. }) if backend == "smtp" => {
                Some("Check [mail].smtp_host and SITEKIT_SMTP_PASSWORD".to_string())
            }
            AppError::Fetch(FetchError::Timeout { .. }) => {
                Some("Raise [http].timeout_secs or check the remote host".to_string())
            }
            AppError::Config(ConfigError::InvalidValue { reason, .. }) => Some(format!(
                "{}; 'sitekit config set --help' lists the keys",
                reason
            )),
            AppError::File(FileError::UnsupportedFormat { .. }) => Some(
                "Supported formats: gif, jpg, png, ico, eot, otf, ttf, woff".to_string(),
            ),
            _ => None,
        }
    }
}
