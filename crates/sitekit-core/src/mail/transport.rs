//! Mail delivery backends
//!
//! Every backend receives the already composed message and hands its raw
//! bytes to the delivery mechanism unchanged.

use super::message::ComposedMail;
use crate::error::MailError;
use crate::storage::config::{Config, MailBackend};
use crate::storage::credentials::get_smtp_password;
use crate::utils::error_helpers::convert_transport_error;
use crate::utils::file::ensure_directory_exists;
use async_trait::async_trait;
use lettre::address::{Address, Envelope};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{
    AsyncFileTransport, AsyncSendmailTransport, AsyncSmtpTransport, AsyncTransport,
    Tokio1Executor,
};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

const DEFAULT_SMTP_PORT: u16 = 587;

#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Backend name as written in `[mail].backend`
    fn name(&self) -> &'static str;

    async fn send_raw(&self, envelope: &Envelope, message: &[u8]) -> Result<(), MailError>;

    async fn send(&self, mail: &ComposedMail) -> Result<(), MailError> {
        let envelope = envelope_for(mail)?;
        self.send_raw(&envelope, &mail.to_rfc822()).await?;
        log::debug!("{} accepted mail for {}", self.name(), mail.to());
        Ok(())
    }
}

fn parse_address(address: &str) -> Result<Address, MailError> {
    address.parse::<Address>().map_err(|_| MailError::InvalidAddress {
        address: address.to_string(),
    })
}

/// SMTP envelope: administrator as sender, `to` as the single recipient
pub fn envelope_for(mail: &ComposedMail) -> Result<Envelope, MailError> {
    let sender = parse_address(mail.sender())?;
    let recipient = parse_address(mail.to())?;
    Envelope::new(Some(sender), vec![recipient]).map_err(|_| MailError::InvalidAddress {
        address: mail.to().to_string(),
    })
}

async fn deliver<T>(
    transport: &T,
    backend: &str,
    envelope: &Envelope,
    message: &[u8],
) -> Result<(), MailError>
where
    T: AsyncTransport + Sync,
    T::Error: std::fmt::Display,
{
    let result = transport.send_raw(envelope, message).await.map(|_| ());
    crate::map_transport_error!(result, backend)
}

/// Local `sendmail` binary
pub struct SendmailTransport {
    inner: AsyncSendmailTransport<Tokio1Executor>,
}

impl SendmailTransport {
    pub fn new() -> Self {
        Self {
            inner: AsyncSendmailTransport::<Tokio1Executor>::new(),
        }
    }
}

impl Default for SendmailTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MailTransport for SendmailTransport {
    fn name(&self) -> &'static str {
        "sendmail"
    }

    async fn send_raw(&self, envelope: &Envelope, message: &[u8]) -> Result<(), MailError> {
        deliver(&self.inner, self.name(), envelope, message).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
}

/// SMTP relay, STARTTLS when credentials are configured
pub struct SmtpTransport {
    inner: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpTransport {
    pub fn new(settings: SmtpSettings) -> Result<Self, MailError> {
        let inner = match (settings.username, settings.password) {
            (Some(username), Some(password)) => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
                    .map_err(|e| convert_transport_error(e, "smtp"))?
                    .credentials(Credentials::new(username, password))
            }
            _ => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host),
        }
        .port(settings.port)
        .timeout(Some(settings.timeout))
        .build();

        Ok(Self { inner })
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn send_raw(&self, envelope: &Envelope, message: &[u8]) -> Result<(), MailError> {
        deliver(&self.inner, self.name(), envelope, message).await
    }
}

/// Writes each message as an `.eml` file into a directory
pub struct FileTransport {
    inner: AsyncFileTransport<Tokio1Executor>,
    dir: PathBuf,
}

impl FileTransport {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            inner: AsyncFileTransport::<Tokio1Executor>::new(&dir),
            dir,
        }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

#[async_trait]
impl MailTransport for FileTransport {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn send_raw(&self, envelope: &Envelope, message: &[u8]) -> Result<(), MailError> {
        ensure_directory_exists(&self.dir).map_err(|e| convert_transport_error(e, self.name()))?;
        deliver(&self.inner, self.name(), envelope, message).await
    }
}

/// A message captured by [`MemoryTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub envelope: Envelope,
    pub message: Vec<u8>,
}

/// Keeps messages in memory
#[derive(Default)]
pub struct MemoryTransport {
    sent: Mutex<Vec<SentMail>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentMail> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl MailTransport for MemoryTransport {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn send_raw(&self, envelope: &Envelope, message: &[u8]) -> Result<(), MailError> {
        let mut sent = match self.sent.lock() {
            Ok(sent) => sent,
            Err(poisoned) => poisoned.into_inner(),
        };
        sent.push(SentMail {
            envelope: envelope.clone(),
            message: message.to_vec(),
        });
        Ok(())
    }
}

/// Build the backend selected by `[mail].backend`
pub fn transport_from_config(config: &Config) -> Result<Box<dyn MailTransport>, MailError> {
    let mail = &config.mail;
    let transport: Box<dyn MailTransport> = match mail.backend {
        MailBackend::Sendmail => Box::new(SendmailTransport::new()),
        MailBackend::Smtp => {
            let host = mail.smtp_host.clone().ok_or_else(|| MailError::Transport {
                backend: "smtp".to_string(),
                message: "[mail].smtp_host is not set".to_string(),
            })?;
            Box::new(SmtpTransport::new(SmtpSettings {
                host,
                port: mail.smtp_port.unwrap_or(DEFAULT_SMTP_PORT),
                username: mail.smtp_username.clone(),
                password: get_smtp_password(),
                timeout: Duration::from_secs(mail.timeout_secs),
            })?)
        }
        MailBackend::File => {
            let dir = mail.file_dir.clone().unwrap_or_else(std::env::temp_dir);
            Box::new(FileTransport::new(dir))
        }
        MailBackend::Memory => Box::new(MemoryTransport::new()),
    };
    log::debug!("Using mail backend '{}'", transport.name());
    Ok(transport)
}
