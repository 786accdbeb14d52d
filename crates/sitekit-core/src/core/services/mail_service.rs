//! Mail service: compose and hand off to the configured transport

use crate::AppError;
use crate::mail::{
    ComposedMail, MailParams, MailTransport, SiteIdentity, compose, transport_from_config,
};
use crate::storage::config::Config;

pub struct MailService {
    identity: SiteIdentity,
    transport: Box<dyn MailTransport>,
}

impl MailService {
    pub fn new(identity: SiteIdentity, transport: Box<dyn MailTransport>) -> Self {
        Self {
            identity,
            transport,
        }
    }

    /// Service wired from `[site]` and `[mail]`
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let transport = transport_from_config(config)?;
        Ok(Self::new(SiteIdentity::from_config(config), transport))
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    /// Compose without sending
    pub fn preview(&self, params: &MailParams) -> Result<ComposedMail, AppError> {
        Ok(compose(params, &self.identity)?)
    }

    /// Compose and send
    ///
    /// `Ok` means the transport accepted the message, not that it was delivered.
    pub async fn send(&self, params: &MailParams) -> Result<ComposedMail, AppError> {
        let mail = compose(params, &self.identity)?;
        self.transport.send(&mail).await?;
        log::info!(
            "Mail '{}' to {} handed to {}",
            mail.subject(),
            mail.to(),
            self.transport.name()
        );
        Ok(mail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MailError;
    use crate::mail::{MemoryTransport, SentMail};
    use async_trait::async_trait;
    use lettre::address::Envelope;
    use std::sync::Arc;

    /// Shares the captured messages with the test body
    struct SharedMemory(Arc<MemoryTransport>);

    #[async_trait]
    impl MailTransport for SharedMemory {
        fn name(&self) -> &'static str {
            "memory"
        }

        async fn send_raw(&self, envelope: &Envelope, message: &[u8]) -> Result<(), MailError> {
            self.0.send_raw(envelope, message).await
        }
    }

    struct Refusing;

    #[async_trait]
    impl MailTransport for Refusing {
        fn name(&self) -> &'static str {
            "refusing"
        }

        async fn send_raw(&self, _: &Envelope, _: &[u8]) -> Result<(), MailError> {
            Err(MailError::Transport {
                backend: "refusing".to_string(),
                message: "relay denied".to_string(),
            })
        }
    }

    fn identity() -> SiteIdentity {
        SiteIdentity::new("admin@example.test", "example.test")
    }

    #[tokio::test]
    async fn test_send_hands_message_to_transport() {
        let memory = Arc::new(MemoryTransport::new());
        let service = MailService::new(identity(), Box::new(SharedMemory(memory.clone())));

        let params = MailParams::new("user@example.test", "Welcome", "<b>Hello</b>");
        let mail = service.send(&params).await.expect("send");

        let sent: Vec<SentMail> = memory.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message, mail.to_rfc822());
    }

    #[tokio::test]
    async fn test_send_reports_transport_failure() {
        let service = MailService::new(identity(), Box::new(Refusing));
        let params = MailParams::new("user@example.test", "Welcome", "Hello");

        let result = service.send(&params).await;
        assert!(matches!(
            result,
            Err(AppError::Mail(MailError::Transport { .. }))
        ));
    }

    #[test]
    fn test_preview_does_not_send() {
        let service = MailService::new(identity(), Box::new(MemoryTransport::new()));
        let params = MailParams::new("user@example.test", "Hi", "<p>Body</p>");

        let mail = service.preview(&params).expect("preview");
        assert_eq!(mail.text_part(), "Body");
        assert_eq!(service.transport_name(), "memory");
    }

    #[test]
    fn test_from_config_selects_backend() {
        let mut config = Config::default();
        config.mail.backend = crate::storage::config::MailBackend::Memory;
        config.site.server_admin = Some("admin@example.test".to_string());

        let service = MailService::from_config(&config).expect("service");
        assert_eq!(service.transport_name(), "memory");
    }
}
