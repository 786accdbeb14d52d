//! HTML mail with a plain-text alternative
//!
//! [`compose`] builds the multipart message; a [`MailTransport`] delivers it.

pub mod composer;
pub mod message;
pub mod transport;

pub use composer::{compose, compose_with_boundary};
pub use message::{ComposedMail, MailParams, SiteIdentity};
pub use transport::{
    FileTransport, MailTransport, MemoryTransport, SendmailTransport, SentMail, SmtpSettings,
    SmtpTransport, envelope_for, transport_from_config,
};
