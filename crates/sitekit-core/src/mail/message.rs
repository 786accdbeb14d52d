use crate::storage::config::Config;

/// What the caller wants to send
///
/// `body` is HTML; the plain-text alternative is derived from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailParams {
    pub to: String,
    /// Reply address; the site administrator is used when unset
    pub from: Option<String>,
    pub subject: String,
    pub body: String,
}

impl MailParams {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            from: None,
            subject: subject.into(),
            body: body.into(),
        }
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }
}

/// Server-side identity used for the `From` header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteIdentity {
    pub server_admin: Option<String>,
    pub http_host: Option<String>,
}

impl SiteIdentity {
    pub fn new(server_admin: impl Into<String>, http_host: impl Into<String>) -> Self {
        Self {
            server_admin: Some(server_admin.into()),
            http_host: Some(http_host.into()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            server_admin: config.get_server_admin(),
            http_host: config.get_http_host(),
        }
    }
}

/// A fully formed multipart/alternative message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMail {
    pub(crate) to: String,
    pub(crate) sender: String,
    pub(crate) subject: String,
    pub(crate) boundary: String,
    pub(crate) text_part: String,
    pub(crate) html_part: String,
    pub(crate) headers: String,
    pub(crate) body: String,
}

impl ComposedMail {
    pub fn to(&self) -> &str {
        &self.to
    }

    /// Envelope sender (the site administrator)
    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Plain-text alternative, tags stripped and wrapped
    pub fn text_part(&self) -> &str {
        &self.text_part
    }

    /// HTML alternative, body inside the mail template
    pub fn html_part(&self) -> &str {
        &self.html_part
    }

    /// Header block, each line CRLF-terminated
    pub fn headers(&self) -> &str {
        &self.headers
    }

    /// Multipart body including the closing delimiter
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Complete message as handed to a transport
    pub fn to_rfc822(&self) -> Vec<u8> {
        format!(
            "To: {}\r\nSubject: {}\r\n{}\r\n{}",
            self.to,
            encode_header_value(&self.subject),
            self.headers,
            self.body
        )
        .into_bytes()
    }
}

/// RFC 2047 encoded-word for non-ASCII header values
pub(crate) fn encode_header_value(value: &str) -> String {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(value.as_bytes()))
    }
}
