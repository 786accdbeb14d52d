//! Request data passed explicitly to the web helpers

use crate::error::WebError;
use crate::utils::text::escape_html;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::header::{ACCEPT_LANGUAGE, AUTHORIZATION, HOST, HeaderMap, HeaderName, HeaderValue};
use regex::Regex;
use std::sync::LazyLock;

static CLIENT_IP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9:.]{7,}$").expect("static pattern is valid"));

/// Returned by [`client_ip`] when no plausible address is found
pub const UNKNOWN_IP: &str = "0.0.0.0";

/// What a handler knows about the current request
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub https: bool,
    pub server_name: String,
    pub server_port: u16,
    pub request_uri: String,
    pub remote_addr: String,
    pub headers: HeaderMap,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            https: false,
            server_name: "localhost".to_string(),
            server_port: 80,
            request_uri: "/".to_string(),
            remote_addr: String::new(),
            headers: HeaderMap::new(),
        }
    }
}

impl RequestContext {
    pub fn new(server_name: impl Into<String>) -> Self {
        Self {
            server_name: server_name.into(),
            ..Self::default()
        }
    }

    /// Build from an incoming `http::Request`
    ///
    /// Host and port come from the `Host` header, falling back to the URI
    /// authority.
    pub fn from_request<B>(request: &http::Request<B>, remote_addr: impl Into<String>) -> Self {
        let https = request.uri().scheme_str() == Some("https");
        let default_port = if https { 443 } else { 80 };
        let authority = request
            .headers()
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .or_else(|| request.uri().authority().map(|a| a.to_string()))
            .unwrap_or_else(|| "localhost".to_string());
        let (server_name, server_port) = match authority.rsplit_once(':') {
            Some((name, port)) => match port.parse::<u16>() {
                Ok(port) => (name.to_string(), port),
                Err(_) => (authority.clone(), default_port),
            },
            None => (authority.clone(), default_port),
        };
        let request_uri = request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        Self {
            https,
            server_name,
            server_port,
            request_uri,
            remote_addr: remote_addr.into(),
            headers: request.headers().clone(),
        }
    }

    pub fn with_https(mut self, https: bool) -> Self {
        self.https = https;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.server_port = port;
        self
    }

    pub fn with_request_uri(mut self, uri: impl Into<String>) -> Self {
        self.request_uri = uri.into();
        self
    }

    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = addr.into();
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, WebError> {
        let invalid = || WebError::InvalidHeader {
            name: name.to_string(),
        };
        let header_name: HeaderName = name.parse().map_err(|_| invalid())?;
        let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Non-empty header value as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    }
}

/// Client address: `X-Forwarded-For`, then `Client-IP`, then the peer
///
/// The raw value is returned only when it looks like an address,
/// otherwise [`UNKNOWN_IP`].
pub fn client_ip(ctx: &RequestContext) -> String {
    let candidate = ctx
        .header("x-forwarded-for")
        .or_else(|| ctx.header("client-ip"))
        .unwrap_or(&ctx.remote_addr);

    if CLIENT_IP.is_match(candidate) {
        candidate.to_string()
    } else {
        UNKNOWN_IP.to_string()
    }
}

/// Absolute URL of the current request
///
/// The port is omitted when it is the scheme default.
pub fn current_url(ctx: &RequestContext) -> String {
    let (scheme, default_port) = if ctx.https {
        ("https", 443)
    } else {
        ("http", 80)
    };
    if ctx.server_port == default_port {
        format!("{}://{}{}", scheme, ctx.server_name, ctx.request_uri)
    } else {
        format!(
            "{}://{}:{}{}",
            scheme, ctx.server_name, ctx.server_port, ctx.request_uri
        )
    }
}

/// Two-letter language code of the first `Accept-Language` entry
pub fn browser_lang(ctx: &RequestContext) -> String {
    let first = ctx
        .headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .unwrap_or("")
        .trim_end();
    let code: String = first.chars().take(2).collect();
    escape_html(&code.to_lowercase())
}

/// Credentials of an `Authorization: Basic` header
pub fn basic_credentials(ctx: &RequestContext) -> Option<(String, String)> {
    let header = ctx.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}
