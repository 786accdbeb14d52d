//! multipart/alternative message building

use super::message::{ComposedMail, MailParams, SiteIdentity};
use crate::error::MailError;
use crate::utils::text::{escape_html, strip_tags, word_wrap};
use crate::utils::validation::is_valid_email;
use md5::{Digest, Md5};

/// Column at which the plain-text part is wrapped
pub const TEXT_WRAP_WIDTH: usize = 70;

/// Random delimiter between the message parts
pub fn generate_boundary() -> String {
    let seed: u64 = rand::random();
    format!("-----={:x}", Md5::digest(seed.to_string().as_bytes()))
}

fn reject_line_breaks(field: &str, value: &str) -> Result<(), MailError> {
    if value.contains(['\r', '\n']) {
        return Err(MailError::HeaderInjection {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn require_address(address: &str) -> Result<(), MailError> {
    if is_valid_email(address) {
        Ok(())
    } else {
        Err(MailError::InvalidAddress {
            address: address.to_string(),
        })
    }
}

fn html_template(subject: &str, body: &str) -> String {
    format!(
        "<html>\n  <head>\n    <title>{}</title>\n  </head>\n  <body>\n    <div style=\"text-align:center\">{}</div>\n  </body>\n</html>",
        escape_html(subject),
        body
    )
}

/// Compose a message with a fresh random boundary
pub fn compose(params: &MailParams, site: &SiteIdentity) -> Result<ComposedMail, MailError> {
    compose_with_boundary(params, site, generate_boundary())
}

/// Compose a message with the given boundary
///
/// The reply address falls back to the site administrator when
/// `params.from` is unset or empty.
pub fn compose_with_boundary(
    params: &MailParams,
    site: &SiteIdentity,
    boundary: String,
) -> Result<ComposedMail, MailError> {
    let server_admin = site
        .server_admin
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(MailError::MissingServerAdmin)?;
    let reply_to = params
        .from
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(server_admin);

    reject_line_breaks("to", &params.to)?;
    reject_line_breaks("subject", &params.subject)?;
    reject_line_breaks("from", reply_to)?;
    let http_host = site.http_host.as_deref().filter(|s| !s.is_empty());
    if let Some(host) = http_host {
        reject_line_breaks("http_host", host)?;
    }
    require_address(&params.to)?;
    require_address(server_admin)?;
    require_address(reply_to)?;

    let text_part = word_wrap(&strip_tags(&params.body), TEXT_WRAP_WIDTH);
    let html_part = html_template(&params.subject, &params.body);

    let mut headers = match http_host {
        Some(host) => format!("From: \"{}\" <{}>\r\n", host.replace('"', ""), server_admin),
        None => format!("From: <{}>\r\n", server_admin),
    };
    headers.push_str(&format!("Reply-To: <{}>\r\n", reply_to));
    headers.push_str("MIME-Version: 1.0\r\n");
    headers.push_str(&format!(
        "Content-Type: multipart/alternative; boundary=\"{}\"\r\n",
        boundary
    ));

    let mut body = String::with_capacity(text_part.len() + html_part.len() + 256);
    for (content_type, content) in [("text/plain", &text_part), ("text/html", &html_part)] {
        body.push_str(&format!("--{}\r\n", boundary));
        body.push_str(&format!(
            "Content-Type: {}; charset=\"utf-8\"\r\n",
            content_type
        ));
        body.push_str("Content-Transfer-Encoding: 8bit\r\n");
        body.push_str(&format!("\r\n{}\r\n", content));
    }
    body.push_str(&format!("--{}--\r\n", boundary));

    Ok(ComposedMail {
        to: params.to.clone(),
        sender: server_admin.to_string(),
        subject: params.subject.clone(),
        boundary,
        text_part,
        html_part,
        headers,
        body,
    })
}
