//! Responses as values
//!
//! Helpers build `http::Response<String>` and leave writing it out to the
//! caller.

use super::request::{RequestContext, basic_credentials};
use crate::error::WebError;
use crate::i18n::Translator;
use http::header::{CONTENT_TYPE, HeaderValue, LOCATION, WWW_AUTHENTICATE};
use http::{Response, StatusCode};
use std::fs;
use std::path::Path;

pub const AUTH_REALM: &str = "HTTP Basic Authentication";
pub const AUTH_REQUIRED_MESSAGE: &str =
    "You must enter a valid login ID and password to access this resource.";

const NOT_FOUND_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>Page Not Found</title>
  </head>
  <body>
    <h1>Page Not Found!</h1>
    <p>Whoops! The page you requested couldn't be found.</p>
  </body>
</html>
"#;

fn with_body(status: StatusCode, content_type: &'static str, body: String) -> Response<String> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

fn html(status: StatusCode, body: String) -> Response<String> {
    with_body(status, "text/html; charset=utf-8", body)
}

/// 301 when `permanent`, 302 otherwise
pub fn redirect(url: &str, permanent: bool) -> Result<Response<String>, WebError> {
    let location = HeaderValue::from_str(url).map_err(|_| WebError::InvalidHeader {
        name: LOCATION.to_string(),
    })?;
    let status = if permanent {
        StatusCode::MOVED_PERMANENTLY
    } else {
        StatusCode::FOUND
    };

    let mut response = Response::new(String::new());
    *response.status_mut() = status;
    response.headers_mut().insert(LOCATION, location);
    Ok(response)
}

/// 404 with `custom_page` when it is a readable file, else the built-in page
pub fn error_404(custom_page: Option<&Path>) -> Response<String> {
    let body = custom_page
        .filter(|page| page.is_file())
        .and_then(|page| match fs::read_to_string(page) {
            Ok(body) => Some(body),
            Err(e) => {
                log::warn!("Cannot read error page {}: {}", page.display(), e);
                None
            }
        })
        .unwrap_or_else(|| NOT_FOUND_PAGE.to_string());
    html(StatusCode::NOT_FOUND, body)
}

/// 200 with the file contents, or the built-in 404 page
pub fn get_page(path: &Path) -> Response<String> {
    if !path.is_file() {
        return error_404(None);
    }
    match fs::read_to_string(path) {
        Ok(body) => html(StatusCode::OK, body),
        Err(e) => {
            log::warn!("Cannot read page {}: {}", path.display(), e);
            error_404(None)
        }
    }
}

/// Check the request's Basic credentials against `user` and `password`
///
/// Missing credentials compare as empty strings.
pub fn require_auth(
    ctx: &RequestContext,
    user: &str,
    password: &str,
    translator: &Translator,
) -> Result<(), WebError> {
    let (given_user, given_password) = basic_credentials(ctx).unwrap_or_default();
    if given_user == user && given_password == password {
        return Ok(());
    }

    log::debug!("Basic authentication failed for '{}'", given_user);
    Err(WebError::Unauthorized {
        realm: AUTH_REALM.to_string(),
        message: translator.tr(AUTH_REQUIRED_MESSAGE, &[]),
    })
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            WebError::InvalidHeader { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Response to send back instead of the requested resource
    pub fn into_response(self) -> Response<String> {
        let status = self.status();
        match self {
            WebError::Unauthorized { realm, message } => {
                let mut response = with_body(status, "text/plain; charset=utf-8", message + "\n");
                let challenge = HeaderValue::from_str(&format!("Basic realm=\"{}\"", realm))
                    .unwrap_or_else(|_| {
                        HeaderValue::from_static("Basic realm=\"HTTP Basic Authentication\"")
                    });
                response.headers_mut().insert(WWW_AUTHENTICATE, challenge);
                response
            }
            other => with_body(status, "text/plain; charset=utf-8", format!("{}\n", other)),
        }
    }
}
