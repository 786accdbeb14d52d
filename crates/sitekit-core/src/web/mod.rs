//! Request inspection and response shaping for web handlers

pub mod request;
pub mod response;

pub use request::{
    RequestContext, UNKNOWN_IP, basic_credentials, browser_lang, client_ip, current_url,
};
pub use response::{error_404, get_page, redirect, require_auth};
