//! # sitekit-core
//!
//! Stateless helpers for small web sites: input validation, HTML escaping,
//! filesystem and archive chores, request inspection, translations, mail
//! composition and SQL script execution.
//!
//! Every helper takes its inputs explicitly. Nothing reads process-wide
//! request state and nothing terminates the process; redirects, 401
//! challenges and unsupported formats come back as values.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sitekit_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> sitekit_core::Result<()> {
//!     let config = Config::load(None)?;
//!
//!     validate_username("valid_name1").into_result("username")?;
//!
//!     let mail = MailService::from_config(&config)?;
//!     mail.send(&MailParams::new("user@example.com", "Welcome", "<b>Hello</b>"))
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  api · web · mail · i18n · sql      │  Network, request/response, delivery
//! ├─────────────────────────────────────┤
//! │          Core Layer                 │  Services used by the CLI
//! ├─────────────────────────────────────┤
//! │        Storage Layer                │  Configuration, credentials
//! ├─────────────────────────────────────┤
//! │         Utils Layer                 │  Validation, text, files, hashing
//! └─────────────────────────────────────┘
//! ```

pub use error::AppError;

/// Commonly used types in one import.
///
/// ```rust,ignore
/// use sitekit_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::Result;
    pub use crate::error::AppError;

    pub use crate::api::HttpFetcher;
    pub use crate::core::services::config_service::ConfigService;
    pub use crate::core::services::mail_service::MailService;
    pub use crate::display::TableDisplay;
    pub use crate::i18n::Translator;
    pub use crate::mail::{ComposedMail, MailParams, SiteIdentity};
    pub use crate::storage::config::Config;
    pub use crate::utils::validation::{
        FieldValidator, LengthBounds, Rejection, Validation, validate_email, validate_identical,
        validate_name, validate_password, validate_username,
    };
    pub use crate::web::RequestContext;
}

/// Remote fetches: [`api::client::HttpFetcher`].
pub mod api;

/// Services orchestrating the lower layers for the CLI.
pub mod core;

/// Terminal tables for CLI output.
pub mod display;

/// Hierarchical error system with severity and troubleshooting hints.
pub mod error;

/// gettext catalogs and the [`i18n::Translator`].
pub mod i18n;

/// Multipart HTML mail and its transports.
pub mod mail;

/// SQL script execution.
pub mod sql;

/// TOML configuration and environment credentials.
pub mod storage;

/// Validation, escaping, filesystem, archive and hashing helpers.
pub mod utils;

/// Request inspection and response values.
pub mod web;

/// `std::result::Result` with [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
