use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sitekit")]
#[command(about = "Helpers for small web sites: validation, escaping, files, mail, i18n")]
#[command(version)]
#[command(after_help = "Examples:
  sitekit validate --username valid_name1 --email a@b.com
  sitekit escape '<b>Tom & Jerry</b>'
  sitekit dir list ./themes
  sitekit mail preview --to user@example.com --subject Hi --body '<b>Hello</b>'
  sitekit url check https://example.com
  sitekit config set site.server_admin admin@example.com

Environment Variables:
  SITEKIT_SERVER_ADMIN   Administrative mail address (sender)
  SITEKIT_HTTP_HOST      Site host name shown in the From header
  SITEKIT_SMTP_PASSWORD  SMTP password for the smtp mail backend
  SITEKIT_LOCALE         Locale used by 'tr'
  RUST_LOG               Log filter (default: warn)")]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Custom configuration directory path
    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate form fields (username, password, email, name)
    Validate(ValidateArgs),
    /// Escape HTML special characters, or strip tags
    Escape {
        text: String,
        /// Remove tags instead of escaping them
        #[arg(long)]
        strip: bool,
    },
    /// Wrap text at a column without cutting words
    Wrap {
        text: String,
        #[arg(short, long, default_value = "70")]
        width: usize,
    },
    /// Print the Gravatar URL of an email address
    Gravatar {
        email: String,
        /// Default image type
        #[arg(long, default_value = "wavatar")]
        default: String,
        #[arg(long, default_value = "80")]
        size: u32,
        /// Maximum rating allowed
        #[arg(long, default_value = "g")]
        rating: String,
    },
    /// Generate a random hexadecimal hash
    Hash {
        /// Number of characters, at most 128
        #[arg(short, long, default_value = "80")]
        length: usize,
    },
    /// Directory helpers
    Dir {
        #[command(subcommand)]
        command: DirCommands,
    },
    /// Extract a zip archive into a directory
    Zip { file: PathBuf, dir: PathBuf },
    /// Print a file as a base64 data URI
    DataUri { file: PathBuf },
    /// Remote URL helpers
    Url {
        #[command(subcommand)]
        command: UrlCommands,
    },
    /// Compose or send an HTML mail with a text alternative
    Mail {
        #[command(subcommand)]
        command: MailCommands,
    },
    /// Run a SQL script file against a SQLite database
    #[command(after_help = "Examples:
  sitekit sql install.sql --database sqlite://site.db
  sitekit sql install.sql --database sqlite://site.db --old-prefix ph7_ --new-prefix site_")]
    Sql(SqlArgs),
    /// Translate a message with the configured catalog
    #[command(after_help = "Examples:
  sitekit tr 'Hello %0%' Ann
  sitekit tr '%n% file' --plural '%n% files' --count 3")]
    Tr(TrArgs),
    /// Configuration management (show, set)
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    /// Prompt for the password (and its confirmation) instead
    #[arg(long, conflicts_with = "password")]
    pub ask_password: bool,
    /// Must match the password
    #[arg(long)]
    pub confirm: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum DirCommands {
    /// List sub-directories, sorted
    List { path: PathBuf },
    /// Check that a path is a writable directory
    Check { path: String },
    /// Delete a file or directory tree
    Delete {
        path: PathBuf,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Print a path with exactly one leading and trailing slash
    Normalize { path: String },
    /// Check for a URL rewrite file in a directory
    Rewrite {
        dir: PathBuf,
        #[arg(long)]
        file: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum UrlCommands {
    /// Exit successfully when the URL answers 200 or 301
    Check { url: String },
    /// Print the body of a URL, following redirects
    Fetch {
        url: String,
        /// Retry on server errors and timeouts
        #[arg(long)]
        retry: bool,
    },
}

#[derive(Args, Debug)]
pub struct MailArgs {
    #[arg(long)]
    pub to: String,
    #[arg(long)]
    pub subject: String,
    /// HTML body
    #[arg(long, conflicts_with = "body_file", required_unless_present = "body_file")]
    pub body: Option<String>,
    /// Read the HTML body from a file
    #[arg(long)]
    pub body_file: Option<PathBuf>,
    /// Reply address; the server admin is used when omitted
    #[arg(long)]
    pub from: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum MailCommands {
    /// Print the composed message without sending it
    Preview(MailArgs),
    /// Send through the configured backend
    Send(MailArgs),
}

#[derive(Args, Debug)]
pub struct SqlArgs {
    pub file: PathBuf,
    /// Database URL, e.g. sqlite://site.db
    #[arg(long)]
    pub database: String,
    #[arg(long, requires = "new_prefix")]
    pub old_prefix: Option<String>,
    #[arg(long, requires = "old_prefix")]
    pub new_prefix: Option<String>,
}

#[derive(Args, Debug)]
pub struct TrArgs {
    pub token: String,
    /// Values for %0%, %1%, ...
    pub args: Vec<String>,
    /// Plural message; enables plural mode with --count
    #[arg(long, requires = "count")]
    pub plural: Option<String>,
    #[arg(long)]
    pub count: Option<u64>,
    /// Locale overriding the configured one
    #[arg(long)]
    pub locale: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Set a configuration value by its dotted key
    #[command(after_help = "Keys:
  site.server_admin  site.http_host  site.locale  site.locale_dir
  mail.backend  mail.smtp_host  mail.smtp_port  mail.smtp_username
  mail.file_dir  mail.timeout_secs  http.timeout_secs  http.max_retries")]
    Set { key: String, value: String },
}
