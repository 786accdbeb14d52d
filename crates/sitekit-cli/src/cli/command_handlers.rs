use crate::cli::main_types::{
    ConfigCommands, DirCommands, MailArgs, MailCommands, SqlArgs, TrArgs, UrlCommands,
    ValidateArgs,
};
use serde::Serialize;
use sitekit_core::api::HttpFetcher;
use sitekit_core::core::services::config_service::ConfigService;
use sitekit_core::core::services::mail_service::MailService;
use sitekit_core::display::TableDisplay;
use sitekit_core::error::{AppError, CliError, FileError};
use sitekit_core::i18n::Translator;
use sitekit_core::mail::MailParams;
use sitekit_core::sql::{PrefixReplacement, connect_sqlite, exec_file_query};
use sitekit_core::storage::config::Config;
use sitekit_core::utils::archive::zip_extract;
use sitekit_core::utils::file::{
    base64_data_uri, delete_dir, get_dir_list, is_directory, is_url_rewrite, normalize_dir_path,
};
use sitekit_core::utils::hash::{GravatarOptions, generate_hash, gravatar_url};
use sitekit_core::utils::logging::print_verbose;
use sitekit_core::utils::text::{escape, word_wrap};
use sitekit_core::utils::validation::{FieldValidator, Validation, validate_identical};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

fn invalid_arguments(message: impl Into<String>) -> AppError {
    AppError::Cli(CliError::InvalidArguments(message.into()))
}

fn table_display() -> TableDisplay {
    TableDisplay::new().with_colors(std::io::stdout().is_terminal())
}

#[derive(Serialize)]
struct FieldReport<'a> {
    field: &'a str,
    valid: bool,
    result: &'a Validation,
}

#[derive(Default)]
pub struct ValidateHandler;

impl ValidateHandler {
    pub fn new() -> Self {
        Self
    }

    fn prompt(label: &str) -> Result<String, AppError> {
        rpassword::prompt_password(label)
            .map_err(|e| invalid_arguments(format!("Failed to read {}: {}", label.trim(), e)))
    }

    pub fn handle(
        &self,
        args: ValidateArgs,
        validator: &FieldValidator,
        verbose: bool,
    ) -> Result<(), AppError> {
        let mut password = args.password;
        let mut confirm = args.confirm;
        if args.ask_password {
            password = Some(Self::prompt("Password: ")?);
            if confirm.is_none() {
                confirm = Some(Self::prompt("Confirm password: ")?);
            }
        }

        let mut rows: Vec<(&str, Validation)> = Vec::new();
        if let Some(username) = &args.username {
            rows.push(("username", validator.username(username)));
        }
        if let Some(password) = &password {
            rows.push(("password", validator.password(password)));
        }
        if let Some(confirm) = &confirm {
            let password = password
                .as_deref()
                .ok_or_else(|| invalid_arguments("--confirm needs --password or --ask-password"))?;
            rows.push(("confirm", validate_identical(password, confirm)));
        }
        if let Some(email) = &args.email {
            rows.push(("email", validator.email(email)));
        }
        if let Some(name) = &args.name {
            rows.push(("name", validator.name(name)));
        }

        if rows.is_empty() {
            return Err(invalid_arguments(
                "Nothing to validate. Use --username, --password, --email or --name",
            ));
        }
        print_verbose(verbose, &format!("Validating {} field(s)", rows.len()));

        if args.json {
            let report: Vec<FieldReport> = rows
                .iter()
                .map(|(field, result)| FieldReport {
                    field: *field,
                    valid: result.is_valid(),
                    result,
                })
                .collect();
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| invalid_arguments(format!("Failed to serialize report: {}", e)))?;
            println!("{}", json);
        } else {
            println!("{}", table_display().render_validations(&rows));
        }

        // Exit status reflects the first rejected field
        for (field, result) in rows {
            result.into_result(field)?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct TextHandler;

impl TextHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn escape(&self, text: &str, strip: bool) {
        println!("{}", escape(text, strip));
    }

    pub fn wrap(&self, text: &str, width: usize) -> Result<(), AppError> {
        if width == 0 {
            return Err(invalid_arguments("--width must be at least 1"));
        }
        println!("{}", word_wrap(text, width));
        Ok(())
    }

    pub fn gravatar(&self, email: &str, options: GravatarOptions) {
        println!("{}", gravatar_url(email, &options));
    }

    pub fn hash(&self, length: usize, verbose: bool) {
        print_verbose(verbose, &format!("Generating a {} character hash", length));
        println!("{}", generate_hash(length));
    }
}

#[derive(Default)]
pub struct FileHandler;

impl FileHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_dir(&self, command: DirCommands, verbose: bool) -> Result<(), AppError> {
        match command {
            DirCommands::List { path } => {
                print_verbose(verbose, &format!("Listing {}", path.display()));
                let names = get_dir_list(&path)?;
                if names.is_empty() {
                    println!("No sub-directories in {}", path.display());
                } else {
                    let rows: Vec<Vec<String>> = names.into_iter().map(|n| vec![n]).collect();
                    println!("{}", table_display().render_simple_table(&["Directory"], &rows));
                }
                Ok(())
            }
            DirCommands::Check { path } => {
                if is_directory(&path) {
                    println!("✅ {} is a writable directory", path);
                    Ok(())
                } else {
                    Err(invalid_arguments(format!(
                        "{} is not a writable directory",
                        path
                    )))
                }
            }
            DirCommands::Delete { path, yes } => {
                if !yes {
                    return Err(invalid_arguments(format!(
                        "Refusing to delete {} without --yes",
                        path.display()
                    )));
                }
                delete_dir(&path)?;
                println!("🗑️  Deleted {}", path.display());
                Ok(())
            }
            DirCommands::Normalize { path } => {
                println!("{}", normalize_dir_path(&path));
                Ok(())
            }
            DirCommands::Rewrite { dir, file } => {
                if is_url_rewrite(&dir, file.as_deref()) {
                    println!("URL rewriting is enabled in {}", dir.display());
                } else {
                    println!("URL rewriting is not enabled in {}", dir.display());
                }
                Ok(())
            }
        }
    }

    pub fn zip(&self, file: &Path, dir: &Path, verbose: bool) -> Result<(), AppError> {
        print_verbose(
            verbose,
            &format!("Extracting {} into {}", file.display(), dir.display()),
        );
        zip_extract(file, dir)?;
        println!("✅ Extracted {} into {}", file.display(), dir.display());
        Ok(())
    }

    pub fn data_uri(&self, file: &Path) -> Result<(), AppError> {
        println!("{}", base64_data_uri(file)?);
        Ok(())
    }
}

#[derive(Default)]
pub struct UrlHandler;

impl UrlHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: UrlCommands,
        fetcher: HttpFetcher,
        verbose: bool,
    ) -> Result<(), AppError> {
        match command {
            UrlCommands::Check { url } => {
                print_verbose(
                    verbose,
                    &format!("Checking {} ({}s timeout)", url, fetcher.timeout_secs()),
                );
                if fetcher.check_url(&url).await {
                    println!("✅ {} is reachable", url);
                    Ok(())
                } else {
                    Err(invalid_arguments(format!("{} is not reachable", url)))
                }
            }
            UrlCommands::Fetch { url, retry } => {
                print_verbose(verbose, &format!("Fetching {}", url));
                let body = if retry {
                    fetcher.get_file_contents_with_retry(&url).await?
                } else {
                    fetcher.get_file_contents(&url).await?
                };
                print!("{}", body);
                Ok(())
            }
        }
    }
}

#[derive(Default)]
pub struct MailHandler;

impl MailHandler {
    pub fn new() -> Self {
        Self
    }

    fn params(args: MailArgs) -> Result<MailParams, AppError> {
        let body = match (args.body, args.body_file) {
            (Some(body), _) => body,
            (None, Some(path)) => std::fs::read_to_string(&path).map_err(|source| FileError::Io {
                path: path.display().to_string(),
                source,
            })?,
            (None, None) => return Err(invalid_arguments("Use --body or --body-file")),
        };

        let params = MailParams::new(args.to, args.subject, body);
        Ok(match args.from {
            Some(from) => params.with_from(from),
            None => params,
        })
    }

    pub async fn handle(
        &self,
        command: MailCommands,
        service: MailService,
        verbose: bool,
    ) -> Result<(), AppError> {
        match command {
            MailCommands::Preview(args) => {
                let mail = service.preview(&Self::params(args)?)?;
                print!("{}", String::from_utf8_lossy(&mail.to_rfc822()));
                Ok(())
            }
            MailCommands::Send(args) => {
                print_verbose(
                    verbose,
                    &format!("Sending through the {} backend", service.transport_name()),
                );
                let mail = service.send(&Self::params(args)?).await?;
                println!(
                    "✅ Sent '{}' to {} via {}",
                    mail.subject(),
                    mail.to(),
                    service.transport_name()
                );
                Ok(())
            }
        }
    }
}

#[derive(Default)]
pub struct SqlHandler;

impl SqlHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(&self, args: SqlArgs, verbose: bool) -> Result<(), AppError> {
        print_verbose(verbose, &format!("Opening {}", args.database));
        let pool = connect_sqlite(&args.database).await?;

        let prefix = match (&args.old_prefix, &args.new_prefix) {
            (Some(old), Some(new)) => Some(PrefixReplacement::new(old, new)),
            _ => None,
        };
        let result = exec_file_query(&pool, &args.file, prefix).await;
        pool.close().await;

        let affected = result?;
        println!(
            "✅ {} executed ({} rows affected)",
            args.file.display(),
            affected
        );
        Ok(())
    }
}

#[derive(Default)]
pub struct TrHandler;

impl TrHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, args: TrArgs, config: &Config, verbose: bool) -> Result<(), AppError> {
        let translator = match &args.locale {
            Some(locale) => {
                let mut config = config.clone();
                config.site.locale = Some(locale.clone());
                Translator::from_config(&config)
            }
            None => Translator::from_config(config),
        };
        print_verbose(
            verbose,
            &format!("Catalog locale: {}", translator.locale().unwrap_or("none")),
        );

        match (&args.plural, args.count) {
            (Some(plural), Some(count)) => {
                if !args.args.is_empty() {
                    return Err(invalid_arguments(
                        "Positional values are not used with --plural",
                    ));
                }
                println!("{}", translator.nt(&args.token, plural, count));
            }
            _ => {
                let values: Vec<&str> = args.args.iter().map(String::as_str).collect();
                println!("{}", translator.tr(&args.token, &values));
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct ConfigHandler;

impl ConfigHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(
        &self,
        command: ConfigCommands,
        config_service: &mut ConfigService,
        config_path: Option<PathBuf>,
        verbose: bool,
    ) -> Result<(), AppError> {
        match command {
            ConfigCommands::Show => {
                print_verbose(verbose, "Showing effective configuration");
                let entries = config_service.entries();
                let rows: Vec<(&str, Option<String>)> =
                    entries.into_iter().map(|e| (e.key, e.value)).collect();
                println!("{}", table_display().render_key_values(&rows));
                Ok(())
            }
            ConfigCommands::Set { key, value } => {
                config_service.set_field(&key, &value)?;
                config_service.save_config(config_path)?;
                println!("✅ Set {} to {}", key, value);
                Ok(())
            }
        }
    }
}
