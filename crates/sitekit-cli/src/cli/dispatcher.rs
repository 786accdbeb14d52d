use crate::cli::command_handlers::{
    ConfigHandler, FileHandler, MailHandler, SqlHandler, TextHandler, TrHandler, UrlHandler,
    ValidateHandler,
};
use crate::cli::main_types::Commands;
use sitekit_core::api::HttpFetcher;
use sitekit_core::core::services::config_service::ConfigService;
use sitekit_core::core::services::mail_service::MailService;
use sitekit_core::error::AppError;
use sitekit_core::storage::config::Config;
use sitekit_core::utils::hash::GravatarOptions;
use sitekit_core::utils::logging::print_verbose;
use std::path::PathBuf;

pub struct Dispatcher {
    config: Config,
    config_path: Option<PathBuf>,
    verbose: bool,
}

impl Dispatcher {
    fn log_verbose(&self, msg: &str) {
        print_verbose(self.verbose, msg);
    }

    pub fn new(config: Config, config_path: Option<PathBuf>, verbose: bool) -> Self {
        Self {
            config,
            config_path,
            verbose,
        }
    }

    fn create_fetcher(&self) -> Result<HttpFetcher, AppError> {
        let fetcher = HttpFetcher::from_config(&self.config)?;
        self.log_verbose(&format!(
            "HTTP timeout {}s, {} retries",
            fetcher.timeout_secs(),
            self.config.http.max_retries
        ));
        Ok(fetcher)
    }

    fn create_mail_service(&self) -> Result<MailService, AppError> {
        let service = MailService::from_config(&self.config)?;
        self.log_verbose(&format!("Mail backend: {}", service.transport_name()));
        Ok(service)
    }

    fn create_config_service(&self) -> ConfigService {
        ConfigService::new(self.config.clone())
    }

    pub async fn dispatch(&self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::Validate(args) => {
                let validator = self.config.validation.field_validator();
                ValidateHandler::new().handle(args, &validator, self.verbose)
            }
            Commands::Escape { text, strip } => {
                TextHandler::new().escape(&text, strip);
                Ok(())
            }
            Commands::Wrap { text, width } => TextHandler::new().wrap(&text, width),
            Commands::Gravatar {
                email,
                default,
                size,
                rating,
            } => {
                let options = GravatarOptions {
                    default_type: default,
                    size,
                    rating,
                };
                TextHandler::new().gravatar(&email, options);
                Ok(())
            }
            Commands::Hash { length } => {
                TextHandler::new().hash(length, self.verbose);
                Ok(())
            }
            Commands::Dir { command } => FileHandler::new().handle_dir(command, self.verbose),
            Commands::Zip { file, dir } => FileHandler::new().zip(&file, &dir, self.verbose),
            Commands::DataUri { file } => FileHandler::new().data_uri(&file),
            Commands::Url { command } => {
                let fetcher = self.create_fetcher()?;
                UrlHandler::new()
                    .handle(command, fetcher, self.verbose)
                    .await
            }
            Commands::Mail { command } => {
                let service = self.create_mail_service()?;
                MailHandler::new()
                    .handle(command, service, self.verbose)
                    .await
            }
            Commands::Sql(args) => SqlHandler::new().handle(args, self.verbose).await,
            Commands::Tr(args) => TrHandler::new().handle(args, &self.config, self.verbose),
            Commands::Config { command } => {
                let mut config_service = self.create_config_service();
                ConfigHandler::new().handle(
                    command,
                    &mut config_service,
                    self.config_path.clone(),
                    self.verbose,
                )
            }
        }
    }
}
