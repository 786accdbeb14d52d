use crate::error::FetchError;
use crate::storage::config::Config;
use crate::utils::retry::{RetryConfig, RetryExecutor};
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use std::time::Duration;

const USER_AGENT: &str = concat!("sitekit/", env!("CARGO_PKG_VERSION"));

/// Remote fetches with an explicit timeout
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    /// Same settings, redirects are not followed
    no_redirect: Client,
    timeout_secs: u64,
    retry: RetryConfig,
}

fn build_client(timeout_secs: u64, policy: Policy) -> Result<Client, FetchError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .redirect(policy)
        .build()
        .map_err(|e| FetchError::ClientInit {
            message: e.to_string(),
        })
}

impl HttpFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self, FetchError> {
        Ok(HttpFetcher {
            client: build_client(timeout_secs, Policy::default())?,
            no_redirect: build_client(timeout_secs, Policy::none())?,
            timeout_secs,
            retry: RetryConfig::default(),
        })
    }

    /// Fetcher using `[http]` timeout and retry settings
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Ok(Self::new(config.get_http_timeout_secs())?
            .with_retry(RetryConfig::with_max_retries(config.http.max_retries)))
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Body of `url` after following redirects
    ///
    /// A non-success final status is an error carrying the response body.
    pub async fn get_file_contents(&self, url: &str) -> Result<String, FetchError> {
        let response =
            crate::map_fetch_error!(self.client.get(url).send().await, url, self.timeout_secs)?;

        let status = response.status();
        let body = crate::map_fetch_error!(response.text().await, url, self.timeout_secs)?;

        if status.is_success() {
            log::debug!("Fetched {} bytes from {}", body.len(), url);
            Ok(body)
        } else {
            Err(FetchError::Http {
                status: status.as_u16(),
                url: url.to_string(),
                message: body,
            })
        }
    }

    /// [`get_file_contents`](Self::get_file_contents) retried on 5xx, 429 and timeouts
    pub async fn get_file_contents_with_retry(&self, url: &str) -> Result<String, FetchError> {
        RetryExecutor::new(self.retry.clone())
            .execute(|| self.get_file_contents(url))
            .await
    }

    /// Whether `url` answers 200 or 301 without following redirects
    ///
    /// Unreachable hosts answer `false`.
    pub async fn check_url(&self, url: &str) -> bool {
        match self.no_redirect.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                log::debug!("{} answered {}", url, status);
                status == StatusCode::OK || status == StatusCode::MOVED_PERMANENTLY
            }
            Err(e) => {
                log::debug!("{} unreachable: {}", url, e);
                false
            }
        }
    }
}
