use std::time::Duration;

use reqwest::Url;

use crate::rhymebrain_api::{language_code, ApiRequest, Function};
use crate::{blocking, RhymeClient, RhymeError};

pub const RHYMEBRAIN_API_URL: &str = "http://rhymebrain.com";

pub const DEFAULT_LANGUAGE: &str = "de";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings shared by the async and blocking clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service root; requests go to `<base_url>/talk`.
    pub base_url: String,
    /// ISO 639-1 code used when a call does not name a language.
    pub default_language: String,
    /// Applied to the whole request, from connecting until the body is read.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: RHYMEBRAIN_API_URL.to_owned(),
            default_language: DEFAULT_LANGUAGE.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl ClientConfig {
    /// Checks every setting and returns the `talk` endpoint.
    pub(crate) fn validate(&self) -> Result<Url, RhymeError> {
        if self.timeout.is_zero() {
            return Err(RhymeError::Config("timeout must be greater than zero".to_owned()));
        }
        language_code(&self.default_language).map_err(|_| {
            RhymeError::Config(format!(
                "default language {:?} is not an ISO 639-1 code",
                self.default_language
            ))
        })?;
        let endpoint = format!("{}/talk", self.base_url.trim().trim_end_matches('/'));
        let url = Url::parse(&endpoint).map_err(|error| {
            RhymeError::Config(format!("invalid base url {:?}: {error}", self.base_url))
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(RhymeError::Config(format!("unsupported scheme {scheme:?} in base url"))),
        }
    }

    /// Validates a call, falling back to the default language when `lang` is `None`.
    pub(crate) fn request(
        &self,
        function: Function,
        word: &str,
        lang: Option<&str>,
        max_results: Option<usize>,
    ) -> Result<ApiRequest, RhymeError> {
        let lang = lang.unwrap_or(self.default_language.as_str());
        ApiRequest::new(function, word, lang, max_results)
    }
}

/// Builder returned by [`RhymeClient::builder`] and [`blocking::RhymeClient::builder`].
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn default_language(mut self, lang: impl Into<String>) -> Self {
        self.config.default_language = lang.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build(self) -> Result<RhymeClient, RhymeError> {
        RhymeClient::with_config(self.config)
    }

    pub fn build_blocking(self) -> Result<blocking::RhymeClient, RhymeError> {
        blocking::RhymeClient::with_config(self.config)
    }
}
