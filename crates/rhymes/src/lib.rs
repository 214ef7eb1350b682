//! Client for the [RhymeBrain](https://rhymebrain.com) rhyme lookup API.
//!
//! ```no_run
//! # async fn run() -> Result<(), rhymes::RhymeError> {
//! let client = rhymes::RhymeClient::builder().default_language("en").build()?;
//! for rhyme in client.rhymes("cat", None, Some(10)).await? {
//!     println!("{rhyme} {:?}", rhyme.score());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! A synchronous client with the same operations lives in [`blocking`].

use std::iter::FusedIterator;

use reqwest::Url;
use rhymebrain_api::{parse_portmanteaus, parse_rhymes, parse_word_info, ApiRequest, Function};

pub mod blocking;
mod config;
mod record;
mod rhymebrain_api;

pub use config::{
    ClientBuilder, ClientConfig, DEFAULT_LANGUAGE, DEFAULT_TIMEOUT, RHYMEBRAIN_API_URL,
};
pub use record::{Flags, Portmanteau, RhymeRecord, WordInfo, MAX_FREQUENCY, PERFECT_RHYME_SCORE};
pub use rhymebrain_api::language_code;

#[derive(Debug, thiserror::Error)]
pub enum RhymeError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    /// Raised before any request is sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid client configuration: {0}")]
    Config(String),
}

/// The request did not complete or the service answered with a non-success status.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request to the rhyme service failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("rhyme service responded with {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
}

/// The service answered, but not with something this client understands.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("response is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("expected {expected} in response, found {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },
    #[error("record {index} in response is malformed: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error(
        "rhyme service reported an error: {}",
        .message.as_deref().unwrap_or("no message given")
    )]
    Service { message: Option<String> },
}

/// Rhymes in the order the service ranked them.
///
/// The response has already been read and validated, so iterating cannot fail.
/// The sequence can be consumed once.
#[derive(Debug)]
pub struct Rhymes {
    records: std::vec::IntoIter<RhymeRecord>,
}

impl Rhymes {
    pub(crate) fn new(records: Vec<RhymeRecord>) -> Self {
        Self {
            records: records.into_iter(),
        }
    }
}

impl Iterator for Rhymes {
    type Item = RhymeRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.records.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

impl ExactSizeIterator for Rhymes {}

impl FusedIterator for Rhymes {}

#[derive(Debug, Clone)]
pub struct RhymeClient {
    client: reqwest::Client,
    config: ClientConfig,
    endpoint: Url,
}

impl RhymeClient {
    /// A client for the public RhymeBrain service with default settings.
    pub fn new() -> Result<Self, RhymeError> {
        Self::with_config(ClientConfig::default())
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, RhymeError> {
        let endpoint = config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|error| RhymeError::Config(format!("failed to create http client: {error}")))?;
        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Looks up rhymes for `word`.
    ///
    /// `lang` falls back to the configured default language. Without
    /// `max_results` the service picks how many words to return based on how
    /// many good rhymes exist.
    pub async fn rhymes(
        &self,
        word: &str,
        lang: Option<&str>,
        max_results: Option<usize>,
    ) -> Result<Rhymes, RhymeError> {
        let request = self.config.request(Function::GetRhymes, word, lang, max_results)?;
        let body = self.fetch(&request).await?;
        let records = parse_rhymes(&body)?;
        tracing::debug!(word = %request.word, count = records.len(), "received rhymes");
        Ok(Rhymes::new(records))
    }

    /// Same as [`RhymeClient::rhymes`], collected into a `Vec`.
    pub async fn rhyme_list(
        &self,
        word: &str,
        lang: Option<&str>,
        max_results: Option<usize>,
    ) -> Result<Vec<RhymeRecord>, RhymeError> {
        Ok(self.rhymes(word, lang, max_results).await?.collect())
    }

    pub async fn word_info(&self, word: &str, lang: Option<&str>) -> Result<WordInfo, RhymeError> {
        let request = self.config.request(Function::GetWordInfo, word, lang, None)?;
        let body = self.fetch(&request).await?;
        Ok(parse_word_info(&body)?)
    }

    pub async fn portmanteaus(
        &self,
        word: &str,
        lang: Option<&str>,
        max_results: Option<usize>,
    ) -> Result<Vec<Portmanteau>, RhymeError> {
        let request = self.config.request(Function::GetPortmanteaus, word, lang, max_results)?;
        let body = self.fetch(&request).await?;
        Ok(parse_portmanteaus(&body)?)
    }

    async fn fetch(&self, request: &ApiRequest) -> Result<Vec<u8>, RhymeError> {
        tracing::debug!(
            function = request.function.name(),
            word = %request.word,
            lang = %request.lang,
            max_results = ?request.max_results,
            "sending request to rhyme service"
        );
        let res: reqwest::Response = self
            .client
            .get(self.endpoint.clone())
            .query(&request.params())
            .send()
            .await
            .map_err(|error| {
                tracing::warn!(%error, "rhyme service request failed");
                TransportError::Request(error)
            })?;
        let status = res.status();
        if !status.is_success() {
            tracing::warn!(%status, url = %res.url(), "rhyme service returned an error status");
            return Err(TransportError::Status {
                status,
                url: res.url().to_string(),
            }
            .into());
        }
        let body = res.bytes().await.map_err(TransportError::Request)?;
        Ok(body.to_vec())
    }
}

/// Shorthand for [`RhymeClient::new`] followed by [`RhymeClient::rhymes`].
pub async fn rhymes(
    word: &str,
    lang: Option<&str>,
    max_results: Option<usize>,
) -> Result<Rhymes, RhymeError> {
    RhymeClient::new()?.rhymes(word, lang, max_results).await
}

/// Shorthand for [`RhymeClient::new`] followed by [`RhymeClient::rhyme_list`].
pub async fn rhyme_list(
    word: &str,
    lang: Option<&str>,
    max_results: Option<usize>,
) -> Result<Vec<RhymeRecord>, RhymeError> {
    RhymeClient::new()?.rhyme_list(word, lang, max_results).await
}
