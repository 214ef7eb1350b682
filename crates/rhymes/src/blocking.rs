//! Synchronous client built on `reqwest::blocking`.
//!
//! Each call blocks the current thread until the response arrives or the
//! configured timeout expires. Do not create or use this client from inside an
//! async runtime; use [`crate::RhymeClient`] there.

use reqwest::Url;

use crate::rhymebrain_api::{
    parse_portmanteaus, parse_rhymes, parse_word_info, ApiRequest, Function,
};
use crate::{
    ClientBuilder, ClientConfig, Portmanteau, RhymeError, RhymeRecord, Rhymes, TransportError,
    WordInfo,
};

#[derive(Debug, Clone)]
pub struct RhymeClient {
    client: reqwest::blocking::Client,
    config: ClientConfig,
    endpoint: Url,
}

impl RhymeClient {
    pub fn new() -> Result<Self, RhymeError> {
        Self::with_config(ClientConfig::default())
    }

    /// Finish with [`ClientBuilder::build_blocking`].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, RhymeError> {
        let endpoint = config.validate()?;
        let client = reqwest::blocking::Client::builder()
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

    pub fn rhymes(
        &self,
        word: &str,
        lang: Option<&str>,
        max_results: Option<usize>,
    ) -> Result<Rhymes, RhymeError> {
        let request = self.config.request(Function::GetRhymes, word, lang, max_results)?;
        let records = parse_rhymes(&self.fetch(&request)?)?;
        tracing::debug!(word = %request.word, count = records.len(), "received rhymes");
        Ok(Rhymes::new(records))
    }

    pub fn rhyme_list(
        &self,
        word: &str,
        lang: Option<&str>,
        max_results: Option<usize>,
    ) -> Result<Vec<RhymeRecord>, RhymeError> {
        Ok(self.rhymes(word, lang, max_results)?.collect())
    }

    pub fn word_info(&self, word: &str, lang: Option<&str>) -> Result<WordInfo, RhymeError> {
        let request = self.config.request(Function::GetWordInfo, word, lang, None)?;
        Ok(parse_word_info(&self.fetch(&request)?)?)
    }

    pub fn portmanteaus(
        &self,
        word: &str,
        lang: Option<&str>,
        max_results: Option<usize>,
    ) -> Result<Vec<Portmanteau>, RhymeError> {
        let request = self.config.request(Function::GetPortmanteaus, word, lang, max_results)?;
        Ok(parse_portmanteaus(&self.fetch(&request)?)?)
    }

    fn fetch(&self, request: &ApiRequest) -> Result<Vec<u8>, RhymeError> {
        tracing::debug!(
            function = request.function.name(),
            word = %request.word,
            lang = %request.lang,
            max_results = ?request.max_results,
            "sending request to rhyme service"
        );
        let res = self
            .client
            .get(self.endpoint.clone())
            .query(&request.params())
            .send()
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
        let body = res.bytes().map_err(TransportError::Request)?;
        Ok(body.to_vec())
    }
}
