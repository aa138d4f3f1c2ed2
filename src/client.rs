use crate::error::{Error, Result};
use crate::nominatim::{NominatimApi, NOMINATIM_PATH_PREFIX};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};
use ureq::{Agent, AgentBuilder};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://open.mapquestapi.com";
pub const USER_AGENT: &str = concat!("nominatim-search/", env!("CARGO_PKG_VERSION"));

/// What an API binding needs from the HTTP layer.
pub trait JsonClient {
    fn base_url(&self) -> &str;
    /// Empty when no key is configured.
    fn key(&self) -> &str;
    /// Performs one GET and decodes the body as JSON.
    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T>;
}

#[derive(Debug)]
pub struct Client {
    client: Agent,
    base_url: String,
    path_prefix: String,
    key: String,
}

impl Client {
    pub fn new() -> Client {
        ClientBuilder::default().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn path_prefix(&self) -> &str {
        &self.path_prefix
    }

    pub fn nominatim(&self) -> NominatimApi<'_, Client> {
        NominatimApi::new(self).with_path_prefix(&self.path_prefix)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonClient for Client {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn key(&self) -> &str {
        &self.key
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("Fetching {}", redact_key(url));
        match self.client.get(url).call() {
            Ok(response) => {
                let body = response.into_string()?;
                Ok(serde_json::from_str(&body)?)
            }
            Err(ureq::Error::Status(code, response)) => {
                error!("{} {} for {}", code, response.status_text(), redact_key(url));
                Err(Error::from(ureq::Error::Status(code, response)))
            }
            Err(err) => {
                error!("{err}");
                Err(err.into())
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClientBuilder {
    base_url: String,
    path_prefix: String,
    key: String,
    timeout: Duration,
    user_agent: String,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            path_prefix: NOMINATIM_PATH_PREFIX.to_string(),
            key: String::new(),
            timeout: Duration::from_secs(5),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl ClientBuilder {
    /// Trailing slashes are dropped so the path prefix joins cleanly.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn path_prefix(mut self, path_prefix: impl Into<String>) -> Self {
        self.path_prefix = path_prefix.into();
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Client {
        let client = AgentBuilder::new()
            .timeout_read(self.timeout)
            .timeout_write(self.timeout)
            .user_agent(&self.user_agent)
            .build();
        Client {
            client,
            base_url: self.base_url,
            path_prefix: self.path_prefix,
            key: self.key,
        }
    }
}

/// Masks the `key` query parameter so URLs can be logged.
pub fn redact_key(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };
    if !parsed.query_pairs().any(|(name, _)| name == "key") {
        return url.to_string();
    }
    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(name, value)| {
            let value = if name == "key" {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();
    parsed.query_pairs_mut().clear().extend_pairs(pairs);
    parsed.into()
}
