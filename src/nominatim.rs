use crate::client::JsonClient;
use crate::error::Result;
use crate::request::{build_search_url, SearchRequest};
use crate::response::SearchResponse;
use tracing::debug;

/// Default path prefix of the Nominatim endpoints on the MapQuest host.
pub const NOMINATIM_PATH_PREFIX: &str = "/nominatim/v1";

/// Place search backed solely by OpenStreetMap data.
#[derive(Debug)]
pub struct NominatimApi<'a, C> {
    client: &'a C,
    path_prefix: String,
}

impl<'a, C: JsonClient> NominatimApi<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self {
            client,
            path_prefix: NOMINATIM_PATH_PREFIX.to_string(),
        }
    }

    pub fn with_path_prefix(mut self, path_prefix: &str) -> Self {
        self.path_prefix = path_prefix.to_string();
        self
    }

    /// The URL `search` would request, key included.
    pub fn search_url(&self, request: &SearchRequest) -> Result<String> {
        build_search_url(
            self.client.base_url(),
            &self.path_prefix,
            request,
            self.client.key(),
        )
    }

    pub fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let url = self.search_url(request)?;
        let response: SearchResponse = self.client.get_json(&url)?;
        debug!("Search returned {} results", response.len());
        Ok(response)
    }
}
