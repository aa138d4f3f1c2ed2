use crate::error::Result;
use crate::util::string_or_number;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull, DisplayFromStr};
use std::fmt;

/// Results in the order the service ranked them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<Vec<SearchResult>>", into = "Vec<SearchResult>")]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

impl SearchResponse {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SearchResult> {
        self.results.iter()
    }
}

// The service answers `null` instead of `[]` in a few error paths.
impl From<Option<Vec<SearchResult>>> for SearchResponse {
    fn from(results: Option<Vec<SearchResult>>) -> Self {
        Self {
            results: results.unwrap_or_default(),
        }
    }
}

impl From<SearchResponse> for Vec<SearchResult> {
    fn from(response: SearchResponse) -> Self {
        response.results
    }
}

impl IntoIterator for SearchResponse {
    type Item = SearchResult;
    type IntoIter = std::vec::IntoIter<SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    pub address: Option<Address>,
    /// South, north, west, east
    #[serde(rename = "boundingbox", skip_serializing_if = "Option::is_none")]
    #[serde_as(as = "Option<[DisplayFromStr; 4]>")]
    pub bounding_box: Option<[f64; 4]>,
    #[serde_as(as = "DefaultOnNull")]
    pub class: String,
    #[serde_as(as = "DefaultOnNull")]
    pub display_name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub importance: f64,
    #[serde(rename = "lat")]
    #[serde_as(as = "DisplayFromStr")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    #[serde_as(as = "DisplayFromStr")]
    pub longitude: f64,
    #[serde(deserialize_with = "string_or_number")]
    pub osm_id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub osm_type: String,
    #[serde(deserialize_with = "string_or_number")]
    pub place_id: String,
    #[serde(rename = "type")]
    #[serde_as(as = "DefaultOnNull")]
    pub place_type: String,
    // Wire key is spelled "licence"
    #[serde(rename = "licence")]
    #[serde_as(as = "DefaultOnNull")]
    pub license: String,
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} ({}, {})",
            self.display_name, self.latitude, self.longitude
        )
    }
}

#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    #[serde_as(as = "DefaultOnNull")]
    pub city: String,
    #[serde_as(as = "DefaultOnNull")]
    pub city_district: String,
    #[serde_as(as = "DefaultOnNull")]
    pub continent: String,
    #[serde_as(as = "DefaultOnNull")]
    pub country: String,
    #[serde_as(as = "DefaultOnNull")]
    pub country_code: String,
    #[serde_as(as = "DefaultOnNull")]
    pub county: String,
    #[serde_as(as = "DefaultOnNull")]
    pub hamlet: String,
    #[serde_as(as = "DefaultOnNull")]
    pub house_number: String,
    #[serde_as(as = "DefaultOnNull")]
    pub pedestrian: String,
    #[serde_as(as = "DefaultOnNull")]
    pub neighbourhood: String,
    #[serde_as(as = "DefaultOnNull")]
    pub postcode: String,
    #[serde_as(as = "DefaultOnNull")]
    pub road: String,
    #[serde_as(as = "DefaultOnNull")]
    pub state: String,
    #[serde_as(as = "DefaultOnNull")]
    pub state_district: String,
    #[serde_as(as = "DefaultOnNull")]
    pub suburb: String,
}

/// Decodes a search response body. The top level must be a JSON array.
pub fn decode_search_results(body: &str) -> Result<SearchResponse> {
    Ok(serde_json::from_str(body)?)
}
