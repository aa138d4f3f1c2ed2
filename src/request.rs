use crate::error::Result;
use serde::{Deserialize, Serialize};
use url::Url;

/// A place search. When `query` is non-empty it is sent as free text and the
/// structured address fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub query: String,
    pub street: String,
    pub city: String,
    pub county: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    /// Zero leaves the limit to the service.
    pub limit: u32,
    pub country_codes: Vec<String>,
    /// Only used when it holds exactly four values.
    pub view_box: Vec<f64>,
    pub exclude_place_ids: Vec<String>,
    pub bounded: Option<bool>,
    pub route_width: Option<f64>,
    pub osm_type: String,
    pub osm_id: String,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    fn structured_fields(&self) -> [(&'static str, &str); 6] {
        [
            ("street", self.street.as_str()),
            ("city", self.city.as_str()),
            ("county", self.county.as_str()),
            ("state", self.state.as_str()),
            ("country", self.country.as_str()),
            ("postalcode", self.postal_code.as_str()),
        ]
    }
}

/// Builds the full search URL, including the API key when one is set.
/// Pure string construction; fails only if `base_url` is not a valid URL.
pub fn build_search_url(
    base_url: &str,
    path_prefix: &str,
    request: &SearchRequest,
    key: &str,
) -> Result<String> {
    let mut url = Url::parse(&format!("{base_url}{path_prefix}/search.php"))?;

    {
        let mut q = url.query_pairs_mut();
        q.append_pair("format", "json");
        q.append_pair("addressdetails", "1");

        if !request.query.is_empty() {
            q.append_pair("q", &request.query);
        } else {
            for (name, value) in request.structured_fields() {
                if !value.is_empty() {
                    q.append_pair(name, value);
                }
            }
        }

        if request.limit > 0 {
            q.append_pair("limit", &request.limit.to_string());
        }
        if !request.country_codes.is_empty() {
            q.append_pair("countrycodes", &request.country_codes.join(","));
        }
        if request.view_box.len() == 4 {
            q.append_pair("viewbox", &join_floats(&request.view_box));
        }
        if !request.exclude_place_ids.is_empty() {
            q.append_pair("exclude_place_ids", &request.exclude_place_ids.join(","));
        }
        if let Some(bounded) = request.bounded {
            q.append_pair("bounded", if bounded { "1" } else { "0" });
        }
        if let Some(width) = request.route_width {
            q.append_pair("routewidth", &width.to_string());
        }
        if !request.osm_type.is_empty() {
            q.append_pair("osm_type", &request.osm_type);
        }
        if !request.osm_id.is_empty() {
            q.append_pair("osm_id", &request.osm_id);
        }
        if !key.is_empty() {
            q.append_pair("key", key);
        }
    }

    Ok(url.into())
}

fn join_floats(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
