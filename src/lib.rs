pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod nominatim;
pub mod request;
pub mod response;
pub mod util;

pub use client::{Client, ClientBuilder, JsonClient};
pub use error::{Error, Result};
pub use nominatim::{NominatimApi, NOMINATIM_PATH_PREFIX};
pub use request::{build_search_url, SearchRequest};
pub use response::{decode_search_results, Address, SearchResponse, SearchResult};
