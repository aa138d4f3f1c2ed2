use crate::config::Config;
use crate::logging::{setup_logging, LogLevel};
use crate::request::SearchRequest;
use crate::response::SearchResponse;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

fn default(path: &Path) -> String {
    format!("[default: {}]", path.as_os_str().to_string_lossy())
}

/// Search OpenStreetMap places through the Nominatim API
#[derive(Parser, Debug, Serialize)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long = "config", value_name = "FILE", help = default(&Config::default_path()))]
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Service root, e.g. https://open.mapquestapi.com
    #[arg(short, long, value_name = "URL")]
    #[serde(skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,

    /// API key appended to every request
    #[arg(short = 'k', long, value_name = "KEY")]
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,

    /// [default: info]
    #[arg(short, long)]
    #[serde(skip)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    #[serde(skip)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for places and print the matches
    Search {
        #[command(flatten)]
        request: RequestArgs,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the URL a search would request without sending it
    Url {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Write the effective configuration to the config file
    InitConfig,
}

#[derive(Args, Debug, Default)]
struct RequestArgs {
    /// Free-text query. Takes precedence over the address fields
    query: Option<String>,
    #[arg(long)]
    street: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    county: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    country: Option<String>,
    #[arg(long = "postalcode")]
    postal_code: Option<String>,
    /// Maximum number of results
    #[arg(short = 'n', long, default_value_t = 0)]
    limit: u32,
    /// ISO 3166-1 alpha-2 code, repeatable or comma separated
    #[arg(long = "country-code", value_name = "CC", value_delimiter = ',')]
    country_codes: Vec<String>,
    /// Preferred area as four coordinates
    #[arg(long, value_name = "W,S,E,N", value_delimiter = ',', allow_hyphen_values = true)]
    viewbox: Vec<f64>,
    /// Place ID to leave out of the results
    #[arg(long = "exclude", value_name = "PLACE_ID", value_delimiter = ',')]
    exclude_place_ids: Vec<String>,
    /// Only return results inside the viewbox
    #[arg(long, conflicts_with = "unbounded")]
    bounded: bool,
    /// Use the viewbox as a preference only
    #[arg(long)]
    unbounded: bool,
    #[arg(long)]
    route_width: Option<f64>,
    #[arg(long)]
    osm_type: Option<String>,
    #[arg(long)]
    osm_id: Option<String>,
}

impl From<RequestArgs> for SearchRequest {
    fn from(args: RequestArgs) -> Self {
        let bounded = match (args.bounded, args.unbounded) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        };
        SearchRequest {
            query: args.query.unwrap_or_default(),
            street: args.street.unwrap_or_default(),
            city: args.city.unwrap_or_default(),
            county: args.county.unwrap_or_default(),
            state: args.state.unwrap_or_default(),
            country: args.country.unwrap_or_default(),
            postal_code: args.postal_code.unwrap_or_default(),
            limit: args.limit,
            country_codes: args.country_codes,
            view_box: args.viewbox,
            exclude_place_ids: args.exclude_place_ids,
            bounded,
            route_width: args.route_width,
            osm_type: args.osm_type.unwrap_or_default(),
            osm_id: args.osm_id.unwrap_or_default(),
        }
    }
}

fn to_request(args: RequestArgs) -> SearchRequest {
    let request = SearchRequest::from(args);
    if !request.view_box.is_empty() && request.view_box.len() != 4 {
        warn!(
            "Ignoring viewbox with {} values, expected 4",
            request.view_box.len()
        );
    }
    if !request.query.is_empty() && has_address(&request) {
        warn!("Address fields are ignored when a query is given");
    }
    request
}

fn has_address(request: &SearchRequest) -> bool {
    [
        &request.street,
        &request.city,
        &request.county,
        &request.state,
        &request.country,
        &request.postal_code,
    ]
    .iter()
    .any(|field| !field.is_empty())
}

pub fn cli() -> Result<()> {
    let args = Cli::parse();

    let mut config = Config::from_cli(&args)?;
    if let Some(level) = args.log_level {
        config.main.logging.console_level = level;
        config.main.logging.file_level = level;
    }
    let _guard = setup_logging(&config.main.logging)?;
    debug!("Command line arguments: {:#?}", &args);

    match args.command {
        Some(Commands::Search { request, json }) => search(&config, to_request(request), json)?,
        Some(Commands::Url { request }) => print_url(&config, to_request(request))?,
        Some(Commands::InitConfig) => config.write_config_file()?,
        None => {}
    }
    Ok(())
}

fn search(config: &Config, request: SearchRequest, json: bool) -> Result<()> {
    let client = config.main.client();
    let response = client.nominatim().search(&request)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else if response.is_empty() {
        info!("No search results");
    } else {
        println!("{}", results_table(&response));
    }
    Ok(())
}

fn print_url(config: &Config, request: SearchRequest) -> Result<()> {
    let client = config.main.client();
    println!("{}", client.nominatim().search_url(&request)?);
    Ok(())
}

fn results_table(response: &SearchResponse) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "#",
        "Place ID",
        "Type",
        "Name",
        "Latitude",
        "Longitude",
        "Importance",
    ]);
    for (i, result) in response.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            result.place_id.clone(),
            format!("{}/{}", result.class, result.place_type),
            result.display_name.clone(),
            result.latitude.to_string(),
            result.longitude.to_string(),
            format!("{:.3}", result.importance),
        ]);
    }
    table
}
