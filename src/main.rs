use anyhow::Result;

fn main() -> Result<()> {
    nominatim_search::cli::cli()
}
