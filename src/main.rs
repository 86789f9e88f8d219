use clap::Parser;
use color_eyre::Result;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::info;

use nearshifts::app::{App, BrowseOptions};
use nearshifts::config::{self, Config};
use nearshifts::listing::Coordinate;
use nearshifts::logging;
use nearshifts::query::FilterPatch;

#[derive(Parser, Debug)]
#[command(name = "nearshifts")]
#[command(about = "Browse job shifts near a location")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/nearshifts/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Latitude of the search origin
  #[arg(long, requires = "lon", allow_negative_numbers = true)]
  lat: Option<f64>,

  /// Longitude of the search origin
  #[arg(long, requires = "lat", allow_negative_numbers = true)]
  lon: Option<f64>,

  /// Case-insensitive text matched against company name, address and work types
  #[arg(short, long)]
  search: Option<String>,

  /// Lowest acceptable pay
  #[arg(long)]
  min_price: Option<f64>,

  /// Highest acceptable pay
  #[arg(long)]
  max_price: Option<f64>,

  /// Minimum company rating (0 disables the filter)
  #[arg(long)]
  min_rating: Option<f64>,

  /// Only shifts offering this work type id (repeatable)
  #[arg(short = 'w', long = "work-type")]
  work_types: Vec<i64>,

  /// Bypass the cache and fetch fresh listings
  #[arg(short, long)]
  refresh: bool,

  /// Sort output by distance, nearest first
  #[arg(short, long)]
  nearest: bool,

  /// Remove all cached listings
  #[arg(long)]
  clear_cache: bool,

  /// Show full details for one shift id
  #[arg(long)]
  show: Option<String>,
}

impl Args {
  fn into_options(self) -> BrowseOptions {
    let coordinate = match (self.lat, self.lon) {
      (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
      _ => None,
    };

    let work_type_ids = if self.work_types.is_empty() {
      None
    } else {
      Some(self.work_types.into_iter().collect::<BTreeSet<_>>())
    };

    BrowseOptions {
      coordinate,
      search: self.search,
      filters: FilterPatch {
        min_price: self.min_price,
        max_price: self.max_price,
        min_rating: self.min_rating,
        work_type_ids,
      },
      refresh: self.refresh,
      nearest: self.nearest,
      clear_cache: self.clear_cache,
      show: self.show,
    }
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let config = Config::load(args.config.as_deref())?;

  // Logs go to a file so they never mix with listing output
  let _guard = logging::init(&config::data_dir()?.join("logs"))?;
  info!(api = %config.api.base_url, backend = ?config.cache.backend, "starting");

  let app = App::new(config)?;
  app.run(args.into_options()).await?;

  Ok(())
}
