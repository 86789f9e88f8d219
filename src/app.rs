//! Composition root: builds the store once and drives it from the command line.

use color_eyre::{eyre::eyre, Result};
use std::sync::Arc;
use tracing::warn;

use crate::cache::{KeyValueStorage, MemoryStorage, NoopStorage, SqliteStorage};
use crate::config::{CacheBackend, Config};
use crate::format::{
  format_distance, format_price, format_rating, format_time, format_workers, listing_line,
  work_type_label,
};
use crate::listing::{Coordinate, Listing, ListingCache, ShiftClient};
use crate::query::{FilterPatch, QueryEngine};
use crate::store::{ListingStore, RequestState, StoreSnapshot};

/// What the user asked to see.
#[derive(Debug, Clone, Default)]
pub struct BrowseOptions {
  /// Falls back to the configured location
  pub coordinate: Option<Coordinate>,
  pub search: Option<String>,
  pub filters: FilterPatch,
  /// Skip the cache and fetch from the network
  pub refresh: bool,
  /// Order output nearest first instead of server order
  pub nearest: bool,
  /// Purge cached listings before doing anything else
  pub clear_cache: bool,
  /// Print full details for one listing id
  pub show: Option<String>,
}

/// Main application state
pub struct App {
  config: Config,
  store: ListingStore<ShiftClient>,
}

impl App {
  pub fn new(config: Config) -> Result<Self> {
    let client = ShiftClient::new(&config.api)?;
    let ttl = config.cache.ttl().ok_or_else(|| {
      eyre!(
        "cache.ttl_minutes is out of range: {}",
        config.cache.ttl_minutes
      )
    })?;
    let cache = ListingCache::new(open_storage(&config)?).with_ttl(ttl);

    Ok(Self {
      store: ListingStore::new(client, cache),
      config,
    })
  }

  pub async fn run(&self, options: BrowseOptions) -> Result<()> {
    if options.clear_cache {
      self.store.clear_all().await;
      println!("Cache cleared.");
      if options.coordinate.is_none() && self.config.location.is_none() {
        return Ok(());
      }
    }

    let coordinate = options
      .coordinate
      .or(self.config.location)
      .ok_or_else(|| {
        eyre!("No location given. Pass --lat and --lon or set `location` in the config file.")
      })?;

    if !coordinate.is_valid() {
      warn!(?coordinate, "coordinate outside the valid range, distances may be meaningless");
    }

    if let Some(search) = &options.search {
      self.store.set_search_query(search.as_str());
    }
    if !options.filters.is_empty() {
      self.store.set_filters(options.filters.clone());
    }

    if options.refresh {
      self.store.refresh(coordinate).await;
    } else {
      self.store.load(coordinate).await;
    }

    let snapshot = self.store.snapshot();
    if snapshot.state == RequestState::Failed {
      let message = snapshot.error.as_deref().unwrap_or_default();
      return Err(eyre!("Failed to load shifts: {}. Run again to retry.", message));
    }

    if let Some(id) = &options.show {
      self.store.set_selected(id.as_str());
      let listing = self
        .store
        .selected()
        .ok_or_else(|| eyre!("No shift with id {} near this location", id))?;
      for line in render_detail(&listing, coordinate) {
        println!("{}", line);
      }
      return Ok(());
    }

    for line in render_list(&snapshot, coordinate, options.nearest) {
      println!("{}", line);
    }

    Ok(())
  }
}

/// Pick the storage backend; an unusable SQLite file degrades to memory.
fn open_storage(config: &Config) -> Result<Arc<dyn KeyValueStorage>> {
  let storage: Arc<dyn KeyValueStorage> = match config.cache.backend {
    CacheBackend::Sqlite => {
      let path = config.cache_path()?;
      match SqliteStorage::open(&path) {
        Ok(storage) => Arc::new(storage),
        Err(e) => {
          warn!(error = %e, "cache database unavailable, using in-memory cache");
          Arc::new(MemoryStorage::new())
        }
      }
    }
    CacheBackend::Memory => Arc::new(MemoryStorage::new()),
    CacheBackend::Disabled => Arc::new(NoopStorage),
  };

  Ok(storage)
}

/// Header plus one line per visible listing.
pub fn render_list(snapshot: &StoreSnapshot, origin: Coordinate, nearest: bool) -> Vec<String> {
  let visible = snapshot.filtered_items();

  let mut lines = vec![format!(
    "{} of {} shifts near {}, {}",
    visible.len(),
    snapshot.items.len(),
    origin.latitude,
    origin.longitude
  )];

  if visible.is_empty() {
    lines.push("No shifts match the current search and filters.".to_string());
    return lines;
  }

  if nearest {
    for (listing, distance) in QueryEngine::sorted_by_distance(&visible, origin) {
      lines.push(listing_line(listing, Some(distance)));
    }
  } else {
    for listing in visible {
      lines.push(listing_line(listing, listing.distance_from(Some(origin))));
    }
  }

  lines
}

/// Full description of one listing.
pub fn render_detail(listing: &Listing, origin: Coordinate) -> Vec<String> {
  let mut lines = vec![
    format!("{} ({})", listing.company_name, listing.id),
    format!("Address:  {}", listing.address),
    format!(
      "Distance: {}",
      format_distance(listing.distance_from(Some(origin)))
    ),
    format!(
      "When:     {} {}",
      listing.date_start,
      format_time(&listing.time_start, &listing.time_end)
    ),
    format!("Pay:      {}", format_price(listing.price_worker)),
  ];

  if listing.bonus_price_worker > 0.0 {
    lines.push(format!(
      "Bonus:    {}",
      format_price(listing.bonus_price_worker)
    ));
  }

  lines.push(format!(
    "Workers:  {} ({} open)",
    format_workers(listing.current_workers, listing.plan_workers),
    listing.open_slots()
  ));

  let work: Vec<&str> = listing
    .work_types
    .iter()
    .map(|w| work_type_label(w, listing.plan_workers))
    .collect();
  if !work.is_empty() {
    lines.push(format!("Work:     {}", work.join(", ")));
  }

  lines.push(format!(
    "Rating:   {} ({})",
    format_rating(listing.rating),
    listing.feedback_count
  ));

  if listing.promotion_enabled {
    lines.push("Promoted".to_string());
  }
  if !listing.logo.is_empty() {
    lines.push(format!("Logo:     {}", listing.logo));
  }

  lines
}
