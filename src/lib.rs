//! Data store and query layer for browsing nearby job shifts.
//!
//! Listings are fetched from the remote shifts API, cached locally with a
//! time-to-live, and exposed through a [`store::ListingStore`] whose
//! snapshots can be narrowed with the [`query::QueryEngine`].

pub mod app;
pub mod cache;
pub mod config;
pub mod distance;
pub mod format;
pub mod listing;
pub mod logging;
pub mod query;
pub mod store;
