//! Shift listings: domain types, the remote API client and the listing cache.

pub mod api_types;
pub mod cache;
pub mod client;
pub mod types;

pub use cache::ListingCache;
pub use client::{BoxFuture, FetchError, ListingRepository, ShiftClient};
pub use types::{Coordinate, Listing, ListingPage, WorkType};
