pub mod client;
pub mod error;
pub mod fetcher;
pub mod hours;
pub mod normalize;
mod retry;
pub mod types;

pub use client::StoreFinderClient;
pub use error::ScraperError;
pub use fetcher::SweepFetcher;
pub use hours::human_hours;
pub use normalize::{add_walmart, normalize_store, LOCATOR_DOMAIN};
pub use types::{StoreFinderResponse, StorePayload};
