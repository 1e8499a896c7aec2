//! Bridges [`StoreFinderClient`] into the traversal's fetch seam.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use storesweep_search::{Cell, CellFetcher, Discovered, FetchOutcome, GeoPoint};

use crate::client::StoreFinderClient;
use crate::error::ScraperError;
use crate::types::StorePayload;

/// [`CellFetcher`] implementation wrapping the store-finder client.
///
/// Applies the inter-request delay before every query except the first; the
/// target API is rate- and proxy-sensitive, and the session already
/// guarantees queries never overlap.
pub struct SweepFetcher {
    client: StoreFinderClient,
    inter_request_delay_ms: u64,
    first_request: AtomicBool,
}

impl SweepFetcher {
    #[must_use]
    pub fn new(client: StoreFinderClient, inter_request_delay_ms: u64) -> Self {
        Self {
            client,
            inter_request_delay_ms,
            first_request: AtomicBool::new(true),
        }
    }
}

impl CellFetcher for SweepFetcher {
    type Record = StorePayload;
    type Error = ScraperError;

    async fn fetch_cell(&self, cell: &Cell) -> Result<FetchOutcome<StorePayload>, ScraperError> {
        if !self.first_request.swap(false, Ordering::Relaxed) && self.inter_request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.inter_request_delay_ms)).await;
        }

        let stores = self.client.fetch_stores(&cell.code).await?;
        Ok(FetchOutcome::new(
            stores
                .into_iter()
                .map(|store| Discovered {
                    point: store.coordinates().map(|(lat, lng)| GeoPoint { lat, lng }),
                    record: store,
                })
                .collect(),
        ))
    }
}
