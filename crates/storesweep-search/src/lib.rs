//! Geographic search-space traversal and coverage engine.
//!
//! Sweeps a country's postal-code cells against a bounded-radius store
//! locator, skipping cells already proven covered by earlier discoveries,
//! and guarantees every cell is either queried once or skipped with an
//! indexed discovery inside the configured radius of its centroid.

pub mod cells;
pub mod coverage;
pub mod error;
pub mod geo;
pub mod session;

pub use cells::{load_cells_from_csv, seed_cells, Cell, CellQueue, Draw};
pub use coverage::CoverageTracker;
pub use error::SearchError;
pub use geo::{haversine_miles, GeoPoint};
pub use session::{
    CellFetcher, Discovered, FetchOutcome, SearchSession, SessionError, SessionReport,
    SessionState,
};
