use std::path::PathBuf;

/// Countries the sweep knows how to enumerate. Fixed set; only the US is
/// deployed today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Country {
    Usa,
}

impl Country {
    /// Loose bounding box for coverage-report sanity checks. Spans CONUS
    /// plus Alaska, Hawaii, and Puerto Rico; coordinates outside are
    /// dropped silently.
    #[must_use]
    pub fn bounds(self) -> (f64, f64, f64, f64) {
        match self {
            // (min_lat, max_lat, min_lng, max_lng)
            Country::Usa => (17.5, 71.5, -180.0, -64.5),
        }
    }

    #[must_use]
    pub fn contains(self, lat: f64, lng: f64) -> bool {
        let (min_lat, max_lat, min_lng, max_lng) = self.bounds();
        lat >= min_lat && lat <= max_lat && lng >= min_lng && lng <= max_lng
    }
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Country::Usa => write!(f, "us"),
        }
    }
}

/// What a permanent per-cell fetch failure does to the run.
///
/// `Abort` preserves the exhaustive-coverage guarantee: one dead cell fails
/// the whole sweep. `SkipAndRecord` trades that for partial coverage; the
/// failed cells end up in the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    #[default]
    Abort,
    SkipAndRecord,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env_name: String,
    pub log_level: String,
    pub country: Country,
    /// Coverage-skip radius in miles. `None` disables skip-on-coverage:
    /// every cell is queried regardless of prior discoveries.
    pub max_radius_miles: Option<f64>,
    /// `distance` parameter sent to the store-finder API per query.
    pub query_distance_miles: f64,
    /// Result cap per query, passed to the fetch layer.
    pub max_search_results: u32,
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub inter_request_delay_ms: u64,
    /// `code,lat,lng` CSV of cell centroids. Absent → built-in seed list.
    pub cells_path: Option<PathBuf>,
    pub output_path: PathBuf,
    pub failure_policy: FailurePolicy,
    /// Only emit stores offering this in-store service. Absent → emit all.
    pub require_service: Option<String>,
}
