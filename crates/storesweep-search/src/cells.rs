//! Search cells and the pending-cell queue.
//!
//! A cell is one postal code queried independently against the locator API.
//! The queue is built once from the country's code enumeration, shrinks
//! monotonically as cells are drawn, and may grow mid-run through widening
//! (`extend`). Cells proven covered by an earlier discovery are consumed
//! without being returned.

use std::collections::{HashSet, VecDeque};
use std::path::Path;

use storesweep_core::Country;

use crate::coverage::CoverageTracker;
use crate::error::SearchError;
use crate::geo::GeoPoint;

/// One geographic search unit. Immutable once enqueued.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub code: String,
    pub country: Country,
    /// Centroid when the code list provides one. Cells without a centroid
    /// can never be skipped — they cannot be proven covered.
    pub centroid: Option<GeoPoint>,
}

impl Cell {
    #[must_use]
    pub fn new(code: impl Into<String>, country: Country, centroid: Option<GeoPoint>) -> Self {
        Self {
            code: code.into(),
            country,
            centroid,
        }
    }
}

/// Result of drawing from the queue: a cell to query, or the explicit
/// terminal signal once every cell has been drawn or skipped.
#[derive(Debug, PartialEq)]
pub enum Draw {
    Cell(Cell),
    Done,
}

/// Pending cells for one sweep, with coverage-based skipping.
#[derive(Debug)]
pub struct CellQueue {
    pending: VecDeque<Cell>,
    /// Codes ever enqueued (pending or drawn). Widening with a code already
    /// seen is a no-op so no cell is visited twice.
    seen: HashSet<String>,
    coverage: CoverageTracker,
    country: Country,
    skipped: u64,
}

impl CellQueue {
    #[must_use]
    pub fn new(cells: Vec<Cell>, country: Country, max_radius_miles: Option<f64>) -> Self {
        let mut queue = Self {
            pending: VecDeque::new(),
            seen: HashSet::new(),
            coverage: CoverageTracker::new(max_radius_miles),
            country,
            skipped: 0,
        };
        queue.extend(cells);
        queue
    }

    /// Count of unqueried cells. Non-increasing between widening events.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Cells consumed as already-covered rather than returned.
    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Draws and removes one cell, skipping over any pending cell whose
    /// centroid is within the configured radius of a discovered point.
    pub fn next(&mut self) -> Draw {
        while let Some(cell) = self.pending.pop_front() {
            if let Some(distance) = cell
                .centroid
                .and_then(|c| self.coverage.covering_distance(c))
            {
                self.skipped += 1;
                tracing::debug!(
                    code = %cell.code,
                    distance_miles = format_args!("{distance:.1}"),
                    "skipping cell already covered by a prior discovery"
                );
                continue;
            }
            return Draw::Cell(cell);
        }
        Draw::Done
    }

    /// Reports a discovered coordinate into the coverage index.
    ///
    /// Coordinates outside the country bounds are dropped silently: coverage
    /// tracking is best-effort, never authoritative.
    pub fn found_location_at(&mut self, lat: f64, lng: f64) {
        if !self.country.contains(lat, lng) {
            return;
        }
        self.coverage.insert(GeoPoint { lat, lng });
    }

    /// Widening: adds cells mid-run. Codes already pending or already drawn
    /// are ignored.
    pub fn extend(&mut self, cells: impl IntoIterator<Item = Cell>) {
        for cell in cells {
            if self.seen.insert(cell.code.clone()) {
                self.pending.push_back(cell);
            }
        }
    }
}

/// ZIP centroids anchoring every major US population region, used when no
/// cell-list file is configured. A full-country sweep should load a ZCTA
/// gazetteer CSV instead; this list keeps the binary runnable without one.
const US_SEED_CELLS: &[(&str, f64, f64)] = &[
    ("10001", 40.750_6, -73.997_2),   // New York — Northeast
    ("02108", 42.357_5, -71.063_6),   // Boston
    ("19103", 39.952_6, -75.173_2),   // Philadelphia
    ("20001", 38.910_9, -77.016_3),   // Washington DC
    ("28202", 35.227_1, -80.843_1),   // Charlotte — Southeast
    ("30303", 33.752_5, -84.388_8),   // Atlanta
    ("33101", 25.774_3, -80.193_7),   // Miami
    ("37203", 36.153_9, -86.789_8),   // Nashville
    ("60601", 41.885_8, -87.622_9),   // Chicago — Great Lakes
    ("48226", 42.331_6, -83.046_6),   // Detroit
    ("55401", 44.984_5, -93.271_5),   // Minneapolis — Upper Midwest
    ("63101", 38.631_8, -90.192_7),   // St. Louis
    ("64106", 39.105_5, -94.578_6),   // Kansas City — central plains
    ("70112", 29.955_3, -90.077_2),   // New Orleans — Gulf Coast
    ("73102", 35.470_6, -97.519_5),   // Oklahoma City
    ("75201", 32.787_6, -96.799_5),   // Dallas
    ("77002", 29.758_9, -95.363_5),   // Houston
    ("78205", 29.423_7, -98.486_5),   // San Antonio
    ("80202", 39.749_1, -104.994_5),  // Denver — Mountain West
    ("84101", 40.755_6, -111.896_6),  // Salt Lake City
    ("85004", 33.451_1, -112.070_8),  // Phoenix — Southwest
    ("87102", 35.082_5, -106.648_1),  // Albuquerque
    ("89101", 36.171_9, -115.122_1),  // Las Vegas
    ("90012", 34.061_4, -118.238_5),  // Los Angeles — West Coast
    ("94102", 37.779_7, -122.419_2),  // San Francisco
    ("97204", 45.518_4, -122.673_8),  // Portland
    ("98101", 47.610_5, -122.334_3),  // Seattle — Pacific Northwest
    ("99501", 61.217_6, -149.858_1),  // Anchorage — Alaska
    ("96813", 21.309_9, -157.858_1),  // Honolulu — Hawaii
    ("00901", 18.465_5, -66.105_7),   // San Juan — Puerto Rico
];

/// Built-in fallback cell list for a country.
#[must_use]
pub fn seed_cells(country: Country) -> Vec<Cell> {
    match country {
        Country::Usa => US_SEED_CELLS
            .iter()
            .map(|&(code, lat, lng)| Cell::new(code, country, Some(GeoPoint { lat, lng })))
            .collect(),
    }
}

/// Loads cells from a `code,lat,lng` CSV (Census ZCTA gazetteer shape).
///
/// Blank lines and `#` comments are skipped; a header row is detected by a
/// non-numeric second column. Rows with unparseable coordinates keep the
/// code but drop the centroid — better an unskippable cell than a missed one.
///
/// # Errors
///
/// Returns [`SearchError::CellListIo`] if the file cannot be read,
/// [`SearchError::CellListParse`] for a row without a code column, and
/// [`SearchError::EmptyCellList`] when no rows survive.
pub fn load_cells_from_csv(path: &Path, country: Country) -> Result<Vec<Cell>, SearchError> {
    let display = path.display().to_string();
    let contents = std::fs::read_to_string(path).map_err(|source| SearchError::CellListIo {
        path: display.clone(),
        source,
    })?;

    let mut cells = Vec::new();
    let mut saw_data_row = false;
    for (idx, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split(',').map(str::trim);
        let code = fields
            .next()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| SearchError::CellListParse {
                path: display.clone(),
                line: idx + 1,
                reason: "missing code column".to_string(),
            })?;

        let lat = fields.next().and_then(|v| v.parse::<f64>().ok());
        let lng = fields.next().and_then(|v| v.parse::<f64>().ok());

        // Header row: first non-comment row with a non-numeric code and no
        // parseable latitude.
        let first_row = !saw_data_row;
        saw_data_row = true;
        if first_row && lat.is_none() && !code.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }

        let centroid = match (lat, lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
            _ => None,
        };
        cells.push(Cell::new(code, country, centroid));
    }

    if cells.is_empty() {
        return Err(SearchError::EmptyCellList { path: display });
    }
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(code: &str, lat: f64, lng: f64) -> Cell {
        Cell::new(code, Country::Usa, Some(GeoPoint { lat, lng }))
    }

    fn drain_codes(queue: &mut CellQueue) -> Vec<String> {
        let mut codes = Vec::new();
        while let Draw::Cell(c) = queue.next() {
            codes.push(c.code);
        }
        codes
    }

    #[test]
    fn draws_every_cell_exactly_once_then_done() {
        let cells = vec![
            cell("10001", 40.75, -73.99),
            cell("10002", 40.72, -73.99),
            cell("10003", 40.73, -73.99),
        ];
        let mut queue = CellQueue::new(cells, Country::Usa, None);

        assert_eq!(queue.remaining(), 3);
        let codes = drain_codes(&mut queue);
        assert_eq!(codes, vec!["10001", "10002", "10003"]);
        assert_eq!(queue.remaining(), 0);
        assert_eq!(queue.next(), Draw::Done, "Done is sticky");
    }

    #[test]
    fn remaining_decreases_monotonically_to_zero() {
        let cells = vec![
            cell("10001", 40.75, -73.99),
            cell("10002", 40.72, -73.99),
            cell("10003", 40.73, -73.99),
        ];
        let mut queue = CellQueue::new(cells, Country::Usa, None);

        let mut observed = vec![queue.remaining()];
        while let Draw::Cell(_) = queue.next() {
            observed.push(queue.remaining());
        }
        assert_eq!(observed, vec![3, 2, 1, 0]);
    }

    #[test]
    fn covered_cell_is_skipped_under_bounded_radius() {
        let cells = vec![
            cell("10001", 40.7506, -73.9972),
            // Hoboken, a couple of miles from the first centroid.
            cell("07030", 40.7440, -74.0324),
            // Philadelphia, ~80 miles out — beyond a 50-mile radius.
            cell("19103", 39.9526, -75.1732),
        ];
        let mut queue = CellQueue::new(cells, Country::Usa, Some(50.0));

        let Draw::Cell(first) = queue.next() else {
            panic!("expected a first cell");
        };
        assert_eq!(first.code, "10001");
        queue.found_location_at(40.7506, -73.9972);

        let codes = drain_codes(&mut queue);
        assert_eq!(codes, vec!["19103"], "covered Hoboken cell skipped");
        assert_eq!(queue.skipped(), 1);
    }

    #[test]
    fn unbounded_radius_never_skips() {
        let cells = vec![cell("10001", 40.7506, -73.9972), cell("10002", 40.7506, -73.9972)];
        let mut queue = CellQueue::new(cells, Country::Usa, None);

        let Draw::Cell(_) = queue.next() else {
            panic!("expected a cell");
        };
        queue.found_location_at(40.7506, -73.9972);

        assert_eq!(drain_codes(&mut queue), vec!["10002"]);
        assert_eq!(queue.skipped(), 0);
    }

    #[test]
    fn cell_without_centroid_is_never_skipped() {
        let mut queue = CellQueue::new(
            vec![Cell::new("99999", Country::Usa, None)],
            Country::Usa,
            Some(50.0),
        );
        queue.found_location_at(40.75, -73.99);
        assert_eq!(drain_codes(&mut queue), vec!["99999"]);
    }

    #[test]
    fn out_of_bounds_discovery_is_silently_ignored() {
        let cells = vec![cell("10001", 40.7506, -73.9972)];
        let mut queue = CellQueue::new(cells, Country::Usa, Some(10_000.0));
        // London: inside any 10k-mile radius of Manhattan, but outside the
        // US bounds, so it must not enter the index.
        queue.found_location_at(51.5074, -0.1278);
        assert_eq!(drain_codes(&mut queue), vec!["10001"]);
    }

    #[test]
    fn widening_adds_new_cells_and_ignores_duplicates() {
        let mut queue = CellQueue::new(vec![cell("10001", 40.75, -73.99)], Country::Usa, None);
        let Draw::Cell(drawn) = queue.next() else {
            panic!("expected a cell");
        };
        assert_eq!(drawn.code, "10001");
        assert_eq!(queue.remaining(), 0);

        queue.extend(vec![
            cell("10001", 40.75, -73.99), // already drawn — ignored
            cell("10002", 40.72, -73.99),
            cell("10002", 40.72, -73.99), // duplicate of a new code — ignored
        ]);
        assert_eq!(queue.remaining(), 1, "widening grew the queue by one");
        assert_eq!(drain_codes(&mut queue), vec!["10002"]);
    }

    #[test]
    fn seed_cells_cover_non_contiguous_states() {
        let cells = seed_cells(Country::Usa);
        assert!(cells.len() >= 25);
        assert!(cells.iter().any(|c| c.code == "99501"), "Alaska anchor");
        assert!(cells.iter().any(|c| c.code == "96813"), "Hawaii anchor");
        assert!(cells.iter().all(|c| c.centroid.is_some()));
        assert!(cells
            .iter()
            .all(|c| c.centroid.is_some_and(|p| Country::Usa.contains(p.lat, p.lng))));
    }

    #[test]
    fn load_cells_parses_csv_with_header_and_comments() {
        let dir = std::env::temp_dir().join("storesweep-cells-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cells.csv");
        std::fs::write(
            &path,
            "code,lat,lng\n# northeast\n10001,40.7506,-73.9972\n\n02108,42.3575,-71.0636\n99999,,\n",
        )
        .unwrap();

        let cells = load_cells_from_csv(&path, Country::Usa).unwrap();
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0].code, "10001");
        assert!(cells[0].centroid.is_some());
        assert!(
            cells[2].centroid.is_none(),
            "unparseable coordinates keep the code, drop the centroid"
        );
    }

    #[test]
    fn load_cells_detects_header_below_leading_comments() {
        let dir = std::env::temp_dir().join("storesweep-cells-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("commented-header.csv");
        std::fs::write(
            &path,
            "# ZCTA gazetteer extract\n# generated 2026-08\ncode,lat,lng\n10001,40.7506,-73.9972\n",
        )
        .unwrap();

        let cells = load_cells_from_csv(&path, Country::Usa).unwrap();
        assert_eq!(cells.len(), 1);
        assert_eq!(
            cells[0].code, "10001",
            "the header row below the comments must not become a cell"
        );
    }

    #[test]
    fn load_cells_missing_file_is_io_error() {
        let result = load_cells_from_csv(Path::new("/nonexistent/cells.csv"), Country::Usa);
        assert!(matches!(result, Err(SearchError::CellListIo { .. })));
    }

    #[test]
    fn load_cells_empty_file_is_error() {
        let dir = std::env::temp_dir().join("storesweep-cells-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty.csv");
        std::fs::write(&path, "# nothing here\n").unwrap();
        let result = load_cells_from_csv(&path, Country::Usa);
        assert!(matches!(result, Err(SearchError::EmptyCellList { .. })));
    }
}
