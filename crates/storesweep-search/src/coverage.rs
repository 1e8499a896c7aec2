//! Spatial deduplication of search cells against discovered coordinates.
//!
//! The locator API returns every store within the search radius of a queried
//! cell, so once a store is discovered at some coordinate, any pending cell
//! whose centroid lies within that radius of the coordinate yields no new
//! information. The tracker holds a sparse degree-bucketed index of all
//! discovered points and answers "is this centroid already covered?".

use std::collections::HashMap;

use crate::geo::{haversine_miles, GeoPoint, MILES_PER_LAT_DEGREE};

#[derive(Debug)]
pub struct CoverageTracker {
    /// `None` disables skip-on-coverage: every cell stays pending.
    radius_miles: Option<f64>,
    /// Discovered points bucketed by floored (lat, lng) degree.
    buckets: HashMap<(i64, i64), Vec<GeoPoint>>,
    len: usize,
}

impl CoverageTracker {
    #[must_use]
    pub fn new(radius_miles: Option<f64>) -> Self {
        Self {
            radius_miles,
            buckets: HashMap::new(),
            len: 0,
        }
    }

    /// Number of indexed discovered points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, point: GeoPoint) {
        self.buckets.entry(bucket_of(point)).or_default().push(point);
        self.len += 1;
    }

    /// Distance in miles to the nearest indexed point, if one lies within
    /// the configured radius of `point`. `None` means "not covered" — which
    /// is also the answer whenever the radius is unbounded, so correctness
    /// never depends on the index.
    #[must_use]
    pub fn covering_distance(&self, point: GeoPoint) -> Option<f64> {
        let radius = self.radius_miles?;
        if self.buckets.is_empty() {
            return None;
        }

        // How many whole-degree buckets the radius can span. Longitude
        // degrees shrink with latitude, so the column span widens the same
        // way a grid's lng step does; near the poles the cosine collapses
        // and the span is capped to a full scan of the hemisphere.
        let lat_span = (radius / MILES_PER_LAT_DEGREE).ceil() as i64 + 1;
        let cos_lat = point.lat.to_radians().cos().max(1e-6);
        let lng_span = ((radius / (MILES_PER_LAT_DEGREE * cos_lat)).ceil() as i64 + 1).min(180);

        let (bucket_lat, bucket_lng) = bucket_of(point);
        let mut nearest: Option<f64> = None;

        for lat in (bucket_lat - lat_span)..=(bucket_lat + lat_span) {
            for lng in (bucket_lng - lng_span)..=(bucket_lng + lng_span) {
                let Some(points) = self.buckets.get(&(lat, lng)) else {
                    continue;
                };
                for discovered in points {
                    let d = haversine_miles(point, *discovered);
                    if d <= radius && nearest.is_none_or(|n| d < n) {
                        nearest = Some(d);
                    }
                }
            }
        }

        nearest
    }

    #[must_use]
    pub fn is_covered(&self, point: GeoPoint) -> bool {
        self.covering_distance(point).is_some()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn bucket_of(point: GeoPoint) -> (i64, i64) {
    (point.lat.floor() as i64, point.lng.floor() as i64)
}
