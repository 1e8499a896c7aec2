//! Great-circle geometry over search cells and discovered coordinates.
//!
//! Distances are in miles because the locator API's search radius is
//! specified in miles over the Earth's surface.

pub(crate) const MILES_PER_LAT_DEGREE: f64 = 69.0;

const EARTH_RADIUS_MILES: f64 = 3958.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Great-circle distance between two points in miles (haversine).
///
/// Total for identical points is exactly 0; the asin argument is clamped so
/// antipodal or numerically-degenerate inputs can never produce NaN.
#[must_use]
pub fn haversine_miles(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_MILES * h.clamp(0.0, 1.0).sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NYC: GeoPoint = GeoPoint {
        lat: 40.7128,
        lng: -74.0060,
    };
    const LA: GeoPoint = GeoPoint {
        lat: 34.0522,
        lng: -118.2437,
    };

    #[test]
    fn identical_points_are_zero_distance() {
        assert!(haversine_miles(NYC, NYC).abs() < f64::EPSILON);
    }

    #[test]
    fn nyc_to_la_is_about_2450_miles() {
        let d = haversine_miles(NYC, LA);
        assert!((2400.0..2500.0).contains(&d), "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = haversine_miles(NYC, LA);
        let ba = haversine_miles(LA, NYC);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn antipodal_points_do_not_produce_nan() {
        let a = GeoPoint { lat: 0.0, lng: 0.0 };
        let b = GeoPoint {
            lat: 0.0,
            lng: 180.0,
        };
        let d = haversine_miles(a, b);
        assert!(d.is_finite());
        // Half the Earth's circumference, give or take.
        assert!((12000.0..13000.0).contains(&d), "got {d}");
    }

    #[test]
    fn one_latitude_degree_is_about_69_miles() {
        let a = GeoPoint { lat: 40.0, lng: -74.0 };
        let b = GeoPoint { lat: 41.0, lng: -74.0 };
        let d = haversine_miles(a, b);
        assert!((68.0..70.0).contains(&d), "got {d}");
    }
}
