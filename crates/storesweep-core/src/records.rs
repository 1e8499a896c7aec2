//! Normalized output record for one physical store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder written for fields the source payload did not provide.
pub const MISSING: &str = "<MISSING>";

/// One normalized store-finder result, ready for the output sink.
///
/// String fields are placeholder-filled (`<MISSING>`) during normalization
/// rather than optional, so every emitted line has the full column set.
/// Coordinates stay optional: a fabricated `0.0` would poison coverage math
/// downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    /// Landing page of the service being swept for, constant per run.
    pub locator_domain: String,
    pub page_url: String,
    pub location_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub country_code: String,
    pub phone: String,
    pub store_number: String,
    pub hours_of_operation: String,
    pub location_type: String,
    pub scraped_at: DateTime<Utc>,
}

/// Compute the stable dedup key for a record.
///
/// SHA-256 over the identity fields — page URL, latitude, longitude, street
/// address, phone, store number, location type — lower-cased and trimmed,
/// `\x1f`-separated. Hex-encoded. Two query results referring to the same
/// physical store (e.g. discovered from two overlapping cells) hash equal.
#[must_use]
pub fn identity_key(record: &StoreRecord) -> String {
    use sha2::{Digest, Sha256};

    let coord = |v: Option<f64>| v.map_or_else(|| MISSING.to_string(), |c| format!("{c:.6}"));

    let input = format!(
        "{}\x1f{}\x1f{}\x1f{}\x1f{}\x1f{}\x1f{}",
        record.page_url.trim().to_lowercase(),
        coord(record.latitude),
        coord(record.longitude),
        record.street_address.trim().to_lowercase(),
        record.phone.trim(),
        record.store_number.trim(),
        record.location_type.trim().to_lowercase(),
    );
    format!("{:x}", Sha256::digest(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(store_number: &str) -> StoreRecord {
        StoreRecord {
            locator_domain: "https://www.walmart.com/photos".to_string(),
            page_url: "https://www.walmart.com/store/100".to_string(),
            location_name: "Walmart Supercenter".to_string(),
            latitude: Some(40.7506),
            longitude: Some(-73.9972),
            street_address: "123 Main St".to_string(),
            city: "New York".to_string(),
            state: "NY".to_string(),
            zipcode: "10001".to_string(),
            country_code: "US".to_string(),
            phone: "212-555-0100".to_string(),
            store_number: store_number.to_string(),
            hours_of_operation: "24/7".to_string(),
            location_type: "Supercenter".to_string(),
            scraped_at: Utc::now(),
        }
    }

    #[test]
    fn identity_key_is_deterministic() {
        let a = make_record("100");
        let b = make_record("100");
        assert_eq!(identity_key(&a), identity_key(&b));
        assert_eq!(identity_key(&a).len(), 64, "SHA-256 hex is 64 chars");
    }

    #[test]
    fn identity_key_ignores_non_identity_fields() {
        let a = make_record("100");
        let mut b = make_record("100");
        b.city = "Brooklyn".to_string();
        b.hours_of_operation = "Monday: Closed".to_string();
        assert_eq!(
            identity_key(&a),
            identity_key(&b),
            "city and hours are not identity fields"
        );
    }

    #[test]
    fn identity_key_differs_on_store_number() {
        let a = make_record("100");
        let b = make_record("101");
        assert_ne!(identity_key(&a), identity_key(&b));
    }

    #[test]
    fn identity_key_normalises_case_in_url_and_address() {
        let a = make_record("100");
        let mut b = make_record("100");
        b.page_url = "HTTPS://WWW.WALMART.COM/store/100".to_string();
        b.street_address = "123 MAIN ST".to_string();
        assert_eq!(identity_key(&a), identity_key(&b));
    }

    #[test]
    fn identity_key_treats_missing_coordinates_distinctly() {
        let a = make_record("100");
        let mut b = make_record("100");
        b.latitude = None;
        b.longitude = None;
        assert_ne!(identity_key(&a), identity_key(&b));
    }

    #[test]
    fn record_round_trips_through_json() {
        let record = make_record("100");
        let json = serde_json::to_string(&record).unwrap();
        let back: StoreRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
