//! Store-finder API response types.
//!
//! ## Observed shape from the live endpoint
//!
//! `GET /store/finder/electrode/api/stores?singleLineAddr={zip}&distance={mi}`
//! wraps everything in a `payload` envelope:
//!
//! ### `nbrOfStores`
//! Sometimes a JSON number, sometimes a numeric string, sometimes `null`
//! for zero-result queries. Modeled as a raw value with an accessor that
//! tolerates both encodings.
//!
//! ### `storesData.stores`
//! Absent entirely when `nbrOfStores` is zero. `#[serde(default)]` keeps
//! empty queries from failing deserialization.
//!
//! ### `geoPoint`
//! Either coordinate may be `null` on rare records; both must be present
//! for a store to feed the coverage index.
//!
//! ### `operationalHours`
//! `open24Hours` short-circuits the per-day fields. Day objects carry
//! `closed`, `openFullDay`, and `startHr`/`endHr` strings; a day can also be
//! `null` outright. Aggregate keys (`todayHr`, `tomorrowHr`) are not
//! modeled — they never render as day lines.

use serde::Deserialize;

/// Top-level envelope from the store-finder endpoint.
#[derive(Debug, Deserialize)]
pub struct StoreFinderResponse {
    pub payload: StoreFinderPayload,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreFinderPayload {
    /// Number or numeric string; see [`StoreFinderPayload::store_count`].
    pub nbr_of_stores: Option<serde_json::Value>,
    pub stores_data: Option<StoresData>,
}

impl StoreFinderPayload {
    /// Store count tolerant of number-vs-string encoding; unparseable or
    /// absent values count as zero.
    #[must_use]
    pub fn store_count(&self) -> u64 {
        match &self.nbr_of_stores {
            Some(serde_json::Value::Number(n)) => n.as_u64().unwrap_or(0),
            Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StoresData {
    #[serde(default)]
    pub stores: Vec<StorePayload>,
}

/// One raw store record from the API. Ownership moves to the field-mapping
/// layer as soon as the coordinates have been reported for coverage.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePayload {
    #[serde(default)]
    pub id: Option<i64>,

    // The API spells this one with a capitalized URL suffix.
    #[serde(default, rename = "detailsPageURL")]
    pub details_page_url: Option<String>,

    #[serde(default)]
    pub store_type: Option<StoreType>,

    #[serde(default)]
    pub geo_point: Option<GeoPointPayload>,

    #[serde(default)]
    pub address: Option<AddressPayload>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub operational_hours: Option<OperationalHours>,

    /// In-store services offered at this location (pharmacy, photo center,
    /// garden center, ...). Empty for kiosk-style formats.
    #[serde(default)]
    pub services: Vec<StoreService>,
}

impl StorePayload {
    /// Both coordinates, when the payload carries a complete geo point.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let geo = self.geo_point.as_ref()?;
        Some((geo.latitude?, geo.longitude?))
    }

    /// Whether this store offers the named in-store service, matching the
    /// service name or display name case-insensitively.
    #[must_use]
    pub fn offers_service(&self, service: &str) -> bool {
        self.services.iter().any(|s| {
            s.name
                .as_deref()
                .is_some_and(|n| n.eq_ignore_ascii_case(service))
                || s.display_name
                    .as_deref()
                    .is_some_and(|n| n.eq_ignore_ascii_case(service))
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreType {
    pub name: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeoPointPayload {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressPayload {
    /// Street address line; the API reuses the key `address` inside the
    /// `address` object.
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreService {
    pub name: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperationalHours {
    pub open24_hours: bool,
    pub monday: Option<DayHours>,
    pub tuesday: Option<DayHours>,
    pub wednesday: Option<DayHours>,
    pub thursday: Option<DayHours>,
    pub friday: Option<DayHours>,
    pub saturday: Option<DayHours>,
    pub sunday: Option<DayHours>,
    /// Free-form temporary-hours blob, rendered verbatim when present.
    pub temporary_hours: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DayHours {
    pub closed: bool,
    pub open_full_day: bool,
    pub start_hr: Option<String>,
    pub end_hr: Option<String>,
}
