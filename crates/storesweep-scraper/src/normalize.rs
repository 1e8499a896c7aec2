//! Normalization from raw store-finder payloads to
//! [`storesweep_core::StoreRecord`].
//!
//! Hours rendering is delegated to [`crate::hours`]; this module is the
//! structural field mapping. It never fails: missing source fields become
//! `<MISSING>` placeholders so every payload the traversal yields produces
//! an output record.

use chrono::{DateTime, Utc};
use storesweep_core::{StoreRecord, MISSING};

use crate::hours::human_hours;
use crate::types::StorePayload;

/// Landing page of the service being swept for; constant per run.
pub const LOCATOR_DOMAIN: &str = "https://www.walmart.com/photos";

/// Prefixes `"Walmart "` unless the name already carries the brand.
/// `"Supercenter"` → `"Walmart Supercenter"`; `"Walmart Neighborhood
/// Market"` passes through unchanged.
#[must_use]
pub fn add_walmart(name: &str) -> String {
    if name.contains("Walmart") {
        name.to_string()
    } else {
        format!("Walmart {name}")
    }
}

/// Maps one raw payload to a normalized record.
#[must_use]
pub fn normalize_store(store: &StorePayload, scraped_at: DateTime<Utc>) -> StoreRecord {
    let missing = || MISSING.to_string();
    let or_missing = |v: Option<&str>| v.map_or_else(missing, str::to_string);

    let (latitude, longitude) = store
        .coordinates()
        .map_or((None, None), |(lat, lng)| (Some(lat), Some(lng)));

    // storeType.name feeds the display name, storeType.displayName the
    // location type (an identity field).
    let location_name = store
        .store_type
        .as_ref()
        .and_then(|t| t.name.as_deref())
        .map_or_else(missing, add_walmart);
    let location_type = or_missing(
        store
            .store_type
            .as_ref()
            .and_then(|t| t.display_name.as_deref()),
    );

    let address = store.address.as_ref();
    let hours_of_operation = store
        .operational_hours
        .as_ref()
        .map_or_else(missing, human_hours);

    StoreRecord {
        locator_domain: LOCATOR_DOMAIN.to_string(),
        page_url: or_missing(store.details_page_url.as_deref()),
        location_name,
        latitude,
        longitude,
        street_address: or_missing(address.and_then(|a| a.address.as_deref())),
        city: or_missing(address.and_then(|a| a.city.as_deref())),
        state: or_missing(address.and_then(|a| a.state.as_deref())),
        zipcode: or_missing(address.and_then(|a| a.postal_code.as_deref())),
        country_code: or_missing(address.and_then(|a| a.country.as_deref())),
        phone: or_missing(store.phone.as_deref()),
        store_number: store.id.map_or_else(missing, |id| id.to_string()),
        hours_of_operation,
        location_type,
        scraped_at,
    }
}
