//! HTTP client for the public store-finder endpoint.

use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;
use crate::retry::retry_with_backoff;
use crate::types::{StoreFinderResponse, StorePayload};

/// Client for `GET /store/finder/electrode/api/stores`.
///
/// One bounded-radius query per call: `singleLineAddr` carries the postal
/// code, `distance` the search radius in miles. Rate limiting (429), 404,
/// and 5xx map to typed errors; transient failures are retried with
/// exponential backoff up to `max_retries` additional attempts, after which
/// [`ScraperError::RetryExhausted`] names the attempt count and final cause.
///
/// The client holds no per-query state, so repeated calls for the same code
/// build the identical request (idempotence barring real-world changes).
pub struct StoreFinderClient {
    client: Client,
    base_url: String,
    /// `distance` query parameter, miles.
    query_distance_miles: f64,
    /// Result cap forwarded to the API.
    max_results: u32,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl StoreFinderClient {
    /// Creates a client with configured timeout, `User-Agent`, and retry
    /// policy. `base_url` is the scheme+host origin (overridable for tests).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ScraperError::InvalidBaseUrl`] for an
    /// unparseable origin.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        query_distance_miles: f64,
        max_results: u32,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        reqwest::Url::parse(base_url).map_err(|e| ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            query_distance_miles,
            max_results,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches every store within the configured distance of a postal code,
    /// with automatic retry on transient errors.
    ///
    /// A response reporting zero stores yields an empty vec, not an error.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RetryExhausted`] — transient failures (429, 5xx,
    ///   network/TLS) outlasted the retry budget.
    /// - [`ScraperError::NotFound`] — HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`] — other non-2xx, non-5xx status.
    /// - [`ScraperError::Deserialize`] — body is not the expected shape.
    pub async fn fetch_stores(&self, code: &str) -> Result<Vec<StorePayload>, ScraperError> {
        let url = self.stores_url(code);

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self.client.get(&url).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(ScraperError::RateLimited { retry_after_secs });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ScraperError::NotFound { url });
                }

                if status.is_server_error() {
                    return Err(ScraperError::ServerError {
                        status: status.as_u16(),
                        url,
                    });
                }

                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let body = response.text().await?;
                let parsed = serde_json::from_str::<StoreFinderResponse>(&body).map_err(|e| {
                    ScraperError::Deserialize {
                        context: format!("store-finder response for code {code}"),
                        source: e,
                    }
                })?;

                if parsed.payload.store_count() == 0 {
                    return Ok(Vec::new());
                }
                Ok(parsed
                    .payload
                    .stores_data
                    .map(|data| data.stores)
                    .unwrap_or_default())
            }
        })
        .await
    }

    /// Builds the query URL. The cell code is URL-encoded via
    /// `reqwest::Url`; `distance` renders without a trailing `.0` for whole
    /// miles, matching what the endpoint expects.
    fn stores_url(&self, code: &str) -> String {
        let endpoint = format!("{}/store/finder/electrode/api/stores", self.base_url);
        match reqwest::Url::parse(&endpoint) {
            Ok(mut url) => {
                url.query_pairs_mut()
                    .append_pair("singleLineAddr", code)
                    .append_pair("distance", &format_distance(self.query_distance_miles))
                    .append_pair("maxResults", &self.max_results.to_string());
                url.to_string()
            }
            // new() validated the base URL; this arm is unreachable in
            // practice but keeps the builder infallible.
            Err(_) => format!(
                "{endpoint}?singleLineAddr={code}&distance={}&maxResults={}",
                format_distance(self.query_distance_miles),
                self.max_results
            ),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn format_distance(miles: f64) -> String {
    if miles.fract() == 0.0 {
        format!("{}", miles as i64)
    } else {
        format!("{miles}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> StoreFinderClient {
        StoreFinderClient::new("https://www.walmart.com", 5, "storesweep-test/0.1", 50.0, 50, 0, 0)
            .expect("failed to build test client")
    }

    #[test]
    fn stores_url_includes_code_and_distance() {
        let url = test_client().stores_url("10001");
        assert_eq!(
            url,
            "https://www.walmart.com/store/finder/electrode/api/stores?singleLineAddr=10001&distance=50&maxResults=50"
        );
    }

    #[test]
    fn stores_url_encodes_unusual_codes() {
        let url = test_client().stores_url("K1A 0B1");
        assert!(url.contains("singleLineAddr=K1A+0B1"), "got: {url}");
    }

    #[test]
    fn fractional_distance_keeps_fraction() {
        assert_eq!(format_distance(12.5), "12.5");
        assert_eq!(format_distance(50.0), "50");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result =
            StoreFinderClient::new("not a url", 5, "storesweep-test/0.1", 50.0, 50, 0, 0);
        assert!(matches!(
            result,
            Err(ScraperError::InvalidBaseUrl { .. })
        ));
    }
}
