use crate::app_config::{AppConfig, Country, FailurePolicy};
use crate::ConfigError;

/// User agent the original deployment presented to the store-finder API.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/75.0.3770.142 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a set env var fails to parse. No vars are
/// required; every setting has a default.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files. Useful for tests.
///
/// # Errors
///
/// Returns `ConfigError` if a set env var fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The parsing/validation core is decoupled from the process environment so
/// it can be tested against a plain `HashMap` — no `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env_name = or_default("SWEEP_ENV", "development");
    let log_level = or_default("SWEEP_LOG_LEVEL", "info");

    let country = parse_country(&or_default("SWEEP_COUNTRY", "us"))?;

    // Unbounded by default, matching the deployed max_radius_miles=None.
    let max_radius_miles = match lookup("SWEEP_MAX_RADIUS_MILES") {
        Ok(raw) if raw.eq_ignore_ascii_case("none") || raw.is_empty() => None,
        Ok(raw) => Some(raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: "SWEEP_MAX_RADIUS_MILES".to_string(),
            reason: e.to_string(),
        })?),
        Err(_) => None,
    };

    let query_distance_miles = parse_f64("SWEEP_QUERY_DISTANCE_MILES", "50")?;
    let max_search_results = parse_u32("SWEEP_MAX_SEARCH_RESULTS", "50")?;
    let base_url = or_default("SWEEP_BASE_URL", "https://www.walmart.com");
    let request_timeout_secs = parse_u64("SWEEP_REQUEST_TIMEOUT_SECS", "15")?;
    let user_agent = or_default("SWEEP_USER_AGENT", DEFAULT_USER_AGENT);
    let max_retries = parse_u32("SWEEP_MAX_RETRIES", "15")?;
    let retry_backoff_base_secs = parse_u64("SWEEP_RETRY_BACKOFF_BASE_SECS", "1")?;
    let inter_request_delay_ms = parse_u64("SWEEP_INTER_REQUEST_DELAY_MS", "250")?;

    let cells_path = lookup("SWEEP_CELLS_PATH").ok().map(PathBuf::from);
    let output_path = PathBuf::from(or_default("SWEEP_OUTPUT_PATH", "./data/stores.jsonl"));

    let failure_policy = parse_failure_policy(&or_default("SWEEP_ON_CELL_FAILURE", "abort"))?;

    let require_service = match lookup("SWEEP_REQUIRE_SERVICE") {
        Ok(raw) if raw.is_empty() || raw.eq_ignore_ascii_case("none") => None,
        Ok(raw) => Some(raw),
        Err(_) => Some("Photo Center".to_string()),
    };

    Ok(AppConfig {
        env_name,
        log_level,
        country,
        max_radius_miles,
        query_distance_miles,
        max_search_results,
        base_url,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        inter_request_delay_ms,
        cells_path,
        output_path,
        failure_policy,
        require_service,
    })
}

fn parse_country(s: &str) -> Result<Country, ConfigError> {
    match s.to_ascii_lowercase().as_str() {
        "us" | "usa" => Ok(Country::Usa),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SWEEP_COUNTRY".to_string(),
            reason: format!("unsupported country \"{other}\""),
        }),
    }
}

fn parse_failure_policy(s: &str) -> Result<FailurePolicy, ConfigError> {
    match s.to_ascii_lowercase().as_str() {
        "abort" => Ok(FailurePolicy::Abort),
        "skip" => Ok(FailurePolicy::SkipAndRecord),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SWEEP_ON_CELL_FAILURE".to_string(),
            reason: format!("expected \"abort\" or \"skip\", got \"{other}\""),
        }),
    }
}
