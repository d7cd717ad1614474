use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::{debug, warn};

/// Runtime configuration for the portal client.
///
/// Every value has a default matching the production portal; each one can be
/// overridden through a `PORTAL_*` environment variable (a `.env` file is loaded
/// by `main` before this runs).
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub request_timeout: Duration,
    pub min_amount: i64,
    pub max_amount: i64,
    pub phone_prefix: String,
    pub phone_length: usize,
    pub valid_supplier_ids: Vec<String>,
    pub page_size_options: Vec<usize>,
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub max_visible_pages: usize,
    pub supplier_cache_ttl: Duration,
    pub credentials_path: PathBuf,
    /// Hex-encoded AES-256 key; when absent the credential file is stored as plain JSON.
    pub credentials_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/v1".to_string(),
            request_timeout: Duration::from_millis(10_000),
            min_amount: 1_000,
            max_amount: 100_000,
            phone_prefix: "3".to_string(),
            phone_length: 10,
            valid_supplier_ids: ["8753", "9773", "3398", "4689"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            page_size_options: vec![2, 5, 10, 20, 50],
            default_page_size: 10,
            max_page_size: 100,
            max_visible_pages: 5,
            supplier_cache_ttl: Duration::from_secs(5 * 60),
            credentials_path: PathBuf::from(".topup-portal/credentials.json"),
            credentials_key: None,
        }
    }
}

impl Config {
    /// Build the configuration from the environment, falling back to defaults.
    pub fn load() -> Self {
        let defaults = Self::default();

        let config = Self {
            base_url: try_load("PORTAL_BASE_URL", defaults.base_url)
                .trim_end_matches('/')
                .to_string(),
            request_timeout: Duration::from_millis(try_load(
                "PORTAL_TIMEOUT_MS",
                defaults.request_timeout.as_millis() as u64,
            )),
            min_amount: try_load("PORTAL_MIN_AMOUNT", defaults.min_amount),
            max_amount: try_load("PORTAL_MAX_AMOUNT", defaults.max_amount),
            phone_prefix: try_load("PORTAL_PHONE_PREFIX", defaults.phone_prefix),
            phone_length: try_load("PORTAL_PHONE_LENGTH", defaults.phone_length),
            valid_supplier_ids: try_load_list("PORTAL_SUPPLIER_IDS", defaults.valid_supplier_ids),
            page_size_options: try_load_list("PORTAL_PAGE_SIZE_OPTIONS", defaults.page_size_options),
            default_page_size: try_load("PORTAL_PAGE_SIZE", defaults.default_page_size),
            max_page_size: try_load("PORTAL_MAX_PAGE_SIZE", defaults.max_page_size),
            max_visible_pages: try_load("PORTAL_MAX_VISIBLE_PAGES", defaults.max_visible_pages),
            supplier_cache_ttl: Duration::from_secs(try_load(
                "PORTAL_SUPPLIER_CACHE_SECS",
                defaults.supplier_cache_ttl.as_secs(),
            )),
            credentials_path: try_load::<String>(
                "PORTAL_CREDENTIALS_PATH",
                defaults.credentials_path.display().to_string(),
            )
            .into(),
            credentials_key: env::var("PORTAL_CREDENTIALS_KEY").ok().filter(|k| !k.is_empty()),
        };

        if config.min_amount > config.max_amount {
            warn!(
                "PORTAL_MIN_AMOUNT ({}) is greater than PORTAL_MAX_AMOUNT ({}), every top-up will be rejected",
                config.min_amount, config.max_amount
            );
        }

        config
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }),
        Err(_) => {
            debug!("{key} not set, using default: {default}");
            default
        }
    }
}

fn try_load_list<T>(key: &str, default: Vec<T>) -> Vec<T>
where
    T: FromStr,
    T::Err: Display,
{
    let Ok(raw) = env::var(key) else {
        return default;
    };

    let parsed: Result<Vec<T>, _> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect();

    match parsed {
        Ok(values) if !values.is_empty() => values,
        Ok(_) => {
            warn!("{key} is empty, using default");
            default
        }
        Err(e) => {
            warn!("Invalid {key} value {raw:?}: {e}, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_portal_rules() {
        let config = Config::default();
        assert_eq!(config.min_amount, 1_000);
        assert_eq!(config.max_amount, 100_000);
        assert_eq!(config.phone_length, 10);
        assert_eq!(config.supplier_cache_ttl, Duration::from_secs(300));
        assert!(config.valid_supplier_ids.contains(&"8753".to_string()));
    }

    #[test]
    fn test_unset_list_falls_back_to_default() {
        let values = try_load_list("PORTAL_TEST_UNSET_LIST_VARIABLE", vec![1usize, 2]);
        assert_eq!(values, vec![1, 2]);
    }
}
