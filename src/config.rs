use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use crate::error::{AppError, Result};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    /// How long a cached price lookup stays fresh.
    pub cache_ttl: Duration,
    /// Upper bound on each individual price source call.
    pub source_timeout: Duration,
    /// `None` keeps every entry until restart.
    pub cache_max_entries: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            cache_ttl: DEFAULT_CACHE_TTL,
            source_timeout: DEFAULT_SOURCE_TIMEOUT,
            cache_max_entries: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "8000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let cache_ttl = match lookup("PRICE_CACHE_TTL_SECS") {
            Some(raw) => positive_secs("PRICE_CACHE_TTL_SECS", &raw)?,
            None => DEFAULT_CACHE_TTL,
        };
        let source_timeout = match lookup("SOURCE_TIMEOUT_SECS") {
            Some(raw) => positive_secs("SOURCE_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_SOURCE_TIMEOUT,
        };
        let cache_max_entries = match lookup("PRICE_CACHE_MAX_ENTRIES") {
            Some(raw) => {
                let limit = raw.trim().parse::<usize>().map_err(|e| {
                    AppError::ConfigError(format!("Invalid PRICE_CACHE_MAX_ENTRIES: {}", e))
                })?;
                if limit == 0 {
                    return Err(AppError::ConfigError(
                        "PRICE_CACHE_MAX_ENTRIES must be at least 1".to_string(),
                    ));
                }
                Some(limit)
            }
            None => None,
        };

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            cache_ttl,
            source_timeout,
            cache_max_entries,
        })
    }
}

fn positive_secs(name: &str, raw: &str) -> Result<Duration> {
    let secs = raw
        .trim()
        .parse::<u64>()
        .map_err(|e| AppError::ConfigError(format!("Invalid {}: {}", name, e)))?;
    if secs == 0 {
        return Err(AppError::ConfigError(format!("{} must be greater than zero", name)));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = load_from(&[]).unwrap();
        assert_eq!(config.server_addr, SocketAddr::from(([127, 0, 0, 1], 8000)));
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.source_timeout, Duration::from_secs(5));
        assert_eq!(config.cache_max_entries, None);
    }

    #[test]
    fn overrides_are_applied() {
        let config = load_from(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "9100"),
            ("PRICE_CACHE_TTL_SECS", "60"),
            ("SOURCE_TIMEOUT_SECS", "2"),
            ("PRICE_CACHE_MAX_ENTRIES", "500"),
        ])
        .unwrap();
        assert_eq!(config.server_addr, SocketAddr::from(([0, 0, 0, 0], 9100)));
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.source_timeout, Duration::from_secs(2));
        assert_eq!(config.cache_max_entries, Some(500));
    }

    #[test]
    fn invalid_port_is_a_config_error() {
        let err = load_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(msg) if msg.contains("Invalid port")));
    }

    #[test]
    fn zero_ttl_is_rejected() {
        assert!(load_from(&[("PRICE_CACHE_TTL_SECS", "0")]).is_err());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(load_from(&[("PRICE_CACHE_MAX_ENTRIES", "0")]).is_err());
    }
}
