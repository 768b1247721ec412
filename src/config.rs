//! Environment-driven application configuration

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {var}: '{value}' ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Backing store selected at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" | "in_memory" | "inmemory" => Ok(Self::Memory),
            other => Err(format!("unknown backend '{}', expected redis or memory", other)),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub store_backend: StoreBackend,
    pub redis_url: String,
    pub redis_key_prefix: Option<String>,
}

impl AppConfig {
    /// Loads configuration from `.env` and the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds configuration from an arbitrary variable lookup
    ///
    /// Variables: `HOST`, `PORT`, `STORE_BACKEND`, `REDIS_URL`,
    /// `REDIS_KEY_PREFIX`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host: IpAddr = host.parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::Invalid {
                var: "HOST",
                value: host.clone(),
                reason: e.to_string(),
            }
        })?;

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let store_backend = match get("STORE_BACKEND") {
            Some(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                var: "STORE_BACKEND",
                value: raw.clone(),
                reason,
            })?,
            None => StoreBackend::Redis,
        };

        let redis_url = get("REDIS_URL").unwrap_or_else(|| {
            if store_backend == StoreBackend::Redis {
                tracing::warn!("REDIS_URL not set, using default");
            }
            DEFAULT_REDIS_URL.to_string()
        });

        Ok(Self {
            bind_addr: SocketAddr::new(host, port),
            store_backend,
            redis_url,
            redis_key_prefix: get("REDIS_KEY_PREFIX"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = load(&[]).unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.store_backend, StoreBackend::Redis);
        assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(config.redis_key_prefix, None);
    }

    #[test]
    fn reads_every_variable() {
        let config = load(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("STORE_BACKEND", "memory"),
            ("REDIS_URL", "redis://cache:6379"),
            ("REDIS_KEY_PREFIX", "ipl"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.redis_url, "redis://cache:6379");
        assert_eq!(config.redis_key_prefix.as_deref(), Some("ipl"));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = load(&[("PORT", " "), ("REDIS_KEY_PREFIX", "")]).unwrap();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.redis_key_prefix, None);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = load(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));
    }

    #[test]
    fn invalid_host_is_rejected() {
        assert!(load(&[("HOST", "not-an-ip")]).is_err());
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let err = load(&[("STORE_BACKEND", "postgres")]).unwrap_err();
        assert!(err.to_string().contains("STORE_BACKEND"));
    }

    #[test]
    fn backend_names_are_case_insensitive() {
        assert_eq!("Redis".parse::<StoreBackend>(), Ok(StoreBackend::Redis));
        assert_eq!("IN_MEMORY".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
    }
}
