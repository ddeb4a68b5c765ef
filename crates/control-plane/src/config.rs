// Server configuration
//
// Read once at startup from the environment (after `.env` is loaded).
// DATABASE_URL unset means dev mode with in-memory stores.

use anyhow::{Context, Result};
use axum::http::HeaderValue;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:9000";
pub const DEFAULT_BROADCAST_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// PostgreSQL URL; `None` selects in-memory storage
    pub database_url: Option<String>,
    pub bind_address: String,
    /// Example: API_PREFIX="/api" results in routes like /api/v1/events
    pub api_prefix: String,
    /// Only needed when the UI is served from a different origin than the API
    pub cors_origins: Vec<HeaderValue>,
    pub broadcast_capacity: usize,
    /// Venue names registered at startup in dev mode
    pub seed_venues: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            api_prefix: String::new(),
            cors_origins: Vec::new(),
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
            seed_venues: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let broadcast_capacity = match get("BROADCAST_CAPACITY") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("BROADCAST_CAPACITY must be a positive integer, got {raw:?}"))?,
            None => DEFAULT_BROADCAST_CAPACITY,
        };
        if broadcast_capacity == 0 {
            anyhow::bail!("BROADCAST_CAPACITY must be greater than zero");
        }

        Ok(Self {
            database_url: get("DATABASE_URL"),
            bind_address: get("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            api_prefix: get("API_PREFIX").unwrap_or_default(),
            cors_origins: get("CORS_ALLOWED_ORIGINS")
                .map(|s| s.split(',').filter_map(|s| s.trim().parse().ok()).collect())
                .unwrap_or_default(),
            broadcast_capacity,
            seed_venues: get("SEED_VENUES")
                .map(|s| {
                    s.split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert!(config.database_url.is_none());
        assert_eq!(config.bind_address, "0.0.0.0:9000");
        assert_eq!(config.api_prefix, "");
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.broadcast_capacity, 256);
        assert!(config.seed_venues.is_empty());
    }

    #[test]
    fn test_empty_database_url_means_dev_mode() {
        let config = config(&[("DATABASE_URL", "  ")]).unwrap();
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_lists_are_split_and_trimmed() {
        let config = config(&[
            ("CORS_ALLOWED_ORIGINS", "https://a.example.com, https://b.example.com"),
            ("SEED_VENUES", "Main Hall, Gym,,Library "),
        ])
        .unwrap();
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.cors_origins[1], "https://b.example.com");
        assert_eq!(config.seed_venues, vec!["Main Hall", "Gym", "Library"]);
    }

    #[test]
    fn test_invalid_broadcast_capacity() {
        assert!(config(&[("BROADCAST_CAPACITY", "lots")]).is_err());
        assert!(config(&[("BROADCAST_CAPACITY", "0")]).is_err());
        assert_eq!(
            config(&[("BROADCAST_CAPACITY", "16")])
                .unwrap()
                .broadcast_capacity,
            16
        );
    }
}
