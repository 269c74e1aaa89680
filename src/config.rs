//! Server configuration from environment variables.

use crate::error::ConfigError;
use std::net::SocketAddr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_SCHEMA: &str = "public";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub schema: String,
    pub max_connections: u32,
    pub body_limit_bytes: usize,
}

impl Config {
    /// Read `BIND_ADDR`, `DATABASE_URL`, `TURKEY_SCHEMA`, `DB_MAX_CONNECTIONS` and
    /// `BODY_LIMIT_BYTES`. Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.into())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: "BIND_ADDR",
                reason: format!("{}", e),
            })?;
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let schema = lookup("TURKEY_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.into());
        if !is_identifier(&schema) {
            return Err(ConfigError::Invalid {
                key: "TURKEY_SCHEMA",
                reason: format!("'{}' is not a plain identifier", schema),
            });
        }
        let max_connections = parse_or("DB_MAX_CONNECTIONS", &lookup, DEFAULT_MAX_CONNECTIONS)?;
        let body_limit_bytes = parse_or("BODY_LIMIT_BYTES", &lookup, DEFAULT_BODY_LIMIT_BYTES)?;
        Ok(Config {
            bind_addr,
            database_url,
            schema,
            max_connections,
            body_limit_bytes,
        })
    }
}

fn parse_or<T, F>(key: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// Lower-case ASCII letters, digits and underscores, not starting with a digit.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_use_memory_store() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.database_url, None);
        assert_eq!(cfg.schema, "public");
        assert_eq!(cfg.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(cfg.body_limit_bytes, DEFAULT_BODY_LIMIT_BYTES);
    }

    #[test]
    fn reads_overrides() {
        let cfg = config(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DATABASE_URL", "postgres://localhost/turkeys"),
            ("TURKEY_SCHEMA", "farm_1"),
            ("DB_MAX_CONNECTIONS", "12"),
        ])
        .unwrap();
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/turkeys"));
        assert_eq!(cfg.schema, "farm_1");
        assert_eq!(cfg.max_connections, 12);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config(&[("BIND_ADDR", "nowhere")]).is_err());
        assert!(config(&[("TURKEY_SCHEMA", "public; drop table x")]).is_err());
        assert!(config(&[("TURKEY_SCHEMA", "1abc")]).is_err());
        assert!(config(&[("DB_MAX_CONNECTIONS", "many")]).is_err());
    }

    #[test]
    fn blank_database_url_means_memory() {
        assert_eq!(config(&[("DATABASE_URL", " ")]).unwrap().database_url, None);
    }
}
