// Runtime configuration loaded from environment variables

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::auth::password::{DEFAULT_COST, MAX_COST, MIN_COST};

const DEV_JWT_SECRET: &str = "dev-secret-key";

/// Errors raised while reading configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Service configuration
///
/// | Variable                   | Default            |
/// |----------------------------|--------------------|
/// | `DATABASE_URL`             | `sqlite://blog.db` |
/// | `JWT_SECRET`               | development secret |
/// | `UPLOAD_DIR`               | `img_avatar`       |
/// | `BIND_ADDR`                | `0.0.0.0:5000`     |
/// | `DATABASE_MAX_CONNECTIONS` | `5`                |
/// | `REQUEST_TIMEOUT_SECS`     | `30`               |
/// | `MAX_UPLOAD_BYTES`         | `5242880`          |
/// | `BCRYPT_COST`              | bcrypt default     |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub upload_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub database_max_connections: u32,
    pub request_timeout: Duration,
    pub max_upload_bytes: usize,
    pub bcrypt_cost: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://blog.db".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            upload_dir: PathBuf::from("img_avatar"),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            database_max_connections: 5,
            request_timeout: Duration::from_secs(30),
            max_upload_bytes: 5 * 1024 * 1024,
            bcrypt_cost: DEFAULT_COST,
        }
    }
}

impl Config {
    /// Reads configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET not set, using development secret");
                defaults.jwt_secret
            }
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            jwt_secret,
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            bind_addr: parse_or("BIND_ADDR", &lookup, defaults.bind_addr)?,
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                &lookup,
                defaults.database_max_connections,
            )?,
            request_timeout: parse_or("REQUEST_TIMEOUT_SECS", &lookup, defaults.request_timeout.as_secs())
                .map(Duration::from_secs)?,
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", &lookup, defaults.max_upload_bytes)?,
            bcrypt_cost: bcrypt_cost(&lookup, defaults.bcrypt_cost)?,
        })
    }
}

/// bcrypt refuses costs outside `MIN_COST..=MAX_COST`, so those fail at startup
/// instead of on the first signup
fn bcrypt_cost<F>(lookup: &F, default: u32) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let cost = parse_or("BCRYPT_COST", lookup, default)?;
    if (MIN_COST..=MAX_COST).contains(&cost) {
        Ok(cost)
    } else {
        Err(ConfigError::InvalidValue {
            name: "BCRYPT_COST",
            value: cost.to_string(),
        })
    }
}

fn parse_or<T, F>(name: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("JWT_SECRET", "s3cret"),
            ("UPLOAD_DIR", "/tmp/avatars"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("MAX_UPLOAD_BYTES", "1024"),
            ("BCRYPT_COST", "4"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.upload_dir, PathBuf::from("/tmp/avatars"));
        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.bcrypt_cost, 4);
    }

    #[test]
    fn empty_secret_falls_back() {
        let config = Config::from_lookup(lookup_from(&[("JWT_SECRET", "")])).unwrap();
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
    }

    #[test]
    fn invalid_number_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("REQUEST_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: "REQUEST_TIMEOUT_SECS",
                value: "soon".to_string()
            }
        );
    }

    #[test]
    fn bcrypt_cost_outside_supported_range_is_an_error() {
        for value in ["3", "32", "0"] {
            let err = Config::from_lookup(lookup_from(&[("BCRYPT_COST", value)])).unwrap_err();
            assert_eq!(
                err,
                ConfigError::InvalidValue {
                    name: "BCRYPT_COST",
                    value: value.to_string()
                }
            );
        }

        let lowest = Config::from_lookup(lookup_from(&[("BCRYPT_COST", "4")])).unwrap();
        assert_eq!(lowest.bcrypt_cost, 4);
        let highest = Config::from_lookup(lookup_from(&[("BCRYPT_COST", "31")])).unwrap();
        assert_eq!(highest.bcrypt_cost, 31);
    }
}
