//! Process settings from environment variables (a `.env` file is loaded first by the binary).

use crate::error::ConfigError;
use crate::pagination::{PaginationSettings, DEFAULT_LIMIT};
use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/stockroom";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub page_size: u64,
    pub max_page_size: Option<u64>,
    pub public_base_url: Option<String>,
    pub body_limit: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Unset or blank keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let page_size = parse_or(&get, "PAGE_SIZE", DEFAULT_LIMIT)?;
        if page_size == 0 {
            return Err(invalid("PAGE_SIZE", "must be greater than zero"));
        }
        let max_page_size = get("MAX_PAGE_SIZE")
            .map(|v| parse::<u64>("MAX_PAGE_SIZE", &v))
            .transpose()?;
        if max_page_size.is_some_and(|max| max < page_size) {
            return Err(invalid("MAX_PAGE_SIZE", "must not be below PAGE_SIZE"));
        }
        let public_base_url = get("PUBLIC_BASE_URL");
        if let Some(base) = &public_base_url {
            url::Url::parse(base).map_err(|e| invalid("PUBLIC_BASE_URL", &e.to_string()))?;
        }
        let max_connections = parse_or(&get, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        if max_connections == 0 {
            return Err(invalid("DB_MAX_CONNECTIONS", "must be greater than zero"));
        }

        Ok(Settings {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            bind_addr: parse(
                "BIND_ADDR",
                &get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            )?,
            max_connections,
            page_size,
            max_page_size,
            public_base_url,
            body_limit: parse_or(&get, "BODY_LIMIT_BYTES", DEFAULT_BODY_LIMIT)?,
        })
    }

    pub fn pagination(&self) -> PaginationSettings {
        PaginationSettings {
            default_limit: self.page_size,
            max_limit: self.max_page_size,
            base_url: self.public_base_url.clone(),
        }
    }
}

fn invalid(key: &'static str, message: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        message: message.to_string(),
    }
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| invalid(key, &format!("{:?}: {}", raw, e)))
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => parse(key, &raw),
        None => Ok(default),
    }
}
