//! Server configuration parsed from environment variables.
//!
//! `main` loads an optional `.env` file first (via `dotenvy`), so anything
//! below can also be set there.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_SESSION_TTL_HOURS: u64 = 720;
pub const DEFAULT_SESSION_SWEEP_SECS: u64 = 600;
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

const DEFAULT_LOGIN_LIMIT: usize = 10;
const DEFAULT_LOGIN_WINDOW_SECS: u64 = 300;
const DEFAULT_MESSAGE_LIMIT: usize = 30;
const DEFAULT_MESSAGE_WINDOW_SECS: u64 = 60;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Sliding-window limit: at most `limit` events per `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowLimit {
    pub limit: usize,
    pub window: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub port: u16,
    pub max_connections: u32,
    pub cookie_secure: bool,
    pub session_ttl_hours: u64,
    pub session_sweep: Duration,
    pub static_dir: PathBuf,
    /// `None` when `ADMIN_PASSWORD` is unset; bootstrap then falls back to
    /// [`DEFAULT_ADMIN_PASSWORD`] and logs a warning.
    pub admin_password: Option<String>,
    pub login_limit: WindowLimit,
    pub message_limit: WindowLimit,
}

impl Config {
    /// Build config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `DATABASE_URL` is missing or a value fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `DATABASE_URL` is missing or a value fails to parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let cookie_secure = match lookup("COOKIE_SECURE") {
            None => false,
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid { key: "COOKIE_SECURE", value: raw })?,
        };

        let static_dir = lookup("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static"));

        let sweep_secs: u64 = parse_or(&lookup, "SESSION_SWEEP_SECS", DEFAULT_SESSION_SWEEP_SECS)?;
        if sweep_secs == 0 {
            return Err(ConfigError::Invalid { key: "SESSION_SWEEP_SECS", value: "0".into() });
        }

        Ok(Self {
            database_url,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned()),
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            cookie_secure,
            session_ttl_hours: parse_or(&lookup, "SESSION_TTL_HOURS", DEFAULT_SESSION_TTL_HOURS)?,
            session_sweep: Duration::from_secs(sweep_secs),
            static_dir,
            admin_password: lookup("ADMIN_PASSWORD").filter(|v| !v.is_empty()),
            login_limit: WindowLimit {
                limit: parse_or(&lookup, "RATE_LIMIT_LOGIN", DEFAULT_LOGIN_LIMIT)?,
                window: Duration::from_secs(parse_or(&lookup, "RATE_LIMIT_LOGIN_WINDOW_SECS", DEFAULT_LOGIN_WINDOW_SECS)?),
            },
            message_limit: WindowLimit {
                limit: parse_or(&lookup, "RATE_LIMIT_MESSAGES", DEFAULT_MESSAGE_LIMIT)?,
                window: Duration::from_secs(parse_or(
                    &lookup,
                    "RATE_LIMIT_MESSAGES_WINDOW_SECS",
                    DEFAULT_MESSAGE_WINDOW_SECS,
                )?),
            },
        })
    }

    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
