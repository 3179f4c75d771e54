//! Server configuration read from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use api::RouterOptions;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ASSETS_DIR: &str = "./frontend";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {name}={value:?}: {reason}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub assets_dir: PathBuf,
    pub request_timeout: Duration,
    /// Legacy comma-delimited jobs file to import into an empty store.
    pub legacy_jobs_file: Option<PathBuf>,
}

fn non_empty(v: String) -> Option<String> {
    let trimmed = v.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parsed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name).and_then(non_empty) {
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError {
            name,
            reason: e.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

impl ServerConfig {
    /// Read configuration from environment variables.
    ///
    /// - `HOST` (default: `0.0.0.0`), `PORT` (default: `8080`)
    /// - `ASSETS_DIR` (default: `./frontend`)
    /// - `REQUEST_TIMEOUT_SECS` (default: `3`)
    /// - `LEGACY_JOBS_FILE` (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ServerConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parsed(&lookup, "HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;
        let port = parsed(&lookup, "PORT", DEFAULT_PORT)?;
        let timeout_secs = parsed(&lookup, "REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        let assets_dir = lookup("ASSETS_DIR")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_ASSETS_DIR.to_string());

        Ok(Self {
            host,
            port,
            assets_dir: PathBuf::from(assets_dir),
            request_timeout: Duration::from_secs(timeout_secs),
            legacy_jobs_file: lookup("LEGACY_JOBS_FILE").and_then(non_empty).map(PathBuf::from),
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn router_options(&self) -> RouterOptions {
        RouterOptions {
            assets_dir: self.assets_dir.clone(),
            request_timeout: self.request_timeout,
        }
    }
}
