//! Server configuration from environment variables.

use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use crate::ndbc::NdbcConfig;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 5001;

/// Error returned when an environment variable has an unusable value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value {value:?} for {key}: {reason}")]
pub struct ConfigError {
    key: &'static str,
    value: String,
    reason: String,
}

/// Configuration for the whole server process.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind (`BUOY_HOST`)
    pub host: IpAddr,
    /// Port to bind (`BUOY_PORT`)
    pub port: u16,
    /// Upstream client settings (`NDBC_BASE_URL`, `NDBC_TIMEOUT_SECS`, `NDBC_MAX_CONCURRENT`)
    pub ndbc: NdbcConfig,
    /// Serve upstream data from this directory instead of NDBC (`NDBC_MOCK_DIR`)
    pub mock_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// Unset and empty variables fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = NdbcConfig::default();

        let timeout_secs = parse_or(&var, "NDBC_TIMEOUT_SECS", defaults.timeout_secs)?;
        if timeout_secs == 0 {
            return Err(ConfigError {
                key: "NDBC_TIMEOUT_SECS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let max_concurrent = parse_or(&var, "NDBC_MAX_CONCURRENT", defaults.max_concurrent)?;
        if max_concurrent == 0 {
            return Err(ConfigError {
                key: "NDBC_MAX_CONCURRENT",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let mut ndbc = defaults
            .with_timeout(timeout_secs)
            .with_max_concurrent(max_concurrent);
        if let Some(url) = var("NDBC_BASE_URL") {
            ndbc = ndbc.with_base_url(url);
        }

        Ok(Self {
            host: parse_or(&var, "BUOY_HOST", DEFAULT_HOST)?,
            port: parse_or(&var, "BUOY_PORT", DEFAULT_PORT)?,
            ndbc,
            mock_dir: var("NDBC_MOCK_DIR").map(PathBuf::from),
        })
    }

    /// The socket address to bind.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            ndbc: NdbcConfig::default(),
            mock_dir: None,
        }
    }
}

fn parse_or<T>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match var(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}
