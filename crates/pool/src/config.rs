//! Pool configuration types

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use serde_with::{DurationMilliSeconds, DurationSeconds, serde_as};

use crate::error::{Error, Result};

/// Parameters handed to [`ConnectionFactory::connect`](crate::ConnectionFactory::connect).
///
/// `Debug` never prints the password.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ConnectParams {
    /// Server host name or IP address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Login user
    pub username: String,
    /// Login password
    pub password: String,
    /// Database (schema) to select after connecting
    pub database: String,
}

impl ConnectParams {
    /// `host:port` of the server.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// `host:port/database`, used to label connect errors.
    #[must_use]
    pub fn target(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.database)
    }
}

impl Default for ConnectParams {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3306,
            username: String::new(),
            password: String::new(),
            database: String::new(),
        }
    }
}

impl std::fmt::Debug for ConnectParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

/// Configuration for a connection pool.
///
/// Immutable once the pool is built.
#[cfg_attr(feature = "serde", serde_as)]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PoolConfig {
    /// Connections opened at warm start; also the floor the reaper never
    /// shrinks below
    pub initial_size: usize,
    /// Upper bound on live connections (idle + leased)
    pub max_size: usize,
    /// Idle time after which a surplus connection is retired; also the
    /// reaper's scan interval
    #[cfg_attr(
        feature = "serde",
        serde_as(as = "DurationSeconds<u64>"),
        serde(rename = "max_idle_secs")
    )]
    pub max_idle_time: Duration,
    /// Default wait used by [`Pool::acquire`](crate::Pool::acquire)
    #[cfg_attr(
        feature = "serde",
        serde_as(as = "DurationMilliSeconds<u64>"),
        serde(rename = "acquire_timeout_ms")
    )]
    pub acquire_timeout: Duration,
    /// Pause before the creator retries after a failed connect
    #[cfg_attr(
        feature = "serde",
        serde_as(as = "DurationMilliSeconds<u64>"),
        serde(rename = "retry_interval_ms")
    )]
    pub retry_interval: Duration,
    /// Where and how to connect
    pub connect: ConnectParams,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_size: 1,
            max_size: 10,
            max_idle_time: Duration::from_secs(60),
            acquire_timeout: Duration::from_secs(1),
            retry_interval: Duration::from_secs(1),
            connect: ConnectParams::default(),
        }
    }
}

impl PoolConfig {
    /// Validate pool configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.initial_size == 0 {
            return Err(Error::configuration("initial_size must be at least 1"));
        }
        if self.initial_size > self.max_size {
            return Err(Error::configuration(format!(
                "initial_size ({}) must not exceed max_size ({})",
                self.initial_size, self.max_size
            )));
        }
        if self.max_idle_time.is_zero() {
            return Err(Error::configuration(
                "max_idle_time must be greater than zero",
            ));
        }
        if self.acquire_timeout.is_zero() {
            return Err(Error::configuration(
                "acquire_timeout must be greater than zero",
            ));
        }
        if self.retry_interval.is_zero() {
            return Err(Error::configuration(
                "retry_interval must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_config_default() {
        let config = PoolConfig::default();
        assert_eq!(config.initial_size, 1);
        assert_eq!(config.max_size, 10);
        assert_eq!(config.max_idle_time, Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_pool_config_validation() {
        assert!(PoolConfig { initial_size: 0, ..Default::default() }.validate().is_err());
        assert!(
            PoolConfig { initial_size: 11, max_size: 10, ..Default::default() }
                .validate()
                .is_err()
        );
        assert!(
            PoolConfig { initial_size: 3, max_size: 3, ..Default::default() }
                .validate()
                .is_ok()
        );
        assert!(
            PoolConfig { max_idle_time: Duration::ZERO, ..Default::default() }
                .validate()
                .is_err()
        );
        assert!(
            PoolConfig { acquire_timeout: Duration::ZERO, ..Default::default() }
                .validate()
                .is_err()
        );
    }

    #[test]
    fn debug_redacts_password() {
        let params = ConnectParams {
            password: "hunter2".to_string(),
            ..Default::default()
        };
        let rendered = format!("{params:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn target_includes_database() {
        let params = ConnectParams {
            host: "db.internal".to_string(),
            port: 3307,
            database: "orders".to_string(),
            ..Default::default()
        };
        assert_eq!(params.address(), "db.internal:3307");
        assert_eq!(params.target(), "db.internal:3307/orders");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn durations_serialize_in_named_units() {
        let config = PoolConfig {
            max_idle_time: Duration::from_secs(90),
            acquire_timeout: Duration::from_millis(1500),
            ..Default::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["max_idle_secs"], 90);
        assert_eq!(json["acquire_timeout_ms"], 1500);

        let back: PoolConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_keeps_default_durations() {
        let config: PoolConfig =
            serde_json::from_str(r#"{"max_size": 4, "retry_interval_ms": 250}"#).unwrap();
        assert_eq!(config.max_size, 4);
        assert_eq!(config.retry_interval, Duration::from_millis(250));
        assert_eq!(config.max_idle_time, Duration::from_secs(60));
        assert!(serde_json::from_str::<PoolConfig>(r#"{"max_idle_secs": -1}"#).is_err());
    }
}
