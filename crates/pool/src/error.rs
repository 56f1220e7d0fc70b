//! Error types for connection pooling
use thiserror::Error;

/// Result type for pool operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed cause attached to errors raised by a lower layer.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for every pool operation.
///
/// Only [`Error::Timeout`] is an expected outcome under load; callers may
/// retry it with their own backoff. [`Error::Unavailable`] means the pool
/// could never be constructed and will not recover.
#[derive(Error, Debug)]
pub enum Error {
    /// Pool configuration is invalid
    #[error("Configuration error: {message}")]
    Configuration {
        /// The error message
        message: String,
        /// The underlying error
        #[source]
        source: Option<BoxError>,
    },

    /// The configuration collaborator could not produce a `PoolConfig`
    #[error("Failed to load pool configuration from '{origin}': {reason}")]
    ConfigLoad {
        /// Where the configuration was read from (usually a file path)
        origin: String,
        /// The failure reason
        reason: String,
        /// The underlying error
        #[source]
        source: Option<BoxError>,
    },

    /// The connection factory could not open a connection
    #[error("Failed to connect to '{target}': {reason}")]
    Connect {
        /// Address (and database) the factory tried to reach
        target: String,
        /// The failure reason
        reason: String,
        /// The underlying error
        #[source]
        source: Option<BoxError>,
    },

    /// No idle connection became available within the timeout
    #[error("Timed out after {timeout_ms}ms waiting for an idle connection from '{pool}'")]
    Timeout {
        /// The pool identifier
        pool: String,
        /// The timeout that elapsed, in milliseconds
        timeout_ms: u64,
    },

    /// The pool has been shut down
    #[error("Pool '{pool}' is closed")]
    Closed {
        /// The pool identifier
        pool: String,
    },

    /// The pool failed to initialize and is permanently unusable
    #[error("Pool '{pool}' is unavailable: {reason}")]
    Unavailable {
        /// The pool identifier
        pool: String,
        /// Why initialization failed
        reason: String,
    },

    /// Generic internal error
    #[error("Internal error in pool '{pool}': {message}")]
    Internal {
        /// The pool identifier
        pool: String,
        /// The error message
        message: String,
        /// The underlying error
        #[source]
        source: Option<BoxError>,
    },
}

impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration-load error
    pub fn config_load(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigLoad {
            origin: origin.into(),
            reason: reason.into(),
            source: None,
        }
    }

    /// Create a configuration-load error with an underlying cause
    pub fn config_load_with(
        origin: impl Into<String>,
        reason: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::ConfigLoad {
            origin: origin.into(),
            reason: reason.into(),
            source: Some(source.into()),
        }
    }

    /// Create a connect error
    pub fn connect(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Connect {
            target: target.into(),
            reason: reason.into(),
            source: None,
        }
    }

    /// Create a connect error with an underlying cause
    pub fn connect_with(
        target: impl Into<String>,
        reason: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Connect {
            target: target.into(),
            reason: reason.into(),
            source: Some(source.into()),
        }
    }

    /// Create a timeout error
    pub fn timeout(pool: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self::Timeout {
            pool: pool.into(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Create a closed-pool error
    pub fn closed(pool: impl Into<String>) -> Self {
        Self::Closed { pool: pool.into() }
    }

    /// Create an unavailable-pool error
    pub fn unavailable(pool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            pool: pool.into(),
            reason: reason.into(),
        }
    }

    /// Create an internal error with an underlying cause
    pub fn internal(
        pool: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Internal {
            pool: pool.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Check if this error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Connect { .. })
    }

    /// Check if this error is an acquire timeout
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Get the pool identifier associated with this error (if any)
    #[must_use]
    pub fn pool(&self) -> Option<&str> {
        match self {
            Self::Configuration { .. } | Self::ConfigLoad { .. } | Self::Connect { .. } => None,
            Self::Timeout { pool, .. }
            | Self::Closed { pool }
            | Self::Unavailable { pool, .. }
            | Self::Internal { pool, .. } => Some(pool),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn timeout_is_retryable() {
        let err = Error::timeout("primary", Duration::from_millis(250));
        assert!(err.is_retryable());
        assert!(err.is_timeout());
        assert_eq!(err.pool(), Some("primary"));
        assert_eq!(
            err.to_string(),
            "Timed out after 250ms waiting for an idle connection from 'primary'"
        );
    }

    #[test]
    fn unavailable_is_not_retryable() {
        let err = Error::unavailable("primary", "mysql.ini missing");
        assert!(!err.is_retryable());
        assert!(!err.is_timeout());
    }

    #[test]
    fn connect_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = Error::connect_with("127.0.0.1:3306/app", "handshake failed", io);
        let source = std::error::Error::source(&err).expect("source should be kept");
        assert_eq!(source.to_string(), "refused");
        assert_eq!(err.pool(), None);
    }
}
