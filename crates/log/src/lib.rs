//! # Cistern Log
//!
//! Subscriber setup shared by the `cistern` binary and by tests.
//!
//! ```rust,no_run
//! fn main() -> cistern_log::Result<()> {
//!     let _guard = cistern_log::auto_init()?;
//!     tracing::info!(pool = "chat", "starting");
//!     Ok(())
//! }
//! ```

mod builder;
mod config;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, DisplayConfig, Format, WriterConfig};

/// Result type for logger setup
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for logger setup
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The level filter could not be parsed
    #[error("Invalid filter '{filter}': {reason}")]
    Filter {
        /// The filter string as given
        filter: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber is already installed
    #[error("Logger already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Pick a configuration from the environment and build type, then install it.
///
/// `CISTERN_LOG` or `RUST_LOG` being set selects [`Config::from_env`];
/// otherwise debug builds get [`Config::development`] and release builds
/// [`Config::production`].
///
/// # Errors
/// See [`LoggerBuilder::build`].
pub fn auto_init() -> Result<LoggerGuard> {
    if std::env::var_os("CISTERN_LOG").is_some() || std::env::var_os("RUST_LOG").is_some() {
        init_with(Config::from_env())
    } else if cfg!(debug_assertions) {
        init_with(Config::development())
    } else {
        init_with(Config::production())
    }
}

/// Initialize with [`Config::default`].
///
/// # Errors
/// See [`LoggerBuilder::build`].
pub fn init() -> Result<LoggerGuard> {
    init_with(Config::default())
}

/// Initialize with a custom configuration.
///
/// # Errors
/// See [`LoggerBuilder::build`].
pub fn init_with(config: Config) -> Result<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}
