//! # Cistern Connection Pool
//!
//! A bounded, thread-safe pool of database connections.
//!
//! Connections are opened through a [`ConnectionFactory`], kept in a FIFO
//! idle queue and leased out as [`LeaseGuard`]s that return themselves on
//! drop. A background creator opens a new connection whenever the queue
//! runs dry below `max_size`; a background reaper retires connections that
//! stay idle longer than `max_idle_time`, never shrinking below
//! `initial_size`.
//!
//! ```no_run
//! use cistern_pool::{Pool, PoolConfig, SimulatedFactory};
//!
//! let pool = Pool::new(SimulatedFactory::new(), PoolConfig::default())?;
//! let conn = pool.acquire()?;
//! println!("leased connection {} to {}", conn.id(), conn.address());
//! conn.release();
//! # Ok::<(), cistern_pool::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod factory;
pub mod global;
pub mod guard;
pub mod pool;
pub mod simulated;
pub mod source;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

mod creator;
mod reaper;
mod record;
mod registry;

pub use config::{ConnectParams, PoolConfig};
pub use error::{BoxError, Error, Result};
pub use factory::ConnectionFactory;
pub use global::GlobalPool;
pub use guard::LeaseGuard;
pub use pool::{Pool, PoolStats};
pub use simulated::{SimulatedConnection, SimulatedFactory};
pub use source::{ConfigSource, IniFile};

#[cfg(feature = "toml")]
pub use source::TomlFile;
