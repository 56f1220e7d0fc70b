//! Process-wide pool instance.
//!
//! ```no_run
//! use cistern_pool::{GlobalPool, IniFile, Pool, SimulatedFactory};
//!
//! static POOL: GlobalPool<SimulatedFactory> = GlobalPool::new("chat", || {
//!     Pool::from_source(SimulatedFactory::new(), &IniFile::new("mysql.ini"))
//! });
//!
//! let conn = POOL.acquire()?;
//! # Ok::<(), cistern_pool::Error>(())
//! ```

use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::factory::ConnectionFactory;
use crate::guard::LeaseGuard;
use crate::pool::Pool;

/// Lazily built, process-wide [`Pool`].
///
/// The first call to [`GlobalPool::get`] runs the init function; every
/// other caller blocks until it finishes and then shares the result. If
/// init fails, the failure is logged once and every call, first and
/// later, gets [`Error::Unavailable`] right away.
pub struct GlobalPool<F: ConnectionFactory> {
    name: &'static str,
    init: fn() -> Result<Pool<F>>,
    cell: OnceLock<std::result::Result<Pool<F>, String>>,
}

impl<F: ConnectionFactory> GlobalPool<F> {
    /// Declare a global pool; nothing runs until first use.
    #[must_use]
    pub const fn new(name: &'static str, init: fn() -> Result<Pool<F>>) -> Self {
        Self {
            name,
            init,
            cell: OnceLock::new(),
        }
    }

    /// The pool, building it on first use.
    ///
    /// # Errors
    /// [`Error::Unavailable`] if initialization failed, now or earlier.
    pub fn get(&self) -> Result<&Pool<F>> {
        self.cell
            .get_or_init(|| {
                (self.init)().map_err(|e| {
                    tracing::error!(pool = self.name, error = %e, "global pool initialization failed");
                    e.to_string()
                })
            })
            .as_ref()
            .map_err(|reason| Error::unavailable(self.name, reason.clone()))
    }

    /// Shorthand for `get()?.acquire()`.
    ///
    /// # Errors
    /// See [`GlobalPool::get`] and [`Pool::acquire`].
    pub fn acquire(&self) -> Result<LeaseGuard<F>> {
        self.get()?.acquire()
    }

    /// Whether initialization has run (successfully or not).
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<F: ConnectionFactory> std::fmt::Debug for GlobalPool<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.cell.get() {
            None => "uninitialized",
            Some(Ok(_)) => "ready",
            Some(Err(_)) => "unavailable",
        };
        f.debug_struct("GlobalPool")
            .field("name", &self.name)
            .field("state", &state)
            .finish()
    }
}
