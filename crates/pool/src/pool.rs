//! The pool itself: warm start, acquisition, statistics and shutdown.
//!
//! `Pool<F>` owns two background threads that share one [`Registry`]
//! behind a `parking_lot::Mutex`:
//!
//! - the creator ([`crate::creator`]) opens a connection whenever the idle
//!   queue is empty and the pool is below `max_size`;
//! - the reaper ([`crate::reaper`]) retires connections that stayed idle
//!   past `max_idle_time`, never going below `initial_size`.
//!
//! Consumers and the creator wait on the same condition variable and every
//! state change is broadcast with `notify_all`, so no ordering is promised
//! among waiting consumers.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::config::PoolConfig;
use crate::error::{Error, Result};
use crate::factory::ConnectionFactory;
use crate::guard::LeaseGuard;
use crate::record::Record;
use crate::registry::Registry;
use crate::source::ConfigSource;

/// Point-in-time pool statistics, read under the pool lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PoolStats {
    /// Connections sitting in the idle queue.
    pub idle: usize,
    /// Connections currently leased to callers.
    pub leased: usize,
    /// Live connections (idle + leased).
    pub live: usize,
    /// Configured ceiling on live connections.
    pub max_size: usize,
    /// Connections ever opened.
    pub created: u64,
    /// Connections ever closed by the reaper or shutdown.
    pub retired: u64,
    /// Successful acquisitions.
    pub acquisitions: u64,
    /// Leases returned to the idle queue.
    pub releases: u64,
    /// Acquisitions that timed out.
    pub timeouts: u64,
    /// Failed connect attempts (warm start and creator).
    pub connect_failures: u64,
}

/// State shared by the pool handle, its worker threads and every lease.
pub(crate) struct Shared<F: ConnectionFactory> {
    pub(crate) factory: F,
    pub(crate) registry: Mutex<Registry<F::Connection>>,
    /// Wakes consumers and the creator on any queue change.
    pub(crate) available: Condvar,
    /// Wakes the reaper early; only signalled on shutdown.
    pub(crate) reaper_wake: Condvar,
    pub(crate) config: PoolConfig,
}

impl<F: ConnectionFactory> Shared<F> {
    /// Give a leased record back. After shutdown the connection is closed
    /// instead of re-queued.
    pub(crate) fn return_idle(&self, record: Record<F::Connection>) {
        let mut registry = self.registry.lock();
        if registry.is_closed() {
            let conn = registry.discard(record);
            drop(registry);
            self.factory.close(conn);
            return;
        }
        let id = record.id();
        registry.return_idle(record, Instant::now());
        drop(registry);
        self.available.notify_all();
        tracing::trace!(pool = self.factory.id(), connection = id, "connection returned");
    }
}

struct PoolInner<F: ConnectionFactory> {
    shared: Arc<Shared<F>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl<F: ConnectionFactory> PoolInner<F> {
    fn spawn_worker(&self, name: &str, run: fn(Arc<Shared<F>>)) -> Result<()> {
        let shared = Arc::clone(&self.shared);
        let handle = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || run(shared))
            .map_err(|e| {
                Error::internal(self.shared.factory.id(), format!("cannot spawn {name}"), e)
            })?;
        self.workers.lock().push(handle);
        Ok(())
    }

    fn shutdown(&self) {
        let shared = &self.shared;
        let drained = {
            let mut registry = shared.registry.lock();
            if registry.is_closed() {
                Vec::new()
            } else {
                registry.close()
            }
        };
        shared.available.notify_all();
        shared.reaper_wake.notify_all();

        let closed = drained.len();
        for conn in drained {
            shared.factory.close(conn);
        }

        let workers = std::mem::take(&mut *self.workers.lock());
        let joined = !workers.is_empty();
        for worker in workers {
            if worker.join().is_err() {
                tracing::warn!(pool = shared.factory.id(), "pool worker thread panicked");
            }
        }
        if joined {
            tracing::info!(pool = shared.factory.id(), closed, "pool shut down");
        }
    }
}

impl<F: ConnectionFactory> Drop for PoolInner<F> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Bounded, thread-safe connection pool.
///
/// Cloning is cheap and yields another handle to the same pool. The pool
/// shuts down when [`Pool::shutdown`] is called or the last handle is
/// dropped.
pub struct Pool<F: ConnectionFactory> {
    inner: Arc<PoolInner<F>>,
}

impl<F: ConnectionFactory> Clone for Pool<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: ConnectionFactory> std::fmt::Debug for Pool<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("factory", &self.inner.shared.factory.id())
            .field("stats", &self.stats())
            .finish()
    }
}

impl<F: ConnectionFactory> Pool<F> {
    /// Build a pool: validate `config`, open `initial_size` connections and
    /// start the creator and reaper threads.
    ///
    /// # Errors
    /// Returns the configuration error, or the first connect error hit
    /// during warm start (connections opened before it are closed again).
    pub fn new(factory: F, config: PoolConfig) -> Result<Self> {
        config.validate()?;

        let mut registry = Registry::new(config.clone());
        let now = Instant::now();
        for _ in 0..config.initial_size {
            if let Err(e) = registry.create_and_enqueue(&factory, now) {
                tracing::error!(
                    pool = factory.id(),
                    target = %config.connect.target(),
                    error = %e,
                    "warm start failed"
                );
                for conn in registry.close() {
                    factory.close(conn);
                }
                return Err(e);
            }
        }

        let shared = Arc::new(Shared {
            factory,
            registry: Mutex::new(registry),
            available: Condvar::new(),
            reaper_wake: Condvar::new(),
            config,
        });
        let inner = Arc::new(PoolInner {
            shared: Arc::clone(&shared),
            workers: Mutex::new(Vec::with_capacity(2)),
        });

        // `inner` shuts the already-started workers down if a spawn fails.
        inner.spawn_worker("cistern-creator", crate::creator::run::<F>)?;
        inner.spawn_worker("cistern-reaper", crate::reaper::run::<F>)?;

        tracing::info!(
            pool = shared.factory.id(),
            initial_size = shared.config.initial_size,
            max_size = shared.config.max_size,
            max_idle_secs = shared.config.max_idle_time.as_secs(),
            "pool ready"
        );

        Ok(Self { inner })
    }

    /// Load the configuration from `source`, then build the pool.
    pub fn from_source(factory: F, source: &dyn ConfigSource) -> Result<Self> {
        let config = source.load()?;
        Self::new(factory, config)
    }

    /// Acquire a connection, waiting up to the configured
    /// `acquire_timeout`.
    pub fn acquire(&self) -> Result<LeaseGuard<F>> {
        self.acquire_timeout(self.inner.shared.config.acquire_timeout)
    }

    /// Acquire a connection, waiting up to `timeout` for one to become
    /// idle.
    ///
    /// The returned guard gives the connection back when it is released or
    /// dropped. The pool lock is not held while the caller uses it.
    ///
    /// # Errors
    /// - [`Error::Timeout`] if nothing became idle in time (normal under
    ///   load);
    /// - [`Error::Closed`] if the pool was shut down.
    pub fn acquire_timeout(&self, timeout: Duration) -> Result<LeaseGuard<F>> {
        let shared = &self.inner.shared;
        let deadline = Instant::now().checked_add(timeout);

        let mut registry = shared.registry.lock();
        let record = loop {
            if registry.is_closed() {
                return Err(Error::closed(shared.factory.id()));
            }
            if let Some(record) = registry.take_idle() {
                break record;
            }
            let timed_out = match deadline {
                Some(deadline) => shared.available.wait_until(&mut registry, deadline).timed_out(),
                None => {
                    shared.available.wait(&mut registry);
                    false
                }
            };
            if timed_out {
                if registry.is_closed() {
                    continue;
                }
                // a broadcast can race the deadline; take what is there
                if let Some(record) = registry.take_idle() {
                    break record;
                }
                registry.note_timeout();
                drop(registry);
                tracing::debug!(
                    pool = shared.factory.id(),
                    timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                    "acquire timed out"
                );
                return Err(Error::timeout(shared.factory.id(), timeout));
            }
        };
        drop(registry);

        // wake the creator so replenishment overlaps with the caller's work
        shared.available.notify_all();
        tracing::trace!(pool = shared.factory.id(), connection = record.id(), "connection leased");
        Ok(LeaseGuard::new(record, Arc::clone(shared)))
    }

    /// Current pool statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.inner.shared.registry.lock().stats()
    }

    /// The configuration the pool was built with.
    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.inner.shared.config
    }

    /// The factory this pool opens connections with.
    #[must_use]
    pub fn factory(&self) -> &F {
        &self.inner.shared.factory
    }

    /// Whether [`Pool::shutdown`] has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.shared.registry.lock().is_closed()
    }

    /// Shut the pool down: close every idle connection, fail current and
    /// future waiters with [`Error::Closed`], and join the background
    /// threads. Leases still out are closed when they come back.
    ///
    /// Idempotent.
    pub fn shutdown(&self) {
        self.inner.shutdown();
    }
}
