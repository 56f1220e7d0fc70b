//! Testing utilities for pool consumers and for the pool's own tests

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use crate::config::ConnectParams;
use crate::error::{Error, Result};
use crate::factory::ConnectionFactory;

/// Connection handed out by [`MockFactory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockConnection {
    /// Sequence number of the connect call that produced this connection
    pub id: u64,
    /// Free-form counter tests can bump through a lease
    pub queries: u64,
}

#[derive(Debug, Default)]
struct MockState {
    connects: AtomicU64,
    closes: AtomicU64,
    attempts: AtomicU64,
    failing: AtomicBool,
    /// Fail every connect once this many have succeeded (0 = never)
    fail_after: AtomicU64,
    latency: Mutex<Duration>,
    close_latency: Mutex<Duration>,
}

/// Factory that opens in-memory [`MockConnection`]s and counts calls.
///
/// Clones share their counters, so a test can keep one handle and give
/// the other to the pool.
#[derive(Debug, Clone, Default)]
pub struct MockFactory {
    state: Arc<MockState>,
}

impl MockFactory {
    /// New factory that always succeeds instantly.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep for `latency` inside every `connect`.
    #[must_use]
    pub fn with_latency(self, latency: Duration) -> Self {
        *self.state.latency.lock() = latency;
        self
    }

    /// Sleep for `latency` inside every `close`.
    #[must_use]
    pub fn with_close_latency(self, latency: Duration) -> Self {
        *self.state.close_latency.lock() = latency;
        self
    }

    /// Make every subsequent `connect` fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    /// Let `n` connects succeed in total, then fail the rest.
    pub fn fail_after(&self, n: u64) {
        self.state.fail_after.store(n, Ordering::SeqCst);
    }

    /// Successful connects so far.
    #[must_use]
    pub fn connects(&self) -> u64 {
        self.state.connects.load(Ordering::SeqCst)
    }

    /// Connect calls so far, including failed ones.
    #[must_use]
    pub fn attempts(&self) -> u64 {
        self.state.attempts.load(Ordering::SeqCst)
    }

    /// Connections closed so far.
    #[must_use]
    pub fn closes(&self) -> u64 {
        self.state.closes.load(Ordering::SeqCst)
    }

    /// Connections opened and not yet closed.
    #[must_use]
    pub fn open_connections(&self) -> u64 {
        self.connects().saturating_sub(self.closes())
    }
}

impl ConnectionFactory for MockFactory {
    type Connection = MockConnection;

    fn id(&self) -> &str {
        "mock"
    }

    fn connect(&self, params: &ConnectParams) -> Result<MockConnection> {
        self.state.attempts.fetch_add(1, Ordering::SeqCst);

        let latency = *self.state.latency.lock();
        if !latency.is_zero() {
            std::thread::sleep(latency);
        }

        let limit = self.state.fail_after.load(Ordering::SeqCst);
        if self.state.failing.load(Ordering::SeqCst) || (limit > 0 && self.connects() >= limit) {
            return Err(Error::connect(params.target(), "mock connect refused"));
        }

        let id = self.state.connects.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(MockConnection { id, queries: 0 })
    }

    fn close(&self, connection: MockConnection) {
        let latency = *self.state.close_latency.lock();
        if !latency.is_zero() {
            std::thread::sleep(latency);
        }
        self.state.closes.fetch_add(1, Ordering::SeqCst);
        drop(connection);
    }
}
