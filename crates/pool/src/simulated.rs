//! In-process stand-in for a database driver.
//!
//! [`SimulatedFactory`] "connects" by sleeping for a fixed latency and can
//! be told to refuse every Nth attempt. The CLI benchmark and the load
//! tests run against it; nothing here touches the network.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::config::ConnectParams;
use crate::error::{Error, Result};
use crate::factory::ConnectionFactory;

/// A connection opened by [`SimulatedFactory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedConnection {
    id: u64,
    address: String,
    database: String,
}

impl SimulatedConnection {
    /// Factory-assigned sequence number.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// `host:port` this connection pretends to be attached to.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Database selected at connect time.
    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Pretend to run a statement by sleeping for `cost`.
    pub fn execute(&self, cost: Duration) {
        if !cost.is_zero() {
            std::thread::sleep(cost);
        }
    }
}

/// Connection factory with configurable connect latency and failures.
#[derive(Debug, Default)]
pub struct SimulatedFactory {
    latency: Duration,
    fail_every: u64,
    attempts: AtomicU64,
    opened: AtomicU64,
    closed: AtomicU64,
}

impl SimulatedFactory {
    /// Factory whose connects succeed immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep for `latency` in every connect.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Refuse every `n`th connect attempt (`0` disables failures).
    #[must_use]
    pub fn fail_every(mut self, n: u64) -> Self {
        self.fail_every = n;
        self
    }

    /// Connections opened so far.
    #[must_use]
    pub fn opened(&self) -> u64 {
        self.opened.load(Ordering::Relaxed)
    }

    /// Connections closed so far.
    #[must_use]
    pub fn closed(&self) -> u64 {
        self.closed.load(Ordering::Relaxed)
    }
}

impl ConnectionFactory for SimulatedFactory {
    type Connection = SimulatedConnection;

    fn id(&self) -> &str {
        "simulated"
    }

    fn connect(&self, params: &ConnectParams) -> Result<SimulatedConnection> {
        let attempt = self.attempts.fetch_add(1, Ordering::Relaxed) + 1;
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
        if self.fail_every > 0 && attempt % self.fail_every == 0 {
            return Err(Error::connect(
                params.target(),
                format!("simulated failure on attempt {attempt}"),
            ));
        }

        let id = self.opened.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(SimulatedConnection {
            id,
            address: params.address(),
            database: params.database.clone(),
        })
    }

    fn close(&self, connection: SimulatedConnection) {
        self.closed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(connection = connection.id, "simulated connection closed");
    }
}
