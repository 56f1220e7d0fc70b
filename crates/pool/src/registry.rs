//! Shared pool state: the idle queue and the live count.
//!
//! [`Registry`] holds no lock of its own. The pool keeps it inside a single
//! `parking_lot::Mutex` and every method here runs with that lock held, so
//! the queue and the live count always change together:
//!
//! `0 <= idle.len() <= live <= max_size`
//!
//! The idle queue is FIFO. A record is pushed to the back when it becomes
//! idle, so the front is always the record that has been idle longest; the
//! reaper relies on this to stop scanning at the first non-expired record.

use std::collections::VecDeque;
use std::time::Instant;

use crate::config::PoolConfig;
use crate::error::Result;
use crate::factory::ConnectionFactory;
use crate::pool::PoolStats;
use crate::record::Record;

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    created: u64,
    retired: u64,
    acquisitions: u64,
    releases: u64,
    timeouts: u64,
    connect_failures: u64,
}

#[derive(Debug)]
pub(crate) struct Registry<C> {
    idle: VecDeque<Record<C>>,
    live: usize,
    config: PoolConfig,
    closed: bool,
    counters: Counters,
}

impl<C> Registry<C> {
    pub(crate) fn new(config: PoolConfig) -> Self {
        Self {
            idle: VecDeque::with_capacity(config.max_size),
            live: 0,
            config,
            closed: false,
            counters: Counters::default(),
        }
    }

    #[cfg(test)]
    pub(crate) fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn live(&self) -> usize {
        self.live
    }

    #[cfg(test)]
    pub(crate) fn idle_len(&self) -> usize {
        self.idle.len()
    }

    /// True when the creator has work: nothing idle and room to grow.
    pub(crate) fn needs_connection(&self) -> bool {
        !self.closed && self.idle.is_empty() && self.live < self.config.max_size
    }

    /// Remove the longest-idle record, if any.
    pub(crate) fn take_idle(&mut self) -> Option<Record<C>> {
        let record = self.idle.pop_front()?;
        self.counters.acquisitions += 1;
        Some(record)
    }

    /// Put a leased record back at the end of the queue and restart its
    /// idle clock. The live count does not change.
    pub(crate) fn return_idle(&mut self, mut record: Record<C>, now: Instant) {
        debug_assert!(self.idle.len() < self.live, "returned record was never leased");
        record.touch(now);
        self.idle.push_back(record);
        self.counters.releases += 1;
    }

    /// Open one connection and enqueue it as idle.
    ///
    /// The caller must have checked `live < max_size`. Returns the new
    /// record's id.
    pub(crate) fn create_and_enqueue<F>(&mut self, factory: &F, now: Instant) -> Result<u64>
    where
        F: ConnectionFactory<Connection = C>,
    {
        debug_assert!(self.live < self.config.max_size, "creating past max_size");
        match factory.connect(&self.config.connect) {
            Ok(conn) => {
                self.counters.created += 1;
                let id = self.counters.created;
                self.idle.push_back(Record::new(id, conn, now));
                self.live += 1;
                Ok(id)
            }
            Err(e) => {
                self.counters.connect_failures += 1;
                Err(e)
            }
        }
    }

    /// Retire the front record if the queue is above `floor` and the record
    /// has been idle longer than `max_idle_time`, handing its connection
    /// back for the caller to close once the lock is released.
    ///
    /// Returns `None` once nothing more can be retired; since the front is
    /// the longest-idle record, nothing behind it can be expired either.
    pub(crate) fn retire_oldest_if_expired(&mut self, now: Instant, floor: usize) -> Option<C> {
        if self.idle.len() <= floor {
            return None;
        }
        let expired = self
            .idle
            .front()
            .is_some_and(|record| record.idle_for(now) > self.config.max_idle_time);
        if !expired {
            return None;
        }
        let record = self.idle.pop_front()?;
        self.live -= 1;
        self.counters.retired += 1;
        Some(record.into_conn())
    }

    pub(crate) fn note_timeout(&mut self) {
        self.counters.timeouts += 1;
    }

    /// Drop a leased record that came back after shutdown.
    pub(crate) fn discard(&mut self, record: Record<C>) -> C {
        self.live -= 1;
        self.counters.retired += 1;
        record.into_conn()
    }

    /// Mark the registry closed and hand back every idle connection for
    /// the caller to close.
    pub(crate) fn close(&mut self) -> Vec<C> {
        self.closed = true;
        let drained: Vec<C> = self.idle.drain(..).map(Record::into_conn).collect();
        self.live -= drained.len();
        self.counters.retired += drained.len() as u64;
        drained
    }

    pub(crate) fn stats(&self) -> PoolStats {
        PoolStats {
            idle: self.idle.len(),
            leased: self.live - self.idle.len(),
            live: self.live,
            max_size: self.config.max_size,
            created: self.counters.created,
            retired: self.counters.retired,
            acquisitions: self.counters.acquisitions,
            releases: self.counters.releases,
            timeouts: self.counters.timeouts,
            connect_failures: self.counters.connect_failures,
        }
    }
}
