//! A pooled connection and its idle clock.

use std::time::{Duration, Instant};

/// One live connection owned by the pool.
///
/// `idle_since` restarts every time the record enters the idle queue, so
/// [`Record::idle_for`] measures time since the last return, not since
/// creation.
#[derive(Debug)]
pub(crate) struct Record<C> {
    id: u64,
    conn: C,
    idle_since: Instant,
}

impl<C> Record<C> {
    pub(crate) fn new(id: u64, conn: C, now: Instant) -> Self {
        Self {
            id,
            conn,
            idle_since: now,
        }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// Restart the idle clock.
    pub(crate) fn touch(&mut self, now: Instant) {
        self.idle_since = now;
    }

    pub(crate) fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.idle_since)
    }

    pub(crate) fn conn(&self) -> &C {
        &self.conn
    }

    pub(crate) fn conn_mut(&mut self) -> &mut C {
        &mut self.conn
    }

    pub(crate) fn into_conn(self) -> C {
        self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_clock_restarts_on_touch() {
        let t0 = Instant::now();
        let mut record = Record::new(1, "conn", t0);
        assert_eq!(record.idle_for(t0 + Duration::from_secs(70)), Duration::from_secs(70));

        record.touch(t0 + Duration::from_secs(70));
        assert_eq!(record.idle_for(t0 + Duration::from_secs(100)), Duration::from_secs(30));
    }

    #[test]
    fn idle_for_never_underflows() {
        let t0 = Instant::now();
        let record = Record::new(1, (), t0 + Duration::from_secs(5));
        assert_eq!(record.idle_for(t0), Duration::ZERO);
    }
}
