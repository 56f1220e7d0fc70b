//! RAII lease on a pooled connection

use std::sync::Arc;

use crate::factory::ConnectionFactory;
use crate::pool::Shared;
use crate::record::Record;

/// Exclusive lease on one pooled connection.
///
/// Dereferences to the connection. The connection goes back to the idle
/// queue exactly once: on [`LeaseGuard::release`] or when the guard is
/// dropped, whichever comes first. If the pool has been shut down in the
/// meantime the connection is closed instead.
pub struct LeaseGuard<F: ConnectionFactory> {
    record: Option<Record<F::Connection>>,
    shared: Arc<Shared<F>>,
}

impl<F: ConnectionFactory> LeaseGuard<F> {
    pub(crate) fn new(record: Record<F::Connection>, shared: Arc<Shared<F>>) -> Self {
        Self {
            record: Some(record),
            shared,
        }
    }

    /// Pool-assigned connection id, stable for the connection's lifetime.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.record.as_ref().map_or(0, Record::id)
    }

    /// Return the connection to the pool now.
    pub fn release(mut self) {
        self.give_back();
    }

    fn give_back(&mut self) {
        if let Some(record) = self.record.take() {
            self.shared.return_idle(record);
        }
    }
}

impl<F: ConnectionFactory> std::ops::Deref for LeaseGuard<F> {
    type Target = F::Connection;

    fn deref(&self) -> &F::Connection {
        self.record.as_ref().expect("lease used after release").conn()
    }
}

impl<F: ConnectionFactory> std::ops::DerefMut for LeaseGuard<F> {
    fn deref_mut(&mut self) -> &mut F::Connection {
        self.record.as_mut().expect("lease used after release").conn_mut()
    }
}

impl<F: ConnectionFactory> Drop for LeaseGuard<F> {
    fn drop(&mut self) {
        self.give_back();
    }
}

impl<F: ConnectionFactory> std::fmt::Debug for LeaseGuard<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaseGuard")
            .field("pool", &self.shared.factory.id())
            .field("id", &self.id())
            .finish()
    }
}
