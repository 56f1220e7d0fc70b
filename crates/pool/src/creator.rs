//! Background creator thread.
//!
//! Sleeps until the idle queue is empty and the pool is below `max_size`,
//! then opens exactly one connection and broadcasts. A failed connect is
//! logged and retried after `retry_interval`; it never takes the thread
//! down.

use std::sync::Arc;
use std::time::Instant;

use crate::factory::ConnectionFactory;
use crate::pool::Shared;

pub(crate) fn run<F: ConnectionFactory>(shared: Arc<Shared<F>>) {
    let pool = shared.factory.id();
    tracing::debug!(pool, "creator started");

    let mut registry = shared.registry.lock();
    loop {
        while !registry.is_closed() && !registry.needs_connection() {
            shared.available.wait(&mut registry);
        }
        if registry.is_closed() {
            break;
        }

        match registry.create_and_enqueue(&shared.factory, Instant::now()) {
            Ok(id) => {
                let live = registry.live();
                shared.available.notify_all();
                tracing::debug!(pool, connection = id, live, "opened connection");
            }
            Err(e) => {
                tracing::warn!(
                    pool,
                    error = %e,
                    retry_in_ms = u64::try_from(shared.config.retry_interval.as_millis()).unwrap_or(u64::MAX),
                    "creator failed to open connection"
                );
                // a release or shutdown during the pause is still seen
                let _ = shared.available.wait_for(&mut registry, shared.config.retry_interval);
            }
        }
    }
    drop(registry);

    tracing::debug!(pool, "creator stopped");
}
