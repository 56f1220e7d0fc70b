//! Background reaper thread.
//!
//! Wakes every `max_idle_time` and retires idle connections that have not
//! been used for longer than that, oldest first, without dropping the idle
//! queue below `initial_size`. The scan stops at the first record that is
//! still fresh. Retired connections are closed with the pool lock released.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::MutexGuard;

use crate::factory::ConnectionFactory;
use crate::pool::Shared;

pub(crate) fn run<F: ConnectionFactory>(shared: Arc<Shared<F>>) {
    let pool = shared.factory.id();
    let interval = shared.config.max_idle_time;
    let floor = shared.config.initial_size;
    tracing::debug!(pool, interval_secs = interval.as_secs(), "reaper started");

    let mut registry = shared.registry.lock();
    while !registry.is_closed() {
        if let Some(deadline) = Instant::now().checked_add(interval) {
            // only shutdown signals `reaper_wake`; spurious wakeups just
            // rescan early
            let _ = shared.reaper_wake.wait_until(&mut registry, deadline);
        } else {
            shared.reaper_wake.wait(&mut registry);
        }
        if registry.is_closed() {
            break;
        }

        let now = Instant::now();
        let retired: Vec<_> =
            std::iter::from_fn(|| registry.retire_oldest_if_expired(now, floor)).collect();
        if retired.is_empty() {
            continue;
        }
        let live = registry.live();
        // room under max_size may have opened up for the creator
        shared.available.notify_all();

        let count = retired.len();
        MutexGuard::unlocked(&mut registry, || {
            for conn in retired {
                shared.factory.close(conn);
            }
        });
        tracing::debug!(pool, retired = count, live, "retired idle connections");
    }
    drop(registry);

    tracing::debug!(pool, "reaper stopped");
}
