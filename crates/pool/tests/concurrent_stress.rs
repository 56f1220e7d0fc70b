//! Many consumers hammering a small pool

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use cistern_pool::testing::MockFactory;
use cistern_pool::{Pool, PoolConfig};

#[test]
fn stress_keeps_bounds_and_loses_nothing() {
    const THREADS: usize = 16;
    const ROUNDS: usize = 200;
    const MAX: usize = 4;

    let factory = MockFactory::new();
    let config = PoolConfig {
        initial_size: 1,
        max_size: MAX,
        acquire_timeout: Duration::from_secs(10),
        ..Default::default()
    };
    let pool = Pool::new(factory.clone(), config).unwrap();
    let in_use = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let workers: Vec<_> = (0..THREADS)
        .map(|_| {
            let pool = pool.clone();
            let in_use = Arc::clone(&in_use);
            let peak = Arc::clone(&peak);
            std::thread::spawn(move || {
                for round in 0..ROUNDS {
                    let mut lease = pool.acquire().expect("acquire under stress");
                    let now = in_use.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    lease.queries += 1;
                    if round % 8 == 0 {
                        std::thread::yield_now();
                    }
                    in_use.fetch_sub(1, Ordering::SeqCst);
                    if round % 2 == 0 {
                        lease.release();
                    }
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    let stats = pool.stats();
    let total = (THREADS * ROUNDS) as u64;
    assert!(peak.load(Ordering::SeqCst) <= MAX);
    assert!(stats.live <= MAX);
    assert_eq!(stats.acquisitions, total);
    assert_eq!(stats.releases, total);
    assert_eq!(stats.leased, 0);
    assert_eq!(stats.timeouts, 0);
    assert_eq!(factory.open_connections(), stats.live as u64);
}
