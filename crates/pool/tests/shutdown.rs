//! Shutdown with waiters and outstanding leases

use std::time::{Duration, Instant};

use cistern_pool::testing::MockFactory;
use cistern_pool::{Error, Pool, PoolConfig};

fn single(factory: &MockFactory) -> Pool<MockFactory> {
    let config = PoolConfig {
        initial_size: 1,
        max_size: 1,
        acquire_timeout: Duration::from_secs(30),
        ..Default::default()
    };
    Pool::new(factory.clone(), config).unwrap()
}

#[test]
fn shutdown_wakes_blocked_waiters() {
    let factory = MockFactory::new();
    let pool = single(&factory);
    let _held = pool.acquire().unwrap();

    let waiters: Vec<_> = (0..3)
        .map(|_| {
            let pool = pool.clone();
            std::thread::spawn(move || {
                let started = Instant::now();
                (pool.acquire().map(drop), started.elapsed())
            })
        })
        .collect();

    std::thread::sleep(Duration::from_millis(50));
    pool.shutdown();

    for waiter in waiters {
        let (outcome, waited) = waiter.join().unwrap();
        assert!(matches!(outcome, Err(Error::Closed { .. })), "got {outcome:?}");
        assert!(waited < Duration::from_secs(10));
    }
}

#[test]
fn outstanding_lease_is_closed_on_return() {
    let factory = MockFactory::new();
    let pool = single(&factory);
    let held = pool.acquire().unwrap();

    pool.shutdown();
    assert_eq!(factory.open_connections(), 1);
    assert_eq!(pool.stats().leased, 1);

    held.release();
    assert_eq!(factory.open_connections(), 0);
    assert_eq!(pool.stats().live, 0);
    assert_eq!(pool.stats().releases, 0, "nothing went back to the idle queue");
}

#[test]
fn shutdown_does_not_wait_for_the_reaper_interval() {
    let factory = MockFactory::new();
    let pool = Pool::new(
        factory.clone(),
        PoolConfig { initial_size: 2, max_size: 2, max_idle_time: Duration::from_secs(3600), ..Default::default() },
    )
    .unwrap();

    let started = Instant::now();
    drop(pool);
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(factory.open_connections(), 0);
}
