//! The creator survives connect failures and keeps replenishing

use std::time::Duration;

use cistern_pool::testing::MockFactory;
use cistern_pool::{Error, Pool, PoolConfig};

#[test]
fn creator_retries_after_connect_failures() {
    let factory = MockFactory::new();
    let config = PoolConfig {
        initial_size: 1,
        max_size: 3,
        retry_interval: Duration::from_millis(20),
        ..Default::default()
    };
    let pool = Pool::new(factory.clone(), config).unwrap();
    let _first = pool.acquire().unwrap();

    factory.set_failing(true);
    let err = pool.acquire_timeout(Duration::from_millis(200)).unwrap_err();
    assert!(matches!(err, Error::Timeout { .. }), "got {err:?}");
    assert!(pool.stats().connect_failures >= 1);
    assert!(factory.attempts() >= 2, "creator did not retry");

    factory.set_failing(false);
    let second = pool.acquire_timeout(Duration::from_secs(5)).expect("creator recovered");
    assert_eq!(second.id(), 2);
    assert_eq!(pool.stats().live, 2);
}

#[test]
fn failing_pool_still_serves_existing_connections() {
    let factory = MockFactory::new();
    let config = PoolConfig {
        initial_size: 2,
        max_size: 4,
        retry_interval: Duration::from_millis(20),
        ..Default::default()
    };
    let pool = Pool::new(factory.clone(), config).unwrap();
    factory.set_failing(true);

    for _ in 0..10 {
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        drop((a, b));
    }
    assert_eq!(pool.stats().live, 2);
}
