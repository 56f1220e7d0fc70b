//! Every lease is returned exactly once, by release or by drop

use std::time::Duration;

use cistern_pool::testing::MockFactory;
use cistern_pool::{Pool, PoolConfig};

fn pool(factory: &MockFactory) -> Pool<MockFactory> {
    let config = PoolConfig {
        initial_size: 2,
        max_size: 4,
        acquire_timeout: Duration::from_secs(5),
        ..Default::default()
    };
    Pool::new(factory.clone(), config).unwrap()
}

#[test]
fn explicit_release_and_drop_both_return() {
    let factory = MockFactory::new();
    let pool = pool(&factory);

    let a = pool.acquire().unwrap();
    let b = pool.acquire().unwrap();
    a.release();
    drop(b);

    let stats = pool.stats();
    assert_eq!(stats.acquisitions, 2);
    assert_eq!(stats.releases, 2);
    assert_eq!(stats.leased, 0);
    assert_eq!(stats.idle, stats.live);
}

#[test]
fn lease_returned_from_another_thread() {
    let factory = MockFactory::new();
    let pool = pool(&factory);

    let lease = pool.acquire().unwrap();
    std::thread::spawn(move || drop(lease)).join().unwrap();

    assert_eq!(pool.stats().releases, 1);
    assert_eq!(pool.stats().leased, 0);
}

#[test]
fn panicking_holder_still_returns() {
    let factory = MockFactory::new();
    let pool = pool(&factory);

    let worker = {
        let pool = pool.clone();
        std::thread::spawn(move || {
            let _lease = pool.acquire().unwrap();
            panic!("consumer failed while holding a connection");
        })
    };
    assert!(worker.join().is_err());

    let stats = pool.stats();
    assert_eq!(stats.releases, 1);
    assert_eq!(stats.leased, 0);
}

#[test]
fn nothing_is_closed_twice() {
    let factory = MockFactory::new();
    let pool = pool(&factory);

    let leases: Vec<_> = (0..4).map(|_| pool.acquire().unwrap()).collect();
    let (returned, kept): (Vec<_>, Vec<_>) = leases.into_iter().partition(|l| l.id() % 2 == 0);
    drop(returned);

    pool.shutdown();
    drop(kept);

    assert_eq!(factory.connects(), 4);
    assert_eq!(factory.closes(), 4);
    assert_eq!(pool.stats().live, 0);
}
