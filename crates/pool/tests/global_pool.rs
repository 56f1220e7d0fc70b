//! Process-wide pool built from a configuration file

use std::time::{Duration, Instant};

use cistern_pool::{Error, GlobalPool, IniFile, Pool, SimulatedFactory};

static MISCONFIGURED: GlobalPool<SimulatedFactory> = GlobalPool::new("misconfigured", || {
    Pool::from_source(SimulatedFactory::new(), &IniFile::new("/nonexistent/cistern/mysql.ini"))
});

#[test]
fn missing_config_fails_fast_on_every_call() {
    for _ in 0..5 {
        let started = Instant::now();
        let err = MISCONFIGURED.acquire().unwrap_err();
        assert!(matches!(err, Error::Unavailable { .. }), "got {err:?}");
        assert!(err.to_string().contains("mysql.ini"), "{err}");
        assert!(started.elapsed() < Duration::from_secs(1));
    }
    assert!(MISCONFIGURED.is_initialized());
    assert!(!MISCONFIGURED.get().unwrap_err().is_retryable());
}
