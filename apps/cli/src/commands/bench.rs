use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use anyhow::Context;
use cistern_pool::{Error, Pool, PoolConfig, PoolStats, SimulatedFactory};
use serde::Serialize;

#[derive(Debug, clap::Args)]
pub struct BenchArgs {
    /// Consumer threads
    #[arg(long, default_value_t = 8)]
    threads: usize,
    /// Acquire/hold/release cycles per thread
    #[arg(long, default_value_t = 100)]
    rounds: usize,
    /// How long each lease is held, in milliseconds
    #[arg(long, default_value_t = 1)]
    hold_ms: u64,
    /// Pool configuration file; overrides the size and timeout flags
    #[arg(long)]
    config: Option<PathBuf>,
    /// Connections opened at warm start
    #[arg(long, default_value_t = 2)]
    initial: usize,
    /// Maximum live connections
    #[arg(long, default_value_t = 4)]
    max: usize,
    /// Acquire timeout, in milliseconds
    #[arg(long, default_value_t = 1000)]
    timeout_ms: u64,
    /// Simulated connect latency, in milliseconds
    #[arg(long, default_value_t = 0)]
    connect_latency_ms: u64,
    /// Refuse every Nth simulated connect (0 never fails)
    #[arg(long, default_value_t = 0)]
    fail_every: u64,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Report {
    threads: usize,
    rounds: usize,
    successes: u64,
    timeouts: u64,
    elapsed_ms: u64,
    stats: PoolStats,
}

pub fn run(args: &BenchArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => cistern_pool::source::from_path(path)
            .load()
            .with_context(|| format!("invalid configuration in {}", path.display()))?,
        None => PoolConfig {
            initial_size: args.initial,
            max_size: args.max,
            acquire_timeout: Duration::from_millis(args.timeout_ms),
            ..Default::default()
        },
    };
    let factory = SimulatedFactory::new()
        .with_latency(Duration::from_millis(args.connect_latency_ms))
        .fail_every(args.fail_every);
    let pool = Pool::new(factory, config).context("pool warm start failed")?;

    let successes = Arc::new(AtomicU64::new(0));
    let timeouts = Arc::new(AtomicU64::new(0));
    let hold = Duration::from_millis(args.hold_ms);
    let started = Instant::now();

    let workers: Vec<_> = (0..args.threads)
        .map(|_| {
            let pool = pool.clone();
            let successes = Arc::clone(&successes);
            let timeouts = Arc::clone(&timeouts);
            let rounds = args.rounds;
            std::thread::spawn(move || -> Result<(), Error> {
                for _ in 0..rounds {
                    match pool.acquire() {
                        Ok(conn) => {
                            conn.execute(hold);
                            conn.release();
                            successes.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(e) if e.is_timeout() => {
                            timeouts.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(e) => return Err(e),
                    }
                }
                Ok(())
            })
        })
        .collect();

    for worker in workers {
        worker
            .join()
            .map_err(|_| anyhow::anyhow!("consumer thread panicked"))??;
    }

    let report = Report {
        threads: args.threads,
        rounds: args.rounds,
        successes: successes.load(Ordering::Relaxed),
        timeouts: timeouts.load(Ordering::Relaxed),
        elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        stats: pool.stats(),
    };
    pool.shutdown();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} threads x {} rounds: {} ok, {} timed out in {}ms",
            report.threads, report.rounds, report.successes, report.timeouts, report.elapsed_ms
        );
        let stats = &report.stats;
        println!(
            "pool: live {}/{} (idle {}), created {}, retired {}, connect failures {}",
            stats.live, stats.max_size, stats.idle, stats.created, stats.retired, stats.connect_failures
        );
    }
    Ok(())
}
