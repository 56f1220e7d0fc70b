use std::path::Path;

use anyhow::Context;
use cistern_pool::PoolConfig;

pub fn run(path: &Path, json: bool) -> anyhow::Result<()> {
    let mut config = cistern_pool::source::from_path(path)
        .load()
        .with_context(|| format!("invalid configuration in {}", path.display()))?;
    if !config.connect.password.is_empty() {
        config.connect.password = "<redacted>".to_string();
    }
    tracing::debug!(path = %path.display(), "configuration ok");

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        print_text(path, &config);
    }
    Ok(())
}

fn print_text(path: &Path, config: &PoolConfig) {
    let connect = &config.connect;
    println!("{}: ok", path.display());
    println!("  target             {}", connect.target());
    println!("  username           {}", connect.username);
    println!("  password           {}", connect.password);
    println!("  initial_size       {}", config.initial_size);
    println!("  max_size           {}", config.max_size);
    println!("  max_idle_time      {}s", config.max_idle_time.as_secs());
    println!("  acquire_timeout    {}ms", config.acquire_timeout.as_millis());
    println!("  retry_interval     {}ms", config.retry_interval.as_millis());
}
