use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "cistern",
    about = "Inspect configurations and exercise cistern connection pools",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log filter (EnvFilter syntax)
    #[arg(long, global = true, env = "CISTERN_LOG", default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a pool configuration file.
    ///
    /// Files ending in `.toml` are read as TOML; anything else as
    /// `key=value` lines (mysql.ini style).
    Check {
        /// Configuration file
        config: PathBuf,
        /// Print the effective configuration as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run concurrent consumers against a pool of simulated connections
    Bench(commands::bench::BenchArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log = cistern_log::init_with(cistern_log::Config::from_env().with_level(cli.log))?;

    match cli.command {
        Commands::Check { config, json } => commands::check::run(&config, json),
        Commands::Bench(args) => commands::bench::run(&args),
    }
}
