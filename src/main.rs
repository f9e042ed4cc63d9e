//! loadring daemon
//!
//! Polls the load average and shows it on the NUC LED ring until SIGINT or
//! SIGTERM, then switches the ring off.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use loadring::shutdown;
use loadring::{Config, Monitor, NucLedDevice, ProcLoadAvg};

#[derive(Parser)]
#[command(name = "loadring")]
#[command(author, version, about = "Show the system load average on the NUC LED ring")]
struct Cli {
    /// Config file path (default: ~/.config/loadring/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the scaled color table and exit
    #[arg(long)]
    print_table: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load config
    let config_path = cli.config.unwrap_or_else(Config::default_path);
    info!("Loading config from {:?}", config_path);
    let config = Config::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let policy = config.policy()?;

    if cli.print_table {
        println!("cores: {}", policy.cores());
        let compared = policy.rules().count() - 1;
        for rule in policy.rules().take(compared) {
            println!("  {rule}");
        }
        println!("  * {}", policy.fallback().state);
        return Ok(());
    }

    // Handlers go in before the first tick so an early signal still turns the ring off
    let signal = shutdown::wait_for_signal().context("registering signal handlers")?;

    info!(
        cores = policy.cores(),
        interval = ?config.interval(),
        device = %config.device_path.display(),
        "Starting"
    );
    info!("Colors: {}", policy);

    let mut monitor = Monitor::new(
        ProcLoadAvg::new(&config.loadavg_path),
        NucLedDevice::new(&config.device_path),
        policy,
    )
    .with_interval(config.interval())
    .with_retry_failed_writes(config.retry_failed_writes);

    let signal = monitor.run(signal).await;
    info!("Stopped by {}", signal);
    Ok(())
}
