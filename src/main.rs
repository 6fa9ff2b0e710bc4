//! Polymarket Copy-Trade Monitor
//!
//! Watches a trader's latest purchases and reports, without placing any
//! order, whether each one would be copied given your current positions.

mod api;
mod models;
mod monitor;
mod scheduler;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::monitor::{fetch_profile_name, DecisionEngine, MonitorConfig, BET_AMOUNT};
use crate::scheduler::{Scheduler, SleepTicker};

/// Dry-run copy-trade monitor CLI.
#[derive(Parser)]
#[command(name = "polymonitor")]
#[command(about = "Dry-run monitor for copying a Polymarket trader's bets", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Data API base URL
    #[arg(long, env = "POLYMARKET_DATA_API", default_value = api::DATA_API_BASE)]
    data_api: String,

    /// Profile API base URL
    #[arg(long, env = "POLYMARKET_PROFILE_API", default_value = api::PROFILE_API_BASE)]
    profile_api: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "10")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct TargetArgs {
    /// Target trader's wallet address (0x...)
    #[arg(short, long, env = "TARGET_ADDRESS")]
    target: String,

    /// Your wallet address, whose positions are checked (defaults to the target)
    #[arg(short, long, env = "OPERATOR_ADDRESS")]
    operator: Option<String>,

    /// Disable response caching
    #[arg(long)]
    no_cache: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Monitor the target until Ctrl+C
    Monitor {
        #[command(flatten)]
        target: TargetArgs,

        /// Seconds to wait between checks
        #[arg(short, long, default_value = "10")]
        interval: u64,
    },

    /// Run a single check and print the result
    Check {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Resolve a trader's display name
    Profile {
        /// Trader's wallet address
        address: String,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = MonitorConfig {
        data_api_base: cli.data_api.clone(),
        profile_api_base: cli.profile_api.clone(),
        request_timeout_secs: cli.timeout,
        ..MonitorConfig::default()
    };

    match cli.command {
        Commands::Monitor { target, interval } => {
            config.poll_interval_secs = interval;
            if target.no_cache {
                config = config.without_cache();
            }

            let engine = DecisionEngine::new(config.build_client()?);
            let mut scheduler = Scheduler::new(engine, SleepTicker::new(config.poll_interval()));

            if let Err(e) = scheduler
                .start(&target.target, target.operator.as_deref())
                .await
            {
                println!("{}", e);
                return Ok(());
            }

            println!("\n=== Polymarket Copy Trade Monitor ===");
            println!("Target trader:  {}", scheduler.state().trader_label());
            println!("Target address: {}", scheduler.state().target_address);
            println!("Your address:   {}", scheduler.state().operator_address);
            println!("Bet amount:     ${:.2}", BET_AMOUNT);
            println!("Mode:           DRY RUN (no real trades)");
            println!("Check interval: {}s", interval);
            println!("\nPress Ctrl+C to stop.\n");

            // Register shutdown handler
            let stop = scheduler.stop_handle();
            tokio::spawn(async move {
                tokio::signal::ctrl_c().await.ok();
                info!("Shutdown signal received");
                stop.request_stop();
            });

            // Status line after every check
            let mut snapshots = scheduler.subscribe();
            tokio::spawn(async move {
                while snapshots.changed().await.is_ok() {
                    let line = {
                        let state = snapshots.borrow_and_update();
                        if !state.active || state.check_count == 0 {
                            continue;
                        }
                        state.summary()
                    };
                    println!("[{}] {}", chrono::Local::now().format("%H:%M:%S"), line);
                }
            });

            let last = scheduler.run().await;
            println!("\n{}", last);
        }

        Commands::Check { target } => {
            if target.no_cache {
                config = config.without_cache();
            }

            let engine = DecisionEngine::new(config.build_client()?);
            let mut scheduler = Scheduler::new(engine, SleepTicker::new(config.poll_interval()));

            if let Err(e) = scheduler
                .start(&target.target, target.operator.as_deref())
                .await
            {
                println!("{}", e);
                return Ok(());
            }

            let outcome = scheduler.run_cycle().await;
            info!(outcome = ?outcome, "Check finished");
            println!("\n{}", scheduler.state());
            scheduler.stop();
        }

        Commands::Profile { address } => {
            let client = config.build_client()?;
            let name = fetch_profile_name(client.as_ref(), &address).await;
            println!("{}", name);
        }

        Commands::Config => {
            let ttls = config.cache_ttls();

            println!("\n=== Monitor Configuration ===\n");
            println!("Endpoints:");
            println!("  Data API:             {}", config.data_api_base);
            println!("  Profile API:          {}", config.profile_api_base);
            println!("  Request Timeout:      {}s", config.request_timeout_secs);

            println!("\nPolling:");
            println!("  Check Interval:       {}s", config.poll_interval_secs);
            println!("  Activity Fetch Limit: {}", monitor::ACTIVITY_FETCH_LIMIT);
            println!("  Latest Trades Kept:   {}", monitor::MAX_LATEST_TRADES);
            println!("  Log Capacity:         {}", models::LOG_CAPACITY);

            println!("\nCaching:");
            println!("  Profile TTL:          {}s", ttls.profile.as_secs());
            println!("  Activity TTL:         {}s", ttls.activity.as_secs());
            println!("  Positions TTL:        {}s", ttls.positions.as_secs());

            println!("\nDecision:");
            println!("  Mode:                 DRY RUN");
            println!("  Bet Amount:           ${:.2}", BET_AMOUNT);
        }
    }

    Ok(())
}
