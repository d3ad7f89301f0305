//! CLI entry point for the capweight rebalancer.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use capweight_rebalancer::config::Config;
use capweight_rebalancer::error::Error;
use capweight_rebalancer::execution::{self, RunOptions};
use capweight_rebalancer::registry::StrategyRegistry;

#[derive(Parser)]
#[command(name = "rebalancer")]
#[command(about = "Market-cap weighted portfolio rebalancer for Binance spot")]
#[command(version)]
struct Cli {
    /// Path to config.toml
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rebalance on every interval close until stopped
    Run {
        /// Compute and log orders without submitting them
        #[arg(long)]
        dry_run: bool,
    },

    /// Run a single rebalance cycle now
    Once {
        /// Compute and log orders without submitting them
        #[arg(long)]
        dry_run: bool,

        /// Skip confirmation prompt (for automation/cron)
        #[arg(long)]
        force: bool,
    },

    /// Show the orders a cycle would place right now
    Plan,

    /// Show tracked balances and current weights
    Balances,

    /// Check exchange connection
    Status,

    /// List registered strategy ids
    Strategies,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();
    let registry = StrategyRegistry::with_builtin();

    if let Command::Strategies = cli.command {
        execution::list_strategies(&registry);
        return;
    }

    let config = match Config::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(2);
        }
    };

    let result = match cli.command {
        Command::Run { dry_run } => execution::run(
            &config,
            &registry,
            &RunOptions {
                dry_run,
                force: true,
            },
        ),
        Command::Once { dry_run, force } => {
            execution::run_once(&config, &registry, &RunOptions { dry_run, force })
        }
        Command::Plan => execution::show_plan(&config, &registry),
        Command::Balances => execution::show_balances(&config),
        Command::Status => execution::check_status(&config),
        Command::Strategies => Ok(()),
    };

    if let Err(e) = result {
        match &e {
            Error::Aborted(msg) => {
                eprintln!("Aborted: {msg}");
                process::exit(0);
            }
            e if e.is_config() => {
                eprintln!("Configuration error: {e}");
                process::exit(2);
            }
            _ => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
    }
}
