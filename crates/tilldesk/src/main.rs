// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tilldesk - multi-role inventory and point-of-sale backend.
//!
//! This is the binary entry point for the Tilldesk server and its
//! maintenance commands.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod db;
mod serve;
mod stock_check;

/// Tilldesk - multi-role inventory and point-of-sale backend.
#[derive(Parser, Debug)]
#[command(name = "tilldesk", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the portal server with the scheduled stock check.
    Serve,
    /// Run one automated stock check and exit.
    StockCheck,
    /// Print the effective configuration as TOML.
    Config,
}

fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match tilldesk_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            tilldesk_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log_level);

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                tracing::error!(error = %e, "serve failed");
                std::process::exit(1);
            }
        }
        Some(Commands::StockCheck) => match stock_check::run_stock_check_once(&config).await {
            Ok(report) => {
                // The cron entry's single line of output. Partial failures
                // do not change the exit code.
                println!("{}", report.summary());
            }
            Err(e) => {
                tracing::error!(error = %e, "stock check failed");
                std::process::exit(1);
            }
        },
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => {
                tracing::error!(error = %e, "could not render config");
                std::process::exit(1);
            }
        },
        None => {
            println!("tilldesk: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Verify jemalloc is the global allocator by advancing the epoch.
        // Only jemalloc supports this -- the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_consistent() {
        super::Cli::command().debug_assert();
    }

    #[test]
    #[serial_test::serial]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed).
        let config =
            tilldesk_config::load_and_validate().expect("default config should be valid");
        assert_eq!(config.session.cookie_name, "tilldesk_sid");
    }
}
