//! # Pokédex Seeder
//!
//! Command-line tool that seeds a Pokédex REST service with trainers, types,
//! creatures and captures, tears that data down again, or runs an end-to-end
//! check battery against the service and its capture-feed consumer.
//!
//! ## Quick Start
//!
//! ```bash
//! # Seed the first 151 creatures against a local service
//! pokedex-seed populate
//!
//! # Delete everything, then seed again
//! pokedex-seed repopulate http://localhost:8080/api
//!
//! # Check both services
//! pokedex-seed test http://localhost:8080/api http://localhost:8081/api
//! ```
//!
//! Diagnostics (retries, requests, session changes) go through `log`; set
//! `RUST_LOG=debug` to see them.

use clap::{error::ErrorKind, CommandFactory, Parser};
use env_logger::{Builder, Env};
use log::debug;
use pokedex_seeder::{commands, config::RunConfig, Cli};

fn init_logger() {
    Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();
}

fn banner() {
    println!();
    println!("╔════════════════════════════════════════════════╗");
    println!("║          🎮 Pokédex Database Manager 🎮          ║");
    println!("╚════════════════════════════════════════════════╝");
    println!();
}

/// Parses arguments, runs the selected command and maps any fatal error to
/// exit status 1.
#[tokio::main]
async fn main() {
    init_logger();

    let cli = Cli::try_parse().unwrap_or_else(|e| {
        if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
            e.exit();
        }
        let _ = e.print();
        eprintln!();
        eprintln!("{}", Cli::command().render_help());
        std::process::exit(1);
    });

    let cfg = RunConfig::from_cli(&cli).unwrap_or_else(|e| {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    });

    banner();
    if let Err(e) = commands::run(&cfg).await {
        debug!("{:?}", e);
        eprintln!("\n❌ Fatal error: {:#}", e);
        std::process::exit(1);
    }
}
