//! # Pokédex Seeder Library
//!
//! Seeding, teardown and end-to-end checks for a Pokédex REST service and
//! its capture-feed consumer.

use clap::Parser;

pub mod catalog;
pub mod checks;
pub mod commands;
pub mod config;
pub mod constants;
pub mod http;
pub mod models;
pub mod retry;
pub mod seed;
pub mod teardown;

use constants::{
    DEFAULT_CATALOG_DELAY_MS, DEFAULT_CATALOG_URL, DEFAULT_CONSUMER_URL, DEFAULT_CREATURE_COUNT,
    DEFAULT_PRIMARY_URL,
};

/// Seed, tear down or smoke-test a Pokédex service
///
/// Populates trainers, types and creatures (sourced from a public catalog),
/// links them with random captures, deletes everything again, or runs an
/// assertion battery against the primary service and the capture-feed
/// consumer.
#[derive(Parser, Debug)]
#[command(
    name = "pokedex-seed",
    version,
    about = "Seed, tear down or smoke-test a Pokédex REST service",
    long_about = "Populates a Pokédex service with trainers, types and creatures fetched from a public catalog,\ncreates random captures, deletes all data, or runs end-to-end checks against the service and\nits capture-feed consumer.",
    after_help = "Examples:\n  pokedex-seed populate\n  pokedex-seed delete\n  pokedex-seed repopulate\n  pokedex-seed test http://localhost:8080/api http://localhost:8081/api"
)]
pub struct Cli {
    /// What to do
    #[arg(value_enum, default_value_t = commands::Command::Populate)]
    pub command: commands::Command,

    /// Base URL of the primary service
    #[arg(default_value = DEFAULT_PRIMARY_URL)]
    pub primary_url: String,

    /// Base URL of the capture-feed consumer
    #[arg(default_value = DEFAULT_CONSUMER_URL)]
    pub consumer_url: String,

    /// Number of creatures to seed, starting at #1
    #[arg(long, default_value_t = DEFAULT_CREATURE_COUNT)]
    pub count: u32,

    /// Base URL of the creature catalog
    #[arg(long, default_value = DEFAULT_CATALOG_URL)]
    pub catalog_url: String,

    /// Pause after each successful catalog call, in milliseconds
    #[arg(long, default_value_t = DEFAULT_CATALOG_DELAY_MS)]
    pub catalog_delay_ms: u64,
}
