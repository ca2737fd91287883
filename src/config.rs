//! Run configuration resolved from command-line arguments.
//!
//! The seeder has no configuration file and reads no environment
//! variables; everything it needs comes from [`crate::Cli`]. This module
//! turns the raw arguments into a validated [`RunConfig`] that each
//! command borrows for the duration of one invocation.

use crate::{commands::Command, Cli};
use anyhow::{bail, Result};
use std::time::Duration;

/// Resolved settings for a single command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Command selected on the command line
    pub command: Command,
    /// Base URL of the primary service, without trailing slash
    pub primary_url: String,
    /// Base URL of the consumer service, without trailing slash
    pub consumer_url: String,
    /// Base URL of the creature catalog, without trailing slash
    pub catalog_url: String,
    /// Creatures to seed, numbered `1..=creature_count`
    pub creature_count: u32,
    /// Pause after each successful catalog call
    pub catalog_delay: Duration,
}

impl RunConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        if cli.count == 0 {
            bail!("--count must be at least 1");
        }
        Ok(RunConfig {
            command: cli.command,
            primary_url: normalize_base_url(&cli.primary_url)?,
            consumer_url: normalize_base_url(&cli.consumer_url)?,
            catalog_url: normalize_base_url(&cli.catalog_url)?,
            creature_count: cli.count,
            catalog_delay: Duration::from_millis(cli.catalog_delay_ms),
        })
    }
}

/// Strip trailing slashes so endpoint paths can be appended verbatim.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        bail!("'{}' is not an http(s) URL", raw);
    }
    Ok(trimmed.to_string())
}
