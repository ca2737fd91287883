use crate::{config::RunConfig, http::ApiClient};
use anyhow::{bail, Result};
use clap::ValueEnum;

pub mod delete;
pub mod populate;
pub mod repopulate;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Create trainers, types, creatures and captures
    Populate,
    /// Delete every capture, creature, type and trainer
    Delete,
    /// Delete everything, then populate again
    Repopulate,
    /// Run the end-to-end checks against both services
    Test,
}

pub async fn run(cfg: &RunConfig) -> Result<()> {
    match cfg.command {
        Command::Populate => populate::run(cfg).await,
        Command::Delete => delete::run(cfg).await,
        Command::Repopulate => repopulate::run(cfg).await,
        Command::Test => test::run(cfg).await,
    }
}

/// One unauthenticated probe of the primary service. A 401 still proves the
/// service is up.
pub async fn ensure_reachable(api: &ApiClient) -> Result<()> {
    match api.probe("/pokemons").await {
        Ok(status) if (200..300).contains(&status) || status == 401 => Ok(()),
        Ok(status) => {
            println!("⚠️  The API does not look reachable (status: {})", status);
            println!("   Make sure the service is running");
            bail!("primary service answered {} at {}", status, api.base_url)
        }
        Err(e) => {
            println!("⚠️  The API does not look reachable at {}", api.base_url);
            println!("   Error: {:#}", e);
            println!("   Make sure the service is running");
            bail!("primary service unreachable at {}", api.base_url)
        }
    }
}

pub(crate) fn rule() {
    println!("\n{}", "=".repeat(50));
}
