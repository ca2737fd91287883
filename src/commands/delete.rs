use super::{ensure_reachable, rule};
use crate::{config::RunConfig, http::ApiClient, teardown};
use anyhow::Result;

pub async fn run(cfg: &RunConfig) -> Result<()> {
    println!("🗑️  Mode: DELETE - removing all data");
    println!("   API URL: {}", cfg.primary_url);
    println!();

    let mut api = ApiClient::new(&cfg.primary_url)?;
    ensure_reachable(&api).await?;

    let report = teardown::teardown(&mut api).await?;

    rule();
    println!("✅ Deletion complete!");
    println!();
    println!("📊 Summary:");
    report.print();
    Ok(())
}
