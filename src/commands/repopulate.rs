use super::{ensure_reachable, populate::print_summary, rule};
use crate::{catalog::CatalogClient, config::RunConfig, http::ApiClient, seed, teardown};
use anyhow::Result;

pub async fn run(cfg: &RunConfig) -> Result<()> {
    println!("🔄 Mode: REPOPULATE - delete then recreate data");
    println!("   API URL: {}", cfg.primary_url);
    println!();

    let mut api = ApiClient::new(&cfg.primary_url)?;
    ensure_reachable(&api).await?;
    let catalog = CatalogClient::new(&cfg.catalog_url)?;

    rule();
    println!("📍 PHASE 1: deleting existing data");
    println!("{}", "=".repeat(50));

    let report = teardown::teardown(&mut api).await?;
    println!("\n📊 Deleted:");
    report.print();

    // the throwaway teardown account must not carry into seeding
    api.clear_session();

    rule();
    println!("📍 PHASE 2: creating fresh data");
    println!("{}", "=".repeat(50));

    let state = seed::populate(&mut api, &catalog, cfg).await?;

    rule();
    println!("✅ Repopulation complete!");
    print_summary(&state, &cfg.primary_url);
    Ok(())
}
