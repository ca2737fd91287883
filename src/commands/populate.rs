use super::{ensure_reachable, rule};
use crate::{
    catalog::CatalogClient,
    config::RunConfig,
    constants::FIRST_TRAINER,
    http::ApiClient,
    seed::{self, SeedState},
};
use anyhow::Result;

pub async fn run(cfg: &RunConfig) -> Result<()> {
    println!("🌱 Mode: POPULATE - creating data");
    println!("   API URL: {}", cfg.primary_url);
    println!();

    let mut api = ApiClient::new(&cfg.primary_url)?;
    ensure_reachable(&api).await?;
    let catalog = CatalogClient::new(&cfg.catalog_url)?;

    let state = seed::populate(&mut api, &catalog, cfg).await?;

    rule();
    println!("✅ Population complete!");
    print_summary(&state, &cfg.primary_url);
    Ok(())
}

pub(crate) fn print_summary(state: &SeedState, base_url: &str) {
    println!();
    println!("📊 Summary:");
    println!("   - Trainers: {}", state.trainer_ids.len());
    println!("   - Types: {}", state.type_ids.len());
    println!("   - Creatures: {}", state.creature_ids.len());
    println!();
    println!("💡 Try the API with:");
    println!(
        "   curl {}/auth/login -X POST -H 'Content-Type: application/json' -d '{{\"email\":\"{}\",\"password\":\"{}\"}}'",
        base_url, FIRST_TRAINER.email, FIRST_TRAINER.password
    );
}
