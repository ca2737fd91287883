//! Checks against the capture-feed consumer. Skipped when it is unreachable.

use super::{has, section, segment, Tally};
use crate::http::ApiClient;
use anyhow::Result;
use serde_json::Value;

const RECENT_LIMIT: usize = 5;

/// Returns `false` when the consumer could not be reached and nothing ran.
pub async fn consumer(api: &mut ApiClient, tally: &mut Tally) -> Result<bool> {
    section(&format!("📡 Consumer ({})", api.base_url));

    match api.probe("/captures").await {
        Ok(status) if (200..300).contains(&status) => {}
        Ok(status) => {
            println!("  ⚠️  Consumer not available (status {}), checks skipped", status);
            return Ok(false);
        }
        Err(_) => {
            println!(
                "  ⚠️  Consumer not reachable at {}, checks skipped",
                api.base_url
            );
            return Ok(false);
        }
    }

    let captures = api.get("/captures").await?;
    tally.check("GET /captures → 200", captures.status == 200);
    tally.check("GET /captures returns an array", captures.as_array().is_some());
    if let Some(first) = captures.as_array().and_then(|a| a.first()) {
        for field in ["trainerId", "trainerName", "pokemonId", "pokemonName", "captureDate"] {
            tally.check(format!("Feed capture has {}", field), has(first, field));
        }
    }

    let recent = api
        .get(&format!("/captures/recent?limit={}", RECENT_LIMIT))
        .await?;
    tally.check(
        format!("GET /captures/recent?limit={} → 200", RECENT_LIMIT),
        recent.status == 200,
    );
    tally.check("Recent captures returns an array", recent.as_array().is_some());
    tally.check_detail(
        format!("Recent captures ≤ {} entries", RECENT_LIMIT),
        recent.as_array().is_some_and(|a| a.len() <= RECENT_LIMIT),
        recent.describe(),
    );

    let stats = api.get("/captures/stats").await?;
    tally.check("GET /captures/stats → 200", stats.status == 200);
    tally.check("Stats contain totalMessages", stats.field("totalMessages").is_some());
    tally.check("Stats contain maxMessages", stats.field("maxMessages").is_some());

    let creations = api.get("/creations").await?;
    tally.check("GET /creations → 200", creations.status == 200);
    tally.check("GET /creations returns an array", creations.as_array().is_some());

    let aggregated = api.get("/aggregated/stats").await?;
    tally.check("GET /aggregated/stats → 200", aggregated.status == 200);
    tally.check(
        "Aggregated stats returns an array",
        aggregated.as_array().is_some(),
    );

    if let Some(first) = aggregated.as_array().and_then(|a| a.first()).cloned() {
        tally.check("Aggregate has trainerId", has(&first, "trainerId"));
        tally.check("Aggregate has trainerName", has(&first, "trainerName"));
        tally.check("Aggregate has totalCaptures", has(&first, "totalCaptures"));
        tally.check(
            "Aggregate has pokemonCounts array",
            first.get("pokemonCounts").is_some_and(Value::is_array),
        );

        if let Some(id) = first.get("trainerId").filter(|v| !v.is_null()) {
            let seg = segment(id);
            let by_trainer = api
                .get(&format!("/aggregated/stats/trainer/{}", seg))
                .await?;
            tally.check(
                format!("GET /aggregated/stats/trainer/{} → 200", seg),
                by_trainer.status == 200,
            );
            tally.check(
                "Trainer aggregate has totalCaptures",
                by_trainer.field("totalCaptures").is_some(),
            );
        }
    }

    Ok(true)
}
