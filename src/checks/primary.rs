//! Checks against the primary service.

use super::{has, section, segment, Tally};
use crate::{
    constants::{FIRST_TRAINER, MISSING_ID},
    http::ApiClient,
    models::LoginRequest,
};
use anyhow::Result;
use serde_json::{json, Value};

fn id_of(v: &Value) -> Option<&Value> {
    v.get("id").filter(|id| !id.is_null())
}

/// Arithmetic mean of the numeric `hp` of each creature, if all have one.
pub fn mean_hp(creatures: &[Value]) -> Option<f64> {
    if creatures.is_empty() {
        return None;
    }
    let mut sum = 0.0;
    for c in creatures {
        sum += c.get("hp")?.as_f64()?;
    }
    Some(sum / creatures.len() as f64)
}

pub async fn authentication(api: &mut ApiClient, tally: &mut Tally) -> Result<()> {
    section("🔐 Authentication");

    let bad = api
        .post(
            "/auth/login",
            &LoginRequest {
                email: FIRST_TRAINER.email,
                password: "wrongpassword",
            },
        )
        .await?;
    tally.check_detail(
        "Login with wrong password → rejected",
        bad.status == 401 || bad.status == 500,
        format!("got: {}", bad.status),
    );
    if bad.status == 500 {
        println!("  ⚠ bad credentials answered with 500; the service should return 401");
    }

    let good = api
        .post("/auth/login", &LoginRequest::from(&FIRST_TRAINER))
        .await?;
    tally.check_detail(
        "Login with correct password → 200",
        good.status == 200,
        format!("got: {}", good.status),
    );
    tally.check("Login returns trainerId", good.has_field("trainerId"));
    tally.check(
        "Login returns name",
        good.field("name").and_then(Value::as_str) == Some(FIRST_TRAINER.name),
    );
    tally.check(
        "Login returns email",
        good.field("email").and_then(Value::as_str) == Some(FIRST_TRAINER.email),
    );

    let anonymous = api.get_anonymous("/trainers").await?;
    tally.check_detail(
        "Protected access without session → 401",
        anonymous.status == 401,
        format!("got: {}", anonymous.status),
    );

    let authed = api.get("/trainers").await?;
    tally.check_detail(
        "Protected access with session → 200",
        authed.status == 200,
        format!("got: {}", authed.status),
    );
    Ok(())
}

pub async fn trainers(api: &mut ApiClient, tally: &mut Tally) -> Result<()> {
    section("👤 Trainers");

    let all = api.get("/trainers").await?;
    tally.check("GET /trainers → 200", all.status == 200);
    tally.check("GET /trainers returns an array", all.as_array().is_some());
    let first = all.as_array().and_then(|a| a.first()).cloned();
    tally.check("At least 1 trainer exists", first.is_some());

    if let Some(first) = first {
        tally.check("Trainer has an id", has(&first, "id"));
        tally.check("Trainer has a name", has(&first, "name"));
        tally.check("Trainer has an email", has(&first, "email"));
        tally.check("Trainer does not expose password", !has(&first, "password"));

        if let Some(id) = id_of(&first) {
            let seg = segment(id);
            let single = api.get(&format!("/trainers/{}", seg)).await?;
            tally.check(format!("GET /trainers/{} → 200", seg), single.status == 200);
            tally.check("Fetched trainer has the same id", single.field("id") == Some(id));

            let stats = api.get(&format!("/trainers/{}/stats", seg)).await?;
            tally.check(
                format!("GET /trainers/{}/stats → 200", seg),
                stats.status == 200,
            );
            tally.check(
                "Stats contain trainerId",
                stats.field("trainerId") == Some(id),
            );
            tally.check("Stats contain totalCaptures", stats.field("totalCaptures").is_some());
            tally.check("Stats contain uniquePokemons", stats.field("uniquePokemons").is_some());
            tally.check(
                "Stats contain pokedexCompletionPercentage",
                stats.field("pokedexCompletionPercentage").is_some(),
            );
        }
    }

    let missing = api.get(&format!("/trainers/{}", MISSING_ID)).await?;
    tally.check_detail(
        format!("GET /trainers/{} → 404", MISSING_ID),
        missing.status == 404,
        format!("got: {}", missing.status),
    );
    Ok(())
}

pub async fn creatures(api: &mut ApiClient, tally: &mut Tally) -> Result<()> {
    section("⚡ Creatures");

    let all = api.get("/pokemons").await?;
    tally.check("GET /pokemons → 200", all.status == 200);
    tally.check("GET /pokemons returns an array", all.as_array().is_some());
    let listed: Vec<Value> = all.as_array().cloned().unwrap_or_default();
    tally.check("At least 1 creature exists", !listed.is_empty());

    if let Some(first) = listed.first() {
        for field in ["id", "name", "pokedexNumber", "hp", "attack", "defense", "speed"] {
            tally.check(format!("Creature has {}", field), has(first, field));
        }

        if let Some(id) = id_of(first) {
            let seg = segment(id);
            let single = api.get(&format!("/pokemons/{}", seg)).await?;
            tally.check(format!("GET /pokemons/{} → 200", seg), single.status == 200);
            tally.check("Fetched creature has the same id", single.field("id") == Some(id));
        }
    }

    let missing = api.get(&format!("/pokemons/{}", MISSING_ID)).await?;
    tally.check_detail(
        format!("GET /pokemons/{} → 404", MISSING_ID),
        missing.status == 404,
        format!("got: {}", missing.status),
    );

    if listed.len() >= 3 {
        let sample = &listed[..3];
        let ids: Vec<Value> = sample.iter().filter_map(id_of).cloned().collect();
        let compare = api.post("/pokemons/compare", &ids).await?;
        tally.check("POST /pokemons/compare → 200", compare.status == 200);
        tally.check(
            "Compare returns pokemons",
            compare.field("pokemons").is_some_and(Value::is_array),
        );
        let stats = compare.field("stats");
        tally.check("Compare returns stats", stats.is_some());
        for field in ["avgHp", "minAttack", "maxDefense"] {
            tally.check(
                format!("Stats contain {}", field),
                stats.is_some_and(|s| has(s, field)),
            );
        }
        if let (Some(expected), Some(actual)) = (
            mean_hp(sample),
            stats.and_then(|s| s.get("avgHp")).and_then(Value::as_f64),
        ) {
            tally.check_detail(
                "avgHp is the mean of the compared hp values",
                (expected - actual).abs() < 0.01,
                format!("expected {expected:.2}, got {actual:.2}"),
            );
        }
    }
    Ok(())
}

pub async fn types(api: &mut ApiClient, tally: &mut Tally) -> Result<()> {
    section("🔴 Types");

    let all = api.get("/types").await?;
    tally.check("GET /types → 200", all.status == 200);
    tally.check("GET /types returns an array", all.as_array().is_some());
    let first = all.as_array().and_then(|a| a.first()).cloned();
    tally.check("At least 1 type exists", first.is_some());

    if let Some(first) = first {
        tally.check("Type has an id", has(&first, "id"));
        tally.check("Type has a name", has(&first, "name"));

        if let Some(id) = id_of(&first) {
            let seg = segment(id);
            let single = api.get(&format!("/types/{}", seg)).await?;
            tally.check(format!("GET /types/{} → 200", seg), single.status == 200);
            tally.check("Fetched type has the same id", single.field("id") == Some(id));
        }
    }
    Ok(())
}

pub async fn captures(api: &mut ApiClient, tally: &mut Tally) -> Result<()> {
    section("🎣 Captures");

    let all = api.get("/caught-pokemons").await?;
    tally.check("GET /caught-pokemons → 200", all.status == 200);
    tally.check("GET /caught-pokemons returns an array", all.as_array().is_some());

    if let Some(first) = all.as_array().and_then(|a| a.first()).cloned() {
        tally.check("Capture has an id", has(&first, "id"));
        tally.check("Capture has a captureDate", has(&first, "captureDate"));
        if let Some(id) = id_of(&first) {
            let seg = segment(id);
            let single = api.get(&format!("/caught-pokemons/{}", seg)).await?;
            tally.check(
                format!("GET /caught-pokemons/{} → 200", seg),
                single.status == 200,
            );
        }
    }

    let first_trainer = api
        .get("/trainers")
        .await?
        .as_array()
        .and_then(|a| a.first())
        .cloned();
    if let Some(id) = first_trainer.as_ref().and_then(id_of) {
        let seg = segment(id);
        let by_trainer = api.get(&format!("/caught-pokemons/trainer/{}", seg)).await?;
        tally.check(
            format!("GET /caught-pokemons/trainer/{} → 200", seg),
            by_trainer.status == 200,
        );
        tally.check(
            "Captures by trainer returns an array",
            by_trainer.as_array().is_some(),
        );
    }

    let first_creature = api
        .get("/pokemons")
        .await?
        .as_array()
        .and_then(|a| a.first())
        .cloned();
    if let Some(id) = first_creature.as_ref().and_then(id_of) {
        let seg = segment(id);
        let by_creature = api.get(&format!("/caught-pokemons/pokemon/{}", seg)).await?;
        tally.check(
            format!("GET /caught-pokemons/pokemon/{} → 200", seg),
            by_creature.status == 200,
        );
        tally.check(
            "Captures by creature returns an array",
            by_creature.as_array().is_some(),
        );
    }

    // ids are sent as listed, whatever their JSON type
    if let (Some(trainer), Some(creature)) = (&first_trainer, &first_creature) {
        let payload = json!({
            "trainerId": trainer.get("id").cloned().unwrap_or(Value::Null),
            "pokemonId": creature.get("id").cloned().unwrap_or(Value::Null),
        });
        let created = api.post("/caught-pokemons", &payload).await?;
        tally.check_detail(
            "POST /caught-pokemons → 201",
            created.status == 201,
            format!("got: {}", created.status),
        );
        tally.check("New capture has an id", created.field("id").is_some());
        tally.check(
            "New capture has a captureDate",
            created.field("captureDate").is_some(),
        );
    }
    Ok(())
}
