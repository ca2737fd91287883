//! Seed builders.
//!
//! Run in dependency order: trainers, login as the first trainer, types,
//! creatures, captures. Every builder first lists what the primary service
//! already holds and only creates what is missing, so running the seeder
//! twice does not duplicate trainers, types or creatures.

use crate::{
    catalog::CatalogClient,
    config::RunConfig,
    constants::{
        TrainerFixture, CATEGORY_NAMES, FIRST_TRAINER, MAX_CAPTURES_PER_TRAINER,
        MIN_CAPTURES_PER_TRAINER, TRAINERS,
    },
    http::ApiClient,
    models::{
        Created, CreatureRecord, LoginReply, LoginRequest, NewCapture, NewType, RegisterReply,
        RegisterRequest, TypeRecord,
    },
};
use anyhow::{bail, Result};
use log::debug;
use rand::{seq::IndexedRandom, Rng};
use std::collections::{BTreeMap, HashMap};

/// Identifiers learned during one seeding run.
#[derive(Debug, Default, Clone)]
pub struct SeedState {
    pub trainer_ids: Vec<i64>,
    pub type_ids: BTreeMap<String, i64>,
    pub creature_ids: Vec<i64>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CreatureReport {
    pub created: usize,
    pub existing: usize,
    pub errors: usize,
}

/// Log in with `trainer`, returning its id when the service accepts.
pub async fn login(api: &mut ApiClient, trainer: &TrainerFixture) -> Result<Option<i64>> {
    let resp = api.post("/auth/login", &LoginRequest::from(trainer)).await?;
    Ok(resp.parse::<LoginReply>().map(|r| r.trainer_id))
}

pub async fn create_trainers(api: &mut ApiClient, state: &mut SeedState) -> Result<()> {
    println!("\n📝 Creating trainers...");

    for trainer in &TRAINERS {
        if let Some(id) = login(api, trainer).await? {
            state.trainer_ids.push(id);
            println!("  ✓ Existing trainer: {} (ID: {})", trainer.name, id);
            continue;
        }

        let resp = api
            .post("/auth/register", &RegisterRequest::from(trainer))
            .await?;
        match resp.parse::<RegisterReply>() {
            Some(reply) => {
                let id = reply.trainer_id();
                state.trainer_ids.push(id);
                println!("  ✓ Trainer created: {} (ID: {})", trainer.name, id);
            }
            None => println!(
                "  ✗ Could not create trainer {}: {}",
                trainer.name,
                resp.describe()
            ),
        }
    }

    println!("  Total trainers: {}", state.trainer_ids.len());
    Ok(())
}

/// Re-authenticate as the first fixture trainer. Failure is fatal.
pub async fn login_as_first_trainer(api: &mut ApiClient) -> Result<i64> {
    println!("\n🔐 Logging in as the first trainer...");
    let resp = api
        .post("/auth/login", &LoginRequest::from(&FIRST_TRAINER))
        .await?;
    match resp.parse::<LoginReply>() {
        Some(reply) => {
            println!("  ✓ Logged in as {}", FIRST_TRAINER.name);
            Ok(reply.trainer_id)
        }
        None => {
            println!("  ✗ Login failed: {}", resp.describe());
            bail!("cannot log in as {}", FIRST_TRAINER.email)
        }
    }
}

async fn list_types(api: &mut ApiClient) -> Result<Vec<TypeRecord>> {
    Ok(api.get("/types").await?.records())
}

pub async fn create_types(api: &mut ApiClient, state: &mut SeedState) -> Result<()> {
    println!("\n🔴 Creating types...");

    let existing: HashMap<String, i64> = list_types(api)
        .await?
        .into_iter()
        .map(|t| (t.name, t.id))
        .collect();

    for name in CATEGORY_NAMES {
        if let Some(&id) = existing.get(name) {
            state.type_ids.insert(name.to_string(), id);
            println!("  ✓ Existing type: {} (ID: {})", name, id);
            continue;
        }

        let resp = api.post("/types", &NewType { name }).await?;
        if let Some(Created { id }) = resp.parse() {
            state.type_ids.insert(name.to_string(), id);
            println!("  ✓ Type created: {} (ID: {})", name, id);
            continue;
        }

        // creation may have raced with another writer
        debug!("type {} not created: {}", name, resp.describe());
        match list_types(api).await?.into_iter().find(|t| t.name == name) {
            Some(t) => {
                state.type_ids.insert(name.to_string(), t.id);
                println!("  ✓ Existing type (recovered): {} (ID: {})", name, t.id);
            }
            None => println!("  ⚠ Type {} not created", name),
        }
    }

    println!("  Total types: {}", state.type_ids.len());
    Ok(())
}

pub async fn create_creatures(
    api: &mut ApiClient,
    catalog: &CatalogClient,
    cfg: &RunConfig,
    state: &mut SeedState,
) -> Result<CreatureReport> {
    let count = cfg.creature_count;
    println!("\n⚡ Fetching creatures from the catalog and creating them...");
    println!("  ({} creatures to process)", count);

    let listed: Vec<CreatureRecord> = api.get("/pokemons").await?.records();
    let existing: HashMap<u32, i64> = listed
        .into_iter()
        .map(|c| (c.pokedex_number, c.id))
        .collect();

    let mut report = CreatureReport::default();
    for number in 1..=count {
        if let Some(&id) = existing.get(&number) {
            state.creature_ids.push(id);
            report.existing += 1;
            if number % 20 == 0 {
                println!("  [{}/{}] Progress...", number, count);
            }
            continue;
        }

        let creature = match catalog.fetch(number).await {
            Ok(c) => c,
            Err(e) => {
                report.errors += 1;
                println!("  ✗ Could not fetch creature #{}: {:#}", number, e);
                continue;
            }
        };

        match api.post("/pokemons", &creature.to_new_creature()).await {
            Ok(resp) => match resp.parse::<Created>() {
                Some(Created { id }) => {
                    state.creature_ids.push(id);
                    report.created += 1;
                    if number % 20 == 0 {
                        println!(
                            "  [{}/{}] {} created ({})",
                            number,
                            count,
                            creature.name,
                            creature.types.join("/")
                        );
                    }
                }
                None => {
                    report.errors += 1;
                    println!("  ✗ Could not create {}: {}", creature.name, resp.describe());
                }
            },
            Err(e) => {
                report.errors += 1;
                println!("  ✗ Could not create {}: {:#}", creature.name, e);
            }
        }

        tokio::time::sleep(cfg.catalog_delay).await;
    }

    println!(
        "  ✓ Created: {}, Existing: {}, Errors: {}",
        report.created, report.existing, report.errors
    );
    println!("  Total creatures available: {}", state.creature_ids.len());
    Ok(report)
}

/// Pick 3 to 6 random creatures for every trainer. Repeats are allowed.
pub fn plan_captures<R: Rng>(
    trainer_ids: &[i64],
    creature_ids: &[i64],
    rng: &mut R,
) -> Vec<NewCapture> {
    let mut plan = Vec::new();
    if creature_ids.is_empty() {
        return plan;
    }
    for &trainer_id in trainer_ids {
        let n = rng.random_range(MIN_CAPTURES_PER_TRAINER..=MAX_CAPTURES_PER_TRAINER);
        for _ in 0..n {
            if let Some(&pokemon_id) = creature_ids.choose(rng) {
                plan.push(NewCapture {
                    trainer_id,
                    pokemon_id,
                });
            }
        }
    }
    plan
}

pub async fn create_captures(api: &mut ApiClient, state: &SeedState) -> Result<usize> {
    println!("\n🎣 Creating captures...");

    if state.creature_ids.is_empty() {
        println!("  ⚠ No creature available, cannot create captures");
        return Ok(0);
    }

    let plan = plan_captures(&state.trainer_ids, &state.creature_ids, &mut rand::rng());
    let mut created = 0;
    for capture in &plan {
        let resp = api.post("/caught-pokemons", capture).await?;
        if resp.parse::<Created>().is_some() {
            created += 1;
        } else {
            debug!(
                "capture {}→{} rejected: {}",
                capture.trainer_id,
                capture.pokemon_id,
                resp.describe()
            );
        }
    }

    println!("  ✓ {} captures created", created);
    Ok(created)
}

/// Full populate sequence against an already reachable service.
pub async fn populate(
    api: &mut ApiClient,
    catalog: &CatalogClient,
    cfg: &RunConfig,
) -> Result<SeedState> {
    let mut state = SeedState::default();

    create_trainers(api, &mut state).await?;
    if state.trainer_ids.is_empty() {
        println!("\n❌ No trainer created, stopping");
        bail!("no trainer could be logged in or registered");
    }

    login_as_first_trainer(api).await?;

    create_types(api, &mut state).await?;
    create_creatures(api, catalog, cfg, &mut state).await?;
    create_captures(api, &state).await?;

    Ok(state)
}
