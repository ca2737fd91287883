//! Teardown routines.
//!
//! Protected list and delete endpoints need a session, so teardown first
//! registers a throwaway account (falling back to the first fixture
//! trainer), then deletes captures, creatures, types and trainers in that
//! order. Individual delete failures are counted, never fatal.

use crate::{
    constants::{FIRST_TRAINER, TEARDOWN_USER_NAME, TEARDOWN_USER_PASSWORD},
    http::ApiClient,
    models::{Created, RegisterRequest},
    seed::login,
};
use anyhow::{bail, Result};
use log::debug;
use serde_json::Value;

/// Entity kinds that can be torn down, in deletion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Captures,
    Creatures,
    Types,
    Trainers,
}

impl Entity {
    pub const TEARDOWN_ORDER: [Entity; 4] = [
        Entity::Captures,
        Entity::Creatures,
        Entity::Types,
        Entity::Trainers,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Entity::Captures => "/caught-pokemons",
            Entity::Creatures => "/pokemons",
            Entity::Types => "/types",
            Entity::Trainers => "/trainers",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Entity::Captures => "captures",
            Entity::Creatures => "creatures",
            Entity::Types => "types",
            Entity::Trainers => "trainers",
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeleteCount {
    pub deleted: usize,
    pub errors: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TeardownReport {
    pub captures: DeleteCount,
    pub creatures: DeleteCount,
    pub types: DeleteCount,
    pub trainers: DeleteCount,
}

impl TeardownReport {
    fn slot(&mut self, entity: Entity) -> &mut DeleteCount {
        match entity {
            Entity::Captures => &mut self.captures,
            Entity::Creatures => &mut self.creatures,
            Entity::Types => &mut self.types,
            Entity::Trainers => &mut self.trainers,
        }
    }

    pub fn print(&self) {
        println!("   - Captures deleted: {}", self.captures.deleted);
        println!("   - Creatures deleted: {}", self.creatures.deleted);
        println!("   - Types deleted: {}", self.types.deleted);
        println!("   - Trainers deleted: {}", self.trainers.deleted);
    }
}

/// Email for a throwaway teardown account, unique per millisecond.
pub fn throwaway_email(now_millis: i64) -> String {
    format!("temp_delete_{}@pokemon.com", now_millis)
}

/// Obtain a session able to list and delete. Fails when neither a fresh
/// registration nor the first fixture trainer works.
pub async fn authenticate(api: &mut ApiClient) -> Result<()> {
    println!("\n🔐 Creating a temporary account for deletion...");
    let email = throwaway_email(chrono::Utc::now().timestamp_millis());
    let resp = api
        .post(
            "/auth/register",
            &RegisterRequest {
                name: TEARDOWN_USER_NAME,
                email: &email,
                password: TEARDOWN_USER_PASSWORD,
            },
        )
        .await?;

    if let Some(Created { id }) = resp.parse() {
        println!("  ✓ Temporary account created (ID: {})", id);
        return Ok(());
    }
    debug!("temporary registration refused: {}", resp.describe());

    if login(api, &FIRST_TRAINER).await?.is_some() {
        println!("  ✓ Logged in as {}", FIRST_TRAINER.name);
        return Ok(());
    }

    println!("  ✗ Cannot log in to delete data");
    bail!("no session available for teardown")
}

fn record_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Delete every listed record of `entity`.
pub async fn delete_all(api: &mut ApiClient, entity: Entity) -> Result<DeleteCount> {
    println!("\n🗑️  Deleting {}...", entity.label());

    let listing = api.get(entity.path()).await?;
    let Some(records) = listing.as_array() else {
        println!("  ⚠ Could not list {}", entity.label());
        return Ok(DeleteCount::default());
    };

    let ids: Vec<Option<String>> = records.iter().map(record_id).collect();
    let mut count = DeleteCount::default();
    for id in ids {
        let Some(id) = id else {
            count.errors += 1;
            continue;
        };
        let resp = api.delete(&format!("{}/{}", entity.path(), id)).await?;
        if resp.status == 200 || resp.status == 204 {
            count.deleted += 1;
        } else {
            debug!(
                "DELETE {}/{} → {} {}",
                entity.path(),
                id,
                resp.status,
                resp.describe()
            );
            count.errors += 1;
        }
    }

    if count.errors > 0 {
        println!(
            "  ✓ {} {} deleted, {} errors",
            count.deleted,
            entity.label(),
            count.errors
        );
    } else {
        println!("  ✓ {} {} deleted", count.deleted, entity.label());
    }
    Ok(count)
}

/// Authenticate, then delete everything in dependency order.
pub async fn teardown(api: &mut ApiClient) -> Result<TeardownReport> {
    authenticate(api).await?;
    let mut report = TeardownReport::default();
    for entity in Entity::TEARDOWN_ORDER {
        let count = delete_all(api, entity).await?;
        *report.slot(entity) = count;
    }
    Ok(report)
}
