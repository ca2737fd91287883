//! Third-party creature catalog.
//!
//! Fetches one record per pokedex number and normalizes it into the shape the
//! primary service accepts: four base stats, capitalized display name and
//! capitalized category labels.

use crate::{models::NewCreature, retry::RetryPolicy};
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
struct ApiCreature {
    id: u32,
    name: String,
    stats: Vec<ApiStat>,
    types: Vec<ApiTypeSlot>,
}

#[derive(Deserialize, Debug)]
struct ApiStat {
    base_stat: u32,
    stat: ApiNamed,
}

#[derive(Deserialize, Debug)]
struct ApiTypeSlot {
    #[serde(rename = "type")]
    kind: ApiNamed,
}

#[derive(Deserialize, Debug)]
struct ApiNamed {
    name: String,
}

/// Normalized catalog record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogCreature {
    pub pokedex_number: u32,
    pub name: String,
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub types: Vec<String>,
}

impl CatalogCreature {
    /// Payload for the primary service; category labels are left out.
    pub fn to_new_creature(&self) -> NewCreature {
        NewCreature {
            pokedex_number: self.pokedex_number,
            name: self.name.clone(),
            hp: self.hp,
            attack: self.attack,
            defense: self.defense,
            speed: self.speed,
        }
    }
}

fn normalize(raw: ApiCreature) -> CatalogCreature {
    let mut out = CatalogCreature {
        pokedex_number: raw.id,
        name: capitalize(&raw.name),
        hp: 0,
        attack: 0,
        defense: 0,
        speed: 0,
        types: raw.types.iter().map(|t| capitalize(&t.kind.name)).collect(),
    };
    for s in &raw.stats {
        match s.stat.name.as_str() {
            "hp" => out.hp = s.base_stat,
            "attack" => out.attack = s.base_stat,
            "defense" => out.defense = s.base_stat,
            "speed" => out.speed = s.base_stat,
            _ => {}
        }
    }
    out
}

/// Uppercase the first character, leave the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parse a raw catalog document.
pub fn parse_creature(json: &str) -> Result<CatalogCreature> {
    let raw: ApiCreature = serde_json::from_str(json).context("unexpected catalog record")?;
    Ok(normalize(raw))
}

pub struct CatalogClient {
    pub base_url: String,
    client: Client,
    retry: RetryPolicy,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(CatalogClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder().build()?,
            retry: RetryPolicy::linear(),
        })
    }

    /// Fetch the record for `number`. A non-success status is an error.
    pub async fn fetch(&self, number: u32) -> Result<CatalogCreature> {
        let url = format!("{}/pokemon/{}", self.base_url, number);
        let resp = self
            .retry
            .run(&format!("GET {url}"), || {
                let req = self.client.get(&url);
                async move { req.send().await.map_err(anyhow::Error::from) }
            })
            .await?
            .error_for_status()
            .with_context(|| format!("catalog error for #{}", number))?;
        let raw: ApiCreature = resp
            .json()
            .await
            .with_context(|| format!("decoding catalog record #{}", number))?;
        Ok(normalize(raw))
    }
}
