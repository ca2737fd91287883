//! Request payloads and reply shapes exchanged with the primary service.

use serde::{Deserialize, Serialize};

use crate::constants::TrainerFixture;

#[derive(Serialize, Debug, Clone)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize, Debug, Clone)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

impl<'a> From<&'a TrainerFixture> for LoginRequest<'a> {
    fn from(t: &'a TrainerFixture) -> Self {
        LoginRequest {
            email: t.email,
            password: t.password,
        }
    }
}

impl<'a> From<&'a TrainerFixture> for RegisterRequest<'a> {
    fn from(t: &'a TrainerFixture) -> Self {
        RegisterRequest {
            name: t.name,
            email: t.email,
            password: t.password,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct NewType<'a> {
    pub name: &'a str,
}

/// Creature creation payload. Category labels are not part of it.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewCreature {
    pub pokedex_number: u32,
    pub name: String,
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

#[derive(Serialize, Debug, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct NewCapture {
    pub trainer_id: i64,
    pub pokemon_id: i64,
}

/// Successful `/auth/login` reply.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginReply {
    pub trainer_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// `/auth/register` answers with either the created trainer (`id`) or a
/// login-style body (`trainerId`). `id` wins when both are present.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(untagged)]
pub enum RegisterReply {
    Created { id: i64 },
    Session {
        #[serde(rename = "trainerId")]
        trainer_id: i64,
    },
}

impl RegisterReply {
    pub fn trainer_id(self) -> i64 {
        match self {
            RegisterReply::Created { id } => id,
            RegisterReply::Session { trainer_id } => trainer_id,
        }
    }
}

/// Any created or listed record; only the id is required.
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct Created {
    pub id: i64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TypeRecord {
    pub id: i64,
    pub name: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreatureRecord {
    pub id: i64,
    pub pokedex_number: u32,
}
