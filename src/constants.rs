//! Fixed defaults and fixture data shared by every command.

/// Default base URL of the primary Pokédex service.
pub const DEFAULT_PRIMARY_URL: &str = "http://localhost:8080/api";
/// Default base URL of the capture-feed consumer service.
pub const DEFAULT_CONSUMER_URL: &str = "http://localhost:8081/api";
/// Public creature catalog.
pub const DEFAULT_CATALOG_URL: &str = "https://pokeapi.co/api/v2";

/// First generation.
pub const DEFAULT_CREATURE_COUNT: u32 = 151;
/// Pause after each successful catalog call, in milliseconds.
pub const DEFAULT_CATALOG_DELAY_MS: u64 = 100;

/// Inclusive bounds on how many captures each trainer receives.
pub const MIN_CAPTURES_PER_TRAINER: usize = 3;
pub const MAX_CAPTURES_PER_TRAINER: usize = 6;

/// Id that no service is expected to ever assign.
pub const MISSING_ID: i64 = 999_999;

/// Cookie carrying the primary service's session.
pub const SESSION_COOKIE_NAME: &str = "JSESSIONID";

/// A trainer account the seeder logs into or registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainerFixture {
    pub name: &'static str,
    pub email: &'static str,
    pub password: &'static str,
}

const fn trainer(
    name: &'static str,
    email: &'static str,
    password: &'static str,
) -> TrainerFixture {
    TrainerFixture {
        name,
        email,
        password,
    }
}

pub const TRAINERS: [TrainerFixture; 10] = [
    trainer("Ash Ketchum", "ash@pokemon.com", "password1"),
    trainer("Misty", "misty@pokemon.com", "password2"),
    trainer("Brock", "brock@pokemon.com", "password3"),
    trainer("Gary Oak", "gary@pokemon.com", "password4"),
    trainer("May", "may@pokemon.com", "password5"),
    trainer("Dawn", "dawn@pokemon.com", "password6"),
    trainer("Serena", "serena@pokemon.com", "password7"),
    trainer("Clemont", "clemont@pokemon.com", "password8"),
    trainer("Lillie", "lillie@pokemon.com", "password9"),
    trainer("Red", "red@pokemon.com", "password10"),
];

/// The account every authenticated step falls back to.
pub const FIRST_TRAINER: TrainerFixture = TRAINERS[0];

/// Every elemental category, in creation order.
pub const CATEGORY_NAMES: [&str; 18] = [
    "Normal", "Fire", "Water", "Electric", "Grass", "Ice", "Fighting", "Poison", "Ground",
    "Flying", "Psychic", "Bug", "Rock", "Ghost", "Dragon", "Dark", "Steel", "Fairy",
];

pub const TEARDOWN_USER_NAME: &str = "Temp Delete User";
pub const TEARDOWN_USER_PASSWORD: &str = "temppassword123";
