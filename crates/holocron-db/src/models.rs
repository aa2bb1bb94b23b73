//! Rust structs mapping to database tables.
//!
//! Each persisted model implements `from_row` for constructing itself from
//! a `rusqlite::Row` whose columns follow the matching `COLS` list in
//! [`crate::queries`]. Each insert struct (`New*`) implements `validate`,
//! which enforces the required-field rules before anything is written.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use holocron_core::{
    timestamp, CharacterId, Error, FavoriteId, PlanetId, Result, SpeciesId, UserId, VehicleId,
};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

/// Parse an optional `YYYY-MM-DD HH:MM:SS` column.
fn parse_ts(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let s: Option<String> = row.get(idx)?;
    s.map(|v| timestamp::parse(&v).map_err(|e| conversion_error(idx, e)))
        .transpose()
}

/// Parse a JSON array column.
fn parse_json_vec<T: DeserializeOwned>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Vec<T>> {
    let s: Option<String> = row.get(idx)?;
    match s {
        Some(v) => serde_json::from_str(&v).map_err(|e| conversion_error(idx, e)),
        None => Ok(Vec::new()),
    }
}

/// Parse an optional fixed-point decimal stored as text.
fn parse_decimal(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Option<Decimal>> {
    let s: Option<String> = row.get(idx)?;
    s.map(|v| Decimal::from_str(&v).map_err(|e| conversion_error(idx, e)))
        .transpose()
}

fn parse_id<T: From<i64>>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T> {
    row.get::<_, i64>(idx).map(T::from)
}

fn parse_opt_id<T: From<i64>>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Option<T>> {
    Ok(row.get::<_, Option<i64>>(idx)?.map(T::from))
}

/// Fail with `Error::Validation` if a required text field is empty.
fn require(entity: &str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("{entity}.{field} is required")));
    }
    Ok(())
}

fn max_len(entity: &str, field: &str, value: &str, limit: usize) -> Result<()> {
    if value.chars().count() > limit {
        return Err(Error::validation(format!(
            "{entity}.{field} exceeds {limit} characters"
        )));
    }
    Ok(())
}

/// Digits before the point allowed by `DECIMAL(20, 1)`.
const LENGTH_INTEGER_DIGITS: u32 = 19;

/// Round a vehicle length to one fractional digit and check it fits
/// `DECIMAL(20, 1)`. Halfway values round away from zero, as a SQL
/// `NUMERIC` column does.
pub fn normalize_length(value: Decimal) -> Result<Decimal> {
    let mut scaled = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    scaled.rescale(1);
    let limit = 10u128.pow(LENGTH_INTEGER_DIGITS + 1);
    if scaled.mantissa().unsigned_abs() >= limit {
        return Err(Error::validation(format!(
            "vehicle.length {value} does not fit DECIMAL(20, 1)"
        )));
    }
    Ok(scaled)
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password: String,
    pub is_active: bool,
}

impl User {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password: row.get(3)?,
            is_active: row.get(4)?,
        })
    }
}

/// Fields accepted when registering a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            is_active: true,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("user", "username", &self.username)?;
        max_len("user", "username", &self.username, 100)?;
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

/// The rules `NewUser::validate` applies to `email`, shared with updates.
pub(crate) fn validate_email(email: &str) -> Result<()> {
    require("user", "email", email)?;
    max_len("user", "email", email, 120)
}

/// The rules `NewUser::validate` applies to `password`, shared with updates.
pub(crate) fn validate_password(password: &str) -> Result<()> {
    require("user", "password", password)?;
    max_len("user", "password", password, 80)
}

// ---------------------------------------------------------------------------
// Favorite
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Favorite {
    pub id: FavoriteId,
    pub name: String,
    pub user_id: UserId,
    pub character_id: Option<CharacterId>,
    pub planet_id: Option<PlanetId>,
    pub vehicle_id: Option<VehicleId>,
}

/// One catalog record a favorite points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteTarget {
    Character(CharacterId),
    Planet(PlanetId),
    Vehicle(VehicleId),
}

impl Favorite {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            name: row.get(1)?,
            user_id: parse_id(row, 2)?,
            character_id: parse_opt_id(row, 3)?,
            planet_id: parse_opt_id(row, 4)?,
            vehicle_id: parse_opt_id(row, 5)?,
        })
    }

    /// The populated target references. The schema does not make them
    /// exclusive, so this may hold zero, one, or several entries.
    pub fn targets(&self) -> Vec<FavoriteTarget> {
        self.character_id
            .map(FavoriteTarget::Character)
            .into_iter()
            .chain(self.planet_id.map(FavoriteTarget::Planet))
            .chain(self.vehicle_id.map(FavoriteTarget::Vehicle))
            .collect()
    }
}

/// Fields accepted when favoriting a catalog record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewFavorite {
    pub name: String,
    pub user_id: Option<UserId>,
    pub character_id: Option<CharacterId>,
    pub planet_id: Option<PlanetId>,
    pub vehicle_id: Option<VehicleId>,
}

impl NewFavorite {
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    pub fn character(mut self, id: CharacterId) -> Self {
        self.character_id = Some(id);
        self
    }

    pub fn planet(mut self, id: PlanetId) -> Self {
        self.planet_id = Some(id);
        self
    }

    pub fn vehicle(mut self, id: VehicleId) -> Self {
        self.vehicle_id = Some(id);
        self
    }

    /// Check required fields and return the owning user.
    pub fn validate(&self) -> Result<UserId> {
        require("favorite", "name", &self.name)?;
        max_len("favorite", "name", &self.name, 250)?;
        self.user_id
            .ok_or_else(|| Error::validation("favorite.user_id is required"))
    }
}

// ---------------------------------------------------------------------------
// Character
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub height: Option<i64>,
    pub mass: Option<i64>,
    pub hair_color: Option<String>,
    pub skin_color: Option<String>,
    pub eyes_color: Option<String>,
    pub birth_year: Option<String>,
    pub gender: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub edited: Option<DateTime<Utc>>,
    pub homeworld: Option<String>,
    pub url: Option<String>,
    pub species_id: Option<SpeciesId>,
    pub starship_ids: Vec<i64>,
    pub vehicle_ids: Vec<i64>,
}

impl Character {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            name: row.get(1)?,
            height: row.get(2)?,
            mass: row.get(3)?,
            hair_color: row.get(4)?,
            skin_color: row.get(5)?,
            eyes_color: row.get(6)?,
            birth_year: row.get(7)?,
            gender: row.get(8)?,
            created: parse_ts(row, 9)?,
            edited: parse_ts(row, 10)?,
            homeworld: row.get(11)?,
            url: row.get(12)?,
            species_id: parse_opt_id(row, 13)?,
            starship_ids: parse_json_vec(row, 14)?,
            vehicle_ids: parse_json_vec(row, 15)?,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewCharacter {
    pub name: String,
    pub height: Option<i64>,
    pub mass: Option<i64>,
    pub hair_color: Option<String>,
    pub skin_color: Option<String>,
    pub eyes_color: Option<String>,
    pub birth_year: Option<String>,
    pub gender: Option<String>,
    #[serde(with = "timestamp::opt")]
    pub created: Option<DateTime<Utc>>,
    #[serde(with = "timestamp::opt")]
    pub edited: Option<DateTime<Utc>>,
    pub homeworld: Option<String>,
    pub url: Option<String>,
    pub species_id: Option<SpeciesId>,
    pub starship_ids: Vec<i64>,
    pub vehicle_ids: Vec<i64>,
}

impl NewCharacter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("character", "name", &self.name)?;
        max_len("character", "name", &self.name, 250)
    }
}

// ---------------------------------------------------------------------------
// Planet
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Planet {
    pub id: PlanetId,
    pub name: String,
    pub diameter: Option<i64>,
    pub rotation_period: Option<i64>,
    pub orbital_period: Option<i64>,
    pub gravity: Option<String>,
    pub population: Option<i64>,
    pub climate: Option<String>,
    pub terrain: Option<String>,
    pub surface_water: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub edited: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

impl Planet {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            name: row.get(1)?,
            diameter: row.get(2)?,
            rotation_period: row.get(3)?,
            orbital_period: row.get(4)?,
            gravity: row.get(5)?,
            population: row.get(6)?,
            climate: row.get(7)?,
            terrain: row.get(8)?,
            surface_water: row.get(9)?,
            created: parse_ts(row, 10)?,
            edited: parse_ts(row, 11)?,
            url: row.get(12)?,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewPlanet {
    pub name: String,
    pub diameter: Option<i64>,
    pub rotation_period: Option<i64>,
    pub orbital_period: Option<i64>,
    pub gravity: Option<String>,
    pub population: Option<i64>,
    pub climate: Option<String>,
    pub terrain: Option<String>,
    pub surface_water: Option<String>,
    #[serde(with = "timestamp::opt")]
    pub created: Option<DateTime<Utc>>,
    #[serde(with = "timestamp::opt")]
    pub edited: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

impl NewPlanet {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("planet", "name", &self.name)?;
        max_len("planet", "name", &self.name, 250)
    }
}

// ---------------------------------------------------------------------------
// Vehicle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: VehicleId,
    pub name: String,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub cost_in_credits: Option<i64>,
    pub length: Option<Decimal>,
    pub crew: Option<i64>,
    pub passengers: Option<i64>,
    pub max_atmosphering_speed: Option<i64>,
    pub cargo_capacity: Option<i64>,
    pub consumable: Option<String>,
    pub films: Vec<String>,
    pub pilots: Vec<String>,
    pub created: Option<DateTime<Utc>>,
    pub edited: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

impl Vehicle {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            name: row.get(1)?,
            model: row.get(2)?,
            manufacturer: row.get(3)?,
            cost_in_credits: row.get(4)?,
            length: parse_decimal(row, 5)?,
            crew: row.get(6)?,
            passengers: row.get(7)?,
            max_atmosphering_speed: row.get(8)?,
            cargo_capacity: row.get(9)?,
            consumable: row.get(10)?,
            films: parse_json_vec(row, 11)?,
            pilots: parse_json_vec(row, 12)?,
            created: parse_ts(row, 13)?,
            edited: parse_ts(row, 14)?,
            url: row.get(15)?,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewVehicle {
    pub name: String,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub cost_in_credits: Option<i64>,
    /// Accepts a JSON string or number (`"12.3"` or `12.3`).
    pub length: Option<Decimal>,
    pub crew: Option<i64>,
    pub passengers: Option<i64>,
    pub max_atmosphering_speed: Option<i64>,
    pub cargo_capacity: Option<i64>,
    pub consumable: Option<String>,
    pub films: Vec<String>,
    pub pilots: Vec<String>,
    #[serde(with = "timestamp::opt")]
    pub created: Option<DateTime<Utc>>,
    #[serde(with = "timestamp::opt")]
    pub edited: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

impl NewVehicle {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("vehicle", "name", &self.name)?;
        max_len("vehicle", "name", &self.name, 250)?;
        if let Some(length) = self.length {
            normalize_length(length)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Species
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    pub id: SpeciesId,
    pub name: String,
    pub classification: Option<String>,
    pub designation: Option<String>,
    pub average_height: Option<String>,
    pub skin_colors: Option<String>,
    pub hair_colors: Option<String>,
    pub eye_colors: Option<String>,
    pub average_lifespan: Option<String>,
    pub homeworld: Option<String>,
    pub language: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub edited: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

impl Species {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            name: row.get(1)?,
            classification: row.get(2)?,
            designation: row.get(3)?,
            average_height: row.get(4)?,
            skin_colors: row.get(5)?,
            hair_colors: row.get(6)?,
            eye_colors: row.get(7)?,
            average_lifespan: row.get(8)?,
            homeworld: row.get(9)?,
            language: row.get(10)?,
            created: parse_ts(row, 11)?,
            edited: parse_ts(row, 12)?,
            url: row.get(13)?,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewSpecies {
    pub name: String,
    pub classification: Option<String>,
    pub designation: Option<String>,
    pub average_height: Option<String>,
    pub skin_colors: Option<String>,
    pub hair_colors: Option<String>,
    pub eye_colors: Option<String>,
    pub average_lifespan: Option<String>,
    pub homeworld: Option<String>,
    pub language: Option<String>,
    #[serde(with = "timestamp::opt")]
    pub created: Option<DateTime<Utc>>,
    #[serde(with = "timestamp::opt")]
    pub edited: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

impl NewSpecies {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("species", "name", &self.name)?;
        max_len("species", "name", &self.name, 250)
    }
}
