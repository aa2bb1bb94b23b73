//! JSON rendering of stored records for the command line.
//!
//! Users always carry their favorites, mirroring the external view used by
//! API responses.

use clap::ValueEnum;
use holocron_core::{CharacterId, FavoriteId, PlanetId, Result, SpeciesId, UserId, VehicleId};
use holocron_db::queries::{characters, favorites, planets, species, users, vehicles};
use holocron_db::views::ExternalView;
use rusqlite::Connection;
use serde_json::Value;

/// The record kinds addressable from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    User,
    Favorite,
    Character,
    Planet,
    Vehicle,
    Species,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::User => "user",
            Kind::Favorite => "favorite",
            Kind::Character => "character",
            Kind::Planet => "planet",
            Kind::Vehicle => "vehicle",
            Kind::Species => "species",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn user_json(conn: &Connection, user: &holocron_db::models::User) -> Result<Value> {
    let favs = favorites::favorites_by_user(conn, user.id)?;
    user.serialize_with(&favs)
}

/// Serialize one record, or `None` if it does not exist.
pub fn show(conn: &Connection, kind: Kind, id: i64) -> Result<Option<Value>> {
    let value = match kind {
        Kind::User => match users::get_user(conn, UserId::from(id))? {
            Some(user) => Some(user_json(conn, &user)?),
            None => None,
        },
        Kind::Favorite => favorites::get_favorite(conn, FavoriteId::from(id))?
            .map(|f| f.serialize())
            .transpose()?,
        Kind::Character => characters::get_character(conn, CharacterId::from(id))?
            .map(|c| c.serialize())
            .transpose()?,
        Kind::Planet => planets::get_planet(conn, PlanetId::from(id))?
            .map(|p| p.serialize())
            .transpose()?,
        Kind::Vehicle => vehicles::get_vehicle(conn, VehicleId::from(id))?
            .map(|v| v.serialize())
            .transpose()?,
        Kind::Species => species::get_species(conn, SpeciesId::from(id))?
            .map(|s| s.serialize())
            .transpose()?,
    };
    Ok(value)
}

/// Serialize every record of a kind as a JSON array, ordered by id.
pub fn list(conn: &Connection, kind: Kind) -> Result<Value> {
    let items = match kind {
        Kind::User => users::list_users(conn)?
            .iter()
            .map(|u| user_json(conn, u))
            .collect::<Result<Vec<_>>>()?,
        Kind::Favorite => serialize_all(&favorites::list_favorites(conn)?)?,
        Kind::Character => serialize_all(&characters::list_characters(conn)?)?,
        Kind::Planet => serialize_all(&planets::list_planets(conn)?)?,
        Kind::Vehicle => serialize_all(&vehicles::list_vehicles(conn)?)?,
        Kind::Species => serialize_all(&species::list_species(conn)?)?,
    };
    Ok(Value::Array(items))
}

fn serialize_all<T: ExternalView>(records: &[T]) -> Result<Vec<Value>> {
    records.iter().map(ExternalView::serialize).collect()
}
