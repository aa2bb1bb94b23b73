//! Character operations.
//!
//! `species_id` is the only enforced link; `starship_ids` and `vehicle_ids`
//! are denormalized id lists stored as JSON arrays and never checked.

use holocron_core::{timestamp, CharacterId, Error, Result, SpeciesId};
use rusqlite::Connection;

use super::{map_write_error, to_json};
use crate::models::{Character, NewCharacter};

const COLS: &str = "id, name, height, mass, hair_color, skin_color, eyes_color, birth_year, \
                    gender, created, edited, homeworld, url, species_id, starship_ids, vehicle_ids";

/// Insert a character and return it.
pub fn create_character(conn: &Connection, new: &NewCharacter) -> Result<Character> {
    new.validate()?;

    let created = new.created.map(timestamp::truncate);
    let edited = new.edited.map(timestamp::truncate);

    conn.execute(
        "INSERT INTO character (name, height, mass, hair_color, skin_color, eyes_color,
            birth_year, gender, created, edited, homeworld, url, species_id,
            starship_ids, vehicle_ids)
         VALUES (:name, :height, :mass, :hair_color, :skin_color, :eyes_color,
            :birth_year, :gender, :created, :edited, :homeworld, :url, :species_id,
            :starship_ids, :vehicle_ids)",
        rusqlite::named_params! {
            ":name": new.name,
            ":height": new.height,
            ":mass": new.mass,
            ":hair_color": new.hair_color,
            ":skin_color": new.skin_color,
            ":eyes_color": new.eyes_color,
            ":birth_year": new.birth_year,
            ":gender": new.gender,
            ":created": timestamp::format_opt(created.as_ref()),
            ":edited": timestamp::format_opt(edited.as_ref()),
            ":homeworld": new.homeworld,
            ":url": new.url,
            ":species_id": new.species_id.map(|id| id.get()),
            ":starship_ids": to_json(&new.starship_ids)?,
            ":vehicle_ids": to_json(&new.vehicle_ids)?,
        },
    )
    .map_err(|e| map_write_error("character", e))?;

    let id = CharacterId::from(conn.last_insert_rowid());
    tracing::debug!(character_id = %id, name = %new.name, "Created character");

    Ok(Character {
        id,
        name: new.name.clone(),
        height: new.height,
        mass: new.mass,
        hair_color: new.hair_color.clone(),
        skin_color: new.skin_color.clone(),
        eyes_color: new.eyes_color.clone(),
        birth_year: new.birth_year.clone(),
        gender: new.gender.clone(),
        created,
        edited,
        homeworld: new.homeworld.clone(),
        url: new.url.clone(),
        species_id: new.species_id,
        starship_ids: new.starship_ids.clone(),
        vehicle_ids: new.vehicle_ids.clone(),
    })
}

/// Get a character by primary key.
pub fn get_character(conn: &Connection, id: CharacterId) -> Result<Option<Character>> {
    let q = format!("SELECT {COLS} FROM character WHERE id = ?1");
    let result = conn.query_row(&q, [id.get()], Character::from_row);
    match result {
        Ok(c) => Ok(Some(c)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List all characters ordered by id.
pub fn list_characters(conn: &Connection) -> Result<Vec<Character>> {
    let q = format!("SELECT {COLS} FROM character ORDER BY id ASC");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], Character::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// The characters belonging to a species.
pub fn characters_by_species(conn: &Connection, species_id: SpeciesId) -> Result<Vec<Character>> {
    let q = format!("SELECT {COLS} FROM character WHERE species_id = ?1 ORDER BY id ASC");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([species_id.get()], Character::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Point a character at a species, or clear the link with `None`.
pub fn set_species(
    conn: &Connection,
    id: CharacterId,
    species_id: Option<SpeciesId>,
) -> Result<()> {
    let n = conn
        .execute(
            "UPDATE character SET species_id = ?1 WHERE id = ?2",
            rusqlite::params![species_id.map(|s| s.get()), id.get()],
        )
        .map_err(|e| map_write_error("character", e))?;
    if n == 0 {
        return Err(Error::not_found("character", id));
    }
    Ok(())
}

/// Delete a character. Favorites pointing at it lose the reference.
pub fn delete_character(conn: &Connection, id: CharacterId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM character WHERE id = ?1", [id.get()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}
